use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Document;
use crate::store::document_store::DocumentStore;

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"PSNP";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub doc_count: u64,
}

/// Point-in-time copy of every live document with its version.
///
/// On disk: `[ bincode(Snapshot) ][ crc32 of the payload, u32 LE ]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub header: SnapshotHeader,
    pub documents: Vec<Document>,
}

impl Snapshot {
    /// Copies the store's documents in id order
    pub fn capture(store: &DocumentStore) -> Self {
        let mut documents: Vec<Document> = store.documents().map(|doc| (**doc).clone()).collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));

        Snapshot {
            header: SnapshotHeader {
                magic: SNAPSHOT_MAGIC,
                format_version: FORMAT_VERSION,
                created_at: Utc::now(),
                doc_count: documents.len() as u64,
            },
            documents,
        }
    }

    /// Writes to a temporary sibling file and renames it over `path`, so a
    /// crash mid-write never leaves a truncated snapshot behind.
    /// Returns the number of bytes written.
    pub fn save(&self, path: &Path) -> Result<u64> {
        let payload = bincode::serialize(self)?;
        let mut hasher = Hasher::new();
        hasher.update(&payload);
        let checksum = hasher.finalize();

        let tmp = temp_path(path);
        let mut file = File::create(&tmp)?;
        file.write_all(&payload)?;
        file.write_all(&checksum.to_le_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, path)?;
        Ok(payload.len() as u64 + 4)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        if data.len() < 4 {
            return Err(corrupted(path, "file too short"));
        }

        let (payload, trailer) = data.split_at(data.len() - 4);
        let mut stored = [0u8; 4];
        stored.copy_from_slice(trailer);
        let mut hasher = Hasher::new();
        hasher.update(payload);
        if hasher.finalize() != u32::from_le_bytes(stored) {
            return Err(corrupted(path, "checksum mismatch"));
        }

        let snapshot: Snapshot = bincode::deserialize(payload)?;
        if snapshot.header.magic != SNAPSHOT_MAGIC {
            return Err(corrupted(path, "bad magic"));
        }
        if snapshot.header.format_version != FORMAT_VERSION {
            return Err(corrupted(
                path,
                &format!("unsupported format version {}", snapshot.header.format_version),
            ));
        }
        if snapshot.header.doc_count != snapshot.documents.len() as u64 {
            return Err(corrupted(path, "document count does not match header"));
        }

        Ok(snapshot)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn corrupted(path: &Path, reason: &str) -> Error {
    Error::new(
        ErrorKind::Corrupted,
        format!("snapshot {}: {}", path.display(), reason),
    )
}
