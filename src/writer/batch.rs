use crate::core::types::{DocId, Fields};

/// One write of a bulk request
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    Index { id: DocId, fields: Fields },
    Update { id: DocId, fields: Fields },
    Delete { id: DocId },
}

/// Per-item result, reported in request order
#[derive(Debug, Clone, PartialEq)]
pub enum BulkItemOutcome {
    Created { version: u64 },
    Updated { version: u64 },
    Deleted,
    NotFound,
    Failed { reason: String },
}

impl BulkItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, BulkItemOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkItem {
    pub id: DocId,
    pub outcome: BulkItemOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BulkResponse {
    pub items: Vec<BulkItem>,
    pub took_ms: u64,
}

impl BulkResponse {
    pub fn has_failures(&self) -> bool {
        self.items.iter().any(|item| item.outcome.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_failure()).count()
    }

    pub fn outcomes(&self) -> Vec<&BulkItemOutcome> {
        self.items.iter().map(|item| &item.outcome).collect()
    }
}

/// Collects bulk operations in order
#[derive(Debug, Clone, Default)]
pub struct BulkRequest {
    pub operations: Vec<BulkOperation>,
}

impl BulkRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, id: impl Into<DocId>, fields: Fields) -> Self {
        self.operations.push(BulkOperation::Index { id: id.into(), fields });
        self
    }

    pub fn update(mut self, id: impl Into<DocId>, fields: Fields) -> Self {
        self.operations.push(BulkOperation::Update { id: id.into(), fields });
        self
    }

    pub fn delete(mut self, id: impl Into<DocId>) -> Self {
        self.operations.push(BulkOperation::Delete { id: id.into() });
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl From<BulkRequest> for Vec<BulkOperation> {
    fn from(request: BulkRequest) -> Self {
        request.operations
    }
}
