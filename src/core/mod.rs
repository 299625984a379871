pub mod types;
pub mod error;
pub mod config;
pub mod stats;
pub mod json;
pub mod state;
pub mod database;
