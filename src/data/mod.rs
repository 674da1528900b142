//! Comment ingestion, export and reporting around the analysis core.

pub mod comments;
pub mod export;
pub mod report;
