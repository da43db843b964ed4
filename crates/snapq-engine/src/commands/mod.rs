//! Query orchestration.
//!
//! `engine_query` is the entry point; `coordinator` fans out over
//! repositories and merges; `repository_query` is the per-repository pipeline.

pub mod coordinator;
pub mod engine_query;
pub mod repository_query;
