//! snapq Engine - Query orchestration layer
//!
//! Fans a listing request out over the selected repositories, runs each
//! repository's resolve / filter / load / sort pipeline and merges the
//! per-repository pages into one response.

pub mod commands;
pub mod context;

pub use commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
pub use context::QueryContext;
