//! # nlsql
//!
//! A natural-language-to-SQL workbench over uploaded SQLite databases.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Uploaded SQLite database image                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [db + schema]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Schema (tables, columns, keys, foreign keys)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [prompt]
//! ┌─────────────────────────────────────────────────────────┐
//! │    Tagged prompt string (<db_id>, <table>, <col>, ...)   │
//! │               + natural-language question                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [remote::translate]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Predicted SQL query                     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!              ┌───────────┴───────────┐
//!              ▼ [db::execute]         ▼ [remote::score]
//! ┌──────────────────────┐  ┌──────────────────────────────┐
//! │   Result rows        │  │  BLEU score vs expected SQL  │
//! └──────────────────────┘  └──────────────────────────────┘
//! ```
//!
//! The [`session::Workbench`] ties the stages together; the `web` module
//! exposes it as a JSON API and `src/bin/main.rs` as a CLI.

pub mod config;
pub mod db;
pub mod prompt;
pub mod remote;
pub mod render;
pub mod schema;
pub mod session;
pub mod web;

// Export the main entry points at crate root for convenience
pub use db::{CellValue, DbError, LoadedDatabase, ResultSet};
pub use prompt::serialize_prompt;
pub use remote::{format_score, ModelVariant, RemoteError, ScoringClient, TranslationClient};
pub use render::{render_rows, ResultRow};
pub use schema::{extract_schema, Column, ForeignKeyRef, Table};
pub use session::{QuerySession, QuerySlot, SessionError, Workbench};
