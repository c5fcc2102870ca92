//! API handlers for the workbench.
//!
//! Every mutating response carries a `success` flag plus an optional
//! `error` string so the UI can surface failures inline instead of
//! relying on HTTP status codes alone.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::remote::ModelVariant;
use crate::render::ResultRow;
use crate::schema::Table;
use crate::session::{QuerySession, QuerySlot, Workbench};

// ============================================================================
// Shared State
// ============================================================================

/// Shared workbench state.
///
/// `rusqlite::Connection` is not `Sync`, so the workbench sits behind a
/// tokio `Mutex` rather than an `RwLock`. Actions are short; a single
/// lock is fine for an interactive tool.
pub type SharedWorkbench = Arc<Mutex<Workbench>>;

/// Create a new shared workbench from settings.
pub fn new_shared_workbench(settings: &Settings) -> SharedWorkbench {
    Arc::new(Mutex::new(Workbench::new(settings)))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for database upload.
#[derive(Debug, Deserialize)]
pub struct LoadDatabaseParams {
    /// Original filename of the uploaded file; its stem becomes the
    /// database identifier.
    pub filename: String,
}

/// Response after a database upload.
#[derive(Debug, Serialize)]
pub struct LoadDatabaseResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for database status.
#[derive(Debug, Serialize)]
pub struct DatabaseStatusResponse {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_count: Option<usize>,
}

/// Response for schema introspection.
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request to translate a question into SQL.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub question: String,
    /// Model variant; omitted means none selected, which is an error.
    pub model: Option<ModelVariant>,
}

/// Response from translation.
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request to execute one query slot.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub slot: QuerySlot,
    /// SQL text to store in the slot before executing; omitted means run
    /// the slot's current text.
    pub sql: Option<String>,
}

/// Response from query execution.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<ResultRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_results: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request to score predicted against expected SQL.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// Overrides the stored expected SQL when present.
    pub expected_sql: Option<String>,
}

/// Response from scoring.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleu_score: Option<f64>,
    /// Score formatted to 8 decimal digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/database?filename=x.sqlite - Load an uploaded database image.
pub async fn load_database(
    State(state): State<SharedWorkbench>,
    Query(params): Query<LoadDatabaseParams>,
    body: Bytes,
) -> Json<LoadDatabaseResponse> {
    let mut wb = state.lock().await;
    match wb.load_database(&params.filename, &body) {
        Ok(summary) => Json(LoadDatabaseResponse {
            success: true,
            database_id: Some(summary.database_id),
            table_count: Some(summary.table_count),
            error: None,
        }),
        Err(e) => Json(LoadDatabaseResponse {
            success: false,
            database_id: None,
            table_count: None,
            error: Some(e.to_string()),
        }),
    }
}

/// GET /api/database - Report whether a database is loaded.
pub async fn database_status(
    State(state): State<SharedWorkbench>,
) -> Json<DatabaseStatusResponse> {
    let wb = state.lock().await;
    Json(DatabaseStatusResponse {
        loaded: wb.has_database(),
        database_id: wb.session().database_id.clone(),
        table_count: wb.schema().map(|tables| tables.len()).ok(),
    })
}

/// DELETE /api/database - Unload the database and reset the session.
pub async fn unload_database(State(state): State<SharedWorkbench>) -> StatusCode {
    let mut wb = state.lock().await;
    wb.unload();
    StatusCode::OK
}

/// GET /api/schema - Schema of the loaded database.
pub async fn get_schema(State(state): State<SharedWorkbench>) -> Json<SchemaResponse> {
    let wb = state.lock().await;
    match wb.schema() {
        Ok(tables) => Json(SchemaResponse {
            success: true,
            tables: Some(tables),
            error: None,
        }),
        Err(e) => Json(SchemaResponse {
            success: false,
            tables: None,
            error: Some(e.to_string()),
        }),
    }
}

/// POST /api/translate - Translate a natural-language question into SQL.
pub async fn translate(
    State(state): State<SharedWorkbench>,
    Json(req): Json<TranslateRequest>,
) -> Json<TranslateResponse> {
    let mut wb = state.lock().await;
    match wb.translate(&req.question, req.model).await {
        Ok(sql) => Json(TranslateResponse {
            success: true,
            predicted_sql: Some(sql),
            error: None,
        }),
        Err(e) => Json(TranslateResponse {
            success: false,
            predicted_sql: None,
            error: Some(e.to_string()),
        }),
    }
}

/// POST /api/execute - Execute the SQL in one slot.
pub async fn execute(
    State(state): State<SharedWorkbench>,
    Json(req): Json<ExecuteRequest>,
) -> Json<ExecuteResponse> {
    let mut wb = state.lock().await;
    match wb.execute(req.slot, req.sql.as_deref()) {
        Ok(outcome) => Json(ExecuteResponse {
            success: true,
            columns: Some(outcome.columns),
            rows: Some(outcome.rows),
            no_results: Some(outcome.no_results),
            error: None,
        }),
        Err(e) => Json(ExecuteResponse {
            success: false,
            columns: None,
            rows: None,
            no_results: None,
            error: Some(e.to_string()),
        }),
    }
}

/// POST /api/score - Score predicted SQL against expected SQL.
pub async fn score(
    State(state): State<SharedWorkbench>,
    Json(req): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    let mut wb = state.lock().await;
    match wb.score(req.expected_sql.as_deref()).await {
        Ok(outcome) => Json(ScoreResponse {
            success: true,
            bleu_score: Some(outcome.bleu_score),
            display: Some(outcome.display),
            error: None,
        }),
        Err(e) => Json(ScoreResponse {
            success: false,
            bleu_score: None,
            display: None,
            error: Some(e.to_string()),
        }),
    }
}

/// GET /api/session - Full session snapshot.
pub async fn get_session(State(state): State<SharedWorkbench>) -> Json<QuerySession> {
    let wb = state.lock().await;
    Json(wb.session().clone())
}

/// GET /api/session/predicted.sql - Predicted SQL as plain text.
///
/// Lets a client fetch just the predicted query for copying or saving,
/// without parsing the session JSON.
pub async fn predicted_sql(State(state): State<SharedWorkbench>) -> impl IntoResponse {
    let wb = state.lock().await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        wb.session().predicted_sql.clone(),
    )
}
