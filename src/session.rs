//! The workbench session: explicit state plus the user actions.
//!
//! All interaction state lives in one [`QuerySession`] value owned by a
//! [`Workbench`], which the server and CLI drive through discrete action
//! methods. There is no ambient shared state; handlers receive the
//! workbench, mutate it, and return outcome values.
//!
//! Only one translation and one scoring request are meaningful at a time.
//! Overlapping requests are not coordinated beyond last-write-wins, which
//! is sufficient for a single-user interactive tool.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Settings;
use crate::db::{DbError, LoadedDatabase};
use crate::prompt::serialize_prompt;
use crate::remote::{format_score, ModelVariant, RemoteError, ScoringClient, TranslationClient};
use crate::render::{render_rows, ResultRow};
use crate::schema::Table;

/// Result type for session actions.
pub type SessionResult<T> = Result<T, SessionError>;

/// Which of the two SQL editors an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySlot {
    Predicted,
    Expected,
}

impl QuerySlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuerySlot::Predicted => "predicted",
            QuerySlot::Expected => "expected",
        }
    }
}

impl std::fmt::Display for QuerySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by session actions.
///
/// Input-validation variants fire before any I/O; the remaining variants
/// wrap the layer that failed. Every error is terminal for its single
/// action only; the rest of the session stays usable.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no database is loaded")]
    NoDatabase,

    #[error("the natural-language question is empty")]
    MissingQuestion,

    #[error("no model variant selected")]
    NoModelSelected,

    #[error("the {slot} SQL query is empty")]
    EmptySql { slot: QuerySlot },

    #[error("both predicted and expected SQL must be filled in before scoring")]
    IncompleteScorePair,

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("error executing {slot} SQL: {source}")]
    Execution {
        slot: QuerySlot,
        #[source]
        source: rusqlite::Error,
    },
}

/// Snapshot of the interaction state the UI renders from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuerySession {
    /// Identifier of the loaded database, if any.
    pub database_id: Option<String>,
    pub natural_language_query: String,
    pub predicted_sql: String,
    pub expected_sql: String,
    pub predicted_rows: Vec<ResultRow>,
    pub expected_rows: Vec<ResultRow>,
    /// Last BLEU score, if one was computed.
    pub similarity_score: Option<f64>,
}

impl QuerySession {
    fn sql_for(&self, slot: QuerySlot) -> &str {
        match slot {
            QuerySlot::Predicted => &self.predicted_sql,
            QuerySlot::Expected => &self.expected_sql,
        }
    }

    fn set_sql(&mut self, slot: QuerySlot, sql: String) {
        match slot {
            QuerySlot::Predicted => self.predicted_sql = sql,
            QuerySlot::Expected => self.expected_sql = sql,
        }
    }

    fn set_rows(&mut self, slot: QuerySlot, rows: Vec<ResultRow>) {
        match slot {
            QuerySlot::Predicted => self.predicted_rows = rows,
            QuerySlot::Expected => self.expected_rows = rows,
        }
    }
}

/// Summary returned after a successful database load.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSummary {
    pub database_id: String,
    pub table_count: usize,
}

/// Outcome of executing one query slot.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
    /// True when the query succeeded but returned nothing; the UI shows a
    /// "no results" notice, distinct from an execution error.
    pub no_results: bool,
}

/// Outcome of a scoring action.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreOutcome {
    pub bleu_score: f64,
    /// Score rounded to 8 decimal digits for display.
    pub display: String,
}

/// The workbench: loaded database, session state, and endpoint clients.
pub struct Workbench {
    translation: TranslationClient,
    scoring: ScoringClient,
    db: Option<LoadedDatabase>,
    session: QuerySession,
}

impl Workbench {
    pub fn new(settings: &Settings) -> Self {
        let http = reqwest::Client::new();
        let timeout = settings.endpoints.timeout();
        Self {
            translation: TranslationClient::new(
                http.clone(),
                settings.endpoints.translation_url.clone(),
                timeout,
            ),
            scoring: ScoringClient::new(http, settings.endpoints.scoring_url.clone(), timeout),
            db: None,
            session: QuerySession::default(),
        }
    }

    /// Current session snapshot.
    pub fn session(&self) -> &QuerySession {
        &self.session
    }

    /// True when a database is loaded.
    pub fn has_database(&self) -> bool {
        self.db.is_some()
    }

    /// Load a database from uploaded bytes, replacing any previous one.
    ///
    /// On failure the previous database and session survive untouched; on
    /// success the session resets to a fresh state for the new database.
    pub fn load_database(&mut self, filename: &str, bytes: &[u8]) -> SessionResult<DatabaseSummary> {
        let db = LoadedDatabase::load(filename, bytes)?;
        let table_count = db.schema()?.len();

        let summary = DatabaseSummary {
            database_id: db.database_id().to_string(),
            table_count,
        };
        self.session = QuerySession {
            database_id: Some(summary.database_id.clone()),
            ..QuerySession::default()
        };
        self.db = Some(db);
        Ok(summary)
    }

    /// Drop the loaded database and reset the session.
    pub fn unload(&mut self) {
        self.db = None;
        self.session = QuerySession::default();
    }

    /// Schema of the loaded database.
    pub fn schema(&self) -> SessionResult<Vec<Table>> {
        let db = self.db.as_ref().ok_or(SessionError::NoDatabase)?;
        Ok(db.schema()?)
    }

    /// Translate a natural-language question into SQL.
    ///
    /// Validation happens before any I/O: question non-empty, a model
    /// variant selected, a database loaded. The schema is re-extracted on
    /// every call so the prompt always reflects the loaded image.
    pub async fn translate(
        &mut self,
        question: &str,
        variant: Option<ModelVariant>,
    ) -> SessionResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SessionError::MissingQuestion);
        }
        let variant = variant.ok_or(SessionError::NoModelSelected)?;
        let db = self.db.as_ref().ok_or(SessionError::NoDatabase)?;

        let tables = db.schema()?;
        let prompt = serialize_prompt(db.database_id(), &tables, question);

        let sql = self.translation.translate(variant, &prompt).await?;

        self.session.natural_language_query = question.to_string();
        self.session.predicted_sql = sql.clone();
        Ok(sql)
    }

    /// Execute the SQL in one slot against the loaded database.
    ///
    /// `sql` overrides the slot's stored text when present (the expected
    /// editor is user-editable). Execution errors are labeled with the
    /// slot that failed and leave the other slot's results intact.
    pub fn execute(
        &mut self,
        slot: QuerySlot,
        sql: Option<&str>,
    ) -> SessionResult<ExecutionOutcome> {
        if let Some(sql) = sql {
            self.session.set_sql(slot, sql.to_string());
        }

        let sql = self.session.sql_for(slot).trim().to_string();
        if sql.is_empty() {
            return Err(SessionError::EmptySql { slot });
        }
        let db = self.db.as_ref().ok_or(SessionError::NoDatabase)?;

        let result = db
            .execute(&sql)
            .map_err(|source| SessionError::Execution { slot, source })?;

        let rows = render_rows(&result);
        let outcome = ExecutionOutcome {
            columns: result.columns,
            no_results: rows.is_empty(),
            rows: rows.clone(),
        };
        self.session.set_rows(slot, rows);
        Ok(outcome)
    }

    /// Score the predicted SQL against the expected SQL.
    ///
    /// `expected_sql` overrides the stored expected text when present.
    /// Both slots must be non-empty before the endpoint is called.
    pub async fn score(&mut self, expected_sql: Option<&str>) -> SessionResult<ScoreOutcome> {
        if let Some(sql) = expected_sql {
            self.session.expected_sql = sql.to_string();
        }

        if self.session.predicted_sql.trim().is_empty()
            || self.session.expected_sql.trim().is_empty()
        {
            return Err(SessionError::IncompleteScorePair);
        }

        let bleu_score = self
            .scoring
            .score(&self.session.expected_sql, &self.session.predicted_sql)
            .await?;

        self.session.similarity_score = Some(bleu_score);
        Ok(ScoreOutcome {
            bleu_score,
            display: format_score(bleu_score),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbench() -> Workbench {
        Workbench::new(&Settings::default())
    }

    #[tokio::test]
    async fn test_translate_requires_question() {
        let mut wb = workbench();
        let err = wb
            .translate("   ", Some(ModelVariant::Base))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingQuestion));
    }

    #[tokio::test]
    async fn test_translate_requires_model() {
        let mut wb = workbench();
        let err = wb.translate("list names", None).await.unwrap_err();
        assert!(matches!(err, SessionError::NoModelSelected));
    }

    #[tokio::test]
    async fn test_translate_requires_database() {
        let mut wb = workbench();
        let err = wb
            .translate("list names", Some(ModelVariant::Finetuned))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NoDatabase));
    }

    #[test]
    fn test_execute_requires_sql() {
        let mut wb = workbench();
        let err = wb.execute(QuerySlot::Predicted, None).unwrap_err();
        assert!(matches!(
            err,
            SessionError::EmptySql {
                slot: QuerySlot::Predicted
            }
        ));
    }

    #[tokio::test]
    async fn test_score_requires_both_slots() {
        let mut wb = workbench();
        wb.session.predicted_sql = "SELECT 1".to_string();
        let err = wb.score(None).await.unwrap_err();
        assert!(matches!(err, SessionError::IncompleteScorePair));
    }

    #[test]
    fn test_load_bad_bytes_keeps_state() {
        let mut wb = workbench();
        let err = wb.load_database("junk.sqlite", b"not a database").unwrap_err();
        assert!(matches!(err, SessionError::Db(DbError::NotADatabase)));
        assert!(!wb.has_database());
        assert!(wb.session().database_id.is_none());
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(QuerySlot::Predicted.to_string(), "predicted");
        assert_eq!(QuerySlot::Expected.to_string(), "expected");
    }
}
