//! Clients for the hosted translation and scoring endpoints.
//!
//! Both endpoints live behind unversioned, unauthenticated hosts we do not
//! control. Calls are single-attempt and fail fast: these are interactive
//! foreground actions, not background jobs, so there is no retry or
//! backoff. Transport failures and contract violations (a missing response
//! field) are reported as distinct errors.

mod error;
pub mod score;
pub mod translate;

pub use error::{RemoteError, RemoteResult};
pub use score::{format_score, ScoringClient};
pub use translate::{ModelVariant, TranslationClient};
