//! Axum web server exposing the workbench as a JSON API.
//!
//! The server owns a single shared [`Workbench`](crate::session::Workbench)
//! and drives it through the session action methods. Clients (a browser UI
//! or curl) hold no state of their own; `GET /api/session` returns the
//! full snapshot at any time.

pub mod handlers;
pub mod server;

pub use server::{router, serve};
