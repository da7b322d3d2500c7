//! Typed per-product failures.
//!
//! One product failing must stay a value the orchestrator can count, never an
//! exception that aborts its batch siblings. Only the row source uses the
//! coarser `anyhow` path, because its failure aborts the whole invocation.
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote api error: status {status}, body {body}")]
    Api { status: StatusCode, body: String },
    #[error("non-json response: status {status}, content-type {content_type:?}, body {body}")]
    NonJson {
        status: StatusCode,
        content_type: Option<String>,
        body: String,
    },
}
