use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eagl_ledger::LedgerError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not found")]
    NotFound,

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Ledger(LedgerError::ShuttingDown) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound => json!({ "error": "Not found" }),
            Self::Ledger(LedgerError::Verification(e)) => json!({
                "ok": false,
                "error": e.to_string(),
                "index": e.index,
                "kind": e.kind,
            }),
            other => json!({ "error": other.to_string() }),
        };

        if status.is_server_error() {
            if status == StatusCode::SERVICE_UNAVAILABLE {
                warn!(error = %self, "request rejected");
            } else {
                error!(error = %self, "request failed");
            }
        }
        (status, Json(body)).into_response()
    }
}
