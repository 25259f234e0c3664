//! Request handlers.
//!
//! The ledger uses a std `RwLock` and an append holds the write lock through
//! an fsync, so every handler that touches the ledger runs on the blocking
//! pool rather than parking an async worker.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use eagl_ledger::{Ledger, LedgerReader, LedgerWriter};
use eagl_types::Block;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task;

use crate::error::{ServerError, ServerResult};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub node_name: Arc<str>,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>, node_name: impl Into<Arc<str>>) -> Self {
        Self {
            ledger,
            node_name: node_name.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub node: String,
    pub blocks: usize,
    pub last_block: Block,
}

#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    #[serde(alias = "payload")]
    pub data: String,
}

async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok", "msg": "pong" }))
}

pub async fn status(State(state): State<AppState>) -> ServerResult<Json<StatusResponse>> {
    let ledger = state.ledger.clone();
    let head = blocking(move || Ok(ledger.head()?)).await?;
    Ok(Json(StatusResponse {
        node: state.node_name.to_string(),
        blocks: head.length,
        last_block: head.block,
    }))
}

pub async fn latest_block(State(state): State<AppState>) -> ServerResult<Json<Block>> {
    let ledger = state.ledger.clone();
    Ok(Json(blocking(move || Ok(ledger.latest()?)).await?))
}

/// `GET /block/{index}`. A non-numeric index is treated like a missing one.
pub async fn block_by_index(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> ServerResult<Json<Block>> {
    let index: u64 = index.parse().map_err(|_| ServerError::NotFound)?;
    let ledger = state.ledger.clone();
    blocking(move || Ok(ledger.get_by_index(index)?))
        .await?
        .map(Json)
        .ok_or(ServerError::NotFound)
}

pub async fn append_block(
    State(state): State<AppState>,
    Json(request): Json<AppendRequest>,
) -> ServerResult<(StatusCode, Json<Block>)> {
    let ledger = state.ledger.clone();
    let block = blocking(move || Ok(ledger.append(&request.data)?)).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

pub async fn verify(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let ledger = state.ledger.clone();
    let blocks = blocking(move || Ok(ledger.verify_chain()?)).await?;
    Ok(Json(json!({ "ok": true, "blocks": blocks })))
}

pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
