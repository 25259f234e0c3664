use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use eagl_ledger::Ledger;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all node endpoints.
pub fn build_router(ledger: Arc<Ledger>, node_name: &str) -> Router {
    Router::new()
        .route("/ping", get(handler::ping))
        .route("/status", get(handler::status))
        .route(
            "/block",
            get(handler::latest_block).post(handler::append_block),
        )
        .route("/block/:index", get(handler::block_by_index))
        .route("/verify", get(handler::verify))
        .fallback(handler::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(ledger, node_name))
}
