//! Webhook endpoint receiving Telegram updates.
//!
//! Every delivery is answered with `200 OK` and an empty body, whatever
//! happens while handling it, so Telegram never redelivers an update.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tracing::{info, warn};

use crate::bot::{self, AppState};
use crate::platform::Update;

pub fn router(state: Arc<AppState>, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(handle_update))
        // an oversized update must still be acknowledged with 200
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Bind `addr` and serve the webhook until the process is killed.
pub async fn serve(state: Arc<AppState>, addr: &str, webhook_path: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Listening for webhooks on http://{}{}", addr, webhook_path);

    axum::serve(listener, router(state, webhook_path))
        .await
        .context("Server error")?;

    Ok(())
}

async fn handle_update(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Could not decode request body: {}", e);
            return StatusCode::OK;
        }
    };

    if let Some(event) = update.into_event() {
        bot::dispatch(&state, event).await;
    }

    StatusCode::OK
}
