//! Webhook HTTP server.
//!
//! One POST endpoint for the NLU front end plus a health probe.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use platewire_orders::Fulfillment;

use crate::session_id::extract_session_id;
use crate::webhook::{WebhookRequest, WebhookResponse};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub fulfillment: Arc<Fulfillment>,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", post(handle_webhook))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the webhook HTTP server.
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = router(state);
    info!("PlateWire webhook server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "activeCarts": state.fulfillment.book().active_count().await,
    }))
}

/// The NLU webhook endpoint. Session id comes from the first output
/// context; an unidentifiable session still produces a reply rather than
/// a transport error.
async fn handle_webhook(
    State(state): State<GatewayState>,
    Json(payload): Json<WebhookRequest>,
) -> Json<WebhookResponse> {
    let query = payload.query_result;
    let session_id = query
        .output_contexts
        .first()
        .and_then(|ctx| extract_session_id(&ctx.name));

    debug!(
        intent = %query.intent.display_name,
        session = session_id.as_deref().unwrap_or("-"),
        "Webhook event"
    );

    let params = query.decode_params();
    let text = state
        .fulfillment
        .dispatch(&query.intent.display_name, &params, session_id.as_deref())
        .await;

    Json(WebhookResponse {
        fulfillment_text: text,
    })
}
