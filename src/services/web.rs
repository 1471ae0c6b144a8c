//! Axum-based HTTP server acting as the companion channel.
//!
//! Provides REST endpoints for:
//! - GET `/api/state` - Current face state
//! - POST `/api/config` - Companion configuration page result
//! - POST `/api/message` - Raw inbound message entries
//! - POST `/api/delivery` - Outbound delivery notification

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::messages::{parse_companion_settings, DeliveryStatus, InboundMessage};
use crate::traits::{RenderSurface, SettingsStore};

use super::api::{
    message_from_entries, ApiResponse, ConfigResponse, FaceStateResponse, MessageEntryRequest,
};
use super::shared::SharedFace;

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/state - Returns current face state
async fn get_state<R, S>(
    State(state): State<Arc<SharedFace<R, S>>>,
) -> Json<ApiResponse<FaceStateResponse>>
where
    R: RenderSurface + Send + 'static,
    S: SettingsStore + Send + 'static,
{
    let response = state.with_face(|face| FaceStateResponse::from_face(face));
    Json(ApiResponse::ok(response))
}

/// POST /api/config - Apply the companion page result
///
/// Accepts JSON: `{"seconds": "on", "invert": "off"}`
async fn post_config<R, S>(
    State(state): State<Arc<SharedFace<R, S>>>,
    body: Bytes,
) -> Json<ApiResponse<ConfigResponse>>
where
    R: RenderSurface + Send + 'static,
    S: SettingsStore + Send + 'static,
{
    let Some(settings) = parse_companion_settings(&body) else {
        return Json(ApiResponse::err("Invalid configuration payload"));
    };
    let message = InboundMessage::from(&settings);
    if message.is_empty() {
        return Json(ApiResponse::err("No settings in payload"));
    }
    apply(&state, &message)
}

/// POST /api/message - Apply raw message entries
///
/// Accepts JSON: `[{"key": 0, "value": "on"}, {"key": 1, "value": "off"}]`
async fn post_message<R, S>(
    State(state): State<Arc<SharedFace<R, S>>>,
    body: Bytes,
) -> Json<ApiResponse<ConfigResponse>>
where
    R: RenderSurface + Send + 'static,
    S: SettingsStore + Send + 'static,
{
    let entries: Vec<MessageEntryRequest> = match serde_json::from_slice(&body) {
        Ok(entries) => entries,
        Err(_) => return Json(ApiResponse::err("Invalid message entries")),
    };
    if entries.is_empty() {
        return Json(ApiResponse::err("Message has no entries"));
    }
    apply(&state, &message_from_entries(&entries))
}

/// POST /api/delivery - Record an outbound delivery notification
///
/// Accepts JSON: `"sent"`, `"failed"` or `"dropped"`
async fn post_delivery<R, S>(
    State(state): State<Arc<SharedFace<R, S>>>,
    body: Bytes,
) -> Json<ApiResponse<DeliveryStatus>>
where
    R: RenderSurface + Send + 'static,
    S: SettingsStore + Send + 'static,
{
    match serde_json::from_slice::<DeliveryStatus>(&body) {
        Ok(status) => {
            state.with_face(|face| face.on_delivery(status));
            Json(ApiResponse::ok(status))
        }
        Err(_) => Json(ApiResponse::err("Invalid delivery status")),
    }
}

fn apply<R, S>(state: &SharedFace<R, S>, message: &InboundMessage) -> Json<ApiResponse<ConfigResponse>>
where
    R: RenderSurface,
    S: SettingsStore,
{
    let response = state.with_face(|face| ConfigResponse::apply(face, message, state.now()));
    Json(ApiResponse::ok(response))
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<R, S>(state: Arc<SharedFace<R, S>>, config: &WebServerConfig) -> Router
where
    R: RenderSurface + Send + 'static,
    S: SettingsStore + Send + 'static,
{
    let mut router = Router::new()
        .route("/api/state", get(get_state::<R, S>))
        .route("/api/config", post(post_config::<R, S>))
        .route("/api/message", post(post_message::<R, S>))
        .route("/api/delivery", post(post_delivery::<R, S>))
        .fallback(not_found)
        .with_state(state);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server with shared state
///
/// Blocks until the server is shut down. Run [`run_ticker`](super::run_ticker)
/// on the same state to keep the hands moving.
pub async fn run_server_with_state<R, S>(
    state: Arc<SharedFace<R, S>>,
    config: WebServerConfig,
) -> Result<(), std::io::Error>
where
    R: RenderSurface + Send + 'static,
    S: SettingsStore + Send + 'static,
{
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("companion API listening on http://{}", config.addr);

    axum::serve(listener, router).await
}
