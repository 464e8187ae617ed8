use crate::error::{ReceiverError, ServeError};
use crate::store::WebhookStore;
use crate::types::{
    Health, IngestResponse, PreassessmentPayload, ReceivedList, ServiceInfo, StatusMessage,
    WebhookRecord,
};
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const INGEST_PATH: &str = "/webhook/preassessment";
pub const RECEIVED_PATH: &str = "/webhook/received";

#[derive(Clone)]
struct ServerState {
    store: Arc<WebhookStore>,
}

/// Build the receiver's router around a shared store.
pub fn router(store: Arc<WebhookStore>) -> Router {
    let state = ServerState { store };

    Router::new()
        .route("/", get(handle_root))
        .route(INGEST_PATH, post(handle_webhook))
        .route(
            RECEIVED_PATH,
            get(handle_list_received).delete(handle_clear_received),
        )
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM.
pub async fn serve(addr: SocketAddr, store: Arc<WebhookStore>) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    let local = listener.local_addr()?;
    info!(addr = %local, "webhook receiver listening");
    info!("webhook endpoint: POST http://{local}{INGEST_PATH}");
    info!("view received: GET http://{local}{RECEIVED_PATH}");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("webhook receiver stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// Request id, available to handlers through `Extension<RequestId>`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn handle_root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Pre-assessment Webhook Receiver",
        version: env!("CARGO_PKG_VERSION"),
        endpoint: "POST /webhook/preassessment",
    })
}

async fn handle_webhook(
    State(state): State<ServerState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ReceiverError> {
    let payload = parse_payload(&body)
        .inspect_err(|e| warn!(%request_id, error = %e, "rejected webhook"))?;

    let received_at = Utc::now();
    let record = WebhookRecord::new(payload, received_at);
    let echoed = record.payload();

    let total = state.store.append(record).map_err(|e| {
        error!(%request_id, error = %e, "error processing webhook");
        ReceiverError::from(e)
    })?;

    info!(
        %request_id,
        organization_id = %echoed.organization_id,
        preassessment_id = %echoed.preassessment_id,
        regulation_id = %echoed.regulation_id,
        received_at = %received_at.to_rfc3339(),
        total,
        "pre-assessment webhook received"
    );

    Ok(Json(IngestResponse {
        status: "success",
        message: "Webhook received successfully",
        received_at,
        payload: echoed,
    }))
}

fn parse_payload(body: &[u8]) -> Result<PreassessmentPayload, ReceiverError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ReceiverError::MalformedBody(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(ReceiverError::MalformedBody(
            "expected a JSON object".to_string(),
        ));
    };
    PreassessmentPayload::from_object(object).map_err(ReceiverError::Validation)
}

async fn handle_list_received(
    State(state): State<ServerState>,
) -> Result<Json<ReceivedList>, ReceiverError> {
    let webhooks = state.store.list().inspect_err(|e| error!(error = %e, "listing webhooks"))?;
    Ok(Json(ReceivedList {
        total_received: webhooks.len(),
        webhooks,
    }))
}

async fn handle_clear_received(
    State(state): State<ServerState>,
) -> Result<Json<StatusMessage>, ReceiverError> {
    let count = state.store.clear().inspect_err(|e| error!(error = %e, "clearing webhooks"))?;
    info!(cleared = count, "received webhooks cleared");
    Ok(Json(StatusMessage {
        status: "success",
        message: format!("Cleared {count} webhooks"),
    }))
}

async fn handle_health(State(state): State<ServerState>) -> Result<Json<Health>, ReceiverError> {
    let webhooks_received = state
        .store
        .len()
        .inspect_err(|e| error!(error = %e, "counting webhooks"))?;
    Ok(Json(Health {
        status: "healthy",
        webhooks_received,
    }))
}

async fn handle_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(StatusMessage {
            status: "error",
            message: "Not found".to_string(),
        }),
    )
}
