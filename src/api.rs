//! REST API server for the swap engine
//!
//! Exposes the conversion resolver, the polled rate board, and the
//! assistant over HTTP endpoints. Integrates with frontend UI.

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::assistant::engine::AssistantEngine;
use crate::fees::FeeApiClient;
use crate::models::{ConversionRequest, CurrencyCode};
use crate::poller::RateBoard;
use crate::rates::ExchangeRateClient;
use crate::resolver::{resolve_conversion, LiveData};
use crate::state::ClientStateStore;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub amount: Option<f64>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub session_id: Option<String>,
    pub message: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

type SessionMap = HashMap<Uuid, Arc<Mutex<AssistantEngine>>>;

#[derive(Clone)]
pub struct ApiState {
    pub fees: FeeApiClient,
    pub rates: ExchangeRateClient,
    pub store: Arc<dyn ClientStateStore>,
    pub board: watch::Receiver<RateBoard>,
    pub sessions: Arc<RwLock<SessionMap>>,
}

impl ApiState {
    pub fn new(
        fees: FeeApiClient,
        rates: ExchangeRateClient,
        store: Arc<dyn ClientStateStore>,
        board: watch::Receiver<RateBoard>,
    ) -> Self {
        Self {
            fees,
            rates,
            store,
            board,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn session(&self, id: Uuid) -> Arc<Mutex<AssistantEngine>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(engine) = sessions.get(&id) {
                return engine.clone();
            }
        }

        let mut engine = AssistantEngine::new(
            self.fees.clone(),
            self.rates.clone(),
            self.store.clone(),
        );
        engine.hydrate().await;

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(engine)))
            .clone()
    }
}

/// =============================
/// Helpers — Stable Session Ids
/// =============================

fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

fn resolve_session_id(value: Option<&str>) -> Uuid {
    match value {
        Some(v) if !v.trim().is_empty() => {
            Uuid::parse_str(v).unwrap_or_else(|_| stable_uuid_from_string(v))
        }
        _ => Uuid::new_v4(),
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Quote Endpoint
/// =============================

async fn quote(
    State(state): State<ApiState>,
    Json(req): Json<QuoteRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let from = match CurrencyCode::from_str(&req.from) {
        Ok(code) => code,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string()))),
    };
    let to = match CurrencyCode::from_str(&req.to) {
        Ok(code) => code,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string()))),
    };

    info!("Quote requested: {:?} {} -> {}", req.amount, from, to);

    let request = ConversionRequest {
        amount: req.amount,
        from,
        to,
    };

    // Assemble live data concurrently; identity pairs skip the rate call.
    let rate_future = async {
        if from == to {
            None
        } else {
            state.rates.fetch_rate(from, to).await.ok()
        }
    };
    let (live_rate, fee_overrides) = tokio::join!(rate_future, state.fees.fetch_overrides());

    let result = resolve_conversion(
        &request,
        &LiveData {
            rate: live_rate,
            fees: fee_overrides,
        },
    );

    let advisory = if result.is_degraded() {
        Some("Live exchange rates could not be fetched. Showing estimated values.")
    } else {
        None
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "result": result,
            "degraded": result.is_degraded(),
            "usable": result.is_usable(),
            "advisory": advisory,
        }))),
    )
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat(
    State(state): State<ApiState>,
    Json(req): Json<ChatTurnRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let session_id = resolve_session_id(req.session_id.as_deref());

    let engine = state.session(session_id).await;
    let mut engine = engine.lock().await;

    // A chat turn implies the panel is open.
    engine.open_panel();

    match engine.handle_message(&req.message).await {
        Some(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "session_id": session_id.to_string(),
                "reply": outcome.reply,
                "action": outcome.action,
                "panel_open": engine.is_open(),
                "recent_queries": engine.recent_queries(),
            }))),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Empty message".to_string())),
        ),
    }
}

/// =============================
/// Rate Board Endpoints
/// =============================

async fn rate_board(State(state): State<ApiState>) -> Json<ApiResponse> {
    let board = state.board.borrow().clone();
    Json(ApiResponse::success(board))
}

async fn rate_history(State(state): State<ApiState>) -> Json<ApiResponse> {
    let history = state.board.borrow().history.clone();
    Json(ApiResponse::success(history))
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/quote", post(quote))
        .route("/api/chat", post(chat))
        .route("/api/rates", get(rate_board))
        .route("/api/rates/history", get(rate_history))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_uuid_is_deterministic() {
        let a = stable_uuid_from_string("visitor-42");
        let b = stable_uuid_from_string("visitor-42");
        let c = stable_uuid_from_string("visitor-43");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.get_version_num(), 4);
    }

    #[test]
    fn test_resolve_session_id_accepts_uuid_and_free_text() {
        let parsed = resolve_session_id(Some("6f71a1c4-33d7-4d54-9213-5b14f6a010aa"));
        assert_eq!(
            parsed,
            Uuid::parse_str("6f71a1c4-33d7-4d54-9213-5b14f6a010aa").unwrap()
        );

        let derived = resolve_session_id(Some("my-browser-tab"));
        assert_eq!(derived, stable_uuid_from_string("my-browser-tab"));

        // Absent ids get a fresh session rather than a shared bucket.
        assert_ne!(resolve_session_id(None), resolve_session_id(None));
    }
}
