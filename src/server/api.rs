use crate::agent::{ ChatAgent, ChatError, ChatReply };
use crate::cli::Args;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    extract::{ Path, State },
    response::IntoResponse,
    http::StatusCode,
    Json,
};
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };
use log::{ error, info };

/// Shown on unhandled errors; deliberately distinct from the per-stage
/// fallback apologies.
const SERVICE_ERROR_APOLOGY: &str =
    "Something went wrong on our side. Please try again in a moment.";

#[derive(Clone)]
struct AppState {
    agent: Arc<ChatAgent>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    session_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn start_http_server(
    addr: &str,
    agent: Arc<ChatAgent>,
    args: Args
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/session", post(create_session_handler))
        .route("/history/{session_id}", get(history_handler))
        .route("/message", post(message_handler))
        .layer(cors)
        .with_state(AppState { agent });

    if args.enable_tls && args.tls_cert_path.is_some() && args.tls_key_path.is_some() {
        let cert_path = args.tls_cert_path.as_ref().unwrap();
        let key_path = args.tls_key_path.as_ref().unwrap();

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS API server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        info!("Starting HTTP API server on: http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

// The request body may carry a userId; session creation ignores it, so the
// body is not extracted at all.
async fn create_session_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.agent.create_session();
    Json(CreateSessionResponse { session_id })
}

async fn history_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>
) -> impl IntoResponse {
    match state.agent.history(&session_id).await {
        Ok(turns) => Json(turns).into_response(),
        Err(e) => {
            error!("History read failed for {}: {}", session_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply {
                    message: SERVICE_ERROR_APOLOGY.to_string(),
                    error: Some(e.to_string()),
                }),
            ).into_response()
        }
    }
}

async fn message_handler(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>
) -> impl IntoResponse {
    let result = state.agent.send_message(
        payload.user_id.as_deref(),
        payload.session_id.as_deref().unwrap_or_default(),
        payload.message.as_deref().unwrap_or_default(),
        &payload.language
    ).await;

    match result {
        Ok(reply) => Json(reply).into_response(),
        Err(ChatError::InvalidInput(message)) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
        }
        Err(e) => {
            error!("Unhandled chat error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply {
                    message: SERVICE_ERROR_APOLOGY.to_string(),
                    error: Some(e.to_string()),
                }),
            ).into_response()
        }
    }
}
