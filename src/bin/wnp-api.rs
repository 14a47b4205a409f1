/// What's New Panel proxy API
///
/// HTTP entry point for the panel message pipeline:
///
///  * [GET /] fetch all panel entries from Contentful, transform them and
///    respond with the message list
///  * [POST /] Contentful webhook - on publish, push the transformed
///    message to Remote Settings; on unpublish, delete its record
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use whatsnew::webhook::{WEBHOOK_TOKEN_HEADER, WEBHOOK_TOPIC_HEADER};
use whatsnew::{
    transform, ContentfulClient, ContentfulConfig, PublishAction, RemoteSettingsClient,
    RemoteSettingsConfig, WebhookPayload,
};

#[derive(Clone)]
struct AppState {
    contentful: ContentfulClient,
    store: RemoteSettingsClient,
    webhook_token: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Build the CMS and record-store clients once; request handlers only
    // ever see them through the shared state.
    let contentful = ContentfulClient::new(
        ContentfulConfig::from_env().expect("Invalid Contentful configuration"),
    );
    let store = RemoteSettingsClient::new(
        RemoteSettingsConfig::from_env().expect("Invalid Remote Settings configuration"),
    );
    let webhook_token = std::env::var("WEB_HOOKS_TOKEN").expect("WEB_HOOKS_TOKEN is not set");

    let state = Arc::new(AppState {
        contentful,
        store,
        webhook_token,
    });

    // CORS mirrors what the panel's consumers send: preflighted GET/POST
    // with the Contentful webhook headers.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            HeaderName::from_static(WEBHOOK_TOKEN_HEADER),
            HeaderName::from_static(WEBHOOK_TOPIC_HEADER),
        ])
        .max_age(Duration::from_secs(3600));

    // Build router
    let app = Router::new()
        .route("/", get(list_messages).post(handle_webhook))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state);

    // Run server
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("Invalid PORT");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("What's New Panel proxy listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Fetch all entries, transform them, and respond with the message list
async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let entries = state
        .contentful
        .fetch_all()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let messages = transform::transform(&entries);

    Ok(Json(serde_json::json!({ "messages": messages })))
}

/// Handle a publish/unpublish webhook from Contentful
async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<WebhookPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let token = headers
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if token != Some(state.webhook_token.as_str()) {
        return Err(AppError::Unauthorized);
    }

    let action = headers
        .get(WEBHOOK_TOPIC_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(PublishAction::from_topic)
        .ok_or(AppError::UnknownAction)?;

    match action {
        PublishAction::Publish => {
            let entry = state
                .contentful
                .fetch_one(&payload.sys.id)
                .await
                .map_err(|e| AppError::Upstream(e.to_string()))?;
            let message = transform::transform_entry(&entry);

            state
                .store
                .create_record(&message)
                .await
                .map_err(|e| AppError::Upstream(e.to_string()))?;

            tracing::info!("Published message {} to Remote Settings", message.id);
            Ok((StatusCode::CREATED, Json(serde_json::json!({ "message": "ok" }))))
        }
        PublishAction::Unpublish => {
            // The entry is already off the Delivery API; the Preview API
            // still serves it, which is enough to recover the record id.
            let entry = state
                .contentful
                .fetch_one_preview(&payload.sys.id)
                .await
                .map_err(|e| AppError::Upstream(e.to_string()))?;
            let message = transform::transform_entry(&entry);

            state
                .store
                .delete_record(&message.id)
                .await
                .map_err(|e| AppError::Upstream(e.to_string()))?;

            tracing::info!("Removed message {} from Remote Settings", message.id);
            Ok((StatusCode::OK, Json(serde_json::json!({ "message": "ok" }))))
        }
    }
}

/// Health check endpoint (liveness)
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "wnp-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// Error handling

#[derive(Debug)]
enum AppError {
    Unauthorized,
    UnknownAction,
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized request".to_string())
            }
            AppError::UnknownAction => (StatusCode::NOT_FOUND, "Invalid action".to_string()),
            AppError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({
            "error": message
        }))).into_response()
    }
}
