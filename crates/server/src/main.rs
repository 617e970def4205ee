use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use server_api::{ApiContext, SourcePolicy};
use shared::{
    domain::SessionId,
    error::{ApiError, ErrorCode},
    protocol::{ItemsRequest, ServerEvent, SessionView, SetModeRequest},
};
use storage::Storage;
use tokio::sync::broadcast::error::RecvError;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod app_state;
mod config;
mod extract;

use app_state::AppState;
use config::load_settings;
use extract::{payload_too_large_as_json, ApiJson, ApiPath};

const INDEX_HTML: &str = include_str!("../static/index.html");

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let sources = match settings.rng_seed {
        Some(seed) => SourcePolicy::Seeded(seed),
        None => SourcePolicy::Os,
    };
    let api = ApiContext::new(
        Storage::new(settings.max_sessions),
        settings.draw_delay(),
        sources,
    );

    spawn_idle_sweeper(api.clone(), settings.session_idle_ttl(), settings.sweep_interval());

    let state = AppState { api };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        draw_delay_ms = settings.draw_delay_ms,
        max_sessions = settings.max_sessions,
        "server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_idle_sweeper(api: ApiContext, ttl: chrono::Duration, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = server_api::evict_idle_sessions(&api, ttl).await;
            if evicted > 0 {
                info!(evicted, "idle sessions discarded");
            }
        }
    });
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/sessions", post(http_create_session))
        .route(
            "/sessions/:session_id",
            get(http_get_session).delete(http_end_session),
        )
        .route("/sessions/:session_id/mode", put(http_set_mode))
        .route(
            "/sessions/:session_id/items",
            post(http_add_items)
                .put(http_replace_items)
                .delete(http_clear_items),
        )
        .route(
            "/sessions/:session_id/items/:index",
            delete(http_remove_item),
        )
        .route("/sessions/:session_id/draw", post(http_draw))
        .route("/sessions/:session_id/result/keep", post(http_keep_result))
        .route(
            "/sessions/:session_id/result/remove",
            post(http_remove_result),
        )
        .route("/sessions/:session_id/events", get(ws_handler))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::map_response(payload_too_large_as_json))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_create_session(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let view = server_api::create_session(&state.api)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn http_get_session(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    server_api::get_session(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_end_session(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    server_api::end_session(&state.api, SessionId(session_id))
        .await
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_set_mode(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SetModeRequest>,
) -> ApiResult<Json<SessionView>> {
    server_api::set_mode(&state.api, SessionId(session_id), req.mode)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_add_items(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ItemsRequest>,
) -> ApiResult<Json<SessionView>> {
    server_api::add_items(&state.api, SessionId(session_id), &req.text)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_replace_items(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ItemsRequest>,
) -> ApiResult<Json<SessionView>> {
    server_api::replace_items(&state.api, SessionId(session_id), &req.text)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_clear_items(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    server_api::clear_items(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_remove_item(
    State(state): State<Arc<AppState>>,
    ApiPath((session_id, index)): ApiPath<(Uuid, usize)>,
) -> ApiResult<Json<SessionView>> {
    server_api::remove_item(&state.api, SessionId(session_id), index)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_draw(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    server_api::draw(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_keep_result(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    server_api::keep_result(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_remove_result(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> ApiResult<Json<SessionView>> {
    server_api::remove_result(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    let session_id = SessionId(session_id);
    if let Err(e) = server_api::get_session(&state.api, session_id).await {
        return reject(e).into_response();
    }
    let Some(ws) = ws else {
        return reject(ApiError::new(
            ErrorCode::Validation,
            "expected a websocket upgrade request",
        ))
        .into_response();
    };
    ws.on_upgrade(move |socket| ws_connection(state, socket, session_id))
}

async fn ws_connection(
    state: Arc<AppState>,
    socket: axum::extract::ws::WebSocket,
    session_id: SessionId,
) {
    use futures::{SinkExt, StreamExt};

    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.api.subscribe();

    let send_task = tokio::spawn(async move {
        loop {
            let event = match events_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(%session_id, skipped, "event subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if event.session_id() != session_id {
                continue;
            }
            let ended = matches!(event, ServerEvent::SessionEnded { .. });
            let text = match serde_json::to_string(&event) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if sender.send(Message::Text(text)).await.is_err() || ended {
                break;
            }
        }
        let _ = sender.close().await;
    });

    while let Some(Ok(_msg)) = receiver.next().await {}

    send_task.abort();
}

fn reject(error: ApiError) -> (StatusCode, Json<ApiError>) {
    (status_for(error.code), Json(error))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation | ErrorCode::IndexOutOfRange => StatusCode::BAD_REQUEST,
        ErrorCode::InsufficientItems => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Capacity => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
