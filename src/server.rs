use crate::config::AppConfig;
use crate::context::AppContext;
use crate::dispatch::{Dispatcher, ViewUpdate};
use crate::events::{EventData, EventSource};
use crate::render::Figure;
use crate::session::{Session, SessionStore};
use crate::spatial::NearestOrigin;
use crate::types::Marker;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub struct AppState {
    pub context: AppContext,
    pub dispatcher: Dispatcher,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(context: AppContext, sessions: SessionStore) -> Self {
        Self {
            context,
            dispatcher: Dispatcher::with_default_handlers(),
            sessions,
        }
    }
}

#[derive(Deserialize)]
pub struct NearestParams {
    lat: f64,
    lon: f64,
}

pub fn router(state: Arc<AppState>, config: &AppConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/globe", get(globe_handler))
        .route("/api/origins", get(origins_handler))
        .route("/api/origins/nearest", get(nearest_handler))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/events/:source", post(post_event))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: AppConfig, context: AppContext) -> Result<()> {
    let sessions = SessionStore::with_idle_timeout(config.session_idle_timeout());
    let state = Arc::new(AppState::new(context, sessions));
    let addr = config.bind_addr()?;
    spawn_session_sweeper(state.clone());
    let app = router(state, &config);

    info!("Serving globe on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drops sessions whose page went away without closing them.
pub fn spawn_session_sweeper(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let period = (state.sessions.idle_timeout() / 4)
        .clamp(Duration::from_millis(10), Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = state.sessions.sweep();
            if evicted > 0 {
                info!("Evicted {} idle sessions ({} live)", evicted, state.sessions.len());
            }
        }
    })
}

async fn healthz() -> &'static str {
    "ok"
}

async fn globe_handler(State(state): State<Arc<AppState>>) -> Json<Figure> {
    Json(state.context.globe().clone())
}

async fn origins_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Marker>> {
    Json(state.context.origins().to_vec())
}

async fn nearest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearestParams>,
) -> Json<Option<NearestOrigin>> {
    Json(state.context.nearest_origin(params.lat, params.lon))
}

async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Session>) {
    let session = state.sessions.create();
    info!("Created session {} ({} live)", session.id, state.sessions.len());
    (StatusCode::CREATED, Json(session))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Session>, StatusCode> {
    state.sessions.get(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    if state.sessions.remove(&id) {
        info!("Closed session {}", id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Bodies that are empty or not event-shaped count as "no payload" rather than a bad request.
async fn post_event(
    State(state): State<Arc<AppState>>,
    Path((id, source)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Vec<ViewUpdate>>, StatusCode> {
    let source: EventSource = source.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    let payload = EventData::from_slice(&body);

    let updates = state
        .sessions
        .with_session(&id, |session| {
            let updates = state
                .dispatcher
                .dispatch(&state.context, session, source, payload.as_ref());
            debug!(
                "Session {} after {}: selection={:?} input={:?} markers={}",
                session.id,
                source,
                session.selection(),
                session.input_field(),
                session.map().markers().len()
            );
            updates
        })
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(updates))
}
