use crate::types::*;
use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use biodash_catalog::{CatalogQuery, Role, ViewOutput};
use biodash_core::{ConnectionParameters, Error, QueryResult};
use biodash_session::{
    CONNECT_FAILED_MESSAGE, CONNECT_OK_MESSAGE, CreateRequest, Page, SessionInfo,
    SessionService, attempt_connect, dashboard_for,
};
use biodash_store::Store;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub session_service: Arc<dyn SessionService>,
    /// Connection parameters used for fields a connect request leaves out
    pub defaults: ConnectionParameters,
}

pub fn create_router(
    store: Arc<dyn Store>,
    session_service: Arc<dyn SessionService>,
    defaults: ConnectionParameters,
) -> Router {
    let state = AppState {
        store,
        session_service,
        defaults,
    };

    Router::new()
        // Health check endpoints
        .route("/health", get(health_check))
        .route("/readiness", get(readiness_check))
        // API endpoints
        .route("/api/v1/catalog", get(catalog))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(get_session))
        .route("/api/v1/sessions/:id/connect", post(connect))
        .route("/api/v1/sessions/:id/search", get(search))
        .route("/api/v1/sessions/:id/views/:role", post(run_view))
        .route("/api/v1/sessions/:id/organisms", get(list_organisms))
        .route("/api/v1/sessions/:id/organisms/:name", get(organism_profile))
        // Middleware layers (applied in reverse order)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint - returns OK if the service is running
async fn health_check() -> impl IntoResponse {
    tracing::debug!("Health check requested");
    (StatusCode::OK, "OK")
}

/// Readiness check endpoint
///
/// The research database is contacted per request with each session's own
/// credentials, so readiness only covers the in-process services.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!(backend = state.store.system(), "Readiness check requested");
    (StatusCode::OK, "READY")
}

async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse::build())
}

async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionInfo>, AppError> {
    let session = state
        .session_service
        .create(&CreateRequest {
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(session.info()))
}

async fn get_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SessionInfo>, AppError> {
    let session = state.session_service.get(&session_id).await?;
    Ok(Json(session.info()))
}

async fn connect(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> Result<Response, AppError> {
    let session = state.session_service.get(&session_id).await?;
    let params = req.into_params(&state.defaults);

    let response = match attempt_connect(session.as_ref(), state.store.as_ref(), params).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ConnectResponse {
                connected: true,
                message: CONNECT_OK_MESSAGE.to_string(),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ConnectResponse {
                connected: false,
                message: CONNECT_FAILED_MESSAGE.to_string(),
                error: Some(e.to_string()),
            }),
        ),
    };

    Ok(response.into_response())
}

async fn search(
    Path(session_id): Path<String>,
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<QueryResult>, AppError> {
    let session = state.session_service.get(&session_id).await?;
    let dashboard = dashboard_for(session.as_ref(), state.store.clone())?;
    Ok(Json(dashboard.search(&params.term).await?))
}

async fn run_view(
    Path((session_id, role)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(req): Json<ViewRequestBody>,
) -> Result<Json<ViewOutput>, AppError> {
    let session = state.session_service.get(&session_id).await?;
    let dashboard = dashboard_for(session.as_ref(), state.store.clone())?;

    let role: Role = role.parse()?;
    let query = CatalogQuery::resolve(role, &req.query)?;
    session.set_page(Page::from(role));

    Ok(Json(dashboard.run_query(query, &req.domains).await?))
}

async fn list_organisms(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OrganismListResponse>, AppError> {
    let session = state.session_service.get(&session_id).await?;
    let dashboard = dashboard_for(session.as_ref(), state.store.clone())?;

    Ok(Json(OrganismListResponse {
        names: dashboard.organism_names().await?,
    }))
}

async fn organism_profile(
    Path((session_id, name)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<ViewOutput>, AppError> {
    let session = state.session_service.get(&session_id).await?;
    let dashboard = dashboard_for(session.as_ref(), state.store.clone())?;
    session.set_page(Page::OrganismProfiles);

    let profile = dashboard.organism_profile(&name).await?;
    Ok(Json(profile.into_view()))
}

// Error handling
pub struct AppError(Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotConnected => StatusCode::FORBIDDEN,
            Error::SessionError(_) | Error::OrganismNotFound(_) => StatusCode::NOT_FOUND,
            Error::UnknownQuery { .. } | Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Error::Connection(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        let json = serde_json::json!({
            "error": self.0.to_string()
        });
        (status, Json(json)).into_response()
    }
}
