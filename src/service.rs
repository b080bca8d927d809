//! HTTP service: registry CRUD plus the plan trigger.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{PlanError, StorageError};
use crate::planner::plan_records;
use crate::records::Assignment;
use crate::store::JsonFileStore;
use crate::traits::{Collection, RegistryStore};

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub data_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RegistryStore>,
}

impl AppState {
    pub fn new(store: impl RegistryStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Plan(PlanError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Plan(PlanError::Graph(_)) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/villages", get(list_villages))
        .route("/relief_centers", get(list_relief_centers))
        .route("/add_village", post(add_village))
        .route("/add_relief_center", post(add_relief_center))
        .route("/generate_plan", post(generate_plan))
        .layer(cors)
        .with_state(state)
}

/// Open the file store from `config` and serve until Ctrl-C.
pub async fn run(config: ServiceConfig) -> std::io::Result<()> {
    let store = JsonFileStore::open(&config.data_dir).map_err(std::io::Error::other)?;
    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        data_dir = %config.data_dir.display(),
        "relief planner listening"
    );

    serve(listener, AppState::new(store), async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn list_villages(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let store = state.store.clone();
    let records = blocking(move || Ok(store.load(Collection::Villages)?)).await?;
    Ok(Json(records))
}

async fn list_relief_centers(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let store = state.store.clone();
    let records = blocking(move || Ok(store.load(Collection::ReliefCenters)?)).await?;
    Ok(Json(records))
}

async fn add_village(
    State(state): State<AppState>,
    Json(record): Json<Value>,
) -> Result<Json<StatusResponse>, ApiError> {
    append(state, Collection::Villages, record).await?;
    Ok(Json(StatusResponse {
        status: "village added".to_string(),
    }))
}

async fn add_relief_center(
    State(state): State<AppState>,
    Json(record): Json<Value>,
) -> Result<Json<StatusResponse>, ApiError> {
    append(state, Collection::ReliefCenters, record).await?;
    Ok(Json(StatusResponse {
        status: "center added".to_string(),
    }))
}

async fn generate_plan(State(state): State<AppState>) -> Result<Json<Vec<Assignment>>, ApiError> {
    let store = state.store.clone();
    let assignments = blocking(move || {
        let villages = store.load(Collection::Villages)?;
        let centers = store.load(Collection::ReliefCenters)?;
        Ok(plan_records(&villages, &centers)?)
    })
    .await?;
    Ok(Json(assignments))
}

async fn append(state: AppState, collection: Collection, record: Value) -> Result<(), ApiError> {
    if !record.is_object() {
        return Err(ApiError::BadRequest("request body must be a JSON object".to_string()));
    }
    let store = state.store.clone();
    blocking(move || Ok(store.append(collection, record)?)).await
}

/// Store I/O and planning are synchronous; keep them off the async workers.
async fn blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
}
