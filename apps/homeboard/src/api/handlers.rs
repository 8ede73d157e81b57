//! Request handlers.

use super::AppState;
use super::auth::{Authorized, Caller};
use super::error::ApiError;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::configs;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use homeboard_core::{
    BoardId, BoardService, BoardSummary, BoardView, CustomizationInput, CustomizationView,
    DEFAULT_BOARD_NAME, ItemId, ServiceInput,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExampleBoardRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameBoardRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedBoard {
    pub id: BoardId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesRequest {
    pub services: Vec<ServiceInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesAdded {
    pub item_ids: Vec<ItemId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutQuery {
    pub layout: Option<String>,
}

/// Run a blocking board operation off the async runtime.
async fn blocking<T, E, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
    F: FnOnce(&BoardService) -> Result<T, E> + Send + 'static,
{
    let boards = state.boards.clone();
    tokio::task::spawn_blocking(move || op(&boards))
        .await
        .map_err(|e| ApiError::Internal(format!("board task failed: {e}")))?
        .map_err(Into::into)
}

// =============================================================================
// HANDLERS
// =============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn list_boards(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<BoardSummary>>, ApiError> {
    let boards = blocking(&state, move |b| b.list_boards(caller.authorized)).await?;
    tracing::debug!(count = boards.len(), "listed boards");
    Ok(Json(boards))
}

pub async fn get_board(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<LayoutQuery>,
    caller: Caller,
) -> Result<Json<BoardView>, ApiError> {
    let board = blocking(&state, move |b| {
        b.board_by_name(&name, query.layout.as_deref(), caller.authorized)
    })
    .await?;
    Ok(Json(board))
}

pub async fn name_available(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let checked = name.clone();
    let available = blocking(&state, move |b| b.check_name_available(&checked)).await?;
    Ok(Json(AvailabilityResponse { name, available }))
}

pub async fn create_board(
    State(state): State<AppState>,
    _auth: Authorized,
    ApiJson(req): ApiJson<CreateBoardRequest>,
) -> Result<(StatusCode, Json<CreatedBoard>), ApiError> {
    let name = req.name.clone();
    let id = blocking(&state, move |b| b.create_board(&req.name, req.is_public)).await?;
    tracing::info!(board = %name, %id, "created board");
    Ok((StatusCode::CREATED, Json(CreatedBoard { id, name })))
}

/// The body is optional; without one the board is called `default`.
pub async fn create_example_board(
    State(state): State<AppState>,
    _auth: Authorized,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedBoard>), ApiError> {
    let req: ExampleBoardRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ExampleBoardRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidRequest {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: format!("invalid example board request: {e}"),
        })?
    };
    let name = req.name.unwrap_or_else(|| DEFAULT_BOARD_NAME.to_string());
    let target = name.clone();
    let id = blocking(&state, move |b| b.create_example_board(&target)).await?;
    tracing::info!(board = %name, %id, "created example board");
    Ok((StatusCode::CREATED, Json(CreatedBoard { id, name })))
}

pub async fn rename_board(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    _auth: Authorized,
    ApiJson(req): ApiJson<RenameBoardRequest>,
) -> Result<StatusCode, ApiError> {
    let (from, to) = (name.clone(), req.name.clone());
    blocking(&state, move |b| b.rename_board(&from, &to)).await?;
    tracing::info!(from = %name, to = %req.name, "renamed board");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_board(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    _auth: Authorized,
) -> Result<StatusCode, ApiError> {
    let target = name.clone();
    blocking(&state, move |b| b.delete_board(&target)).await?;
    tracing::info!(board = %name, "deleted board");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_customization(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    _auth: Authorized,
    ApiJson(input): ApiJson<CustomizationInput>,
) -> Result<Json<CustomizationView>, ApiError> {
    let target = name.clone();
    let view = blocking(&state, move |b| b.update_customization(&target, &input)).await?;
    tracing::info!(board = %name, "updated customization");
    Ok(Json(view))
}

pub async fn add_services(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    _auth: Authorized,
    ApiJson(req): ApiJson<ServicesRequest>,
) -> Result<(StatusCode, Json<ServicesAdded>), ApiError> {
    let target = name.clone();
    let item_ids = blocking(&state, move |b| b.add_services(&target, &req.services)).await?;
    tracing::info!(board = %name, count = item_ids.len(), "added services");
    Ok((StatusCode::CREATED, Json(ServicesAdded { item_ids })))
}

pub async fn list_configs(
    State(state): State<AppState>,
    _auth: Authorized,
) -> Result<Json<Vec<String>>, ApiError> {
    let dir = state.configs_dir.clone();
    let names = blocking(&state, move |_| configs::list_config_names(&dir)).await?;
    Ok(Json(names))
}

/// Import `<configs_dir>/<name>.json` as a board called `name`.
pub async fn import_config(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    _auth: Authorized,
) -> Result<(StatusCode, Json<CreatedBoard>), ApiError> {
    let dir = state.configs_dir.clone();
    let target = name.clone();
    let id = blocking(&state, move |b| -> Result<BoardId, ApiError> {
        let config = configs::read_config(&dir, &target)?;
        Ok(b.import_legacy(&config, Some(&target))?)
    })
    .await?;
    tracing::info!(board = %name, %id, "imported legacy config");
    Ok((StatusCode::CREATED, Json(CreatedBoard { id, name })))
}
