//! # HTTP API
//!
//! axum REST server over [`BoardService`]. Board operations are blocking
//! redb transactions, so handlers run them on the blocking pool.
//!
//! ## Endpoints
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/health` | - |
//! | GET/POST | `/api/boards` | optional / required |
//! | POST | `/api/boards/example` | required |
//! | GET/PATCH/DELETE | `/api/boards/{name}` | optional / required |
//! | PUT | `/api/boards/{name}/customization` | required |
//! | POST | `/api/boards/{name}/services` | required |
//! | GET | `/api/board-names/{name}/available` | - |
//! | GET | `/api/configs` | required |
//! | POST | `/api/configs/{name}/import` | required |

pub mod auth;
pub mod error;
pub mod extract;
mod handlers;

pub use error::{ApiError, ErrorBody, ErrorDetail};
pub use handlers::{
    AvailabilityResponse, CreateBoardRequest, CreatedBoard, ExampleBoardRequest, HealthResponse,
    RenameBoardRequest, ServicesAdded, ServicesRequest,
};

use crate::config::ServerConfig;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use homeboard_core::BoardService;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

// =============================================================================
// STATE
// =============================================================================

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<BoardService>,
    pub api_key: Option<Arc<str>>,
    pub configs_dir: Arc<PathBuf>,
    /// `None` when rate limiting is disabled.
    pub limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    pub fn new(boards: BoardService, config: &ServerConfig) -> Self {
        let limiter = NonZeroU32::new(config.rate_limit)
            .map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))));
        Self {
            boards: Arc::new(boards),
            api_key: config
                .api_key
                .as_deref()
                .filter(|key| !key.is_empty())
                .map(Arc::from),
            configs_dir: Arc::new(config.configs_dir.clone()),
            limiter,
        }
    }
}

// =============================================================================
// ROUTER
// =============================================================================

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route(
            "/boards",
            get(handlers::list_boards).post(handlers::create_board),
        )
        .route("/boards/example", post(handlers::create_example_board))
        .route(
            "/boards/{name}",
            get(handlers::get_board)
                .patch(handlers::rename_board)
                .delete(handlers::delete_board),
        )
        .route(
            "/boards/{name}/customization",
            put(handlers::update_customization),
        )
        .route("/boards/{name}/services", post(handlers::add_services))
        .route(
            "/board-names/{name}/available",
            get(handlers::name_available),
        )
        .route("/configs", get(handlers::list_configs))
        .route("/configs/{name}/import", post(handlers::import_config));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(limiter) = &state.limiter
        && limiter.check().is_err()
    {
        tracing::debug!(path = %request.uri().path(), "rate limited");
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}

// =============================================================================
// SERVER
// =============================================================================

/// Bind and serve until Ctrl+C.
pub async fn serve(boards: BoardService, config: &ServerConfig) -> std::io::Result<()> {
    let state = AppState::new(boards, config);
    if state.api_key.is_none() {
        tracing::warn!("no API key configured, running in open mode");
    }

    let app = router(state, &config.cors_origins);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "homeboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
