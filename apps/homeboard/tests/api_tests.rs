//! Integration tests for the Homeboard HTTP API.
//!
//! Uses axum-test against an in-memory board store.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use homeboard::api::{self, AppState, CreatedBoard, ErrorBody, ServicesAdded};
use homeboard::config::ServerConfig;
use homeboard_core::{BoardService, BoardStore, BoardSummary, BoardView, CustomizationView};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

const KEY: &str = "test-key";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn config(api_key: Option<&str>, configs_dir: &Path) -> ServerConfig {
    ServerConfig {
        api_key: api_key.map(str::to_string),
        rate_limit: 0,
        configs_dir: configs_dir.to_path_buf(),
        ..ServerConfig::default()
    }
}

fn server_with(config: &ServerConfig) -> TestServer {
    let service = BoardService::new(BoardStore::in_memory().unwrap());
    let state = AppState::new(service, config);
    TestServer::new(api::router(state, &config.cors_origins)).unwrap()
}

fn secured_server() -> (TestServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    (server_with(&config(Some(KEY), dir.path())), dir)
}

async fn create_board(server: &TestServer, name: &str, is_public: bool) {
    server
        .post("/api/boards")
        .authorization_bearer(KEY)
        .json(&json!({ "name": name, "isPublic": is_public }))
        .await
        .assert_status(StatusCode::CREATED);
}

// =============================================================================
// HEALTH
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let (server, _dir) = secured_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// AUTH
// =============================================================================

#[tokio::test]
async fn test_mutation_requires_key() {
    let (server, _dir) = secured_server();

    let response = server
        .post("/api/boards")
        .json(&json!({ "name": "home" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorBody = response.json();
    assert_eq!(body.error.code, "unauthorized");

    server
        .post("/api/boards")
        .authorization_bearer("wrong")
        .json(&json!({ "name": "home" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_open_mode_allows_everything() {
    let dir = tempfile::tempdir().unwrap();
    let server = server_with(&config(None, dir.path()));

    server
        .post("/api/boards")
        .json(&json!({ "name": "home", "isPublic": false }))
        .await
        .assert_status(StatusCode::CREATED);
    server.get("/api/boards/home").await.assert_status_ok();
}

#[tokio::test]
async fn test_private_boards_need_key_to_read() {
    let (server, _dir) = secured_server();
    create_board(&server, "public", true).await;
    create_board(&server, "private", false).await;

    let anonymous: Vec<BoardSummary> = server.get("/api/boards").await.json();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].name, "public");

    let all: Vec<BoardSummary> = server
        .get("/api/boards")
        .authorization_bearer(KEY)
        .await
        .json();
    assert_eq!(all.len(), 2);

    server
        .get("/api/boards/private")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/boards/private")
        .authorization_bearer(KEY)
        .await
        .assert_status_ok();
}

// =============================================================================
// BOARDS
// =============================================================================

#[tokio::test]
async fn test_create_and_get_board() {
    let (server, _dir) = secured_server();

    let response = server
        .post("/api/boards")
        .authorization_bearer(KEY)
        .json(&json!({ "name": "home", "isPublic": true }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: CreatedBoard = response.json();
    assert_eq!(created.name, "home");

    let board: BoardView = server.get("/api/boards/home").await.json();
    assert_eq!(board.id, created.id);
    assert_eq!(board.layout.name, "desktop");

    let mobile: BoardView = server
        .get("/api/boards/home")
        .add_query_param("layout", "mobile")
        .await
        .json();
    assert_eq!(mobile.layout.column_count, 2);

    server
        .get("/api/boards/home")
        .add_query_param("layout", "tv")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_board_conflict_and_validation() {
    let (server, _dir) = secured_server();
    create_board(&server, "home", true).await;

    let response = server
        .post("/api/boards")
        .authorization_bearer(KEY)
        .json(&json!({ "name": "home" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<ErrorBody>().error.code, "conflict");

    let response = server
        .post("/api/boards")
        .authorization_bearer(KEY)
        .json(&json!({ "name": "no spaces" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorBody = response.json();
    assert_eq!(body.error.code, "validation_failed");
    assert_eq!(body.error.fields[0].field, "name");
}

#[tokio::test]
async fn test_malformed_requests_use_error_body() {
    let (server, _dir) = secured_server();

    let response = server
        .post("/api/boards")
        .authorization_bearer(KEY)
        .json(&json!({ "name": 5 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorBody = response.json();
    assert_eq!(body.error.code, "invalid_request");
    assert!(!body.error.message.is_empty());

    let response = server
        .post("/api/boards")
        .authorization_bearer(KEY)
        .text("name=home")
        .await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.json::<ErrorBody>().error.code, "invalid_request");

    create_board(&server, "home", true).await;
    let response = server
        .put("/api/boards/home/customization")
        .authorization_bearer(KEY)
        .json(&json!({ "layouts": "wide" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<ErrorBody>().error.code, "invalid_request");
}

#[tokio::test]
async fn test_name_availability() {
    let (server, _dir) = secured_server();
    create_board(&server, "home", true).await;

    let taken: serde_json::Value = server.get("/api/board-names/home/available").await.json();
    assert_eq!(taken["available"], false);
    let free: serde_json::Value = server.get("/api/board-names/work/available").await.json();
    assert_eq!(free["available"], true);
}

#[tokio::test]
async fn test_rename_and_delete() {
    let (server, _dir) = secured_server();
    create_board(&server, "old", true).await;

    server
        .patch("/api/boards/old")
        .authorization_bearer(KEY)
        .json(&json!({ "name": "new" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.get("/api/boards/old").await.assert_status(StatusCode::NOT_FOUND);
    server.get("/api/boards/new").await.assert_status_ok();

    server
        .delete("/api/boards/new")
        .authorization_bearer(KEY)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.get("/api/boards/new").await.assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/api/boards/new")
        .authorization_bearer(KEY)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_example_board() {
    let (server, _dir) = secured_server();

    // the body is optional
    let response = server
        .post("/api/boards/example")
        .authorization_bearer(KEY)
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<CreatedBoard>().name, "default");

    let board: BoardView = server.get("/api/boards/default").await.json();
    assert!(board.items().any(|i| i.widget.is_some()));

    server
        .post("/api/boards/example")
        .authorization_bearer(KEY)
        .json(&json!({ "name": "default" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = server
        .post("/api/boards/example")
        .authorization_bearer(KEY)
        .json(&json!({ "name": "demo" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<CreatedBoard>().name, "demo");

    let response = server
        .post("/api/boards/example")
        .authorization_bearer(KEY)
        .json(&json!({ "name": 5 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<ErrorBody>().error.code, "invalid_request");
}

// =============================================================================
// CUSTOMIZATION AND SERVICES
// =============================================================================

#[tokio::test]
async fn test_update_customization() {
    let (server, _dir) = secured_server();
    create_board(&server, "home", true).await;
    let board: BoardView = server.get("/api/boards/home").await.json();

    let response = server
        .put("/api/boards/home/customization")
        .authorization_bearer(KEY)
        .json(&json!({
            "customization": { "pageTitle": "Lab", "primaryColor": "#228be6" },
            "layouts": [{ "id": board.layout.id, "columnCount": 8 }]
        }))
        .await;
    response.assert_status_ok();
    let view: CustomizationView = response.json();
    assert_eq!(view.customization.page_title, "Lab");
    assert!(view.is_public);

    let board: BoardView = server.get("/api/boards/home").await.json();
    assert_eq!(board.layout.column_count, 8);
    assert_eq!(board.customization.primary_color, "#228be6");

    server
        .put("/api/boards/home/customization")
        .authorization_bearer(KEY)
        .json(&json!({ "customization": { "opacity": 150 } }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_add_services() {
    let (server, _dir) = secured_server();
    create_board(&server, "home", true).await;

    let response = server
        .post("/api/boards/home/services")
        .authorization_bearer(KEY)
        .json(&json!({
            "services": [
                { "name": "Grafana", "url": "https://grafana.example.com" },
                {
                    "name": "Sonarr",
                    "url": "https://sonarr.example.com",
                    "pingUrl": "http://sonarr:8989",
                    "integration": {
                        "kind": "sonarr",
                        "secrets": [{ "kind": "apiKey", "value": "hunter2" }]
                    }
                }
            ]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let added: ServicesAdded = response.json();
    assert_eq!(added.item_ids.len(), 2);

    let response = server.get("/api/boards/home").await;
    assert!(!response.text().contains("hunter2"));
    let board: BoardView = response.json();
    let items: Vec<_> = board.items().collect();
    assert_eq!(items.len(), 2);
    assert_eq!((items[1].x, items[1].y), (1, 0));
    assert_eq!(items[1].integrations[0].url, "http://sonarr:8989");
}

#[tokio::test]
async fn test_add_services_to_missing_board() {
    let (server, _dir) = secured_server();
    server
        .post("/api/boards/ghost/services")
        .authorization_bearer(KEY)
        .json(&json!({ "services": [] }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// LEGACY CONFIGS
// =============================================================================

#[tokio::test]
async fn test_list_and_import_configs() {
    let (server, dir) = secured_server();
    let example = include_str!("../../../crates/homeboard-core/assets/example-board.json");
    std::fs::write(dir.path().join("lab.json"), example).unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();

    let names: Vec<String> = server
        .get("/api/configs")
        .authorization_bearer(KEY)
        .await
        .json();
    assert_eq!(names, vec!["broken", "lab"]);

    let response = server
        .post("/api/configs/lab/import")
        .authorization_bearer(KEY)
        .await;
    response.assert_status(StatusCode::CREATED);
    let board: BoardView = server.get("/api/boards/lab").await.json();
    assert!(board.items().count() > 0);

    server
        .post("/api/configs/broken/import")
        .authorization_bearer(KEY)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    server
        .post("/api/configs/missing/import")
        .authorization_bearer(KEY)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/configs")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// =============================================================================
// RATE LIMIT
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let dir = tempfile::tempdir().unwrap();
    let server = server_with(&ServerConfig {
        rate_limit: 1,
        ..config(Some(KEY), dir.path())
    });

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<ErrorBody>().error.code, "rate_limited");
}
