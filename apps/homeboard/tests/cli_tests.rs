//! Integration tests for Homeboard CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use homeboard::cli::{
    CliError, cmd_example, cmd_import, cmd_import_dir, cmd_init, cmd_list, cmd_show, open_service,
    render_report,
};
use homeboard_core::{BoardSummary, BoardView, CoreError};
use std::path::PathBuf;
use tempfile::TempDir;

const EXAMPLE: &str = include_str!("../../../crates/homeboard-core/assets/example-board.json");

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Initialize a database inside `dir`.
fn init_db(dir: &TempDir) -> PathBuf {
    let db_path = dir.path().join("homeboard.redb");
    cmd_init(&db_path, false).unwrap();
    db_path
}

/// Write a legacy config file.
fn write_config(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("{name}.json"));
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// INIT COMMAND TESTS
// =============================================================================

#[test]
fn test_init_creates_database() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("homeboard.redb");

    let result = cmd_init(&db_path, false);
    assert!(result.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_init_fails_if_exists_without_force() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);

    let result = cmd_init(&db_path, false);
    assert!(matches!(result, Err(CliError::AlreadyExists(_))));
}

#[test]
fn test_init_force_replaces_database() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);
    cmd_example(&db_path, "default").unwrap();

    cmd_init(&db_path, true).unwrap();
    assert_eq!(cmd_list(&db_path, false).unwrap(), "No boards");
}

#[test]
fn test_commands_require_database() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("missing.redb");

    assert!(matches!(
        open_service(&db_path),
        Err(CliError::NotInitialized(_))
    ));
    assert!(cmd_list(&db_path, false).is_err());
    assert!(!db_path.exists());
}

// =============================================================================
// LIST / SHOW COMMAND TESTS
// =============================================================================

#[test]
fn test_list_json_includes_private_boards() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);
    let service = open_service(&db_path).unwrap();
    service.create_board("public", true).unwrap();
    service.create_board("private", false).unwrap();
    drop(service);

    let output = cmd_list(&db_path, true).unwrap();
    let boards: Vec<BoardSummary> = serde_json::from_str(&output).unwrap();
    let names: Vec<_> = boards.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["private", "public"]);

    let text = cmd_list(&db_path, false).unwrap();
    assert!(text.contains("private"));
    assert!(text.lines().count() == 2);
}

#[test]
fn test_show_renders_board() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);
    cmd_example(&db_path, "demo").unwrap();

    let text = cmd_show(&db_path, "demo", None, false).unwrap();
    assert!(text.starts_with("demo (desktop, "));
    assert!(text.contains("Documentation"));
    assert!(text.contains("<clock>"));

    let json = cmd_show(&db_path, "demo", Some("mobile"), true).unwrap();
    let board: BoardView = serde_json::from_str(&json).unwrap();
    assert_eq!(board.layout.name, "mobile");
}

#[test]
fn test_show_unknown_board() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);

    let result = cmd_show(&db_path, "nope", None, false);
    assert!(matches!(
        result,
        Err(CliError::Core(CoreError::NotFound { .. }))
    ));
}

// =============================================================================
// EXAMPLE / IMPORT COMMAND TESTS
// =============================================================================

#[test]
fn test_example_twice_conflicts() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);

    cmd_example(&db_path, "default").unwrap();
    let result = cmd_example(&db_path, "default");
    assert!(matches!(
        result,
        Err(CliError::Core(CoreError::Conflict { .. }))
    ));
}

#[test]
fn test_import_uses_file_name_or_override() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);
    let file = write_config(temp.path(), "whatever", EXAMPLE);

    let output = cmd_import(&db_path, &file, None).unwrap();
    assert!(output.starts_with("Imported default"));

    let output = cmd_import(&db_path, &file, Some("copy")).unwrap();
    assert!(output.starts_with("Imported copy"));

    let boards = open_service(&db_path).unwrap().list_boards(true).unwrap();
    assert_eq!(boards.len(), 2);
}

#[test]
fn test_import_dir_skips_broken_files() {
    let temp = create_temp_dir();
    let db_path = init_db(&temp);
    let configs = temp.path().join("configs");
    std::fs::create_dir(&configs).unwrap();
    write_config(&configs, "lab", EXAMPLE);
    write_config(&configs, "home", EXAMPLE);
    write_config(&configs, "broken", "{ not json");
    std::fs::write(configs.join("readme.md"), "ignored").unwrap();

    let report = cmd_import_dir(&db_path, &configs).unwrap();
    let imported: Vec<_> = report.imported.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(imported, vec!["home", "lab"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "broken");

    let text = render_report(&report);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Imported 2, skipped 1");
    assert!(lines[1].starts_with("  broken: "));

    // a second run conflicts on every board
    let report = cmd_import_dir(&db_path, &configs).unwrap();
    assert!(report.imported.is_empty());
    assert_eq!(report.skipped.len(), 3);
}
