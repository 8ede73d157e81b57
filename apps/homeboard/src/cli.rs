//! # Command Line Interface
//!
//! Every subcommand is a `cmd_*` function that returns its output as a
//! string, so tests can drive them without a terminal. [`run`] prints.

use crate::api;
use crate::config::ServerConfig;
use crate::configs::{self, ConfigsError};
use clap::{Parser, Subcommand};
use homeboard_core::{BoardId, BoardService, BoardStore, BoardView, CoreError, DEFAULT_BOARD_NAME};
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "homeboard", version, about = "Self-hosted dashboard board server")]
pub struct Cli {
    /// Path of the board database.
    #[arg(long, short = 'd', global = true, env = "HOMEBOARD_DB", default_value = "homeboard.redb")]
    pub database: PathBuf,

    /// Debug logging.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve(ServerConfig),

    /// Create an empty database.
    Init {
        /// Replace an existing database.
        #[arg(long)]
        force: bool,
    },

    /// List boards.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show one board.
    Show {
        name: String,
        /// Layout name (desktop, tablet, mobile).
        #[arg(long)]
        layout: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Create the bundled example board.
    Example {
        #[arg(default_value = DEFAULT_BOARD_NAME)]
        name: String,
    },

    /// Import a legacy board config file.
    Import {
        file: PathBuf,
        /// Board name; defaults to the name stored in the file.
        #[arg(long)]
        name: Option<String>,
    },

    /// Import every legacy config in a directory.
    ImportDir {
        #[arg(env = "HOMEBOARD_CONFIGS_DIR", default_value = "data/configs")]
        dir: PathBuf,
    },
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum CliError {
    #[error("database already exists: {} (use --force to replace it)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("database not found: {} (run `homeboard init` first)", .0.display())]
    NotInitialized(PathBuf),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Configs(#[from] ConfigsError),

    #[error("cannot render output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;

// =============================================================================
// COMMANDS
// =============================================================================

/// Create the database file with all tables.
pub fn cmd_init(db_path: &Path, force: bool) -> CliResult<String> {
    if db_path.exists() {
        if !force {
            return Err(CliError::AlreadyExists(db_path.to_path_buf()));
        }
        std::fs::remove_file(db_path)?;
    }
    BoardStore::open(db_path)?;
    tracing::info!(path = %db_path.display(), "initialized database");
    Ok(format!("Initialized {}", db_path.display()))
}

/// Open an existing database.
pub fn open_service(db_path: &Path) -> CliResult<BoardService> {
    if !db_path.exists() {
        return Err(CliError::NotInitialized(db_path.to_path_buf()));
    }
    Ok(BoardService::new(BoardStore::open(db_path)?))
}

pub fn cmd_list(db_path: &Path, json: bool) -> CliResult<String> {
    let boards = open_service(db_path)?.list_boards(true)?;
    if json {
        return Ok(serde_json::to_string_pretty(&boards)?);
    }
    if boards.is_empty() {
        return Ok("No boards".to_string());
    }

    let mut out = String::new();
    for board in &boards {
        let visibility = if board.is_public { "public" } else { "private" };
        out.push_str(&format!(
            "{:<24} {:<8} {:>3} items  {}\n",
            board.name, visibility, board.item_count, board.page_title
        ));
    }
    Ok(out.trim_end().to_string())
}

pub fn cmd_show(db_path: &Path, name: &str, layout: Option<&str>, json: bool) -> CliResult<String> {
    let board = open_service(db_path)?.board_by_name(name, layout, true)?;
    if json {
        return Ok(serde_json::to_string_pretty(&board)?);
    }
    Ok(render_board(&board))
}

fn render_board(board: &BoardView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}, {} columns)\n",
        board.name, board.layout.name, board.layout.column_count
    ));
    for section in &board.sections {
        let label = section.name.as_deref().unwrap_or("-");
        out.push_str(&format!("  [{:?}] {}\n", section.kind, label));
        for item in &section.items {
            let title = match (&item.app, &item.widget) {
                (Some(app), _) => app.name.clone(),
                (None, Some(widget)) => format!("<{}>", widget.kind),
                (None, None) => "?".to_string(),
            };
            out.push_str(&format!(
                "    {title} @ {},{} ({}x{})\n",
                item.x, item.y, item.width, item.height
            ));
        }
    }
    out.trim_end().to_string()
}

pub fn cmd_example(db_path: &Path, name: &str) -> CliResult<String> {
    let id = open_service(db_path)?.create_example_board(name)?;
    tracing::info!(board = %name, %id, "created example board");
    Ok(format!("Created example board {name} (id {id})"))
}

pub fn cmd_import(db_path: &Path, file: &Path, name: Option<&str>) -> CliResult<String> {
    let service = open_service(db_path)?;
    let config = configs::read_config_file(file)?;
    let board_name = name.unwrap_or(config.board_name()).to_string();
    let id = service.import_legacy(&config, name)?;
    tracing::info!(board = %board_name, %id, file = %file.display(), "imported legacy config");
    Ok(format!("Imported {board_name} (id {id})"))
}

/// Outcome of a directory import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<(String, BoardId)>,
    /// Config name and why it was skipped.
    pub skipped: Vec<(String, String)>,
}

/// Import every config in `dir` under its file name. A broken or
/// conflicting file is skipped and the rest still import.
pub fn cmd_import_dir(db_path: &Path, dir: &Path) -> CliResult<ImportReport> {
    let service = open_service(db_path)?;
    let mut report = ImportReport::default();

    for path in configs::list_config_files(dir)? {
        let Some(name) = configs::config_name(&path) else {
            continue;
        };
        let imported = configs::read_config_file(&path)
            .map_err(CliError::from)
            .and_then(|config| Ok(service.import_legacy(&config, Some(&name))?));
        match imported {
            Ok(id) => report.imported.push((name, id)),
            Err(e) => {
                tracing::warn!(config = %name, error = %e, "skipped config");
                report.skipped.push((name, e.to_string()));
            }
        }
    }
    Ok(report)
}

/// Summary line plus one line per skipped config.
pub fn render_report(report: &ImportReport) -> String {
    let mut out = format!(
        "Imported {}, skipped {}",
        report.imported.len(),
        report.skipped.len()
    );
    for (name, reason) in &report.skipped {
        out.push_str(&format!("\n  {name}: {reason}"));
    }
    out
}

async fn cmd_serve(db_path: &Path, config: &ServerConfig) -> CliResult<()> {
    let service = BoardService::new(BoardStore::open(db_path)?);
    if config.seed_example && service.ensure_example_board()? {
        tracing::info!(board = DEFAULT_BOARD_NAME, "seeded example board");
    }
    api::serve(service, config).await?;
    Ok(())
}

// =============================================================================
// DISPATCH
// =============================================================================

pub async fn run(cli: Cli) -> CliResult<()> {
    let db = cli.database.as_path();
    let output = match &cli.command {
        Command::Serve(config) => return cmd_serve(db, config).await,
        Command::Init { force } => cmd_init(db, *force)?,
        Command::List { json } => cmd_list(db, *json)?,
        Command::Show { name, layout, json } => cmd_show(db, name, layout.as_deref(), *json)?,
        Command::Example { name } => cmd_example(db, name)?,
        Command::Import { file, name } => cmd_import(db, file, name.as_deref())?,
        Command::ImportDir { dir } => render_report(&cmd_import_dir(db, dir)?),
    };
    println!("{output}");
    Ok(())
}
