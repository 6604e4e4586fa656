//! filter-table - Terminal table with per-column filter dropdowns
//!
//! Each column header hosts a dropdown listing "Clear" plus the column's
//! distinct values. Picking a value shows only the rows that carry it; "Clear"
//! shows every row again.

mod config;
mod core;
mod data;
mod frontend;

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use crossterm::event::KeyEvent;
use frontend::{Frontend, FrontendEvent};
use std::path::{Path, PathBuf};

#[derive(ClapParser)]
#[command(name = "filter-table")]
#[command(about = "Terminal table with per-column filter dropdowns", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset file (.json array or .toml with [[rows]])
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Hide the search box in header dropdowns
    #[arg(long)]
    no_search: bool,

    /// Custom config directory (default: ~/.filter-table)
    /// Can also be set via FILTER_TABLE_DIR environment variable
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset and report what the table would show
    ValidateData {
        /// Dataset file to check (defaults to --data or the configured file)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Print the table as plain text, optionally filtered on one column
    Print {
        /// Column title to filter on (Name or Type)
        #[arg(long, requires = "value")]
        column: Option<String>,

        /// Exact cell text to keep
        #[arg(long, requires = "column")]
        value: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging to file (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    // TUI apps can't log to stdout, so we write to a file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("filter-table.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let cli = Cli::parse();

    if let Some(dir) = &cli.config_dir {
        std::env::set_var(config::DIR_ENV_VAR, dir);
        tracing::info!("Using custom config directory: {:?}", dir);
    }

    let mut config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };
    if cli.no_search {
        config.ui.search_enabled = false;
    }

    match cli.command {
        Some(Commands::ValidateData { file }) => {
            let path = file.or_else(|| cli.data.clone()).or_else(|| config.data.file.clone());
            validate_data(path.as_deref())
        }
        Some(Commands::Print { column, value }) => {
            let rows = load_data(cli.data.as_deref(), &config)?;
            print_table(config, &rows, column.as_deref(), value.as_deref())
        }
        None => {
            let rows = load_data(cli.data.as_deref(), &config)?;
            run_tui(config, &rows)
        }
    }
}

/// Dataset from the CLI flag, then the config file, then the built-in rows
fn load_data(cli_path: Option<&Path>, config: &config::Config) -> Result<Vec<data::Datum>> {
    match cli_path.or(config.data.file.as_deref()) {
        Some(path) => {
            let rows = data::load_dataset(path)?;
            tracing::info!("Loaded {} rows from {:?}", rows.len(), path);
            Ok(rows)
        }
        None => Ok(data::default_dataset()),
    }
}

fn validate_data(path: Option<&Path>) -> Result<()> {
    let rows = match path {
        Some(path) => {
            println!("Validating data file: {:?}", path);
            data::load_dataset(path)
        }
        None => {
            println!("Validating built-in dataset");
            Ok(data::default_dataset())
        }
    };

    match rows {
        Ok(rows) => {
            println!("✓ Dataset loaded successfully");
            println!("  {} rows", rows.len());
            for column in data::Column::ALL {
                let mut values: Vec<String> = Vec::new();
                for row in &rows {
                    let value = row.field(column);
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                println!("  {}: {} distinct value(s)", column.title(), values.len());
            }
            if rows.is_empty() {
                println!("⚠ Warning: dataset is empty");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Failed to load dataset: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn print_table(
    config: config::Config,
    rows: &[data::Datum],
    column: Option<&str>,
    value: Option<&str>,
) -> Result<()> {
    let mut app = crate::core::AppCore::new(config, rows);

    if let Some(title) = column {
        let Some(column) = data::Column::from_title(title) else {
            bail!("Unknown column '{}' (expected Name or Type)", title);
        };
        app.table.filter(column, value);
    }

    print!("{}", frontend::plain::render_plain(&app.table));
    app.shutdown();
    Ok(())
}

/// Run TUI frontend
fn run_tui(config: config::Config, rows: &[data::Datum]) -> Result<()> {
    let mut app = crate::core::AppCore::new(config, rows);
    let mut frontend = frontend::TuiFrontend::new()?;
    frontend.set_poll_timeout(app.config.poll_timeout());

    let (width, height) = frontend.size();
    tracing::info!("Starting TUI at {}x{}", width, height);

    let result = event_loop(&mut app, &mut frontend);

    app.shutdown();
    frontend.cleanup().context("Failed to restore terminal")?;
    result
}

fn event_loop(app: &mut crate::core::AppCore, frontend: &mut dyn Frontend) -> Result<()> {
    while app.running {
        frontend.render(app)?;

        for event in frontend.poll_events()? {
            if let Some((x, y)) = event.left_click() {
                let target = frontend.hit_test(x, y);
                tracing::debug!(x, y, ?target, "Click");
                app.handle_click(target);
                continue;
            }

            match event {
                FrontendEvent::Key { code, modifiers } => {
                    app.handle_key(KeyEvent::new(code, modifiers));
                }
                FrontendEvent::Paste { text } => app.handle_paste(&text),
                FrontendEvent::Resize { width, height } => {
                    tracing::debug!("Resized to {}x{}", width, height);
                }
                FrontendEvent::Mouse { .. } => {}
            }
        }
    }
    Ok(())
}
