//! Popmart blind-box collection tracker CLI.
//!
//! Provides the `poptrack` binary. With no subcommand (or `shell`) it starts
//! the interactive shell over the SQLite database at `--db`; `list` prints
//! what the database currently holds and exits.

mod shell;

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use poptrack_core::Set;
use poptrack_storage::{SqliteStore, Tracker};

/// Popmart blind-box collection tracker.
#[derive(Parser)]
#[command(name = "poptrack", about = "Popmart blind-box collection tracker")]
struct Cli {
    /// Path to the collection database file.
    #[arg(short, long, env = "POPTRACK_DB_PATH", default_value = "poptrack.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default).
    Shell,

    /// Print every stored set and exit.
    List {
        /// Emit JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(&cli.db),
        Commands::List { json } => run_list(&cli.db, json),
    };
    process::exit(exit_code);
}

/// Opens the database and loads the whole collection.
///
/// Prints the failure and returns `Err(3)` when either step fails.
fn open_tracker(db_path: &Path) -> Result<Tracker<SqliteStore>, i32> {
    let store = SqliteStore::new(db_path).map_err(|e| {
        eprintln!(
            "Error: failed to open database '{}': {}",
            db_path.display(),
            e
        );
        3
    })?;

    Tracker::open(store).map_err(|e| {
        eprintln!("Error: failed to load collection: {}", e);
        3
    })
}

/// Execute the shell subcommand.
///
/// Returns exit code: 0 = success, 3 = storage or I/O error.
fn run_shell(db_path: &Path) -> i32 {
    let mut tracker = match open_tracker(db_path) {
        Ok(t) => t,
        Err(code) => return code,
    };

    tracing::info!(db = %db_path.display(), sets = tracker.collection().len(), "shell started");

    let stdin = io::stdin();
    let stdout = io::stdout();
    match shell::run(&mut tracker, stdin.lock(), stdout.lock()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("I/O error: {}", e);
            3
        }
    }
}

/// Execute the list subcommand.
fn run_list(db_path: &Path, json: bool) -> i32 {
    let tracker = match open_tracker(db_path) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let sets: Vec<&Set> = tracker.collection().sets().collect();
    if json {
        let json = serde_json::to_string_pretty(&sets).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize collection: {}\"}}", e)
        });
        println!("{}", json);
        return 0;
    }

    if sets.is_empty() {
        println!("No sets");
    }
    for set in sets {
        println!("{}\n{}\n", set, set.figure_listing());
    }
    0
}
