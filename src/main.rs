//! gdql — command-line front end for the GDQL query language.
//!
//! Runs a query from the arguments, a file (`-f`), or stdin (`-`) against a
//! SQLite catalog, and prints the result in the format the query asked for.
//! `gdql init` creates a database with the schema and sample catalog.

use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use gdql::data::sqlite::{self, SqliteStore};
use gdql::format::{self, Format};
use gdql::{CancelToken, Executor};

#[derive(Parser)]
#[command(
    name = "gdql",
    about = "Query a crowd-sourced live-music catalog with GDQL",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Database path
    #[arg(short = 'd', long = "db", env = "GDQL_DB", default_value = "shows.db")]
    db: PathBuf,

    /// Read the query from a file instead of the arguments
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// The query text; pass a single "-" to read it from stdin.
    /// Shells often mangle double quotes; prefer -f or stdin for quoted
    /// song names.
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a database with the schema and sample catalog
    Init {
        /// Path for the new database (default: shows.db)
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(Commands::Init { path }) = cli.command {
        let path = path.unwrap_or_else(|| cli.db.clone());
        sqlite::init(&path)?;
        eprintln!("Database created: {}", path.display());
        return Ok(());
    }

    let query = read_query(&cli)?;
    if query.is_empty() {
        return Err("no query; try `gdql SHOWS FROM 1977` or `gdql init`".into());
    }

    let store = SqliteStore::open(&cli.db)?;
    let executor = Executor::new(Arc::new(store));
    let ctx = CancelToken::new();
    let result = executor.execute(&ctx, &query)?;

    let out = format::format(&result, Format::from_output(result.output))?;
    println!("{out}");
    Ok(())
}

fn read_query(cli: &Cli) -> Result<String, Box<dyn Error>> {
    if let Some(path) = &cli.file {
        return Ok(std::fs::read_to_string(path)?.trim().to_string());
    }
    if cli.query.len() == 1 && cli.query[0] == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf.trim().to_string());
    }
    Ok(cli.query.join(" ").trim().to_string())
}
