//! api-id-picker - pick a row identifier from the configured database
//!
//! Used by api-explorer for uuid fields. Prints only the picked uuid on
//! stdout; exits 0 without output when nothing is picked.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use api_explorer::cli::{load_settings, report_error};
use api_explorer::init_logging;
use explorer_core::{FzfSelector, IdLookup, PsqlRunner};

/// Interactive identifier picker for database tables
#[derive(Parser, Debug)]
#[command(name = "api-id-picker")]
#[command(version)]
#[command(about = "Select a table and a row, print the row's uuid")]
struct Args {
    /// Only offer rows belonging to this client
    #[arg(short, long)]
    client: Option<String>,

    /// Environment whose database is queried (default from settings)
    #[arg(short, long)]
    env: Option<String>,

    /// Settings file to use instead of the default location
    #[arg(long, env = "API_EXPLORER_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let manager = load_settings(args.config.as_deref())?;
    let settings = manager.get();
    let env_name = args
        .env
        .as_deref()
        .unwrap_or(&settings.default_environment);
    let environment = settings.environment(env_name)?;

    if let Some(client) = &args.client {
        eprintln!("Filtering by client: {}", client);
    }

    let selector = FzfSelector::new(&settings.tools.selector);
    let runner = PsqlRunner::new(&settings.tools.database, environment.database_url.clone());
    let lookup = IdLookup::new(&settings.id_lookup, &selector, &runner);

    match lookup.run(args.client.as_deref())? {
        Some(uuid) => println!("{}", uuid),
        None => eprintln!("Nothing selected"),
    }

    Ok(())
}
