//! API Explorer - build a request for any endpoint of a described API
//!
//! Loads the environment's schema documents (from the cache, fetching once
//! when missing), merges them, lets the operator pick an endpoint and answer
//! prompts for headers, parameters and the body, then prints the resulting
//! command line on stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use api_explorer::cli::{load_settings, report_error};
use api_explorer::{init_logging, ConsolePrompter};
use explorer_core::{BodyMode, Outcome, RequestAssembler, RequestTarget, Toolbox};
use openapi_schema::{DocumentMerger, MergeEntry, SchemaLoader};

/// Interactive API request builder
#[derive(Parser, Debug)]
#[command(name = "api-explorer")]
#[command(version)]
#[command(about = "Pick an endpoint, answer the prompts, get a ready-to-run command")]
struct Args {
    /// Environment to build the request for (default from settings)
    #[arg(short, long)]
    env: Option<String>,

    /// Re-fetch the schema documents before exploring
    #[arg(long)]
    refresh: bool,

    /// Settings file to use instead of the default location
    #[arg(long, env = "API_EXPLORER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding cached schema documents
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// How to produce the request body: interactive, template or example
    #[arg(long, default_value_t = BodyMode::Interactive)]
    body_mode: BodyMode,

    /// Write the current settings (defaults if none) to the settings file and exit
    #[arg(long)]
    init_config: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let manager = load_settings(args.config.as_deref())?;

    if args.init_config {
        manager.save()?;
        eprintln!("Wrote settings to {}", manager.path().display());
        return Ok(());
    }

    let settings = manager.get();
    let env_name = args
        .env
        .as_deref()
        .unwrap_or(&settings.default_environment);
    let environment = settings.environment(env_name)?;
    environment.validate()?;

    let cache_dir = match args.cache_dir {
        Some(dir) => dir,
        None => explorer_core::SettingsManager::default_cache_dir()?,
    };

    let loader = SchemaLoader::new()?;
    let mut entries = Vec::new();
    for source in environment.schema_sources(env_name, &cache_dir) {
        if args.refresh {
            let count = loader
                .refresh(&source)
                .await
                .with_context(|| format!("Failed to refresh schema {}", source.name))?;
            eprintln!("Refreshed {} ({} endpoints)", source.name, count);
        }

        let document = loader
            .load(&source)
            .await
            .with_context(|| format!("Failed to load schema {}", source.name))?;
        entries.push(MergeEntry::new(document, source.path_prefix.clone()));
    }

    let document = DocumentMerger::merge(&entries);
    info!("Merged {} schema documents", entries.len());

    let tools = Toolbox::from_settings(&settings.tools);
    let target = RequestTarget {
        environment: env_name,
        settings: environment,
        curl_command: settings.curl_command_for(environment),
    };
    let assembler = RequestAssembler::new(&document, target, &tools).body_mode(args.body_mode);

    let mut prompter = ConsolePrompter::stdio();
    match assembler.run(&mut prompter)? {
        Outcome::Command(command) => println!("{}", command),
        Outcome::Cancelled => eprintln!("No endpoint selected"),
    }

    Ok(())
}
