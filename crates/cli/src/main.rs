mod cli;
mod logging;

use clap::Parser;
use std::collections::HashMap;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use modkit_core::config::constants::ENV_MODE;
use modkit_core::{Diagnostic, Severity};
use modkit_core_full::commands::{build_command, scaffold_command, workspace_command};
use modkit_core_full::{BuildOptions, BuildResult};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let file_layer = match logging::create_log_file(args.cmd.root()) {
        Ok(log_file) => Some(
            fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(EnvFilter::new("debug")),
        ),
        Err(e) => {
            eprintln!("Logging to console only: {e}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .with(file_layer)
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match args.cmd {
        Commands::Build {
            root,
            mode,
            incremental,
            watch,
            json,
        } => {
            let mut env: HashMap<String, String> = std::env::vars().collect();
            if let Some(mode) = mode {
                env.insert(ENV_MODE.to_string(), mode);
            }
            let options = BuildOptions::new(root).env(env).incremental(incremental);

            match build_command(options, watch).await {
                Ok(Some(result)) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Ok(Some(result)) => print_summary(&result),
                Ok(None) => {}
                Err(failure) => {
                    for diagnostic in &failure.diagnostics {
                        print_diagnostic(diagnostic);
                    }
                    return Err(failure.into());
                }
            }
        }
        Commands::Workspace { root } => {
            let workspace = workspace_command(&root)?;
            println!("{}", serde_json::to_string_pretty(&workspace)?);
        }
        Commands::Scaffold { root, templates } => {
            let assets = scaffold_command(&root, &templates)?;
            println!("{}", serde_json::to_string_pretty(&assets)?);
        }
    }
    Ok(())
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    match diagnostic.severity {
        Severity::Info => info!("{}", diagnostic),
        Severity::Warn => warn!("{}", diagnostic),
        Severity::Error => error!("{}", diagnostic),
    }
}

fn print_summary(result: &BuildResult) {
    for diagnostic in &result.manifest.diagnostics {
        print_diagnostic(diagnostic);
    }
    let module = &result.manifest.module;
    info!(
        "Built {}@{}: {} artifacts, entry points [{}]",
        module.name,
        module.version,
        result.artifacts.len(),
        result.manifest.entry_points.join(", ")
    );
}
