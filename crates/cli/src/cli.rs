use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Type-check, bundle and hydrate the module manifest
    Build {
        /// Workspace root
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Build mode (build, publish, test); overrides MODKIT_MODE
        #[clap(short, long)]
        mode: Option<String>,
        /// Reuse an incremental bundle session
        #[clap(short, long)]
        incremental: bool,
        /// Watch
        #[clap(short, long)]
        watch: bool,
        /// Print the build result as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print the resolved workspace layout
    Workspace {
        /// Workspace root
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// List template files a provisioning tool copies into a new workspace
    Scaffold {
        /// Workspace root
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Template directory
        #[clap(short, long)]
        templates: PathBuf,
    },
}

impl Commands {
    pub fn root(&self) -> &PathBuf {
        match self {
            Commands::Build { root, .. }
            | Commands::Workspace { root }
            | Commands::Scaffold { root, .. } => root,
        }
    }
}

/// modkit command
#[derive(Parser)]
#[command(about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}
