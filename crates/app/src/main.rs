use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "banktab", version, about = "Label ABN AMRO TAB statement exports")]
struct Cli {
    /// Data directory (defaults to the platform app-data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse statement files, run a labeling pass and store the result
    Import {
        /// TAB export files, concatenated in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print stored transactions with their labels
    List,
    /// Drop all stored label refs and run a fresh pass with the current labels
    Relabel,
    /// Manage the label catalog
    Labels {
        #[command(subcommand)]
        command: LabelsCommand,
    },
}

#[derive(Subcommand)]
enum LabelsCommand {
    /// Print the stored labels
    Show,
    /// Write the default starter labels (refuses to overwrite)
    Init,
    /// Export the labels to a JSON file
    Export { file: PathBuf },
    /// Replace the stored labels with a JSON file (atomic: all or nothing)
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = commands::open_store(cli.data_dir)?;

    match cli.command {
        Command::Import { files } => commands::import(&store, &files),
        Command::List => commands::list(&store),
        Command::Relabel => commands::relabel(&store),
        Command::Labels { command } => match command {
            LabelsCommand::Show => commands::labels_show(&store),
            LabelsCommand::Init => commands::labels_init(&store),
            LabelsCommand::Export { file } => commands::labels_export(&store, &file),
            LabelsCommand::Import { file } => commands::labels_import(&store, &file),
        },
    }
}
