use crate::model::Status;
use crate::ui::shell::PAGE_DESCRIPTION;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jobtrack", version, about = PAGE_DESCRIPTION)]
pub struct Cli {
    /// Read the starting board from this YAML file
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive board
    Tui {
        /// Start with this search filter applied
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the board
    List {
        /// Only show cards whose company or role contains this text
        #[arg(long)]
        search: Option<String>,
        /// Only show one column
        #[arg(long)]
        status: Option<Status>,
        /// Print the board as a YAML seed file
        #[arg(long)]
        yaml: bool,
    },
}
