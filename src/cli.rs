use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "revim",
    version,
    about = "Vim-style diff navigation for pull request review pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the key bindings
    Keymap,

    /// Print the config file location and effective settings
    Config,

    /// Parse an embedded diff data blob and show the resulting diff list
    Inspect {
        /// JSON file to read, or `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },
}
