pub mod commands;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "rdlfix",
    version,
    about = "Add missing Tablix hierarchy elements to SSRS reports"
)]
pub struct Cli {
    /// Emit debug logs on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patch every report under a directory
    Fix(commands::fix::FixArgs),
    /// Write a default .rdlfix.yml
    Init(commands::init::InitArgs),
}
