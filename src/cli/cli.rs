use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Shell-style commands against an in-memory filesystem.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML file describing the initial tree
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start from an illustrative Unix root layout
    #[clap(long)]
    pub skeleton: bool,

    /// Create /home/NAME, can be repeated
    #[clap(long = "home", value_name = "NAME")]
    pub homes: Vec<String>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Run COMMAND instead of reading standard input, can be repeated
    #[clap(short = 'c', long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,
}
