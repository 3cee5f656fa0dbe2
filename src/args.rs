use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Clone)]
#[command(
    display_name = "ratingfit",
    author = "ratingfit",
    long_about = "Fits player ratings, first-mover advantage, and equal-strength draw rate from an encounter table"
)]
pub struct Args {
    /// Whitespace-separated game log: one `white black score` row per line,
    /// where `score` (`white`'s result) is `1`, `0.5`, or `0`
    #[arg(short, long, help = "Path to the encounter table file")]
    pub encounters: PathBuf,

    /// Whitespace-separated player table: one `name rating anchor` row per line,
    /// where `anchor` is `1` to hold that player's rating fixed, `0` otherwise
    #[arg(short, long, help = "Path to the initial player table file")]
    pub players: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    /// Suppresses the progress bar
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub quiet: bool,
}
