use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};

pub use crate::cli_ops::*;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "carona")]
#[command(bin_name = "carona")]
#[command(version)]
#[command(about = "A local-first, shared carpool ledger for the work week")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "CARONA_CONFIG",
        default_value = crate::config::DEFAULT_CONFIG_PATH,
        help = "Path to the TOML config file (missing file means defaults)."
    )]
    pub config: PathBuf,

    #[arg(
        long,
        global = true,
        env = "CARONA_DB_PATH",
        help = "Path to the local SQLite cache (overrides cache_path in the config)."
    )]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, help = "Print machine-readable JSON.")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Show the trips of the active week.")]
    Show,
    #[command(about = "Add or update trips for one day.")]
    Add(AddArgs),
    #[command(about = "Flip a participant between paid and pending.")]
    Toggle(ParticipantArgs),
    #[command(about = "Rename a participant on one trip.")]
    Rename(RenameArgs),
    #[command(about = "Remove a participant from one trip.")]
    Remove(ParticipantArgs),
    #[command(about = "Remove a whole trip from the active week.")]
    DropTrip(TripArgs),
    #[command(about = "List every participant name seen so far.")]
    Names,
    #[command(about = "Create, switch, delete and list weeks.")]
    Week(WeekArgs),
    #[command(about = "Print the shareable payment report.")]
    Report,
    #[command(about = "Write a JSON backup of the whole document.")]
    Export(ExportArgs),
    #[command(about = "Replace the whole document with a JSON backup.")]
    Import(ImportArgs),
    #[command(about = "Clear the local cache on this device (the remote is kept).")]
    Reset(ConfirmArgs),
    #[command(about = "Show load origin, remote and connectivity.")]
    Status(StatusArgs),
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
