use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::domain::TripType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Ida,
    Volta,
    Ambos,
}

impl DirectionArg {
    pub fn trip_types(self) -> Vec<TripType> {
        match self {
            DirectionArg::Ida => vec![TripType::Ida],
            DirectionArg::Volta => vec![TripType::Volta],
            DirectionArg::Ambos => TripType::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(
        short = 'd',
        long,
        help = "Trip date as YYYY-MM-DD or DD/MM/YYYY (defaults to today)."
    )]
    pub date: Option<String>,

    #[arg(short = 't', long = "type", value_enum, help = "Direction of the trip.")]
    pub direction: DirectionArg,

    #[arg(long, help = "Departure time as HH:MM.")]
    pub time: Option<String>,

    #[arg(
        long,
        default_value = "",
        help = "Extra names, one per line (merged with the positional names)."
    )]
    pub typed: String,

    #[arg(help = "Participant names; the trip ends up with exactly these people.")]
    pub names: Vec<String>,
}

#[derive(Debug, Args)]
pub struct TripArgs {
    #[arg(
        short = 'd',
        long,
        help = "Trip date (YYYY-MM-DD or DD/MM/YYYY) or stored day label."
    )]
    pub date: String,

    #[arg(short = 't', long = "type", help = "Trip direction: Ida or Volta.")]
    pub trip_type: TripType,
}

#[derive(Debug, Args)]
pub struct ParticipantArgs {
    #[command(flatten)]
    pub trip: TripArgs,

    #[arg(help = "Participant name or id.")]
    pub participant: String,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub trip: TripArgs,

    #[arg(help = "Current participant name or id.")]
    pub participant: String,

    #[arg(help = "New name.")]
    pub new_name: String,
}

#[derive(Debug, Args)]
pub struct WeekArgs {
    #[command(subcommand)]
    pub command: WeekSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum WeekSubcommands {
    #[command(about = "Archive the active week and start a new one.")]
    New(WeekNewArgs),
    #[command(about = "Make a stored week the active one.")]
    Select(WeekNameArgs),
    #[command(about = "Delete a week (the active one is emptied instead).")]
    Delete(WeekDeleteArgs),
    #[command(about = "List the active week and every archive.")]
    Ls,
}

#[derive(Debug, Args)]
pub struct WeekNewArgs {
    #[arg(short = 's', long, help = "First day of the week (YYYY-MM-DD or DD/MM/YYYY).")]
    pub start: Option<String>,
}

#[derive(Debug, Args)]
pub struct WeekNameArgs {
    #[arg(help = "Week name exactly as listed by `carona week ls`.")]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct WeekDeleteArgs {
    #[arg(help = "Week name exactly as listed by `carona week ls`.")]
    pub name: String,

    #[arg(long, help = "Confirm the deletion.")]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long, default_value = ".", help = "Directory that receives the backup file.")]
    pub dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(help = "Backup file produced by `carona export`.")]
    pub file: PathBuf,

    #[arg(long, help = "Confirm replacing the whole document.")]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct ConfirmArgs {
    #[arg(long, help = "Confirm the operation.")]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[arg(long, help = "Keep polling the remote and print connectivity changes.")]
    pub watch: bool,
}
