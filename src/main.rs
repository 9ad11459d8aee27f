mod app;
mod backup;
mod cache;
mod cli;
mod cli_ops;
mod config;
mod db;
mod domain;
mod merge;
mod remote;
mod report;
mod sync;
mod trips;
mod ui;
mod weeks;

use app::{AddTripInput, App, AppError};
use cli::{Cli, Commands, WeekSubcommands};
use config::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::InvalidArgument(format!("json output failed: {err}")))?;
    println!("{text}");
    Ok(())
}

fn require_confirmation(yes: bool, action: &str) -> Result<(), AppError> {
    if yes {
        Ok(())
    } else {
        Err(AppError::InvalidArgument(format!(
            "{action} is destructive; re-run with --yes to confirm"
        )))
    }
}

fn run() -> Result<(), AppError> {
    use clap::Parser;

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let cache_path = cli.db.clone().unwrap_or_else(|| config.cache_path.clone());
    let mut app = App::open(&config, &cache_path)?;
    let result = dispatch(&mut app, &cli, &config);
    app.close();
    result
}

fn dispatch(app: &mut App, cli: &Cli, config: &Config) -> Result<(), AppError> {
    let json = cli.json;
    match &cli.command {
        Commands::Show => {
            if json {
                print_json(app.document())?;
            } else {
                ui::print_week(app.document());
            }
        }
        Commands::Add(args) => {
            let outcomes = app.add_trip(AddTripInput {
                date: args.date.clone(),
                directions: args.direction.trip_types(),
                time: args.time.clone(),
                selected: args.names.clone(),
                typed: args.typed.clone(),
            })?;
            if json {
                print_json(&outcomes)?;
            } else {
                ui::print_outcomes(&outcomes);
            }
        }
        Commands::Toggle(args) => {
            let paid = app.toggle_paid(&args.trip.date, args.trip.trip_type, &args.participant)?;
            if json {
                let toggled = serde_json::json!({
                    "participant": args.participant,
                    "paid": paid,
                });
                print_json(&toggled)?;
            } else {
                let label = if paid { "paid" } else { "pending" };
                println!("{} is now {}", args.participant, label);
            }
        }
        Commands::Rename(args) => {
            app.rename_participant(
                &args.trip.date,
                args.trip.trip_type,
                &args.participant,
                &args.new_name,
            )?;
            println!("renamed {} to {}", args.participant, args.new_name.trim());
        }
        Commands::Remove(args) => {
            let name = app.remove_participant(
                &args.trip.date,
                args.trip.trip_type,
                &args.participant,
            )?;
            println!("removed {}", name);
        }
        Commands::DropTrip(args) => {
            let day = app.remove_trip(&args.date, args.trip_type)?;
            println!("removed trip {} - {}", day, args.trip_type);
        }
        Commands::Names => {
            let names = app.known_names();
            if json {
                print_json(&names)?;
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
        Commands::Week(args) => run_week_command(app, &args.command, json)?,
        Commands::Report => {
            let report = app.report();
            if json {
                print_json(&serde_json::json!({ "report": report }))?;
            } else {
                println!("{report}");
            }
        }
        Commands::Export(args) => {
            let path = app.export(&args.dir)?;
            println!("exported {}", path.display());
        }
        Commands::Import(args) => {
            require_confirmation(args.yes, "import")?;
            let summary = app.import(&args.file)?;
            if json {
                print_json(&summary)?;
            } else {
                println!(
                    "imported '{}' ({} trip(s), {} archived week(s))",
                    summary.week, summary.trips, summary.archives
                );
            }
        }
        Commands::Reset(args) => {
            require_confirmation(args.yes, "reset")?;
            app.factory_reset();
            println!("local data cleared");
        }
        Commands::Status(args) => {
            let status = app.status();
            if json {
                print_json(&status)?;
            } else {
                ui::print_status(&status);
            }
            if args.watch {
                watch_connectivity(app, config);
            }
        }
    }
    Ok(())
}

fn run_week_command(
    app: &mut App,
    command: &WeekSubcommands,
    json: bool,
) -> Result<(), AppError> {
    match command {
        WeekSubcommands::New(args) => {
            let change = app.start_week(args.start.as_deref())?;
            if json {
                return print_json(&change);
            }
            if let Some(archived) = &change.archived {
                println!("archived {archived}");
            }
            println!("active week: {}", change.current);
        }
        WeekSubcommands::Select(args) => {
            let change = app.select_week(&args.name)?;
            if json {
                return print_json(&change);
            }
            if let Some(archived) = &change.archived {
                println!("archived {archived}");
            }
            println!("active week: {}", change.current);
        }
        WeekSubcommands::Delete(args) => {
            require_confirmation(args.yes, "week delete")?;
            let deleted = app.delete_week(&args.name)?;
            if json {
                return print_json(&deleted);
            }
            match deleted {
                weeks::DeletedWeek::Current => println!("cleared active week {}", args.name),
                weeks::DeletedWeek::Archive => println!("deleted {}", args.name),
            }
        }
        WeekSubcommands::Ls => {
            let weeks = app.list_weeks();
            if json {
                return print_json(&weeks);
            }
            ui::print_weeks(&weeks);
        }
    }
    Ok(())
}

/// Runs until the process is interrupted.
fn watch_connectivity(app: &App, config: &Config) {
    let monitor = sync::HealthMonitor::spawn_with(
        app.remote(),
        config.ping_interval(),
        Box::new(|status| ui::print_connectivity(status.as_str())),
    );
    log::debug!("watching connectivity, currently {}", monitor.status());
    monitor.wait();
}

#[cfg(test)]
mod main_tests;
