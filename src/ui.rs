use std::io::{self, IsTerminal};

use crate::app::StatusView;
use crate::domain::{AppData, Trip};
use crate::merge::MergeOutcome;
use crate::weeks::WeekSummary;

pub fn print_week(doc: &AppData) {
    let palette = Palette::auto();
    println!("{}", palette.heading(&doc.current_week_name));
    if doc.active_trips.is_empty() {
        println!("{}", palette.dim("no trips yet"));
        return;
    }
    for trip in &doc.active_trips {
        for line in format_trip(trip, &palette) {
            println!("{line}");
        }
    }
    println!(
        "{}",
        palette.dim(&format!("{} trip(s)", doc.active_trips.len()))
    );
}

fn format_trip(trip: &Trip, palette: &Palette) -> Vec<String> {
    let mut heading = format!("{} {}", palette.day(&trip.day), palette.direction(trip));
    if let Some(time) = trip.time.as_deref() {
        heading.push(' ');
        heading.push_str(&palette.dim(time));
    }
    let mut lines = vec![heading];
    if trip.participants.is_empty() {
        lines.push(format!("  {}", palette.dim("(nobody)")));
    }
    for participant in &trip.participants {
        let status = if participant.paid {
            palette.paid("[PAGO]")
        } else {
            palette.pending("[PENDENTE]")
        };
        lines.push(format!("  {} {}", status, participant.name));
    }
    lines
}

pub fn print_outcomes(outcomes: &[MergeOutcome]) {
    let palette = Palette::auto();
    for outcome in outcomes {
        let verb = if outcome.created { "added" } else { "updated" };
        println!(
            "{} {} - {} ({} participant(s))",
            palette.dim(verb),
            outcome.day,
            outcome.trip_type,
            outcome.participants
        );
    }
}

pub fn print_weeks(weeks: &[WeekSummary]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Weeks"));
    for week in weeks {
        println!("{}", format_week_row(week, &palette));
    }
}

fn format_week_row(week: &WeekSummary, palette: &Palette) -> String {
    let marker = if week.current { "*" } else { " " };
    format!(
        "{} {} {}",
        palette.day(marker),
        week.name,
        palette.dim(&format!(
            "({} trip(s), {} participant(s))",
            week.trips, week.participants
        ))
    )
}

pub fn print_status(status: &StatusView) {
    let palette = Palette::auto();
    for line in format_status(status, &palette) {
        println!("{line}");
    }
}

fn format_status(status: &StatusView, palette: &Palette) -> Vec<String> {
    vec![
        format!("{} {}", palette.dim("week:"), status.week),
        format!(
            "{} {} trip(s), {} archived week(s)",
            palette.dim("contents:"),
            status.trips,
            status.archives
        ),
        format!(
            "{} {}",
            palette.dim("loaded from:"),
            status.loaded_from.as_str()
        ),
        format!("{} {}", palette.dim("remote:"), status.remote),
        format!(
            "{} {}",
            palette.dim("connectivity:"),
            palette.connectivity(&status.connectivity)
        ),
        format!("{} {}", palette.dim("cache:"), status.cache_path),
    ]
}

pub fn print_connectivity(status: &str) {
    let palette = Palette::auto();
    println!("{} {}", palette.dim("connectivity:"), palette.connectivity(status));
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    #[cfg(test)]
    fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn day(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    fn direction(&self, trip: &Trip) -> String {
        self.paint("35", &format!("({})", trip.trip_type))
    }

    fn paid(&self, text: &str) -> String {
        self.paint("32", text)
    }

    fn pending(&self, text: &str) -> String {
        self.paint("31", text)
    }

    fn connectivity(&self, status: &str) -> String {
        let code = match status {
            "online" => "32",
            "offline" => "31",
            _ => "33",
        };
        self.paint(code, status)
    }
}
