use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime, Weekday};

const ISO_DATE: &str = "[year]-[month]-[day]";
const BR_DATE: &str = "[day]/[month]/[year]";

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sunday => "Domingo",
        Weekday::Monday => "Segunda-feira",
        Weekday::Tuesday => "Terça-feira",
        Weekday::Wednesday => "Quarta-feira",
        Weekday::Thursday => "Quinta-feira",
        Weekday::Friday => "Sexta-feira",
        Weekday::Saturday => "Sábado",
    }
}

/// Label stored in `Trip::day`, e.g. `Segunda-feira (03/06)`.
pub fn trip_day_label(date: Date) -> String {
    format!(
        "{} ({:02}/{:02})",
        weekday_name(date.weekday()),
        date.day(),
        u8::from(date.month())
    )
}

pub fn format_date_br(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Accepts `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    [ISO_DATE, BR_DATE].iter().find_map(|pattern| {
        let items = time::format_description::parse(pattern).ok()?;
        Date::parse(raw, &items).ok()
    })
}

pub fn add_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(Duration::days(days))
}

pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn now_utc_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}
