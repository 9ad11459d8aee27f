use crate::domain::{AppData, Trip};

const EMPTY_WEEK: &str = "Nenhuma viagem registrada.";

/// Shareable plain-text summary of the active week.
pub fn render_report(doc: &AppData, fare_cents: u64) -> String {
    let payments: usize = doc.active_trips.iter().map(Trip::paid_count).sum();
    let total = fare_cents.saturating_mul(payments as u64);

    let mut lines = vec![
        format!("🚗 Relatório de Caronas - {}", doc.current_week_name),
        format!(
            "💰 Total pago: R$ {} ({} pagamento(s))",
            format_money(total),
            payments
        ),
    ];

    if doc.active_trips.is_empty() {
        lines.push(String::new());
        lines.push(EMPTY_WEEK.to_string());
    }
    for trip in &doc.active_trips {
        lines.push(String::new());
        lines.push(trip_heading(trip));
        for participant in &trip.participants {
            let status = if participant.paid {
                "✅ PAGO"
            } else {
                "❌ PENDENTE"
            };
            lines.push(format!("  {}: {}", participant.name, status));
        }
    }
    lines.join("\n")
}

fn trip_heading(trip: &Trip) -> String {
    match &trip.time {
        Some(time) => format!("📅 {} - {} às {}", trip.day, trip.trip_type, time),
        None => format!("📅 {} - {}", trip.day, trip.trip_type),
    }
}

/// `1234567` cents → `12.345,67`.
pub fn format_money(cents: u64) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{},{:02}", grouped, cents % 100)
}
