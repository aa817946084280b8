//! Short "time ago" labels shown next to each conversation in the sidebar.

use chrono::{DateTime, Datelike, Utc};

const MONTHS_FR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Formats `at` relative to `now`: minutes, hours, days, then a short date.
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);

    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "À l'instant".to_string();
    }
    if minutes < 60 {
        return format!("{}min", minutes);
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = elapsed.num_days();
    if days < 7 {
        return format!("{}j", days);
    }

    format!("{} {}", at.day(), MONTHS_FR[at.month0() as usize])
}
