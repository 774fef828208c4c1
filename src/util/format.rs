use std::time::SystemTime;

use time::{macros::format_description, OffsetDateTime};

/// `Rs. 1234.50` style display used everywhere money is shown.
pub fn format_currency(amount: f64) -> String {
    format!("Rs. {amount:.2}")
}

/// Shortest decimal form: `25.0` prints as `25`, `12.5` as `12.5`.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Wall-clock `HH:MM:SS` (UTC) for "last refreshed" labels.
pub fn clock_label(at: SystemTime) -> String {
    OffsetDateTime::from(at)
        .format(format_description!("[hour]:[minute]:[second] UTC"))
        .unwrap_or_else(|_| "--:--:--".to_string())
}
