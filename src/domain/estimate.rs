//! Payout estimation for a pickup request.
//!
//! - Resolves a per-kg rate for the selected category (structured rate first,
//!   then the `Rs.<n>` figure embedded in the option label).
//! - Turns the raw weight input into an estimate or a suppression reason.

use std::sync::OnceLock;

use regex::Regex;

use super::entities::{CategoryOption, WasteCategory};
use crate::util::format::{format_currency, format_number};

/// Heading shown in front of the estimated total.
pub const ESTIMATE_HEADING: &str = "Estimated Earnings: ";

const RATE_IN_LABEL: &str = r"Rs\.(\d+(?:\.\d+)?)";

fn rate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(RATE_IN_LABEL).expect("rate pattern is a valid regex"))
}

/// Extracts the first `Rs.<digits>[.<digits>]` figure from a display label.
pub fn rate_from_label(label: &str) -> Option<f64> {
    rate_pattern()
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

impl CategoryOption {
    /// Structured rate wins; the label is only consulted when none is attached.
    pub fn resolve_rate(&self) -> Option<f64> {
        self.rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .or_else(|| rate_from_label(&self.label))
    }

    pub fn apply_category(&mut self, category: &WasteCategory) {
        self.rate = Some(category.rate_per_kg);
        let rate_text = match category.rate_text.trim() {
            "" => format_number(category.rate_per_kg),
            text => text.to_string(),
        };
        self.label = format!("{} - Rs. {}/kg", category.name, rate_text);
    }
}

/// Copies rates from the category API onto matching options. Returns how many
/// options were updated.
pub fn apply_category_rates(options: &mut [CategoryOption], categories: &[WasteCategory]) -> usize {
    let mut updated = 0;
    for option in options.iter_mut().filter(|option| !option.id.is_empty()) {
        if let Some(category) = categories.iter().find(|cat| cat.id == option.id) {
            option.apply_category(category);
            updated += 1;
        }
    }
    updated
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimateResult {
    pub rate_per_kg: f64,
    pub weight_kg: f64,
    pub total: f64,
}

impl EstimateResult {
    pub fn total_display(&self) -> String {
        format_currency(self.total)
    }

    pub fn rate_line(&self) -> String {
        format!(
            "Rate: Rs. {}/kg × {}kg",
            format_number(self.rate_per_kg),
            format_number(self.weight_kg)
        )
    }
}

/// Why no estimate is shown. The display is hidden for every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuppressReason {
    NoCategory,
    NoRate,
    InvalidWeight,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EstimateOutcome {
    Ready(EstimateResult),
    Suppressed(SuppressReason),
}

impl EstimateOutcome {
    pub fn result(&self) -> Option<&EstimateResult> {
        match self {
            EstimateOutcome::Ready(result) => Some(result),
            EstimateOutcome::Suppressed(_) => None,
        }
    }
}

/// Parses the weight field. Only finite, strictly positive numbers qualify.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite() && *weight > 0.0)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Core computation: `rate × weight` rounded to two decimals.
pub fn estimate(rate: Option<f64>, weight_input: &str) -> EstimateOutcome {
    let Some(weight_kg) = parse_weight(weight_input) else {
        return EstimateOutcome::Suppressed(SuppressReason::InvalidWeight);
    };
    let Some(rate_per_kg) = rate.filter(|rate| rate.is_finite() && *rate > 0.0) else {
        return EstimateOutcome::Suppressed(SuppressReason::NoRate);
    };

    EstimateOutcome::Ready(EstimateResult {
        rate_per_kg,
        weight_kg,
        total: round_to_cents(rate_per_kg * weight_kg),
    })
}

/// Estimate for the currently selected option id (empty id means nothing
/// selected).
pub fn estimate_for_selection(
    options: &[CategoryOption],
    selected_id: &str,
    weight_input: &str,
) -> EstimateOutcome {
    if parse_weight(weight_input).is_none() {
        return EstimateOutcome::Suppressed(SuppressReason::InvalidWeight);
    }
    let selected = selected_id.trim();
    if selected.is_empty() {
        return EstimateOutcome::Suppressed(SuppressReason::NoCategory);
    }
    let Some(option) = options.iter().find(|option| option.id == selected) else {
        return EstimateOutcome::Suppressed(SuppressReason::NoCategory);
    };
    estimate(option.resolve_rate(), weight_input)
}
