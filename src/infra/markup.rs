//! Extraction of the pieces of server-rendered markup the client cares about.
//!
//! Everything here parses an offline document; nothing is navigated.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    AlertKind, CategoryOption, ChartData, FlashMessage, ImpactSummary, StatCard, StatKey,
    TrendPoint,
};
use crate::util::generate_id;

const CATEGORY_OPTIONS: &str = "select#id_waste_category option";
const CSRF_INPUT: &str = "input[name=\"csrfmiddlewaretoken\"]";
const STAT_CARDS: &str = ".card.bg-primary, .card.bg-success, .card.bg-info, .card.bg-warning";
const IMPACT_CHART: &str = "#impact-chart";
const TREND_CHART: &str = "#trend-chart";
const ALERTS: &str = ".alert";

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector {
        selector: &'static str,
        reason: String,
    },
}

fn selector(css: &'static str) -> Result<Selector, MarkupError> {
    Selector::parse(css).map_err(|err| MarkupError::Selector {
        selector: css,
        reason: format!("{err:?}"),
    })
}

/// Collapses runs of whitespace the way a browser renders option text.
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// What the pickup page offers: its category options and CSRF token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickupPage {
    pub options: Vec<CategoryOption>,
    pub csrf_token: Option<String>,
}

pub fn parse_pickup_page(html: &str) -> Result<PickupPage, MarkupError> {
    let document = Html::parse_document(html);
    let option_selector = selector(CATEGORY_OPTIONS)?;
    let csrf_selector = selector(CSRF_INPUT)?;

    let options = document
        .select(&option_selector)
        .map(|option| {
            let rate = option
                .value()
                .attr("data-rate")
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|rate| rate.is_finite());
            CategoryOption {
                id: option.value().attr("value").unwrap_or_default().trim().to_string(),
                label: element_text(&option),
                rate,
            }
        })
        .collect::<Vec<_>>();

    let csrf_token = document
        .select(&csrf_selector)
        .filter_map(|input| input.value().attr("value"))
        .map(str::to_string)
        .find(|token| !token.is_empty());

    debug!(
        event = "markup.pickup_page.parsed",
        options = options.len(),
        has_csrf = csrf_token.is_some()
    );
    Ok(PickupPage {
        options,
        csrf_token,
    })
}

/// Stat cards keyed by their `bg-*` role. When a role appears more than once
/// only the first card counts.
pub fn extract_stat_cards(html: &str) -> Result<Vec<StatCard>, MarkupError> {
    let document = Html::parse_document(html);
    let cards_selector = selector(STAT_CARDS)?;
    let mut cards: Vec<StatCard> = Vec::new();

    for element in document.select(&cards_selector) {
        let Some(key) = element.value().classes().find_map(StatKey::from_class) else {
            continue;
        };
        if cards.iter().any(|card| card.key == key) {
            continue;
        }
        cards.push(StatCard {
            key,
            inner_html: element.inner_html(),
        });
    }

    Ok(cards)
}

pub fn extract_chart_data(html: &str) -> Result<ChartData, MarkupError> {
    let document = Html::parse_document(html);
    let impact_selector = selector(IMPACT_CHART)?;
    let trend_selector = selector(TREND_CHART)?;

    let impact = document.select(&impact_selector).next().map(|element| {
        element
            .value()
            .attr("data-impact")
            .and_then(|raw| serde_json::from_str::<ImpactSummary>(raw).ok())
            .unwrap_or_default()
    });
    let trend = document.select(&trend_selector).next().map(|element| {
        element
            .value()
            .attr("data-trend")
            .and_then(|raw| serde_json::from_str::<Vec<TrendPoint>>(raw).ok())
            .unwrap_or_default()
    });

    Ok(ChartData { impact, trend })
}

/// Server "messages" rendered as Bootstrap alerts.
pub fn extract_alerts(html: &str) -> Result<Vec<FlashMessage>, MarkupError> {
    let document = Html::parse_document(html);
    let alert_selector = selector(ALERTS)?;

    Ok(document
        .select(&alert_selector)
        .filter_map(|element| {
            let kind = element
                .value()
                .classes()
                .find_map(AlertKind::from_class)
                .unwrap_or(AlertKind::Info);
            let text = element_text(&element);
            (!text.is_empty()).then(|| FlashMessage {
                id: generate_id("alert"),
                kind,
                text,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PICKUP_PAGE: &str = r#"
        <form method="post">
          <input type="hidden" name="csrfmiddlewaretoken" value="abc123">
          <select name="waste_category" id="id_waste_category">
            <option value="" selected>---------</option>
            <option value="1">Plastic - Rs.25.00/kg</option>
            <option value="2" data-rate="12.5">
                Paper - Rs.10/kg
            </option>
          </select>
          <input type="number" name="estimated_weight_kg" id="id_estimated_weight_kg">
        </form>
    "#;

    const DASHBOARD: &str = r#"
        <div class="row">
          <div class="card bg-success text-white"><div class="card-body"><h3>2</h3>Completed</div></div>
          <div class="card bg-primary text-white"><div class="card-body"><h3>5</h3>Total</div></div>
          <div class="card bg-primary"><div class="card-body">duplicate</div></div>
          <div class="card bg-light"><div class="card-body">ignored</div></div>
        </div>
        <canvas id="impact-chart" data-impact='{"trees_saved": "0.34", "co2_reduced": 16.4}'></canvas>
        <canvas id="trend-chart" data-trend='not json'></canvas>
    "#;

    #[test]
    fn pickup_page_yields_options_and_token() {
        let page = parse_pickup_page(PICKUP_PAGE).unwrap();
        assert_eq!(page.csrf_token.as_deref(), Some("abc123"));
        assert_eq!(page.options.len(), 3);
        assert!(page.options[0].is_placeholder());
        assert_eq!(page.options[1].label, "Plastic - Rs.25.00/kg");
        assert_eq!(page.options[1].rate, None);
        assert_eq!(page.options[1].resolve_rate(), Some(25.0));
        assert_eq!(page.options[2].label, "Paper - Rs.10/kg");
        assert_eq!(page.options[2].resolve_rate(), Some(12.5));
    }

    #[test]
    fn stat_cards_are_keyed_by_role() {
        let cards = extract_stat_cards(DASHBOARD).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].key, StatKey::Success);
        assert!(cards[0].inner_html.contains("<h3>2</h3>"));
        assert_eq!(cards[1].key, StatKey::Primary);
        assert!(cards[1].inner_html.contains("Total"));
    }

    #[test]
    fn chart_attributes_fall_back_to_defaults() {
        let charts = extract_chart_data(DASHBOARD).unwrap();
        let impact = charts.impact.expect("impact container present");
        assert_eq!(impact.trees_saved, 0.34);
        assert_eq!(impact.co2_reduced, 16.4);
        assert_eq!(impact.water_saved, 0.0);
        assert_eq!(charts.trend, Some(Vec::new()));

        let none = extract_chart_data("<p>no charts</p>").unwrap();
        assert_eq!(none, ChartData::default());
    }

    #[test]
    fn alerts_carry_kind_and_text() {
        let html = r#"
            <div class="alert alert-success alert-dismissible fade show">
                Pickup request submitted.
                <button type="button" class="btn-close"></button>
            </div>
            <div class="alert alert-danger">Please correct the errors below.</div>
        "#;
        let alerts = extract_alerts(html).unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Success);
        assert_eq!(alerts[0].text, "Pickup request submitted.");
        assert_eq!(alerts[1].kind, AlertKind::Danger);
    }
}
