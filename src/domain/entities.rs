use serde::{Deserialize, Serialize};

/// A waste category as published by the category API.
#[derive(Clone, Debug, PartialEq)]
pub struct WasteCategory {
    pub id: String,
    pub name: String,
    pub rate_per_kg: f64,
    /// The rate as the API wrote it (`"25.00"`), used verbatim in labels.
    pub rate_text: String,
    pub description: Option<String>,
}

/// One entry of the pickup form's category selector.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryOption {
    /// Option value; empty for the "nothing selected" placeholder.
    pub id: String,
    pub label: String,
    /// Structured rate, when the server or the API supplied one.
    pub rate: Option<f64>,
}

impl CategoryOption {
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// Environmental impact figures shown in the doughnut chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct ImpactSummary {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub trees_saved: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub co2_reduced: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub water_saved: f64,
}

impl ImpactSummary {
    pub fn values(&self) -> [f64; 3] {
        [self.trees_saved, self.co2_reduced, self.water_saved]
    }

    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|value| *value <= 0.0)
    }
}

/// One month of the pickup trend line.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TrendPoint {
    #[serde(default)]
    pub month: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub count: f64,
}

/// Chart inputs read from the dashboard markup. `None` means the page has no
/// container for that chart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
    pub impact: Option<ImpactSummary>,
    pub trend: Option<Vec<TrendPoint>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertKind {
    /// Maps a Bootstrap `alert-*` class suffix.
    pub fn from_class(class: &str) -> Option<Self> {
        match class.strip_prefix("alert-")? {
            "success" => Some(AlertKind::Success),
            "info" | "primary" | "secondary" | "light" | "dark" => Some(AlertKind::Info),
            "warning" => Some(AlertKind::Warning),
            "danger" | "error" => Some(AlertKind::Danger),
            _ => None,
        }
    }
}

/// A server message lifted out of a returned page.
#[derive(Clone, Debug, PartialEq)]
pub struct FlashMessage {
    pub id: String,
    pub kind: AlertKind,
    pub text: String,
}

/// Accepts a JSON number, a numeric string or null. Anything unparseable reads
/// as zero.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct LenientNumber;

    impl<'de> serde::de::Visitor<'de> for LenientNumber {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number, a numeric string or null")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(if value.is_finite() { value } else { 0.0 })
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .unwrap_or(0.0))
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0.0)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0.0)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(LenientNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_defaults_missing_and_bad_values_to_zero() {
        let impact: ImpactSummary =
            serde_json::from_str(r#"{"trees_saved": "1.70", "co2_reduced": null, "water_saved": "lots"}"#)
                .unwrap();
        assert_eq!(impact.trees_saved, 1.7);
        assert_eq!(impact.co2_reduced, 0.0);
        assert_eq!(impact.water_saved, 0.0);

        let empty: ImpactSummary = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn trend_points_accept_numeric_strings() {
        let points: Vec<TrendPoint> =
            serde_json::from_str(r#"[{"month": "Jan", "count": 3}, {"month": "Feb", "count": "5"}]"#)
                .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].count, 5.0);
        assert_eq!(points[0].month, "Jan");
    }

    #[test]
    fn alert_classes_map_to_kinds() {
        assert_eq!(AlertKind::from_class("alert-success"), Some(AlertKind::Success));
        assert_eq!(AlertKind::from_class("alert-danger"), Some(AlertKind::Danger));
        assert_eq!(AlertKind::from_class("alert-dismissible"), None);
        assert_eq!(AlertKind::from_class("fade"), None);
    }
}
