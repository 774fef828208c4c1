//! Thin asynchronous client for the Kawadiwala web server.
//!
//! - Reads server-rendered pages (optionally flagged as background requests).
//! - Reads the public waste-category API.
//! - Posts the pickup-request form.

use reqwest::{header, Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ClientSettings, WasteCategory};
use crate::util::version::user_agent;

/// Header Django uses to recognise ajax-style requests.
pub const AJAX_HEADER: &str = "X-Requested-With";
pub const AJAX_HEADER_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("markup error: {0}")]
    Markup(#[from] super::markup::MarkupError),
}

/// Where a page fetch is coming from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMode {
    Navigation,
    Background,
}

#[derive(Clone, Debug)]
pub struct PageResponse {
    pub final_url: Url,
    pub html: String,
}

#[derive(Clone)]
pub struct KawadiClient {
    http: Client,
    base_url: Url,
    categories_path: String,
}

impl KawadiClient {
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        Self::with_base_url(&settings.base_url, &settings.categories_path)
    }

    pub fn with_base_url(base: &str, categories_path: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base)?;
        let builder = Client::builder().user_agent(user_agent());
        // Session and CSRF cookies have to survive between page load and submit.
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        Ok(Self {
            http: builder.build()?,
            base_url,
            categories_path: categories_path.to_string(),
        })
    }

    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    pub async fn fetch_page(&self, path: &str, mode: FetchMode) -> Result<PageResponse, ClientError> {
        let url = self.url(path)?;
        let mut request = self.http.get(url.clone());
        if mode == FetchMode::Background {
            request = request.header(AJAX_HEADER, AJAX_HEADER_VALUE);
        }
        debug!(event = "client.page.fetch_started", %url, ?mode);

        let response = request.send().await?.error_for_status()?;
        let final_url = response.url().clone();
        let html = response.text().await?;
        debug!(event = "client.page.fetch_completed", %final_url, bytes = html.len());
        Ok(PageResponse { final_url, html })
    }

    pub async fn get_waste_categories(&self) -> Result<Vec<WasteCategory>, ClientError> {
        let url = self.url(&self.categories_path)?;
        let records = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<WasteCategoryDto>>()
            .await?;

        let categories: Vec<WasteCategory> =
            records.into_iter().map(WasteCategory::from).collect();
        info!(event = "client.categories.loaded", count = categories.len());
        Ok(categories)
    }

    /// Posts URL-encoded form pairs to `path`. Redirects are followed, so the
    /// returned page is wherever the server sent us.
    pub async fn submit_form(
        &self,
        path: &str,
        pairs: &[(String, String)],
    ) -> Result<PageResponse, ClientError> {
        let url = self.url(path)?;
        let response = self
            .http
            .post(url.clone())
            .header(header::REFERER, url.as_str())
            .form(pairs)
            .send()
            .await?
            .error_for_status()?;
        let final_url = response.url().clone();
        let html = response.text().await?;
        info!(event = "client.form.submitted", %url, %final_url);
        Ok(PageResponse { final_url, html })
    }
}

#[derive(Debug, Deserialize)]
struct WasteCategoryDto {
    #[serde(deserialize_with = "string_from_json")]
    id: String,
    name: String,
    #[serde(default)]
    rate_per_kg: serde_json::Value,
    #[serde(default)]
    description: Option<String>,
}

impl From<WasteCategoryDto> for WasteCategory {
    fn from(dto: WasteCategoryDto) -> Self {
        // Decimal fields arrive as strings ("25.00"); keep that text for labels.
        let rate_text = match &dto.rate_per_kg {
            serde_json::Value::String(text) => text.trim().to_string(),
            serde_json::Value::Number(number) => number.to_string(),
            _ => String::new(),
        };
        let rate_per_kg = rate_text
            .parse::<f64>()
            .ok()
            .filter(|rate| rate.is_finite())
            .unwrap_or(0.0);
        Self {
            id: dto.id,
            name: dto.name,
            rate_per_kg,
            rate_text,
            description: dto.description.filter(|text| !text.trim().is_empty()),
        }
    }
}

fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> serde::de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryOption;

    #[test]
    fn category_records_accept_decimal_strings() {
        let raw = r#"[
            {"id": 1, "name": "Plastic", "rate_per_kg": "25.00", "description": ""},
            {"id": "2", "name": "Paper", "rate_per_kg": 12.5}
        ]"#;
        let categories: Vec<WasteCategory> = serde_json::from_str::<Vec<WasteCategoryDto>>(raw)
            .unwrap()
            .into_iter()
            .map(WasteCategory::from)
            .collect();

        assert_eq!(categories[0].id, "1");
        assert_eq!(categories[0].rate_per_kg, 25.0);
        assert_eq!(categories[0].rate_text, "25.00");
        assert_eq!(categories[0].description, None);
        assert_eq!(categories[1].id, "2");
        assert_eq!(categories[1].rate_per_kg, 12.5);
        assert_eq!(categories[1].rate_text, "12.5");
    }

    #[test]
    fn relabelled_option_keeps_the_api_rate_text() {
        let raw = r#"[{"id": 3, "name": "Metal", "rate_per_kg": "40.50"}, {"id": 4, "name": "Glass", "rate_per_kg": null}]"#;
        let categories: Vec<WasteCategory> = serde_json::from_str::<Vec<WasteCategoryDto>>(raw)
            .unwrap()
            .into_iter()
            .map(WasteCategory::from)
            .collect();
        let mut options = vec![
            CategoryOption { id: "3".into(), label: "Metal - Rs.30.00/kg".into(), rate: None },
        ];

        crate::domain::apply_category_rates(&mut options, &categories);

        assert_eq!(options[0].label, "Metal - Rs. 40.50/kg");
        assert_eq!(options[0].rate, Some(40.5));
        assert_eq!(categories[1].rate_per_kg, 0.0);
        assert_eq!(categories[1].rate_text, "");
    }

    #[test]
    fn paths_join_onto_base() {
        let client = KawadiClient::with_base_url("http://127.0.0.1:8000/", "api/waste-categories/")
            .unwrap();
        assert_eq!(
            client.url("/customer/").unwrap().as_str(),
            "http://127.0.0.1:8000/customer/"
        );
        assert_eq!(
            client.url("request-pickup/").unwrap().as_str(),
            "http://127.0.0.1:8000/request-pickup/"
        );
    }
}
