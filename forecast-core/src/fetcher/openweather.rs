use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{ForecastError, RawForecastResponse};

use super::ForecastFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const UNIT_SYSTEM: &str = "metric";
const OUTPUT_MODE: &str = "xml";

/// `GET {base_url}/forecast` against the OpenWeather 5 day / 3 hour feed in
/// XML mode.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherFetcher {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    /// Parameters appended to every request, whatever the caller asked for.
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[
            ("appid", self.api_key.as_str()),
            ("units", UNIT_SYSTEM),
            ("mode", OUTPUT_MODE),
        ])
    }
}

/// Error bodies come back as JSON even in XML mode:
/// `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

#[async_trait]
impl ForecastFetcher for OpenWeatherFetcher {
    #[instrument(skip(self), fields(url = %self.forecast_url()))]
    async fn fetch(&self, query: &str) -> Result<RawForecastResponse, ForecastError> {
        let request = self.http.get(self.forecast_url()).query(&[("q", query)]);

        let res = self.decorate(request).send().await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather forecast response received");

        if status == StatusCode::NOT_FOUND {
            return Err(ForecastError::NotFound);
        }

        if !status.is_success() {
            let message = provider_message(&body).unwrap_or_else(|| status_line(status));
            warn!(%status, %message, "OpenWeather forecast request failed");
            return Err(ForecastError::Transport(message));
        }

        let raw = RawForecastResponse::from_xml(&body)?;
        debug!(entries = raw.entries.len(), "Decoded OpenWeather forecast");

        Ok(raw)
    }
}

fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .map(|err| err.message)
        .filter(|message| !message.is_empty())
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}
