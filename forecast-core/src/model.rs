//! Forecast data shapes.
//!
//! Two families live here:
//! - the *raw* shape, decoded straight from the provider's XML feed
//!   (`<weatherdata><forecast><time …/>…</forecast></weatherdata>`);
//! - the *canonical* shape handed to presentation code.
//!
//! Canonical values are read-only: their fields are private and every
//! entry carries exactly one weather condition.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ForecastError;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/w";

// ---------------------------------------------------------------------------
// Raw provider shape
// ---------------------------------------------------------------------------

/// One full provider response. Consumed by normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename = "weatherdata")]
pub struct RawForecastResponse {
    #[serde(rename = "forecast", deserialize_with = "forecast_entries")]
    pub entries: Vec<RawForecastEntry>,
}

/// One `<time>` element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawForecastEntry {
    #[serde(rename = "@from")]
    pub from_timestamp: String,

    /// Flattened from `<temperature value="…"/>`.
    #[serde(rename = "temperature", deserialize_with = "temperature_value")]
    pub temperature: f64,

    #[serde(rename = "symbol")]
    pub weather_icon: RawWeatherIcon,
}

/// The `<symbol name="…" var="…"/>` element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWeatherIcon {
    #[serde(rename = "@name")]
    pub description: String,

    #[serde(rename = "@var")]
    pub icon_code: String,
}

impl RawForecastResponse {
    /// Decode an XML body. Unknown elements and attributes are ignored;
    /// a missing required element or attribute is a `MalformedPayload`.
    pub fn from_xml(body: &str) -> Result<Self, ForecastError> {
        Ok(quick_xml::de::from_str(body)?)
    }
}

fn forecast_entries<'de, D>(deserializer: D) -> Result<Vec<RawForecastEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct ForecastElement {
        #[serde(rename = "time", default)]
        time: Vec<RawForecastEntry>,
    }

    ForecastElement::deserialize(deserializer).map(|forecast| forecast.time)
}

fn temperature_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct TemperatureElement {
        #[serde(rename = "@value")]
        value: f64,
    }

    TemperatureElement::deserialize(deserializer).map(|temperature| temperature.value)
}

// ---------------------------------------------------------------------------
// Canonical application shape
// ---------------------------------------------------------------------------

/// Ordered forecast entries, as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(rename = "list")]
    entries: Vec<ForecastEntry>,
}

impl ForecastResponse {
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(rename = "dt_txt")]
    date_text: String,
    main: Main,
    weather: [Weather; 1],
}

impl ForecastEntry {
    pub fn new(date_text: String, temp: f64, condition: Weather) -> Self {
        Self {
            date_text,
            main: Main { temp },
            weather: [condition],
        }
    }

    /// Provider timestamp text, untouched.
    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn main(&self) -> &Main {
        &self.main
    }

    /// Always exactly one element.
    pub fn weather(&self) -> &[Weather] {
        &self.weather
    }

    /// The single weather condition of this entry.
    pub fn condition(&self) -> &Weather {
        &self.weather[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Main {
    temp: f64,
}

impl Main {
    pub fn temp(&self) -> f64 {
        self.temp
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    description: String,
    icon: String,
}

impl Weather {
    pub fn new(description: String, icon: String) -> Self {
        Self { description, icon }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// PNG for this condition's icon code.
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}.png", self.icon)
    }
}
