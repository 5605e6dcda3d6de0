use crate::model::{
    ForecastEntry, ForecastResponse, RawForecastEntry, RawForecastResponse, Weather,
};

/// Reshape a raw provider response into the canonical model.
///
/// Structural only: timestamps and temperatures are moved across untouched,
/// and each entry's symbol becomes its single weather condition.
pub fn normalize(raw: RawForecastResponse) -> ForecastResponse {
    ForecastResponse::new(raw.entries.into_iter().map(normalize_entry).collect())
}

fn normalize_entry(raw: RawForecastEntry) -> ForecastEntry {
    let condition = Weather::new(raw.weather_icon.description, raw.weather_icon.icon_code);
    ForecastEntry::new(raw.from_timestamp, raw.temperature, condition)
}

impl From<RawForecastResponse> for ForecastResponse {
    fn from(raw: RawForecastResponse) -> Self {
        normalize(raw)
    }
}
