use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, ForecastError, RawForecastResponse, fetcher::openweather::OpenWeatherFetcher};

pub mod openweather;

/// Issues one forecast request per call and decodes the provider payload.
///
/// Implementations must be stateless with respect to calls so a single
/// instance can serve concurrent tasks.
#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    /// `query` is a free-form "city[,country-code]" string, passed verbatim.
    async fn fetch(&self, query: &str) -> Result<RawForecastResponse, ForecastError>;
}

/// Construct the OpenWeather fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<OpenWeatherFetcher> {
    let api_key = config.api_key()?;
    Ok(OpenWeatherFetcher::with_base_url(api_key.to_owned(), config.base_url().to_owned()))
}
