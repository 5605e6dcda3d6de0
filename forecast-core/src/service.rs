use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    ConnectivityGate, ForecastError, ForecastFetcher, ForecastResponse, normalize::normalize,
};

/// Gate → fetch → normalize, once per query.
///
/// Holds no mutable state; clones share the same gate and fetcher and can
/// run on as many tasks as the caller likes.
#[derive(Debug, Clone)]
pub struct ForecastService {
    gate: Arc<dyn ConnectivityGate>,
    fetcher: Arc<dyn ForecastFetcher>,
}

impl ForecastService {
    pub fn new(gate: Arc<dyn ConnectivityGate>, fetcher: Arc<dyn ForecastFetcher>) -> Self {
        Self { gate, fetcher }
    }

    /// Load and normalize the forecast for `query` ("city[,country-code]").
    ///
    /// No request is made when the gate reports offline. Failures are never
    /// retried.
    #[instrument(skip(self))]
    pub async fn load_forecast(&self, query: &str) -> Result<ForecastResponse, ForecastError> {
        if !self.gate.is_online() {
            warn!("No usable network, skipping request");
            return Err(ForecastError::NoConnectivity);
        }

        let raw = match self.fetcher.fetch(query).await {
            Ok(raw) => raw,
            Err(err) => {
                info!(kind = err.kind(), error = %err, "Forecast request failed");
                return Err(err);
            }
        };

        let forecast = normalize(raw);
        debug!(entries = forecast.len(), "Forecast normalized");

        Ok(forecast)
    }
}
