//! Caller-side forecast state.
//!
//! The board owns the "latest forecast" and "latest error" a screen would
//! show, and publishes them over a `watch` channel. Every submitted query
//! runs as its own task. Results land in whatever order the tasks finish:
//! a slow early query can overwrite a fast later one. There is no request
//! generation counter, so callers that care must compare `query` themselves.
//!
//! `deliveries` counts published results. The `watch` channel coalesces
//! notifications, so observers compare it rather than field values to tell
//! whether something new arrived.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::{ForecastResponse, ForecastService};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// Query whose result is currently in `forecast`.
    pub query: Option<String>,
    pub forecast: Option<ForecastResponse>,
    /// User-facing message when the most recently delivered result failed.
    pub error: Option<String>,
    /// Number of results published so far.
    pub deliveries: u64,
}

#[derive(Debug)]
pub struct ForecastBoard {
    service: ForecastService,
    tx: Arc<watch::Sender<BoardState>>,
}

impl ForecastBoard {
    pub fn new(service: ForecastService) -> Self {
        let (tx, _rx) = watch::channel(BoardState::default());
        Self { service, tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> BoardState {
        self.tx.borrow().clone()
    }

    /// Clear the current error and start loading `query` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, query: impl Into<String>) -> JoinHandle<()> {
        let query = query.into();
        self.tx.send_modify(|state| state.error = None);

        let service = self.service.clone();
        let tx = Arc::clone(&self.tx);

        tokio::spawn(async move {
            let result = service.load_forecast(&query).await;
            debug!(%query, ok = result.is_ok(), "Publishing forecast result");

            tx.send_modify(|state| {
                match result {
                    Ok(forecast) => {
                        state.query = Some(query);
                        state.forecast = Some(forecast);
                        state.error = None;
                    }
                    Err(err) => state.error = Some(err.to_string()),
                }
                state.deliveries += 1;
            });
        })
    }
}
