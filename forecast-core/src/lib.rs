//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - A connectivity gate checked before every request
//! - The OpenWeather XML forecast fetcher
//! - Normalization from the provider payload to the canonical forecast model
//! - The forecast service tying those together, and a caller-side state board
//! - Configuration & credentials handling
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod board;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod normalize;
pub mod service;

pub use board::{BoardState, ForecastBoard};
pub use config::Config;
pub use connectivity::{ConnectivityGate, RouteProbe, StaticConnectivity};
pub use error::ForecastError;
pub use fetcher::{ForecastFetcher, openweather::OpenWeatherFetcher};
pub use model::{
    ForecastEntry, ForecastResponse, Main, RawForecastEntry, RawForecastResponse, RawWeatherIcon,
    Weather,
};
pub use normalize::normalize;
pub use service::ForecastService;
