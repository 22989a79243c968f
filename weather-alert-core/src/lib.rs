//! Core library for the `weather-alert` client.
//!
//! This crate defines:
//! - The city suggestion catalog and the autocomplete controller
//! - The recent-searches store and its persistence
//! - The request coordinator (a pure state machine) and the HTTP API client
//! - Display mapping for snapshots and forecasts
//! - A [`Session`] that owns all of the above for one user
//!
//! It is used by `weather-alert-cli`, but can also be driven by other front ends.

pub mod api;
pub mod autocomplete;
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod recent;
pub mod render;
pub mod session;

pub use api::{HttpWeatherApi, WeatherApi};
pub use autocomplete::{AutocompleteAction, AutocompleteController, Dropdown, Key};
pub use catalog::Catalog;
pub use config::Config;
pub use coordinator::{Coordinator, UiState};
pub use error::LookupError;
pub use model::{City, ForecastDay, ForecastReport, LookupKind, WeatherSnapshot};
pub use recent::{RecentChips, RecentCityStore};
pub use session::Session;
