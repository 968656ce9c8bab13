//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Preference storage (API key, county list, selected county)
//! - The county catalog with its remote / cached / bundled fallback
//! - The timeline provider and the error taxonomy wrapped around it
//! - Forecast windowing and day/hour labels relative to "now"
//! - Screen models consumed by the CLI renderer
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod county;
pub mod error;
pub mod model;
pub mod provider;
pub mod view;
pub mod window;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use model::{County, Day, Hour, Timeline, TimelineRequest, UnitGroup, WeatherIcon};
pub use provider::{WeatherProvider, provider_from_config, visualcrossing::VisualCrossingProvider};
pub use view::{HomeView, HourlyView, InfoItem, UiState, WeeklyView};
