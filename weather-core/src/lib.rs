//! Core library for the `weather` app.
//!
//! This crate defines:
//! - Configuration and the persisted city preference
//! - The weather provider abstraction and its OpenWeather client
//! - Forecast-day selection and condition → icon lookup
//! - View models for the current-weather and forecast screens
//!
//! It is used by `weather-cli`, but any presentation layer can drive the view
//! models the same way.

pub mod config;
pub mod error;
pub mod forecast;
pub mod icons;
pub mod model;
pub mod preference;
pub mod provider;
pub mod view_model;

pub use config::Config;
pub use error::WeatherError;
pub use forecast::{select_for_day, select_for_day_local};
pub use icons::IconMapper;
pub use model::{CurrentWeather, ForecastEntry, ForecastList};
pub use preference::{CityPreferenceStore, JsonFileStore, KeyValueStore, MemoryStore};
pub use provider::{WeatherProvider, openweather::OpenWeatherClient, provider_from_config};
pub use view_model::{
    CurrentScreen, CurrentWeatherView, CurrentWeatherViewModel, DayForecast, FetchTicket,
    ForecastScreen, ForecastView, ForecastViewModel, Screen, ViewModel, ViewState,
};
