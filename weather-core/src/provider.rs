use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config, WeatherError,
    model::{CurrentWeather, ForecastList},
    provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Source of weather data for a city name.
///
/// Implementations make exactly one request per call, with no caching and no
/// retry; any failure comes back as a [`WeatherError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastList, WeatherError>;
}

/// Construct the OpenWeather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let client = OpenWeatherClient::builder(api_key)
        .base_url(&config.base_url)
        .lang(&config.lang)
        .units(&config.units)
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }

        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
