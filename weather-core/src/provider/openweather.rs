use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    model::{CurrentWeather, ForecastEntry, ForecastList},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const UNKNOWN_CONDITION: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    lang: String,
    units: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClientBuilder {
    api_key: String,
    base_url: String,
    lang: String,
    units: String,
    timeout: Duration,
}

impl OpenWeatherClientBuilder {
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = units.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherClient, WeatherError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(WeatherError::Client)?;

        Ok(OpenWeatherClient {
            api_key: self.api_key,
            base_url: self.base_url,
            lang: self.lang,
            units: self.units,
            http,
        })
    }
}

impl OpenWeatherClient {
    pub fn builder(api_key: String) -> OpenWeatherClientBuilder {
        OpenWeatherClientBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: "ru".to_string(),
            units: "metric".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::builder(api_key).build()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        city: &str,
    ) -> Result<T, WeatherError> {
        if city.trim().is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, city, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let condition = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string());

        CurrentWeather {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            condition,
            pressure_hpa: parsed.main.pressure,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
        }
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(entry: OwForecastEntry) -> Self {
        let (condition, icon_code) = match entry.weather.into_iter().next() {
            Some(w) => (w.description, w.icon),
            None => (UNKNOWN_CONDITION.to_string(), String::new()),
        };

        ForecastEntry {
            timestamp: entry.dt_txt,
            temperature_c: entry.main.temp,
            condition,
            icon_code,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        self.get_json::<OwCurrentResponse>("weather", city)
            .await
            .map(CurrentWeather::from)
            .inspect_err(|err| warn!(error = %err, city, "failed to fetch current weather"))
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastList, WeatherError> {
        self.get_json::<OwForecastResponse>("forecast", city)
            .await
            .map(|parsed| ForecastList {
                city_name: parsed.city.name,
                country: parsed.city.country,
                entries: parsed.list.into_iter().map(ForecastEntry::from).collect(),
            })
            .inspect_err(|err| warn!(error = %err, city, "failed to fetch forecast"))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
