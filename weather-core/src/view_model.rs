//! Screen state for the current-weather and forecast screens.
//!
//! A [`ViewModel`] owns the active city and the last fetch outcome for one
//! screen. Every city change goes back to [`ViewState::Loading`] and drops
//! whatever was shown before. Fetches are tagged with a [`FetchTicket`] so a
//! slow response for an earlier city cannot overwrite a newer one.

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

use crate::{
    WeatherError,
    forecast::{FORECAST_DAYS, select_for_day},
    icons::{IconMapper, icon_url_for_code},
    model::CurrentWeather,
    preference::CityPreferenceStore,
    provider::WeatherProvider,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    /// Generic user-facing message; details went to the log.
    Error(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Derives a screen's display values from the provider.
#[async_trait]
pub trait Screen: Send + Sync {
    type Data: Clone + Send + Sync;

    const ERROR_MESSAGE: &'static str;

    async fn load(
        &self,
        provider: &dyn WeatherProvider,
        city: &str,
    ) -> Result<Self::Data, WeatherError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeatherView {
    pub location_name: String,
    pub temperature: i64,
    pub condition: String,
    pub icon: String,
    pub pressure_mmhg: i64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

impl CurrentWeatherView {
    fn new(weather: CurrentWeather, icons: &IconMapper) -> Self {
        Self {
            temperature: weather.temperature_display(),
            pressure_mmhg: weather.pressure_mmhg(),
            icon: icons.icon_for(&weather.condition).to_string(),
            location_name: weather.location_name,
            condition: weather.condition,
            humidity_pct: weather.humidity_pct,
            wind_speed_mps: weather.wind_speed_mps,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurrentScreen {
    icons: IconMapper,
}

impl CurrentScreen {
    pub fn new(icons: IconMapper) -> Self {
        Self { icons }
    }
}

#[async_trait]
impl Screen for CurrentScreen {
    type Data = CurrentWeatherView;

    const ERROR_MESSAGE: &'static str = "Не удалось загрузить погоду.";

    async fn load(
        &self,
        provider: &dyn WeatherProvider,
        city: &str,
    ) -> Result<CurrentWeatherView, WeatherError> {
        let weather = provider.fetch_current(city).await?;
        Ok(CurrentWeatherView::new(weather, &self.icons))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub label: &'static str,
    pub date: NaiveDate,
    pub timestamp: String,
    pub temperature: i64,
    pub condition: String,
    /// Looked up from the condition phrase.
    pub icon: String,
    /// Icon the provider attached to the slot, if any.
    pub provider_icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    /// The city as selected by the user.
    pub query_city: String,
    pub location_name: String,
    pub country: String,
    /// Today, tomorrow and the day after; days without data are left out.
    pub days: Vec<DayForecast>,
}

#[derive(Debug, Clone, Default)]
pub struct ForecastScreen {
    icons: IconMapper,
    today: Option<NaiveDate>,
}

impl ForecastScreen {
    pub fn new(icons: IconMapper) -> Self {
        Self { icons, today: None }
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

#[async_trait]
impl Screen for ForecastScreen {
    type Data = ForecastView;

    const ERROR_MESSAGE: &'static str = "Не удалось загрузить прогноз.";

    async fn load(
        &self,
        provider: &dyn WeatherProvider,
        city: &str,
    ) -> Result<ForecastView, WeatherError> {
        let forecast = provider.fetch_forecast(city).await?;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());

        let days = FORECAST_DAYS
            .iter()
            .filter_map(|&(offset, label)| {
                let entry = select_for_day(&forecast.entries, offset, today)?;
                Some(DayForecast {
                    label,
                    date: today.checked_add_days(Days::new(offset))?,
                    timestamp: entry.timestamp.clone(),
                    temperature: entry.temperature_display(),
                    condition: entry.condition.clone(),
                    icon: self.icons.icon_for(&entry.condition).to_string(),
                    provider_icon: (!entry.icon_code.is_empty())
                        .then(|| icon_url_for_code(&entry.icon_code)),
                })
            })
            .collect();

        Ok(ForecastView {
            query_city: city.to_string(),
            location_name: forecast.city_name,
            country: forecast.country,
            days,
        })
    }
}

/// Identifies one fetch; only the most recently issued ticket may update the
/// screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    city: String,
}

impl FetchTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

pub struct ViewModel<S: Screen> {
    screen: S,
    provider: Arc<dyn WeatherProvider>,
    prefs: Arc<CityPreferenceStore>,
    cities: Vec<String>,
    city: String,
    state: ViewState<S::Data>,
    generation: u64,
}

pub type CurrentWeatherViewModel = ViewModel<CurrentScreen>;
pub type ForecastViewModel = ViewModel<ForecastScreen>;

impl<S: Screen> ViewModel<S> {
    pub fn new(
        screen: S,
        provider: Arc<dyn WeatherProvider>,
        prefs: Arc<CityPreferenceStore>,
        default_city: impl Into<String>,
    ) -> Self {
        Self {
            screen,
            provider,
            prefs,
            cities: Vec::new(),
            city: default_city.into(),
            state: ViewState::Loading,
            generation: 0,
        }
    }

    /// Shortlist offered by the city picker.
    pub fn with_cities(mut self, cities: Vec<String>) -> Self {
        self.cities = cities;
        self
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &ViewState<S::Data> {
        &self.state
    }

    /// Adopt the saved city, if any, then fetch.
    pub async fn mount(&mut self) {
        if let Some(saved) = self.prefs.load().filter(|c| !c.trim().is_empty()) {
            self.city = saved;
        }
        self.refresh().await;
    }

    /// Persist and switch to `name`, then fetch. Returns `false` for a blank
    /// name, which changes nothing; a view model that has never fetched
    /// loads its active city instead so it does not stay in `Loading`.
    pub async fn select_city(&mut self, name: &str) -> bool {
        match self.choose_city(name) {
            Some(ticket) => {
                let result = self.fetch(&ticket).await;
                self.finish_fetch(ticket, result);
                true
            }
            None => {
                if self.generation == 0 {
                    self.refresh().await;
                }
                false
            }
        }
    }

    /// Fetch again for the active city.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.fetch(&ticket).await;
        self.finish_fetch(ticket, result);
    }

    /// Persist and switch to `name` without fetching. The returned ticket is
    /// for the caller to drive with [`fetch`](Self::fetch) and
    /// [`finish_fetch`](Self::finish_fetch).
    pub fn choose_city(&mut self, name: &str) -> Option<FetchTicket> {
        if name.trim().is_empty() {
            debug!("ignoring blank city selection");
            return None;
        }

        self.prefs.save(name);
        self.city = name.to_string();
        Some(self.begin_fetch())
    }

    /// Enter `Loading` and issue a ticket for the active city.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        debug!(city = %self.city, generation = self.generation, "loading");

        FetchTicket {
            generation: self.generation,
            city: self.city.clone(),
        }
    }

    pub async fn fetch(&self, ticket: &FetchTicket) -> Result<S::Data, WeatherError> {
        self.screen.load(self.provider.as_ref(), &ticket.city).await
    }

    /// Apply a fetch outcome. Returns `false` when a newer ticket has been
    /// issued since, in which case the outcome is dropped.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<S::Data, WeatherError>,
    ) -> bool {
        if ticket.generation != self.generation || ticket.city != self.city {
            debug!(
                city = %ticket.city,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }

        self.state = match result {
            Ok(data) => {
                debug!(city = %ticket.city, "ready");
                ViewState::Ready(data)
            }
            Err(err) => {
                debug!(city = %ticket.city, error = %err, "fetch failed");
                ViewState::Error(S::ERROR_MESSAGE.to_string())
            }
        };
        true
    }
}
