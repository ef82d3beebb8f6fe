use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::warn;
use weather_core::{
    CityPreferenceStore, Config, CurrentScreen, CurrentWeatherViewModel, ForecastScreen,
    ForecastViewModel, JsonFileStore, Screen, ViewModel, WeatherProvider, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and a 3-day forecast for a city")]
pub struct Cli {
    /// Also print icon URLs.
    #[arg(long, global = true)]
    pub icons: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for the selected city.
    Current {
        /// Switch to this city (remembered for next time).
        #[arg(long, value_parser = non_blank_city)]
        city: Option<String>,
    },

    /// Show the forecast for today, tomorrow and the day after.
    Forecast {
        /// Switch to this city (remembered for next time).
        #[arg(long, value_parser = non_blank_city)]
        city: Option<String>,
    },

    /// Pick a city, from the shortlist if none is given, and show its weather.
    Select {
        #[arg(value_parser = non_blank_city)]
        city: Option<String>,
    },

    /// List the cities offered by `select`.
    Cities,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Cities => {
                for city in Config::load()?.cities {
                    println!("{city}");
                }
            }
            Command::Current { city } => {
                let mut vm = Session::open()?.current();
                open_screen(&mut vm, city.as_deref()).await;
                print!("{}", render::current(vm.state(), self.icons));
            }
            Command::Forecast { city } => {
                let mut vm = Session::open()?.forecast();
                open_screen(&mut vm, city.as_deref()).await;
                print!("{}", render::forecast(vm.state(), self.icons));
            }
            Command::Select { city } => {
                let mut vm = Session::open()?.current();
                let city = match city {
                    Some(city) => city,
                    None => inquire::Select::new("Выберите город", vm.cities().to_vec())
                        .prompt()
                        .context("City selection aborted")?,
                };
                vm.select_city(&city).await;
                print!("{}", render::current(vm.state(), self.icons));
            }
        }

        Ok(())
    }
}

/// A `--city` flag is a selection event; otherwise start from the saved city.
async fn open_screen<S: Screen>(vm: &mut ViewModel<S>, city: Option<&str>) {
    let selected = match city {
        Some(city) => vm.select_city(city).await,
        None => false,
    };
    if !selected && vm.state().is_loading() {
        vm.mount().await;
    }
}

fn non_blank_city(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("city must not be empty".to_string());
    }
    Ok(value.to_string())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Configuration aborted")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Shared collaborators for one invocation.
struct Session {
    config: Config,
    provider: Arc<dyn WeatherProvider>,
    prefs: Arc<CityPreferenceStore>,
}

impl Session {
    fn open() -> Result<Self> {
        let config = Config::load()?;
        let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

        let prefs = match Config::preferences_file_path() {
            Ok(path) => CityPreferenceStore::new(JsonFileStore::new(path)),
            Err(err) => {
                warn!(error = %err, "no data directory, city choice will not be remembered");
                CityPreferenceStore::in_memory()
            }
        };

        Ok(Self {
            config,
            provider,
            prefs: Arc::new(prefs),
        })
    }

    fn current(&self) -> CurrentWeatherViewModel {
        self.view_model(CurrentScreen::new(self.config.icon_mapper()))
    }

    fn forecast(&self) -> ForecastViewModel {
        self.view_model(ForecastScreen::new(self.config.icon_mapper()))
    }

    fn view_model<S: Screen>(&self, screen: S) -> ViewModel<S> {
        ViewModel::new(
            screen,
            self.provider.clone(),
            self.prefs.clone(),
            self.config.default_city.clone(),
        )
        .with_cities(self.config.cities.clone())
    }
}
