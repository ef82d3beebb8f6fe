use serde::{Deserialize, Serialize};

const HPA_TO_MMHG: f64 = 0.750063;

/// Current conditions as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// The provider's own location name, which may differ from the query.
    pub location_name: String,
    pub temperature_c: f64,
    pub condition: String,
    pub pressure_hpa: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

impl CurrentWeather {
    pub fn temperature_display(&self) -> i64 {
        self.temperature_c.round() as i64
    }

    pub fn pressure_mmhg(&self) -> i64 {
        hpa_to_mmhg(self.pressure_hpa)
    }
}

pub fn hpa_to_mmhg(hpa: f64) -> i64 {
    (hpa * HPA_TO_MMHG).round() as i64
}

/// One 3-hour slot of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider local text in `YYYY-MM-DD HH:MM:SS` form.
    pub timestamp: String,
    pub temperature_c: f64,
    pub condition: String,
    pub icon_code: String,
}

impl ForecastEntry {
    pub fn temperature_display(&self) -> i64 {
        self.temperature_c.round() as i64
    }
}

/// Forecast entries in provider (chronological) order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastList {
    pub city_name: String,
    pub country: String,
    pub entries: Vec<ForecastEntry>,
}
