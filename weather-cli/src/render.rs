use std::fmt::Write;

use weather_core::{CurrentWeatherView, ForecastView, ViewState};

const LOADING: &str = "Загрузка...\n";

pub fn current(state: &ViewState<CurrentWeatherView>, show_icons: bool) -> String {
    let view = match state {
        ViewState::Loading => return LOADING.to_string(),
        ViewState::Error(message) => return format!("{message}\n"),
        ViewState::Ready(view) => view,
    };

    let mut out = String::new();
    let _ = writeln!(out, "Текущая погода в {}", view.location_name);
    let _ = writeln!(out, "{}°C, {}", view.temperature, view.condition);
    if show_icons {
        let _ = writeln!(out, "{}", view.icon);
    }
    let _ = writeln!(out, "Давление: {} мм рт. ст.", view.pressure_mmhg);
    let _ = writeln!(out, "Влажность: {}%", view.humidity_pct);
    let _ = writeln!(out, "Скорость ветра: {} м/с", view.wind_speed_mps);
    out
}

pub fn forecast(state: &ViewState<ForecastView>, show_icons: bool) -> String {
    let view = match state {
        ViewState::Loading => return LOADING.to_string(),
        ViewState::Error(message) => return format!("{message}\n"),
        ViewState::Ready(view) => view,
    };

    let mut out = String::new();
    let _ = writeln!(out, "Прогноз погоды в {}", view.query_city);
    for day in &view.days {
        let _ = writeln!(
            out,
            "{} ({}): {}°C, {}",
            day.label,
            day.date.format("%d.%m"),
            day.temperature,
            day.condition
        );
        if show_icons {
            let _ = writeln!(out, "  {}", day.provider_icon.as_deref().unwrap_or(&day.icon));
        }
    }
    out
}
