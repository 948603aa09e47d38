// src/weather.rs

//! WMO weather interpretation codes, as reported by Open-Meteo.

use serde::Serialize;

use crate::scene::WeatherOverride;

/// Visual mood associated with a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherTheme {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCondition {
    pub code: u16,
    pub description: &'static str,
    pub theme: WeatherTheme,
}

const fn cond(code: u16, description: &'static str, theme: WeatherTheme) -> WeatherCondition {
    WeatherCondition { code, description, theme }
}

pub static WEATHER_CONDITIONS: [WeatherCondition; 24] = {
    use WeatherTheme::*;
    [
        cond(0, "Clear sky", Sunny),
        cond(1, "Mainly clear", Sunny),
        cond(2, "Partly cloudy", Cloudy),
        cond(3, "Overcast", Cloudy),
        cond(45, "Fog", Cloudy),
        cond(48, "Rime fog", Cloudy),
        cond(51, "Light drizzle", Rainy),
        cond(53, "Drizzle", Rainy),
        cond(55, "Dense drizzle", Rainy),
        cond(61, "Light rain", Rainy),
        cond(63, "Rain", Rainy),
        cond(65, "Heavy rain", Rainy),
        cond(71, "Light snow", Snowy),
        cond(73, "Snow", Snowy),
        cond(75, "Heavy snow", Snowy),
        cond(77, "Snow grains", Snowy),
        cond(80, "Rain showers", Rainy),
        cond(81, "Heavy rain showers", Rainy),
        cond(82, "Violent rain showers", Stormy),
        cond(85, "Snow showers", Snowy),
        cond(86, "Heavy snow showers", Snowy),
        cond(95, "Thunderstorm", Stormy),
        cond(96, "Thunderstorm with hail", Stormy),
        cond(99, "Severe thunderstorm", Stormy),
    ]
};

/// Condition for `code`; codes outside the table read as an unknown,
/// cloudy condition.
pub fn condition_for(code: u16) -> WeatherCondition {
    WEATHER_CONDITIONS
        .iter()
        .copied()
        .find(|c| c.code == code)
        .unwrap_or(WeatherCondition {
            code,
            description: "Unknown",
            theme: WeatherTheme::Cloudy,
        })
}

/// Current conditions as handed over by the weather collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherReading {
    pub code: u16,
    /// Not used for scene selection.
    pub is_day: bool,
}

impl WeatherReading {
    pub fn condition(&self) -> WeatherCondition {
        condition_for(self.code)
    }

    pub fn precipitation(&self) -> Option<WeatherOverride> {
        WeatherOverride::from_code(self.code)
    }
}
