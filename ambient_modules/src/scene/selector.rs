// src/scene/selector.rs

use std::fmt;

use chrono::{Datelike, Timelike};
use serde::Serialize;

use super::SceneId;
use crate::calendar::{season_band_for, SeasonBand};

const RAIN_CODES: [u16; 12] = [51, 53, 55, 61, 63, 65, 80, 81, 82, 95, 96, 99];
const SNOW_CODES: [u16; 6] = [71, 73, 75, 77, 85, 86];

/// Precipitation that takes priority over season and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherOverride {
    Rain,
    Snow,
}

impl WeatherOverride {
    pub fn from_code(code: u16) -> Option<Self> {
        if RAIN_CODES.contains(&code) {
            Some(WeatherOverride::Rain)
        } else if SNOW_CODES.contains(&code) {
            Some(WeatherOverride::Snow)
        } else {
            None
        }
    }

    pub fn scene(self) -> SceneId {
        match self {
            WeatherOverride::Rain => SceneId::Rain,
            WeatherOverride::Snow => SceneId::Snow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=9 => TimeOfDay::Morning,
            10..=16 => TimeOfDay::Midday,
            17..=19 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Autumn is split in two for selection: September still sounds like
/// summer evenings, October and November don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionSeason {
    Spring,
    Summer,
    EarlyAutumn,
    LateAutumn,
    Winter,
}

impl SelectionSeason {
    fn from_month(month: u32) -> Self {
        match month {
            3..=5 => SelectionSeason::Spring,
            6..=8 => SelectionSeason::Summer,
            9 => SelectionSeason::EarlyAutumn,
            10 | 11 => SelectionSeason::LateAutumn,
            _ => SelectionSeason::Winter,
        }
    }

    fn scene(self, time: TimeOfDay) -> SceneId {
        use SelectionSeason::*;
        use TimeOfDay::*;

        match (self, time) {
            (Summer, Morning) => SceneId::Morning,
            (Summer, Midday) => SceneId::Cicada,
            (Summer, Evening) => SceneId::EveningSummer,
            (Summer, Night) => SceneId::Night,

            (EarlyAutumn, Morning) => SceneId::Morning,
            (EarlyAutumn, Midday) => SceneId::Wind,
            (EarlyAutumn, Evening) => SceneId::EveningSummer,
            (EarlyAutumn, Night) => SceneId::NightAutumn,

            (LateAutumn, _) => SceneId::Wind,

            (Winter, Night) => SceneId::Snow,
            (Winter, Morning | Midday | Evening) => SceneId::Wind,

            (Spring, Morning) => SceneId::Morning,
            (Spring, Midday | Evening | Night) => SceneId::Wind,
        }
    }
}

fn normalize_month(month: u32) -> u32 {
    (month as i64 - 1).rem_euclid(12) as u32 + 1
}

/// A selection together with what drove it, for display and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneDecision {
    pub scene: SceneId,
    pub reason: String,
    pub season: SeasonBand,
    pub time_of_day: TimeOfDay,
    pub weather: Option<WeatherOverride>,
}

/// Pick the scene for a WMO weather code, month (1-12) and hour (0-23).
pub fn select_scene(weather_code: u16, month: u32, hour: u32) -> SceneId {
    if let Some(weather) = WeatherOverride::from_code(weather_code) {
        return weather.scene();
    }
    SelectionSeason::from_month(normalize_month(month)).scene(TimeOfDay::from_hour(hour))
}

pub fn scene_info(weather_code: u16, month: u32, hour: u32) -> SceneDecision {
    let month = normalize_month(month);
    let season = season_band_for(month);
    let time_of_day = TimeOfDay::from_hour(hour);
    let weather = WeatherOverride::from_code(weather_code);

    let reason = match weather {
        Some(w) => format!(
            "{} override (weather code {weather_code})",
            match w {
                WeatherOverride::Rain => "rain",
                WeatherOverride::Snow => "snow",
            }
        ),
        None => format!("{season} {time_of_day}"),
    };

    SceneDecision {
        scene: select_scene(weather_code, month, hour),
        reason,
        season,
        time_of_day,
        weather,
    }
}

/// [`select_scene`] with month and hour read from a clock reading.
pub fn select_scene_now<T: Datelike + Timelike>(weather_code: u16, now: &T) -> SceneId {
    select_scene(weather_code, now.month(), now.hour())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(63, 7, 13, SceneId::Rain ; "rain wins over summer midday")]
    #[test_case(95, 1, 2, SceneId::Rain ; "thunderstorm")]
    #[test_case(73, 7, 13, SceneId::Snow ; "snow code in july")]
    #[test_case(0, 7, 13, SceneId::Cicada ; "summer midday")]
    #[test_case(0, 7, 6, SceneId::Morning ; "summer morning")]
    #[test_case(0, 8, 18, SceneId::EveningSummer ; "summer evening")]
    #[test_case(0, 6, 23, SceneId::Night ; "summer night")]
    #[test_case(0, 9, 12, SceneId::Wind ; "early autumn midday")]
    #[test_case(0, 9, 18, SceneId::EveningSummer ; "early autumn evening")]
    #[test_case(0, 9, 3, SceneId::NightAutumn ; "early autumn night")]
    #[test_case(0, 11, 23, SceneId::Wind ; "late autumn night")]
    #[test_case(0, 10, 7, SceneId::Wind ; "late autumn morning")]
    #[test_case(0, 12, 22, SceneId::Snow ; "winter night")]
    #[test_case(0, 2, 12, SceneId::Wind ; "winter midday")]
    #[test_case(0, 4, 7, SceneId::Morning ; "spring morning")]
    #[test_case(0, 5, 21, SceneId::Wind ; "spring night")]
    fn selection_table(code: u16, month: u32, hour: u32, expected: SceneId) {
        assert_eq!(select_scene(code, month, hour), expected);
    }

    #[test_case(4, TimeOfDay::Night)]
    #[test_case(5, TimeOfDay::Morning)]
    #[test_case(9, TimeOfDay::Morning)]
    #[test_case(10, TimeOfDay::Midday)]
    #[test_case(16, TimeOfDay::Midday)]
    #[test_case(17, TimeOfDay::Evening)]
    #[test_case(19, TimeOfDay::Evening)]
    #[test_case(20, TimeOfDay::Night)]
    fn time_band_edges(hour: u32, expected: TimeOfDay) {
        assert_eq!(TimeOfDay::from_hour(hour), expected);
    }

    #[test]
    fn out_of_range_inputs_wrap() {
        assert_eq!(select_scene(0, 19, 37), select_scene(0, 7, 13));
        assert_eq!(select_scene(0, 0, 23), select_scene(0, 12, 23));
    }

    #[test]
    fn decision_explains_itself() {
        let info = scene_info(2, 7, 13);
        assert_eq!(
            info,
            SceneDecision {
                scene: SceneId::Cicada,
                reason: "summer midday".to_string(),
                season: SeasonBand::Summer,
                time_of_day: TimeOfDay::Midday,
                weather: None,
            }
        );

        let rainy = scene_info(63, 7, 13);
        assert_eq!(rainy.scene, SceneId::Rain);
        assert_eq!(rainy.weather, Some(WeatherOverride::Rain));
        assert_eq!(rainy.reason, "rain override (weather code 63)");
        assert_eq!(rainy.season, SeasonBand::Summer);
    }

    #[test]
    fn reads_month_and_hour_from_clock() {
        let evening = NaiveDate::from_ymd_opt(2025, 8, 10)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(select_scene_now(1, &evening), SceneId::EveningSummer);
    }
}
