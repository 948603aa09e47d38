// src/calendar/mod.rs

//! Seasonal calendar: 24 major seasons and 72 micro-seasons.
//!
//! Dates are reduced to a day-of-year ordinal on a fixed 365-day table, so
//! February 29th lands on the same ordinal as March 1st. Leap years are
//! therefore skewed by one day after February; the anchor dates are kept as
//! published rather than corrected for this.

pub mod table;

use std::fmt;

use chrono::Datelike;
use serde::Serialize;

pub use table::{MAJOR_SEASONS, MICRO_SEASONS};

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const YEAR_DAYS: u32 = 365;
const MICRO_PER_MAJOR: usize = 3;

/// One of the 24 major seasons, anchored at a fixed (month, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MajorSeason {
    pub index: usize,
    pub name: &'static str,
    pub reading: &'static str,
    pub english: &'static str,
    pub start_month: u32,
    pub start_day: u32,
}

impl MajorSeason {
    pub fn start_ordinal(&self) -> u32 {
        day_of_year(self.start_month, self.start_day)
    }

    /// The three micro-seasons nested in this season.
    pub fn micro_seasons(&self) -> &'static [MicroSeason] {
        let first = self.index * MICRO_PER_MAJOR;
        &MICRO_SEASONS[first..first + MICRO_PER_MAJOR]
    }
}

/// One of the 72 micro-seasons; `index` is its position (0..3) inside the
/// parent major season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MicroSeason {
    pub major_index: usize,
    pub index: usize,
    pub name: &'static str,
    pub reading: &'static str,
    pub description: &'static str,
}

impl MicroSeason {
    pub fn parent(&self) -> &'static MajorSeason {
        &MAJOR_SEASONS[self.major_index]
    }
}

/// Outcome of placing an ordinal among the major-season anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorLookup {
    Anchored(usize),
    /// Early January, before the first anchor: still the previous year's
    /// winter solstice season.
    BeforeFirstAnchor,
}

impl MajorLookup {
    pub fn index(self) -> usize {
        match self {
            MajorLookup::Anchored(i) => i,
            MajorLookup::BeforeFirstAnchor => MAJOR_SEASONS.len() - 1,
        }
    }
}

/// Outcome of looking up a (major, micro) pair in a micro-season table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroLookup {
    Exact(&'static MicroSeason),
    /// No record matched; the first micro-season of the major season is used.
    Fallback(&'static MicroSeason),
}

impl MicroLookup {
    pub fn season(self) -> &'static MicroSeason {
        match self {
            MicroLookup::Exact(m) | MicroLookup::Fallback(m) => m,
        }
    }
}

/// Four-way division of the year by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonBand {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl SeasonBand {
    pub fn as_str(self) -> &'static str {
        match self {
            SeasonBand::Spring => "spring",
            SeasonBand::Summer => "summer",
            SeasonBand::Autumn => "autumn",
            SeasonBand::Winter => "winter",
        }
    }
}

impl fmt::Display for SeasonBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal of (month, day) on a non-leap year. Out-of-range months are
/// clamped into 1..=12.
pub fn day_of_year(month: u32, day: u32) -> u32 {
    let month = month.clamp(1, 12) as usize;
    DAYS_IN_MONTH[..month - 1].iter().sum::<u32>() + day
}

/// Greatest anchor not after `ordinal`, scanning from the last anchor back.
pub fn locate_major(ordinal: u32) -> MajorLookup {
    MAJOR_SEASONS
        .iter()
        .rposition(|season| ordinal >= season.start_ordinal())
        .map_or(MajorLookup::BeforeFirstAnchor, MajorLookup::Anchored)
}

/// Position (0..=2) of `ordinal` inside the given major season, by
/// elapsed-day ratio over the season's span.
pub fn micro_index(ordinal: u32, major_index: usize) -> usize {
    let start = MAJOR_SEASONS[major_index].start_ordinal();
    let next_index = (major_index + 1) % MAJOR_SEASONS.len();
    let mut next_start = MAJOR_SEASONS[next_index].start_ordinal();
    if next_start <= start {
        next_start += YEAR_DAYS;
    }

    let micro_len = f64::from(next_start - start) / MICRO_PER_MAJOR as f64;

    let mut current = ordinal;
    if current < start {
        current += YEAR_DAYS;
    }
    let elapsed = f64::from(current - start);

    ((elapsed / micro_len).floor() as usize).min(MICRO_PER_MAJOR - 1)
}

/// Find the (major, micro) record in `table`.
pub fn resolve_micro(table: &'static [MicroSeason], major_index: usize, index: usize) -> MicroLookup {
    table
        .iter()
        .find(|m| m.major_index == major_index && m.index == index)
        .map_or_else(
            || MicroLookup::Fallback(&MICRO_SEASONS[major_index * MICRO_PER_MAJOR]),
            MicroLookup::Exact,
        )
}

pub fn major_season_for_month_day(month: u32, day: u32) -> &'static MajorSeason {
    &MAJOR_SEASONS[locate_major(day_of_year(month, day)).index()]
}

pub fn micro_season_for_month_day(month: u32, day: u32) -> &'static MicroSeason {
    let ordinal = day_of_year(month, day);
    let major_index = locate_major(ordinal).index();
    resolve_micro(&MICRO_SEASONS, major_index, micro_index(ordinal, major_index)).season()
}

pub fn major_season_for<D: Datelike>(date: &D) -> &'static MajorSeason {
    major_season_for_month_day(date.month(), date.day())
}

pub fn micro_season_for<D: Datelike>(date: &D) -> &'static MicroSeason {
    micro_season_for_month_day(date.month(), date.day())
}

pub fn season_band_for(month: u32) -> SeasonBand {
    match month {
        3..=5 => SeasonBand::Spring,
        6..=8 => SeasonBand::Summer,
        9..=11 => SeasonBand::Autumn,
        _ => SeasonBand::Winter,
    }
}
