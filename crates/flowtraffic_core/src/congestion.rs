//! Congestion estimation.
//!
//! A weighted blend of time-of-day, day-of-week, weather and incident-count
//! factors. The tables and weights are fixed; callers that need different
//! behavior tune their inputs, not this module.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Typical daily congestion shape, indexed by hour of day. Low overnight,
/// morning peak at 8, evening peak at 17.
const BASELINE_CONGESTION: [f64; 24] = [
    0.1, 0.05, 0.05, 0.1, 0.2, 0.4, // 0-5
    0.6, 0.8, 0.9, 0.7, 0.5, 0.6, // 6-11
    0.7, 0.6, 0.5, 0.6, 0.7, 0.9, // 12-17
    0.8, 0.6, 0.4, 0.3, 0.2, 0.1, // 18-23
];

/// Indexed by weekday, 0 = Monday.
const DAY_FACTORS: [f64; 7] = [1.0, 1.0, 1.0, 1.0, 1.1, 0.7, 0.6];

const TIME_OF_DAY_WEIGHT: f64 = 0.4;
const DAY_OF_WEEK_WEIGHT: f64 = 0.2;
const WEATHER_WEIGHT: f64 = 0.15;
const INCIDENTS_WEIGHT: f64 = 0.25;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Storm,
    /// Anything we do not recognize on the wire; treated as a neutral 1.0
    /// multiplier.
    #[serde(other)]
    Unknown,
}

impl WeatherCondition {
    pub fn impact_factor(&self) -> f64 {
        match self {
            WeatherCondition::Clear => 1.0,
            WeatherCondition::Cloudy => 1.05,
            WeatherCondition::Rain => 1.3,
            WeatherCondition::Snow => 1.8,
            WeatherCondition::Fog => 1.4,
            WeatherCondition::Storm => 1.6,
            WeatherCondition::Unknown => 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Moderate,
    High,
}

impl CongestionLevel {
    /// Fixed thresholds: < 0.3 low, < 0.7 moderate, else high.
    pub fn from_score(score: f64) -> CongestionLevel {
        if score < 0.3 {
            CongestionLevel::Low
        } else if score < 0.7 {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::High
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            CongestionLevel::Low => 0,
            CongestionLevel::Moderate => 1,
            CongestionLevel::High => 2,
        }
    }
}

/// Estimated congestion in `[0, 1]` for the given ambient conditions.
///
/// `hour` must be in `0..24` and `weekday` in `0..7` (0 = Monday); anything
/// else is a caller bug and panics on the table lookup.
pub fn estimate(
    hour: usize,
    weekday: usize,
    weather: WeatherCondition,
    incident_count: u32,
) -> f64 {
    let baseline = BASELINE_CONGESTION[hour];
    let day_factor = DAY_FACTORS[weekday];
    let weather_factor = weather.impact_factor();

    // Each open incident adds 10% on top of the baseline.
    let incident_factor = 1.0 + 0.1 * f64::from(incident_count);

    let score = baseline * TIME_OF_DAY_WEIGHT
        + baseline * day_factor * DAY_OF_WEEK_WEIGHT
        + baseline * weather_factor * WEATHER_WEIGHT
        + baseline * incident_factor * INCIDENTS_WEIGHT;

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_stays_in_unit_interval() {
        for hour in 0..24 {
            for weekday in 0..7 {
                let score = estimate(hour, weekday, WeatherCondition::Clear, 0);
                assert!(
                    (0.0..=1.0).contains(&score),
                    "hour {hour} weekday {weekday} gave {score}"
                );
            }
        }
    }

    #[test]
    fn estimate_monotone_in_incident_count() {
        let mut previous = 0.0;
        for incidents in 0..20 {
            let score = estimate(8, 0, WeatherCondition::Clear, incidents);
            assert!(score >= previous, "{incidents} incidents gave {score}");
            previous = score;
        }
    }

    #[test]
    fn snow_never_below_clear() {
        for hour in 0..24 {
            for weekday in 0..7 {
                let snow = estimate(hour, weekday, WeatherCondition::Snow, 0);
                let clear = estimate(hour, weekday, WeatherCondition::Clear, 0);
                assert!(snow >= clear, "hour {hour} weekday {weekday}");
            }
        }
    }

    #[test]
    fn morning_peak_exceeds_overnight() {
        let peak = estimate(8, 0, WeatherCondition::Clear, 0);
        let overnight = estimate(2, 0, WeatherCondition::Clear, 0);
        assert!(peak > overnight);
    }

    #[test]
    fn weekend_factor_lowers_score() {
        let monday = estimate(8, 0, WeatherCondition::Clear, 0);
        let sunday = estimate(8, 6, WeatherCondition::Clear, 0);
        assert!(sunday < monday);
    }

    #[test]
    fn clear_monday_peak_is_exact() {
        // 0.9 * (0.4 + 0.2 + 0.15 + 0.25) with all factors at 1.0.
        let score = estimate(8, 0, WeatherCondition::Clear, 0);
        assert!((score - 0.9).abs() < 1e-12);
    }

    #[test]
    fn unknown_weather_is_neutral() {
        let unknown = estimate(17, 2, WeatherCondition::Unknown, 1);
        let clear = estimate(17, 2, WeatherCondition::Clear, 1);
        assert_eq!(unknown, clear);
    }

    #[test]
    fn unrecognized_weather_string_deserializes_to_unknown() {
        let weather: WeatherCondition = serde_json::from_str("\"hail\"").unwrap();
        assert_eq!(weather, WeatherCondition::Unknown);

        let weather: WeatherCondition = serde_json::from_str("\"snow\"").unwrap();
        assert_eq!(weather, WeatherCondition::Snow);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(CongestionLevel::from_score(0.0), CongestionLevel::Low);
        assert_eq!(CongestionLevel::from_score(0.29), CongestionLevel::Low);
        assert_eq!(CongestionLevel::from_score(0.3), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::from_score(0.69), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::from_score(0.7), CongestionLevel::High);
        assert_eq!(CongestionLevel::from_score(1.2), CongestionLevel::High);
    }

    #[test]
    fn level_rank_ordering() {
        assert!(CongestionLevel::Low.rank() < CongestionLevel::Moderate.rank());
        assert!(CongestionLevel::Moderate.rank() < CongestionLevel::High.rank());
    }
}
