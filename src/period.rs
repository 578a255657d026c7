use crate::error::WakeError;
use chrono::{DateTime, Datelike, Local, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The time context that decides how the loading screen behaves
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum TimePeriod {
    #[default]
    Normal,
    MondayMorning,
    FridayAfternoon,
    LateNight,
    AprilFools,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::Normal,
        TimePeriod::MondayMorning,
        TimePeriod::FridayAfternoon,
        TimePeriod::LateNight,
        TimePeriod::AprilFools,
    ];

    /// Periods that schedule a one-shot transition on activation
    pub fn has_deferred_transition(self) -> bool {
        matches!(self, TimePeriod::FridayAfternoon | TimePeriod::AprilFools)
    }

    /// Short label used by the demo controls
    pub fn short_label(self) -> &'static str {
        match self {
            TimePeriod::Normal => "Normal",
            TimePeriod::MondayMorning => "Monday",
            TimePeriod::FridayAfternoon => "Friday",
            TimePeriod::LateNight => "Night",
            TimePeriod::AprilFools => "April Fools",
        }
    }

    /// Like `from_str`, but anything unrecognized becomes `Normal`.
    pub fn parse_or_normal(label: &str) -> Self {
        label.parse().unwrap_or_else(|e| {
            log::warn!("{e}, falling back to normal");
            TimePeriod::Normal
        })
    }
}

impl FromStr for TimePeriod {
    type Err = WakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |label: &str| label.replace(['-', '_', ' '], "").to_lowercase();
        let wanted = squash(s.trim());
        TimePeriod::ALL
            .into_iter()
            .find(|p| squash(&p.to_string()) == wanted || squash(p.short_label()) == wanted)
            .ok_or_else(|| WakeError::UnknownPeriod(s.to_string()))
    }
}

/// Classifies a local wall-clock reading.
///
/// April 1st wins over everything, then late night (23:00-05:00), then
/// Monday 06:00-11:00 and Friday 13:00-18:00.
pub fn classify(now: &DateTime<Local>) -> TimePeriod {
    let hour = now.hour();

    if now.month() == 4 && now.day() == 1 {
        return TimePeriod::AprilFools;
    }

    if !(5..23).contains(&hour) {
        return TimePeriod::LateNight;
    }

    match now.weekday() {
        Weekday::Mon if (6..11).contains(&hour) => TimePeriod::MondayMorning,
        Weekday::Fri if (13..18).contains(&hour) => TimePeriod::FridayAfternoon,
        _ => TimePeriod::Normal,
    }
}

/// Demo/testing override. `Auto` defers to the classifier.
///
/// Stored labels are read leniently: anything unrecognized becomes
/// `Fixed(Normal)` rather than failing the whole config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PeriodOverride {
    #[default]
    Auto,
    Fixed(TimePeriod),
}

impl PeriodOverride {
    pub fn resolve(
        self,
        now: &DateTime<Local>,
        classifier: fn(&DateTime<Local>) -> TimePeriod,
    ) -> TimePeriod {
        match self {
            PeriodOverride::Auto => classifier(now),
            PeriodOverride::Fixed(period) => period,
        }
    }
}

impl fmt::Display for PeriodOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodOverride::Auto => f.write_str("auto"),
            PeriodOverride::Fixed(period) => write!(f, "{period}"),
        }
    }
}

impl FromStr for PeriodOverride {
    type Err = WakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(PeriodOverride::Auto)
        } else {
            s.parse().map(PeriodOverride::Fixed)
        }
    }
}

impl From<PeriodOverride> for String {
    fn from(value: PeriodOverride) -> Self {
        value.to_string()
    }
}

impl From<String> for PeriodOverride {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("auto") {
            PeriodOverride::Auto
        } else {
            PeriodOverride::Fixed(TimePeriod::parse_or_normal(&value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[test]
    fn april_first_beats_late_night() {
        // 2025-04-01 is a Tuesday
        assert_eq!(classify(&at(2025, 4, 1, 2)), TimePeriod::AprilFools);
        assert_eq!(classify(&at(2025, 4, 1, 14)), TimePeriod::AprilFools);
    }

    #[test]
    fn late_night_window() {
        assert_eq!(classify(&at(2025, 6, 10, 23)), TimePeriod::LateNight);
        assert_eq!(classify(&at(2025, 6, 10, 0)), TimePeriod::LateNight);
        assert_eq!(classify(&at(2025, 6, 10, 4)), TimePeriod::LateNight);
        assert_eq!(classify(&at(2025, 6, 10, 5)), TimePeriod::Normal);
    }

    #[test]
    fn monday_morning_window() {
        // 2025-06-09 is a Monday
        assert_eq!(classify(&at(2025, 6, 9, 6)), TimePeriod::MondayMorning);
        assert_eq!(classify(&at(2025, 6, 9, 10)), TimePeriod::MondayMorning);
        assert_eq!(classify(&at(2025, 6, 9, 11)), TimePeriod::Normal);
        assert_eq!(classify(&at(2025, 6, 9, 5)), TimePeriod::Normal);
    }

    #[test]
    fn friday_afternoon_window() {
        // 2025-06-13 is a Friday
        assert_eq!(classify(&at(2025, 6, 13, 13)), TimePeriod::FridayAfternoon);
        assert_eq!(classify(&at(2025, 6, 13, 17)), TimePeriod::FridayAfternoon);
        assert_eq!(classify(&at(2025, 6, 13, 18)), TimePeriod::Normal);
        assert_eq!(classify(&at(2025, 6, 12, 14)), TimePeriod::Normal);
    }

    #[test]
    fn labels_round_trip_through_display() {
        for period in TimePeriod::ALL {
            assert_eq!(period.to_string().parse::<TimePeriod>().unwrap(), period);
        }
        assert_eq!(TimePeriod::MondayMorning.to_string(), "mondayMorning");
    }

    #[test]
    fn parsing_is_lenient_about_case_and_separators() {
        assert_eq!("late-night".parse::<TimePeriod>().unwrap(), TimePeriod::LateNight);
        assert_eq!("APRIL_FOOLS".parse::<TimePeriod>().unwrap(), TimePeriod::AprilFools);
    }

    #[test]
    fn demo_labels_parse_too() {
        assert_eq!("friday".parse::<TimePeriod>().unwrap(), TimePeriod::FridayAfternoon);
        assert_eq!("night".parse::<TimePeriod>().unwrap(), TimePeriod::LateNight);
        assert_eq!("April Fools".parse::<TimePeriod>().unwrap(), TimePeriod::AprilFools);
    }

    #[test]
    fn unknown_period_falls_back_to_normal() {
        assert!("teatime".parse::<TimePeriod>().is_err());
        assert_eq!(TimePeriod::parse_or_normal("teatime"), TimePeriod::Normal);
    }

    #[test]
    fn override_resolution() {
        let now = at(2025, 6, 9, 8);
        assert_eq!(
            PeriodOverride::Auto.resolve(&now, classify),
            TimePeriod::MondayMorning
        );
        assert_eq!(
            PeriodOverride::Fixed(TimePeriod::LateNight).resolve(&now, classify),
            TimePeriod::LateNight
        );
        assert_eq!("auto".parse::<PeriodOverride>().unwrap(), PeriodOverride::Auto);
        assert_eq!(
            "fridayAfternoon".parse::<PeriodOverride>().unwrap(),
            PeriodOverride::Fixed(TimePeriod::FridayAfternoon)
        );
    }

    #[test]
    fn stored_labels_are_read_leniently() {
        assert_eq!(
            PeriodOverride::from("AUTO".to_string()),
            PeriodOverride::Auto
        );
        assert_eq!(
            PeriodOverride::from("night".to_string()),
            PeriodOverride::Fixed(TimePeriod::LateNight)
        );
        assert_eq!(
            PeriodOverride::from("brunch".to_string()),
            PeriodOverride::Fixed(TimePeriod::Normal)
        );
    }
}
