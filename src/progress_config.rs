//! Period configuration table.

use crate::period::TimePeriod;
use crate::theme::ThemeLabel;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Serialize;

pub const DEFAULT_MESSAGE: &str = "Loading...";

pub const MONDAY_MESSAGES: [&str; 3] = [
    "Ugh, Monday... 😩",
    "Need more coffee. ☕️",
    "Why is this taking so long?",
];

/// Progress at which Friday afternoon stops for good
pub const FRIDAY_CEILING: f64 = 99.9;

/// Where April Fools lands after the reveal, and stays
pub const APRIL_FOOLS_RESTART: f64 = 5.0;

/// Per-period behaviour, resolved once per period activation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressConfig {
    /// Fraction of the remaining distance consumed per tick
    pub speed: f64,
    pub initial_progress: f64,
    pub message: String,
    pub secondary_message: Option<String>,
    pub is_pulsing: bool,
    pub theme: ThemeLabel,
}

/// One-shot change scheduled when a period activates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTransition {
    /// "Hello World!" at 100% turns out to be a prank
    AprilFoolsReveal,
    /// Jump to 99.9% and stay there
    FridayFreeze,
}

impl DeferredTransition {
    pub fn for_period(period: TimePeriod) -> Option<Self> {
        match period {
            TimePeriod::AprilFools => Some(DeferredTransition::AprilFoolsReveal),
            TimePeriod::FridayAfternoon => Some(DeferredTransition::FridayFreeze),
            _ => None,
        }
    }

    /// Ceiling the curve respects once this transition has fired
    pub fn ceiling(self) -> f64 {
        match self {
            DeferredTransition::AprilFoolsReveal => APRIL_FOOLS_RESTART,
            DeferredTransition::FridayFreeze => FRIDAY_CEILING,
        }
    }
}

/// Resolves the configuration for `period`.
///
/// The only randomness is the Monday message pick; call this once per
/// activation so the message stays put for the period's lifetime.
pub fn resolve(period: TimePeriod, theme: ThemeLabel, rng: &mut dyn RngCore) -> ProgressConfig {
    let base = ProgressConfig {
        speed: 0.002,
        initial_progress: 47.0,
        message: DEFAULT_MESSAGE.to_string(),
        secondary_message: None,
        is_pulsing: false,
        theme,
    };

    match period {
        TimePeriod::Normal => base,
        TimePeriod::MondayMorning => ProgressConfig {
            speed: 0.0005,
            initial_progress: 5.0,
            message: MONDAY_MESSAGES
                .choose(rng)
                .copied()
                .unwrap_or(DEFAULT_MESSAGE)
                .to_string(),
            ..base
        },
        TimePeriod::FridayAfternoon => ProgressConfig {
            speed: 0.05,
            initial_progress: 95.0,
            message: "Almost weekend!".to_string(),
            secondary_message: Some("Just one more email... 📧".to_string()),
            ..base
        },
        TimePeriod::LateNight => ProgressConfig {
            speed: 0.001,
            initial_progress: 20.0,
            message: "The server is sleeping. 😴".to_string(),
            is_pulsing: true,
            ..base
        },
        TimePeriod::AprilFools => ProgressConfig {
            speed: 1.0,
            initial_progress: 100.0,
            message: "Hello World!".to_string(),
            secondary_message: Some("April Fools! 😉".to_string()),
            ..base
        },
    }
}
