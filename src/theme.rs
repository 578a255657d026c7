use rand::seq::SliceRandom;
use rand::RngCore;
use ratatui::{style::Color, widgets::BorderType};
use serde::{Deserialize, Serialize};

/// Progress bar look, picked once per session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum ThemeLabel {
    #[default]
    #[serde(rename = "windowsXP")]
    #[strum(serialize = "windowsXP")]
    WindowsXp,
    #[serde(rename = "macOS")]
    #[strum(serialize = "macOS")]
    MacOs,
    #[serde(rename = "retro")]
    #[strum(serialize = "retro")]
    Retro,
    #[serde(rename = "windows98")]
    #[strum(serialize = "windows98")]
    Windows98,
}

pub const THEMES: [ThemeLabel; 4] = [
    ThemeLabel::WindowsXp,
    ThemeLabel::MacOs,
    ThemeLabel::Retro,
    ThemeLabel::Windows98,
];

/// Uniform pick over the theme set.
pub fn pick_theme(rng: &mut dyn RngCore) -> ThemeLabel {
    *THEMES.choose(rng).unwrap_or(&ThemeLabel::WindowsXp)
}

/// Presentation attributes for a themed progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    pub container: Color,
    pub border: BorderType,
    pub bar: Color,
    pub height: u16,
}

impl ThemeStyle {
    pub fn for_theme(theme: ThemeLabel, is_complete: bool) -> Self {
        match theme {
            ThemeLabel::WindowsXp => Self {
                container: Color::LightBlue,
                border: BorderType::Thick,
                bar: if is_complete { Color::Green } else { Color::Blue },
                height: 3,
            },
            ThemeLabel::MacOs => Self {
                container: Color::Gray,
                border: BorderType::Rounded,
                bar: if is_complete {
                    Color::LightGreen
                } else {
                    Color::LightBlue
                },
                height: 1,
            },
            ThemeLabel::Retro => Self {
                container: Color::Green,
                border: BorderType::Plain,
                bar: if is_complete {
                    Color::LightGreen
                } else {
                    Color::Green
                },
                height: 2,
            },
            ThemeLabel::Windows98 => Self {
                container: Color::DarkGray,
                border: BorderType::Double,
                bar: if is_complete { Color::Green } else { Color::Blue },
                height: 3,
            },
        }
    }
}
