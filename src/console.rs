//! Developer console theater.
//!
//! A scripted back-and-forth between a sysadmin and a reluctant AI, a few
//! block-letter banners, and joke commands. The session decides when each
//! piece plays. This module only knows what gets printed.

use crate::period::TimePeriod;
use rand::{seq::SliceRandom, Rng, RngCore};
use std::collections::VecDeque;
use std::fmt;

/// Lines kept for the console panel
pub const MAX_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: Level,
    pub text: String,
}

impl ConsoleLine {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One scripted line, due `at_ms` after the theater starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub level: Level,
    pub text: &'static str,
    pub at_ms: u64,
}

const fn cue(level: Level, text: &'static str, at_ms: u64) -> Cue {
    Cue { level, text, at_ms }
}

const OPENING: [Cue; 8] = [
    cue(Level::Info, "[SYSTEM] Initializing wake sequence...", 2_000),
    cue(
        Level::Log,
        "[AI] Good morning! Attempting to establish connection...",
        3_500,
    ),
    cue(Level::Warn, "[ADMIN] System status: PARTIALLY_AWAKE", 5_000),
    cue(
        Level::Log,
        "[AI] I'm detecting some resistance in the wake-up protocols.",
        7_000,
    ),
    cue(Level::Error, "[ADMIN] Override command: wake.up()", 8_500),
    cue(
        Level::Error,
        "[ERROR] Function wake.up() is deprecated. Use coffee.inject() instead.",
        10_000,
    ),
    cue(
        Level::Log,
        "[AI] I'm sorry, I can't do that right now. Have you tried turning it off and on again?",
        12_000,
    ),
    cue(
        Level::Warn,
        "[ADMIN] Attempting alternative wake methods...",
        14_000,
    ),
];

const MONDAY_CODA: [Cue; 2] = [
    cue(
        Level::Log,
        "[AI] Detection: Monday morning blues detected. Adjusting caffeine levels...",
        16_000,
    ),
    cue(
        Level::Error,
        "[ERROR] Insufficient coffee.exe found in system",
        18_000,
    ),
];

const FRIDAY_CODA: [Cue; 2] = [
    cue(
        Level::Log,
        "[AI] Friday detected! Weekend protocols loading...",
        16_000,
    ),
    cue(
        Level::Warn,
        "[ADMIN] Warning: One more email incoming...",
        18_000,
    ),
];

const NIGHT_CODA: [Cue; 2] = [
    cue(
        Level::Log,
        "[AI] Night mode activated. Maybe we should all get some sleep?",
        16_000,
    ),
    cue(Level::Info, "[SYSTEM] Sleep.exe is running...", 18_000),
];

const APRIL_FOOLS_SCRIPT: [Cue; 2] = [
    cue(Level::Log, "[AI] Just kidding! 🎉", 1_000),
    cue(
        Level::Info,
        "[SYSTEM] April Fools! Loading... forever and ever... ♾️",
        3_000,
    ),
];

/// The scripted conversation for a period, in playing order.
///
/// April Fools gets its own short script. Every other period plays the
/// opening and, except for normal, a period-specific coda.
pub fn script(period: TimePeriod) -> Vec<Cue> {
    let coda: &[Cue] = match period {
        TimePeriod::AprilFools => return APRIL_FOOLS_SCRIPT.to_vec(),
        TimePeriod::MondayMorning => &MONDAY_CODA,
        TimePeriod::FridayAfternoon => &FRIDAY_CODA,
        TimePeriod::LateNight => &NIGHT_CODA,
        TimePeriod::Normal => &[],
    };
    OPENING.iter().chain(coda).copied().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Art {
    Wake,
    Fail,
    Sleeping,
    Loading,
}

impl Art {
    pub const ALL: [Art; 4] = [Art::Wake, Art::Fail, Art::Sleeping, Art::Loading];

    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Art::Fail => &[
                " ███████╗ █████╗ ██╗██╗     ",
                " ██╔════╝██╔══██╗██║██║     ",
                " █████╗  ███████║██║██║     ",
                " ██╔══╝  ██╔══██║██║██║     ",
                " ██║     ██║  ██║██║███████╗",
                " ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝",
            ],
            Art::Sleeping => &[
                " ███████╗██╗     ███████╗███████╗██████╗ ██╗███╗   ██╗ ██████╗ ",
                " ██╔════╝██║     ██╔════╝██╔════╝██╔══██╗██║████╗  ██║██╔════╝ ",
                " ███████╗██║     █████╗  █████╗  ██████╔╝██║██╔██╗ ██║██║  ███╗",
                " ╚════██║██║     ██╔══╝  ██╔══╝  ██╔═══╝ ██║██║╚██╗██║██║   ██║",
                " ███████║███████╗███████╗███████╗██║     ██║██║ ╚████║╚██████╔╝",
                " ╚══════╝╚══════╝╚══════╝╚══════╝╚═╝     ╚═╝╚═╝  ╚═══╝ ╚═════╝",
            ],
            Art::Wake => &[
                " ██╗    ██╗ █████╗ ██╗  ██╗███████╗",
                " ██║    ██║██╔══██╗██║ ██╔╝██╔════╝",
                " ██║ █╗ ██║███████║█████╔╝ █████╗  ",
                " ██║███╗██║██╔══██║██╔═██╗ ██╔══╝  ",
                " ╚███╔███╔╝██║  ██║██║  ██╗███████╗",
                "  ╚══╝╚══╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝",
            ],
            Art::Loading => &[
                " ██╗      ██████╗  █████╗ ██████╗ ██╗███╗   ██╗ ██████╗ ",
                " ██║     ██╔═══██╗██╔══██╗██╔══██╗██║████╗  ██║██╔════╝ ",
                " ██║     ██║   ██║███████║██║  ██║██║██╔██╗ ██║██║  ███╗",
                " ██║     ██║   ██║██╔══██║██║  ██║██║██║╚██╗██║██║   ██║",
                " ███████╗╚██████╔╝██║  ██║██████╔╝██║██║ ╚████║╚██████╔╝",
                " ╚══════╝ ╚═════╝ ╚═╝  ╚═╝╚═════╝ ╚═╝╚═╝  ╚═══╝ ╚═════╝",
            ],
        }
    }

    fn to_console(self) -> impl Iterator<Item = ConsoleLine> {
        self.lines().iter().map(|l| ConsoleLine::new(Level::Log, *l))
    }
}

fn random_art(rng: &mut dyn RngCore) -> Art {
    *Art::ALL.choose(rng).unwrap_or(&Art::Loading)
}

/// Printed once when the session starts
pub fn banner() -> Vec<ConsoleLine> {
    let mut lines: Vec<ConsoleLine> = Art::Wake.to_console().collect();
    lines.extend([
        ConsoleLine::new(Level::Log, ""),
        ConsoleLine::new(Level::Info, "🎭 Welcome to the Developer Console Theater! 🎭"),
        ConsoleLine::new(
            Level::Log,
            "Type help() to see available commands, or just sit back and enjoy the show...",
        ),
        ConsoleLine::new(Level::Info, "🎯 Fake functions loaded! Try them out:"),
        ConsoleLine::new(Level::Log, "   • help() - Your trusty guide"),
        ConsoleLine::new(
            Level::Log,
            "   • coffee.inject() - Essential for Monday mornings",
        ),
        ConsoleLine::new(Level::Log, "   • systemStatus() - Check the chaos level"),
        ConsoleLine::new(
            Level::Warn,
            "💡 Hint: Try typing help(), coffee.inject(), wake.up(), or systemStatus()",
        ),
    ]);
    lines
}

/// The banner played well after the script, picked by period
pub fn closing_art(period: TimePeriod, rng: &mut dyn RngCore) -> Vec<ConsoleLine> {
    let art = match period {
        TimePeriod::MondayMorning => Art::Fail,
        TimePeriod::LateNight => Art::Sleeping,
        TimePeriod::AprilFools => random_art(rng),
        TimePeriod::Normal | TimePeriod::FridayAfternoon => Art::Loading,
    };
    std::iter::once(ConsoleLine::new(Level::Log, ""))
        .chain(art.to_console())
        .collect()
}

const SYSTEM_STATUSES: [&str; 7] = [
    "BARELY_FUNCTIONING",
    "COFFEE_DEPRIVED",
    "MONDAY_MODE",
    "WEEKEND_READY",
    "DEBUGGING_LIFE",
    "STACK_OVERFLOW",
    "NEEDS_REBOOT",
];

/// The joke functions the console pretends to expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Command {
    #[strum(serialize = "help()")]
    Help,
    #[strum(serialize = "wake.up()")]
    WakeUp,
    #[strum(serialize = "coffee.inject()")]
    CoffeeInject,
    #[strum(serialize = "systemStatus()")]
    SystemStatus,
    #[strum(serialize = "ascii()")]
    Ascii,
    #[strum(serialize = "panic()")]
    Panic,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Help,
        Command::WakeUp,
        Command::CoffeeInject,
        Command::SystemStatus,
        Command::Ascii,
        Command::Panic,
    ];

    fn summary(self) -> &'static str {
        match self {
            Command::Help => "Show this help message",
            Command::WakeUp => "Attempt to wake the system (deprecated)",
            Command::CoffeeInject => "Alternative wake method",
            Command::SystemStatus => "Check current system status",
            Command::Ascii => "Display random ASCII art",
            Command::Panic => "Emergency protocols",
        }
    }

    /// Output printed right away. `coffee.inject()` finishes later with
    /// `coffee_brewed`.
    pub fn run(self, rng: &mut dyn RngCore) -> Vec<ConsoleLine> {
        let mut out = vec![ConsoleLine::new(Level::Log, format!("> {self}"))];
        match self {
            Command::Help => {
                out.push(ConsoleLine::new(Level::Info, "📚 Available Commands:"));
                out.extend(Command::ALL.iter().map(|c| {
                    ConsoleLine::new(Level::Log, format!("  {:<16}- {}", c.to_string(), c.summary()))
                }));
                out.push(ConsoleLine::new(
                    Level::Warn,
                    "💡 Pro tip: Use these commands to monitor and control system state.",
                ));
            }
            Command::WakeUp => out.extend([
                ConsoleLine::new(
                    Level::Error,
                    "❌ ERROR: Function wake.up() is deprecated since version 2.1.0",
                ),
                ConsoleLine::new(Level::Warn, "⚠️  Use coffee.inject() instead"),
                ConsoleLine::new(
                    Level::Log,
                    "📝 Migration guide: https://wake.fail/docs/migration (404)",
                ),
            ]),
            Command::CoffeeInject => out.extend([
                ConsoleLine::new(Level::Log, "☕ Injecting coffee... Please wait..."),
                ConsoleLine::new(Level::Log, "☕ Coffee.exe is running..."),
            ]),
            Command::SystemStatus => {
                let status = SYSTEM_STATUSES.choose(rng).unwrap_or(&"NEEDS_REBOOT");
                out.extend([
                    ConsoleLine::new(Level::Info, "🖥️  System Status Report"),
                    ConsoleLine::new(Level::Info, "───────────────────────"),
                    ConsoleLine::new(Level::Log, format!("   Status: {status}")),
                    ConsoleLine::new(
                        Level::Log,
                        format!(
                            "   Uptime: {}d {}h",
                            rng.gen_range(0..999),
                            rng.gen_range(0..24)
                        ),
                    ),
                    ConsoleLine::new(
                        Level::Log,
                        format!("   Load: {:.2}", rng.gen_range(0.0..3.0)),
                    ),
                    ConsoleLine::new(
                        Level::Log,
                        format!("   Memory: {}% used", rng.gen_range(0..100)),
                    ),
                    ConsoleLine::new(
                        Level::Log,
                        format!("   Motivation: {}%", rng.gen_range(0..50)),
                    ),
                ]);
            }
            Command::Ascii => {
                out.extend(random_art(rng).to_console());
                out.push(ConsoleLine::new(Level::Log, "🎨 Random ASCII art displayed!"));
            }
            Command::Panic => {
                out.extend([
                    ConsoleLine::new(Level::Error, "🚨 PANIC MODE ACTIVATED! 🚨"),
                    ConsoleLine::new(Level::Error, "🔥 EVERYTHING IS ON FIRE! 🔥"),
                    ConsoleLine::new(
                        Level::Warn,
                        "⚠️  Just kidding! Everything is fine... probably.",
                    ),
                    ConsoleLine::new(
                        Level::Log,
                        "😌 Take a deep breath. It's just a loading screen.",
                    ),
                ]);
                out.extend(Art::Fail.to_console());
                out.push(ConsoleLine::new(Level::Log, "🧯 Fire extinguisher deployed."));
            }
        }
        out
    }
}

/// Follow-up to `coffee.inject()`
pub fn coffee_brewed() -> Vec<ConsoleLine> {
    vec![
        ConsoleLine::new(
            Level::Log,
            "✅ Coffee injection complete! System alertness: +15%",
        ),
        ConsoleLine::new(Level::Log, "🔋 Energy levels: [||||||||||||||||████] 80%"),
    ]
}

/// Bounded log of everything the console has printed.
///
/// Readers either look at the tail (the TUI panel) or drain what they have
/// not seen yet (the headless stderr stream).
#[derive(Debug, Default)]
pub struct Console {
    lines: VecDeque<ConsoleLine>,
    unread: usize,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: ConsoleLine) {
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        self.unread = (self.unread + 1).min(MAX_LINES);
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = ConsoleLine>) {
        for line in lines {
            self.push(line);
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The last `n` lines, oldest first
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &ConsoleLine> {
        self.lines.iter().skip(self.lines.len().saturating_sub(n))
    }

    pub fn take_unread(&mut self) -> Vec<ConsoleLine> {
        let skip = self.lines.len() - self.unread;
        self.unread = 0;
        self.lines.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn normal_script_is_the_opening_only() {
        let cues = script(TimePeriod::Normal);
        assert_eq!(cues.len(), 8);
        assert_eq!(cues[0].text, "[SYSTEM] Initializing wake sequence...");
        assert_eq!(cues[7].at_ms, 14_000);
    }

    #[test]
    fn period_codas_follow_the_opening() {
        let monday = script(TimePeriod::MondayMorning);
        assert_eq!(monday.len(), 10);
        assert_eq!(
            monday[9].text,
            "[ERROR] Insufficient coffee.exe found in system"
        );
        assert_eq!(monday[9].level, Level::Error);

        let night = script(TimePeriod::LateNight);
        assert_eq!(night[9].text, "[SYSTEM] Sleep.exe is running...");

        let friday = script(TimePeriod::FridayAfternoon);
        assert_eq!(friday[8].text, "[AI] Friday detected! Weekend protocols loading...");
    }

    #[test]
    fn april_fools_has_its_own_short_script() {
        let cues = script(TimePeriod::AprilFools);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].at_ms, 1_000);
        assert_eq!(cues[1].at_ms, 3_000);
    }

    #[test]
    fn scripts_play_in_time_order() {
        for period in TimePeriod::ALL {
            let cues = script(period);
            assert!(cues.windows(2).all(|w| w[0].at_ms < w[1].at_ms), "{period}");
        }
    }

    #[test]
    fn closing_art_matches_the_period() {
        let mut rng = StdRng::seed_from_u64(3);
        let monday = closing_art(TimePeriod::MondayMorning, &mut rng);
        assert_eq!(monday[0].text, "");
        assert_eq!(monday[1].text, Art::Fail.lines()[0]);

        let night = closing_art(TimePeriod::LateNight, &mut rng);
        assert_eq!(night[1].text, Art::Sleeping.lines()[0]);

        let friday = closing_art(TimePeriod::FridayAfternoon, &mut rng);
        assert_eq!(friday[1].text, Art::Loading.lines()[0]);

        let fools = closing_art(TimePeriod::AprilFools, &mut rng);
        assert!(Art::ALL.iter().any(|a| a.lines()[0] == fools[1].text));
    }

    #[test]
    fn help_lists_every_command() {
        let out = Command::Help.run(&mut StdRng::seed_from_u64(1));
        assert_eq!(out[0].text, "> help()");
        for command in Command::ALL {
            let name = command.to_string();
            assert!(out.iter().any(|l| l.text.trim_start().starts_with(&name)), "{name}");
        }
    }

    #[test]
    fn wake_up_is_deprecated() {
        let out = Command::WakeUp.run(&mut StdRng::seed_from_u64(1));
        assert_eq!(out[1].level, Level::Error);
        assert!(out[1].text.contains("deprecated since version 2.1.0"));
    }

    #[test]
    fn system_status_reports_a_known_status() {
        let out = Command::SystemStatus.run(&mut StdRng::seed_from_u64(5));
        let status = out
            .iter()
            .find_map(|l| l.text.strip_prefix("   Status: "))
            .unwrap();
        assert!(SYSTEM_STATUSES.contains(&status));
        assert!(out.iter().any(|l| l.text.starts_with("   Motivation: ")));
    }

    #[test]
    fn panic_ends_with_the_extinguisher() {
        let out = Command::Panic.run(&mut StdRng::seed_from_u64(1));
        assert_eq!(out[1].text, "🚨 PANIC MODE ACTIVATED! 🚨");
        assert_eq!(out.last().unwrap().text, "🧯 Fire extinguisher deployed.");
    }

    #[test]
    fn unread_lines_drain_once() {
        let mut console = Console::new();
        console.extend(banner());
        let first = console.take_unread();
        assert_eq!(first.len(), console.len());
        assert!(console.take_unread().is_empty());

        console.extend(coffee_brewed());
        let next = console.take_unread();
        assert_eq!(next, coffee_brewed());
    }

    #[test]
    fn log_is_bounded() {
        let mut console = Console::new();
        for i in 0..MAX_LINES + 10 {
            console.push(ConsoleLine::new(Level::Log, i.to_string()));
        }
        assert_eq!(console.len(), MAX_LINES);
        assert_eq!(console.tail(1).next().unwrap().text, (MAX_LINES + 9).to_string());
        assert_eq!(console.take_unread().len(), MAX_LINES);
        assert_eq!(console.tail(2).count(), 2);
    }
}
