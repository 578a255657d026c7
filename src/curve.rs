//! The progress curve: one pure step from the previous value to the next.
//!
//! Pulsing periods follow a sine of the wall clock inside a fixed band.
//! Everything else creeps toward 100 and never passes an active freeze.

use crate::progress_config::ProgressConfig;

/// Time inputs for one curve step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickContext {
    /// Wall clock in seconds since the unix epoch. Pulsing reads this
    /// rather than elapsed time so every pulsing screen stays in phase.
    pub wall_clock_secs: f64,
    pub freeze_ceiling: Option<f64>,
}

pub const PULSE_MIN: f64 = 20.0;
pub const PULSE_MAX: f64 = 60.0;

/// Next progress value after one tick.
pub fn next(prev: f64, config: &ProgressConfig, ctx: &TickContext) -> f64 {
    if config.is_pulsing {
        let pulse = ctx.wall_clock_secs.sin() * 10.0 + 50.0;
        return pulse.clamp(PULSE_MIN, PULSE_MAX);
    }

    if let Some(ceiling) = ctx.freeze_ceiling {
        if prev >= ceiling {
            return ceiling;
        }
    }

    let remaining = 100.0 - prev;
    let advanced = prev + remaining * config.speed;

    match ctx.freeze_ceiling {
        Some(ceiling) => advanced.min(ceiling),
        None => advanced,
    }
}
