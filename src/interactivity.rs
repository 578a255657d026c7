//! Interactivity layered over the engine: clicking helps, neglect decays,
//! an idle cursor gets asked if anyone is there, and resizing the window
//! "breaks" the layout for a moment.

use crate::config::Timings;
use crate::engine::ProgressEngine;
use crate::timers::{TimerId, TimerKind, TimerScope, Timers};
use log::{debug, info};
use rand::{Rng, RngCore};
use serde::Serialize;

pub const ACTIVATION_PROMPT: &str = "Click the progress bar to help it load! 👆";
pub const IDLE_PROMPT: &str = "Are you still there? 👀";

pub const CLICK_NUDGE_MIN: f64 = 2.0;
pub const CLICK_NUDGE_MAX: f64 = 5.0;

/// Encouragement for the click count after the latest click
pub fn click_message(click_count: u32) -> &'static str {
    match click_count {
        0..=4 => "Good! Keep clicking!",
        5..=9 => "You're getting the hang of it! 💪",
        _ => "Wow, you're dedicated! 🏆",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractivityState {
    pub is_interactive: bool,
    pub click_count: u32,
    pub last_click_ms: Option<u64>,
    pub last_pointer_move_ms: u64,
    pub is_cursor_idle: bool,
    pub is_layout_broken: bool,
}

#[derive(Debug)]
pub struct InteractivityController {
    state: InteractivityState,
    timings: Timings,
    layout_clear: Option<TimerId>,
}

impl InteractivityController {
    pub fn new(timings: Timings, now_ms: u64) -> Self {
        Self {
            state: InteractivityState {
                is_interactive: false,
                click_count: 0,
                last_click_ms: None,
                last_pointer_move_ms: now_ms,
                is_cursor_idle: false,
                is_layout_broken: false,
            },
            timings,
            layout_clear: None,
        }
    }

    /// Arms the activation delay and the periodic decay/idle checks.
    pub fn schedule(&self, timers: &mut Timers, now_ms: u64) {
        let t = &self.timings;
        timers.once(TimerKind::Activate, TimerScope::Session, now_ms, t.activation_delay_ms);
        timers.every(TimerKind::Decay, TimerScope::Session, now_ms, t.decay_interval_ms);
        timers.every(TimerKind::IdleCheck, TimerScope::Session, now_ms, t.idle_check_ms);
    }

    /// Hands progress over to the user and shows the click prompt.
    pub fn activate(&mut self, engine: &mut ProgressEngine) -> bool {
        if self.state.is_interactive {
            return false;
        }
        self.state.is_interactive = true;
        engine.set_message(ACTIVATION_PROMPT);
        info!("interactive mode on");
        true
    }

    /// Returns the nudge applied, or `None` when clicks don't count yet.
    pub fn click(
        &mut self,
        engine: &mut ProgressEngine,
        now_ms: u64,
        rng: &mut dyn RngCore,
    ) -> Option<f64> {
        if !self.state.is_interactive {
            return None;
        }

        self.state.click_count += 1;
        self.state.last_click_ms = Some(now_ms);
        self.note_pointer_activity(now_ms);

        let nudge = rng.gen_range(CLICK_NUDGE_MIN..=CLICK_NUDGE_MAX);
        let before = engine.progress();
        let after = engine.nudge(nudge);
        engine.set_message(click_message(self.state.click_count));

        debug!(
            "click #{}: {before:.2} -> {after:.2}",
            self.state.click_count
        );
        Some(after - before)
    }

    /// Pulls progress back towards the period's starting value once the
    /// user has stopped clicking for a while. Nothing decays before the
    /// first click, and pinned progress never decays.
    pub fn decay(&mut self, engine: &mut ProgressEngine, now_ms: u64) -> bool {
        if !self.state.is_interactive || engine.is_pinned() {
            return false;
        }
        let Some(last_click) = self.state.last_click_ms else {
            return false;
        };
        if now_ms.saturating_sub(last_click) <= self.timings.decay_threshold_ms {
            return false;
        }
        let floor = engine.config().initial_progress;
        engine.decay_toward(floor, self.timings.decay_step)
    }

    pub fn pointer_move(&mut self, now_ms: u64) {
        self.note_pointer_activity(now_ms);
    }

    fn note_pointer_activity(&mut self, now_ms: u64) {
        self.state.last_pointer_move_ms = now_ms;
        self.state.is_cursor_idle = false;
    }

    /// Marks the cursor idle after the threshold without movement.
    pub fn idle_check(&mut self, now_ms: u64) -> bool {
        if self.state.is_cursor_idle {
            return false;
        }
        let still_for = now_ms.saturating_sub(self.state.last_pointer_move_ms);
        if still_for > self.timings.idle_threshold_ms {
            self.state.is_cursor_idle = true;
            debug!("cursor idle after {still_for}ms");
            return true;
        }
        false
    }

    /// Breaks the layout and (re)starts its single auto-clear timer.
    pub fn resize(&mut self, timers: &mut Timers, now_ms: u64) {
        if let Some(previous) = self.layout_clear.take() {
            timers.cancel(previous);
            debug!("resize while broken, restarting layout clear");
        }
        self.state.is_layout_broken = true;
        self.layout_clear = Some(timers.once(
            TimerKind::LayoutClear,
            TimerScope::Session,
            now_ms,
            self.timings.layout_clear_ms,
        ));
    }

    /// Clears the broken layout if `timer` is the clear currently armed.
    pub fn clear_layout(&mut self, timer: TimerId) -> bool {
        if self.layout_clear != Some(timer) {
            return false;
        }
        self.layout_clear = None;
        self.state.is_layout_broken = false;
        true
    }

    /// Message that wins over whatever the engine holds
    pub fn message_overlay(&self) -> Option<&'static str> {
        (self.state.is_interactive && self.state.is_cursor_idle).then_some(IDLE_PROMPT)
    }

    pub fn state(&self) -> &InteractivityState {
        &self.state
    }

    pub fn is_interactive(&self) -> bool {
        self.state.is_interactive
    }
}
