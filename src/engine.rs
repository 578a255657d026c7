//! Progress animation engine.
//!
//! Owns progress, message and phase for the active period. Every entry
//! point that comes from a timer carries the epoch it was scheduled under;
//! anything from an older activation is dropped without touching state.

use crate::curve::{self, TickContext};
use crate::period::TimePeriod;
use crate::progress_config::{DeferredTransition, ProgressConfig, DEFAULT_MESSAGE};
use log::{debug, info, trace};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    DeferredTransitionPending,
    Animating,
    Frozen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Unclamped; read through `ProgressEngine::progress`
    pub progress: f64,
    pub message: String,
    pub show_secondary: bool,
    pub is_complete: bool,
    pub phase: Phase,
}

impl EngineState {
    fn initial(period: TimePeriod, config: &ProgressConfig) -> Self {
        Self {
            progress: config.initial_progress,
            message: config.message.clone(),
            show_secondary: false,
            is_complete: period == TimePeriod::AprilFools && config.initial_progress == 100.0,
            phase: Phase::Idle,
        }
    }
}

/// What the caller has to schedule for a fresh activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub epoch: u64,
    pub deferred: Option<DeferredTransition>,
}

#[derive(Debug)]
pub struct ProgressEngine {
    period: TimePeriod,
    config: ProgressConfig,
    state: EngineState,
    epoch: u64,
    freeze_ceiling: Option<f64>,
}

impl ProgressEngine {
    /// A resting engine for `period`. Nothing ticks until `activate`.
    pub fn new(period: TimePeriod, config: ProgressConfig) -> Self {
        Self {
            state: EngineState::initial(period, &config),
            period,
            config,
            epoch: 0,
            freeze_ceiling: None,
        }
    }

    /// Resets to the initial state of `period` and leaves `Idle` right away,
    /// either waiting on a deferred transition or animating.
    ///
    /// Bumps the epoch, so timers scheduled for the previous activation go stale.
    pub fn activate(&mut self, period: TimePeriod, config: ProgressConfig) -> Activation {
        self.epoch += 1;
        self.period = period;
        self.state = EngineState::initial(period, &config);
        self.config = config;
        self.freeze_ceiling = None;

        let deferred = DeferredTransition::for_period(period);
        self.state.phase = match deferred {
            Some(_) => Phase::DeferredTransitionPending,
            None => Phase::Animating,
        };

        info!(
            "activated {} (epoch {}) at {:.1}% with {:?}",
            self.period, self.epoch, self.state.progress, self.state.phase
        );

        Activation {
            epoch: self.epoch,
            deferred,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Runs the one-shot transition for the current period. Returns false
    /// (and changes nothing) for a stale epoch or a transition already run.
    pub fn apply_deferred(&mut self, transition: DeferredTransition, epoch: u64) -> bool {
        if !self.is_current(epoch) {
            debug!("dropping stale {transition:?} from epoch {epoch}");
            return false;
        }
        if self.state.phase != Phase::DeferredTransitionPending {
            return false;
        }

        match transition {
            DeferredTransition::AprilFoolsReveal => {
                self.state.progress = transition.ceiling();
                self.state.message = self
                    .config
                    .secondary_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
                self.state.is_complete = false;
                self.state.show_secondary = true;
            }
            DeferredTransition::FridayFreeze => {
                self.state.progress = transition.ceiling();
                self.state.show_secondary = true;
                self.state.message = self
                    .config
                    .secondary_message
                    .clone()
                    .unwrap_or_else(|| self.config.message.clone());
            }
        }

        self.freeze_ceiling = Some(transition.ceiling());
        self.state.phase = Phase::Frozen;
        debug!("{transition:?} fired, progress pinned at {}", self.state.progress);
        true
    }

    /// One curve step. Only moves while animating or frozen.
    pub fn tick(&mut self, epoch: u64, wall_clock_secs: f64) -> bool {
        if !self.is_current(epoch) {
            debug!("dropping stale tick from epoch {epoch}");
            return false;
        }
        if !self.is_ticking() {
            return false;
        }

        let ctx = TickContext {
            wall_clock_secs,
            freeze_ceiling: self.freeze_ceiling,
        };
        self.state.progress = curve::next(self.state.progress, &self.config, &ctx);
        self.state.phase = match self.freeze_ceiling {
            Some(ceiling) if self.state.progress >= ceiling => Phase::Frozen,
            _ => Phase::Animating,
        };
        trace!("tick -> {:.3}", self.state.progress);
        true
    }

    pub fn is_ticking(&self) -> bool {
        matches!(self.state.phase, Phase::Animating | Phase::Frozen)
    }

    /// Pushes progress up by `amount`, never past 100 or an active freeze
    /// ceiling. Returns the new value.
    pub fn nudge(&mut self, amount: f64) -> f64 {
        let cap = self.freeze_ceiling.unwrap_or(100.0).max(self.state.progress);
        self.state.progress = (self.state.progress + amount).min(cap);
        self.state.progress
    }

    /// True once a deferred transition has pinned progress.
    pub fn is_pinned(&self) -> bool {
        self.freeze_ceiling.is_some()
    }

    /// Steps progress down towards `floor`. Never goes below it and never
    /// lifts a value that is already under it.
    pub fn decay_toward(&mut self, floor: f64, step: f64) -> bool {
        if self.state.progress <= floor {
            return false;
        }
        self.state.progress = (self.state.progress - step).max(floor);
        true
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.state.message = message.into();
    }

    /// Progress as observed from outside, always within 0..=100
    pub fn progress(&self) -> f64 {
        self.state.progress.clamp(0.0, 100.0)
    }

    pub fn period(&self) -> TimePeriod {
        self.period
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn message(&self) -> &str {
        &self.state.message
    }

    pub fn freeze_ceiling(&self) -> Option<f64> {
        self.freeze_ceiling
    }
}
