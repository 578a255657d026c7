//! One loading-screen session: the clock, randomness, timers, engine and
//! interactivity controller, and the snapshot the front end reads.

use crate::clock::Clock;
use crate::config::{Config, Timings};
use crate::console::{self, Command, Console, ConsoleLine};
use crate::engine::{Activation, Phase, ProgressEngine};
use crate::interactivity::InteractivityController;
use crate::mood;
use crate::period::{self, PeriodOverride, TimePeriod};
use crate::progress_config::{self, DeferredTransition};
use crate::theme::{self, ThemeLabel};
use crate::timers::{Fired, TimerKind, TimerScope, Timers};
use chrono::{DateTime, Local};
use log::{debug, info};
use rand::RngCore;
use serde::Serialize;

pub type Classifier = fn(&DateTime<Local>) -> TimePeriod;

/// Read-only view handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub time_period: TimePeriod,
    pub progress: f64,
    pub message: String,
    pub secondary_shown: bool,
    pub is_complete: bool,
    pub is_interactive: bool,
    pub is_cursor_idle: bool,
    pub is_layout_broken: bool,
    pub click_count: u32,
    pub theme: ThemeLabel,
    pub phase: Phase,
    pub mood: &'static str,
    pub elapsed_ms: u64,
}

pub struct LoadingSession<C: Clock> {
    clock: C,
    rng: Box<dyn RngCore>,
    classifier: Classifier,
    timings: Timings,
    period_override: PeriodOverride,
    theme: ThemeLabel,
    engine: ProgressEngine,
    interactivity: InteractivityController,
    timers: Timers,
    console: Console,
    /// The period the console script was written for. Fixed at start.
    theater: TimePeriod,
    started_at_ms: u64,
    running: bool,
}

impl<C: Clock> LoadingSession<C> {
    pub fn new(clock: C, rng: Box<dyn RngCore>, config: &Config) -> Self {
        Self::with_classifier(clock, rng, config, period::classify)
    }

    /// Picks the session theme and resolves the first period. Nothing is
    /// scheduled until `start`.
    pub fn with_classifier(
        clock: C,
        mut rng: Box<dyn RngCore>,
        config: &Config,
        classifier: Classifier,
    ) -> Self {
        let now_ms = clock.now_ms();
        let theme = theme::pick_theme(rng.as_mut());
        let period = config.period.resolve(&clock.wall_clock(), classifier);
        let progress_config = progress_config::resolve(period, theme, rng.as_mut());

        Self {
            engine: ProgressEngine::new(period, progress_config),
            interactivity: InteractivityController::new(config.timings, now_ms),
            timers: Timers::new(),
            console: Console::new(),
            theater: period,
            timings: config.timings,
            period_override: config.period,
            started_at_ms: now_ms,
            running: false,
            clock,
            rng,
            classifier,
            theme,
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        let now_ms = self.clock.now_ms();
        self.running = true;
        self.started_at_ms = now_ms;

        let period = self.engine.period();
        let config = self.engine.config().clone();
        let activation = self.engine.activate(period, config);
        self.arm_period(activation, now_ms);
        self.interactivity.schedule(&mut self.timers, now_ms);
        self.schedule_theater(period, now_ms);
        info!("session started: {period}, theme {}", self.theme);
    }

    /// Prints the banner and queues the script and closing art. The theater
    /// plays once per session, whatever the demo switches to later.
    fn schedule_theater(&mut self, period: TimePeriod, now_ms: u64) {
        self.theater = period;
        self.console.extend(console::banner());
        for (index, cue) in console::script(period).iter().enumerate() {
            self.timers.once(
                TimerKind::ConsoleCue(index),
                TimerScope::Session,
                now_ms,
                self.timings.theater_delay_ms + cue.at_ms,
            );
        }
        self.timers.once(
            TimerKind::ClosingArt,
            TimerScope::Session,
            now_ms,
            self.timings.closing_art_ms,
        );
    }

    /// Ends the session. Every pending timer is dropped.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.running = false;
        info!("session ended after {}ms", self.elapsed_ms());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Applies a demo override. Only a change of period identity resets
    /// the engine.
    pub fn set_override(&mut self, period_override: PeriodOverride) {
        self.period_override = period_override;
        let period = period_override.resolve(&self.clock.wall_clock(), self.classifier);
        if period != self.engine.period() {
            self.switch_period(period);
        }
    }

    fn switch_period(&mut self, period: TimePeriod) {
        let dropped = self.timers.cancel_period_timers();
        debug!("switching to {period}, cancelled {dropped} period timers");

        let now_ms = self.clock.now_ms();
        let config = progress_config::resolve(period, self.theme, self.rng.as_mut());
        let activation = self.engine.activate(period, config);
        if self.running {
            self.arm_period(activation, now_ms);
        }
    }

    fn arm_period(&mut self, activation: Activation, now_ms: u64) {
        let scope = TimerScope::Period(activation.epoch);
        match activation.deferred {
            Some(transition) => {
                let delay = self.deferred_delay(transition);
                self.timers
                    .once(TimerKind::Deferred(transition), scope, now_ms, delay);
            }
            None => {
                self.timers
                    .every(TimerKind::EngineTick, scope, now_ms, self.timings.tick_ms);
            }
        }
    }

    fn deferred_delay(&self, transition: DeferredTransition) -> u64 {
        match transition {
            DeferredTransition::AprilFoolsReveal => self.timings.april_fools_delay_ms,
            DeferredTransition::FridayFreeze => self.timings.friday_delay_ms,
        }
    }

    /// Runs every timer that is due, earliest first. Returns how many fired.
    pub fn pump(&mut self) -> usize {
        if !self.running {
            return 0;
        }
        let now_ms = self.clock.now_ms();
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(now_ms) {
            self.dispatch(timer, now_ms);
            fired += 1;
        }
        fired
    }

    fn dispatch(&mut self, fired: Fired, now_ms: u64) {
        let epoch = match fired.scope {
            TimerScope::Period(epoch) => {
                if !self.engine.is_current(epoch) {
                    debug!("dropping stale {:?} from epoch {epoch}", fired.kind);
                    return;
                }
                epoch
            }
            TimerScope::Session => self.engine.epoch(),
        };

        match fired.kind {
            TimerKind::EngineTick => {
                // the user owns progress once interactive, except in the
                // periods whose curve pins the value
                if self.interactivity.is_interactive()
                    && !self.engine.period().has_deferred_transition()
                {
                    return;
                }
                let wall = self.clock.wall_clock_secs();
                self.engine.tick(epoch, wall);
            }
            TimerKind::Deferred(transition) => {
                if self.engine.apply_deferred(transition, epoch) {
                    self.timers.every(
                        TimerKind::EngineTick,
                        TimerScope::Period(epoch),
                        now_ms,
                        self.timings.tick_ms,
                    );
                }
            }
            TimerKind::Activate => {
                self.interactivity.activate(&mut self.engine);
            }
            TimerKind::Decay => {
                self.interactivity.decay(&mut self.engine, now_ms);
            }
            TimerKind::IdleCheck => {
                self.interactivity.idle_check(now_ms);
            }
            TimerKind::LayoutClear => {
                self.interactivity.clear_layout(fired.id);
            }
            TimerKind::ConsoleCue(index) => {
                if let Some(cue) = console::script(self.theater).get(index) {
                    self.console.push(ConsoleLine::new(cue.level, cue.text));
                }
            }
            TimerKind::ClosingArt => {
                let art = console::closing_art(self.theater, self.rng.as_mut());
                self.console.extend(art);
            }
            TimerKind::CoffeeBrewed => {
                self.console.extend(console::coffee_brewed());
            }
        }
    }

    /// Click on the progress bar. Returns the nudge applied, if any.
    pub fn click(&mut self) -> Option<f64> {
        if !self.running {
            return None;
        }
        self.pump();
        let now_ms = self.clock.now_ms();
        self.interactivity
            .click(&mut self.engine, now_ms, self.rng.as_mut())
    }

    pub fn pointer_move(&mut self) {
        if !self.running {
            return;
        }
        self.pump();
        self.interactivity.pointer_move(self.clock.now_ms());
    }

    pub fn window_resize(&mut self) {
        if !self.running {
            return;
        }
        self.pump();
        let now_ms = self.clock.now_ms();
        self.interactivity.resize(&mut self.timers, now_ms);
    }

    /// Runs one of the console's joke commands
    pub fn console_command(&mut self, command: Command) {
        if !self.running {
            return;
        }
        self.pump();
        debug!("console: {command}");
        let now_ms = self.clock.now_ms();
        let out = command.run(self.rng.as_mut());
        self.console.extend(out);
        if command == Command::CoffeeInject {
            self.timers.once(
                TimerKind::CoffeeBrewed,
                TimerScope::Session,
                now_ms,
                self.timings.coffee_brew_ms,
            );
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Console lines printed since the last call
    pub fn drain_console(&mut self) -> Vec<ConsoleLine> {
        self.console.take_unread()
    }

    pub fn snapshot(&self) -> Snapshot {
        let engine = self.engine.state();
        let interactivity = self.interactivity.state();
        let message = self
            .interactivity
            .message_overlay()
            .map(str::to_string)
            .unwrap_or_else(|| engine.message.clone());

        Snapshot {
            time_period: self.engine.period(),
            progress: self.engine.progress(),
            message,
            secondary_shown: engine.show_secondary,
            is_complete: engine.is_complete,
            is_interactive: interactivity.is_interactive,
            is_cursor_idle: interactivity.is_cursor_idle,
            is_layout_broken: interactivity.is_layout_broken,
            click_count: interactivity.click_count,
            theme: self.theme,
            phase: engine.phase,
            mood: mood::glyph_at(self.elapsed_ms(), self.timings.mood_stage_ms),
            elapsed_ms: self.elapsed_ms(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.started_at_ms)
    }

    pub fn period(&self) -> TimePeriod {
        self.engine.period()
    }

    pub fn period_override(&self) -> PeriodOverride {
        self.period_override
    }

    pub fn theme(&self) -> ThemeLabel {
        self.theme
    }

    pub fn engine(&self) -> &ProgressEngine {
        &self.engine
    }

    pub fn interactivity(&self) -> &InteractivityController {
        &self.interactivity
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> Drop for LoadingSession<C> {
    fn drop(&mut self) {
        if self.running {
            self.teardown();
        }
    }
}
