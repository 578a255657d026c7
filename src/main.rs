pub mod ui;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::info;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::Duration,
};
use wakefail::{
    clock::{Clock, ManualClock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    period::PeriodOverride,
    runtime::{CrosstermEventSource, FixedTicker, LoadingEvent, Runner},
    session::LoadingSession,
};

/// Resolution of the simulated clock in headless mode
const HEADLESS_STEP_MS: u64 = 10;

/// a loading screen that never quite loads
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A loading screen whose mood follows the clock: sluggish on Monday mornings, stuck at 99.9% on Friday afternoons, asleep late at night. Click the bar to help it along."
)]
pub struct Cli {
    /// period to act out: auto, normal, monday, friday, night or april-fools
    #[clap(short = 'p', long)]
    period: Option<PeriodOverride>,

    /// milliseconds between progress ticks
    #[clap(short = 't', long)]
    tick_ms: Option<u64>,

    /// seed for theme, messages and click nudges
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// simulate the session without a terminal and print one JSON snapshot per second
    #[clap(long)]
    headless: bool,

    /// simulated seconds to run in headless mode
    #[clap(short = 'd', long, default_value_t = 10)]
    duration_secs: u64,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// config file to use instead of the per-user one
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Flags given on the command line win over the stored config.
    fn apply(&self, config: &mut Config) {
        if let Some(period) = self.period {
            config.period = period;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.timings.tick_ms = tick_ms;
        }
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        }
    }

    fn store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App<C: Clock> {
    pub session: LoadingSession<C>,
    pub panels: ui::Panels,
}

impl<C: Clock> App<C> {
    pub fn new(session: LoadingSession<C>) -> Self {
        Self {
            session,
            panels: ui::Panels::default(),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            // ctrl+c to quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            KeyCode::Char('d') => self.panels.demo = !self.panels.demo,
            KeyCode::Char('c') => self.panels.console = !self.panels.console,
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.session.click();
            }
            KeyCode::Char(c) => {
                if let Some(choice) = ui::demo_choice(c).filter(|_| self.panels.demo) {
                    self.session.set_override(choice);
                } else if let Some(command) = ui::console_command(c).filter(|_| self.panels.console)
                {
                    self.session.console_command(command);
                }
            }
            _ => {}
        }
        Control::Continue
    }

    /// A click on the bar helps it load. Anywhere else it only shows the
    /// cursor is alive.
    pub fn on_click(&mut self, column: u16, row: u16, area: Rect) {
        let areas = ui::layout(area, &self.session.snapshot(), self.panels);
        if areas.gauge.contains(Position::new(column, row)) {
            self.session.click();
        } else {
            self.session.pointer_move();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = cli.store();
    let mut config = store.load();
    cli.apply(&mut config);

    if cli.save_config {
        store.save(&config)?;
        info!("saved config to {}", store.path().display());
    }

    if cli.headless {
        return run_headless(&config, cli.rng(), cli.duration_secs);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty (or pass --headless)")
            .exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut session = LoadingSession::new(SystemClock::new(), cli.rng(), &config);
    session.start();
    let mut app = App::new(session);
    let tick = Duration::from_millis(config.timings.tick_ms.max(1));
    let result = start_tui(&mut terminal, &mut app, tick);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<SystemClock>,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));

    loop {
        app.session.pump();
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            LoadingEvent::Tick => {}
            LoadingEvent::Resize => app.session.window_resize(),
            LoadingEvent::PointerMove => app.session.pointer_move(),
            LoadingEvent::Click { column, row } => {
                let size = terminal.size()?;
                app.on_click(column, row, Rect::new(0, 0, size.width, size.height));
            }
            LoadingEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
        }
    }

    app.session.teardown();
    Ok(())
}

/// Runs the session on a simulated clock and prints a snapshot at start and
/// after every simulated second. Console theater goes to stderr as it plays.
fn run_headless(
    config: &Config,
    rng: Box<dyn RngCore>,
    duration_secs: u64,
) -> Result<(), Box<dyn Error>> {
    let clock = ManualClock::new(Local::now());
    let mut session = LoadingSession::new(clock.clone(), rng, config);
    session.start();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut console = stderr.lock();

    for line in session.drain_console() {
        writeln!(console, "{line}")?;
    }
    serde_json::to_writer(&mut out, &session.snapshot())?;
    writeln!(out)?;

    for second in 1..=duration_secs {
        let target = second * 1_000;
        while clock.now_ms() < target {
            clock.advance_ms(HEADLESS_STEP_MS.min(target - clock.now_ms()));
            session.pump();
            for line in session.drain_console() {
                writeln!(console, "{line}")?;
            }
        }
        serde_json::to_writer(&mut out, &session.snapshot())?;
        writeln!(out)?;
    }

    session.teardown();
    Ok(())
}
