use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadingEvent {
    Key(KeyEvent),
    /// Left button pressed at a terminal cell
    Click { column: u16, row: u16 },
    PointerMove,
    Resize,
    Tick,
}

impl LoadingEvent {
    fn from_crossterm(event: CtEvent) -> Option<Self> {
        match event {
            CtEvent::Key(key) => Some(Self::Key(key)),
            CtEvent::Resize(_, _) => Some(Self::Resize),
            CtEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(Self::Click {
                    column: mouse.column,
                    row: mouse.row,
                }),
                MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Self::PointerMove),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait LoadingEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<LoadingEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<LoadingEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    let Some(ev) = LoadingEvent::from_crossterm(ev) else {
                        continue;
                    };
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LoadingEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<LoadingEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<LoadingEvent>) -> Self {
        Self { rx }
    }
}

impl LoadingEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LoadingEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: LoadingEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: LoadingEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> LoadingEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                LoadingEvent::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use std::sync::mpsc;

    fn mouse(kind: MouseEventKind) -> CtEvent {
        CtEvent::Mouse(MouseEvent {
            kind,
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        assert_eq!(runner.step(), LoadingEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoadingEvent::Resize).unwrap();
        tx.send(LoadingEvent::PointerMove).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        assert_eq!(runner.step(), LoadingEvent::Resize);
        assert_eq!(runner.step(), LoadingEvent::PointerMove);
        assert_eq!(runner.step(), LoadingEvent::Tick);
    }

    #[test]
    fn mouse_events_map_to_pointer_activity() {
        assert_eq!(
            LoadingEvent::from_crossterm(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(LoadingEvent::Click { column: 7, row: 3 })
        );
        assert_eq!(
            LoadingEvent::from_crossterm(mouse(MouseEventKind::Moved)),
            Some(LoadingEvent::PointerMove)
        );
        assert_eq!(
            LoadingEvent::from_crossterm(mouse(MouseEventKind::Drag(MouseButton::Left))),
            Some(LoadingEvent::PointerMove)
        );
        assert_eq!(
            LoadingEvent::from_crossterm(mouse(MouseEventKind::Down(MouseButton::Right))),
            None
        );
        assert_eq!(
            LoadingEvent::from_crossterm(CtEvent::Resize(80, 24)),
            Some(LoadingEvent::Resize)
        );
        assert_eq!(LoadingEvent::from_crossterm(CtEvent::FocusLost), None);
    }
}
