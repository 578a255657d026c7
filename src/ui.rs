use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;
use wakefail::{
    clock::Clock,
    console::{Command, Console, Level},
    period::{PeriodOverride, TimePeriod},
    session::Snapshot,
    theme::ThemeStyle,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const MAX_BAR_WIDTH: u16 = 60;
/// How far the bar slides while the layout is broken
const BROKEN_SKEW: u16 = 3;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_CYCLE_MS: u64 = 80;

const DEMO_HEIGHT: u16 = 4;
const CONSOLE_HEIGHT: u16 = 10;

const SLEEPING: &str = "zZz...";
const COMPLETE: &str = "✓ Complete!";

pub const DEMO_KEYS: [(char, PeriodOverride); 6] = [
    ('0', PeriodOverride::Auto),
    ('1', PeriodOverride::Fixed(TimePeriod::Normal)),
    ('2', PeriodOverride::Fixed(TimePeriod::MondayMorning)),
    ('3', PeriodOverride::Fixed(TimePeriod::FridayAfternoon)),
    ('4', PeriodOverride::Fixed(TimePeriod::LateNight)),
    ('5', PeriodOverride::Fixed(TimePeriod::AprilFools)),
];

pub const CONSOLE_KEYS: [(char, Command); 6] = [
    ('h', Command::Help),
    ('w', Command::WakeUp),
    ('i', Command::CoffeeInject),
    ('s', Command::SystemStatus),
    ('a', Command::Ascii),
    ('p', Command::Panic),
];

pub fn demo_choice(key: char) -> Option<PeriodOverride> {
    DEMO_KEYS.iter().find(|(k, _)| *k == key).map(|(_, choice)| *choice)
}

pub fn console_command(key: char) -> Option<Command> {
    CONSOLE_KEYS.iter().find(|(k, _)| *k == key).map(|(_, command)| *command)
}

/// Optional panels below the bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panels {
    pub demo: bool,
    pub console: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    background: Color,
    title: Color,
    message: Color,
}

impl Palette {
    fn for_period(period: TimePeriod) -> Self {
        match period {
            TimePeriod::LateNight => Self {
                background: Color::Black,
                title: Color::DarkGray,
                message: Color::DarkGray,
            },
            TimePeriod::MondayMorning => Self {
                background: Color::Reset,
                title: Color::White,
                message: Color::Red,
            },
            TimePeriod::FridayAfternoon => Self {
                background: Color::Reset,
                title: Color::White,
                message: Color::Green,
            },
            TimePeriod::Normal | TimePeriod::AprilFools => Self {
                background: Color::Reset,
                title: Color::White,
                message: Color::Gray,
            },
        }
    }
}

/// Screen regions, shared with click hit-testing in `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub title: Rect,
    pub gauge: Rect,
    pub status: Rect,
    pub demo: Rect,
    pub console: Rect,
    pub help: Rect,
}

pub fn layout(area: Rect, snapshot: &Snapshot, panels: Panels) -> Areas {
    let style = ThemeStyle::for_theme(snapshot.theme, snapshot.is_complete);
    let gauge_height = style.height + 2;
    let demo_height = if panels.demo { DEMO_HEIGHT } else { 0 };
    let console_height = if panels.console { CONSOLE_HEIGHT } else { 0 };
    let content_height = 1 + 1 + gauge_height + 1;
    let pad = area
        .height
        .saturating_sub(content_height + demo_height + console_height + 1)
        / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(gauge_height),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(demo_height),
            Constraint::Length(console_height),
            Constraint::Length(1),
        ])
        .split(area);

    let mut gauge = chunks[3];
    if gauge.width > MAX_BAR_WIDTH {
        gauge.x += (gauge.width - MAX_BAR_WIDTH) / 2;
        gauge.width = MAX_BAR_WIDTH;
    }
    if snapshot.is_layout_broken {
        let room = area.right().saturating_sub(gauge.right());
        gauge.x += BROKEN_SKEW.min(room);
    }

    Areas {
        title: chunks[1],
        gauge,
        status: chunks[4],
        demo: chunks[6],
        console: chunks[7],
        help: chunks[8],
    }
}

/// Spinner glyph for this frame, `None` while the server sleeps.
pub fn spinner(snapshot: &Snapshot) -> Option<Span<'static>> {
    if snapshot.time_period == TimePeriod::LateNight {
        return None;
    }

    let frame = if snapshot.is_cursor_idle {
        0
    } else {
        ((snapshot.elapsed_ms / SPINNER_CYCLE_MS) % SPINNER_FRAMES.len() as u64) as usize
    };
    let glyph = SPINNER_FRAMES[frame];

    if snapshot.is_layout_broken {
        // bounce between two columns
        let text = if frame % 2 == 0 {
            format!("{glyph}  ")
        } else {
            format!(" {glyph} ")
        };
        return Some(Span::styled(
            text,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    Some(Span::styled(
        format!("{glyph} "),
        Style::default().fg(Color::Cyan),
    ))
}

/// What goes where the bar normally is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarView {
    Gauge,
    /// Late night replaces the bar with a snoring line
    Sleeping,
    /// The April Fools instant load, before the reveal
    Complete,
}

impl BarView {
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        match snapshot.time_period {
            TimePeriod::LateNight => BarView::Sleeping,
            TimePeriod::AprilFools if snapshot.is_complete && !snapshot.secondary_shown => {
                BarView::Complete
            }
            _ => BarView::Gauge,
        }
    }
}

fn centered(text: &str, area: Rect) -> Rect {
    let width = (text.width() as u16).min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.session.snapshot();
        let palette = Palette::for_period(snapshot.time_period);
        let style = ThemeStyle::for_theme(snapshot.theme, snapshot.is_complete);
        let areas = layout(area, &snapshot, self.panels);

        Block::default()
            .style(Style::default().bg(palette.background))
            .render(area, buf);

        let title = format!("wake.fail {}", snapshot.mood);
        Paragraph::new(Span::styled(
            title.clone(),
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        ))
        .render(centered(&title, areas.title), buf);

        match BarView::for_snapshot(&snapshot) {
            BarView::Gauge => Gauge::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(style.border)
                        .border_style(Style::default().fg(style.container))
                        .title(snapshot.theme.to_string()),
                )
                .gauge_style(Style::default().fg(style.bar))
                .ratio((snapshot.progress / 100.0).clamp(0.0, 1.0))
                .label(format!("{:.1}%", snapshot.progress))
                .render(areas.gauge, buf),
            BarView::Sleeping => render_in_middle(
                SLEEPING,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
                areas.gauge,
                buf,
            ),
            BarView::Complete => render_in_middle(
                COMPLETE,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                areas.gauge,
                buf,
            ),
        }

        let mut message_style = Style::default().fg(palette.message);
        if snapshot.secondary_shown {
            message_style = message_style.add_modifier(Modifier::ITALIC);
        }
        let mut spans = Vec::with_capacity(2);
        if let Some(spinner) = spinner(&snapshot) {
            spans.push(spinner);
        }
        spans.push(Span::styled(snapshot.message.clone(), message_style));
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(areas.status, buf);

        if self.panels.demo {
            render_demo_panel(self.session.period_override(), areas.demo, buf);
        }
        if self.panels.console {
            render_console_panel(self.session.console(), areas.console, buf);
        }

        let help = "(d)emo | (c)onsole | click the bar or (space) | (esc)ape";
        Paragraph::new(Span::styled(
            help,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(areas.help, buf);
    }
}

fn render_in_middle(text: &str, style: Style, area: Rect, buf: &mut Buffer) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    Paragraph::new(Span::styled(text.to_string(), style)).render(centered(text, row), buf);
}

fn render_console_panel(console: &Console, area: Rect, buf: &mut Buffer) {
    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = console
        .tail(rows)
        .map(|line| {
            let color = match line.level {
                Level::Log => Color::Gray,
                Level::Info => Color::Cyan,
                Level::Warn => Color::Yellow,
                Level::Error => Color::Red,
            };
            Line::styled(line.text.clone(), Style::default().fg(color))
        })
        .collect();

    let keys: Vec<String> = CONSOLE_KEYS
        .iter()
        .map(|(key, command)| format!("({key}){command}"))
        .collect();
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("console {}", keys.join(" "))),
        )
        .render(area, buf);
}

fn render_demo_panel(current: PeriodOverride, area: Rect, buf: &mut Buffer) {
    let spans: Vec<Span> = DEMO_KEYS
        .iter()
        .map(|(key, choice)| {
            let label = match choice {
                PeriodOverride::Auto => "auto",
                PeriodOverride::Fixed(period) => period.short_label(),
            };
            let style = if *choice == current {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            Span::styled(format!(" ({key}){label} "), style)
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("demo"))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};
    use ratatui::{backend::TestBackend, Terminal};
    use wakefail::{
        clock::ManualClock,
        config::Config,
        session::LoadingSession,
    };

    fn create_test_app(period: TimePeriod) -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2025, 6, 11, 14, 0, 0).unwrap());
        let config = Config {
            period: PeriodOverride::Fixed(period),
            ..Config::default()
        };
        let mut session =
            LoadingSession::new(clock.clone(), Box::new(StdRng::seed_from_u64(4)), &config);
        session.start();
        (App::new(session), clock)
    }

    fn render(app: &App<ManualClock>, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn renders_message_and_percentage() {
        let (app, _) = create_test_app(TimePeriod::FridayAfternoon);
        let content = render(&app, 80, 24);
        assert!(content.contains("Almost weekend!"));
        assert!(content.contains("95.0%"));
        assert!(content.contains("wake.fail"));
    }

    #[test]
    fn late_night_has_no_spinner() {
        let (app, _) = create_test_app(TimePeriod::LateNight);
        assert!(spinner(&app.session.snapshot()).is_none());

        let (app, _) = create_test_app(TimePeriod::Normal);
        assert!(spinner(&app.session.snapshot()).is_some());
    }

    #[test]
    fn idle_cursor_stops_the_spinner() {
        let (mut app, clock) = create_test_app(TimePeriod::Normal);
        for _ in 0..700 {
            clock.advance_ms(10);
            app.session.pump();
        }
        let snapshot = app.session.snapshot();
        assert!(snapshot.is_cursor_idle);
        assert_eq!(
            spinner(&snapshot).map(|s| s.content.into_owned()),
            Some(format!("{} ", SPINNER_FRAMES[0]))
        );

        clock.advance_ms(SPINNER_CYCLE_MS * 3);
        assert_eq!(
            spinner(&app.session.snapshot()).map(|s| s.content.into_owned()),
            Some(format!("{} ", SPINNER_FRAMES[0]))
        );
    }

    #[test]
    fn broken_layout_turns_spinner_red_and_shifts_bar() {
        let (mut app, _) = create_test_app(TimePeriod::Normal);
        let area = Rect::new(0, 0, 100, 30);
        let steady = layout(area, &app.session.snapshot(), Panels::default()).gauge;

        app.session.window_resize();
        let snapshot = app.session.snapshot();
        let span = spinner(&snapshot).unwrap();
        assert_eq!(span.style.fg, Some(Color::Red));

        let broken = layout(area, &snapshot, Panels::default()).gauge;
        assert_eq!(broken.x, steady.x + BROKEN_SKEW);
        assert_eq!(broken.width, steady.width);
    }

    #[test]
    fn demo_panel_lists_every_choice() {
        let (mut app, _) = create_test_app(TimePeriod::Normal);
        app.panels.demo = true;
        let content = render(&app, 100, 24);
        assert!(content.contains("(0)auto"));
        assert!(content.contains("(5)"));
    }

    #[test]
    fn late_night_snores_instead_of_a_bar() {
        let (app, _) = create_test_app(TimePeriod::LateNight);
        let snapshot = app.session.snapshot();
        assert_eq!(BarView::for_snapshot(&snapshot), BarView::Sleeping);

        let content = render(&app, 80, 24);
        assert!(content.contains(SLEEPING));
        assert!(!content.contains(&format!("{:.1}%", snapshot.progress)));
    }

    #[test]
    fn april_fools_shows_complete_until_the_reveal() {
        let (mut app, clock) = create_test_app(TimePeriod::AprilFools);
        assert_eq!(
            BarView::for_snapshot(&app.session.snapshot()),
            BarView::Complete
        );
        let content = render(&app, 80, 24);
        assert!(content.contains("Complete!"));
        assert!(!content.contains("100.0%"));

        for _ in 0..100 {
            clock.advance_ms(10);
            app.session.pump();
        }
        assert_eq!(BarView::for_snapshot(&app.session.snapshot()), BarView::Gauge);
        let content = render(&app, 80, 24);
        assert!(!content.contains("Complete!"));
        assert!(content.contains("5.0%"));
    }

    #[test]
    fn console_panel_shows_the_latest_lines() {
        let (mut app, _) = create_test_app(TimePeriod::Normal);
        app.panels.console = true;
        app.session.console_command(Command::Help);
        let content = render(&app, 100, 30);
        assert!(content.contains("Pro tip"));
        assert!(content.contains("panic()"));
        assert!(content.contains("(h)help()"));
    }

    #[test]
    fn console_panel_takes_room_from_the_padding() {
        let (app, _) = create_test_app(TimePeriod::Normal);
        let area = Rect::new(0, 0, 100, 40);
        let snapshot = app.session.snapshot();
        let closed = layout(area, &snapshot, Panels::default());
        let open = layout(
            area,
            &snapshot,
            Panels {
                console: true,
                ..Panels::default()
            },
        );
        assert_eq!(closed.console.height, 0);
        assert_eq!(open.console.height, CONSOLE_HEIGHT);
        assert!(open.gauge.y < closed.gauge.y);
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let (app, _) = create_test_app(TimePeriod::AprilFools);
        render(&app, 4, 3);
        render(&app, 1, 1);
    }
}
