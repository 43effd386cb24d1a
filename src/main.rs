//! Terminal demo for the smooth-scrolling engine.
//!
//! Renders a long in-memory document and routes terminal input through the
//! engine: wheel ticks become eased scroll commands, the scroll keys all
//! work, and middle-mouse drag pans with its reference indicator.

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CtEvent, KeyCode,
        KeyEvent as CtKeyEvent, KeyEventKind, KeyModifiers, MouseButton as CtMouseButton,
        MouseEvent as CtMouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tokio::sync::mpsc;

use pulse_scroll::{
    page::{Element, Tag},
    Document, ElementId, HostPage, KeyEvent, MouseButton, MouseEvent, Overflow, ScrollConfig,
    ScrollKey, SmoothScroll, WheelEvent,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Smooth scrolling demo")]
struct Cli {
    /// Number of content lines in the demo document.
    #[arg(long, default_value_t = 400)]
    lines: usize,

    /// Config file to load instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured frame rate. [Hz]
    #[arg(long)]
    frame_rate: Option<u32>,
}

// ───────────────────────────────────────── events ────────────

/// High-level events consumed by the demo loop.
#[derive(Debug)]
enum AppEvent {
    Key(CtKeyEvent),
    Mouse(CtMouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends
/// them through the returned channel, so the main loop stays non-blocking.
fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let has_event = event::poll(tick_rate).unwrap_or(false);
            if has_event {
                if let Ok(ev) = event::read() {
                    let app_event = match ev {
                        CtEvent::Key(k) => AppEvent::Key(k),
                        CtEvent::Mouse(m) => AppEvent::Mouse(m),
                        CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
                        _ => continue,
                    };
                    if tx.send(app_event).is_err() {
                        break; // receiver dropped
                    }
                }
            } else if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    rx
}

// ───────────────────────────────────────── document ──────────

const SAMPLE: &[&str] = &[
    "the quick brown fox jumps over the lazy dog",
    "pack my box with five dozen liquor jugs",
    "how vexingly quick daft zebras jump",
    "sphinx of black quartz, judge my vow",
    "the five boxing wizards jump quickly",
];

/// Build the demo page: body spanning the terminal, one scrollable pane
/// holding `lines` lines of content.
fn build_document(cols: u16, rows: u16, lines: usize) -> (Document, ElementId) {
    let mut doc = Document::new(f64::from(cols), f64::from(rows));
    let pane = doc.insert(
        doc.body(),
        Element::new(Tag::Div)
            .sized(f64::from(cols), pane_height(rows))
            .content(f64::from(cols), lines as f64)
            .overflow_y(Overflow::Auto),
    );
    (doc, pane)
}

/// Inner height of the pane: borders and the status bar eat three rows.
fn pane_height(rows: u16) -> f64 {
    f64::from(rows.saturating_sub(3))
}

fn content_lines(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("{i:>5} ─ {}", SAMPLE[i % SAMPLE.len()]))
        .collect()
}

// ───────────────────────────────────────── input mapping ─────

fn map_key(code: KeyCode) -> ScrollKey {
    match code {
        KeyCode::Up => ScrollKey::Up,
        KeyCode::Down => ScrollKey::Down,
        KeyCode::Left => ScrollKey::Left,
        KeyCode::Right => ScrollKey::Right,
        KeyCode::PageUp => ScrollKey::PageUp,
        KeyCode::PageDown => ScrollKey::PageDown,
        KeyCode::Home => ScrollKey::Home,
        KeyCode::End => ScrollKey::End,
        KeyCode::Char(' ') => ScrollKey::Space,
        _ => ScrollKey::Other,
    }
}

fn key_event(pane: ElementId, key: CtKeyEvent) -> KeyEvent {
    KeyEvent {
        target: pane,
        key: map_key(key.code),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        meta: key.modifiers.contains(KeyModifiers::SUPER),
        default_prevented: false,
    }
}

/// One terminal wheel notch, expressed in classic ±120 wheel units.
fn wheel_event(pane: ElementId, dx: f64, dy: f64) -> WheelEvent {
    WheelEvent {
        target: pane,
        wheel_delta_x: dx * 120.0,
        wheel_delta_y: dy * 120.0,
        wheel_delta: 0.0,
        default_prevented: false,
    }
}

fn mouse_event(pane: ElementId, button: MouseButton, m: CtMouseEvent) -> MouseEvent {
    MouseEvent {
        target: pane,
        button,
        client_x: f64::from(m.column),
        client_y: f64::from(m.row),
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── configuration ─────────────────────────────────────────
    let mut cfg = match &cli.config {
        Some(path) => ScrollConfig::load_from(path)?,
        None => ScrollConfig::load(),
    };
    if let Some(rate) = cli.frame_rate {
        cfg.frame_rate = rate.clamp(10, 240);
    }
    let frame_interval = cfg.frame_interval();

    // ── build the page and the engine ─────────────────────────
    let (cols, rows) = crossterm::terminal::size()?;
    let (doc, pane) = build_document(cols, rows, cli.lines);
    let lines = content_lines(cli.lines);
    let mut engine = SmoothScroll::new(doc, cfg);
    engine.init();

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(frame_interval);

    let mut should_quit = false;

    // ── event loop ────────────────────────────────────────────
    loop {
        // Draw first so the UI stays responsive; animation progress made
        // below shows up on the next frame.
        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(3),    // document pane
                    Constraint::Length(1), // status bar
                ])
                .split(frame.area());

            let doc = engine.host();
            let scroll_top = doc.scroll_top(pane);
            let scroll_left = doc.scroll_left(pane);

            let block = Block::default()
                .title(" pulse-scroll ")
                .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray));
            let body = Paragraph::new(lines.join("\n"))
                .block(block)
                .scroll((scroll_top as u16, scroll_left as u16));
            frame.render_widget(body, chunks[0]);

            let status = Paragraph::new(format!(
                " line {}/{}  │  wheel: smooth  ·  middle-drag: pan  ·  ↑↓ PgUp PgDn Home End Space  ·  q: quit",
                (scroll_top as usize).saturating_add(1),
                lines.len(),
            ))
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            frame.render_widget(status, chunks[1]);

            // Drag-scroll reference indicator at its host position.
            if let Some((x, y)) = doc.drag_anchor() {
                let area = frame.area();
                let x = (x.max(0.0) as u16).min(area.width.saturating_sub(1));
                let y = (y.max(0.0) as u16).min(area.height.saturating_sub(1));
                let marker = Paragraph::new("✛")
                    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
                frame.render_widget(marker, Rect::new(x, y, 1, 1));
            }
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) if k.kind != KeyEventKind::Release => {
                        if k.code == KeyCode::Char('q')
                            || (k.modifiers.contains(KeyModifiers::CONTROL)
                                && k.code == KeyCode::Char('c'))
                        {
                            should_quit = true;
                        } else {
                            // Pass means native fallback — nothing to emulate
                            // in a terminal.
                            let _ = engine.on_key_down(key_event(pane, k), Instant::now());
                        }
                    }
                    AppEvent::Key(_) => {}
                    AppEvent::Mouse(m) => handle_mouse(&mut engine, pane, m),
                    AppEvent::Resize(w, h) => {
                        engine.host_mut().resize_viewport(f64::from(w), f64::from(h));
                        engine.host_mut().element_mut(pane).client_height = pane_height(h);
                        engine.host_mut().element_mut(pane).client_width = f64::from(w);
                    }
                    AppEvent::Tick => {}
                }
            }

            _ = frames.tick() => {
                engine.on_frame(Instant::now());
            }
        }

        if should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    engine.teardown();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// Route a terminal mouse event into the engine.
fn handle_mouse(engine: &mut SmoothScroll<Document>, pane: ElementId, m: CtMouseEvent) {
    let now = Instant::now();
    match m.kind {
        MouseEventKind::ScrollUp => {
            engine.on_wheel(wheel_event(pane, 0.0, 1.0), now);
        }
        MouseEventKind::ScrollDown => {
            engine.on_wheel(wheel_event(pane, 0.0, -1.0), now);
        }
        MouseEventKind::ScrollLeft => {
            engine.on_wheel(wheel_event(pane, 1.0, 0.0), now);
        }
        MouseEventKind::ScrollRight => {
            engine.on_wheel(wheel_event(pane, -1.0, 0.0), now);
        }
        MouseEventKind::Down(button) => {
            let button = match button {
                CtMouseButton::Left => MouseButton::Left,
                CtMouseButton::Middle => MouseButton::Middle,
                CtMouseButton::Right => MouseButton::Right,
            };
            engine.on_mouse_down(mouse_event(pane, button, m), now);
        }
        MouseEventKind::Drag(_) | MouseEventKind::Moved => {
            engine.on_mouse_move(mouse_event(pane, MouseButton::Left, m));
        }
        MouseEventKind::Up(_) => {
            engine.on_mouse_up(mouse_event(pane, MouseButton::Left, m));
        }
    }
}
