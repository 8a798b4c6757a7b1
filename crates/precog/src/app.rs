//! Terminal lifecycle and the event loop
//!
//! Terminal events are read on a helper thread and forwarded over a
//! channel. The main thread owns all state and only blocks in
//! `recv_deadline`, waking for input, for the next session deadline or for
//! the periodic redraw, whichever comes first.

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use flume::{Receiver, RecvTimeoutError};
use log::{debug, error, info, trace};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use crate::clipboard::Clipboard;
use crate::error::ViewError;
use crate::input::{HitMap, InputEvent, KeyMap};
use crate::session::{Effect, Session};
use crate::theme::Theme;
use crate::ui;

/// Upper bound on time between redraws
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Raw mode plus alternate screen, restored on drop
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(err);
        }

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        debug!("Terminal session started");
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        debug!("Terminal session restored");
    }
}

/// Forward terminal events until the receiver goes away
fn spawn_input_thread() -> Result<Receiver<Event>> {
    let (tx, rx) = flume::unbounded();
    thread::Builder::new()
        .name("precog-input".into())
        .spawn(move || loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        trace!("Event receiver dropped; input thread exiting");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read terminal event: {e}");
                    break;
                }
            }
        })
        .context("Failed to spawn input thread")?;
    Ok(rx)
}

/// Run an interactive session until the user quits
pub fn run(
    mut session: Session,
    theme: &Theme,
    keys: &KeyMap,
    clipboard: &mut dyn Clipboard,
) -> Result<()> {
    let mut terminal = TerminalSession::enter().context("Failed to set up the terminal")?;
    let events = spawn_input_thread()?;
    let mut hits = HitMap::new();

    info!("Event loop started");
    loop {
        let now = Instant::now();
        session.poll_timers(now);
        terminal
            .terminal_mut()
            .draw(|frame| hits = ui::draw(frame, &session, theme, keys, now))
            .context("Failed to draw frame")?;

        let wake = session
            .next_deadline()
            .map_or(now + REDRAW_INTERVAL, |deadline| {
                deadline.min(now + REDRAW_INTERVAL)
            });

        let event = match events.recv_deadline(wake) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                anyhow::bail!("Terminal input closed unexpectedly")
            }
        };

        let Some(input) = keys.translate(&event, &hits) else {
            continue;
        };
        trace!("Input {input:?}");

        match session.handle(input, Instant::now()) {
            Some(Effect::Quit) => break,
            Some(Effect::CopyToClipboard(url)) => {
                let result = clipboard.copy(&url);
                session.record_clipboard(result, &url, Instant::now());
            }
            None => {}
        }
    }

    info!("Event loop finished");
    Ok(())
}

/// Show a blocking error screen until the user quits
pub fn run_error(error: &ViewError, theme: &Theme, keys: &KeyMap) -> Result<()> {
    error!("{error}");

    let mut terminal = TerminalSession::enter().context("Failed to set up the terminal")?;
    let events = spawn_input_thread()?;
    let hits = HitMap::new();

    loop {
        terminal
            .terminal_mut()
            .draw(|frame| ui::draw_error(frame, error, theme, keys))
            .context("Failed to draw frame")?;

        let event = events
            .recv()
            .context("Terminal input closed unexpectedly")?;
        if matches!(
            keys.translate(&event, &hits),
            Some(InputEvent::Quit | InputEvent::Close)
        ) {
            break;
        }
    }
    Ok(())
}
