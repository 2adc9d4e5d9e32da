//! Terminal lifecycle and the merged input/tick event stream.

use std::io::{self, Stderr};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Drives the loading dots
const TICK_RATE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

impl AppEvent {
    /// Map a raw terminal event to one the app reacts to
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            // Key releases and repeats would double every keystroke on some terminals
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Spawn the reader. It stops once the handler is dropped or the
    /// terminal stream ends.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(pump_events(tx));
        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

async fn pump_events(tx: mpsc::UnboundedSender<AppEvent>) {
    let mut reader = EventStream::new();
    let mut ticks = tokio::time::interval(TICK_RATE);

    loop {
        let event = tokio::select! {
            _ = ticks.tick() => AppEvent::Tick,
            raw = reader.next() => match raw {
                Some(Ok(raw)) => match AppEvent::from_terminal(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(err)) => {
                    warn!(error = %err, "terminal event stream error");
                    continue;
                }
                None => {
                    debug!("terminal event stream closed");
                    break;
                }
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stderr()))?)
}

pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Put the terminal back before the default hook prints the panic
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}
