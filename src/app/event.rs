//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and reads them on a detached
//! thread that forwards over a channel, so the main loop can wait on input
//! and frame deadlines at the same time.

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl AppEvent {
    /// Events the reader cares about; focus and paste are dropped.
    pub fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawns a reader thread that sends terminal events through the returned
/// channel.  The thread ends when the receiver is dropped or the terminal
/// stops delivering events; it never holds up process exit.
pub fn spawn_event_reader() -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || loop {
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(e) => {
                tracing::warn!("terminal event read failed: {e}");
                break;
            }
        };
        let Some(app_event) = AppEvent::from_crossterm(ev) else {
            continue;
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });

    rx
}
