//! Event handling for the TUI
//!
//! Terminal input is polled on a background thread. Remote work finished on
//! worker threads comes back through the same channel as `Event::Remote`, so
//! the screen is only ever touched from the UI thread.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::BudgetResult;
use crate::models::{AllocationReport, DateRange};
use crate::screen::{PendingAllocation, PendingDeletion};
use crate::services::CategoriesSnapshot;

/// Results of backend calls made off the UI thread
#[derive(Debug)]
pub enum RemoteEvent {
    /// Fresh categories and groups from the feed
    Snapshot(CategoriesSnapshot),
    /// An allocation refresh for `range` finished
    Report {
        range: DateRange,
        result: BudgetResult<AllocationReport>,
    },
    /// The write behind an optimistic allocation finished
    Allocation {
        pending: PendingAllocation,
        result: BudgetResult<()>,
    },
    /// A confirmed delete finished
    Deletion {
        pending: PendingDeletion,
        result: BudgetResult<()>,
    },
    /// A form submission finished; `Ok` carries the status line to show
    FormSaved(BudgetResult<String>),
}

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Remote(RemoteEvent),
}

/// Event handler for terminal and remote events
pub struct EventHandler {
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handler = {
            let sender = sender.clone();
            thread::spawn(move || poll_terminal(sender, tick_rate))
        };

        Self {
            sender,
            receiver,
            handler,
        }
    }

    /// Sender for worker threads reporting back to the UI
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.sender.clone()
    }

    /// Get the next event (blocking)
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.receiver.recv()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

fn poll_terminal(sender: mpsc::Sender<Event>, tick_rate: Duration) {
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        let ready = match event::poll(timeout) {
            Ok(ready) => ready,
            Err(e) => {
                tracing::error!(error = %e, "terminal poll failed");
                return;
            }
        };

        if ready {
            let forwarded = match event::read() {
                // Windows reports key releases too
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(Event::Key(key))
                }
                Ok(CrosstermEvent::Resize(width, height)) => Some(Event::Resize(width, height)),
                Ok(_) => None,
                Err(e) => {
                    tracing::error!(error = %e, "terminal read failed");
                    return;
                }
            };
            if let Some(event) = forwarded {
                if sender.send(event).is_err() {
                    return;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if sender.send(Event::Tick).is_err() {
                return;
            }
            last_tick = Instant::now();
        }
    }
}
