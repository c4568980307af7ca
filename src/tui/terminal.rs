//! Terminal setup, teardown and the main loop

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::{Arc, Mutex};

use crate::config::Settings;
use crate::models::UserId;
use crate::screen::BudgetScreen;
use crate::services::{CategoriesSnapshot, CategoryFeed, LocalBackend, Session};

use super::app::{today, App};
use super::event::{Event, EventHandler, RemoteEvent};
use super::handler::handle_event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic info
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the budget screen against a local backend
pub fn run_tui(backend: Arc<LocalBackend>, settings: &Settings) -> Result<()> {
    let session = Session::from_settings(settings);
    let Some(user_id) = session.user_id else {
        anyhow::bail!("No user configured. Run 'budget init' first.");
    };

    let events = EventHandler::default();

    // Snapshots pushed after every write
    let feed_sender = Mutex::new(events.sender());
    let subscription = backend.subscribe(Box::new(
        move |user: UserId, snapshot: &CategoriesSnapshot| {
            if user != user_id {
                return;
            }
            if let Ok(sender) = feed_sender.lock() {
                let _ = sender.send(Event::Remote(RemoteEvent::Snapshot(snapshot.clone())));
            }
        },
    ));

    let mut screen = BudgetScreen::new(session, today());
    screen.apply_snapshot(backend.snapshot(user_id)?);
    let mut app = App::new(screen, backend.clone(), events.sender());
    app.dispatch_refresh();

    tracing::info!(user = %user_id, "budget screen started");

    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &events);
    restore_terminal()?;
    backend.unsubscribe(subscription);

    result
}

fn event_loop(terminal: &mut Tui, app: &mut App, events: &EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| super::views::render(frame, app))?;
        handle_event(app, events.next()?)?;
    }
    Ok(())
}
