//! Terminal front end for the budget screen
//!
//! Built on ratatui and crossterm. Backend calls run on short-lived worker
//! threads and report back through the event channel.

pub mod app;
pub mod dialogs;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use app::App;
pub use event::{Event, EventHandler, RemoteEvent};
pub use terminal::run_tui;
