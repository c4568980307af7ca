//! Budget screen with grouped categories
//!
//! A budgeting screen that shows a user's categories grouped into collapsible
//! sections, with allocated, spent and available amounts for one date range
//! at a time. Quick actions cover overspending or fund goals optimistically
//! and roll back if the backing write fails.
//!
//! # Architecture
//!
//! - `config`: paths and settings
//! - `error`: the crate error type
//! - `logging`: tracing setup
//! - `models`: categories, groups, assignments, transactions, periods
//! - `storage`: JSON file storage
//! - `services`: backend contracts and their file-backed implementation
//! - `screen`: view state of the budget screen, free of I/O
//! - `cli` / `display`: non-interactive commands
//! - `tui`: the interactive terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_screen::config::{AppPaths, Settings};
//! use budget_screen::screen::BudgetScreen;
//! use budget_screen::services::Session;
//!
//! let paths = AppPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let screen = BudgetScreen::new(Session::from_settings(&settings), today);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod screen;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::BudgetError;
