//! Dialogs drawn over the budget screen

pub mod confirm;
pub mod prompt;

pub use prompt::{PromptState, PromptValue};
