//! Display formatting for terminal output
//!
//! Plain-text renderings of the budget screen and its data for the
//! non-interactive commands.

pub mod allocation;
pub mod category;
pub mod transaction;

pub use allocation::format_budget_view;
pub use category::{format_category_tree, format_group_list};
pub use transaction::format_transaction_list;
