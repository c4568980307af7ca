//! CLI command handlers
//!
//! Each handler bridges clap argument parsing with the local backend. Writes
//! go through the `BudgetApi` so cached allocations stay correct.

pub mod allocation;
pub mod assign;
pub mod category;
pub mod group;
pub mod transaction;

pub use allocation::{handle_allocation_command, AllocationArgs};
pub use assign::{handle_assign_command, AssignArgs};
pub use category::{handle_category_command, CategoryCommands};
pub use group::{handle_group_command, GroupCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate};

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, CategoryGroup, Money, UserId};
use crate::services::{CategoryService, LocalBackend};

/// The configured user, or an error telling how to create one
pub fn require_user(settings: &Settings) -> BudgetResult<UserId> {
    settings.user_id.ok_or_else(|| {
        BudgetError::Config("No budget found. Run 'budget init' first.".into())
    })
}

/// Parse an optional YYYY-MM-DD date, defaulting to today
pub fn parse_date(date: Option<&str>) -> BudgetResult<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            BudgetError::Validation(format!("Invalid date '{}' (expected YYYY-MM-DD)", raw))
        }),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn parse_amount(raw: &str) -> BudgetResult<Money> {
    Money::parse(raw).map_err(|e| BudgetError::Validation(format!("Invalid amount: {}", e)))
}

fn find_category(
    backend: &LocalBackend,
    user_id: UserId,
    identifier: &str,
) -> BudgetResult<Category> {
    CategoryService::new(backend.storage())
        .find_category(user_id, identifier)?
        .ok_or_else(|| BudgetError::category_not_found(identifier))
}

fn find_group(
    backend: &LocalBackend,
    user_id: UserId,
    identifier: &str,
) -> BudgetResult<CategoryGroup> {
    CategoryService::new(backend.storage())
        .find_group(user_id, identifier)?
        .ok_or_else(|| BudgetError::group_not_found(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some("2025-02-28")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(parse_date(Some("28/02/2025")).unwrap_err().is_validation());
        assert!(parse_date(None).is_ok());
    }

    #[test]
    fn test_require_user() {
        let mut settings = Settings::default();
        assert!(matches!(require_user(&settings), Err(BudgetError::Config(_))));

        let user = UserId::new();
        settings.user_id = Some(user);
        assert_eq!(require_user(&settings).unwrap(), user);
    }
}
