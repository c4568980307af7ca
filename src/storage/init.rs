//! First-run setup
//!
//! Assigns the local user an id and gives them the unallocated-funds bucket
//! every budget starts from.

use crate::config::{AppPaths, Settings};
use crate::error::BudgetError;
use crate::models::{Category, UserId};

use super::categories::CategoryData;
use super::file_io::{read_json, write_json_atomic};

/// Prepare a data directory, returning the user the budget belongs to
///
/// Safe to run repeatedly: an existing user id and existing categories are
/// left untouched.
pub fn initialize_storage(
    paths: &AppPaths,
    settings: &mut Settings,
) -> Result<UserId, BudgetError> {
    paths.ensure_directories()?;

    let user_id = match settings.user_id {
        Some(id) => id,
        None => {
            let id = UserId::new();
            settings.user_id = Some(id);
            tracing::info!(user = %id, "assigned new local user");
            id
        }
    };
    settings.save(paths)?;

    let mut data: CategoryData = read_json(paths.budget_file())?;
    let has_bucket = data
        .categories
        .iter()
        .any(|c| c.user_id == user_id && c.is_unallocated_funds);

    if !has_bucket {
        data.categories.push(Category::unallocated_funds(user_id));
        write_json_atomic(paths.budget_file(), &data)?;
    }

    Ok(user_id)
}

/// Whether `init` still has to run for this data directory
pub fn needs_initialization(paths: &AppPaths) -> bool {
    !paths.is_initialized() || !paths.budget_file().exists()
}
