//! The `assign` command: move money from unallocated funds into a category

use clap::Args;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::NewAssignment;
use crate::services::{BudgetApi, LocalBackend};

use super::{find_category, parse_amount, parse_date, require_user};

#[derive(Args)]
pub struct AssignArgs {
    /// Category name or ID
    pub category: String,
    /// Amount to assign; negative takes money back
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
    /// Assignment date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
}

pub fn handle_assign_command(
    backend: &LocalBackend,
    settings: &Settings,
    args: AssignArgs,
) -> BudgetResult<()> {
    let user_id = require_user(settings)?;
    let category = find_category(backend, user_id, &args.category)?;
    if category.is_unallocated_funds {
        return Err(BudgetError::Validation(
            "Cannot assign to the unallocated funds category".into(),
        ));
    }

    let amount = parse_amount(&args.amount)?;
    let date = parse_date(args.date.as_deref())?;

    backend.create_assignment(NewAssignment::new(user_id, category.id, amount, date))?;
    println!("Assigned {} to {} on {}", amount, category.name, date);
    Ok(())
}
