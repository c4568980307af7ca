//! The `allocation` command: the budget screen as a table

use chrono::Local;
use clap::Args;

use crate::config::Settings;
use crate::display::format_budget_view;
use crate::error::{BudgetError, BudgetResult};
use crate::models::PeriodKind;
use crate::screen::BudgetScreen;
use crate::services::{BudgetApi, CategoryFeed, LocalBackend, Session};

use super::require_user;

#[derive(Args)]
pub struct AllocationArgs {
    /// Periods to move from the current one, negative for the past
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i32,
    /// Period kind to show instead of the configured one
    #[arg(short, long)]
    pub kind: Option<String>,
}

pub fn handle_allocation_command(
    backend: &LocalBackend,
    settings: &Settings,
    args: AllocationArgs,
) -> BudgetResult<()> {
    let user_id = require_user(settings)?;

    let mut session = Session::from_settings(settings);
    if let Some(raw) = args.kind.as_deref() {
        session.period_kind = PeriodKind::parse(raw).ok_or_else(|| {
            BudgetError::Validation(format!(
                "Unknown period kind '{}' (expected weekly, biweekly or monthly)",
                raw
            ))
        })?;
    }

    let mut screen = BudgetScreen::new(session, Local::now().date_naive());
    for _ in 0..args.offset.unsigned_abs() {
        if args.offset < 0 {
            screen.previous_period();
        } else {
            screen.next_period();
        }
    }

    screen.apply_snapshot(backend.snapshot(user_id)?);
    if let Some(range) = screen.take_refresh() {
        let report = backend.fetch_allocated_and_spent(user_id, range)?;
        screen.apply_report(&report);
    }

    print!("{}", format_budget_view(&screen.view()));
    Ok(())
}
