//! Transaction CLI commands
//!
//! Spending and income recorded here feeds the spent and income figures of
//! the budget screen.

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_transaction_list;
use crate::error::BudgetResult;
use crate::models::DateRange;
use crate::services::{CategoryFeed, LocalBackend};

use super::{find_category, parse_amount, parse_date, require_user};

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction (negative for spending)
    Add {
        /// Category name or ID; use the unallocated funds category for income
        category: String,
        /// Amount, e.g. "-12.50"
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        payee: Option<String>,
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// List transactions of the current period
    List,
}

pub fn handle_transaction_command(
    backend: &LocalBackend,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    let user_id = require_user(settings)?;

    match cmd {
        TransactionCommands::Add {
            category,
            amount,
            date,
            payee,
            memo,
        } => {
            let cat = find_category(backend, user_id, &category)?;
            let amount = parse_amount(&amount)?;
            let date = parse_date(date.as_deref())?;

            let txn = backend.record_transaction(
                user_id,
                cat.id,
                amount,
                date,
                payee.as_deref().unwrap_or_default(),
                memo.as_deref().unwrap_or_default(),
            )?;
            println!("Recorded {} in {} on {}", txn.amount, cat.name, txn.date);
        }

        TransactionCommands::List => {
            let range = DateRange::containing(
                settings.budget_period_type,
                Local::now().date_naive(),
                settings.week_start(),
            );
            let transactions = backend.storage().transactions.in_range(user_id, range)?;
            let snapshot = backend.snapshot(user_id)?;
            println!("{}", range);
            print!("{}", format_transaction_list(&transactions, &snapshot.categories));
        }
    }

    Ok(())
}
