//! Category CLI commands
//!
//! Creating, editing, moving and deleting categories.

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_category_tree;
use crate::error::BudgetResult;
use crate::screen::BudgetScreen;
use crate::services::{BudgetApi, CategoryFeed, LocalBackend, Session};

use super::{find_category, find_group, parse_amount, require_user};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories, grouped as on the budget screen
    List,

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Category group name or ID
        #[arg(short, long)]
        group: Option<String>,
        /// Goal amount (e.g., "500" or "500.00")
        #[arg(long)]
        goal: Option<String>,
    },

    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Set or clear (with 0) a category's goal
    Goal {
        /// Category name or ID
        category: String,
        /// Goal amount
        amount: String,
    },

    /// Move a category to a group, or out of its group without --to
    Move {
        /// Category name or ID
        category: String,
        /// Target group name or ID
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    backend: &LocalBackend,
    settings: &Settings,
    cmd: CategoryCommands,
) -> BudgetResult<()> {
    let user_id = require_user(settings)?;

    match cmd {
        CategoryCommands::List => {
            let snapshot = backend.snapshot(user_id)?;
            let categories = snapshot.categories.clone();

            let mut screen =
                BudgetScreen::new(Session::from_settings(settings), Local::now().date_naive());
            screen.apply_snapshot(snapshot);
            print!("{}", format_category_tree(&screen.sections(), &categories));
        }

        CategoryCommands::Create { name, group, goal } => {
            let group = group
                .map(|identifier| find_group(backend, user_id, &identifier))
                .transpose()?;
            let goal = goal.map(|raw| parse_amount(&raw)).transpose()?;

            let mut category = backend.create_category(user_id, &name)?;
            if let Some(group) = &group {
                category = backend.set_category_group(user_id, category.id, Some(group.id))?;
            }
            if let Some(goal) = goal {
                category = backend.set_category_goal(user_id, category.id, goal)?;
            }

            println!("Created category: {}", category.name);
            if let Some(group) = group {
                println!("  Group: {}", group.name);
            }
            if let Some(goal) = category.effective_goal() {
                println!("  Goal: {}", goal);
            }
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Rename { category, name } => {
            let cat = find_category(backend, user_id, &category)?;
            let renamed = backend.rename_category(user_id, cat.id, &name)?;
            println!("Renamed '{}' to '{}'", cat.name, renamed.name);
        }

        CategoryCommands::Goal { category, amount } => {
            let cat = find_category(backend, user_id, &category)?;
            let goal = parse_amount(&amount)?;
            let updated = backend.set_category_goal(user_id, cat.id, goal)?;
            match updated.effective_goal() {
                Some(goal) => println!("Goal for '{}' set to {}", updated.name, goal),
                None => println!("Cleared goal for '{}'", updated.name),
            }
        }

        CategoryCommands::Move { category, to } => {
            let cat = find_category(backend, user_id, &category)?;
            match to {
                Some(identifier) => {
                    let group = find_group(backend, user_id, &identifier)?;
                    let moved = backend.set_category_group(user_id, cat.id, Some(group.id))?;
                    println!("Moved '{}' to group '{}'", moved.name, group.name);
                }
                None => {
                    let moved = backend.set_category_group(user_id, cat.id, None)?;
                    println!("Moved '{}' out of its group", moved.name);
                }
            }
        }

        CategoryCommands::Delete { category } => {
            let cat = find_category(backend, user_id, &category)?;
            backend.delete_category(user_id, cat.id)?;
            println!("Deleted category: {}", cat.name);
        }
    }

    Ok(())
}
