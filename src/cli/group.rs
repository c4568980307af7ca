//! Category group CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_group_list;
use crate::error::BudgetResult;
use crate::services::{BudgetApi, CategoryFeed, LocalBackend};

use super::require_user;

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new category group
    Create {
        /// Group name
        name: String,
    },
    /// List all category groups
    List,
}

pub fn handle_group_command(
    backend: &LocalBackend,
    settings: &Settings,
    cmd: GroupCommands,
) -> BudgetResult<()> {
    let user_id = require_user(settings)?;

    match cmd {
        GroupCommands::Create { name } => {
            let group = backend.create_group(user_id, &name)?;
            println!("Created category group: {}", group.name);
        }
        GroupCommands::List => {
            let snapshot = backend.snapshot(user_id)?;
            print!("{}", format_group_list(&snapshot.groups));
        }
    }

    Ok(())
}
