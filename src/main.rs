use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_screen::cli::{
    handle_allocation_command, handle_assign_command, handle_category_command,
    handle_group_command, handle_transaction_command, AllocationArgs, AssignArgs,
    CategoryCommands, GroupCommands, TransactionCommands,
};
use budget_screen::config::{AppPaths, Settings};
use budget_screen::logging::{self, LOG_FILTER_ENV};
use budget_screen::services::LocalBackend;
use budget_screen::storage::{initialize_storage, needs_initialization, Storage};

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Budget screen with grouped categories",
    long_about = "Shows budget categories grouped into collapsible sections with \
                  allocated, spent and available amounts per period. Run without \
                  a command to open the interactive screen."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive budget screen (default)
    #[command(alias = "ui")]
    Tui,

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Category group commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// Assign money from unallocated funds to a category
    Assign(AssignArgs),

    /// Transaction commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Print allocated, spent and available amounts for a period
    Allocation(AllocationArgs),

    /// Initialize a new budget
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AppPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // The screen cannot start without a user, so first launch sets one up
    let command = cli.command.unwrap_or(Commands::Tui);
    if matches!(command, Commands::Tui) && needs_initialization(&paths) {
        initialize_storage(&paths, &mut settings)?;
    }

    if let Err(e) = logging::init(&paths) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match command {
        Commands::Init => {
            println!("Initializing budget at: {}", paths.base_dir().display());
            let user_id = initialize_storage(&paths, &mut settings)?;
            println!("Initialization complete!");
            println!("  User: {}", user_id);
            println!();
            println!("Run 'budget category create <name>' to add categories,");
            println!("or 'budget' to open the budget screen.");
        }
        Commands::Config => {
            println!("Budget Screen Configuration");
            println!("===========================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Log file:       {}", paths.log_file().display());
            println!("Log filter env: {}", LOG_FILTER_ENV);
            println!();
            println!("Settings:");
            println!("  Budget period type: {}", settings.budget_period_type);
            println!("  First day of week:  {}", settings.week_start());
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Allocation cache:   {} entries", settings.cache_capacity);
            match settings.user_id {
                Some(user_id) => println!("  User:               {}", user_id),
                None => println!("  User:               (not initialized)"),
            }
        }
        command => {
            let storage = Storage::open(paths.clone())?;
            let backend = Arc::new(LocalBackend::new(Arc::new(storage), &settings));

            match command {
                Commands::Tui => budget_screen::tui::run_tui(backend, &settings)?,
                Commands::Category(cmd) => handle_category_command(&backend, &settings, cmd)?,
                Commands::Group(cmd) => handle_group_command(&backend, &settings, cmd)?,
                Commands::Assign(args) => handle_assign_command(&backend, &settings, args)?,
                Commands::Transaction(cmd) => handle_transaction_command(&backend, &settings, cmd)?,
                Commands::Allocation(args) => handle_allocation_command(&backend, &settings, args)?,
                Commands::Init | Commands::Config => {}
            }
        }
    }

    Ok(())
}
