//! Storage layer for the local backend
//!
//! JSON files with atomic writes. Each repository guards its data with
//! `RwLock`s so a shared `Storage` can be used from worker threads.

pub mod assignments;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use assignments::AssignmentRepository;
pub use categories::{CategoryData, CategoryRepository};
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, needs_initialization};
pub use transactions::TransactionRepository;

use crate::config::AppPaths;
use crate::error::BudgetError;

/// Owns every repository of one data directory
pub struct Storage {
    paths: AppPaths,
    pub categories: CategoryRepository,
    pub assignments: AssignmentRepository,
    pub transactions: TransactionRepository,
}

impl Storage {
    pub fn new(paths: AppPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.budget_file()),
            assignments: AssignmentRepository::new(paths.assignments_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            paths,
        })
    }

    /// Open a data directory and load everything in it
    pub fn open(paths: AppPaths) -> Result<Self, BudgetError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn load_all(&self) -> Result<(), BudgetError> {
        self.categories.load()?;
        self.assignments.load()?;
        self.transactions.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), BudgetError> {
        self.categories.save()?;
        self.assignments.save()?;
        self.transactions.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.categories.category_count().unwrap(), 0);
        assert_eq!(storage.assignments.count().unwrap(), 0);
    }
}
