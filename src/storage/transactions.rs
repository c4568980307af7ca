//! Transaction repository for transactions.json
//!
//! Transactions are indexed by category because the delete guard and the
//! spent aggregation both look them up that way.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use crate::models::{CategoryId, DateRange, Transaction, TransactionId, UserId};

use super::file_io::{read_json, read_poisoned, write_json_atomic, write_poisoned};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the category index
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_poisoned)?;
        let mut by_category = self.by_category.write().map_err(write_poisoned)?;

        data.clear();
        by_category.clear();

        for txn in file_data.transactions {
            by_category.entry(txn.category_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.data.read().map_err(read_poisoned)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn insert(&self, txn: Transaction) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(write_poisoned)?;
        let mut by_category = self.by_category.write().map_err(write_poisoned)?;

        by_category.entry(txn.category_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Whether any transaction references the category
    pub fn has_for_category(&self, category_id: CategoryId) -> Result<bool, BudgetError> {
        let by_category = self.by_category.read().map_err(read_poisoned)?;
        Ok(by_category
            .get(&category_id)
            .is_some_and(|ids| !ids.is_empty()))
    }

    /// A user's transactions dated inside `range`, newest first
    pub fn in_range(
        &self,
        user_id: UserId,
        range: DateRange,
    ) -> Result<Vec<Transaction>, BudgetError> {
        let data = self.data.read().map_err(read_poisoned)?;
        let mut list: Vec<_> = data
            .values()
            .filter(|t| t.user_id == user_id && range.contains(t.date))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(list)
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(read_poisoned)?;
        Ok(data.len())
    }
}
