//! Assignment repository for assignments.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use crate::models::{Assignment, AssignmentId, CategoryId, DateRange, UserId};

use super::file_io::{read_json, read_poisoned, write_json_atomic, write_poisoned};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AssignmentData {
    assignments: Vec<Assignment>,
}

pub struct AssignmentRepository {
    path: PathBuf,
    data: RwLock<HashMap<AssignmentId, Assignment>>,
}

impl AssignmentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: AssignmentData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(write_poisoned)?;
        *data = file_data
            .assignments
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.data.read().map_err(read_poisoned)?;
        let mut assignments: Vec<_> = data.values().cloned().collect();
        assignments.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        write_json_atomic(&self.path, &AssignmentData { assignments })
    }

    pub fn insert(&self, assignment: Assignment) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(write_poisoned)?;
        data.insert(assignment.id, assignment);
        Ok(())
    }

    /// A user's assignments dated inside `range`
    pub fn in_range(
        &self,
        user_id: UserId,
        range: DateRange,
    ) -> Result<Vec<Assignment>, BudgetError> {
        let data = self.data.read().map_err(read_poisoned)?;
        Ok(data
            .values()
            .filter(|a| a.user_id == user_id && range.contains(a.date))
            .cloned()
            .collect())
    }

    /// Drop every assignment of a category, returning how many went
    pub fn remove_for_category(&self, category_id: CategoryId) -> Result<usize, BudgetError> {
        let mut data = self.data.write().map_err(write_poisoned)?;
        let before = data.len();
        data.retain(|_, a| a.category_id != category_id);
        Ok(before - data.len())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(read_poisoned)?;
        Ok(data.len())
    }
}
