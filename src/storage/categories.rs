//! Category and group repository
//!
//! Both live in budget.json so a category delete and its group bookkeeping
//! are written together.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use crate::models::{Category, CategoryGroup, CategoryGroupId, CategoryId, UserId};

use super::file_io::{read_json, read_poisoned, write_json_atomic, write_poisoned};

/// On-disk layout of budget.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    pub groups: Vec<CategoryGroup>,
    pub categories: Vec<Category>,
}

pub struct CategoryRepository {
    path: PathBuf,
    groups: RwLock<HashMap<CategoryGroupId, CategoryGroup>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            groups: RwLock::new(HashMap::new()),
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the in-memory state with the contents of budget.json
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut groups = self.groups.write().map_err(write_poisoned)?;
        let mut categories = self.categories.write().map_err(write_poisoned)?;

        *groups = file_data.groups.into_iter().map(|g| (g.id, g)).collect();
        *categories = file_data
            .categories
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let groups = self.groups.read().map_err(read_poisoned)?;
        let categories = self.categories.read().map_err(read_poisoned)?;

        let mut group_list: Vec<_> = groups.values().cloned().collect();
        sort_groups(&mut group_list);

        let mut category_list: Vec<_> = categories.values().cloned().collect();
        sort_categories(&mut category_list);

        write_json_atomic(
            &self.path,
            &CategoryData {
                groups: group_list,
                categories: category_list,
            },
        )
    }

    // Groups

    pub fn get_group(&self, id: CategoryGroupId) -> Result<Option<CategoryGroup>, BudgetError> {
        let groups = self.groups.read().map_err(read_poisoned)?;
        Ok(groups.get(&id).cloned())
    }

    /// Groups owned by `user_id`, in display order
    pub fn groups_for_user(&self, user_id: UserId) -> Result<Vec<CategoryGroup>, BudgetError> {
        let groups = self.groups.read().map_err(read_poisoned)?;
        let mut list: Vec<_> = groups
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        sort_groups(&mut list);
        Ok(list)
    }

    /// Case-insensitive lookup within one user's groups
    pub fn group_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<CategoryGroup>, BudgetError> {
        let groups = self.groups.read().map_err(read_poisoned)?;
        let wanted = name.trim().to_lowercase();
        Ok(groups
            .values()
            .find(|g| g.user_id == user_id && g.name.to_lowercase() == wanted)
            .cloned())
    }

    pub fn upsert_group(&self, group: CategoryGroup) -> Result<(), BudgetError> {
        let mut groups = self.groups.write().map_err(write_poisoned)?;
        groups.insert(group.id, group);
        Ok(())
    }

    /// Sort order for a group appended after the user's existing ones
    pub fn next_group_sort_order(&self, user_id: UserId) -> Result<i32, BudgetError> {
        let groups = self.groups.read().map_err(read_poisoned)?;
        Ok(groups
            .values()
            .filter(|g| g.user_id == user_id)
            .map(|g| g.sort_order + 1)
            .max()
            .unwrap_or(0))
    }

    // Categories

    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        let categories = self.categories.read().map_err(read_poisoned)?;
        Ok(categories.get(&id).cloned())
    }

    /// Categories owned by `user_id`, in feed order
    pub fn categories_for_user(&self, user_id: UserId) -> Result<Vec<Category>, BudgetError> {
        let categories = self.categories.read().map_err(read_poisoned)?;
        let mut list: Vec<_> = categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        sort_categories(&mut list);
        Ok(list)
    }

    /// Case-insensitive lookup within one user's categories
    pub fn category_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<Category>, BudgetError> {
        let categories = self.categories.read().map_err(read_poisoned)?;
        let wanted = name.trim().to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.user_id == user_id && c.name.to_lowercase() == wanted)
            .cloned())
    }

    /// The user's unallocated-funds bucket, if one exists
    pub fn unallocated_funds(&self, user_id: UserId) -> Result<Option<Category>, BudgetError> {
        let categories = self.categories.read().map_err(read_poisoned)?;
        Ok(categories
            .values()
            .find(|c| c.user_id == user_id && c.is_unallocated_funds)
            .cloned())
    }

    pub fn upsert_category(&self, category: Category) -> Result<(), BudgetError> {
        let mut categories = self.categories.write().map_err(write_poisoned)?;
        categories.insert(category.id, category);
        Ok(())
    }

    /// Apply `f` to a stored category in place
    pub fn update_category<F>(&self, id: CategoryId, f: F) -> Result<Category, BudgetError>
    where
        F: FnOnce(&mut Category),
    {
        let mut categories = self.categories.write().map_err(write_poisoned)?;
        let category = categories
            .get_mut(&id)
            .ok_or_else(|| BudgetError::category_not_found(id.to_string()))?;
        f(category);
        Ok(category.clone())
    }

    pub fn remove_category(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        let mut categories = self.categories.write().map_err(write_poisoned)?;
        Ok(categories.remove(&id))
    }

    pub fn next_category_sort_order(&self, user_id: UserId) -> Result<i32, BudgetError> {
        let categories = self.categories.read().map_err(read_poisoned)?;
        Ok(categories
            .values()
            .filter(|c| c.user_id == user_id && !c.is_unallocated_funds)
            .map(|c| c.sort_order + 1)
            .max()
            .unwrap_or(0))
    }

    pub fn category_count(&self) -> Result<usize, BudgetError> {
        let categories = self.categories.read().map_err(read_poisoned)?;
        Ok(categories.len())
    }
}

fn sort_groups(groups: &mut [CategoryGroup]) {
    groups.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
}

fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.name.cmp(&b.name))
    });
}
