//! Category service
//!
//! Business rules for creating, editing and deleting categories and groups
//! of one user. Every write is saved before returning.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, CategoryGroup, CategoryGroupId, CategoryId, Money, UserId};
use crate::storage::Storage;

use super::api::CategoriesSnapshot;

pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Categories and groups of a user, in display order
    pub fn snapshot(&self, user_id: UserId) -> BudgetResult<CategoriesSnapshot> {
        Ok(CategoriesSnapshot {
            categories: self.storage.categories.categories_for_user(user_id)?,
            groups: self.storage.categories.groups_for_user(user_id)?,
        })
    }

    // === Group Operations ===

    pub fn create_group(&self, user_id: UserId, name: &str) -> BudgetResult<CategoryGroup> {
        let name = name.trim();
        if self.storage.categories.group_by_name(user_id, name)?.is_some() {
            return Err(BudgetError::Validation(format!(
                "A category group named '{}' already exists",
                name
            )));
        }

        let sort_order = self.storage.categories.next_group_sort_order(user_id)?;
        let group = CategoryGroup::with_sort_order(user_id, name, sort_order);
        group
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.categories.upsert_group(group.clone())?;
        self.storage.categories.save()?;

        tracing::info!(group = %group.id, name = %group.name, "created category group");
        Ok(group)
    }

    /// Find a user's group by name or id string
    pub fn find_group(
        &self,
        user_id: UserId,
        identifier: &str,
    ) -> BudgetResult<Option<CategoryGroup>> {
        if let Some(group) = self.storage.categories.group_by_name(user_id, identifier)? {
            return Ok(Some(group));
        }

        if let Ok(id) = identifier.parse::<CategoryGroupId>() {
            return Ok(self
                .storage
                .categories
                .get_group(id)?
                .filter(|g| g.user_id == user_id));
        }

        Ok(None)
    }

    // === Category Operations ===

    pub fn create_category(&self, user_id: UserId, name: &str) -> BudgetResult<Category> {
        let name = name.trim();
        if self.storage.categories.category_by_name(user_id, name)?.is_some() {
            return Err(BudgetError::Validation(format!(
                "A category named '{}' already exists",
                name
            )));
        }

        let mut category = Category::new(user_id, name);
        category.sort_order = self.storage.categories.next_category_sort_order(user_id)?;
        category
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.categories.upsert_category(category.clone())?;
        self.storage.categories.save()?;

        tracing::info!(category = %category.id, name = %category.name, "created category");
        Ok(category)
    }

    /// Find a user's category by name or id string
    pub fn find_category(
        &self,
        user_id: UserId,
        identifier: &str,
    ) -> BudgetResult<Option<Category>> {
        if let Some(category) = self.storage.categories.category_by_name(user_id, identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return Ok(self
                .storage
                .categories
                .get_category(id)?
                .filter(|c| c.user_id == user_id));
        }

        Ok(None)
    }

    pub fn rename_category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        name: &str,
    ) -> BudgetResult<Category> {
        let name = name.trim();
        let mut renamed =
            self.owned_category(user_id, category_id, "Not authorized to update this category")?;

        if let Some(existing) = self.storage.categories.category_by_name(user_id, name)? {
            if existing.id != category_id {
                return Err(BudgetError::Validation(format!(
                    "A category named '{}' already exists",
                    name
                )));
            }
        }

        renamed.rename(name);
        renamed
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.categories.upsert_category(renamed.clone())?;
        self.storage.categories.save()?;
        Ok(renamed)
    }

    /// Set the goal of a category; a zero goal clears it
    pub fn set_goal(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        goal: Money,
    ) -> BudgetResult<Category> {
        self.owned_category(user_id, category_id, "Not authorized to update this category")?;

        if goal.is_negative() {
            return Err(BudgetError::Validation(
                "Goal amount cannot be negative".into(),
            ));
        }

        let category = self
            .storage
            .categories
            .update_category(category_id, |c| c.set_goal(goal))?;
        self.storage.categories.save()?;

        tracing::info!(category = %category_id, goal = %goal, "updated category goal");
        Ok(category)
    }

    /// Move a category into a group, or out of any with `None`
    pub fn set_group(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        group_id: Option<CategoryGroupId>,
    ) -> BudgetResult<Category> {
        self.owned_category(user_id, category_id, "Not authorized to update this category")?;

        if let Some(group_id) = group_id {
            let group = self
                .storage
                .categories
                .get_group(group_id)?
                .ok_or_else(|| BudgetError::group_not_found(group_id.to_string()))?;
            if group.user_id != user_id {
                return Err(BudgetError::Forbidden(
                    "Not authorized to use this category group".into(),
                ));
            }
        }

        let category = self
            .storage
            .categories
            .update_category(category_id, |c| c.move_to_group(group_id))?;
        self.storage.categories.save()?;
        Ok(category)
    }

    /// Delete a category together with its assignments
    ///
    /// Refused while transactions reference the category or money is still
    /// available in it.
    pub fn delete_category(&self, user_id: UserId, category_id: CategoryId) -> BudgetResult<()> {
        let category =
            self.owned_category(user_id, category_id, "Not authorized to delete this category")?;

        if category.is_unallocated_funds {
            return Err(BudgetError::Rejected(
                "The unallocated funds category cannot be deleted".into(),
            ));
        }

        if self.storage.transactions.has_for_category(category_id)? {
            return Err(BudgetError::Rejected(
                "Cannot delete category with associated transactions".into(),
            ));
        }

        if !category.available.is_zero() {
            return Err(BudgetError::Rejected(
                "Cannot delete category with non-zero available amount. Please allocate or move the funds first."
                    .into(),
            ));
        }

        let removed = self.storage.assignments.remove_for_category(category_id)?;
        self.storage.categories.remove_category(category_id)?;
        self.storage.assignments.save()?;
        self.storage.categories.save()?;

        tracing::info!(category = %category_id, assignments = removed, "deleted category");
        Ok(())
    }

    fn owned_category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        forbidden: &str,
    ) -> BudgetResult<Category> {
        let category = self
            .storage
            .categories
            .get_category(category_id)?
            .ok_or_else(|| BudgetError::category_not_found(category_id.to_string()))?;

        if category.user_id != user_id {
            return Err(BudgetError::Forbidden(forbidden.to_string()));
        }

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;
    use crate::models::{Assignment, NewAssignment, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_create_category_rejects_duplicates_and_blank_names() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();

        let first = service.create_category(user, "Groceries").unwrap();
        let second = service.create_category(user, "Dining").unwrap();
        assert!(second.sort_order > first.sort_order);

        assert!(service.create_category(user, "groceries").unwrap_err().is_validation());
        assert!(service.create_category(user, "   ").unwrap_err().is_validation());
        assert!(service.create_category(UserId::new(), "Groceries").is_ok());
    }

    #[test]
    fn test_create_group_appends_sort_order() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();

        let bills = service.create_group(user, "Bills").unwrap();
        let fun = service.create_group(user, "Fun").unwrap();
        assert_eq!(bills.sort_order, 0);
        assert_eq!(fun.sort_order, 1);

        let snapshot = service.snapshot(user).unwrap();
        assert_eq!(snapshot.groups.len(), 2);
        assert_eq!(snapshot.groups[0].name, "Bills");
    }

    #[test]
    fn test_set_goal_validates_and_zero_clears() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();
        let category = service.create_category(user, "Vacation").unwrap();

        let err = service
            .set_goal(user, category.id, Money::from_cents(-1))
            .unwrap_err();
        assert_eq!(err.to_string(), "Goal amount cannot be negative");

        let updated = service.set_goal(user, category.id, Money::from_cents(50_000)).unwrap();
        assert_eq!(updated.goal_amount, Some(Money::from_cents(50_000)));

        let cleared = service.set_goal(user, category.id, Money::ZERO).unwrap();
        assert_eq!(cleared.goal_amount, None);
    }

    #[test]
    fn test_other_users_are_forbidden() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let owner = UserId::new();
        let intruder = UserId::new();
        let category = service.create_category(owner, "Rent").unwrap();
        let foreign_group = service.create_group(intruder, "Mine").unwrap();

        let err = service.delete_category(intruder, category.id).unwrap_err();
        assert_eq!(err, BudgetError::Forbidden("Not authorized to delete this category".into()));

        let err = service
            .set_group(owner, category.id, Some(foreign_group.id))
            .unwrap_err();
        assert_eq!(err, BudgetError::Forbidden("Not authorized to use this category group".into()));

        let err = service
            .set_group(owner, category.id, Some(CategoryGroupId::new()))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_group_moves_in_and_out() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();
        let category = service.create_category(user, "Rent").unwrap();
        let bills = service.create_group(user, "Bills").unwrap();

        let moved = service.set_group(user, category.id, Some(bills.id)).unwrap();
        assert_eq!(moved.group_id, Some(bills.id));

        let ungrouped = service.set_group(user, category.id, None).unwrap();
        assert_eq!(ungrouped.group_id, None);
    }

    #[test]
    fn test_delete_refused_with_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();
        let category = service.create_category(user, "Groceries").unwrap();

        storage
            .transactions
            .insert(Transaction::new(user, category.id, Money::from_cents(-500), date()))
            .unwrap();

        let err = service.delete_category(user, category.id).unwrap_err();
        assert_eq!(
            err.user_message().as_deref(),
            Some("Cannot delete category with associated transactions")
        );
    }

    #[test]
    fn test_delete_refused_with_available_balance() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();
        let category = service.create_category(user, "Gifts").unwrap();
        storage
            .categories
            .update_category(category.id, |c| c.adjust_available(Money::from_cents(100)))
            .unwrap();

        let err = service.delete_category(user, category.id).unwrap_err();
        assert!(err.to_string().starts_with("Cannot delete category with non-zero available"));
    }

    #[test]
    fn test_delete_cascades_assignments() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();
        let keep = service.create_category(user, "Rent").unwrap();
        let hobbies = service.create_category(user, "Hobbies").unwrap();

        for id in [keep.id, hobbies.id] {
            let new = NewAssignment::new(user, id, Money::from_cents(1000), date());
            storage.assignments.insert(Assignment::from(new)).unwrap();
        }

        service.delete_category(user, hobbies.id).unwrap();

        assert!(storage.categories.get_category(hobbies.id).unwrap().is_none());
        assert_eq!(storage.assignments.count().unwrap(), 1);
        assert!(service.delete_category(user, hobbies.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_category_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let user = UserId::new();
        let category = service.create_category(user, "Utilities").unwrap();

        assert_eq!(service.find_category(user, "utilities").unwrap().unwrap().id, category.id);
        assert_eq!(
            service.find_category(user, &category.id.to_string()).unwrap().unwrap().id,
            category.id
        );
        assert!(service.find_category(UserId::new(), &category.id.to_string()).unwrap().is_none());
    }
}
