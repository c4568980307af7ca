//! Assignment and transaction recording
//!
//! Both writes move a category's available balance. An assignment draws the
//! money out of the user's unallocated-funds bucket; a transaction spends it
//! (or refunds it) directly.

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Assignment, Category, CategoryId, Money, NewAssignment, Transaction, UserId};
use crate::storage::Storage;

pub struct AssignmentService<'a> {
    storage: &'a Storage,
}

impl<'a> AssignmentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Store an assignment and move the money out of unallocated funds
    pub fn create_assignment(&self, new: NewAssignment) -> BudgetResult<Assignment> {
        if new.amount.is_zero() {
            return Err(BudgetError::Validation(
                "Assignment amount cannot be zero".into(),
            ));
        }

        let category = self.owned_category(new.user_id, new.category_id)?;
        let assignment = Assignment::from(new);

        self.storage.assignments.insert(assignment.clone())?;
        self.storage
            .categories
            .update_category(category.id, |c| c.adjust_available(assignment.amount))?;

        if !category.is_unallocated_funds {
            if let Some(bucket) = self.storage.categories.unallocated_funds(assignment.user_id)? {
                self.storage
                    .categories
                    .update_category(bucket.id, |c| c.adjust_available(-assignment.amount))?;
            }
        }

        self.storage.assignments.save()?;
        self.storage.categories.save()?;

        tracing::info!(
            category = %assignment.category_id,
            amount = %assignment.amount,
            date = %assignment.date,
            "created assignment"
        );
        Ok(assignment)
    }

    /// Record spending (negative) or income and refunds (positive)
    pub fn record_transaction(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        amount: Money,
        date: NaiveDate,
        payee: &str,
        memo: &str,
    ) -> BudgetResult<Transaction> {
        if amount.is_zero() {
            return Err(BudgetError::Validation(
                "Transaction amount cannot be zero".into(),
            ));
        }

        self.owned_category(user_id, category_id)?;
        let txn = Transaction::new(user_id, category_id, amount, date)
            .with_payee(payee.trim())
            .with_memo(memo.trim());

        self.storage.transactions.insert(txn.clone())?;
        self.storage
            .categories
            .update_category(category_id, |c| c.adjust_available(amount))?;

        self.storage.transactions.save()?;
        self.storage.categories.save()?;

        tracing::info!(category = %category_id, amount = %amount, "recorded transaction");
        Ok(txn)
    }

    fn owned_category(&self, user_id: UserId, category_id: CategoryId) -> BudgetResult<Category> {
        let category = self
            .storage
            .categories
            .get_category(category_id)?
            .ok_or_else(|| BudgetError::category_not_found(category_id.to_string()))?;

        if category.user_id != user_id {
            return Err(BudgetError::Forbidden(
                "Not authorized to use this category".into(),
            ));
        }

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, UserId, CategoryId, CategoryId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let user = UserId::new();

        let bucket = Category::unallocated_funds(user);
        let bucket_id = bucket.id;
        let groceries = Category::new(user, "Groceries");
        let groceries_id = groceries.id;
        storage.categories.upsert_category(bucket).unwrap();
        storage.categories.upsert_category(groceries).unwrap();

        (temp_dir, storage, user, bucket_id, groceries_id)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
    }

    fn available(storage: &Storage, id: CategoryId) -> Money {
        storage.categories.get_category(id).unwrap().unwrap().available
    }

    #[test]
    fn test_assignment_moves_money_from_unallocated() {
        let (_temp_dir, storage, user, bucket, groceries) = setup();
        let service = AssignmentService::new(&storage);

        service
            .create_assignment(NewAssignment::new(user, groceries, Money::from_cents(6000), date()))
            .unwrap();

        assert_eq!(available(&storage, groceries), Money::from_cents(6000));
        assert_eq!(available(&storage, bucket), Money::from_cents(-6000));
        assert_eq!(storage.assignments.count().unwrap(), 1);
    }

    #[test]
    fn test_assignment_validation() {
        let (_temp_dir, storage, user, _bucket, groceries) = setup();
        let service = AssignmentService::new(&storage);

        let zero = NewAssignment::new(user, groceries, Money::ZERO, date());
        assert!(service.create_assignment(zero).unwrap_err().is_validation());

        let missing = NewAssignment::new(user, CategoryId::new(), Money::from_cents(1), date());
        assert!(service.create_assignment(missing).unwrap_err().is_not_found());

        let foreign = NewAssignment::new(UserId::new(), groceries, Money::from_cents(1), date());
        assert!(matches!(
            service.create_assignment(foreign),
            Err(BudgetError::Forbidden(_))
        ));
        assert_eq!(storage.assignments.count().unwrap(), 0);
    }

    #[test]
    fn test_transaction_adjusts_available() {
        let (_temp_dir, storage, user, bucket, groceries) = setup();
        let service = AssignmentService::new(&storage);

        service
            .record_transaction(user, groceries, Money::from_cents(-1299), date(), "Market", "")
            .unwrap();
        service
            .record_transaction(
                user,
                bucket,
                Money::from_cents(250_000),
                date(),
                "Employer",
                "salary",
            )
            .unwrap();

        assert_eq!(available(&storage, groceries), Money::from_cents(-1299));
        assert_eq!(available(&storage, bucket), Money::from_cents(250_000));
        assert!(storage.transactions.has_for_category(groceries).unwrap());
    }
}
