//! File-backed implementation of the backend contracts
//!
//! One `LocalBackend` wraps a `Storage` and can be shared between threads.
//! Every successful write clears the allocation cache and pushes the user's
//! fresh snapshot to feed subscribers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use chrono::{Local, NaiveDate};

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AllocationReport, Category, CategoryGroup, CategoryGroupId, CategoryId, DateRange, Money,
    NewAssignment, Transaction, UserId,
};
use crate::storage::Storage;

use super::allocation::{AllocationCache, AllocationService, CacheKey};
use super::api::{BudgetApi, CategoriesSnapshot, CategoryFeed, FeedListener, SubscriptionId};
use super::assignment::AssignmentService;
use super::category::CategoryService;

pub struct LocalBackend {
    storage: Arc<Storage>,
    cache: Mutex<AllocationCache>,
    listeners: RwLock<Vec<(SubscriptionId, FeedListener)>>,
    next_subscription: AtomicU64,
}

impl LocalBackend {
    pub fn new(storage: Arc<Storage>, settings: &Settings) -> Self {
        Self {
            storage,
            cache: Mutex::new(AllocationCache::from_settings(settings)),
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Allocation report with an explicit "today", used for cache expiry
    pub fn allocated_and_spent_on(
        &self,
        user_id: UserId,
        range: DateRange,
        today: NaiveDate,
    ) -> BudgetResult<AllocationReport> {
        let key = CacheKey { user_id, range };
        let now = Instant::now();

        if let Some(report) = self.lock_cache()?.get(&key, now) {
            tracing::debug!(range = %range, "allocation cache hit");
            return Ok(report);
        }

        let report = AllocationService::new(&self.storage).report(user_id, range)?;
        self.lock_cache()?.insert(key, report.clone(), today, now);
        Ok(report)
    }

    /// Book spending or income, keeping the cache and subscribers current
    pub fn record_transaction(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        amount: Money,
        date: NaiveDate,
        payee: &str,
        memo: &str,
    ) -> BudgetResult<Transaction> {
        let txn = AssignmentService::new(&self.storage)
            .record_transaction(user_id, category_id, amount, date, payee, memo)?;
        self.after_write(user_id);
        Ok(txn)
    }

    /// Invalidate derived state and tell subscribers after a write
    ///
    /// The write has already been committed, so failures here are logged
    /// and never reported to the caller.
    fn after_write(&self, user_id: UserId) {
        match self.lock_cache() {
            Ok(mut cache) => cache.invalidate_all(),
            Err(e) => tracing::warn!(error = %e, "allocation cache not invalidated after write"),
        }

        let listeners = match self.listeners.read() {
            Ok(listeners) => listeners,
            Err(e) => {
                tracing::warn!(error = %e, "category feed listeners poisoned");
                return;
            }
        };
        if listeners.is_empty() {
            return;
        }

        match CategoryService::new(&self.storage).snapshot(user_id) {
            Ok(snapshot) => {
                for (_, listener) in listeners.iter() {
                    listener(user_id, &snapshot);
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not load snapshot for subscribers"),
        }
    }

    fn lock_cache(&self) -> BudgetResult<std::sync::MutexGuard<'_, AllocationCache>> {
        self.cache
            .lock()
            .map_err(|e| BudgetError::Storage(format!("Failed to lock allocation cache: {}", e)))
    }
}

impl CategoryFeed for LocalBackend {
    fn snapshot(&self, user_id: UserId) -> BudgetResult<CategoriesSnapshot> {
        CategoryService::new(&self.storage).snapshot(user_id)
    }

    fn subscribe(&self, listener: FeedListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push((id, listener)),
            Err(e) => tracing::error!(error = %e, "category feed listeners poisoned"),
        }
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.retain(|(existing, _)| *existing != id);
        }
    }
}

impl BudgetApi for LocalBackend {
    fn delete_category(&self, user_id: UserId, category_id: CategoryId) -> BudgetResult<()> {
        CategoryService::new(&self.storage).delete_category(user_id, category_id)?;
        self.after_write(user_id);
        Ok(())
    }

    fn create_assignment(&self, assignment: NewAssignment) -> BudgetResult<()> {
        let user_id = assignment.user_id;
        AssignmentService::new(&self.storage).create_assignment(assignment)?;
        self.after_write(user_id);
        Ok(())
    }

    fn fetch_allocated_and_spent(
        &self,
        user_id: UserId,
        range: DateRange,
    ) -> BudgetResult<AllocationReport> {
        self.allocated_and_spent_on(user_id, range, Local::now().date_naive())
    }

    fn create_category(&self, user_id: UserId, name: &str) -> BudgetResult<Category> {
        let category = CategoryService::new(&self.storage).create_category(user_id, name)?;
        self.after_write(user_id);
        Ok(category)
    }

    fn create_group(&self, user_id: UserId, name: &str) -> BudgetResult<CategoryGroup> {
        let group = CategoryService::new(&self.storage).create_group(user_id, name)?;
        self.after_write(user_id);
        Ok(group)
    }

    fn rename_category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        name: &str,
    ) -> BudgetResult<Category> {
        let category =
            CategoryService::new(&self.storage).rename_category(user_id, category_id, name)?;
        self.after_write(user_id);
        Ok(category)
    }

    fn set_category_goal(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        goal: Money,
    ) -> BudgetResult<Category> {
        let category = CategoryService::new(&self.storage).set_goal(user_id, category_id, goal)?;
        self.after_write(user_id);
        Ok(category)
    }

    fn set_category_group(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        group_id: Option<CategoryGroupId>,
    ) -> BudgetResult<Category> {
        let category =
            CategoryService::new(&self.storage).set_group(user_id, category_id, group_id)?;
        self.after_write(user_id);
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;
    use crate::storage::initialize_storage;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    fn backend() -> (TempDir, LocalBackend, UserId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        let user = initialize_storage(&paths, &mut settings).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, LocalBackend::new(Arc::new(storage), &settings), user)
    }

    fn january() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_writes_invalidate_cached_reports() {
        let (_temp_dir, backend, user) = backend();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let category = backend.create_category(user, "Groceries").unwrap();

        let before = backend.allocated_and_spent_on(user, january(), today).unwrap();
        assert_eq!(before.amounts_for(category.id).unwrap().allocated, Money::ZERO);

        backend
            .create_assignment(NewAssignment::new(
                user,
                category.id,
                Money::from_cents(4200),
                january().start,
            ))
            .unwrap();

        let after = backend.allocated_and_spent_on(user, january(), today).unwrap();
        assert_eq!(after.amounts_for(category.id).unwrap().allocated, Money::from_cents(4200));
    }

    #[test]
    fn test_subscribers_receive_snapshots_until_unsubscribed() {
        let (_temp_dir, backend, user) = backend();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let id = backend.subscribe(Box::new(move |_: UserId, snapshot: &CategoriesSnapshot| {
            assert!(snapshot.unallocated_funds().is_some());
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        backend.create_group(user, "Bills").unwrap();
        backend.create_category(user, "Rent").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        backend.unsubscribe(id);
        backend.create_category(user, "Water").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_write_does_not_notify() {
        let (_temp_dir, backend, user) = backend();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        backend.subscribe(Box::new(move |_: UserId, _: &CategoriesSnapshot| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(backend.delete_category(user, CategoryId::new()).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_committed_assignment_survives_poisoned_cache() {
        let (_temp_dir, backend, user) = backend();
        let category = backend.create_category(user, "Groceries").unwrap();

        let _ = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = backend.cache.lock().unwrap();
                    panic!("poison the cache");
                })
                .join()
        });
        assert!(backend.cache.is_poisoned());

        backend
            .create_assignment(NewAssignment::new(
                user,
                category.id,
                Money::from_cents(1500),
                january().start,
            ))
            .unwrap();

        let stored = backend.storage().assignments.in_range(user, january()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].amount, Money::from_cents(1500));
    }
}
