//! Allocated and spent aggregation
//!
//! Reports are recomputed from assignments and transactions on demand and
//! memoized in a small least-frequently-used cache with per-entry expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::BudgetResult;
use crate::models::{AllocationReport, CategoryAmounts, DateRange, Money, PeriodAmounts, UserId};
use crate::storage::Storage;

pub struct AllocationService<'a> {
    storage: &'a Storage,
}

impl<'a> AllocationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Compute allocated, spent and income for every category of a user
    ///
    /// Spending shows as a positive spent amount and refunds reduce it, so
    /// spent can go negative. Transactions on the unallocated-funds bucket
    /// count as income rather than spending.
    pub fn report(&self, user_id: UserId, range: DateRange) -> BudgetResult<AllocationReport> {
        let categories = self.storage.categories.categories_for_user(user_id)?;
        let assignments = self.storage.assignments.in_range(user_id, range)?;
        let transactions = self.storage.transactions.in_range(user_id, range)?;

        let mut report = AllocationReport::empty(range);

        for category in &categories {
            let allocated: Money = assignments
                .iter()
                .filter(|a| a.category_id == category.id)
                .map(|a| a.amount)
                .sum();

            let in_category = transactions.iter().filter(|t| t.category_id == category.id);
            let spent = if category.is_unallocated_funds {
                report.unallocated_income += in_category.map(|t| t.amount).sum::<Money>();
                Money::ZERO
            } else {
                in_category.map(|t| t.spent_contribution()).sum()
            };

            report.allocated_and_spent.push(CategoryAmounts {
                category_id: category.id,
                amounts: PeriodAmounts::new(allocated, spent),
            });
        }

        Ok(report)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user_id: UserId,
    pub range: DateRange,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    report: AllocationReport,
    expires_at: Instant,
    frequency: u64,
    /// Tick of the last insert or hit; breaks frequency ties oldest-first
    touched: u64,
}

/// LFU cache of allocation reports
///
/// Ranges that ended before today cannot change without a write, so they
/// live for the long TTL. Ranges reaching today or later use the short one.
#[derive(Debug)]
pub struct AllocationCache {
    capacity: usize,
    ttl: Duration,
    short_ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
    tick: u64,
}

impl AllocationCache {
    pub fn new(capacity: usize, ttl: Duration, short_ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            short_ttl,
            entries: HashMap::new(),
            tick: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.cache_capacity,
            Duration::from_secs(settings.cache_ttl_secs),
            Duration::from_secs(settings.cache_short_ttl_secs),
        )
    }

    /// Look up a live entry, counting the hit
    pub fn get(&mut self, key: &CacheKey, now: Instant) -> Option<AllocationReport> {
        let expired = self.entries.get(key)?.expires_at <= now;
        if expired {
            self.entries.remove(key);
            tracing::debug!(range = %key.range, "allocation cache entry expired");
            return None;
        }

        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.frequency += 1;
        entry.touched = tick;
        Some(entry.report.clone())
    }

    pub fn insert(
        &mut self,
        key: CacheKey,
        report: AllocationReport,
        today: NaiveDate,
        now: Instant,
    ) {
        if self.capacity == 0 {
            return;
        }

        self.entries.retain(|_, entry| entry.expires_at > now);
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_least_frequent();
        }

        let ttl = if key.range.ended_before(today) {
            self.ttl
        } else {
            self.short_ttl
        };

        self.tick += 1;
        self.entries.insert(
            key,
            CacheEntry {
                report,
                expires_at: now + ttl,
                frequency: 0,
                touched: self.tick,
            },
        );
    }

    /// Drop everything; any write can change any cached range
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_least_frequent(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.frequency, entry.touched))
            .map(|(key, _)| *key);

        if let Some(key) = victim {
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;
    use crate::models::{Assignment, Category, NewAssignment, Transaction};
    use tempfile::TempDir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn january() -> DateRange {
        DateRange::new(date(1, 1), date(1, 31))
    }

    #[test]
    fn test_report_aggregates_range_only() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let user = UserId::new();

        let bucket = Category::unallocated_funds(user);
        let groceries = Category::new(user, "Groceries");
        let (bucket_id, groceries_id) = (bucket.id, groceries.id);
        storage.categories.upsert_category(bucket).unwrap();
        storage.categories.upsert_category(groceries).unwrap();

        for (amount, day) in [(10_000, date(1, 2)), (5_000, date(1, 31)), (7_000, date(2, 1))] {
            let new = NewAssignment::new(user, groceries_id, Money::from_cents(amount), day);
            storage.assignments.insert(Assignment::from(new)).unwrap();
        }

        let txns = [
            Transaction::new(user, groceries_id, Money::from_cents(-4_000), date(1, 10)),
            Transaction::new(user, groceries_id, Money::from_cents(500), date(1, 12)),
            Transaction::new(user, groceries_id, Money::from_cents(-9_999), date(2, 2)),
            Transaction::new(user, bucket_id, Money::from_cents(300_000), date(1, 1)),
        ];
        for txn in txns {
            storage.transactions.insert(txn).unwrap();
        }

        let report = AllocationService::new(&storage).report(user, january()).unwrap();

        let amounts = report.amounts_for(groceries_id).unwrap();
        assert_eq!(amounts.allocated, Money::from_cents(15_000));
        assert_eq!(amounts.spent, Money::from_cents(3_500));
        assert_eq!(report.amounts_for(bucket_id).unwrap().spent, Money::ZERO);
        assert_eq!(report.unallocated_income, Money::from_cents(300_000));
    }

    #[test]
    fn test_refunds_can_make_spent_negative() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let user = UserId::new();
        let shoes = Category::new(user, "Shoes");
        let shoes_id = shoes.id;
        storage.categories.upsert_category(shoes).unwrap();
        storage
            .transactions
            .insert(Transaction::new(user, shoes_id, Money::from_cents(2_000), date(1, 5)))
            .unwrap();

        let report = AllocationService::new(&storage).report(user, january()).unwrap();
        assert_eq!(report.amounts_for(shoes_id).unwrap().spent, Money::from_cents(-2_000));
    }

    fn cache() -> AllocationCache {
        AllocationCache::new(2, Duration::from_secs(1200), Duration::from_secs(60))
    }

    fn key(user: UserId, month: u32) -> CacheKey {
        let start = date(month, 1);
        CacheKey {
            user_id: user,
            range: DateRange::new(start, start + chrono::Duration::days(27)),
        }
    }

    #[test]
    fn test_cache_ttl_depends_on_range_end() {
        let mut cache = cache();
        let now = Instant::now();
        let user = UserId::new();
        let today = date(3, 15);

        let past = key(user, 1);
        let current = key(user, 3);
        cache.insert(past, AllocationReport::empty(past.range), today, now);
        cache.insert(current, AllocationReport::empty(current.range), today, now);

        let later = now + Duration::from_secs(61);
        assert!(cache.get(&past, later).is_some());
        assert!(cache.get(&current, later).is_none());
        assert_eq!(cache.len(), 1);

        assert!(cache.get(&past, now + Duration::from_secs(1201)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_evicts_least_frequently_used() {
        let mut cache = cache();
        let now = Instant::now();
        let user = UserId::new();
        let today = date(12, 31);
        let (jan, feb, mar) = (key(user, 1), key(user, 2), key(user, 3));

        cache.insert(jan, AllocationReport::empty(jan.range), today, now);
        cache.insert(feb, AllocationReport::empty(feb.range), today, now);
        assert!(cache.get(&jan, now).is_some());

        cache.insert(mar, AllocationReport::empty(mar.range), today, now);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&feb, now).is_none());
        assert!(cache.get(&jan, now).is_some());
        assert!(cache.get(&mar, now).is_some());
    }

    #[test]
    fn test_cache_invalidate_and_zero_capacity() {
        let now = Instant::now();
        let user = UserId::new();
        let jan = key(user, 1);

        let mut cache = cache();
        cache.insert(jan, AllocationReport::empty(jan.range), date(6, 1), now);
        cache.invalidate_all();
        assert!(cache.get(&jan, now).is_none());

        let mut disabled = AllocationCache::new(0, Duration::from_secs(1), Duration::from_secs(1));
        disabled.insert(jan, AllocationReport::empty(jan.range), date(6, 1), now);
        assert!(disabled.is_empty());
    }
}
