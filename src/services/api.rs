//! Contracts between the budget screen and whatever backs it
//!
//! The screen never touches storage directly. It reads categories through a
//! `CategoryFeed` and performs writes through a `BudgetApi`; both are object
//! safe so the terminal front end can hand an `Arc<dyn ...>` to worker
//! threads.

use std::sync::Arc;

use chrono::Weekday;

use crate::config::Settings;
use crate::error::BudgetResult;
use crate::models::{
    AllocationReport, Category, CategoryGroup, CategoryGroupId, CategoryId, DateRange, Money,
    NewAssignment, PeriodKind, UserId,
};

/// The signed-in user and their preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<UserId>,
    pub period_kind: PeriodKind,
    pub week_start: Weekday,
    pub currency_symbol: String,
}

impl Session {
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            period_kind: PeriodKind::default(),
            week_start: Weekday::Sun,
            currency_symbol: "$".to_string(),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user_id: None,
            ..Self::signed_in(UserId::new())
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            user_id: settings.user_id,
            period_kind: settings.budget_period_type,
            week_start: settings.week_start(),
            currency_symbol: settings.currency_symbol.clone(),
        }
    }
}

/// Everything the feed knows about one user's categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoriesSnapshot {
    pub categories: Vec<Category>,
    pub groups: Vec<CategoryGroup>,
}

impl CategoriesSnapshot {
    pub fn unallocated_funds(&self) -> Option<&Category> {
        self.categories.iter().find(|c| c.is_unallocated_funds)
    }
}

/// Handle returned by `CategoryFeed::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback invoked with a user's fresh snapshot after every write
pub type FeedListener = Box<dyn Fn(UserId, &CategoriesSnapshot) + Send + Sync>;

/// Push-style source of categories and groups
pub trait CategoryFeed: Send + Sync {
    /// Current categories and groups of a user
    fn snapshot(&self, user_id: UserId) -> BudgetResult<CategoriesSnapshot>;

    fn subscribe(&self, listener: FeedListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Remote operations the budget screen performs
pub trait BudgetApi: Send + Sync {
    /// Delete a category and its assignments
    ///
    /// Fails when the category still has transactions or a non-zero
    /// available balance.
    fn delete_category(&self, user_id: UserId, category_id: CategoryId) -> BudgetResult<()>;

    /// Record an allocation event
    fn create_assignment(&self, assignment: NewAssignment) -> BudgetResult<()>;

    /// Allocated and spent per category, plus income, for a date range
    fn fetch_allocated_and_spent(
        &self,
        user_id: UserId,
        range: DateRange,
    ) -> BudgetResult<AllocationReport>;

    fn create_category(&self, user_id: UserId, name: &str) -> BudgetResult<Category>;

    fn create_group(&self, user_id: UserId, name: &str) -> BudgetResult<CategoryGroup>;

    fn rename_category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        name: &str,
    ) -> BudgetResult<Category>;

    /// Set a savings goal; zero clears it
    fn set_category_goal(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        goal: Money,
    ) -> BudgetResult<Category>;

    /// Move a category into a group, or out of any group with `None`
    fn set_category_group(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        group_id: Option<CategoryGroupId>,
    ) -> BudgetResult<Category>;
}

/// Shared handle used by the front ends
pub type SharedApi = Arc<dyn BudgetApi>;
