//! Category and CategoryGroup models
//!
//! Categories optionally belong to a group for display. Exactly one category
//! per user is flagged as the unallocated-funds bucket that income lands in
//! and assignments draw from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryGroupId, CategoryId, UserId};
use super::money::Money;

/// Name given to the unallocated-funds category on initialization
pub const UNALLOCATED_FUNDS_NAME: &str = "Unallocated Funds";

const MAX_NAME_LEN: usize = 50;

/// A named collection of categories (e.g., "Bills", "Savings")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: CategoryGroupId,

    pub user_id: UserId,

    pub name: String,

    /// Sort order for display
    #[serde(default)]
    pub sort_order: i32,

    pub created_at: DateTime<Utc>,
}

impl CategoryGroup {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: CategoryGroupId::new(),
            user_id,
            name: name.into(),
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_sort_order(user_id: UserId, name: impl Into<String>, sort_order: i32) -> Self {
        let mut group = Self::new(user_id, name);
        group.sort_order = sort_order;
        group
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A budget bucket with an available balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub user_id: UserId,

    pub name: String,

    /// Display group; `None` means ungrouped
    #[serde(default)]
    pub group_id: Option<CategoryGroupId>,

    /// Current balance, not scoped to a period
    #[serde(default)]
    pub available: Money,

    /// Savings goal per period
    #[serde(default)]
    pub goal_amount: Option<Money>,

    #[serde(default)]
    pub is_unallocated_funds: bool,

    #[serde(default)]
    pub sort_order: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            user_id,
            name: name.into(),
            group_id: None,
            available: Money::ZERO,
            goal_amount: None,
            is_unallocated_funds: false,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The per-user bucket for money not yet assigned anywhere
    pub fn unallocated_funds(user_id: UserId) -> Self {
        let mut category = Self::new(user_id, UNALLOCATED_FUNDS_NAME);
        category.is_unallocated_funds = true;
        category
    }

    pub fn in_group(mut self, group_id: CategoryGroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Set the goal; a zero amount clears it
    pub fn set_goal(&mut self, amount: Money) {
        self.goal_amount = if amount.is_zero() { None } else { Some(amount) };
        self.updated_at = Utc::now();
    }

    pub fn move_to_group(&mut self, group_id: Option<CategoryGroupId>) {
        self.group_id = group_id;
        self.updated_at = Utc::now();
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Adjust the available balance by a signed amount
    pub fn adjust_available(&mut self, delta: Money) {
        self.available += delta;
        self.updated_at = Utc::now();
    }

    /// Goal amount, treating a zero goal as no goal
    pub fn effective_goal(&self) -> Option<Money> {
        self.goal_amount.filter(|goal| !goal.is_zero())
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)?;

        if let Some(goal) = self.goal_amount {
            if goal.is_negative() {
                return Err(CategoryValidationError::NegativeGoal);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CategoryValidationError::NameTooLong(len));
    }

    Ok(())
}

/// Validation errors for categories and groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeGoal,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::NegativeGoal => write!(f, "Goal amount cannot be negative"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_is_ungrouped() {
        let user = UserId::new();
        let category = Category::new(user, "Rent");

        assert_eq!(category.name, "Rent");
        assert_eq!(category.user_id, user);
        assert!(category.group_id.is_none());
        assert!(category.available.is_zero());
        assert!(!category.is_unallocated_funds);
    }

    #[test]
    fn test_zero_goal_clears() {
        let mut category = Category::new(UserId::new(), "Vacation");

        category.set_goal(Money::from_units(100));
        assert_eq!(category.effective_goal(), Some(Money::from_units(100)));

        category.set_goal(Money::ZERO);
        assert!(category.goal_amount.is_none());

        category.goal_amount = Some(Money::ZERO);
        assert!(category.effective_goal().is_none());
    }

    #[test]
    fn test_validation() {
        let user = UserId::new();
        let mut category = Category::new(user, "Valid");
        assert!(category.validate().is_ok());

        category.name = "   ".into();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        category.name = "Valid".into();
        category.goal_amount = Some(Money::from_cents(-1));
        assert_eq!(category.validate(), Err(CategoryValidationError::NegativeGoal));

        let group = CategoryGroup::new(user, "");
        assert_eq!(group.validate(), Err(CategoryValidationError::EmptyName));
    }

    #[test]
    fn test_unallocated_funds_category() {
        let category = Category::unallocated_funds(UserId::new());
        assert!(category.is_unallocated_funds);
        assert_eq!(category.name, UNALLOCATED_FUNDS_NAME);
    }

    #[test]
    fn test_serialization_tolerates_missing_optional_fields() {
        let user = UserId::new();
        let group = CategoryGroup::new(user, "Bills");
        let category = Category::new(user, "Electric").in_group(group.id);

        let json = serde_json::to_value(&category).unwrap();
        let back: Category = serde_json::from_value(json).unwrap();
        assert_eq!(back, category);

        let minimal = serde_json::json!({
            "id": CategoryId::new(),
            "user_id": user,
            "name": "Bare",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        });
        let bare: Category = serde_json::from_value(minimal).unwrap();
        assert!(bare.group_id.is_none());
        assert!(bare.goal_amount.is_none());
    }
}
