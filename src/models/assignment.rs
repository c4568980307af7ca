//! Assignment model
//!
//! An assignment moves money from unallocated funds into a category on a
//! given date. The screen sends a `NewAssignment` and forgets it; the backend
//! keeps the stored `Assignment` so allocated totals can be recomputed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssignmentId, CategoryId, UserId};
use super::money::Money;

/// An allocation event as submitted by the screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub amount: Money,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub date: NaiveDate,
}

impl NewAssignment {
    pub fn new(user_id: UserId, category_id: CategoryId, amount: Money, date: NaiveDate) -> Self {
        Self {
            amount,
            user_id,
            category_id,
            date,
        }
    }
}

/// A stored allocation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub amount: Money,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<NewAssignment> for Assignment {
    fn from(new: NewAssignment) -> Self {
        Self {
            id: AssignmentId::new(),
            amount: new.amount,
            user_id: new.user_id,
            category_id: new.category_id,
            date: new.date,
            created_at: Utc::now(),
        }
    }
}
