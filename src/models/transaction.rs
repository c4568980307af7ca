//! Transaction model
//!
//! Transactions are only read by the allocation report: negative amounts are
//! spending against a category, positive amounts are refunds (or income when
//! booked on the unallocated-funds category).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, TransactionId, UserId};
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub user_id: UserId,

    pub category_id: CategoryId,

    /// Negative for outflow, positive for inflow
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default)]
    pub payee: String,

    #[serde(default)]
    pub memo: String,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(user_id: UserId, category_id: CategoryId, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            category_id,
            amount,
            date,
            payee: String::new(),
            memo: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = payee.into();
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Contribution of this transaction to a category's spent total
    ///
    /// Spending counts up, refunds count down.
    pub fn spent_contribution(&self) -> Money {
        -self.amount
    }
}
