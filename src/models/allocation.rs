//! Allocated and spent amounts for a date range
//!
//! `AllocationReport` is what a full refresh returns from the backend. The
//! screen folds it into its own map, which it then adjusts optimistically.

use serde::{Deserialize, Serialize};

use super::ids::CategoryId;
use super::money::Money;
use super::period::DateRange;

/// Allocated and spent totals of one category for the active period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAmounts {
    pub allocated: Money,
    pub spent: Money,
}

impl PeriodAmounts {
    pub fn new(allocated: Money, spent: Money) -> Self {
        Self { allocated, spent }
    }
}

/// One row of an allocation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmounts {
    pub category_id: CategoryId,
    #[serde(flatten)]
    pub amounts: PeriodAmounts,
}

/// Backend truth for a range: per-category amounts plus income received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub range: DateRange,
    pub allocated_and_spent: Vec<CategoryAmounts>,
    pub unallocated_income: Money,
}

impl AllocationReport {
    pub fn empty(range: DateRange) -> Self {
        Self {
            range,
            allocated_and_spent: Vec::new(),
            unallocated_income: Money::ZERO,
        }
    }

    pub fn amounts_for(&self, category_id: CategoryId) -> Option<PeriodAmounts> {
        self.allocated_and_spent
            .iter()
            .find(|row| row.category_id == category_id)
            .map(|row| row.amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_report_row_serializes_flat() {
        let id = CategoryId::new();
        let row = CategoryAmounts {
            category_id: id,
            amounts: PeriodAmounts::new(Money::from_cents(500), Money::from_cents(120)),
        };

        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["allocated"], 500);
        assert_eq!(json["spent"], 120);

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        );
        let mut report = AllocationReport::empty(range);
        report.allocated_and_spent.push(row);
        assert_eq!(report.amounts_for(id), Some(row.amounts));
        assert_eq!(report.amounts_for(CategoryId::new()), None);
    }
}
