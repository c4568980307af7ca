//! Header view model
//!
//! Pure display data: the period controls, the two "add" actions and the
//! unallocated-funds summary. Nothing here performs I/O.

use crate::models::{Category, DateRange, Money, PeriodKind};

pub const ADD_CATEGORY_LABEL: &str = "Add Category";
pub const ADD_GROUP_LABEL: &str = "Add Category Group";
pub const INCOME_LABEL: &str = "Income This Period:";
pub const LOADING_LABEL: &str = "Loading...";

/// Unallocated-funds block, present only when the bucket exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnallocatedSummary {
    pub name: String,
    pub available: Money,
    /// `None` while the allocation report is loading
    pub income: Option<Money>,
}

impl UnallocatedSummary {
    pub fn income_text(&self, currency_symbol: &str) -> String {
        self.income.map_or_else(
            || LOADING_LABEL.to_string(),
            |income| income.format_with_symbol(currency_symbol),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderModel {
    pub range: DateRange,
    pub period_kind: PeriodKind,
    pub add_category_label: &'static str,
    pub add_group_label: &'static str,
    pub unallocated: Option<UnallocatedSummary>,
}

impl HeaderModel {
    pub fn new(
        range: DateRange,
        period_kind: PeriodKind,
        unallocated_funds: Option<&Category>,
        income: Money,
        loading: bool,
    ) -> Self {
        Self {
            range,
            period_kind,
            add_category_label: ADD_CATEGORY_LABEL,
            add_group_label: ADD_GROUP_LABEL,
            unallocated: unallocated_funds.map(|bucket| UnallocatedSummary {
                name: bucket.name.clone(),
                available: bucket.available,
                income: (!loading).then_some(income),
            }),
        }
    }

    /// "Monthly: 2025-01-01 to 2025-01-31"
    pub fn range_text(&self) -> String {
        format!("{}: {}", self.period_kind, self.range)
    }
}
