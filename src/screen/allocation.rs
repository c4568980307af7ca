//! Optimistic allocation adjustments
//!
//! "Fix" covers a negative available balance and "goal" tops a category up
//! to its savings goal. Both show the new allocated amount immediately,
//! submit an assignment, and put the old amount back if the write fails.
//!
//! The adjuster is sans-IO: `begin_*` mutates local state and hands back a
//! [`PendingAllocation`] describing the write; the caller performs it and
//! passes the result to [`AllocationAdjuster::settle`].

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AllocationReport, Category, CategoryId, Money, NewAssignment, PeriodAmounts, UserId,
};

/// Allocated and spent per category for the displayed range
///
/// Categories without an entry read as zero allocated and zero spent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationMap {
    amounts: HashMap<CategoryId, PeriodAmounts>,
}

impl AllocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_report(report: &AllocationReport) -> Self {
        Self {
            amounts: report
                .allocated_and_spent
                .iter()
                .map(|row| (row.category_id, row.amounts))
                .collect(),
        }
    }

    pub fn get(&self, id: CategoryId) -> PeriodAmounts {
        self.amounts.get(&id).copied().unwrap_or_default()
    }

    pub fn allocated(&self, id: CategoryId) -> Money {
        self.get(id).allocated
    }

    pub fn spent(&self, id: CategoryId) -> Money {
        self.get(id).spent
    }

    pub fn insert(&mut self, id: CategoryId, amounts: PeriodAmounts) {
        self.amounts.insert(id, amounts);
    }

    /// Overwrite the allocated amount, leaving spent alone
    pub fn set_allocated(&mut self, id: CategoryId, allocated: Money) {
        self.amounts.entry(id).or_default().allocated = allocated;
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Identifies one in-flight fix so a stale settle cannot release a newer one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    Fix,
    Goal,
}

/// Amount a fix would allocate, if the category qualifies
///
/// Requires a negative available balance and no fix already in flight.
pub fn fix_increment(category: &Category, in_flight: bool) -> Option<Money> {
    if in_flight || !category.available.is_negative() {
        return None;
    }
    Some(category.available.abs())
}

/// Amount still missing to reach the goal, if any
pub fn goal_shortfall(category: &Category, allocated: Money) -> Option<Money> {
    let goal = category.effective_goal()?;
    let shortfall = goal - allocated;
    shortfall.is_positive().then_some(shortfall)
}

/// A speculative change waiting for its backing write
#[must_use = "a pending allocation must be settled or the category stays locked"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAllocation {
    kind: AllocationKind,
    token: Option<OperationToken>,
    previous_allocated: Money,
    assignment: NewAssignment,
}

impl PendingAllocation {
    pub fn kind(&self) -> AllocationKind {
        self.kind
    }

    pub fn category_id(&self) -> CategoryId {
        self.assignment.category_id
    }

    /// Allocated amount captured before the speculative apply
    pub fn previous_allocated(&self) -> Money {
        self.previous_allocated
    }

    /// The assignment to submit
    pub fn assignment(&self) -> &NewAssignment {
        &self.assignment
    }
}

/// How a pending allocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    Committed {
        category_id: CategoryId,
        kind: AllocationKind,
    },
    RolledBack {
        category_id: CategoryId,
        kind: AllocationKind,
        restored_allocated: Money,
        error: BudgetError,
    },
}

impl AllocationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Owns the allocation map and the in-flight fix guard
#[derive(Debug, Default)]
pub struct AllocationAdjuster {
    amounts: AllocationMap,
    in_flight: HashMap<CategoryId, OperationToken>,
    next_token: u64,
}

impl AllocationAdjuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amounts(&self) -> &AllocationMap {
        &self.amounts
    }

    /// Replace local state with backend truth
    pub fn apply_report(&mut self, report: &AllocationReport) {
        self.amounts = AllocationMap::from_report(report);
    }

    pub fn is_fixing(&self, id: CategoryId) -> bool {
        self.in_flight.contains_key(&id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Start covering a negative available balance
    pub fn begin_fix(
        &mut self,
        category: &Category,
        user_id: UserId,
        today: NaiveDate,
    ) -> Option<PendingAllocation> {
        let increment = fix_increment(category, self.is_fixing(category.id))?;

        self.next_token += 1;
        let token = OperationToken(self.next_token);
        self.in_flight.insert(category.id, token);

        Some(self.apply(AllocationKind::Fix, Some(token), category, user_id, increment, today))
    }

    /// Start topping a category up to its goal
    pub fn begin_goal(
        &mut self,
        category: &Category,
        user_id: UserId,
        today: NaiveDate,
    ) -> Option<PendingAllocation> {
        let shortfall = goal_shortfall(category, self.amounts.allocated(category.id))?;
        Some(self.apply(AllocationKind::Goal, None, category, user_id, shortfall, today))
    }

    fn apply(
        &mut self,
        kind: AllocationKind,
        token: Option<OperationToken>,
        category: &Category,
        user_id: UserId,
        increment: Money,
        today: NaiveDate,
    ) -> PendingAllocation {
        let previous_allocated = self.amounts.allocated(category.id);
        self.amounts
            .set_allocated(category.id, previous_allocated + increment);

        tracing::debug!(
            category = %category.id,
            ?kind,
            previous = %previous_allocated,
            increment = %increment,
            "applied optimistic allocation"
        );

        PendingAllocation {
            kind,
            token,
            previous_allocated,
            assignment: NewAssignment::new(user_id, category.id, increment, today),
        }
    }

    /// Commit or revert a pending allocation and release its guard
    ///
    /// On failure allocated goes back to the captured snapshot, whatever has
    /// happened to the entry since; spent keeps its current value.
    pub fn settle(
        &mut self,
        pending: PendingAllocation,
        result: BudgetResult<()>,
    ) -> AllocationOutcome {
        let category_id = pending.category_id();

        if let Some(token) = pending.token {
            if self.in_flight.get(&category_id) == Some(&token) {
                self.in_flight.remove(&category_id);
            }
        }

        match result {
            Ok(()) => AllocationOutcome::Committed {
                category_id,
                kind: pending.kind,
            },
            Err(error) => {
                self.amounts
                    .set_allocated(category_id, pending.previous_allocated);
                tracing::warn!(
                    category = %category_id,
                    kind = ?pending.kind,
                    restored = %pending.previous_allocated,
                    error = %error,
                    "rolled back optimistic allocation"
                );
                AllocationOutcome::RolledBack {
                    category_id,
                    kind: pending.kind,
                    restored_allocated: pending.previous_allocated,
                    error,
                }
            }
        }
    }
}
