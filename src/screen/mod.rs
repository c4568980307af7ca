//! Budget screen state
//!
//! Everything here is plain data driven by method calls; no I/O happens in
//! this module. Front ends render [`ScreenView`] and execute the pending
//! operations the screen hands out.

pub mod allocation;
pub mod deletion;
pub mod grouping;
pub mod header;
pub mod state;

pub use allocation::{
    AllocationAdjuster, AllocationKind, AllocationMap, AllocationOutcome, OperationToken,
    PendingAllocation,
};
pub use deletion::{DeletionDialog, DeletionFlow, DeletionOutcome, DeletionState, PendingDeletion};
pub use grouping::{CategoryRow, ExpandedGroups, GroupKey, GroupTotals, GroupedCategories, Section};
pub use header::{HeaderModel, UnallocatedSummary};
pub use state::{BudgetScreen, ListItem, Modal, ScreenView};
