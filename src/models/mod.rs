//! Core data models
//!
//! Categories and groups as cached by the screen, the allocation events it
//! submits, the transactions the backend aggregates, and the date ranges
//! everything is scoped to.

pub mod allocation;
pub mod assignment;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use allocation::{AllocationReport, CategoryAmounts, PeriodAmounts};
pub use assignment::{Assignment, NewAssignment};
pub use category::{Category, CategoryGroup, CategoryValidationError, UNALLOCATED_FUNDS_NAME};
pub use ids::{AssignmentId, CategoryGroupId, CategoryId, TransactionId, UserId};
pub use money::Money;
pub use period::{DateRange, PeriodKind};
pub use transaction::Transaction;
