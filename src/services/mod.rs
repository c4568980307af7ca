//! Service layer
//!
//! Business rules on top of storage, and the contracts the budget screen
//! talks to. `LocalBackend` ties the two together.

pub mod allocation;
pub mod api;
pub mod assignment;
pub mod category;
pub mod local;

pub use allocation::{AllocationCache, AllocationService};
pub use api::{
    BudgetApi, CategoriesSnapshot, CategoryFeed, FeedListener, Session, SharedApi, SubscriptionId,
};
pub use assignment::AssignmentService;
pub use category::CategoryService;
pub use local::LocalBackend;
