//! Two-step category deletion
//!
//! Idle -> Confirming -> Deleting -> Idle on success, or -> Failed with a
//! message dialog on error. Cancelling or dismissing returns to Idle without
//! touching anything else.

use crate::error::{BudgetError, BudgetResult, GENERIC_DELETE_FAILURE};
use crate::models::{Category, CategoryId};

pub const CONFIRM_TITLE: &str = "Delete Category";
pub const FAILURE_TITLE: &str = "Cannot Delete Category";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeletionState {
    #[default]
    Idle,
    Confirming(Category),
    Deleting(Category),
    Failed(String),
}

/// A confirmed delete waiting for the backend
#[must_use = "a pending deletion must be finished to close the dialog"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// Deleted; allocations should be refreshed
    Deleted(CategoryId),
    Failed(String),
}

/// What the dialog layer should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionDialog {
    pub title: &'static str,
    pub message: String,
    /// Confirm/cancel buttons rather than a single dismiss
    pub confirmable: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionFlow {
    state: DeletionState,
}

impl DeletionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeletionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DeletionState::Idle)
    }

    /// Arm the pending slot; ignored without a signed-in user or while
    /// another delete is underway
    pub fn request(&mut self, category: &Category, signed_in: bool) -> bool {
        if !signed_in || matches!(self.state, DeletionState::Deleting(_)) {
            return false;
        }
        self.state = DeletionState::Confirming(category.clone());
        true
    }

    /// Take the armed category for the caller to delete remotely
    pub fn begin_confirm(&mut self) -> Option<PendingDeletion> {
        let DeletionState::Confirming(category) = &self.state else {
            return None;
        };
        let pending = PendingDeletion {
            category_id: category.id,
            name: category.name.clone(),
        };
        self.state = DeletionState::Deleting(category.clone());
        Some(pending)
    }

    pub fn finish(
        &mut self,
        pending: PendingDeletion,
        result: BudgetResult<()>,
    ) -> DeletionOutcome {
        match result {
            Ok(()) => {
                self.state = DeletionState::Idle;
                tracing::info!(category = %pending.category_id, "category deleted");
                DeletionOutcome::Deleted(pending.category_id)
            }
            Err(error) => {
                let message = failure_message(&error);
                tracing::warn!(
                    category = %pending.category_id,
                    error = %error,
                    "category delete failed"
                );
                self.state = DeletionState::Failed(message.clone());
                DeletionOutcome::Failed(message)
            }
        }
    }

    /// Close the confirmation without deleting
    pub fn cancel(&mut self) {
        if matches!(self.state, DeletionState::Confirming(_)) {
            self.state = DeletionState::Idle;
        }
    }

    pub fn dismiss_error(&mut self) {
        if matches!(self.state, DeletionState::Failed(_)) {
            self.state = DeletionState::Idle;
        }
    }

    pub fn dialog(&self) -> Option<DeletionDialog> {
        match &self.state {
            DeletionState::Idle => None,
            DeletionState::Confirming(category) | DeletionState::Deleting(category) => {
                Some(DeletionDialog {
                    title: CONFIRM_TITLE,
                    message: confirm_message(&category.name),
                    confirmable: true,
                    busy: matches!(self.state, DeletionState::Deleting(_)),
                })
            }
            DeletionState::Failed(message) => Some(DeletionDialog {
                title: FAILURE_TITLE,
                message: message.clone(),
                confirmable: false,
                busy: false,
            }),
        }
    }
}

pub fn confirm_message(name: &str) -> String {
    format!("Are you sure you want to delete \"{}\"?", name)
}

/// The backend's own words when it gave any, the generic text otherwise
pub fn failure_message(error: &BudgetError) -> String {
    error
        .user_message()
        .unwrap_or_else(|| GENERIC_DELETE_FAILURE.to_string())
}
