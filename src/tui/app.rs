//! Application state for the TUI
//!
//! `App` wraps the budget screen with the pieces only a terminal front end
//! needs: the selected line, the open form, and the channel worker threads
//! use to hand results back.

use std::sync::mpsc;
use std::thread;

use chrono::{Local, NaiveDate};

use crate::models::NewAssignment;
use crate::screen::{
    AllocationOutcome, BudgetScreen, DeletionOutcome, ListItem, Modal, PendingAllocation,
};
use crate::services::{BudgetApi, SharedApi};

use super::dialogs::{PromptState, PromptValue};
use super::event::{Event, RemoteEvent};

/// The current calendar day on this machine
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct App {
    pub screen: BudgetScreen,
    api: SharedApi,
    remote: mpsc::Sender<Event>,
    /// Index into the visible headers and rows
    pub selected: usize,
    /// Input state of the open modal
    pub prompt: Option<PromptState>,
    pub should_quit: bool,
}

impl App {
    pub fn new(screen: BudgetScreen, api: SharedApi, remote: mpsc::Sender<Event>) -> Self {
        Self {
            screen,
            api,
            remote,
            selected: 0,
            prompt: None,
            should_quit: false,
        }
    }

    /// Run a backend call on a worker thread and post its result
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&dyn BudgetApi) -> RemoteEvent + Send + 'static,
    {
        let api = self.api.clone();
        let remote = self.remote.clone();
        thread::spawn(move || {
            let event = job(api.as_ref());
            // The UI may already be gone
            let _ = remote.send(Event::Remote(event));
        });
    }

    // === Selection ===

    pub fn items(&self) -> Vec<ListItem> {
        self.screen.view().items()
    }

    pub fn selected_item(&self) -> Option<ListItem> {
        self.items().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let count = self.items().len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection on screen after the list shrank
    pub fn clamp_selection(&mut self) {
        let count = self.items().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    fn selected_category(&self) -> Option<crate::models::CategoryId> {
        match self.selected_item()? {
            ListItem::Row(id) => Some(id),
            ListItem::Header(_) => None,
        }
    }

    /// Open or close the selected group
    pub fn toggle_selected(&mut self) {
        if let Some(ListItem::Header(key)) = self.selected_item() {
            self.screen.toggle_group(key);
            self.clamp_selection();
        }
    }

    // === Allocation refresh ===

    /// Start a refresh if the screen asked for one
    pub fn dispatch_refresh(&mut self) {
        let Some(user_id) = self.screen.user_id() else {
            return;
        };
        if let Some(range) = self.screen.take_refresh() {
            tracing::debug!(range = %range, "refreshing allocations");
            self.spawn(move |api| RemoteEvent::Report {
                range,
                result: api.fetch_allocated_and_spent(user_id, range),
            });
        }
    }

    // === Quick actions ===

    pub fn fix_selected(&mut self, today: NaiveDate) {
        let Some(id) = self.selected_category() else {
            return;
        };
        if let Some(pending) = self.screen.fix(id, today) {
            self.submit_allocation(pending);
        }
    }

    pub fn fund_goal_selected(&mut self, today: NaiveDate) {
        let Some(id) = self.selected_category() else {
            return;
        };
        if let Some(pending) = self.screen.fund_goal(id, today) {
            self.submit_allocation(pending);
        }
    }

    fn submit_allocation(&self, pending: PendingAllocation) {
        let assignment = pending.assignment().clone();
        self.spawn(move |api| {
            let result = api.create_assignment(assignment);
            RemoteEvent::Allocation { pending, result }
        });
    }

    // === Deletion ===

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_category() {
            self.screen.request_delete(id);
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(user_id) = self.screen.user_id() else {
            return;
        };
        if let Some(pending) = self.screen.confirm_delete() {
            let category_id = pending.category_id;
            self.spawn(move |api| RemoteEvent::Deletion {
                pending,
                result: api.delete_category(user_id, category_id),
            });
        }
    }

    // === Forms ===

    fn open_prompt(&mut self) {
        self.prompt = self.screen.modal().map(PromptState::for_modal);
    }

    pub fn open_add_category(&mut self) {
        self.screen.open_add_category();
        self.open_prompt();
    }

    pub fn open_add_group(&mut self) {
        self.screen.open_add_group();
        self.open_prompt();
    }

    /// Assignment entry for the selected row
    pub fn open_assignment(&mut self) {
        if let Some(id) = self.selected_category() {
            if self.screen.select_category(id) {
                self.open_prompt();
            }
        }
    }

    /// Goal editor for the selected row
    pub fn open_category_info(&mut self) {
        if let Some(id) = self.selected_category() {
            if self.screen.open_category_info(id) {
                self.open_prompt();
            }
        }
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
        self.screen.close_modal();
    }

    /// Validate the open form and send it to the backend
    pub fn submit_prompt(&mut self, today: NaiveDate) {
        let (Some(modal), Some(user_id)) = (self.screen.modal().cloned(), self.screen.user_id())
        else {
            return;
        };
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        if prompt.saving {
            return;
        }

        let value = match prompt.parse(&modal) {
            Ok(value) => value,
            Err(message) => {
                prompt.error = Some(message);
                return;
            }
        };
        prompt.error = None;
        prompt.saving = true;

        match (modal, value) {
            (Modal::AddCategory, PromptValue::Name(name)) => self.spawn(move |api| {
                RemoteEvent::FormSaved(
                    api.create_category(user_id, &name)
                        .map(|category| format!("Created category '{}'", category.name)),
                )
            }),
            (Modal::AddGroup, PromptValue::Name(name)) => self.spawn(move |api| {
                RemoteEvent::FormSaved(
                    api.create_group(user_id, &name)
                        .map(|group| format!("Created group '{}'", group.name)),
                )
            }),
            (Modal::Assignment(category), PromptValue::Amount(amount)) => self.spawn(move |api| {
                let assignment = NewAssignment::new(user_id, category.id, amount, today);
                RemoteEvent::FormSaved(
                    api.create_assignment(assignment)
                        .map(|()| format!("Assigned {} to {}", amount, category.name)),
                )
            }),
            (Modal::CategoryInfo(category), PromptValue::Amount(goal)) => self.spawn(move |api| {
                RemoteEvent::FormSaved(api.set_category_goal(user_id, category.id, goal).map(
                    |updated| match updated.effective_goal() {
                        Some(goal) => format!("Goal for {} set to {}", updated.name, goal),
                        None => format!("Cleared goal for {}", updated.name),
                    },
                ))
            }),
            (modal, value) => {
                tracing::warn!(?modal, ?value, "form value does not match its modal");
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.saving = false;
                }
            }
        }
    }

    // === Remote results ===

    pub fn handle_remote(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::Snapshot(snapshot) => {
                self.screen.apply_snapshot(snapshot);
                self.clamp_selection();
            }
            RemoteEvent::Report { range, result } => match result {
                Ok(report) => {
                    self.screen.apply_report(&report);
                }
                Err(e) => self.screen.refresh_failed(range, &e),
            },
            RemoteEvent::Allocation { pending, result } => {
                if let AllocationOutcome::Committed { category_id, kind } =
                    self.screen.settle_allocation(pending, result)
                {
                    tracing::info!(category = %category_id, ?kind, "allocation committed");
                }
            }
            RemoteEvent::Deletion { pending, result } => {
                let name = pending.name.clone();
                if let DeletionOutcome::Deleted(_) = self.screen.finish_delete(pending, result) {
                    self.screen.set_notice(format!("Deleted category '{}'", name));
                    self.clamp_selection();
                }
            }
            RemoteEvent::FormSaved(Ok(message)) => {
                self.prompt = None;
                self.screen.modal_submitted();
                self.screen.set_notice(message);
            }
            RemoteEvent::FormSaved(Err(e)) => match self.prompt.as_mut() {
                Some(prompt) => {
                    prompt.saving = false;
                    prompt.error = Some(e.to_string());
                }
                None => self.screen.set_notice(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppPaths, Settings};
    use crate::models::{Money, UserId};
    use crate::screen::GroupKey;
    use crate::services::{AssignmentService, CategoryFeed, LocalBackend, Session};
    use crate::storage::{initialize_storage, Storage};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Harness {
        _temp_dir: TempDir,
        backend: Arc<LocalBackend>,
        user: UserId,
        app: App,
        events: mpsc::Receiver<Event>,
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn harness() -> Harness {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        let user = initialize_storage(&paths, &mut settings).unwrap();
        let storage = Storage::open(paths).unwrap();
        let backend = Arc::new(LocalBackend::new(Arc::new(storage), &settings));

        let (sender, events) = mpsc::channel();
        let screen = BudgetScreen::new(Session::signed_in(user), day());
        let app = App::new(screen, backend.clone(), sender);

        Harness {
            _temp_dir: temp_dir,
            backend,
            user,
            app,
            events,
        }
    }

    impl Harness {
        /// Wait for one worker result and apply it
        fn pump(&mut self) {
            match self.events.recv_timeout(Duration::from_secs(5)).unwrap() {
                Event::Remote(event) => self.app.handle_remote(event),
                other => panic!("unexpected event {:?}", other),
            }
        }

        fn sync_categories(&mut self) {
            let snapshot = self.backend.snapshot(self.user).unwrap();
            self.app.handle_remote(RemoteEvent::Snapshot(snapshot));
        }

        fn select_row(&mut self, name: &str) {
            let id = self
                .backend
                .snapshot(self.user)
                .unwrap()
                .categories
                .into_iter()
                .find(|c| c.name == name)
                .unwrap()
                .id;
            self.app.selected = self
                .app
                .items()
                .iter()
                .position(|item| *item == ListItem::Row(id))
                .unwrap();
        }
    }

    #[test]
    fn test_refresh_runs_once_and_clears_loading() {
        let mut h = harness();
        assert!(h.app.screen.is_loading());

        h.app.dispatch_refresh();
        h.pump();
        assert!(!h.app.screen.is_loading());

        h.app.dispatch_refresh();
        assert!(h.events.try_recv().is_err());
    }

    #[test]
    fn test_add_category_form_round_trip() {
        let mut h = harness();
        h.app.open_add_category();
        assert!(h.app.prompt.is_some());

        h.app.submit_prompt(day());
        assert_eq!(h.app.prompt.as_ref().unwrap().error.as_deref(), Some("Name is required"));

        for c in "Groceries".chars() {
            h.app.prompt.as_mut().unwrap().input.insert(c);
        }
        h.app.submit_prompt(day());
        assert!(h.app.prompt.as_ref().unwrap().saving);

        h.pump();
        assert!(h.app.prompt.is_none());
        assert!(h.app.screen.modal().is_none());
        assert_eq!(h.app.screen.notice(), Some("Created category 'Groceries'"));

        // The submission asks for fresh allocations
        h.app.dispatch_refresh();
        h.pump();
        assert!(!h.app.screen.is_loading());
    }

    #[test]
    fn test_duplicate_group_keeps_form_open() {
        let mut h = harness();
        h.backend.create_group(h.user, "Bills").unwrap();

        h.app.open_add_group();
        for c in "Bills".chars() {
            h.app.prompt.as_mut().unwrap().input.insert(c);
        }
        h.app.submit_prompt(day());
        h.pump();

        let prompt = h.app.prompt.as_ref().unwrap();
        assert!(!prompt.saving);
        assert!(prompt.error.as_deref().unwrap().contains("already exists"));
    }

    #[test]
    fn test_fix_covers_overspending() {
        let mut h = harness();
        let category = h.backend.create_category(h.user, "Dining").unwrap();
        AssignmentService::new(h.backend.storage())
            .record_transaction(h.user, category.id, Money::from_cents(-2000), day(), "Cafe", "")
            .unwrap();
        h.sync_categories();
        h.app.dispatch_refresh();
        h.pump();

        h.select_row("Dining");
        h.app.fix_selected(day());
        assert!(h.app.screen.is_fixing(category.id));
        assert_eq!(h.app.screen.amounts().allocated(category.id), Money::from_cents(2000));

        h.pump();
        assert!(!h.app.screen.is_fixing(category.id));
        assert_eq!(h.app.screen.amounts().allocated(category.id), Money::from_cents(2000));
        assert_eq!(h.app.screen.notice(), None);
    }

    #[test]
    fn test_delete_flow_reports_backend_refusal() {
        let mut h = harness();
        let category = h.backend.create_category(h.user, "Gym").unwrap();
        AssignmentService::new(h.backend.storage())
            .record_transaction(h.user, category.id, Money::from_cents(-500), day(), "", "")
            .unwrap();
        h.sync_categories();

        h.select_row("Gym");
        h.app.delete_selected();
        assert!(h.app.screen.deletion().is_active());

        h.app.confirm_delete();
        h.pump();

        let dialog = h.app.screen.deletion().dialog().unwrap();
        assert!(!dialog.confirmable);
        assert_eq!(dialog.message, "Cannot delete category with associated transactions");
    }

    #[test]
    fn test_delete_flow_removes_empty_category() {
        let mut h = harness();
        h.backend.create_category(h.user, "Old").unwrap();
        h.sync_categories();

        h.select_row("Old");
        h.app.delete_selected();
        h.app.confirm_delete();
        h.pump();

        assert!(!h.app.screen.deletion().is_active());
        assert_eq!(h.app.screen.notice(), Some("Deleted category 'Old'"));
        assert!(h.backend.snapshot(h.user).unwrap().categories.iter().all(|c| c.name != "Old"));
    }

    #[test]
    fn test_toggle_collapses_ungrouped() {
        let mut h = harness();
        h.backend.create_category(h.user, "Misc").unwrap();
        h.sync_categories();

        h.app.selected = h
            .app
            .items()
            .iter()
            .position(|item| *item == ListItem::Header(GroupKey::Ungrouped))
            .unwrap();
        let before = h.app.items().len();
        h.app.toggle_selected();

        assert!(!h.app.screen.is_expanded(GroupKey::Ungrouped));
        assert!(h.app.items().len() < before);
    }
}
