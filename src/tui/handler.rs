//! Key handling
//!
//! Input goes to the topmost layer: the delete dialog, then an open form,
//! then the accordion itself.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::screen::{DeletionState, ListItem};

use super::app::{today, App};
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Remote(remote) => app.handle_remote(remote),
        Event::Resize(_, _) | Event::Tick => {}
    }
    app.dispatch_refresh();
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.screen.deletion().is_active() {
        handle_deletion_key(app, key);
    } else if app.prompt.is_some() {
        handle_prompt_key(app, key);
    } else {
        handle_list_key(app, key);
    }
}

fn handle_deletion_key(app: &mut App, key: KeyEvent) {
    match app.screen.deletion().state() {
        DeletionState::Confirming(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.screen.cancel_delete(),
            _ => {}
        },
        DeletionState::Failed(_) => app.screen.dismiss_delete_error(),
        // Deleting ignores input until the backend answers
        DeletionState::Deleting(_) | DeletionState::Idle => {}
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    let saving = app.prompt.as_ref().is_some_and(|prompt| prompt.saving);
    if saving {
        return;
    }

    match key.code {
        KeyCode::Esc => app.close_prompt(),
        KeyCode::Enter => app.submit_prompt(today()),
        code => {
            let Some(prompt) = app.prompt.as_mut() else {
                return;
            };
            match code {
                KeyCode::Char(c) => prompt.input.insert(c),
                KeyCode::Backspace => prompt.input.backspace(),
                KeyCode::Delete => prompt.input.delete(),
                KeyCode::Left => prompt.input.move_left(),
                KeyCode::Right => prompt.input.move_right(),
                KeyCode::Home => prompt.input.move_start(),
                KeyCode::End => prompt.input.move_end(),
                _ => return,
            }
            prompt.error = None;
        }
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    app.screen.clear_notice();

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),

        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Enter => match app.selected_item() {
            Some(ListItem::Header(_)) => app.toggle_selected(),
            Some(ListItem::Row(_)) => app.open_assignment(),
            None => {}
        },

        KeyCode::Char('f') => app.fix_selected(today()),
        KeyCode::Char('g') => app.fund_goal_selected(today()),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('i') => app.open_category_info(),

        KeyCode::Char('a') => app.open_add_category(),
        KeyCode::Char('A') => app.open_add_group(),

        KeyCode::Char('[') | KeyCode::Left => app.screen.previous_period(),
        KeyCode::Char(']') | KeyCode::Right => app.screen.next_period(),
        KeyCode::Char('p') => app.screen.cycle_period_kind(),
        KeyCode::Char('r') => app.screen.request_refresh(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BudgetError, BudgetResult};
    use crate::models::{
        AllocationReport, Category, CategoryGroup, CategoryGroupId, CategoryId, DateRange, Money,
        NewAssignment, UserId,
    };
    use crate::screen::{BudgetScreen, Modal};
    use crate::services::{BudgetApi, CategoriesSnapshot, Session};
    use chrono::NaiveDate;
    use std::sync::{mpsc, Arc};

    /// Backend that refuses everything; key tests never wait on it
    struct Offline;

    impl BudgetApi for Offline {
        fn delete_category(&self, _: UserId, _: CategoryId) -> BudgetResult<()> {
            Err(BudgetError::Storage("offline".into()))
        }
        fn create_assignment(&self, _: NewAssignment) -> BudgetResult<()> {
            Err(BudgetError::Storage("offline".into()))
        }
        fn fetch_allocated_and_spent(
            &self,
            _: UserId,
            _: DateRange,
        ) -> BudgetResult<AllocationReport> {
            Err(BudgetError::Storage("offline".into()))
        }
        fn create_category(&self, _: UserId, _: &str) -> BudgetResult<Category> {
            Err(BudgetError::Storage("offline".into()))
        }
        fn create_group(&self, _: UserId, _: &str) -> BudgetResult<CategoryGroup> {
            Err(BudgetError::Storage("offline".into()))
        }
        fn rename_category(&self, _: UserId, _: CategoryId, _: &str) -> BudgetResult<Category> {
            Err(BudgetError::Storage("offline".into()))
        }
        fn set_category_goal(&self, _: UserId, _: CategoryId, _: Money) -> BudgetResult<Category> {
            Err(BudgetError::Storage("offline".into()))
        }
        fn set_category_group(
            &self,
            _: UserId,
            _: CategoryId,
            _: Option<CategoryGroupId>,
        ) -> BudgetResult<Category> {
            Err(BudgetError::Storage("offline".into()))
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app_with(categories: Vec<Category>) -> App {
        let user = categories.first().map_or_else(UserId::new, |c| c.user_id);
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut screen = BudgetScreen::new(Session::signed_in(user), today);
        screen.apply_snapshot(CategoriesSnapshot {
            categories,
            groups: Vec::new(),
        });
        let (sender, _receiver) = mpsc::channel();
        App::new(screen, Arc::new(Offline), sender)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(Vec::new());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = app_with(Vec::new());
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_navigation_and_forms() {
        let user = UserId::new();
        let mut app = app_with(vec![Category::new(user, "Rent"), Category::new(user, "Food")]);

        // Header, then two rows
        assert_eq!(app.items().len(), 3);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, 2);

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.screen.modal(), Some(Modal::Assignment(_))));

        // Typing 'q' inside a form edits it rather than quitting
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.prompt.as_ref().unwrap().input.value(), "q");

        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
        assert!(app.screen.modal().is_none());

        press(&mut app, KeyCode::Char('A'));
        assert_eq!(app.screen.modal(), Some(&Modal::AddGroup));
    }

    #[test]
    fn test_delete_dialog_takes_focus() {
        let user = UserId::new();
        let mut app = app_with(vec![Category::new(user, "Rent")]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.screen.deletion().is_active());

        // List keys are swallowed by the dialog
        press(&mut app, KeyCode::Char('a'));
        assert!(app.screen.modal().is_none());

        press(&mut app, KeyCode::Char('n'));
        assert!(!app.screen.deletion().is_active());
    }

    #[test]
    fn test_period_keys_request_refresh() {
        let mut app = app_with(Vec::new());
        let march = app.screen.range();
        assert!(app.screen.take_refresh().is_some());

        press(&mut app, KeyCode::Char(']'));
        assert!(app.screen.range().start > march.end);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.screen.range(), march);
        assert_eq!(app.screen.take_refresh(), Some(march));
    }
}
