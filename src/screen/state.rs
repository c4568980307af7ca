//! The budget screen
//!
//! `BudgetScreen` owns every piece of view state and is mutated only from
//! the UI thread. Remote work is described by the values its methods return
//! (`PendingAllocation`, `PendingDeletion`, a range from `take_refresh`);
//! the caller runs it and feeds the result back in.

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AllocationReport, Category, CategoryGroup, CategoryId, DateRange, Money, PeriodKind, UserId,
};
use crate::services::{CategoriesSnapshot, Session};

use super::allocation::{AllocationAdjuster, AllocationMap, AllocationOutcome, PendingAllocation};
use super::deletion::{DeletionDialog, DeletionFlow, DeletionOutcome, PendingDeletion};
use super::grouping::{
    build_sections, group_categories, ExpandedGroups, GroupKey, GroupedCategories, Section,
    SectionContext,
};
use super::header::HeaderModel;

/// The simple forms the screen can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    AddCategory,
    AddGroup,
    /// Assignment entry for a category
    Assignment(Category),
    /// Name, goal and group of a category
    CategoryInfo(Category),
}

/// One selectable line of the accordion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItem {
    Header(GroupKey),
    Row(CategoryId),
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub header: HeaderModel,
    pub sections: Vec<Section>,
    pub deletion: Option<DeletionDialog>,
    pub currency_symbol: String,
}

impl ScreenView {
    /// Format an amount with the user's currency symbol
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Headers and visible rows in display order
    pub fn items(&self) -> Vec<ListItem> {
        self.sections
            .iter()
            .flat_map(|section| {
                std::iter::once(ListItem::Header(section.key))
                    .chain(section.rows.iter().map(|row| ListItem::Row(row.category_id)))
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct BudgetScreen {
    session: Session,
    range: DateRange,
    period_kind: PeriodKind,
    categories: Vec<Category>,
    groups: Vec<CategoryGroup>,
    groups_loaded: bool,
    grouped: GroupedCategories,
    expanded: ExpandedGroups,
    adjuster: AllocationAdjuster,
    unallocated_income: Money,
    allocation_loading: bool,
    refresh_requested: bool,
    modal: Option<Modal>,
    deletion: DeletionFlow,
    notice: Option<String>,
}

impl BudgetScreen {
    /// A screen showing the preferred period that contains `today`
    pub fn new(session: Session, today: NaiveDate) -> Self {
        let period_kind = session.period_kind;
        let range = DateRange::containing(period_kind, today, session.week_start);

        Self {
            session,
            range,
            period_kind,
            categories: Vec::new(),
            groups: Vec::new(),
            groups_loaded: false,
            grouped: GroupedCategories::default(),
            expanded: ExpandedGroups::default(),
            adjuster: AllocationAdjuster::new(),
            unallocated_income: Money::ZERO,
            allocation_loading: true,
            refresh_requested: true,
            modal: None,
            deletion: DeletionFlow::new(),
            notice: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.session.user_id
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn period_kind(&self) -> PeriodKind {
        self.period_kind
    }

    pub fn amounts(&self) -> &AllocationMap {
        self.adjuster.amounts()
    }

    pub fn is_loading(&self) -> bool {
        self.allocation_loading
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn grouped(&self) -> &GroupedCategories {
        &self.grouped
    }

    pub fn is_expanded(&self, key: GroupKey) -> bool {
        self.expanded.is_expanded(key)
    }

    // === Feed ===

    /// New category list from the feed
    pub fn apply_categories(&mut self, categories: Vec<Category>) {
        self.grouped = group_categories(&categories);
        self.categories = categories;
    }

    /// New group list from the feed; every section opens again
    pub fn apply_groups(&mut self, groups: Vec<CategoryGroup>) {
        self.expanded.reset(&groups);
        self.groups = groups;
        self.groups_loaded = true;
    }

    /// Snapshot pushed after any write; the accordion only resets when the
    /// set of groups actually changed
    pub fn apply_snapshot(&mut self, snapshot: CategoriesSnapshot) {
        self.apply_categories(snapshot.categories);
        if self.groups_loaded && same_group_ids(&self.groups, &snapshot.groups) {
            self.groups = snapshot.groups;
        } else {
            self.apply_groups(snapshot.groups);
        }
    }

    // === Allocation refresh ===

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Range to fetch, if a refresh is due
    pub fn take_refresh(&mut self) -> Option<DateRange> {
        if !std::mem::take(&mut self.refresh_requested) {
            return None;
        }
        self.allocation_loading = true;
        Some(self.range)
    }

    /// Install backend truth; reports for a range no longer shown are dropped
    pub fn apply_report(&mut self, report: &AllocationReport) -> bool {
        if report.range != self.range {
            tracing::debug!(
                report = %report.range,
                current = %self.range,
                "dropped stale allocation report"
            );
            return false;
        }
        self.adjuster.apply_report(report);
        self.unallocated_income = report.unallocated_income;
        self.allocation_loading = false;
        true
    }

    pub fn refresh_failed(&mut self, range: DateRange, error: &BudgetError) {
        if range != self.range {
            return;
        }
        tracing::warn!(error = %error, "allocation refresh failed");
        self.allocation_loading = false;
        self.notice = Some(format!("Could not load allocations: {}", error));
    }

    // === Period navigation ===

    pub fn previous_period(&mut self) {
        self.set_range(self.range.previous(self.period_kind));
    }

    pub fn next_period(&mut self) {
        self.set_range(self.range.next(self.period_kind));
    }

    /// Switch weekly -> bi-weekly -> monthly, anchored on the current start
    pub fn cycle_period_kind(&mut self) {
        self.period_kind = self.period_kind.cycle();
        self.set_range(self.range.with_kind(self.period_kind, self.session.week_start));
    }

    fn set_range(&mut self, range: DateRange) {
        self.range = range;
        self.request_refresh();
    }

    // === Accordion ===

    pub fn toggle_group(&mut self, key: GroupKey) -> bool {
        self.expanded.toggle(key)
    }

    // === Optimistic allocation ===

    /// Cover an overspent category; unavailable while allocations load
    pub fn fix(
        &mut self,
        category_id: CategoryId,
        today: NaiveDate,
    ) -> Option<PendingAllocation> {
        if self.allocation_loading {
            return None;
        }
        let user_id = self.session.user_id?;
        let category = self.categories.iter().find(|c| c.id == category_id)?;
        self.adjuster.begin_fix(category, user_id, today)
    }

    pub fn fund_goal(
        &mut self,
        category_id: CategoryId,
        today: NaiveDate,
    ) -> Option<PendingAllocation> {
        if self.allocation_loading {
            return None;
        }
        let user_id = self.session.user_id?;
        let category = self.categories.iter().find(|c| c.id == category_id)?;
        self.adjuster.begin_goal(category, user_id, today)
    }

    pub fn is_fixing(&self, category_id: CategoryId) -> bool {
        self.adjuster.is_fixing(category_id)
    }

    pub fn settle_allocation(
        &mut self,
        pending: PendingAllocation,
        result: BudgetResult<()>,
    ) -> AllocationOutcome {
        let outcome = self.adjuster.settle(pending, result);
        if let AllocationOutcome::RolledBack { error, .. } = &outcome {
            self.notice = Some(format!("Allocation failed: {}", error));
        }
        outcome
    }

    // === Deletion ===

    pub fn request_delete(&mut self, category_id: CategoryId) -> bool {
        let signed_in = self.session.user_id.is_some();
        match self.categories.iter().find(|c| c.id == category_id) {
            Some(category) => self.deletion.request(category, signed_in),
            None => false,
        }
    }

    pub fn confirm_delete(&mut self) -> Option<PendingDeletion> {
        self.session.user_id?;
        self.deletion.begin_confirm()
    }

    pub fn cancel_delete(&mut self) {
        self.deletion.cancel();
    }

    pub fn dismiss_delete_error(&mut self) {
        self.deletion.dismiss_error();
    }

    pub fn finish_delete(
        &mut self,
        pending: PendingDeletion,
        result: BudgetResult<()>,
    ) -> DeletionOutcome {
        let outcome = self.deletion.finish(pending, result);
        if matches!(outcome, DeletionOutcome::Deleted(_)) {
            self.request_refresh();
        }
        outcome
    }

    pub fn deletion(&self) -> &DeletionFlow {
        &self.deletion
    }

    // === Modals ===

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn open_add_category(&mut self) {
        self.modal = Some(Modal::AddCategory);
    }

    pub fn open_add_group(&mut self) {
        self.modal = Some(Modal::AddGroup);
    }

    /// Open assignment entry for a category
    pub fn select_category(&mut self, category_id: CategoryId) -> bool {
        self.open_with_category(category_id, Modal::Assignment)
    }

    pub fn open_category_info(&mut self, category_id: CategoryId) -> bool {
        self.open_with_category(category_id, Modal::CategoryInfo)
    }

    fn open_with_category(
        &mut self,
        category_id: CategoryId,
        modal: fn(Category) -> Modal,
    ) -> bool {
        match self.category(category_id).cloned() {
            Some(category) => {
                self.modal = Some(modal(category));
                true
            }
            None => false,
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// A form went through; its side effects are not modelled locally
    pub fn modal_submitted(&mut self) {
        self.modal = None;
        self.request_refresh();
    }

    // === Notices ===

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // === Rendering ===

    pub fn header(&self) -> HeaderModel {
        HeaderModel::new(
            self.range,
            self.period_kind,
            self.categories.iter().find(|c| c.is_unallocated_funds),
            self.unallocated_income,
            self.allocation_loading,
        )
    }

    pub fn sections(&self) -> Vec<Section> {
        let is_fixing = |id: CategoryId| self.adjuster.is_fixing(id);
        build_sections(
            &self.grouped,
            &SectionContext {
                groups: &self.groups,
                expanded: &self.expanded,
                amounts: self.adjuster.amounts(),
                is_fixing: &is_fixing,
                loading: self.allocation_loading,
            },
        )
    }

    pub fn view(&self) -> ScreenView {
        ScreenView {
            header: self.header(),
            sections: self.sections(),
            deletion: self.deletion.dialog(),
            currency_symbol: self.session.currency_symbol.clone(),
        }
    }
}

fn same_group_ids(current: &[CategoryGroup], incoming: &[CategoryGroup]) -> bool {
    current.len() == incoming.len()
        && current.iter().zip(incoming).all(|(a, b)| a.id == b.id)
}
