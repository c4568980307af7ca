//! Grouped category sections and accordion state
//!
//! Categories are partitioned by group id in feed order. Groups with no
//! members get no section; members of a group missing from the group list
//! still get one, titled [`UNKNOWN_GROUP_TITLE`].

use std::collections::HashSet;

use crate::models::{Category, CategoryGroup, CategoryGroupId, CategoryId, Money};

use super::allocation::AllocationMap;

pub const UNGROUPED_TITLE: &str = "Ungrouped";
pub const UNKNOWN_GROUP_TITLE: &str = "Unknown Group";

/// Identifies one accordion section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Group(CategoryGroupId),
    Ungrouped,
}

/// Categories partitioned by group, unallocated funds excluded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCategories {
    /// Groups in order of first appearance in the feed
    pub groups: Vec<(CategoryGroupId, Vec<Category>)>,
    pub ungrouped: Vec<Category>,
}

impl GroupedCategories {
    pub fn members(&self, key: GroupKey) -> &[Category] {
        match key {
            GroupKey::Ungrouped => &self.ungrouped,
            GroupKey::Group(id) => self
                .groups
                .iter()
                .find(|(group_id, _)| *group_id == id)
                .map(|(_, members)| members.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.ungrouped.is_empty()
    }
}

pub fn group_categories(categories: &[Category]) -> GroupedCategories {
    let mut grouped = GroupedCategories::default();

    for category in categories.iter().filter(|c| !c.is_unallocated_funds) {
        match category.group_id {
            None => grouped.ungrouped.push(category.clone()),
            Some(group_id) => match grouped.groups.iter_mut().find(|(id, _)| *id == group_id) {
                Some((_, members)) => members.push(category.clone()),
                None => grouped.groups.push((group_id, vec![category.clone()])),
            },
        }
    }

    grouped
}

/// Which sections are open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedGroups {
    open: HashSet<GroupKey>,
}

impl ExpandedGroups {
    /// Open every known group plus the ungrouped section
    pub fn reset(&mut self, groups: &[CategoryGroup]) {
        self.open = groups
            .iter()
            .map(|g| GroupKey::Group(g.id))
            .chain(std::iter::once(GroupKey::Ungrouped))
            .collect();
    }

    /// Flip one section, returning whether it is now open
    pub fn toggle(&mut self, key: GroupKey) -> bool {
        if self.open.remove(&key) {
            false
        } else {
            self.open.insert(key);
            true
        }
    }

    pub fn is_expanded(&self, key: GroupKey) -> bool {
        self.open.contains(&key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupTotals {
    pub allocated: Money,
    pub spent: Money,
}

pub fn group_totals(members: &[Category], amounts: &AllocationMap) -> GroupTotals {
    members.iter().fold(GroupTotals::default(), |totals, category| {
        let row = amounts.get(category.id);
        GroupTotals {
            allocated: totals.allocated + row.allocated,
            spent: totals.spent + row.spent,
        }
    })
}

/// Display state of one category row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub category_id: CategoryId,
    pub name: String,
    pub allocated: Money,
    pub spent: Money,
    pub available: Money,
    /// Quick actions are hidden while allocations load
    pub can_fix: bool,
    pub fixing: bool,
    pub can_fund_goal: bool,
}

/// One accordion section as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: GroupKey,
    pub title: String,
    pub member_count: usize,
    pub totals: GroupTotals,
    pub expanded: bool,
    /// Empty when collapsed
    pub rows: Vec<CategoryRow>,
}

/// Inputs shared by every section of one render
pub struct SectionContext<'a> {
    pub groups: &'a [CategoryGroup],
    pub expanded: &'a ExpandedGroups,
    pub amounts: &'a AllocationMap,
    pub is_fixing: &'a dyn Fn(CategoryId) -> bool,
    pub loading: bool,
}

/// Build sections: known groups by sort order, then unknown groups, then
/// ungrouped if it has members
pub fn build_sections(grouped: &GroupedCategories, ctx: &SectionContext<'_>) -> Vec<Section> {
    let mut ordered: Vec<(Option<&CategoryGroup>, CategoryGroupId, &[Category])> = grouped
        .groups
        .iter()
        .map(|(id, members)| (ctx.groups.iter().find(|g| g.id == *id), *id, members.as_slice()))
        .collect();

    ordered.sort_by(|(a, _, _), (b, _, _)| match (a, b) {
        (Some(a), Some(b)) => a
            .sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut sections: Vec<Section> = ordered
        .into_iter()
        .map(|(group, id, members)| {
            let title = group.map_or(UNKNOWN_GROUP_TITLE, |g| g.name.as_str());
            section(GroupKey::Group(id), title, members, ctx)
        })
        .collect();

    if !grouped.ungrouped.is_empty() {
        sections.push(section(
            GroupKey::Ungrouped,
            UNGROUPED_TITLE,
            &grouped.ungrouped,
            ctx,
        ));
    }

    sections
}

fn section(key: GroupKey, title: &str, members: &[Category], ctx: &SectionContext<'_>) -> Section {
    let expanded = ctx.expanded.is_expanded(key);
    let rows = if expanded {
        members.iter().map(|c| row(c, ctx)).collect()
    } else {
        Vec::new()
    };

    Section {
        key,
        title: title.to_string(),
        member_count: members.len(),
        totals: group_totals(members, ctx.amounts),
        expanded,
        rows,
    }
}

fn row(category: &Category, ctx: &SectionContext<'_>) -> CategoryRow {
    let amounts = ctx.amounts.get(category.id);
    let fixing = (ctx.is_fixing)(category.id);
    let has_shortfall = category
        .effective_goal()
        .is_some_and(|goal| amounts.allocated < goal);

    CategoryRow {
        category_id: category.id,
        name: category.name.clone(),
        allocated: amounts.allocated,
        spent: amounts.spent,
        available: category.available,
        can_fix: !ctx.loading && category.available.is_negative() && !fixing,
        fixing,
        can_fund_goal: !ctx.loading && has_shortfall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodAmounts, UserId};

    fn categories(user: UserId, g1: CategoryGroupId) -> Vec<Category> {
        vec![
            Category::new(user, "One").in_group(g1),
            Category::new(user, "Two"),
            Category::new(user, "Three").in_group(g1),
        ]
    }

    fn never_fixing(_: CategoryId) -> bool {
        false
    }

    #[test]
    fn test_grouping_partitions_by_group_id() {
        let user = UserId::new();
        let g1 = CategoryGroupId::new();
        let list = categories(user, g1);

        let grouped = group_categories(&list);

        let in_g1: Vec<_> = grouped.members(GroupKey::Group(g1)).iter().map(|c| c.id).collect();
        assert_eq!(in_g1, vec![list[0].id, list[2].id]);
        let ungrouped: Vec<_> = grouped.ungrouped.iter().map(|c| c.id).collect();
        assert_eq!(ungrouped, vec![list[1].id]);
    }

    #[test]
    fn test_grouping_excludes_unallocated_funds() {
        let user = UserId::new();
        let grouped = group_categories(&[Category::unallocated_funds(user)]);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_reset_expands_everything_and_toggle_is_independent() {
        let user = UserId::new();
        let bills = CategoryGroup::new(user, "Bills");
        let fun = CategoryGroup::new(user, "Fun");

        let mut expanded = ExpandedGroups::default();
        expanded.reset(&[bills.clone(), fun.clone()]);
        assert!(expanded.is_expanded(GroupKey::Group(bills.id)));
        assert!(expanded.is_expanded(GroupKey::Ungrouped));

        assert!(!expanded.toggle(GroupKey::Group(bills.id)));
        assert!(!expanded.is_expanded(GroupKey::Group(bills.id)));
        assert!(expanded.is_expanded(GroupKey::Group(fun.id)));
        assert!(expanded.toggle(GroupKey::Group(bills.id)));

        expanded.toggle(GroupKey::Ungrouped);
        expanded.reset(&[]);
        assert!(expanded.is_expanded(GroupKey::Ungrouped));
        assert!(!expanded.is_expanded(GroupKey::Group(fun.id)));
    }

    #[test]
    fn test_collapse_hides_rows_but_keeps_totals() {
        let user = UserId::new();
        let bills = CategoryGroup::new(user, "Bills");
        let list = categories(user, bills.id);
        let grouped = group_categories(&list);

        let mut amounts = AllocationMap::new();
        let cents = Money::from_cents;
        amounts.insert(list[0].id, PeriodAmounts::new(cents(1000), cents(250)));
        amounts.insert(list[2].id, PeriodAmounts::new(cents(500), cents(50)));
        let before = amounts.clone();

        let groups = vec![bills.clone()];
        let mut expanded = ExpandedGroups::default();
        expanded.reset(&groups);

        let render = |expanded: &ExpandedGroups| {
            build_sections(
                &grouped,
                &SectionContext {
                    groups: &groups,
                    expanded,
                    amounts: &amounts,
                    is_fixing: &never_fixing,
                    loading: false,
                },
            )
        };

        let open = render(&expanded);
        assert_eq!(open[0].rows.len(), 2);
        assert_eq!(open[0].totals.allocated, Money::from_cents(1500));
        assert_eq!(open[0].totals.spent, Money::from_cents(300));

        expanded.toggle(GroupKey::Group(bills.id));
        let closed = render(&expanded);
        assert!(closed[0].rows.is_empty());
        assert_eq!(closed[0].member_count, 2);
        assert_eq!(closed[0].totals, open[0].totals);

        expanded.toggle(GroupKey::Group(bills.id));
        assert_eq!(render(&expanded)[0].totals, open[0].totals);
        assert_eq!(amounts, before);
    }

    #[test]
    fn test_section_order_and_titles() {
        let user = UserId::new();
        let late = CategoryGroup::with_sort_order(user, "Late", 5);
        let early = CategoryGroup::with_sort_order(user, "Early", 1);
        let empty = CategoryGroup::with_sort_order(user, "Empty", 0);
        let orphan = CategoryGroupId::new();

        let list = vec![
            Category::new(user, "A").in_group(orphan),
            Category::new(user, "B").in_group(late.id),
            Category::new(user, "C"),
            Category::new(user, "D").in_group(early.id),
        ];
        let groups = vec![late.clone(), early.clone(), empty];
        let mut expanded = ExpandedGroups::default();
        expanded.reset(&groups);

        let sections = build_sections(
            &group_categories(&list),
            &SectionContext {
                groups: &groups,
                expanded: &expanded,
                amounts: &AllocationMap::new(),
                is_fixing: &never_fixing,
                loading: false,
            },
        );

        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late", UNKNOWN_GROUP_TITLE, UNGROUPED_TITLE]);
        // Not in the group list, so never reset to expanded
        assert!(!sections[2].expanded);
    }

    #[test]
    fn test_row_actions() {
        let user = UserId::new();
        let mut overdrawn = Category::new(user, "Overdrawn");
        overdrawn.available = Money::from_cents(-100);
        let mut saving = Category::new(user, "Saving");
        saving.goal_amount = Some(Money::from_cents(1000));
        let overdrawn_id = overdrawn.id;

        let list = vec![overdrawn, saving];
        let mut expanded = ExpandedGroups::default();
        expanded.reset(&[]);
        let fixing_overdrawn = move |id: CategoryId| id == overdrawn_id;
        let idle: &dyn Fn(CategoryId) -> bool = &never_fixing;
        let busy: &dyn Fn(CategoryId) -> bool = &fixing_overdrawn;

        let render = |loading: bool, is_fixing: &dyn Fn(CategoryId) -> bool| {
            build_sections(
                &group_categories(&list),
                &SectionContext {
                    groups: &[],
                    expanded: &expanded,
                    amounts: &AllocationMap::new(),
                    is_fixing,
                    loading,
                },
            )
            .remove(0)
            .rows
        };

        let rows = render(false, idle);
        assert!(rows[0].can_fix && !rows[0].fixing && !rows[0].can_fund_goal);
        assert!(!rows[1].can_fix && rows[1].can_fund_goal);

        let rows = render(false, busy);
        assert!(!rows[0].can_fix && rows[0].fixing);

        let rows = render(true, idle);
        assert!(!rows[0].can_fix && !rows[1].can_fund_goal);
    }
}
