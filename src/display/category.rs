//! Category display formatting
//!
//! Categories are printed in the same section order the budget screen uses.

use crate::models::{Category, CategoryGroup};
use crate::screen::Section;

/// Format sections as a tree, with goals and available balances
pub fn format_category_tree(sections: &[Section], categories: &[Category]) -> String {
    if sections.is_empty() {
        return "No categories found.\n\nRun 'budget category create <name>' to add one.\n"
            .to_string();
    }

    let mut output = String::new();

    for (i, section) in sections.iter().enumerate() {
        output.push_str(&format!("{}\n", section.title));

        for (j, row) in section.rows.iter().enumerate() {
            let prefix = if j + 1 == section.rows.len() {
                "└── "
            } else {
                "├── "
            };

            let goal = categories
                .iter()
                .find(|c| c.id == row.category_id)
                .and_then(Category::effective_goal)
                .map(|goal| format!(" (goal: {})", goal))
                .unwrap_or_default();

            output.push_str(&format!(
                "  {}{} [{}]{}\n",
                prefix, row.name, row.available, goal
            ));
        }

        if i + 1 < sections.len() {
            output.push('\n');
        }
    }

    output
}

/// Format a simple list of groups
pub fn format_group_list(groups: &[CategoryGroup]) -> String {
    if groups.is_empty() {
        return "No category groups found.\n".to_string();
    }

    let mut output = String::from("Category Groups:\n");
    for group in groups {
        output.push_str(&format!("  {} - order: {}\n", group.name, group.sort_order));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, UserId};
    use crate::screen::{CategoryRow, GroupKey, GroupTotals};

    #[test]
    fn test_tree_shows_goals_and_balances() {
        let user = UserId::new();
        let mut rent = Category::new(user, "Rent");
        rent.set_goal(Money::from_units(1200));
        rent.available = Money::from_units(50);
        let fun = Category::new(user, "Fun");

        let row = |c: &Category| CategoryRow {
            category_id: c.id,
            name: c.name.clone(),
            allocated: Money::ZERO,
            spent: Money::ZERO,
            available: c.available,
            can_fix: false,
            fixing: false,
            can_fund_goal: false,
        };
        let sections = vec![Section {
            key: GroupKey::Ungrouped,
            title: "Ungrouped".into(),
            member_count: 2,
            totals: GroupTotals::default(),
            expanded: true,
            rows: vec![row(&rent), row(&fun)],
        }];

        let tree = format_category_tree(&sections, &[rent.clone(), fun.clone()]);
        assert_eq!(
            tree,
            "Ungrouped\n  ├── Rent [$50.00] (goal: $1200.00)\n  └── Fun [$0.00]\n"
        );
    }

    #[test]
    fn test_empty_outputs() {
        assert!(format_category_tree(&[], &[]).starts_with("No categories found."));
        assert_eq!(format_group_list(&[]), "No category groups found.\n");
    }
}
