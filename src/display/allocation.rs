//! Budget view formatting
//!
//! Prints a `ScreenView`: header lines followed by one table holding every
//! section and its visible rows.

use tabled::{settings::Style, Table, Tabled};

use crate::screen::header::INCOME_LABEL;
use crate::screen::{CategoryRow, ScreenView, Section};

#[derive(Tabled)]
struct BudgetLine {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

impl BudgetLine {
    fn section(view: &ScreenView, section: &Section) -> Self {
        Self {
            name: format!("{} ({})", section.title, section.member_count),
            allocated: view.money(section.totals.allocated),
            spent: view.money(section.totals.spent),
            available: String::new(),
            actions: String::new(),
        }
    }

    fn row(view: &ScreenView, row: &CategoryRow) -> Self {
        let mut actions = Vec::new();
        if row.can_fix {
            actions.push("fix");
        }
        if row.can_fund_goal {
            actions.push("goal");
        }

        Self {
            name: format!("  {}", row.name),
            allocated: view.money(row.allocated),
            spent: view.money(row.spent),
            available: view.money(row.available),
            actions: actions.join(", "),
        }
    }
}

pub fn format_budget_view(view: &ScreenView) -> String {
    let mut output = format!("{}\n", view.header.range_text());

    if let Some(summary) = &view.header.unallocated {
        output.push_str(&format!("{}: {}\n", summary.name, view.money(summary.available)));
        output.push_str(&format!(
            "{} {}\n",
            INCOME_LABEL,
            summary.income_text(&view.currency_symbol)
        ));
    }
    output.push('\n');

    if view.sections.is_empty() {
        output.push_str("No categories found.\n");
        return output;
    }

    let lines: Vec<BudgetLine> = view
        .sections
        .iter()
        .flat_map(|section| {
            std::iter::once(BudgetLine::section(view, section))
                .chain(section.rows.iter().map(|row| BudgetLine::row(view, row)))
        })
        .collect();

    output.push_str(&Table::new(lines).with(Style::modern()).to_string());
    output.push('\n');
    output
}
