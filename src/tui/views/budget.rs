//! The category accordion

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::screen::{CategoryRow, ScreenView, Section};

const NAME_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 12;

fn amount_cell(value: String) -> String {
    format!("{:>width$}", value, width = AMOUNT_WIDTH)
}

/// Quick actions shown at the end of a row
pub fn row_actions(row: &CategoryRow) -> Vec<&'static str> {
    let mut actions = Vec::new();
    if row.fixing {
        actions.push("Fixing...");
    } else if row.can_fix {
        actions.push("[f] Fix");
    }
    if row.can_fund_goal {
        actions.push("[g] Goal");
    }
    actions
}

/// "▾ Bills (3)" or "▸ Bills (3)"
pub fn section_title(section: &Section) -> String {
    let marker = if section.expanded { '▾' } else { '▸' };
    format!("{} {} ({})", marker, section.title, section.member_count)
}

fn section_line(view: &ScreenView, section: &Section) -> Line<'static> {
    let title = section_title(section);
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", title, width = NAME_WIDTH + 2),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            amount_cell(view.money(section.totals.allocated)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            amount_cell(view.money(section.totals.spent)),
            Style::default().fg(Color::Cyan),
        ),
    ])
}

fn row_line(view: &ScreenView, row: &CategoryRow) -> Line<'static> {
    let name: String = row.name.chars().take(NAME_WIDTH).collect();
    let available_style = if row.available.is_negative() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if row.available.is_zero() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut spans = vec![
        Span::raw(format!("  {:<width$}", name, width = NAME_WIDTH)),
        Span::raw(amount_cell(view.money(row.allocated))),
        Span::raw(amount_cell(view.money(row.spent))),
        Span::styled(amount_cell(view.money(row.available)), available_style),
    ];
    for action in row_actions(row) {
        spans.push(Span::styled(
            format!("  {}", action),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

pub fn render(frame: &mut Frame, area: Rect, view: &ScreenView, selected: usize) {
    let sections = &view.sections;
    let block = Block::default()
        .title(" Categories ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if sections.is_empty() {
        let empty = Paragraph::new("No categories yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let column_header = Line::from(Span::styled(
        format!(
            "  {:<width$}{}{}{}",
            "",
            amount_cell("Allocated".into()),
            amount_cell("Spent".into()),
            amount_cell("Available".into()),
            width = NAME_WIDTH
        ),
        Style::default().fg(Color::DarkGray),
    ));
    let block = block.title_bottom(column_header);

    let items: Vec<ListItem> = sections
        .iter()
        .flat_map(|section| {
            std::iter::once(ListItem::new(section_line(view, section)))
                .chain(section.rows.iter().map(|row| ListItem::new(row_line(view, row))))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}
