//! Header: period controls, add actions and the unallocated-funds block

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::screen::header::INCOME_LABEL;
use crate::screen::HeaderModel;

fn money_style(negative: bool) -> Style {
    if negative {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    }
}

pub fn render(frame: &mut Frame, area: Rect, header: &HeaderModel, currency_symbol: &str) {
    let block = Block::default()
        .title(" Budget ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let controls = vec![
        Line::from(vec![
            Span::styled("[ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                header.range_text(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ]", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::styled("[a]", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {}  ", header.add_category_label)),
            Span::styled("[A]", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {}", header.add_group_label)),
        ]),
    ];
    frame.render_widget(Paragraph::new(controls), columns[0]);

    // Nothing is shown until the bucket exists
    if let Some(summary) = &header.unallocated {
        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{}: ", summary.name), Style::default().fg(Color::White)),
                Span::styled(
                    summary.available.format_with_symbol(currency_symbol),
                    money_style(summary.available.is_negative()).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{} ", INCOME_LABEL), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    summary.income_text(currency_symbol),
                    Style::default().fg(Color::White),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), columns[1]);
    }
}
