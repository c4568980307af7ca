//! Delete confirmation and failure dialogs

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::screen::DeletionDialog;
use crate::tui::layout::centered_rect_fixed;

/// Hint line at the bottom of the dialog
pub fn hints(dialog: &DeletionDialog) -> Line<'static> {
    if dialog.busy {
        Line::from(Span::styled("Deleting...", Style::default().fg(Color::Yellow)))
    } else if dialog.confirmable {
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(Color::Green)),
            Span::raw(" Delete  "),
            Span::styled("[N]", Style::default().fg(Color::Red)),
            Span::raw(" Cancel  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[Any key]", Style::default().fg(Color::Yellow)),
            Span::raw(" Close"),
        ])
    }
}

pub fn render(frame: &mut Frame, dialog: &DeletionDialog) {
    let area = centered_rect_fixed(60, 8, frame.area());
    frame.render_widget(Clear, area);

    // Failures are red, confirmations yellow
    let color = if dialog.confirmable || dialog.busy {
        Color::Yellow
    } else {
        Color::Red
    };

    let block = Block::default()
        .title(format!(" {} ", dialog.title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            dialog.message.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        hints(dialog),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
