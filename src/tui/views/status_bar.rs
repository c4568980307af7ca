//! Status bar: the latest notice on the left, key hints on the right

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;

const LIST_HINTS: &str =
    "j/k move  Enter assign  f fix  g goal  i goal edit  d delete  [ ] period  p kind  q quit";

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let left = match app.screen.notice() {
        Some(notice) => Span::styled(format!(" {}", notice), Style::default().fg(Color::Yellow)),
        None if app.screen.is_loading() => {
            Span::styled(" Loading allocations...", Style::default().fg(Color::DarkGray))
        }
        None => Span::raw(""),
    };
    frame.render_widget(Paragraph::new(Line::from(left)), area);

    if app.prompt.is_none() && !app.screen.deletion().is_active() {
        let hints = Paragraph::new(Line::from(Span::styled(
            format!("{} ", LIST_HINTS),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(hints, area);
    }
}
