//! Rendering for the budget screen

pub mod budget;
pub mod header;
pub mod status_bar;

use ratatui::Frame;

use super::app::App;
use super::dialogs;
use super::layout::AppLayout;

/// Draw one frame
pub fn render(frame: &mut Frame, app: &App) {
    let view = app.screen.view();
    let layout = AppLayout::new(frame.area());

    header::render(frame, layout.header, &view.header, &view.currency_symbol);
    budget::render(frame, layout.list, &view, app.selected);
    status_bar::render(frame, layout.status_bar, app);

    if let (Some(modal), Some(prompt)) = (app.screen.modal(), app.prompt.as_ref()) {
        dialogs::prompt::render(frame, modal, prompt);
    }

    if let Some(dialog) = &view.deletion {
        dialogs::confirm::render(frame, dialog);
    }
}
