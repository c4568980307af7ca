//! Single-field forms
//!
//! Every modal the screen opens is one text field: a name for new
//! categories and groups, an amount for assignments and goals. The form
//! stays open while its write is in flight and shows the backend's error
//! if it fails.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::Money;
use crate::screen::Modal;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

/// What a submitted form carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptValue {
    Name(String),
    Amount(Money),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub input: TextInput,
    pub error: Option<String>,
    /// A submission is in flight
    pub saving: bool,
}

impl PromptState {
    /// Empty or prefilled input for a modal
    pub fn for_modal(modal: &Modal) -> Self {
        let input = match modal {
            Modal::AddCategory => TextInput::new()
                .label("Name")
                .placeholder("e.g. Groceries"),
            Modal::AddGroup => TextInput::new()
                .label("Name")
                .placeholder("e.g. Bills, Savings"),
            Modal::Assignment(_) => TextInput::new()
                .label("Amount")
                .placeholder("negative to take money back"),
            Modal::CategoryInfo(category) => {
                let input = TextInput::new().label("Goal").placeholder("0 clears the goal");
                match category.goal_amount {
                    Some(goal) => {
                        input.content(format!("{}.{:02}", goal.cents() / 100, goal.cents() % 100))
                    }
                    None => input,
                }
            }
        };

        Self {
            input,
            error: None,
            saving: false,
        }
    }

    /// Check the input for a modal and extract its value
    pub fn parse(&self, modal: &Modal) -> Result<PromptValue, String> {
        let raw = self.input.value().trim();
        match modal {
            Modal::AddCategory | Modal::AddGroup => {
                if raw.is_empty() {
                    Err("Name is required".to_string())
                } else {
                    Ok(PromptValue::Name(raw.to_string()))
                }
            }
            Modal::Assignment(_) => {
                let amount = Money::parse(raw).map_err(|e| e.to_string())?;
                if amount.is_zero() {
                    return Err("Amount cannot be zero".to_string());
                }
                Ok(PromptValue::Amount(amount))
            }
            Modal::CategoryInfo(_) => {
                let goal = if raw.is_empty() {
                    Money::ZERO
                } else {
                    Money::parse(raw).map_err(|e| e.to_string())?
                };
                if goal.is_negative() {
                    return Err("Goal amount cannot be negative".to_string());
                }
                Ok(PromptValue::Amount(goal))
            }
        }
    }
}

pub fn title(modal: &Modal) -> String {
    match modal {
        Modal::AddCategory => " Add Category ".to_string(),
        Modal::AddGroup => " Add Category Group ".to_string(),
        Modal::Assignment(category) => format!(" Assign to {} ", category.name),
        Modal::CategoryInfo(category) => format!(" {} ", category.name),
    }
}

/// Render a form over the screen
pub fn render(frame: &mut Frame, modal: &Modal, state: &PromptState) {
    let area = centered_rect_fixed(56, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title(modal))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    if let Modal::CategoryInfo(category) = modal {
        lines.push(Line::from(Span::styled(
            format!("Available: {}", category.available),
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(match (&state.error, state.saving) {
        (_, true) => Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow))),
        (Some(error), false) => Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )),
        (None, false) => Line::from(""),
    });
    lines.push(Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]));
    frame.render_widget(Paragraph::new(lines), inner);

    if inner.height > 1 {
        let field = ratatui::layout::Rect {
            y: inner.y + 1,
            height: 1,
            ..inner
        };
        frame.render_widget(&state.input, field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, UserId};

    fn typed(modal: &Modal, text: &str) -> PromptState {
        let mut state = PromptState::for_modal(modal);
        for c in text.chars() {
            state.input.insert(c);
        }
        state
    }

    #[test]
    fn test_name_is_required() {
        let state = typed(&Modal::AddGroup, "   ");
        assert!(state.parse(&Modal::AddGroup).is_err());

        let state = typed(&Modal::AddCategory, " Rent ");
        assert_eq!(
            state.parse(&Modal::AddCategory),
            Ok(PromptValue::Name("Rent".to_string()))
        );
    }

    #[test]
    fn test_assignment_amount_can_be_negative_but_not_zero() {
        let modal = Modal::Assignment(Category::new(UserId::new(), "Rent"));
        assert_eq!(
            typed(&modal, "-12.5").parse(&modal),
            Ok(PromptValue::Amount(Money::from_cents(-1250)))
        );
        assert!(typed(&modal, "0").parse(&modal).is_err());
        assert!(typed(&modal, "abc").parse(&modal).is_err());
    }

    #[test]
    fn test_goal_form_is_prefilled_and_blank_clears() {
        let mut category = Category::new(UserId::new(), "Trip");
        category.set_goal(Money::from_cents(30_005));
        let modal = Modal::CategoryInfo(category);

        let state = PromptState::for_modal(&modal);
        assert_eq!(state.input.value(), "300.05");
        assert_eq!(state.parse(&modal), Ok(PromptValue::Amount(Money::from_cents(30_005))));

        let car = Category::new(UserId::new(), "Car");
        let blank = PromptState::for_modal(&Modal::CategoryInfo(car));
        assert_eq!(
            blank.parse(&Modal::CategoryInfo(Category::new(UserId::new(), "Car"))),
            Ok(PromptValue::Amount(Money::ZERO))
        );
        assert!(typed(&modal, "-").parse(&modal).is_err());
    }
}
