//! The add-task form: two text fields, an "Add" button and focus handling.

use crate::error::FormError;
use crate::task::parse_due_date;
use chrono::NaiveDate;

/// Focusable controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Name,
    DueDate,
    AddButton,
    Cards,
}

impl Field {
    const ORDER: [Field; 4] = [Field::Name, Field::DueDate, Field::AddButton, Field::Cards];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }

    pub fn is_text_input(self) -> bool {
        matches!(self, Field::Name | Field::DueDate)
    }
}

/// A validated form, ready to become a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub due_date: NaiveDate,
}

#[derive(Debug, Default)]
pub struct TaskForm {
    pub name: String,
    pub due_date: String,
    pub focus: Field,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the name first, then the due date.
    pub fn validate(&self) -> Result<NewTask, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }
        let due_date = parse_due_date(&self.due_date)?;
        Ok(NewTask {
            name: name.to_string(),
            due_date,
        })
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.due_date.clear();
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Name => Some(&mut self.name),
            Field::DueDate => Some(&mut self.due_date),
            Field::AddButton | Field::Cards => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(value) = self.focused_mut() {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.focused_mut() {
            value.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }
}
