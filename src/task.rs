use crate::error::FormError;
use chrono::NaiveDate;

const ISO_FORMAT: &str = "%Y-%m-%d";
const US_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub due_date: NaiveDate,
}

impl Task {
    /// A task is past due when its date is strictly before `today`.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }

    pub fn same_as(&self, name: &str, due_date: NaiveDate) -> bool {
        self.name == name && self.due_date == due_date
    }
}

/// Parses a due date typed into the form.
///
/// ISO `yyyy-mm-dd` is the canonical input. `mm/dd/yyyy` is also accepted.
pub fn parse_due_date(input: &str) -> Result<NaiveDate, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FormError::MissingDueDate);
    }
    NaiveDate::parse_from_str(input, ISO_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, US_FORMAT))
        .map_err(|_| FormError::InvalidDueDate(input.to_string()))
}
