//! List filters shared by incomes and expenses.

use chrono::NaiveDate;
use serde::Deserialize;

/// Optional narrowing applied to income and expense listings.
///
/// All present criteria must hold. `from` and `to` are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    /// Exact category
    pub category: Option<String>,
    /// Case-insensitive text searched in category and description
    pub q: Option<String>,
    /// Earliest date included
    pub from: Option<NaiveDate>,
    /// Latest date included
    pub to: Option<NaiveDate>,
}

impl RecordFilter {
    /// Search text, if any non-blank text was given.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Category filter, if any non-blank category was given.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
