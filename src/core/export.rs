//! CSV exports of income and expense listings.

use crate::{
    entities::{expense, income},
    errors::Result,
};

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Renders incomes as CSV with a header row.
pub fn incomes_to_csv(incomes: &[income::Model]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "category", "amount", "date", "description"])?;
    for i in incomes {
        writer.write_record([
            i.id.to_string(),
            i.category.clone(),
            i.amount.to_string(),
            i.date.to_string(),
            i.description.clone().unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

/// Renders expenses as CSV with a header row.
pub fn expenses_to_csv(expenses: &[expense::Model]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "category", "amount", "date", "description", "status"])?;
    for e in expenses {
        writer.write_record([
            e.id.to_string(),
            e.category.clone(),
            e.amount.to_string(),
            e.date.to_string(),
            e.description.clone().unwrap_or_default(),
            e.status.as_str().to_string(),
        ])?;
    }
    finish(writer)
}
