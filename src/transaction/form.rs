//! Parsing and validation of the raw transaction form.

use serde::{Deserialize, Serialize};

use crate::{
    Amount, Error,
    calendar::parse_date,
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// The raw data entered by the user in a transaction form.
///
/// Every field is kept as text so that missing and malformed values can be reported with a
/// specific error instead of a generic deserialization failure.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, Error> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingField(field))
}

impl TransactionForm {
    /// Validate the form and convert it into a [TransactionBuilder].
    ///
    /// The description is optional and defaults to an empty string.
    ///
    /// # Errors
    ///
    /// Returns an [Error::MissingField] if the date, amount or type is missing, otherwise an
    /// [Error::InvalidDate], [Error::InvalidAmount] or [Error::InvalidTransactionType] if the
    /// corresponding field cannot be parsed.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let date = parse_date(required(&self.date, "date")?)?;
        let amount: Amount = required(&self.amount, "amount")?.parse()?;
        let transaction_type: TransactionType = required(&self.transaction_type, "type")?.parse()?;
        let description = self.description.as_deref().unwrap_or_default();

        Ok(Transaction::build(amount, date, description)
            .transaction_type(transaction_type)
            .category(self.category.as_deref()))
    }
}
