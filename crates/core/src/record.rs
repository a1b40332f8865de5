use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a parsed export, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field. A header that appears twice keeps its first value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// The field's value, or `""` when the column is missing.
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

/// A row in the finance tool's import schema. Field order here is the column
/// order of the written file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputRecord {
    pub date: String,
    pub merchant: String,
    pub category: String,
    pub account: String,
    #[serde(rename = "Original Statement")]
    pub original_statement: String,
    pub notes: String,
    pub amount: String,
    pub tags: String,
    pub owner: String,
}

impl OutputRecord {
    pub const HEADERS: [&'static str; 9] = [
        "Date",
        "Merchant",
        "Category",
        "Account",
        "Original Statement",
        "Notes",
        "Amount",
        "Tags",
        "Owner",
    ];

    pub fn is_categorized(&self, uncategorized_label: &str) -> bool {
        self.category != uncategorized_label
    }
}
