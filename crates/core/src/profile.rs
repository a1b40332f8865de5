use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Column names of the uncategorized bank export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSchema {
    pub date_field: String,
    pub merchant_field: String,
    pub cardholder_field: String,
    pub amount_field: String,
}

impl Default for SourceSchema {
    fn default() -> Self {
        Self {
            date_field: "Date".to_string(),
            merchant_field: "Merchant Name".to_string(),
            cardholder_field: "Name on Card".to_string(),
            amount_field: "Amount".to_string(),
        }
    }
}

/// Column names of the already-categorized export used for learning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSchema {
    pub merchant_field: String,
    pub category_field: String,
    pub account_field: String,
}

impl Default for ReferenceSchema {
    fn default() -> Self {
        Self {
            merchant_field: "Merchant".to_string(),
            category_field: "Category".to_string(),
            account_field: "Account".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionProfile {
    pub name: String,
    pub delimiter: String,
    /// Account label used when the reference export carries no account column.
    pub default_account: String,
    pub uncategorized_label: String,
    /// Words kept lower-case when title-casing an unmatched merchant name.
    pub lowercase_words: Vec<String>,
    pub source: SourceSchema,
    pub reference: ReferenceSchema,
}

impl Default for ConversionProfile {
    fn default() -> Self {
        Self {
            name: "Rogers to Monarch".to_string(),
            delimiter: ",".to_string(),
            default_account: "Rogers".to_string(),
            uncategorized_label: "Uncategorized".to_string(),
            lowercase_words: ["ca", "inc", "the", "and", "of", "for", "w", "on"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            source: SourceSchema::default(),
            reference: ReferenceSchema::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConversionProfile {
    pub fn from_toml(toml_content: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn to_toml(&self) -> Result<String, ProfileError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn is_lowercase_word(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.lowercase_words.iter().any(|w| *w == word)
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}
