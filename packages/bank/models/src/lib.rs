#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Statement bank record and field types.
//!
//! A statement bank is a JSON document with a `cards` list. Each card may
//! carry one or more textual statements under any of the
//! [`StatementField`] keys. These types are shared between the bank
//! locator/extractor and the PDF renderers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Substring a file name must contain to be considered a statement bank.
pub const BANK_FILE_MARKER: &str = "task19";

/// Extension (without the dot) a statement bank file must have.
pub const BANK_FILE_EXTENSION: &str = "json";

/// Key holding the list of cards in a bank document.
pub const CARDS_KEY: &str = "cards";

/// Key holding a card's identifier.
pub const CARD_ID_KEY: &str = "id";

/// Card keys that may hold statement text, in priority order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatementField {
    /// A single statement (`"statement"`).
    Statement,
    /// A list of statements (`"statements"`).
    Statements,
    /// A list of assertions (`"assertions"`).
    Assertions,
    /// A list of generic items (`"items"`).
    Items,
    /// A generic text field (`"text"`).
    Text,
}

impl StatementField {
    /// All fields in the order they are read from a card.
    pub const ALL: [Self; 5] = [
        Self::Statement,
        Self::Statements,
        Self::Assertions,
        Self::Items,
        Self::Text,
    ];

    /// The JSON key for this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Statements => "statements",
            Self::Assertions => "assertions",
            Self::Items => "items",
            Self::Text => "text",
        }
    }
}

/// One statement extracted from a bank card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    /// The statement text, exactly as stored in the bank.
    pub text: String,
    /// Identifier of the card the statement came from.
    pub id: Option<String>,
}

impl StatementRecord {
    /// Creates a record from text and an optional card id.
    #[must_use]
    pub fn new(text: impl Into<String>, id: Option<String>) -> Self {
        Self {
            text: text.into(),
            id,
        }
    }

    /// Returns the id if it is present and not empty.
    #[must_use]
    pub fn non_empty_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns the text with an `[#id] ` prefix when `include_ids` is set
    /// and the record carries a non-empty id.
    #[must_use]
    pub fn display_text(&self, include_ids: bool) -> String {
        match self.non_empty_id() {
            Some(id) if include_ids => format!("[#{id}] {}", self.text),
            _ => self.text.clone(),
        }
    }
}

/// A bank file that passed shape validation.
#[derive(Debug, Clone)]
pub struct BankCandidate {
    /// Location of the bank file.
    pub path: PathBuf,
    /// Number of entries in the `cards` list.
    pub card_count: usize,
    /// The parsed document.
    pub document: serde_json::Value,
}

/// Returns `true` if any record carries a non-empty id.
#[must_use]
pub fn any_has_id(records: &[StatementRecord]) -> bool {
    records.iter().any(|r| r.non_empty_id().is_some())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn field_keys_match_strum_names() {
        for field in StatementField::iter() {
            assert_eq!(field.key(), field.as_ref());
            assert_eq!(StatementField::from_str(field.key()).unwrap(), field);
        }
    }

    #[test]
    fn all_follows_declaration_order() {
        let iterated: Vec<StatementField> = StatementField::iter().collect();
        assert_eq!(iterated, StatementField::ALL.to_vec());
    }

    #[test]
    fn display_text_prefixes_id_only_when_requested() {
        let record = StatementRecord::new("X is true", Some("a1".to_owned()));
        assert_eq!(record.display_text(false), "X is true");
        assert_eq!(record.display_text(true), "[#a1] X is true");
    }

    #[test]
    fn empty_id_is_not_rendered() {
        let record = StatementRecord::new("X is true", Some(String::new()));
        assert_eq!(record.display_text(true), "X is true");
        assert!(!any_has_id(&[record]));
    }
}
