//! Flattening bank cards into statement records.

use oge_tools_bank_models::{BankCandidate, CARD_ID_KEY, CARDS_KEY, StatementField, StatementRecord};
use serde_json::Value;

use crate::BankError;

/// Normalizes one field value into its statement strings.
///
/// A string yields itself, a list yields its string elements and anything
/// else yields nothing.
#[must_use]
pub fn normalize_field(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Reads a card id. Strings are used as-is and numbers in their JSON form.
///
/// A zero number counts as no id, like an empty string.
#[must_use]
pub fn card_id(card: &serde_json::Map<String, Value>) -> Option<String> {
    match card.get(CARD_ID_KEY)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collects all statements of a single card, field by field in
/// [`StatementField::ALL`] order.
#[must_use]
pub fn card_statements(card: &serde_json::Map<String, Value>) -> Vec<StatementRecord> {
    let id = card_id(card);

    StatementField::ALL
        .iter()
        .filter_map(|field| card.get(field.key()))
        .flat_map(normalize_field)
        .map(|text| StatementRecord::new(text, id.clone()))
        .collect()
}

/// Flattens every card of a bank document into statement records.
///
/// Non-object cards are skipped. The result may be empty.
#[must_use]
pub fn flatten_cards(document: &Value) -> Vec<StatementRecord> {
    document
        .get(CARDS_KEY)
        .and_then(Value::as_array)
        .map(|cards| {
            cards
                .iter()
                .filter_map(Value::as_object)
                .flat_map(card_statements)
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts the statements of a located bank.
///
/// # Errors
///
/// Returns [`BankError::EmptyResult`] if the bank yields no statements.
pub fn extract_statements(bank: &BankCandidate) -> Result<Vec<StatementRecord>, BankError> {
    let statements = flatten_cards(&bank.document);

    log::debug!(
        "Extracted {} statements from {} cards in {}",
        statements.len(),
        bank.card_count,
        bank.path.display()
    );

    if statements.is_empty() {
        return Err(BankError::EmptyResult(bank.path.clone()));
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bank(json: &str) -> BankCandidate {
        let document: Value = serde_json::from_str(json).unwrap();
        let card_count = document["cards"].as_array().map_or(0, Vec::len);
        BankCandidate {
            path: PathBuf::from("bank_task19.json"),
            card_count,
            document,
        }
    }

    #[test]
    fn flattens_strings_and_lists_in_order() {
        let bank = bank(
            r#"{"cards":[{"id":"a1","statement":"X is true"},{"id":"a2","statement":["Y holds","Z holds"]}]}"#,
        );
        let statements = extract_statements(&bank).unwrap();
        assert_eq!(
            statements,
            vec![
                StatementRecord::new("X is true", Some("a1".to_owned())),
                StatementRecord::new("Y holds", Some("a2".to_owned())),
                StatementRecord::new("Z holds", Some("a2".to_owned())),
            ]
        );
    }

    #[test]
    fn reads_every_field_in_priority_order() {
        let bank = bank(
            r#"{"cards":[{"text":"t","items":["i"],"assertions":"a","statements":["s1","s2"],"statement":"s0"}]}"#,
        );
        let texts: Vec<String> = extract_statements(&bank)
            .unwrap()
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["s0", "s1", "s2", "a", "i", "t"]);
    }

    #[test]
    fn drops_non_string_values() {
        let bank = bank(r#"{"cards":[{"statement":["ok",1,null,{"x":1},"also ok"],"items":42}]}"#);
        let texts: Vec<String> = extract_statements(&bank)
            .unwrap()
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["ok", "also ok"]);
    }

    #[test]
    fn cards_without_known_fields_contribute_nothing() {
        let bank = bank(r#"{"cards":[{"id":"x","prompt":"ignored"},"not a card",{"statement":"kept"}]}"#);
        let statements = extract_statements(&bank).unwrap();
        assert_eq!(statements, vec![StatementRecord::new("kept", None)]);
    }

    #[test]
    fn numeric_ids_are_kept() {
        let bank = bank(r#"{"cards":[{"id":17,"statement":"n"},{"id":true,"statement":"b"}]}"#);
        let ids: Vec<Option<String>> = extract_statements(&bank)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![Some("17".to_owned()), None]);
    }

    #[test]
    fn zero_id_counts_as_missing() {
        let bank = bank(r#"{"cards":[{"id":0,"statement":"z"},{"id":0.0,"statement":"f"}]}"#);
        let statements = extract_statements(&bank).unwrap();
        assert!(statements.iter().all(|s| s.id.is_none()));
        assert!(!oge_tools_bank_models::any_has_id(&statements));
        assert_eq!(statements[0].display_text(true), "z");
    }

    #[test]
    fn empty_bank_is_an_error() {
        let bank = bank(r#"{"cards":[{"statement":[]},{"other":"x"}]}"#);
        assert!(matches!(
            extract_statements(&bank),
            Err(BankError::EmptyResult(_))
        ));
    }
}
