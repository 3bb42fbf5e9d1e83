//! Statement bank discovery.
//!
//! Candidates are files whose name contains [`BANK_FILE_MARKER`] and whose
//! extension is `.json`. A candidate only counts if it parses to an object
//! with a `cards` list in which at least one card has a `statement` key.
//! Anything else is skipped silently.

use std::cmp::Reverse;
use std::path::Path;

use oge_tools_bank_models::{
    BANK_FILE_EXTENSION, BANK_FILE_MARKER, BankCandidate, CARDS_KEY, StatementField,
};
use walkdir::WalkDir;

use crate::BankError;

/// Returns `true` if `path` looks like a bank file by name alone.
#[must_use]
pub fn is_candidate_name(path: &Path) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(BANK_FILE_MARKER));
    let ext_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == BANK_FILE_EXTENSION);

    name_matches && ext_matches
}

/// Reads and shape-checks a single candidate file.
///
/// Returns `None` for unreadable files, malformed JSON, non-object
/// documents, documents without a `cards` list, and `cards` lists where no
/// card is an object with a `statement` key.
#[must_use]
pub fn score_candidate(path: &Path) -> Option<BankCandidate> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("Skipping {}: {e}", path.display());
            return None;
        }
    };

    let document: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(document) => document,
        Err(e) => {
            log::debug!("Skipping {}: invalid JSON: {e}", path.display());
            return None;
        }
    };

    let Some(cards) = document
        .as_object()
        .and_then(|o| o.get(CARDS_KEY))
        .and_then(serde_json::Value::as_array)
    else {
        log::debug!("Skipping {}: no `{CARDS_KEY}` list", path.display());
        return None;
    };

    let has_statement = cards.iter().any(|card| {
        card.as_object()
            .is_some_and(|c| c.contains_key(StatementField::Statement.key()))
    });
    if !has_statement {
        log::debug!("Skipping {}: no card has a statement", path.display());
        return None;
    }

    let card_count = cards.len();

    Some(BankCandidate {
        path: path.to_path_buf(),
        card_count,
        document,
    })
}

/// Collects every valid candidate under `root`, in path order.
///
/// # Errors
///
/// Returns [`BankError::Walk`] if `root` itself cannot be read. Unreadable
/// entries below it are skipped.
pub fn collect_candidates(root: &Path) -> Result<Vec<BankCandidate>, BankError> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                log::debug!("Skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
            Err(source) => {
                return Err(BankError::Walk {
                    path: root.to_path_buf(),
                    source,
                });
            }
        };

        if !entry.file_type().is_file() || !is_candidate_name(entry.path()) {
            continue;
        }

        if let Some(candidate) = score_candidate(entry.path()) {
            log::debug!(
                "Candidate {} has {} cards",
                candidate.path.display(),
                candidate.card_count
            );
            candidates.push(candidate);
        }
    }

    Ok(candidates)
}

/// Picks the candidate with the most cards, breaking ties by the
/// lexicographically smallest path.
#[must_use]
pub fn select_best(mut candidates: Vec<BankCandidate>) -> Option<BankCandidate> {
    candidates.sort_by_cached_key(|c| (Reverse(c.card_count), path_key(&c.path)));
    candidates.into_iter().next()
}

/// Finds the best statement bank under `root`.
///
/// # Errors
///
/// * [`BankError::NotFound`] if `root` is not a directory or no file
///   qualifies
/// * [`BankError::Walk`] if `root` cannot be read
pub fn find_bank(root: &Path) -> Result<BankCandidate, BankError> {
    if !root.is_dir() {
        return Err(BankError::NotFound(root.to_path_buf()));
    }

    let candidates = collect_candidates(root)?;
    log::info!(
        "Found {} bank candidate(s) under {}",
        candidates.len(),
        root.display()
    );

    select_best(candidates).ok_or_else(|| BankError::NotFound(root.to_path_buf()))
}

/// Loads an explicitly named bank file.
///
/// # Errors
///
/// Returns [`BankError::InvalidBank`] if the file is missing, unreadable or
/// not shaped like a statement bank.
pub fn load_bank(path: &Path) -> Result<BankCandidate, BankError> {
    score_candidate(path).ok_or_else(|| BankError::InvalidBank(path.to_path_buf()))
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("oge_tools_bank_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn bank_with_cards(count: usize) -> String {
        let cards: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"id":"c{i}","statement":"s{i}"}}"#))
            .collect();
        format!(r#"{{"cards":[{}]}}"#, cards.join(","))
    }

    #[test]
    fn matches_marker_and_extension() {
        assert!(is_candidate_name(Path::new("data/task19_bank.json")));
        assert!(is_candidate_name(Path::new("my-task19.json")));
        assert!(!is_candidate_name(Path::new("task19_bank.js")));
        assert!(!is_candidate_name(Path::new("task18_bank.json")));
    }

    #[test]
    fn picks_largest_bank() {
        let dir = fixture_dir("largest");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a_task19.json"), bank_with_cards(2)).unwrap();
        fs::write(dir.join("nested/b_task19.json"), bank_with_cards(5)).unwrap();
        fs::write(dir.join("c_task19.json"), bank_with_cards(3)).unwrap();

        let best = find_bank(&dir).unwrap();
        assert_eq!(best.path, dir.join("nested/b_task19.json"));
        assert_eq!(best.card_count, 5);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn ties_go_to_smallest_path() {
        let dir = fixture_dir("ties");
        fs::write(dir.join("z_task19.json"), bank_with_cards(4)).unwrap();
        fs::write(dir.join("m_task19.json"), bank_with_cards(4)).unwrap();

        let best = find_bank(&dir).unwrap();
        assert_eq!(best.path, dir.join("m_task19.json"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn skips_malformed_and_misshapen_candidates() {
        let dir = fixture_dir("skips");
        fs::write(dir.join("broken_task19.json"), "{ not json").unwrap();
        fs::write(dir.join("array_task19.json"), "[1, 2, 3]").unwrap();
        fs::write(dir.join("nocards_task19.json"), r#"{"items":[]}"#).unwrap();
        fs::write(
            dir.join("nostatement_task19.json"),
            r#"{"cards":[{"text":"a"},{"text":"b"},{"text":"c"}]}"#,
        )
        .unwrap();
        fs::write(dir.join("good_task19.json"), bank_with_cards(1)).unwrap();

        let paths: Vec<PathBuf> = collect_candidates(&dir)
            .unwrap()
            .into_iter()
            .map(|c| c.path)
            .collect();
        assert_eq!(paths, vec![dir.join("good_task19.json")]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_tree_is_not_found() {
        let dir = fixture_dir("empty");
        fs::write(dir.join("unrelated.json"), bank_with_cards(3)).unwrap();

        assert!(matches!(find_bank(&dir), Err(BankError::NotFound(_))));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = fixture_dir("missing_root");
        let _ = fs::remove_dir_all(&dir);

        assert!(matches!(find_bank(&dir), Err(BankError::NotFound(_))));
    }

    #[test]
    fn explicit_bank_must_have_shape() {
        let dir = fixture_dir("explicit");
        let path = dir.join("anything.json");
        fs::write(&path, r#"{"cards":"nope"}"#).unwrap();

        assert!(matches!(load_bank(&path), Err(BankError::InvalidBank(_))));

        fs::write(&path, bank_with_cards(2)).unwrap();
        assert_eq!(load_bank(&path).unwrap().card_count, 2);

        let _ = fs::remove_dir_all(&dir);
    }
}
