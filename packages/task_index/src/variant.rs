//! Variant marker tracking.
//!
//! Exam PDFs announce each variant with a `Вариант № N` heading. The
//! tracker remembers the last marker seen so pages without one inherit it.

use std::sync::LazyLock;

use regex::Regex;

static VARIANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Вариант\s*№?\s*(\d+)").expect("valid regex"));

/// Returns the number of the first variant marker in `text`.
///
/// A marker whose number does not fit in a `u32` is ignored.
#[must_use]
pub fn find_variant(text: &str) -> Option<u32> {
    VARIANT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Carries the current variant across pages in reading order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantTracker {
    current: Option<u32>,
}

impl VariantTracker {
    /// A tracker that has not seen any marker yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Updates the current variant from a page's text and returns it.
    pub fn observe(&mut self, text: &str) -> Option<u32> {
        if let Some(variant) = find_variant(text) {
            if self.current != Some(variant) {
                log::debug!("Variant {variant} starts");
            }
            self.current = Some(variant);
        }
        self.current
    }

    /// The most recent variant seen, if any.
    #[must_use]
    pub const fn current(&self) -> Option<u32> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_marker_variants() {
        assert_eq!(find_variant("Вариант № 7"), Some(7));
        assert_eq!(find_variant("ВАРИАНТ 12"), Some(12));
        assert_eq!(find_variant("вариант№3"), Some(3));
        assert_eq!(find_variant("Задание 1"), None);
    }

    #[test]
    fn first_marker_on_page_wins() {
        assert_eq!(find_variant("Вариант 4\n...\nВариант 5"), Some(4));
    }

    #[test]
    fn oversized_number_is_ignored() {
        assert_eq!(find_variant("Вариант 99999999999"), None);
    }

    #[test]
    fn variant_persists_until_next_marker() {
        let mut tracker = VariantTracker::new();
        assert_eq!(tracker.observe("1. Вычислите"), None);
        assert_eq!(tracker.observe("Вариант № 2\n1. Найдите"), Some(2));
        assert_eq!(tracker.observe("5. Решите"), Some(2));
        assert_eq!(tracker.observe("Вариант 3"), Some(3));
        assert_eq!(tracker.current(), Some(3));
    }
}
