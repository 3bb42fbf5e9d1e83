//! Task number detection at line starts.
//!
//! Any one or two digit number at the start of a line, optionally preceded
//! by `задание` or `№` and followed by `.` or `)`, counts as a task header.
//! This also catches list items and numbered answers; numbers outside the
//! exam's task range are dropped but nothing else is filtered.

use std::sync::LazyLock;

use oge_tools_task_index_models::{MAX_TASK_NUMBER, MIN_TASK_NUMBER};
use regex::Regex;

static TASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*(?:задание\s+|№\s*)?(\d{1,2})(?:\s*[.)])?\b").expect("valid regex")
});

/// Returns `true` if `number` is a valid exam task number.
#[must_use]
pub const fn in_task_range(number: u8) -> bool {
    number >= MIN_TASK_NUMBER && number <= MAX_TASK_NUMBER
}

/// Task numbers found at line starts in `text`, in order of appearance.
///
/// Duplicates are kept.
pub fn find_tasks(text: &str) -> impl Iterator<Item = u8> + '_ {
    TASK_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<u8>().ok())
        .filter(|&n| in_task_range(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(text: &str) -> Vec<u8> {
        find_tasks(text).collect()
    }

    #[test]
    fn recognizes_header_styles() {
        assert_eq!(tasks("1. Вычислите\n2) Найдите\n14 Решите"), vec![1, 2, 14]);
        assert_eq!(tasks("Задание 5\n№ 6\n№7."), vec![5, 6, 7]);
    }

    #[test]
    fn drops_out_of_range_numbers() {
        assert_eq!(tasks("26. Лишнее\n0) Ноль"), Vec::<u8>::new());
        assert_eq!(tasks("25. Последнее"), vec![25]);
    }

    #[test]
    fn ignores_numbers_mid_line() {
        assert_eq!(tasks("Ответ: 12 и 3"), Vec::<u8>::new());
    }

    #[test]
    fn keeps_duplicates_and_false_positives() {
        assert_eq!(tasks("3. Решите\n3) ещё раз\n  10 рублей"), vec![3, 3, 10]);
    }

    #[test]
    fn three_digit_numbers_do_not_match() {
        assert_eq!(tasks("125 задач"), Vec::<u8>::new());
    }
}
