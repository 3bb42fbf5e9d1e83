//! Rough topic guesses by task number.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Topic used for task numbers with no entry in the table.
pub const DEFAULT_THEME: &str = "прочее";

/// Maps a task number to the topic it usually covers.
static THEMES: LazyLock<BTreeMap<u8, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        (1, "арифметика: вычисления"),
        (2, "арифметика: проценты"),
        (3, "арифметика: пропорции и доли"),
        (4, "геометрия: площадь и периметр"),
        (5, "функции и графики"),
        (6, "геометрия: углы"),
        (7, "геометрия: треугольники"),
        (8, "неравенства"),
        (9, "линейные уравнения"),
        (10, "вероятность"),
        (11, "координатная плоскость"),
        (12, "статистика и диаграммы"),
        (13, "квадратные уравнения"),
        (14, "последовательности и прогрессии"),
        (15, "геометрия: углы и биссектрисы"),
        (16, "геометрия: координаты и расстояния"),
        (17, "геометрия: объемы и площади"),
        (18, "геометрия: тригонометрия"),
        (19, "алгебра: рациональные выражения"),
        (20, "геометрия: доказательства"),
    ])
});

/// Returns the topic guess for a task number.
#[must_use]
pub fn guess_theme(task_number: u8) -> &'static str {
    THEMES.get(&task_number).copied().unwrap_or(DEFAULT_THEME)
}
