/// Ordered education vocabulary; names outside it rank 0.
pub const EDUCATION_LEVELS: [(&str, u8); 6] = [
    ("High School", 1),
    ("Certificate", 2),
    ("Diploma", 3),
    ("Bachelor's Degree", 4),
    ("Master's Degree", 5),
    ("PhD", 6),
];

/// Ordered language proficiency vocabulary; levels outside it rank 0.
pub const LANGUAGE_LEVELS: [(&str, u8); 5] = [
    ("basic", 1),
    ("intermediate", 2),
    ("advanced", 3),
    ("fluent", 4),
    ("native", 5),
];

pub fn education_rank(name: &str) -> u8 {
    lookup(&EDUCATION_LEVELS, name)
}

pub fn language_rank(level: &str) -> u8 {
    lookup(&LANGUAGE_LEVELS, level)
}

fn lookup(table: &[(&str, u8)], name: &str) -> u8 {
    let name = name.trim();
    table
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(name))
        .map(|(_, rank)| *rank)
        .unwrap_or(0)
}
