/// A configured language and where its word list lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSpec {
    pub code: &'static str,
    pub label: &'static str,
    /// Candidate resource names, tried in order
    pub files: &'static [&'static str],
    /// Fetch dictionary definitions for placeholder entries
    pub live_definitions: bool,
}

pub const CATALOG: &[LanguageSpec] = &[
    LanguageSpec {
        code: "AZ",
        label: "Azərbaycan",
        files: &["AZ.json", "AZ.txt"],
        live_definitions: false,
    },
    LanguageSpec {
        code: "EN",
        label: "English",
        files: &["EN.json", "EN.txt"],
        live_definitions: true,
    },
];

/// Case-insensitive lookup by code
pub fn find(code: &str) -> Option<&'static LanguageSpec> {
    CATALOG.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

/// The code `step` positions away from `code`, wrapping around the catalog
pub fn cycle(code: &str, step: isize) -> &'static LanguageSpec {
    let len = CATALOG.len() as isize;
    let pos = CATALOG
        .iter()
        .position(|l| l.code.eq_ignore_ascii_case(code))
        .unwrap_or(0) as isize;
    &CATALOG[(pos + step).rem_euclid(len) as usize]
}
