pub mod catalog;
pub mod parse;
pub mod random;
pub mod source;
pub mod store;

// Re-export the main types for convenience
pub use catalog::{LanguageSpec, CATALOG};
pub use random::{IndexPicker, RandomStrength};
pub use source::{DirSource, EmbeddedSource, WordSource};
pub use store::WordStore;

/// Prefixes marking a generated stand-in rather than a real definition
const PLACEHOLDER_PREFIXES: [&str; 2] = ["Term:", "Definition for"];

/// One word plus its optional description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    text: String,
    pub description: Option<String>,
    pub description_is_authoritative: bool,
    /// Set while a definition lookup for this entry is in flight
    pub lookup_pending: bool,
}

impl WordEntry {
    pub fn new(text: impl Into<String>, description: Option<String>) -> Self {
        Self {
            text: text.into(),
            description,
            description_is_authoritative: false,
            lookup_pending: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the description is missing or a generated stand-in
    pub fn has_placeholder_description(&self) -> bool {
        match self.description.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(d) => PLACEHOLDER_PREFIXES.iter().any(|p| d.starts_with(p)),
        }
    }

    /// Description worth showing to the user, if any
    pub fn display_description(&self) -> Option<&str> {
        if self.description_is_authoritative || !self.has_placeholder_description() {
            self.description.as_deref()
        } else {
            None
        }
    }

    /// Whether a live lookup should be started for this entry
    pub fn needs_lookup(&self) -> bool {
        !self.description_is_authoritative
            && !self.lookup_pending
            && self.has_placeholder_description()
    }
}

/// The loaded word list for one language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet {
    pub code: String,
    pub label: String,
    pub entries: Vec<WordEntry>,
}

impl LanguageSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
