use super::{catalog, IndexPicker, LanguageSet, WordEntry, WordSource};
use crate::error::LoadError;
use std::io;

/// Owns the active language's entries and picks from them
pub struct WordStore {
    source: Box<dyn WordSource>,
    picker: IndexPicker,
    set: LanguageSet,
}

impl WordStore {
    pub fn new(source: Box<dyn WordSource>, picker: IndexPicker) -> Self {
        Self {
            source,
            picker,
            set: LanguageSet::default(),
        }
    }

    /// Replace the active set with the list for `code`.
    /// On failure the active set is left empty.
    pub fn load(&mut self, code: &str) -> Result<&LanguageSet, LoadError> {
        self.set = LanguageSet::default();

        let spec = catalog::find(code).ok_or_else(|| LoadError::NotFound(code.to_string()))?;

        let mut last_err: Option<io::Error> = None;
        for name in spec.files {
            match self.source.read(name) {
                Ok(bytes) => {
                    let entries = super::parse::parse_entries(name, &bytes).map_err(|reason| {
                        LoadError::SourceUnavailable {
                            code: spec.code.to_string(),
                            reason: format!("{name}: {reason}"),
                        }
                    })?;

                    tracing::info!(
                        code = spec.code,
                        file = *name,
                        source = %self.source.describe(),
                        count = entries.len(),
                        "word list loaded"
                    );
                    self.set = LanguageSet {
                        code: spec.code.to_string(),
                        label: spec.label.to_string(),
                        entries,
                    };
                    return Ok(&self.set);
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(file = *name, "word list candidate missing");
                    last_err = Some(err);
                }
                Err(err) => {
                    last_err = Some(err);
                    break;
                }
            }
        }

        Err(LoadError::SourceUnavailable {
            code: spec.code.to_string(),
            reason: last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no candidate files".to_string()),
        })
    }

    pub fn current_set(&self) -> &LanguageSet {
        &self.set
    }

    pub fn entry(&self, index: usize) -> Option<&WordEntry> {
        self.set.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut WordEntry> {
        self.set.entries.get_mut(index)
    }

    /// Uniformly chosen index into the active set; None when it is empty
    pub fn pick_random(&mut self) -> Option<usize> {
        self.picker.pick(self.set.len())
    }

    /// Store a lookup result on the entry. Only a non-empty result replaces
    /// the description; the pending flag is cleared either way.
    /// Forget every in-flight lookup so entries can be fetched again
    pub fn clear_pending(&mut self) {
        for entry in &mut self.set.entries {
            entry.lookup_pending = false;
        }
    }

    pub fn attach_definition(&mut self, index: usize, lookup_result: Option<&str>) {
        let Some(entry) = self.set.entries.get_mut(index) else {
            return;
        };
        entry.lookup_pending = false;

        if let Some(text) = lookup_result.map(str::trim).filter(|t| !t.is_empty()) {
            entry.description = Some(text.to_string());
            entry.description_is_authoritative = true;
        }
    }
}
