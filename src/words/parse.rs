use super::WordEntry;
use serde::Deserialize;
use std::path::Path;

/// A JSON list element: either a bare word or a word record
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Plain(String),
    Record {
        word: String,
        #[serde(default)]
        description: Option<String>,
    },
}

/// On-disk word list layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Json,
    Text,
}

impl ListFormat {
    /// Format implied by the file extension, if any
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(ListFormat::Json)
        } else if ext.eq_ignore_ascii_case("txt") {
            Some(ListFormat::Text)
        } else {
            None
        }
    }
}

/// Parse the word list stored under `name`.
/// `.json` and `.txt` decide the format; other names are sniffed, and only a
/// body that parses as a JSON array is read as JSON.
/// Blank entries are dropped; order is preserved.
pub fn parse_entries(name: &str, bytes: &[u8]) -> Result<Vec<WordEntry>, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("not utf-8: {e}"))?;
    let text = text.trim_start_matches('\u{feff}');

    match ListFormat::from_name(name) {
        Some(ListFormat::Json) => parse_json(text),
        Some(ListFormat::Text) => Ok(parse_lines(text)),
        None => Ok(parse_json(text).unwrap_or_else(|_| parse_lines(text))),
    }
}

fn parse_json(text: &str) -> Result<Vec<WordEntry>, String> {
    let raw: Vec<RawEntry> =
        serde_json::from_str(text).map_err(|e| format!("invalid json word list: {e}"))?;

    Ok(raw
        .into_iter()
        .filter_map(|r| {
            let (word, description) = match r {
                RawEntry::Plain(word) => (word, None),
                RawEntry::Record { word, description } => (word, description),
            };
            let word = word.trim();
            if word.is_empty() {
                None
            } else {
                Some(WordEntry::new(word, description.map(|d| d.trim().to_string())))
            }
        })
        .collect())
}

fn parse_lines(text: &str) -> Vec<WordEntry> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| WordEntry::new(l, None))
        .collect()
}
