use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

/// Default location of the pronunciation dictionary.
pub const DEFAULT_DICTIONARY_PATH: &str = "pronunciation_dict.json";

/// Word → spoken replacement pairs, kept in the order they appear in the file.
///
/// Order matters: rules are applied one after another, so a replacement can
/// feed a later rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PronunciationDict {
    entries: Vec<(String, String)>,
}

impl PronunciationDict {
    /// Build a dictionary from pairs. Later duplicates of a key overwrite the
    /// replacement but keep the original position.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut dict = Self::default();
        for (word, replacement) in pairs {
            dict.insert(word, replacement);
        }
        dict
    }

    /// Load the dictionary from a JSON object file.
    ///
    /// A missing, unreadable or malformed file yields an empty dictionary.
    /// Entries whose value is not a string are skipped.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("No pronunciation dictionary at {}: {e}", path.display());
                return Self::default();
            }
        };

        let object: Map<String, Value> = match serde_json::from_str(&raw) {
            Ok(object) => object,
            Err(e) => {
                log::warn!(
                    "Ignoring invalid pronunciation dictionary {}: {e}",
                    path.display()
                );
                return Self::default();
            }
        };

        let mut dict = Self::default();
        for (word, value) in object {
            match value {
                Value::String(replacement) => dict.insert(word, replacement),
                other => log::warn!("Skipping pronunciation entry {word:?}: expected a string, got {other}"),
            }
        }

        log::info!("Loaded {} pronunciation entries", dict.len());
        dict
    }

    pub fn insert(&mut self, word: String, replacement: String) {
        match self.entries.iter_mut().find(|(w, _)| *w == word) {
            Some(entry) => entry.1 = replacement,
            None => self.entries.push((word, replacement)),
        }
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, r)| r.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(w, r)| (w.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
