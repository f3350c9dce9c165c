//! TOML manifest describing a written corpus.
//!
//! Each `[[seeds]]` table records a file name, its length, and (for twins)
//! the selector byte it starts with, so a corpus directory can be checked
//! against the generator without re-reading every file.

use crate::error::Result;
use crate::seed::{ModeSelector, SeedEntry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusManifest {
    #[serde(default)]
    pub seeds: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<ModeSelector>,
}

impl From<&SeedEntry> for ManifestEntry {
    fn from(entry: &SeedEntry) -> Self {
        Self {
            name: entry.name.clone(),
            len: entry.len(),
            selector: entry.selector,
        }
    }
}

impl CorpusManifest {
    #[must_use]
    pub fn from_entries(entries: &[SeedEntry]) -> Self {
        Self {
            seeds: entries.iter().map(ManifestEntry::from).collect(),
        }
    }

    /// Loads and deserializes a manifest from a TOML file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or
    /// [`crate::CorpusError::Manifest`] if it is not a valid manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    #[must_use]
    pub fn twin_count(&self) -> usize {
        self.seeds.iter().filter(|s| s.selector.is_some()).count()
    }

    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.seeds.iter().map(|s| s.len).sum()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.seeds.iter().find(|s| s.name == name)
    }
}
