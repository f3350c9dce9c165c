//! Human-readable and JSON listings of a corpus manifest.

use crate::error::Result;
use crate::manifest::CorpusManifest;
use std::fmt::Write;

pub struct CorpusReport {
    manifest: CorpusManifest,
}

impl CorpusReport {
    #[must_use]
    pub fn new(manifest: CorpusManifest) -> Self {
        Self { manifest }
    }

    #[must_use]
    pub fn manifest(&self) -> &CorpusManifest {
        &self.manifest
    }

    /// One line per seed: selector marker, length, name.
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str("MQTT Seed Corpus\n");
        out.push_str(&"=".repeat(60));
        out.push('\n');
        let _ = writeln!(
            out,
            "Seeds: {} ({} dynamic), {} bytes\n",
            self.manifest.len(),
            self.manifest.twin_count(),
            self.manifest.total_bytes()
        );

        for seed in &self.manifest.seeds {
            let marker = match seed.selector {
                Some(selector) => format!("[{:#04x}]", selector.value()),
                None => "[    ]".to_string(),
            };
            let _ = writeln!(out, "  {marker} {:>6}  {}", seed.len, seed.name);
        }
        out
    }

    /// # Errors
    /// Returns [`crate::CorpusError::Manifest`] if serialization fails.
    pub fn generate_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.manifest)?)
    }
}
