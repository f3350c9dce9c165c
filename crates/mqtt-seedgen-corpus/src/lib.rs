//! Seed corpus generation for fuzzing MQTT client decoders.
//!
//! [`generator::generate`] enumerates well-formed broker-to-client frames,
//! canonical and boundary cases alike, each tagged with the harness phase
//! it targets. [`emit`] persists them through a [`SeedWriter`], optionally
//! adding a `dyn_` twin whose first byte is the [`ModeSelector`] for that
//! phase. The [`manifest`] and [`report`] modules describe a written corpus.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod report;
pub mod seed;

pub use config::{GeneratorConfig, DEFAULT_OUT_DIR};
pub use emit::{
    corpus_entries, emit, expand_twins, write_corpus, DirectoryWriter, MemoryWriter, SeedWriter,
};
pub use error::{CorpusError, Result};
pub use manifest::{CorpusManifest, ManifestEntry};
pub use report::CorpusReport;
pub use seed::{ModeSelector, Seed, SeedEntry};

use tracing::info;

/// Generates every seed and writes it under `config.out_dir`, plus the
/// manifest when `config.manifest_path` is set.
///
/// # Errors
/// Returns the first encoding, I/O or manifest error encountered.
pub fn generate_corpus(config: &GeneratorConfig) -> Result<CorpusManifest> {
    let seeds = generator::generate()?;
    let mut writer = DirectoryWriter::create(&config.out_dir)?;
    let manifest = write_corpus(&mut writer, seeds, config)?;

    if let Some(path) = &config.manifest_path {
        manifest.save(path)?;
        info!(path = %path.display(), "Wrote corpus manifest");
    }
    Ok(manifest)
}
