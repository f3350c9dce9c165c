//! Persisting seeds, with optional selector-prefixed twins.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::manifest::CorpusManifest;
use crate::seed::{ModeSelector, Seed, SeedEntry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination for corpus entries.
pub trait SeedWriter {
    /// # Errors
    /// Returns the underlying write failure unchanged.
    fn write_seed(&mut self, entry: &SeedEntry) -> Result<()>;
}

/// Writes each entry to `<root>/<name>`.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    root: PathBuf,
}

impl DirectoryWriter {
    /// Creates `root` (and its parents) if it does not exist yet.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be created.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SeedWriter for DirectoryWriter {
    fn write_seed(&mut self, entry: &SeedEntry) -> Result<()> {
        let path = self.root.join(&entry.name);
        fs::write(&path, &entry.bytes)?;
        debug!(path = %path.display(), len = entry.len(), "Wrote seed");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryWriter {
    entries: Vec<SeedEntry>,
}

impl MemoryWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[SeedEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SeedEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

impl SeedWriter for MemoryWriter {
    fn write_seed(&mut self, entry: &SeedEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

/// Persists `entry`, then its `dyn_` twin when `selector` is given.
///
/// The selector is validated before anything is written, so an invalid
/// selector leaves the writer untouched.
///
/// # Errors
/// Returns [`crate::CorpusError::InvalidSelector`] for selectors above 0x0F,
/// or the writer's own failure.
pub fn emit<W: SeedWriter + ?Sized>(
    writer: &mut W,
    entry: &SeedEntry,
    selector: Option<u8>,
) -> Result<()> {
    let twin = selector
        .map(|value| ModeSelector::new(value).map(|selector| entry.twin(selector)))
        .transpose()?;

    writer.write_seed(entry)?;
    if let Some(twin) = twin {
        writer.write_seed(&twin)?;
    }
    Ok(())
}

/// Pipeline stage: each seed followed by its twin when it targets a phase.
pub fn expand_twins<I>(seeds: I) -> impl Iterator<Item = SeedEntry>
where
    I: IntoIterator<Item = Seed>,
{
    seeds.into_iter().flat_map(|seed| {
        let twin = seed.phase.map(|phase| seed.entry.twin(phase));
        std::iter::once(seed.entry).chain(twin)
    })
}

/// Resolves the entries to persist for `seeds` under `config`.
pub fn corpus_entries(seeds: Vec<Seed>, config: &GeneratorConfig) -> Vec<SeedEntry> {
    if config.dynamic {
        expand_twins(seeds).collect()
    } else {
        seeds.into_iter().map(|seed| seed.entry).collect()
    }
}

/// Forwards to the inner writer and keeps what it accepted.
struct Recording<'a, W: ?Sized> {
    inner: &'a mut W,
    written: Vec<SeedEntry>,
}

impl<W: SeedWriter + ?Sized> SeedWriter for Recording<'_, W> {
    fn write_seed(&mut self, entry: &SeedEntry) -> Result<()> {
        self.inner.write_seed(entry)?;
        self.written.push(entry.clone());
        Ok(())
    }
}

/// Emits every seed, with its phase as the twin selector when
/// `config.dynamic` is set, and returns the manifest of what was written.
///
/// # Errors
/// Stops at the first write failure and returns it.
pub fn write_corpus<W: SeedWriter + ?Sized>(
    writer: &mut W,
    seeds: Vec<Seed>,
    config: &GeneratorConfig,
) -> Result<CorpusManifest> {
    let mut recording = Recording {
        inner: writer,
        written: Vec::with_capacity(seeds.len() * 2),
    };
    for seed in &seeds {
        let selector = seed.phase.filter(|_| config.dynamic).map(u8::from);
        emit(&mut recording, &seed.entry, selector)?;
    }

    let manifest = CorpusManifest::from_entries(&recording.written);
    info!(
        seeds = manifest.len(),
        twins = manifest.twin_count(),
        bytes = manifest.total_bytes(),
        "Wrote seed corpus"
    );
    Ok(manifest)
}
