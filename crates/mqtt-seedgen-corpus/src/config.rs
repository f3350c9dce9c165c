use std::path::PathBuf;

pub const DEFAULT_OUT_DIR: &str = "tools/fuzz/mqtt_client/seeds";

/// Controls where and how a corpus is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub out_dir: PathBuf,
    /// Also emit a selector-prefixed `dyn_` twin for every phase-targeted seed.
    pub dynamic: bool,
    /// Where to write the TOML manifest, if anywhere.
    pub manifest_path: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            dynamic: true,
            manifest_path: None,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }
}
