use anyhow::{Context, Result};
use clap::Args;
use mqtt_seedgen_corpus::{generate_corpus, GeneratorConfig, DEFAULT_OUT_DIR};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct GenerateCommand {
    #[arg(long, short, default_value = DEFAULT_OUT_DIR, help = "Output directory for the seed corpus")]
    pub out: PathBuf,

    #[arg(long, help = "Skip the selector-prefixed dyn_ twins")]
    pub no_dynamic: bool,

    #[arg(long, value_name = "PATH", help = "Also write a TOML manifest of the corpus")]
    pub manifest: Option<PathBuf>,
}

pub fn execute(cmd: GenerateCommand, verbose: bool, debug: bool) -> Result<()> {
    crate::init_basic_tracing(verbose, debug);

    let out_dir = std::path::absolute(&cmd.out)
        .with_context(|| format!("Failed to resolve output directory {}", cmd.out.display()))?;

    let mut config = GeneratorConfig::new(&out_dir).with_dynamic(!cmd.no_dynamic);
    if let Some(path) = cmd.manifest {
        config = config.with_manifest_path(path);
    }
    debug!(?config, "Generating seed corpus");

    let manifest = generate_corpus(&config)
        .with_context(|| format!("Failed to generate seeds in {}", out_dir.display()))?;
    info!(
        seeds = manifest.len(),
        twins = manifest.twin_count(),
        "Seed corpus complete"
    );

    println!("Generated seeds in: {}", out_dir.display());
    Ok(())
}
