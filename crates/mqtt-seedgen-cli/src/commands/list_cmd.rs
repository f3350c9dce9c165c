use anyhow::{Context, Result};
use clap::Args;
use mqtt_seedgen_corpus::generator::generate;
use mqtt_seedgen_corpus::{corpus_entries, CorpusManifest, CorpusReport, GeneratorConfig};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ListCommand {
    #[arg(long, help = "Print the listing as JSON")]
    pub json: bool,

    #[arg(long, help = "Omit the selector-prefixed dyn_ twins")]
    pub no_dynamic: bool,
}

pub fn execute(cmd: ListCommand, verbose: bool, debug: bool) -> Result<()> {
    crate::init_basic_tracing(verbose, debug);

    let seeds = generate().context("Failed to generate seeds")?;
    let config = GeneratorConfig::default().with_dynamic(!cmd.no_dynamic);
    let entries = corpus_entries(seeds, &config);
    debug!(entries = entries.len(), "Listing seed corpus");

    let report = CorpusReport::new(CorpusManifest::from_entries(&entries));
    if cmd.json {
        println!(
            "{}",
            report
                .generate_json()
                .context("Failed to serialize corpus listing")?
        );
    } else {
        print!("{}", report.generate_text());
    }
    Ok(())
}
