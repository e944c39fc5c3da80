use anyhow::Context;
use polishkit::{dry_run, init_logging, Config, BUILD_DATE, VERSION};
use std::path::PathBuf;
use tracing::info;

const USAGE: &str = "usage: polishkit [config] <labels> <craft>";

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("PolishKit {} (built {})", VERSION, BUILD_DATE);

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, labels_path, craft) = match args.len() {
        2 => {
            let craft = args.remove(1);
            let labels = args.remove(0);
            (Config::default_path()?, PathBuf::from(labels), craft)
        }
        3 => {
            let craft = args.remove(2);
            let labels = args.remove(1);
            let config = args.remove(0);
            (PathBuf::from(config), PathBuf::from(labels), craft)
        }
        _ => anyhow::bail!(USAGE),
    };

    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Loading {}", config_path.display()))?;
    let labels = std::fs::read_to_string(&labels_path)
        .with_context(|| format!("Reading {}", labels_path.display()))?;

    let report = dry_run(&config, &labels, &craft)?;
    info!(
        "Finished at {} with {} moves ({} suppressed, {} failed)",
        report.exit, report.issued, report.suppressed, report.failed
    );
    Ok(())
}
