use clap::Parser;

use webclass2qti::cli::Cli;
use webclass2qti::config::{ConvertOptions, FileConfig};
use webclass2qti::{convert_archive, ConvertError, Pandoc};

fn main() {
    let cli = Cli::parse();

    let _ = env_logger::builder()
        .filter_module("webclass2qti", cli.log_level())
        .format_timestamp(None)
        .try_init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), ConvertError> {
    // Defaults < config file < flags
    let file = FileConfig::discover(cli.config.as_deref())?;
    let options = ConvertOptions::resolve(file, cli.overrides());
    log::debug!("{:?}", options);

    let pandoc = Pandoc::new(&options.pandoc);
    let summary = convert_archive(&cli.input, &cli.output, &options, &pandoc)?;

    log::info!(
        "Converted {} questions from {} ({} skipped, {} images)",
        summary.items,
        summary.manifest.display(),
        summary.skipped,
        summary.images
    );
    Ok(())
}
