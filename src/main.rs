use anyhow::{bail, Context, Result};
use cli::Cli;
use folio::report::{self, ReportConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

mod cli;

const DEFAULT_CONFIG: &str = "folio.toml";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => ReportConfig::load(DEFAULT_CONFIG),
        None => {
            log::info!("no {DEFAULT_CONFIG} found, using defaults");
            Ok(ReportConfig::default())
        }
    }
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    let config = toml::to_string_pretty(&ReportConfig::default())
        .with_context(|| "Failed to convert configuration to TOML")?;
    std::fs::write(path, config).with_context(|| "Failed to write configuration file")?;
    println!("{} written!", path.display());
    Ok(())
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Config { path, force } => write_config(path, *force),
        cli::Commands::Render { config, output } => {
            println!("Loading configuration...");
            let mut config = load_config(config.as_deref())?;
            if let Some(output) = output {
                config.outfile = output.clone();
            }

            let progress = ProgressBar::new_spinner();
            progress.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .with_context(|| "Failed to parse progress style")?,
            );
            progress.enable_steady_tick(Duration::from_millis(100));

            let stats = report::render(&config, &progress);
            progress.finish_and_clear();
            let stats = stats.with_context(|| "Failed to render report")?;

            println!();
            println!("  Report PDF:  {}", config.outfile.display());
            println!("  Page size:   {}", config.page_size);
            println!(
                "  Pages:       {} ({} front, {} contents, {} body)",
                stats.page_count,
                stats.front_pages,
                stats.toc_pages,
                stats.page_count - stats.front_pages - stats.toc_pages
            );
            println!("  Size:        {} bytes", stats.bytes);
            Ok(())
        }
    }
}
