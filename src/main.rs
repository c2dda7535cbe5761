use anyhow::{Context, Result};
use cli::{BuildArgs, Cli, ConfigArgs};
use config::{Configuration, DEFAULT_CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod cover;
mod edition;
mod epub;
mod error;
mod markdown;
mod organize;
mod pipeline;
mod source;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        cli::Commands::Config(args) => write_config(args),
        cli::Commands::Build(args) => build(args),
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Configuration> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
        None => {
            log::info!("No {DEFAULT_CONFIG_FILE}, using the default configuration");
            return Ok(Configuration::default());
        }
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to load {} contents", path.display()))?;
    let config: Configuration = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn write_config(args: &ConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists, pass --force to overwrite it",
            args.output.display()
        );
    }

    let contents = toml::to_string_pretty(&Configuration::default())
        .with_context(|| "Failed to serialize configuration")?;
    std::fs::write(&args.output, contents)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "{} configuration written to {}",
        console::style("✓").green(),
        args.output.display()
    );
    Ok(())
}

fn build(args: &BuildArgs) -> Result<()> {
    println!("Loading configuration...");
    let config = load_config(args.config.as_deref())?;

    let options = pipeline::BuildOptions {
        repository: args.repo_path.clone(),
        output: args.output.clone(),
        cover: args.cover.clone(),
        edition: args.edition.clone(),
    };

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .with_context(|| "Failed to parse progress style")?
            .progress_chars("#>-"),
    );
    progress.set_message("Reading handbook...");

    let summary = match pipeline::run(&options, &config, &progress) {
        Ok(summary) => summary,
        Err(e) => {
            progress.abandon_with_message(format!("Build stopped in the {} stage", e.stage()));
            return Err(e.into());
        }
    };

    let size = byte_unit::Byte::from_u64(summary.bytes)
        .get_appropriate_unit(byte_unit::UnitType::Binary);

    println!();
    println!("  EPUB:     {}", summary.output.display());
    println!("  Edition:  {}", summary.label);
    println!("  Parts:    {}", summary.parts);
    println!("  Chapters: {}", summary.chapters);
    println!("  Words:    {}", summary.words);
    println!("  Cover:    {}", summary.cover);
    if let Some(commit) = &summary.commit {
        println!("  Commit:   {} ({})", commit.short_hash(), commit.date_human());
    }
    println!("  Size:     {size:.2}");
    if !summary.skipped.is_empty() {
        println!(
            "\n{} {} files without front-matter were skipped",
            console::style("!").yellow(),
            summary.skipped.len()
        );
    }

    Ok(())
}
