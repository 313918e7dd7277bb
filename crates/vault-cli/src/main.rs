//! Organize staged documents into a PARA-structured Obsidian vault.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use vault_convert::{Converter, PandocConverter, TextConverter};
use vault_organizer::{
    classifier_for, is_obsidian_vault, staged_files, BatchSummary, ClassifierMode, FileProcessor,
    VaultConfig, DEFAULT_CONFIG_PATH,
};

#[derive(Parser)]
#[command(name = "vault-organize")]
#[command(about = "Organize staged documents into a PARA-structured Obsidian vault", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the vault configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the vault path and create the PARA folder structure
    Setup(SetupArgs),

    /// Validate the configuration and vault layout
    Validate,

    /// Convert and file every staged document into the vault
    Process(ProcessArgs),

    /// Convert staged documents to markdown without filing them
    Convert(ConvertArgs),
}

#[derive(Args)]
struct SetupArgs {
    /// Vault directory (must contain a .obsidian folder)
    #[arg(long)]
    vault_path: Option<PathBuf>,
}

#[derive(Args)]
struct ProcessArgs {
    /// Staging directory holding documents to file
    staging: PathBuf,

    /// Delete original files after their notes are safely written
    #[arg(long)]
    delete_original: bool,

    /// Classifier implementation to use
    #[arg(long, value_enum, default_value_t = ClassifierFlag::Weighted)]
    classifier: ClassifierFlag,
}

#[derive(Args)]
struct ConvertArgs {
    /// Directory holding documents to convert in place
    dir: PathBuf,
}

#[derive(Copy, Clone, ValueEnum)]
enum ClassifierFlag {
    /// First-match keyword rules
    Basic,
    /// Scored filename + structure + keyword layers
    Weighted,
}

impl ClassifierFlag {
    const fn as_domain(self) -> ClassifierMode {
        match self {
            Self::Basic => ClassifierMode::Basic,
            Self::Weighted => ClassifierMode::Weighted,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Setup(args) => run_setup(args, &cli.config),
        Commands::Validate => run_validate(&cli.config),
        Commands::Process(args) => run_process(args, &cli.config),
        Commands::Convert(args) => run_convert(args),
    }
}

fn run_setup(args: SetupArgs, config_path: &Path) -> Result<()> {
    let mut config = VaultConfig::load(config_path);

    if let Some(vault_path) = args.vault_path {
        let vault_path = vault_path
            .canonicalize()
            .with_context(|| format!("Vault path does not exist: {}", vault_path.display()))?;
        if !is_obsidian_vault(&vault_path) {
            log::warn!(
                "{} has no .obsidian folder yet; creating one",
                vault_path.display()
            );
            std::fs::create_dir_all(vault_path.join(".obsidian"))?;
        }
        config.vault_path = Some(vault_path.clone());
        config.save(config_path)?;
        log::info!("Vault configured: {}", vault_path.display());
    }

    let created = config.setup_structure()?;
    for folder in &created {
        log::debug!("Ensured folder: {}", folder.display());
    }
    eprintln!("Vault structure ready ({} folders)", created.len());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<()> {
    let config = VaultConfig::load(config_path);
    let issues = config.validate();

    if issues.is_empty() {
        eprintln!("Configuration is valid.");
        return Ok(());
    }

    eprintln!("Configuration issues found:");
    for issue in &issues {
        eprintln!("  - {issue}");
    }
    std::process::exit(1);
}

fn run_process(args: ProcessArgs, config_path: &Path) -> Result<()> {
    let staging = args
        .staging
        .canonicalize()
        .with_context(|| format!("Invalid staging directory: {}", args.staging.display()))?;

    let config = VaultConfig::load(config_path);
    let processor = FileProcessor::new(&config, classifier_for(args.classifier.as_domain()));

    let files = staged_files(&staging);
    if files.is_empty() {
        eprintln!("Nothing to process under {}", staging.display());
        return Ok(());
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .context("valid progress template")?,
    );

    let mut summary = BatchSummary::default();
    for file in &files {
        bar.set_message(
            file.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        match processor.process_file(file, &staging, args.delete_original) {
            Ok(outcome) => summary.record(&outcome),
            Err(e) => {
                log::error!("Failed processing {}: {e}", file.display());
                summary.record_failure();
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    eprintln!(
        "Processed {} files: {} created, {} existing, {} skipped, {} failed",
        summary.processed, summary.created, summary.already_exists, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let dir = args
        .dir
        .canonicalize()
        .with_context(|| format!("Invalid directory: {}", args.dir.display()))?;

    let text = TextConverter::new();
    let pandoc = match PandocConverter::new() {
        Ok(converter) => Some(converter),
        Err(e) => {
            log::info!("{e}; converting plain text only");
            None
        }
    };

    let mut converted = 0usize;
    let mut failed = 0usize;
    for file in staged_files(&dir) {
        let converter: Option<&dyn Converter> = if text.can_convert(&file) {
            Some(&text)
        } else {
            pandoc
                .as_ref()
                .filter(|p| p.can_convert(&file))
                .map(|p| p as &dyn Converter)
        };
        let Some(converter) = converter else {
            continue;
        };
        match converter.convert(&file) {
            Ok(md_path) => {
                log::debug!("{} -> {}", file.display(), md_path.display());
                converted += 1;
            }
            Err(e) => {
                log::error!("Failed converting {}: {e}", file.display());
                failed += 1;
            }
        }
    }

    eprintln!("Converted {converted} files ({failed} failed)");
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
