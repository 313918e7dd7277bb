//! Sample and analyze markdown/yaml files for Obsidian migration planning.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use vault_sampler::{FileSampler, SampleReporter, SamplerConfig, StrataKey};

/// Exit code when no files match the include-extension filter.
const EXIT_NO_FILES: i32 = 2;

#[derive(Parser)]
#[command(name = "vault-sample")]
#[command(about = "Sample and analyze markdown/yaml files for Obsidian migration", long_about = None)]
#[command(version)]
struct Cli {
    /// Root directory to scan
    #[arg(long)]
    root: PathBuf,

    /// Number of files to sample
    #[arg(long, default_value_t = 100)]
    sample_size: usize,

    /// Sampling strategy: by top-level directory, by a characteristic, or
    /// diverse
    #[arg(long, value_enum, default_value_t = StrategyFlag::Diverse)]
    strategy: StrategyFlag,

    /// Characteristic to stratify by when using --strategy char
    #[arg(long, value_enum, default_value_t = StrataKeyFlag::Directory)]
    strata_key: StrataKeyFlag,

    /// File extensions (without dot) to include
    #[arg(long, num_args = 0.., default_values_t = ["md".to_string(), "yml".to_string(), "yaml".to_string()])]
    include_ext: Vec<String>,

    /// Directory names to exclude from scanning
    #[arg(long, num_args = 0.., default_values_t = [
        ".git".to_string(),
        "node_modules".to_string(),
        "dist".to_string(),
        "build".to_string(),
        "venv".to_string(),
        ".venv".to_string(),
        "__pycache__".to_string(),
    ])]
    exclude_dirs: Vec<String>,

    /// Directory to write reports and JSON output
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Explicit path for JSON output (defaults to output-dir/sample.json)
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Random seed for determinism
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Max candidate files to consider per step in diverse sampling
    #[arg(long, default_value_t = 500)]
    max_candidates: usize,

    /// Maximum number of bytes to read from each file for content analysis
    #[arg(long, default_value_t = 2048)]
    max_read_bytes: usize,

    /// Follow symlinks during scanning (disabled by default for safety)
    #[arg(long)]
    follow_symlinks: bool,

    /// Logging level
    #[arg(long, value_enum, default_value_t = LogLevelFlag::Info)]
    log_level: LogLevelFlag,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StrategyFlag {
    /// Stratified by top-level directory
    Dir,
    /// Stratified by the chosen characteristic
    Char,
    /// Greedy farthest-point diversity
    Diverse,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum StrataKeyFlag {
    Directory,
    Extension,
    SizeCategory,
    Age,
    Length,
    HasFrontmatter,
}

impl StrataKeyFlag {
    const fn as_domain(self) -> StrataKey {
        match self {
            Self::Directory => StrataKey::Directory,
            Self::Extension => StrataKey::Extension,
            Self::SizeCategory => StrataKey::SizeCategory,
            Self::Age => StrataKey::Age,
            Self::Length => StrataKey::Length,
            Self::HasFrontmatter => StrataKey::HasFrontmatter,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogLevelFlag {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelFlag {
    const fn as_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(args.log_level.as_filter())
        .target(env_logger::Target::Stderr)
        .init();

    let config = SamplerConfig {
        include_extensions: args.include_ext.clone(),
        exclude_dirs: args.exclude_dirs.clone(),
        max_read_bytes: args.max_read_bytes,
        follow_symlinks: args.follow_symlinks,
        seed: args.seed,
        max_candidates: args.max_candidates,
    };

    let mut sampler = FileSampler::new(&args.root, config)
        .with_context(|| format!("Invalid root directory: {}", args.root.display()))?;

    sampler.scan_files();
    if sampler.files().is_empty() {
        log::error!(
            "No files found under {} with extensions: {}",
            args.root.display(),
            args.include_ext.join(", ")
        );
        std::process::exit(EXIT_NO_FILES);
    }

    let sample = match args.strategy {
        StrategyFlag::Dir => sampler.stratified_sample(args.sample_size, StrataKey::Directory),
        StrategyFlag::Char => {
            sampler.stratified_sample(args.sample_size, args.strata_key.as_domain())
        }
        StrategyFlag::Diverse => sampler.diverse_sample(args.sample_size),
    };

    let reporter = SampleReporter::new(sampler.root(), sampler.files().len());
    let paths = reporter
        .write_all(&sample, &args.output_dir, args.json_out.as_deref())
        .context("Failed to write reports")?;

    log::info!("Analysis written to {}", paths.analysis.display());
    log::info!("Template suggestions written to {}", paths.template.display());
    log::info!("JSON sample written to {}", paths.json.display());
    log::info!("Selected {} files for manual review", sample.files.len());

    Ok(())
}
