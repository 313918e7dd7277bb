//! # Vault Sampler
//!
//! Deterministic file sampling over a note vault, for migration planning.
//!
//! ## Pipeline
//!
//! ```text
//! Root directory
//!     │
//!     ├──> Scanner (extension + exclude filters, stable order)
//!     │      └─> Candidate paths
//!     │
//!     ├──> Characteristic Extractor (bounded content prefix)
//!     │      └─> Path -> FileCharacteristics
//!     │
//!     ├──> Sampler (stratified or farthest-point, seeded RNG)
//!     │      └─> Selected subset
//!     │
//!     └──> Reporter
//!            └─> sample_analysis.md / obsidian_template.md / sample.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use vault_sampler::{FileSampler, SampleReporter, SamplerConfig};
//!
//! fn main() -> vault_sampler::Result<()> {
//!     let mut sampler = FileSampler::new("/path/to/vault", SamplerConfig::default())?;
//!     sampler.scan_files();
//!
//!     let sample = sampler.diverse_sample(100);
//!     let reporter = SampleReporter::new(sampler.root(), sampler.files().len());
//!     reporter.write_all(&sample, std::path::Path::new("reports"), None)?;
//!     Ok(())
//! }
//! ```

mod characteristics;
mod distance;
mod error;
mod report;
mod sampler;
mod scanner;

pub use characteristics::{
    has_yaml_frontmatter, AgeBucket, CharacteristicExtractor, ContentHint, FileCharacteristics,
    LengthBucket, SizeCategory, ROOT_DIRECTORY_LABEL,
};
pub use distance::distance;
pub use error::{Result, SamplerError};
pub use report::{ReportPaths, SampleReporter};
pub use sampler::{CharacteristicsMap, FileSampler, Sample, SamplerConfig, StrataKey};
pub use scanner::{relative_posix, VaultScanner};
