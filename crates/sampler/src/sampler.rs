use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::characteristics::{CharacteristicExtractor, FileCharacteristics};
use crate::distance::distance;
use crate::error::{Result, SamplerError};
use crate::scanner::VaultScanner;

/// Map from scanned path to its characteristic record.
pub type CharacteristicsMap = BTreeMap<PathBuf, FileCharacteristics>;

/// A selected subset plus the full characteristic map it was drawn from.
pub struct Sample {
    pub files: Vec<PathBuf>,
    pub characteristics: CharacteristicsMap,
}

/// Characteristic a stratified draw partitions by.
///
/// An explicit enumeration of keys mapped to accessors; strata labels are
/// produced here rather than through any reflective field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrataKey {
    Directory,
    Extension,
    SizeCategory,
    Age,
    Length,
    HasFrontmatter,
}

impl StrataKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Extension => "extension",
            Self::SizeCategory => "size_category",
            Self::Age => "age",
            Self::Length => "length",
            Self::HasFrontmatter => "has_frontmatter",
        }
    }

    /// Stratum label of a record under this key.
    #[must_use]
    pub fn label_for(self, chars: &FileCharacteristics) -> String {
        match self {
            Self::Directory => chars.directory.clone(),
            Self::Extension => chars.extension.clone(),
            Self::SizeCategory => chars.size_category.as_str().to_string(),
            Self::Age => chars.age.as_str().to_string(),
            Self::Length => chars.length.as_str().to_string(),
            Self::HasFrontmatter => chars.has_frontmatter.to_string(),
        }
    }
}

/// Knobs for scanning and sampling.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Extensions (without dot, case-insensitive) to include.
    pub include_extensions: Vec<String>,

    /// Directory names pruned at any nesting level.
    pub exclude_dirs: Vec<String>,

    /// Content-prefix cap for characteristic extraction.
    pub max_read_bytes: usize,

    /// Follow symlinks during scanning (off by default for safety).
    pub follow_symlinks: bool,

    /// RNG seed; equal seeds over equal file sets give equal selections.
    pub seed: u64,

    /// Candidate-pool cap per diverse-sampling step.
    pub max_candidates: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            include_extensions: vec!["md".into(), "yml".into(), "yaml".into()],
            exclude_dirs: vec![
                ".git".into(),
                "node_modules".into(),
                "dist".into(),
                "build".into(),
                "venv".into(),
                ".venv".into(),
                "__pycache__".into(),
            ],
            max_read_bytes: 2048,
            follow_symlinks: false,
            seed: 0,
            max_candidates: 500,
        }
    }
}

impl SamplerConfig {
    /// Validate configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_candidates == 0 {
            return Err("max_candidates must be > 0".to_string());
        }
        if self.max_read_bytes == 0 {
            return Err("max_read_bytes must be > 0".to_string());
        }
        Ok(())
    }
}

/// Deterministic file sampler over a scanned vault.
///
/// Owns its seeded RNG; all randomness flows through it, never through
/// global state. Every run rescans from disk; there is no persisted cache.
pub struct FileSampler {
    root: PathBuf,
    scanner: VaultScanner,
    extractor: CharacteristicExtractor,
    rng: StdRng,
    max_candidates: usize,
    files: Vec<PathBuf>,
}

impl FileSampler {
    /// Build a sampler rooted at `root`.
    ///
    /// Fails fast on a nonexistent or non-directory root and on an invalid
    /// configuration; everything past this point degrades per-file instead
    /// of aborting.
    pub fn new(root: impl AsRef<Path>, config: SamplerConfig) -> Result<Self> {
        config.validate().map_err(SamplerError::InvalidConfig)?;

        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|_| SamplerError::InvalidRoot(root.display().to_string()))?;
        if !root.is_dir() {
            return Err(SamplerError::InvalidRoot(root.display().to_string()));
        }

        let scanner = VaultScanner::new(
            &root,
            &config.include_extensions,
            &config.exclude_dirs,
            config.follow_symlinks,
        );
        let extractor = CharacteristicExtractor::new(&root, config.max_read_bytes);

        Ok(Self {
            root,
            scanner,
            extractor,
            rng: StdRng::seed_from_u64(config.seed),
            max_candidates: config.max_candidates,
            files: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths found by the last scan, in stable order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Scan the root and remember the result.
    pub fn scan_files(&mut self) -> &[PathBuf] {
        self.files = self.scanner.scan();
        log::info!("Found {} files", self.files.len());
        &self.files
    }

    fn ensure_scanned(&mut self) {
        if self.files.is_empty() {
            self.scan_files();
        }
    }

    fn characterize_all(&self) -> CharacteristicsMap {
        self.files
            .iter()
            .map(|path| (path.clone(), self.extractor.analyze(path)))
            .collect()
    }

    /// Proportional stratified sample of `sample_size` files by `key`.
    ///
    /// Largest-remainder apportionment over strata in first-seen scan
    /// order, each stratum drawn without replacement preserving input
    /// order. Always returns exactly `min(sample_size, N)` files.
    pub fn stratified_sample(&mut self, sample_size: usize, key: StrataKey) -> Sample {
        self.ensure_scanned();
        let characteristics = self.characterize_all();

        let total = self.files.len();
        let k = sample_size.min(total);
        if k == 0 {
            return Sample {
                files: Vec::new(),
                characteristics,
            };
        }

        // Partition into strata, preserving first-seen order.
        let mut order: Vec<String> = Vec::new();
        let mut index_of: HashMap<String, usize> = HashMap::new();
        let mut strata: Vec<Vec<PathBuf>> = Vec::new();
        for path in &self.files {
            let label = key.label_for(&characteristics[path]);
            let idx = *index_of.entry(label.clone()).or_insert_with(|| {
                order.push(label);
                strata.push(Vec::new());
                strata.len() - 1
            });
            strata[idx].push(path.clone());
        }

        // Proportional base allocation, capped at stratum size.
        let mut allocations = vec![0usize; strata.len()];
        let mut remainders: Vec<(f64, usize)> = Vec::new();
        let mut assigned = 0usize;
        for (idx, stratum) in strata.iter().enumerate() {
            let exact = k as f64 * stratum.len() as f64 / total as f64;
            let base = (exact.floor() as usize).min(stratum.len());
            allocations[idx] = base;
            assigned += base;
            remainders.push((exact - exact.floor(), idx));
        }

        // Distribute leftover slots by largest remainder; the stable sort
        // keeps first-seen order on ties. Extra passes cover strata that
        // filled up, so the min(k, N) guarantee holds.
        remainders.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        let mut remaining = k - assigned;
        while remaining > 0 {
            let mut progressed = false;
            for &(_, idx) in &remainders {
                if remaining == 0 {
                    break;
                }
                if allocations[idx] < strata[idx].len() {
                    allocations[idx] += 1;
                    remaining -= 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        let mut sampled: Vec<PathBuf> = Vec::with_capacity(k);
        for (idx, stratum) in strata.iter().enumerate() {
            let wanted = allocations[idx];
            if wanted == 0 {
                continue;
            }
            log::debug!(
                "Stratum '{}': {} of {} files",
                order[idx],
                wanted,
                stratum.len()
            );
            sampled.extend(self.draw(stratum, wanted));
        }
        sampled.truncate(k);

        Sample {
            files: sampled,
            characteristics,
        }
    }

    /// Greedy farthest-point selection of `sample_size` files.
    ///
    /// Seeds with one uniformly drawn file, then repeatedly adds the
    /// candidate (from a bounded seeded pool) with the largest minimum
    /// distance to the selection. Ties resolve to the earliest pool entry,
    /// which is the lowest relative path in scan order.
    pub fn diverse_sample(&mut self, sample_size: usize) -> Sample {
        self.ensure_scanned();
        let characteristics = self.characterize_all();

        if self.files.is_empty() || sample_size == 0 {
            return Sample {
                files: Vec::new(),
                characteristics,
            };
        }

        let k = sample_size.min(self.files.len());
        let mut remaining: Vec<PathBuf> = self.files.clone();
        let first = self.rng.gen_range(0..remaining.len());
        let mut selected: Vec<PathBuf> = vec![remaining.remove(first)];

        // Min distance from each unselected file to the selected set; only
        // ever decreases as the selection grows.
        let mut min_distance: HashMap<PathBuf, f64> = remaining
            .iter()
            .map(|path| {
                (
                    path.clone(),
                    distance(&characteristics[path], &characteristics[&selected[0]]),
                )
            })
            .collect();

        while selected.len() < k && !remaining.is_empty() {
            let pool_size = self.max_candidates.min(remaining.len());
            let pool = self.draw(&remaining, pool_size);

            let mut best_idx = 0usize;
            let mut best_score = f64::NEG_INFINITY;
            for (idx, path) in pool.iter().enumerate() {
                let score = min_distance.get(path).copied().unwrap_or(0.0);
                if score > best_score {
                    best_score = score;
                    best_idx = idx;
                }
            }
            let best = pool[best_idx].clone();

            if let Some(pos) = remaining.iter().position(|path| *path == best) {
                remaining.remove(pos);
            }
            min_distance.remove(&best);
            for path in &remaining {
                let d = distance(&characteristics[path], &characteristics[&best]);
                match min_distance.get_mut(path) {
                    Some(current) => {
                        if d < *current {
                            *current = d;
                        }
                    }
                    None => {
                        min_distance.insert(path.clone(), d);
                    }
                }
            }
            selected.push(best);
        }

        Sample {
            files: selected,
            characteristics,
        }
    }

    /// Seeded uniform sample without replacement, preserving input order
    /// among the chosen entries.
    fn draw(&mut self, population: &[PathBuf], k: usize) -> Vec<PathBuf> {
        if k == 0 {
            return Vec::new();
        }
        if k >= population.len() {
            return population.to_vec();
        }
        let mut indices: Vec<usize> = (0..population.len()).collect();
        indices.shuffle(&mut self.rng);
        let mut chosen = indices[..k].to_vec();
        chosen.sort_unstable();
        chosen
            .into_iter()
            .map(|idx| population[idx].clone())
            .collect()
    }
}
