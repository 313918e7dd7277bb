use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directory label used for files sitting directly under the scan root.
pub const ROOT_DIRECTORY_LABEL: &str = "root";

/// Byte-size bucket thresholds.
const SMALL_MAX_BYTES: u64 = 1024;
const MEDIUM_MAX_BYTES: u64 = 10_240;

/// Modification-age bucket thresholds, in days.
const RECENT_MAX_DAYS: u64 = 30;
const THIS_YEAR_MAX_DAYS: u64 = 365;

/// Word-count bucket thresholds, counted over the bounded prefix.
const SHORT_MAX_WORDS: usize = 100;
const MEDIUM_MAX_WORDS: usize = 500;

/// Ordinal size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    #[must_use]
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes < SMALL_MAX_BYTES {
            Self::Small
        } else if bytes < MEDIUM_MAX_BYTES {
            Self::Medium
        } else {
            Self::Large
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Position on the 3-value scale, for ordinal distances.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }
}

/// Ordinal modification-age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    Recent,
    ThisYear,
    Old,
}

impl AgeBucket {
    #[must_use]
    pub fn from_days(days: u64) -> Self {
        if days < RECENT_MAX_DAYS {
            Self::Recent
        } else if days < THIS_YEAR_MAX_DAYS {
            Self::ThisYear
        } else {
            Self::Old
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::ThisYear => "this_year",
            Self::Old => "old",
        }
    }

    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Recent => 0,
            Self::ThisYear => 1,
            Self::Old => 2,
        }
    }
}

/// Ordinal content-length bucket (word count over the read window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    #[must_use]
    pub fn from_words(words: usize) -> Self {
        if words < SHORT_MAX_WORDS {
            Self::Short
        } else if words < MEDIUM_MAX_WORDS {
            Self::Medium
        } else {
            Self::Long
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Short => 0,
            Self::Medium => 1,
            Self::Long => 2,
        }
    }
}

/// Coarse topical label attached to a file from keyword presence.
///
/// Variants are declared in alphabetical order so the derived `Ord` yields
/// the sorted label sequence required of `content_hints`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentHint {
    Meeting,
    Personal,
    Project,
    Research,
    Todo,
}

impl ContentHint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Personal => "personal",
            Self::Project => "project",
            Self::Research => "research",
            Self::Todo => "todo",
        }
    }
}

/// Keyword lists per hint category, matched case-insensitively as
/// substrings of the bounded content prefix.
const HINT_KEYWORDS: &[(ContentHint, &[&str])] = &[
    (ContentHint::Meeting, &["meeting", "agenda", "minutes", "attendees"]),
    (ContentHint::Project, &["project", "milestone", "deadline", "task"]),
    (ContentHint::Research, &["research", "study", "analysis", "findings"]),
    (ContentHint::Personal, &["personal", "family", "health", "finance"]),
    (ContentHint::Todo, &["todo", "task", "action", "- [ ]", "checkbox"]),
];

// A closing delimiter line terminated by newline-or-end-of-window.
static FRONTMATTER_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n---(\r?\n|$)").expect("valid frontmatter regex"));

/// Immutable per-file feature record keyed by file path.
///
/// A pure function of (path, stat, bounded content prefix) at read time;
/// rebuilt on every run, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCharacteristics {
    /// Directory levels below the scan root.
    pub depth: usize,

    /// Top-level directory name relative to root, or `root` for root-level
    /// files.
    pub directory: String,

    /// Lowercase file extension without the dot.
    pub extension: String,

    pub size_category: SizeCategory,
    pub age: AgeBucket,
    pub length: LengthBucket,

    /// True iff the read window starts with a `---` line and contains a
    /// matching closing `---` line.
    pub has_frontmatter: bool,

    /// Sorted, deduplicated hint labels.
    pub content_hints: Vec<ContentHint>,
}

/// Computes `FileCharacteristics` records from bounded file reads.
pub struct CharacteristicExtractor {
    root: PathBuf,
    max_read_bytes: usize,
}

impl CharacteristicExtractor {
    pub fn new(root: impl Into<PathBuf>, max_read_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_read_bytes,
        }
    }

    /// Extract characteristics for a single file.
    ///
    /// Stat and read failures degrade the record to safe defaults with a
    /// logged warning; they never abort the batch.
    pub fn analyze(&self, path: &Path) -> FileCharacteristics {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let parts: Vec<_> = relative.components().collect();
        let depth = parts.len().saturating_sub(1);
        let directory = if parts.len() > 1 {
            parts[0].as_os_str().to_string_lossy().into_owned()
        } else {
            ROOT_DIRECTORY_LABEL.to_string()
        };

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let (size_bytes, mtime) = match fs::metadata(path) {
            Ok(meta) => (
                meta.len(),
                meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            ),
            Err(e) => {
                log::warn!("Failed to stat {}: {e}", path.display());
                (0, SystemTime::UNIX_EPOCH)
            }
        };
        let size_category = SizeCategory::from_bytes(size_bytes);

        let age_days = SystemTime::now()
            .duration_since(mtime)
            .map(|elapsed| elapsed.as_secs() / 86_400)
            .unwrap_or(0);
        let age = AgeBucket::from_days(age_days);

        let mut has_frontmatter = false;
        let mut length = LengthBucket::Short;
        let mut hints: BTreeSet<ContentHint> = BTreeSet::new();
        if let Some(content) = self.read_prefix(path) {
            has_frontmatter = has_yaml_frontmatter(&content);
            length = LengthBucket::from_words(content.split_whitespace().count());

            let content_lower = content.to_lowercase();
            for (hint, keywords) in HINT_KEYWORDS {
                if keywords.iter().any(|kw| content_lower.contains(kw)) {
                    hints.insert(*hint);
                }
            }
        }

        FileCharacteristics {
            depth,
            directory,
            extension,
            size_category,
            age,
            length,
            has_frontmatter,
            content_hints: hints.into_iter().collect(),
        }
    }

    /// Read at most `max_read_bytes` bytes, decoding with replacement on
    /// invalid UTF-8.
    fn read_prefix(&self, path: &Path) -> Option<String> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Permission or read failure opening {}: {e}", path.display());
                return None;
            }
        };
        let mut buffer = Vec::new();
        if let Err(e) = file.take(self.max_read_bytes as u64).read_to_end(&mut buffer) {
            log::warn!("Failed to read {}: {e}", path.display());
            return None;
        }
        Some(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// True iff `text` starts with a `---` delimiter line and contains a
/// closing `---` line within the window. A `---` appearing only as body
/// text later does not count.
pub fn has_yaml_frontmatter(text: &str) -> bool {
    text.starts_with("---") && FRONTMATTER_CLOSE.is_match(&text[3..])
}
