use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::config::FolderKind;

/// Content type detected for a staged note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Project,
    Area,
    Daily,
    Resource,
}

impl ContentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Area => "area",
            Self::Daily => "daily",
            Self::Resource => "resource",
        }
    }
}

/// Classification result: the winning kind and how confident the
/// classifier is in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub kind: ContentKind,
    pub confidence: f64,
}

/// Detects the content kind of a file from its name and content.
///
/// Injected as a capability: callers pick an implementation at
/// construction time via [`classifier_for`] instead of consulting any
/// global availability flag.
pub trait ContentClassifier {
    fn classify(&self, path: &Path, content: &str) -> Classification;
}

/// Which classifier implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMode {
    /// First-match keyword rules.
    Basic,
    /// Scored filename + structure + keyword layers.
    Weighted,
}

/// Build the selected classifier implementation.
#[must_use]
pub fn classifier_for(mode: ClassifierMode) -> Box<dyn ContentClassifier> {
    match mode {
        ClassifierMode::Basic => Box::new(PatternClassifier),
        ClassifierMode::Weighted => Box::new(WeightedClassifier),
    }
}

/// PARA folder a content kind files into. Daily notes land in the inbox
/// first and are relocated to the daily-notes folder afterwards.
#[must_use]
pub const fn folder_for(kind: ContentKind) -> FolderKind {
    match kind {
        ContentKind::Daily => FolderKind::Inbox,
        ContentKind::Project => FolderKind::Projects,
        ContentKind::Area => FolderKind::Areas,
        ContentKind::Resource => FolderKind::Resources,
    }
}

/// Extra tags attached for a content kind, beyond the kind label itself.
#[must_use]
pub const fn extra_tags(kind: ContentKind) -> &'static [&'static str] {
    match kind {
        ContentKind::Daily => &["daily-note"],
        ContentKind::Project => &[],
        ContentKind::Area => &[],
        ContentKind::Resource => &[],
    }
}

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"));

const DAILY_FILENAME_MARKERS: &[&str] = &["daily", "journal", "log"];

fn filename_lower(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn looks_like_daily_filename(filename: &str) -> bool {
    DAILY_FILENAME_MARKERS
        .iter()
        .any(|marker| filename.contains(marker))
        || ISO_DATE.is_match(filename)
}

/// First-match keyword rules, fast and permissive.
pub struct PatternClassifier;

/// Keyword rules checked in order; the first kind with any hit wins.
const PATTERN_RULES: &[(ContentKind, &[&str])] = &[
    (
        ContentKind::Project,
        &["project", "goal", "timeline", "deadline", "milestone"],
    ),
    (
        ContentKind::Resource,
        &["note", "idea", "thought", "reference", "study"],
    ),
    (
        ContentKind::Area,
        &["area", "responsibility", "ongoing", "process"],
    ),
    (
        ContentKind::Daily,
        &["daily", "journal", "log", "entry"],
    ),
];

impl ContentClassifier for PatternClassifier {
    fn classify(&self, path: &Path, content: &str) -> Classification {
        if looks_like_daily_filename(&filename_lower(path)) {
            return Classification {
                kind: ContentKind::Daily,
                confidence: 1.0,
            };
        }

        let content_lower = content.to_lowercase();
        for (kind, keywords) in PATTERN_RULES {
            let hit = keywords.iter().any(|kw| content_lower.contains(kw))
                || (*kind == ContentKind::Daily && ISO_DATE.is_match(&content_lower));
            if hit {
                return Classification {
                    kind: *kind,
                    confidence: 0.5,
                };
            }
        }

        Classification {
            kind: ContentKind::Resource,
            confidence: 0.0,
        }
    }
}

/// Scored classifier tuned on real vault content: keyword, filename and
/// structure layers combined with per-kind weights.
pub struct WeightedClassifier;

struct KindProfile {
    kind: ContentKind,
    weight: f64,
    keywords: &'static [&'static str],
    filename_markers: &'static [&'static str],
    structure: &'static Lazy<Regex>,
}

static PROJECT_STRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^#+\s*(goals|objectives|timeline|status|deliverables|requirements)")
        .expect("valid structure regex")
});
static AREA_STRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ongoing|routine|maintenance|responsibility").expect("valid structure regex")
});
static DAILY_STRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d{4}-\d{2}-\d{2}|today|yesterday|tomorrow|reflection")
        .expect("valid structure regex")
});
static RESOURCE_STRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^#+\s*(reference|research|sources|reading)").expect("valid structure regex")
});

static PROFILES: &[KindProfile] = &[
    KindProfile {
        kind: ContentKind::Daily,
        weight: 0.9,
        keywords: &["daily", "journal", "entry", "today", "reflection"],
        filename_markers: &["daily", "journal", "log"],
        structure: &DAILY_STRUCTURE,
    },
    KindProfile {
        kind: ContentKind::Project,
        weight: 0.8,
        keywords: &[
            "project",
            "milestone",
            "deliverable",
            "sprint",
            "deadline",
            "timeline",
            "roadmap",
            "implementation",
        ],
        filename_markers: &["project", "milestone", "sprint", "plan"],
        structure: &PROJECT_STRUCTURE,
    },
    KindProfile {
        kind: ContentKind::Area,
        weight: 0.6,
        keywords: &[
            "area",
            "responsibility",
            "ongoing",
            "process",
            "standard",
            "maintenance",
            "routine",
        ],
        filename_markers: &["area", "process", "routine"],
        structure: &AREA_STRUCTURE,
    },
    KindProfile {
        kind: ContentKind::Resource,
        weight: 0.4,
        keywords: &[
            "note",
            "idea",
            "thought",
            "reference",
            "study",
            "article",
            "information",
            "knowledge",
        ],
        filename_markers: &["note", "reference", "idea"],
        structure: &RESOURCE_STRUCTURE,
    },
];

impl WeightedClassifier {
    fn score(profile: &KindProfile, filename: &str, content_lower: &str) -> f64 {
        let mut score = 0.0;

        let matched = profile
            .keywords
            .iter()
            .filter(|kw| content_lower.contains(*kw))
            .count();
        score += 0.6 * matched as f64 / profile.keywords.len() as f64;

        if profile
            .filename_markers
            .iter()
            .any(|marker| filename.contains(marker))
        {
            score += 0.3;
        }

        if profile.structure.is_match(content_lower) {
            score += 0.2;
        }

        score * profile.weight
    }
}

impl ContentClassifier for WeightedClassifier {
    fn classify(&self, path: &Path, content: &str) -> Classification {
        let filename = filename_lower(path);

        // Dated filenames are daily notes regardless of content.
        if ISO_DATE.is_match(&filename) {
            return Classification {
                kind: ContentKind::Daily,
                confidence: 1.0,
            };
        }

        let content_lower = content.to_lowercase();
        let mut best = Classification {
            kind: ContentKind::Resource,
            confidence: 0.0,
        };
        for profile in PROFILES {
            let score = Self::score(profile, &filename, &content_lower);
            if score > best.confidence {
                best = Classification {
                    kind: profile.kind,
                    confidence: score.min(1.0),
                };
            }
        }
        best
    }
}
