use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("valid heading regex"));
static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_\- ]").expect("valid filename regex"));
static TITLE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(note|document|file):\s*").expect("valid prefix regex"));
static TRAILING_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*$").expect("valid suffix regex"));

/// Lines inspected when falling back to a title-looking first line.
const TITLE_SCAN_LINES: usize = 5;

/// Maximum length of a line accepted as a title.
const TITLE_MAX_CHARS: usize = 100;

/// Extract a meaningful title from content, falling back to the filename.
///
/// The first ATX heading wins; otherwise the first short nonempty line
/// near the top; otherwise the cleaned filename stem in title case.
#[must_use]
pub fn extract_title(content: &str, filename: &str) -> String {
    if let Some(captures) = HEADING.captures(content) {
        return captures[1].trim().to_string();
    }

    for line in content.lines().take(TITLE_SCAN_LINES) {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') && line.chars().count() < TITLE_MAX_CHARS {
            return line.to_string();
        }
    }

    title_from_filename(filename)
}

/// Title derived from the filename alone.
#[must_use]
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    title_case(&sanitize_filename(&stem).replace('_', " "))
}

/// Remove unwanted characters and normalize spaces to underscores.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(name, "")
        .trim()
        .replace(' ', "_")
}

/// Collapse whitespace and strip common prefixes/suffixes from a title.
#[must_use]
pub fn clean_title(title: &str) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_prefix = TITLE_PREFIX.replace(&collapsed, "");
    TRAILING_DASH
        .replace(&without_prefix, "")
        .trim()
        .to_string()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
