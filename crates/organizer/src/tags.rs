use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::classify::{extra_tags, ContentKind};

static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([a-zA-Z0-9_]+)").expect("valid hashtag regex"));
static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([a-zA-Z0-9_]+)").expect("valid mention regex"));
static TAG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid tag regex"));

/// Folder names along the staging-relative path of `file`, as tags.
///
/// Files outside the staging directory yield no folder tags.
#[must_use]
pub fn folder_tags(file: &Path, staging_dir: &Path) -> Vec<String> {
    let Ok(relative) = file.strip_prefix(staging_dir) else {
        return Vec::new();
    };
    let Some(parent) = relative.parent() else {
        return Vec::new();
    };

    parent
        .components()
        .filter_map(|component| {
            let raw = component.as_os_str().to_string_lossy().to_lowercase();
            let tag = raw.replace([' ', '-'], "_");
            let tag: String = tag
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if tag.is_empty() {
                None
            } else {
                Some(tag)
            }
        })
        .collect()
}

/// Tags found in content: `#hashtag` and `@mention` patterns, in
/// first-occurrence order, deduplicated.
#[must_use]
pub fn content_tags(content: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for captures in HASHTAG.captures_iter(content) {
        push_unique(&mut tags, captures[1].to_string());
    }
    for captures in MENTION.captures_iter(content) {
        push_unique(&mut tags, captures[1].to_string());
    }
    tags
}

/// Merge kind, folder and content tags into one deduplicated list,
/// preserving order of first appearance.
#[must_use]
pub fn combine_tags(kind: ContentKind, folder: &[String], content: &[String]) -> Vec<String> {
    let mut tags = vec![kind.as_str().to_string()];
    for tag in folder.iter().chain(content.iter()) {
        push_unique(&mut tags, tag.clone());
    }
    for extra in extra_tags(kind) {
        push_unique(&mut tags, (*extra).to_string());
    }
    tags
}

/// Normalize a tag to lowercase safe characters.
#[must_use]
pub fn sanitize_tag(tag: &str) -> String {
    TAG_CHARS.replace_all(tag, "").to_lowercase().trim().to_string()
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn folder_tags_come_from_the_relative_parent_path() {
        let staging = Path::new("/staging");
        let file = Path::new("/staging/Work Projects/sub-topic/note.md");
        assert_eq!(folder_tags(file, staging), vec!["work_projects", "sub_topic"]);
    }

    #[test]
    fn root_level_files_have_no_folder_tags() {
        let staging = Path::new("/staging");
        assert!(folder_tags(Path::new("/staging/note.md"), staging).is_empty());
        assert!(folder_tags(Path::new("/elsewhere/note.md"), staging).is_empty());
    }

    #[test]
    fn content_tags_preserve_first_occurrence_order() {
        let content = "Work on #rust today with @alice, then more #rust and #cli";
        assert_eq!(content_tags(content), vec!["rust", "cli", "alice"]);
    }

    #[test]
    fn combine_tags_deduplicates_preserving_order() {
        let folder = vec!["work".to_string(), "project".to_string()];
        let content = vec!["rust".to_string()];
        let tags = combine_tags(ContentKind::Project, &folder, &content);
        assert_eq!(tags, vec!["project", "work", "rust"]);
    }

    #[test]
    fn daily_kind_appends_its_extra_tag() {
        let tags = combine_tags(ContentKind::Daily, &[], &[]);
        assert_eq!(tags, vec!["daily", "daily-note"]);
    }

    #[test]
    fn sanitize_tag_strips_punctuation() {
        assert_eq!(sanitize_tag("My Tag!"), "mytag");
        assert_eq!(sanitize_tag("ALREADY_ok-1"), "already_ok-1");
    }
}
