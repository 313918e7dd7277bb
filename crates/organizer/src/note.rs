use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{FolderKind, VaultConfig};
use crate::error::Result;

static INVALID_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid filename regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Timestamp format used in generated frontmatter.
const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Optional frontmatter fields beyond title/tags.
#[derive(Debug, Clone, Default)]
pub struct NoteMetadata {
    /// Creation timestamp; defaults to now when absent.
    pub created: Option<String>,

    /// Workflow status; defaults to `active`.
    pub status: Option<String>,

    /// Original file the note was produced from.
    pub source_file: Option<String>,

    /// Staging folder tags the note came with.
    pub source_folders: Vec<String>,
}

#[derive(Serialize)]
struct Frontmatter<'a> {
    title: &'a str,
    created: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "slice_is_empty")]
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    source_file: Option<&'a str>,
    #[serde(skip_serializing_if = "slice_is_empty")]
    source_folders: &'a [String],
}

fn slice_is_empty(slice: &&[String]) -> bool {
    slice.is_empty()
}

/// Convert a title into a valid `.md` filename.
#[must_use]
pub fn title_to_filename(title: &str) -> String {
    let stripped = INVALID_FILENAME_CHARS.replace_all(title, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    format!("{}.md", collapsed.trim_matches('-'))
}

/// Render a complete note: YAML frontmatter, H1 title, body.
pub fn render_note(
    title: &str,
    body: &str,
    tags: &[String],
    metadata: &NoteMetadata,
) -> Result<String> {
    let now = Local::now().format(CREATED_FORMAT).to_string();
    let frontmatter = Frontmatter {
        title,
        created: metadata.created.as_deref().unwrap_or(&now),
        status: metadata.status.as_deref().unwrap_or("active"),
        tags,
        source_file: metadata.source_file.as_deref(),
        source_folders: &metadata.source_folders,
    };
    let yaml = serde_yaml::to_string(&frontmatter)?;

    let mut note = String::new();
    note.push_str("---\n");
    note.push_str(&yaml);
    note.push_str("---\n\n");
    note.push_str(&format!("# {title}\n\n"));
    note.push_str(body.trim_start_matches('\n'));
    if !note.ends_with('\n') {
        note.push('\n');
    }
    Ok(note)
}

/// Outcome of a note-write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    Created(PathBuf),
    /// A note with that filename already exists; nothing was written.
    AlreadyExists(PathBuf),
}

/// Writes frontmatter notes into the vault's PARA folders.
pub struct NoteWriter<'a> {
    config: &'a VaultConfig,
}

impl<'a> NoteWriter<'a> {
    pub fn new(config: &'a VaultConfig) -> Self {
        Self { config }
    }

    /// Create a note in the folder for `kind`, creating the folder if
    /// needed. Never overwrites an existing note.
    pub fn create_note(
        &self,
        title: &str,
        body: &str,
        kind: FolderKind,
        tags: &[String],
        metadata: &NoteMetadata,
    ) -> Result<NoteOutcome> {
        let folder = self.config.folder_path(kind)?;
        fs::create_dir_all(&folder)?;
        self.write_note_at(&folder, title, body, tags, metadata)
    }

    /// Create a note inside an existing directory. Never overwrites.
    pub fn write_note_at(
        &self,
        dir: &Path,
        title: &str,
        body: &str,
        tags: &[String],
        metadata: &NoteMetadata,
    ) -> Result<NoteOutcome> {
        let note_path = dir.join(title_to_filename(title));
        if note_path.exists() {
            log::warn!("Note already exists: {}", note_path.display());
            return Ok(NoteOutcome::AlreadyExists(note_path));
        }

        fs::write(&note_path, render_note(title, body, tags, metadata)?)?;
        log::info!("Created note: {}", note_path.display());
        Ok(NoteOutcome::Created(note_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn filenames_are_slugified() {
        assert_eq!(title_to_filename("Weekly Sync: Q3 / Plans?"), "Weekly-Sync-Q3-Plans.md");
        assert_eq!(title_to_filename("--already -- dashed--"), "already-dashed.md");
        assert_eq!(title_to_filename("plain"), "plain.md");
    }

    #[test]
    fn rendered_note_carries_frontmatter_and_body() {
        let tags = vec!["project".to_string(), "work".to_string()];
        let metadata = NoteMetadata {
            created: Some("2026-08-01T10:00:00".to_string()),
            source_file: Some("/staging/plan.txt".to_string()),
            source_folders: vec!["work".to_string()],
            ..NoteMetadata::default()
        };
        let note = render_note("Q3 Plan", "Body text.\n", &tags, &metadata).unwrap();

        assert!(note.starts_with("---\n"));
        assert!(note.contains("title: Q3 Plan"));
        assert!(note.contains("created: 2026-08-01T10:00:00"));
        assert!(note.contains("status: active"));
        assert!(note.contains("- project"));
        assert!(note.contains("- work"));
        assert!(note.contains("source_file: /staging/plan.txt"));
        assert!(note.contains("# Q3 Plan"));
        assert!(note.ends_with("Body text.\n"));
        // Frontmatter block is properly delimited.
        assert!(note.contains("\n---\n\n# "));
    }

    #[test]
    fn empty_optional_fields_are_omitted() {
        let note = render_note("Bare", "x", &[], &NoteMetadata::default()).unwrap();
        assert!(!note.contains("tags:"));
        assert!(!note.contains("source_file"));
        assert!(!note.contains("source_folders"));
        assert!(note.contains("status: active"));
    }

    #[test]
    fn write_note_refuses_to_overwrite() {
        let temp = tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join(".obsidian")).unwrap();
        let config = VaultConfig {
            vault_path: Some(temp.path().to_path_buf()),
            ..VaultConfig::default()
        };
        let writer = NoteWriter::new(&config);

        let first = writer
            .create_note("Once", "body", FolderKind::Resources, &[], &NoteMetadata::default())
            .unwrap();
        let NoteOutcome::Created(path) = first else {
            panic!("expected creation");
        };
        assert!(path.exists());

        let second = writer
            .create_note("Once", "other", FolderKind::Resources, &[], &NoteMetadata::default())
            .unwrap();
        assert_eq!(second, NoteOutcome::AlreadyExists(path.clone()));
        // The original body is untouched.
        assert!(std::fs::read_to_string(path).unwrap().contains("body"));
    }
}
