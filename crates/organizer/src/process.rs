use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use vault_convert::{Converter, PandocConverter, TextConverter};

use crate::classify::{folder_for, ContentClassifier, ContentKind};
use crate::config::VaultConfig;
use crate::error::Result;
use crate::folders::FolderManager;
use crate::note::{NoteMetadata, NoteOutcome, NoteWriter};
use crate::tags::{combine_tags, content_tags, folder_tags};
use crate::title::{clean_title, extract_title};

/// Why a staged file was not turned into a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    NotMarkdown,
    Empty,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::NotMarkdown => "not markdown",
            Self::Empty => "empty",
        }
    }
}

/// Result of processing one staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A note was written at this path.
    Created { note: PathBuf, kind: ContentKind },
    /// A note with the derived filename already exists.
    AlreadyExists(PathBuf),
    Skipped(SkipReason),
}

/// Aggregate counts over a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub created: usize,
    pub already_exists: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &ProcessOutcome) {
        self.processed += 1;
        match outcome {
            ProcessOutcome::Created { .. } => self.created += 1,
            ProcessOutcome::AlreadyExists(_) => self.already_exists += 1,
            ProcessOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn record_failure(&mut self) {
        self.processed += 1;
        self.failed += 1;
    }
}

/// Turns staged documents into filed vault notes.
///
/// Per file: convert to markdown if needed, extract a title, classify the
/// content, mirror the staging folders beneath the PARA target, write a
/// frontmatter note, and relocate daily notes. Originals are only deleted
/// after the note is safely written.
pub struct FileProcessor<'a> {
    config: &'a VaultConfig,
    classifier: Box<dyn ContentClassifier>,
    text: TextConverter,
    pandoc: Option<PandocConverter>,
}

impl<'a> FileProcessor<'a> {
    pub fn new(config: &'a VaultConfig, classifier: Box<dyn ContentClassifier>) -> Self {
        let pandoc = match PandocConverter::new() {
            Ok(converter) => Some(converter),
            Err(e) => {
                log::info!("{e}; rich-format conversion disabled");
                None
            }
        };
        Self {
            config,
            classifier,
            text: TextConverter::new(),
            pandoc,
        }
    }

    /// Process a single staged file.
    pub fn process_file(
        &self,
        path: &Path,
        staging_dir: &Path,
        delete_original: bool,
    ) -> Result<ProcessOutcome> {
        if !path.exists() {
            log::warn!("File not found: {}", path.display());
            return Ok(ProcessOutcome::Skipped(SkipReason::Missing));
        }

        let original = path.to_path_buf();
        let mut working = original.clone();
        let mut converted: Option<PathBuf> = None;

        if let Some(converter) = self.converter_for(&working) {
            log::debug!("Converting {}", working.display());
            let md_path = converter.convert(&working)?;
            converted = Some(md_path.clone());
            working = md_path;
        }

        if !has_extension(&working, "md") {
            log::debug!("Skipping non-markdown file: {}", working.display());
            return Ok(ProcessOutcome::Skipped(SkipReason::NotMarkdown));
        }

        let content = read_lossy(&working)?;
        if content.trim().is_empty() {
            log::debug!("Skipping empty file: {}", working.display());
            return Ok(ProcessOutcome::Skipped(SkipReason::Empty));
        }

        let filename = working
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = clean_title(&extract_title(&content, &filename));
        let classification = self.classifier.classify(&working, &content);
        let kind = classification.kind;
        log::debug!(
            "Classified {} as {} (confidence {:.2})",
            working.display(),
            kind.as_str(),
            classification.confidence
        );

        let staged_tags = folder_tags(&working, staging_dir);
        let tags = combine_tags(kind, &staged_tags, &content_tags(&content));

        let metadata = NoteMetadata {
            created: modified_timestamp(&working),
            status: None,
            source_file: Some(original.display().to_string()),
            source_folders: staged_tags,
        };

        let folders = FolderManager::new(self.config);
        let target = folders.target_folder(&working, staging_dir, folder_for(kind))?;

        let writer = NoteWriter::new(self.config);
        let outcome = writer.write_note_at(&target, &title, &content, &tags, &metadata)?;
        let note_path = match outcome {
            NoteOutcome::Created(note) => note,
            NoteOutcome::AlreadyExists(existing) => {
                // Existing note wins; leave the original in place.
                self.cleanup_converted(&original, converted.as_deref());
                return Ok(ProcessOutcome::AlreadyExists(existing));
            }
        };

        // Daily notes are staged through the inbox, then relocated.
        let note_path = if kind == ContentKind::Daily {
            self.relocate_daily(&folders, note_path)?
        } else {
            note_path
        };

        if delete_original && original != working {
            if let Err(e) = fs::remove_file(&original) {
                log::warn!("Could not remove original {}: {e}", original.display());
            }
        }
        self.cleanup_converted(&original, converted.as_deref());

        Ok(ProcessOutcome::Created {
            note: note_path,
            kind,
        })
    }

    fn relocate_daily(&self, folders: &FolderManager<'_>, note_path: PathBuf) -> Result<PathBuf> {
        let daily_folder = folders.daily_notes_folder()?;
        let Some(name) = note_path.file_name() else {
            return Ok(note_path);
        };
        let daily_path = daily_folder.join(name);
        if daily_path.exists() {
            return Ok(note_path);
        }
        fs::rename(&note_path, &daily_path)?;
        log::info!("Moved daily note to {}", daily_folder.display());
        Ok(daily_path)
    }

    fn converter_for(&self, path: &Path) -> Option<&dyn Converter> {
        if self.text.can_convert(path) {
            return Some(&self.text);
        }
        if let Some(pandoc) = &self.pandoc {
            if pandoc.can_convert(path) {
                return Some(pandoc);
            }
        }
        None
    }

    /// Remove the intermediate converted file once the note is written.
    fn cleanup_converted(&self, original: &Path, converted: Option<&Path>) {
        if let Some(converted) = converted {
            if converted != original {
                if let Err(e) = fs::remove_file(converted) {
                    log::warn!("Could not clean up {}: {e}", converted.display());
                }
            }
        }
    }
}

/// Files under a staging directory eligible for processing: regular,
/// non-hidden, sorted by path.
#[must_use]
pub fn staged_files(staging_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(staging_dir)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with('.')
        })
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Failed to read entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn modified_timestamp(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format("%Y-%m-%dT%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn staged_files_are_sorted_and_skip_hidden_entries() {
        let staging = tempdir().unwrap();
        fs::create_dir_all(staging.path().join("b/.hidden_dir")).unwrap();
        fs::write(staging.path().join("b/z.md"), "z").unwrap();
        fs::write(staging.path().join("a.md"), "a").unwrap();
        fs::write(staging.path().join(".hidden.md"), "h").unwrap();
        fs::write(staging.path().join("b/.hidden_dir/c.md"), "c").unwrap();

        let files = staged_files(staging.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(staging.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["a.md", "b/z.md"]);
    }

    #[test]
    fn batch_summary_counts_outcomes() {
        let mut summary = BatchSummary::default();
        summary.record(&ProcessOutcome::Created {
            note: PathBuf::from("n.md"),
            kind: ContentKind::Resource,
        });
        summary.record(&ProcessOutcome::Skipped(SkipReason::Empty));
        summary.record(&ProcessOutcome::AlreadyExists(PathBuf::from("n.md")));
        summary.record_failure();

        assert_eq!(summary.processed, 4);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.already_exists, 1);
        assert_eq!(summary.failed, 1);
    }
}
