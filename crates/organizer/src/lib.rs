//! # Vault Organizer
//!
//! PARA-style filing for staged documents: configuration, content
//! classification, title and tag extraction, folder management, and
//! frontmatter note writing.
//!
//! ## Pipeline
//!
//! ```text
//! Staged file
//!     │
//!     ├──> Converter (txt / pandoc -> markdown)
//!     ├──> Title extractor + Content classifier
//!     ├──> Tag extractor (folders + #hashtags/@mentions)
//!     └──> Note writer
//!            └─> <vault>/<PARA folder>/<mirrored subfolders>/<Title>.md
//! ```

mod classify;
mod config;
mod error;
mod folders;
mod note;
mod process;
mod tags;
mod title;

pub use classify::{
    classifier_for, extra_tags, folder_for, Classification, ClassifierMode, ContentClassifier,
    ContentKind, PatternClassifier, WeightedClassifier,
};
pub use config::{
    is_obsidian_vault, FolderKind, ObsidianFolders, ParaFolders, VaultConfig, DEFAULT_CONFIG_PATH,
    VAULT_PATH_ENV,
};
pub use error::{OrganizerError, Result};
pub use folders::FolderManager;
pub use note::{render_note, title_to_filename, NoteMetadata, NoteOutcome, NoteWriter};
pub use process::{staged_files, BatchSummary, FileProcessor, ProcessOutcome, SkipReason};
pub use tags::{combine_tags, content_tags, folder_tags, sanitize_tag};
pub use title::{clean_title, extract_title, sanitize_filename, title_from_filename};
