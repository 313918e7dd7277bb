use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{FolderKind, VaultConfig};
use crate::error::Result;

/// Creates and resolves vault folder structure for filed notes.
pub struct FolderManager<'a> {
    config: &'a VaultConfig,
}

impl<'a> FolderManager<'a> {
    pub fn new(config: &'a VaultConfig) -> Self {
        Self { config }
    }

    /// Ensure a folder exists, creating it if necessary.
    pub fn ensure_exists(&self, folder: &Path) -> Result<()> {
        fs::create_dir_all(folder)?;
        Ok(())
    }

    /// Target folder for a staged file: the PARA folder for `kind` with
    /// the staging subfolder hierarchy mirrored beneath it.
    ///
    /// Files outside the staging directory (or at its root) land directly
    /// in the PARA folder.
    pub fn target_folder(
        &self,
        file: &Path,
        staging_dir: &Path,
        kind: FolderKind,
    ) -> Result<PathBuf> {
        let base = self.config.folder_path(kind)?;

        let mut target = base;
        if let Ok(relative) = file.strip_prefix(staging_dir) {
            if let Some(parent) = relative.parent() {
                for component in parent.components() {
                    target.push(component);
                }
            }
        }

        self.ensure_exists(&target)?;
        Ok(target)
    }

    /// The daily-notes folder, created on demand.
    pub fn daily_notes_folder(&self) -> Result<PathBuf> {
        let folder = self.config.daily_notes_path()?;
        self.ensure_exists(&folder)?;
        Ok(folder)
    }
}
