use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OrganizerError, Result};

/// Environment variable that overrides the configured vault path.
pub const VAULT_PATH_ENV: &str = "OBSIDIAN_VAULT_PATH";

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/vault_config.json";

/// PARA folder a note can be filed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderKind {
    Inbox,
    Projects,
    Areas,
    Resources,
    Archive,
    Mocs,
}

impl FolderKind {
    pub const ALL: &'static [Self] = &[
        Self::Inbox,
        Self::Projects,
        Self::Areas,
        Self::Resources,
        Self::Archive,
        Self::Mocs,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Projects => "projects",
            Self::Areas => "areas",
            Self::Resources => "resources",
            Self::Archive => "archive",
            Self::Mocs => "mocs",
        }
    }
}

/// PARA folder names inside the vault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParaFolders {
    pub inbox: String,
    pub projects: String,
    pub areas: String,
    pub resources: String,
    pub archive: String,
    pub mocs: String,
}

impl Default for ParaFolders {
    fn default() -> Self {
        Self {
            inbox: "00-Inbox".to_string(),
            projects: "01-Projects".to_string(),
            areas: "02-Areas".to_string(),
            resources: "03-Resources".to_string(),
            archive: "04-Archive".to_string(),
            mocs: "07-MOCs".to_string(),
        }
    }
}

/// Obsidian-specific folder names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObsidianFolders {
    pub daily_notes_folder: String,
    pub templates_folder: String,
    pub attachment_folder: String,
    pub inbox_folder: String,
}

impl Default for ObsidianFolders {
    fn default() -> Self {
        Self {
            daily_notes_folder: "06-Daily-Notes".to_string(),
            templates_folder: "05-Templates".to_string(),
            attachment_folder: "99-Attachments".to_string(),
            inbox_folder: "00-Inbox".to_string(),
        }
    }
}

/// Vault configuration, persisted as JSON.
///
/// Vault-path resolution is non-interactive: the environment variable wins,
/// then the configured value; both must point at a directory containing a
/// `.obsidian` folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VaultConfig {
    pub vault_path: Option<PathBuf>,
    pub para_structure: ParaFolders,
    pub obsidian_config: ObsidianFolders,
}

impl VaultConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "Could not parse config file {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!(
                    "Could not load config file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Persist configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Resolve the vault path: environment variable first, then the
    /// configured value. Only paths that look like an Obsidian vault are
    /// accepted.
    pub fn vault_path(&self) -> Result<PathBuf> {
        if let Ok(from_env) = env::var(VAULT_PATH_ENV) {
            let candidate = PathBuf::from(from_env);
            if is_obsidian_vault(&candidate) {
                return Ok(candidate);
            }
            log::warn!(
                "{VAULT_PATH_ENV} is set but does not point at an Obsidian vault: {}",
                candidate.display()
            );
        }

        match &self.vault_path {
            Some(configured) if is_obsidian_vault(configured) => Ok(configured.clone()),
            Some(configured) => Err(OrganizerError::NotAVault(configured.display().to_string())),
            None => Err(OrganizerError::VaultNotConfigured),
        }
    }

    /// Configured folder name for a PARA kind.
    #[must_use]
    pub fn folder_name(&self, kind: FolderKind) -> &str {
        match kind {
            FolderKind::Inbox => &self.para_structure.inbox,
            FolderKind::Projects => &self.para_structure.projects,
            FolderKind::Areas => &self.para_structure.areas,
            FolderKind::Resources => &self.para_structure.resources,
            FolderKind::Archive => &self.para_structure.archive,
            FolderKind::Mocs => &self.para_structure.mocs,
        }
    }

    /// Full path of a PARA folder inside the vault.
    pub fn folder_path(&self, kind: FolderKind) -> Result<PathBuf> {
        Ok(self.vault_path()?.join(self.folder_name(kind)))
    }

    /// Full path of a template file inside the vault.
    pub fn template_path(&self, template_name: &str) -> Result<PathBuf> {
        Ok(self
            .vault_path()?
            .join(&self.obsidian_config.templates_folder)
            .join(template_name))
    }

    /// Full path of the daily-notes folder inside the vault.
    pub fn daily_notes_path(&self) -> Result<PathBuf> {
        Ok(self
            .vault_path()?
            .join(&self.obsidian_config.daily_notes_folder))
    }

    /// Validate the configuration, returning human-readable issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let vault = match self.vault_path() {
            Ok(vault) => vault,
            Err(e) => {
                issues.push(e.to_string());
                return issues;
            }
        };

        for kind in FolderKind::ALL {
            let folder = vault.join(self.folder_name(*kind));
            if !folder.is_dir() {
                issues.push(format!("Missing folder: {}", self.folder_name(*kind)));
            }
        }

        issues
    }

    /// Create the PARA and Obsidian folder structure inside the vault.
    ///
    /// Returns the folders that were ensured, in creation order.
    pub fn setup_structure(&self) -> Result<Vec<PathBuf>> {
        let vault = self.vault_path()?;
        let mut created = Vec::new();

        for kind in FolderKind::ALL {
            let folder = vault.join(self.folder_name(*kind));
            fs::create_dir_all(&folder)?;
            created.push(folder);
        }

        let obsidian = [
            &self.obsidian_config.daily_notes_folder,
            &self.obsidian_config.templates_folder,
            &self.obsidian_config.attachment_folder,
        ];
        for name in obsidian {
            let folder = vault.join(name);
            if !created.contains(&folder) {
                fs::create_dir_all(&folder)?;
                created.push(folder);
            }
        }

        log::info!(
            "Vault structure ready in {} ({} folders)",
            vault.display(),
            created.len()
        );
        Ok(created)
    }
}

/// A directory counts as an Obsidian vault iff it contains a `.obsidian`
/// folder.
#[must_use]
pub fn is_obsidian_vault(path: &Path) -> bool {
    path.join(".obsidian").is_dir()
}
