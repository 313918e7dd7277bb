use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrganizerError>;

#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frontmatter error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Conversion error: {0}")]
    Convert(#[from] vault_convert::ConvertError),

    #[error("No vault configured; set OBSIDIAN_VAULT_PATH or run `vault-organize setup --vault-path <PATH>`")]
    VaultNotConfigured,

    #[error("Not an Obsidian vault (missing .obsidian folder): {0}")]
    NotAVault(String),
}
