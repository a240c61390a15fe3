use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
///
/// Loaded from an explicit `--config` path, else from `bellows.toml` in
/// the vault directory when present, else defaults. Command-line flags
/// override file values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Vault configuration
    #[serde(default)]
    pub vault: VaultSection,
    /// Preview server configuration
    #[serde(default)]
    pub server: ServerSection,
    /// Export configuration
    #[serde(default)]
    pub export: ExportSection,
}

/// Vault configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSection {
    /// Directory (relative to the vault root) searched for attachments
    #[serde(default = "default_attachment_dir")]
    pub attachment_dir: String,

    /// URL prefix for generated absolute links
    #[serde(default)]
    pub root_url: String,
}

impl Default for VaultSection {
    fn default() -> Self {
        Self {
            attachment_dir: default_attachment_dir(),
            root_url: String::new(),
        }
    }
}

/// Preview server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// Output directory for the static site
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_attachment_dir() -> String {
    "Images".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_output() -> PathBuf {
    PathBuf::from("public")
}

impl CliConfig {
    /// Load configuration with the lookup order described above.
    pub fn load(explicit: Option<&Path>, vault_dir: &Path) -> Result<Self> {
        let path = explicit.map(Path::to_path_buf).or_else(|| {
            let candidate = vault_dir.join("bellows.toml");
            candidate.is_file().then_some(candidate)
        });

        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parsing config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}
