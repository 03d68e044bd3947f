//! Application configuration for Paperboard.
//!
//! User config lives at `~/.paperboard/paperboard.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PaperboardError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "paperboard.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".paperboard";

// ---------------------------------------------------------------------------
// Config structs (matching paperboard.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Paper listing source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Notion API settings.
    #[serde(default)]
    pub notion: NotionConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Origin of the papers site; listing and detail links resolve against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How many days before today the listing date is.
    #[serde(default = "default_past_days")]
    pub past_days: u64,

    /// Detail pages fetched at once. 1 keeps enrichment strictly sequential.
    #[serde(default = "default_enrich_concurrency")]
    pub enrich_concurrency: u32,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            past_days: default_past_days(),
            enrich_concurrency: default_enrich_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://huggingface.co".into()
}
fn default_past_days() -> u64 {
    2
}
fn default_enrich_concurrency() -> u32 {
    1
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[notion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Name of the env var holding the integration token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Base URL of the Notion REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Value sent in the `Notion-Version` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request HTTP timeout for API calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page that `run` and `show` use when `--page-id` is omitted.
    #[serde(default)]
    pub default_page_id: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            api_base: default_api_base(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            default_page_id: String::new(),
        }
    }
}

fn default_token_env() -> String {
    "NOTION_TOKEN".into()
}
fn default_api_base() -> String {
    "https://api.notion.com/v1".into()
}
fn default_api_version() -> String {
    "2022-06-28".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.paperboard/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PaperboardError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.paperboard/paperboard.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PaperboardError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PaperboardError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PaperboardError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PaperboardError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PaperboardError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the Notion integration token from the env var named in config.
pub fn resolve_notion_token(config: &AppConfig) -> Result<String> {
    let var_name = &config.notion.token_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(PaperboardError::config(format!(
            "Notion token not found. Set the {var_name} environment variable.\n\
             Create an integration at https://www.notion.so/my-integrations"
        ))),
    }
}
