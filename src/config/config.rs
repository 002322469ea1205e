use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::view::navigation::DEFAULT_ROUTE_TEMPLATE;
use crate::view::pagination::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colorize headers and status lines
    pub use_colors: bool,

    /// Number of page buttons shown around the current page
    pub page_window: usize,

    /// Columns hidden when the directory is opened
    pub hidden_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Rows per page when the directory is opened
    pub default_page_size: usize,

    /// Page sizes offered to the operator
    pub page_size_options: Vec<usize>,

    /// Tracing filter used when RUST_LOG is not set
    pub log_level: String,

    /// Detail route for an activated row; `{id}` is replaced by the record id
    pub route_template: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            page_window: 5,
            hidden_columns: Vec::new(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![5, 10, 20, 30, 50],
            log_level: "info".to_string(),
            route_template: DEFAULT_ROUTE_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load and validate config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.behavior.default_page_size == 0 {
            bail!("behavior.default_page_size must be a positive integer");
        }
        if self.behavior.page_size_options.contains(&0) {
            bail!("behavior.page_size_options must only contain positive sizes");
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("user-directory").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# User Directory Configuration File
# Location: ~/.config/user-directory/config.toml (Linux)

[display]
# Colorize headers and status lines
use_colors = true

# Number of page buttons shown around the current page
page_window = 5

# Columns hidden when the directory is opened (id and name cannot be hidden)
hidden_columns = []

[behavior]
# Rows per page when the directory is opened
default_page_size = 10

# Page sizes offered by the `size` command
page_size_options = [5, 10, 20, 30, 50]

# Tracing filter used when RUST_LOG is not set: "error", "warn", "info", "debug", "trace"
log_level = "info"

# Route opened for an activated row
route_template = "/users/{id}"
"#
        .to_string()
    }
}
