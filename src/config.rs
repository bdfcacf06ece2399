use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `gateway.url`.
pub const GATEWAY_URL_ENV: &str = "ERP9S_GATEWAY_URL";
/// Optional bearer token for the gateway.
pub const TOKEN_ENV: &str = "ERP9S_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub gateway: GatewayConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  /// Custom title for header (defaults to the gateway host if not set)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
  /// Full URL of the GraphQL endpoint
  #[serde(default)]
  pub url: String,
  /// Request timeout; the HTTP client's default when unset
  pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// Time-to-live for cached reads; the shared 5 minute cache when unset
  pub ttl_secs: Option<u64>,
}

impl Config {
  /// Load configuration from file, then apply environment overrides.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./erp9s.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/erp9s/config.yaml
  ///
  /// The gateway URL is then taken from `ERP9S_GATEWAY_URL` and finally
  /// from `gateway_override` (the command line), each when non-empty. No
  /// file at all is fine as long as one of those supplies the URL.
  pub fn load(explicit_path: Option<&Path>, gateway_override: Option<String>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    config
      .with_gateway_override(std::env::var(GATEWAY_URL_ENV).ok())
      .with_gateway_override(gateway_override)
      .validated()
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("erp9s.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("erp9s").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Replace the gateway URL when an override is present and non-empty.
  pub fn with_gateway_override(mut self, url: Option<String>) -> Self {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
      self.gateway.url = url.trim().to_string();
    }
    self
  }

  fn validated(self) -> Result<Self> {
    if self.gateway.url.is_empty() {
      return Err(eyre!(
        "No gateway URL configured. Set gateway.url in ~/.config/erp9s/config.yaml \
         or the {} environment variable.",
        GATEWAY_URL_ENV
      ));
    }
    url::Url::parse(&self.gateway.url)
      .map_err(|e| eyre!("Invalid gateway URL {}: {}", self.gateway.url, e))?;
    Ok(self)
  }

  /// Get the gateway token from the environment, if one is set.
  pub fn get_api_token() -> Option<String> {
    std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty())
  }
}
