//! Application configuration for Folio.
//!
//! User config lives at `~/.folio/folio.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FolioError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "folio.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".folio";

/// File name of the default persisted theme store inside the config directory.
const STORE_FILE_NAME: &str = "theme-state.json";

// ---------------------------------------------------------------------------
// Config structs (matching folio.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content source settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Persisted theme settings.
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Content document path, resolved relative to the rendered page.
    #[serde(default = "default_content_path")]
    pub content_path: String,

    /// Absolute content URL; takes precedence over `content_path` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    /// JSON document used when the content fetch fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<String>,

    /// HTTP timeout for the content fetch, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_path: default_content_path(),
            content_url: None,
            fallback_path: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_content_path() -> String {
    "content.json".into()
}
fn default_fetch_timeout() -> u64 {
    10
}

/// `[theme]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Key under which the chosen theme is persisted.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Theme that needs no explicit `data-theme` attribute.
    #[serde(default = "default_baseline")]
    pub baseline: String,

    /// Path of the JSON key-value store (defaults to `~/.folio/theme-state.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            baseline: default_baseline(),
            store_path: None,
        }
    }
}

impl ThemeConfig {
    /// `store_path` if set, otherwise `theme-state.json` in the config directory.
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(config_dir()?.join(STORE_FILE_NAME)),
        }
    }
}

fn default_storage_key() -> String {
    "talal-theme-v1".into()
}
fn default_baseline() -> String {
    "ocean".into()
}

// ---------------------------------------------------------------------------
// Render config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime render configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Where the content document is fetched from.
    pub content_url: Url,
    /// Fallback document used when the fetch fails.
    pub fallback_path: Option<PathBuf>,
    /// HTTP timeout for the content fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Persisted theme key.
    pub storage_key: String,
    /// Theme that needs no `data-theme` attribute.
    pub baseline_theme: String,
    /// JSON key-value store location.
    pub store_path: PathBuf,
}

impl RenderConfig {
    /// Build the runtime config for rendering `page` from the loaded app config.
    pub fn for_page(config: &AppConfig, page: &Path) -> Result<Self> {
        let content_url = match &config.site.content_url {
            Some(raw) => Url::parse(raw).map_err(|e| {
                FolioError::config(format!("invalid site.content_url '{raw}': {e}"))
            })?,
            None => content_url_for_page(page, &config.site.content_path)?,
        };

        let store_path = config.theme.resolved_store_path()?;

        Ok(Self {
            content_url,
            fallback_path: config.site.fallback_path.as_ref().map(PathBuf::from),
            fetch_timeout_secs: config.site.fetch_timeout_secs,
            storage_key: config.theme.storage_key.clone(),
            baseline_theme: config.theme.baseline.clone(),
            store_path,
        })
    }
}

/// Resolve `content` against the directory of `page`, the way a browser
/// resolves a relative fetch against the page URL. Absolute URLs pass through.
pub fn content_url_for_page(page: &Path, content: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(content) {
        return Ok(url);
    }

    let absolute = std::path::absolute(page).map_err(|e| FolioError::io(page, e))?;
    let page_url = Url::from_file_path(&absolute).map_err(|()| {
        FolioError::config(format!("cannot express {} as a file URL", absolute.display()))
    })?;

    page_url
        .join(content)
        .map_err(|e| FolioError::config(format!("cannot resolve '{content}': {e}")))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.folio/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| FolioError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.folio/folio.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| FolioError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| FolioError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FolioError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FolioError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FolioError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("content_path"));
        assert!(toml_str.contains("talal-theme-v1"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[theme]
baseline = "slate"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.theme.baseline, "slate");
        assert_eq!(config.theme.storage_key, "talal-theme-v1");
        assert_eq!(config.site.content_path, "content.json");
        assert_eq!(config.site.fetch_timeout_secs, 10);
    }

    #[test]
    fn content_resolves_next_to_page() {
        let page = std::env::temp_dir().join("site").join("index.html");
        let url = content_url_for_page(&page, "content.json").expect("resolve");
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/site/content.json"));
    }

    #[test]
    fn absolute_content_url_passes_through() {
        let url = content_url_for_page(Path::new("index.html"), "https://example.com/c.json")
            .expect("resolve");
        assert_eq!(url.as_str(), "https://example.com/c.json");
    }

    #[test]
    fn render_config_prefers_explicit_url() {
        let mut app = AppConfig::default();
        app.site.content_url = Some("http://localhost:8000/content.json".into());
        app.theme.store_path = Some("/tmp/folio-state.json".into());

        let config = RenderConfig::for_page(&app, Path::new("index.html")).expect("config");
        assert_eq!(config.content_url.as_str(), "http://localhost:8000/content.json");
        assert_eq!(config.store_path, PathBuf::from("/tmp/folio-state.json"));
        assert_eq!(config.baseline_theme, "ocean");
    }

    #[test]
    fn render_config_rejects_bad_url() {
        let mut app = AppConfig::default();
        app.site.content_url = Some("not a url".into());
        let result = RenderConfig::for_page(&app, Path::new("index.html"));
        assert!(result.unwrap_err().to_string().contains("site.content_url"));
    }
}
