//! Shared types, error model, and configuration for Folio.
//!
//! This crate is the foundation depended on by all other Folio crates.
//! It provides:
//! - [`FolioError`] — the unified error type
//! - The content document model ([`ContentDocument`], [`Profile`], [`TextList`], ...)
//! - Configuration ([`AppConfig`], [`RenderConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, RenderConfig, SiteConfig, ThemeConfig, config_dir, config_file_path,
    content_url_for_page, init_config, load_config, load_config_from,
};
pub use error::{FolioError, Result};
pub use types::{
    ContentDocument, Education, Experience, Profile, Skills, Text, TextList, ThemeDefaults,
};
