//! One-time default theme initialisation.
//!
//! The persisted theme belongs to whatever theme switcher the page ships.
//! This module only fills it in when nothing has been chosen yet.

use folio_render::Page;
use folio_shared::ThemeConfig;
use folio_storage::KeyValueStore;
use tracing::{debug, info};

/// Attribute on the document element that selects a non-baseline theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// A host-provided theme engine, called instead of the attribute fallback.
pub trait ThemeHook {
    fn apply_theme(&self, page: &mut Page, theme_id: &str, is_initial_default: bool);
}

impl<F> ThemeHook for F
where
    F: Fn(&mut Page, &str, bool),
{
    fn apply_theme(&self, page: &mut Page, theme_id: &str, is_initial_default: bool) {
        self(page, theme_id, is_initial_default)
    }
}

/// Where the theme is persisted and which theme needs no attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    pub storage_key: String,
    pub baseline: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        ThemeConfig::default().into()
    }
}

impl From<ThemeConfig> for ThemeSettings {
    fn from(config: ThemeConfig) -> Self {
        Self {
            storage_key: config.storage_key,
            baseline: config.baseline,
        }
    }
}

/// Result of [`init_default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeOutcome {
    /// The document names no default theme.
    NoDefault,
    /// A theme was already persisted; nothing changed.
    AlreadySet(String),
    /// The default was persisted and applied.
    Applied { theme: String, via_hook: bool },
    /// The store could not be read or written; nothing changed.
    StorageUnavailable,
}

/// Persist and apply `theme_id` unless a theme is already persisted.
///
/// Never fails: storage errors are logged and reported as
/// [`ThemeOutcome::StorageUnavailable`].
pub fn init_default(
    theme_id: Option<&str>,
    settings: &ThemeSettings,
    store: &mut dyn KeyValueStore,
    page: &mut Page,
    hook: Option<&dyn ThemeHook>,
) -> ThemeOutcome {
    let saved = match store.get(&settings.storage_key) {
        Ok(saved) => saved,
        Err(e) => {
            debug!(error = %e, "theme store unavailable");
            return ThemeOutcome::StorageUnavailable;
        }
    };

    if let Some(saved) = saved.filter(|s| !s.is_empty()) {
        debug!(theme = %saved, "theme already chosen");
        return ThemeOutcome::AlreadySet(saved);
    }

    let Some(theme) = theme_id.filter(|t| !t.is_empty()) else {
        return ThemeOutcome::NoDefault;
    };

    if let Err(e) = store.set(&settings.storage_key, theme) {
        debug!(error = %e, "theme store unavailable");
        return ThemeOutcome::StorageUnavailable;
    }

    let via_hook = match hook {
        Some(hook) => {
            hook.apply_theme(page, theme, true);
            true
        }
        None => {
            apply_theme_attribute(page, theme, &settings.baseline);
            false
        }
    };

    info!(theme, via_hook, "default theme applied");
    ThemeOutcome::Applied {
        theme: theme.to_string(),
        via_hook,
    }
}

/// Clear the theme attribute, then set it unless `theme` is the baseline.
fn apply_theme_attribute(page: &mut Page, theme: &str, baseline: &str) {
    let result = page.remove_root_attribute(THEME_ATTRIBUTE).and_then(|_| {
        if theme == baseline {
            Ok(false)
        } else {
            page.set_root_attribute(THEME_ATTRIBUTE, theme)
        }
    });
    if let Err(e) = result {
        debug!(error = %e, "could not set theme attribute");
    }
}
