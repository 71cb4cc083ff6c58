//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use folio_core::{Pipeline, ThemeSettings};
use folio_loader::{ContentLoader, LoaderOptions, load_fallback};
use folio_render::Page;
use folio_shared::{
    AppConfig, RenderConfig, config_file_path, content_url_for_page, init_config, load_config,
    load_config_from,
};
use folio_storage::{JsonFileStore, KeyValueStore};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Folio: fill a static portfolio page from its content document.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Render a static portfolio page from a content.json document.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.folio/folio.toml.
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render a page with its content document and default theme.
    Render {
        /// HTML page to render.
        page: PathBuf,

        /// Content document URL or path (relative paths resolve against the page).
        #[arg(long)]
        content: Option<String>,

        /// Document to use when the content fetch fails.
        #[arg(long)]
        fallback: Option<PathBuf>,

        /// Persisted theme store (JSON file).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Write the rendered page here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Inspect the persisted theme.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Theme subcommands.
#[derive(Subcommand)]
pub(crate) enum ThemeAction {
    /// Print the persisted theme, if any.
    Show {
        /// Persisted theme store (JSON file).
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "folio=info",
        1 => "folio=debug",
        _ => "folio=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so a rendered page on stdout stays clean.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Render {
            page,
            content,
            fallback,
            store,
            out,
        } => {
            let overrides = RenderOverrides {
                content,
                fallback,
                store,
            };
            cmd_render(config_path.as_deref(), &page, overrides, out.as_deref()).await
        }
        Command::Theme { action } => match action {
            ThemeAction::Show { store } => cmd_theme_show(config_path.as_deref(), store),
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Load `--config` if given, otherwise the user config (or defaults).
fn app_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Flags that take precedence over the config file.
#[derive(Debug, Default)]
struct RenderOverrides {
    content: Option<String>,
    fallback: Option<PathBuf>,
    store: Option<PathBuf>,
}

fn render_config(
    config: &AppConfig,
    page: &Path,
    overrides: RenderOverrides,
) -> Result<RenderConfig> {
    let mut render = RenderConfig::for_page(config, page)?;

    if let Some(content) = overrides.content {
        render.content_url = content_url_for_page(page, &content)?;
    }
    if let Some(fallback) = overrides.fallback {
        render.fallback_path = Some(fallback);
    }
    if let Some(store) = overrides.store {
        render.store_path = store;
    }

    Ok(render)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_render(
    config_path: Option<&Path>,
    page_path: &Path,
    overrides: RenderOverrides,
    out: Option<&Path>,
) -> Result<()> {
    let config = app_config(config_path)?;
    let render = render_config(&config, page_path, overrides)?;

    let markup = std::fs::read_to_string(page_path)
        .wrap_err_with(|| format!("cannot read page {}", page_path.display()))?;
    let mut page = Page::parse(&markup);

    let fallback = load_fallback(render.fallback_path.as_deref());
    let loader = ContentLoader::new(
        render.content_url.clone(),
        fallback,
        &LoaderOptions {
            timeout_secs: render.fetch_timeout_secs,
        },
    )?;

    let mut store = JsonFileStore::open(&render.store_path);
    let settings = ThemeSettings {
        storage_key: render.storage_key.clone(),
        baseline: render.baseline_theme.clone(),
    };

    info!(page = %page_path.display(), content = %render.content_url, "rendering page");
    let report = Pipeline::new(&mut store, settings)
        .run(&loader, &mut page)
        .await;

    let html = page.to_html();
    match out {
        Some(path) => {
            std::fs::write(path, html)
                .wrap_err_with(|| format!("cannot write {}", path.display()))?;
            info!(
                out = %path.display(),
                rendered = report.rendered_regions(),
                failed = report.failed_regions(),
                "page written"
            );
        }
        None => println!("{html}"),
    }

    Ok(())
}

fn cmd_theme_show(config_path: Option<&Path>, store: Option<PathBuf>) -> Result<()> {
    let config = app_config(config_path)?;
    let store_path = match store {
        Some(path) => path,
        None => config.theme.resolved_store_path()?,
    };

    let store = JsonFileStore::open_readonly(&store_path);
    match store.get(&config.theme.storage_key)? {
        Some(theme) if !theme.is_empty() => println!("{theme}"),
        _ => println!("No theme persisted under '{}'", config.theme.storage_key),
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = app_config(config_path)?;
    let source = match config_path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };
    if source.exists() {
        println!("# {}", source.display());
    } else {
        println!("# defaults (no config file at {})", source.display());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_flags() {
        let cli = Cli::try_parse_from([
            "folio",
            "-vv",
            "render",
            "site/index.html",
            "--content",
            "data.json",
            "--out",
            "dist/index.html",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Render {
                page,
                content,
                out,
                store,
                ..
            } => {
                assert_eq!(page, PathBuf::from("site/index.html"));
                assert_eq!(content.as_deref(), Some("data.json"));
                assert_eq!(out, Some(PathBuf::from("dist/index.html")));
                assert_eq!(store, None);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        let mut config = AppConfig::default();
        config.theme.store_path = Some("from-config.json".into());

        let overrides = RenderOverrides {
            content: Some("data/site.json".into()),
            fallback: Some(PathBuf::from("offline.json")),
            store: Some(PathBuf::from("from-flag.json")),
        };
        let render = render_config(&config, &page, overrides).unwrap();

        assert!(render.content_url.as_str().ends_with("/data/site.json"));
        assert_eq!(render.content_url.scheme(), "file");
        assert_eq!(render.fallback_path, Some(PathBuf::from("offline.json")));
        assert_eq!(render.store_path, PathBuf::from("from-flag.json"));
    }

    #[test]
    fn config_used_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        let mut config = AppConfig::default();
        config.site.content_url = Some("https://example.com/content.json".into());
        config.theme.store_path = Some("from-config.json".into());

        let render = render_config(&config, &page, RenderOverrides::default()).unwrap();

        assert_eq!(render.content_url.as_str(), "https://example.com/content.json");
        assert_eq!(render.store_path, PathBuf::from("from-config.json"));
        assert_eq!(render.storage_key, "talal-theme-v1");
    }
}
