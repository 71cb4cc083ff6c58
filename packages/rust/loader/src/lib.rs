//! Content document loading.
//!
//! The loader performs exactly one fetch of the content document, bypassing
//! caches. Any failure (transport error, non-success status, unreadable or
//! malformed body) is logged and replaced by the fallback document, so
//! [`ContentLoader::load`] never fails.

use std::path::Path;
use std::time::Duration;

use folio_shared::{ContentDocument, FolioError, Result};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Maximum number of redirects to follow when fetching the document.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for the content fetch.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User-Agent string for content requests.
const USER_AGENT: &str = concat!("Folio/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Loader options
// ---------------------------------------------------------------------------

/// Configuration for the content loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// ContentLoader
// ---------------------------------------------------------------------------

/// Where the document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Fetched and parsed successfully.
    Fetched,
    /// The fetch failed; the fallback document was used.
    Fallback,
}

/// Fetches the content document with a fallback.
pub struct ContentLoader {
    client: Client,
    source: Url,
    fallback: ContentDocument,
}

impl ContentLoader {
    /// Create a loader for `source`. `fallback` is returned whenever the fetch fails.
    pub fn new(source: Url, fallback: ContentDocument, opts: &LoaderOptions) -> Result<Self> {
        Ok(Self {
            client: build_client(opts)?,
            source,
            fallback,
        })
    }

    /// The URL this loader fetches.
    pub fn source(&self) -> &Url {
        &self.source
    }

    /// Load the content document. Never fails.
    pub async fn load(&self) -> ContentDocument {
        self.load_with_source().await.0
    }

    /// Load the content document and report whether the fallback was used.
    #[instrument(skip_all, fields(url = %self.source))]
    pub async fn load_with_source(&self) -> (ContentDocument, LoadSource) {
        match self.fetch().await {
            Ok(doc) => {
                info!("content document loaded");
                (doc, LoadSource::Fetched)
            }
            Err(e) => {
                warn!(error = %e, "content fetch failed, using fallback document");
                (self.fallback.clone(), LoadSource::Fallback)
            }
        }
    }

    async fn fetch(&self) -> Result<ContentDocument> {
        let body = match self.source.scheme() {
            "http" | "https" => fetch_http(&self.client, &self.source).await?,
            "file" => {
                let path = self.source.to_file_path().map_err(|()| {
                    FolioError::config(format!("not a local file URL: {}", self.source))
                })?;
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| FolioError::io(&path, e))?
            }
            other => {
                return Err(FolioError::config(format!(
                    "unsupported content URL scheme '{other}'"
                )));
            }
        };

        debug!(bytes = body.len(), "content body received");
        ContentDocument::from_json_str(&body)
    }
}

/// Read the configured fallback document, or the empty document when there is
/// none or it cannot be read.
pub fn load_fallback(path: Option<&Path>) -> ContentDocument {
    let Some(path) = path else {
        return ContentDocument::default();
    };

    match ContentDocument::from_path(path) {
        Ok(doc) => {
            debug!(?path, "fallback document loaded");
            doc
        }
        Err(e) => {
            warn!(?path, error = %e, "fallback document unusable, using empty document");
            ContentDocument::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &LoaderOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| FolioError::Network(format!("failed to build HTTP client: {e}")))
}

/// Fetch a URL with cache bypass and return the body of a success response.
async fn fetch_http(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-store")
        .header(PRAGMA, "no-cache")
        .send()
        .await
        .map_err(|e| FolioError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FolioError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| FolioError::Network(format!("{url}: failed to read body: {e}")))
}
