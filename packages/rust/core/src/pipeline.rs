//! End-to-end render pipeline: load → region renderers → default theme.

use folio_loader::{ContentLoader, LoadSource};
use folio_render::{Page, RegionOutcome, RegionRegistry};
use folio_shared::ContentDocument;
use folio_storage::KeyValueStore;
use tracing::{debug, info, instrument, warn};

use crate::theme::{ThemeHook, ThemeOutcome, ThemeSettings, init_default};

/// Outcome of one region renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionReport {
    /// Region name.
    pub region: String,
    /// What the renderer did, or why it failed.
    pub result: Result<RegionOutcome, String>,
}

/// Summary of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Whether the document was fetched or the fallback was used
    /// (`None` when rendering a document supplied by the caller).
    pub source: Option<LoadSource>,
    /// One entry per region, in invocation order.
    pub regions: Vec<RegionReport>,
    /// Default theme handling.
    pub theme: ThemeOutcome,
}

impl RenderReport {
    /// Number of regions that wrote into the page.
    pub fn rendered_regions(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| matches!(r.result, Ok(RegionOutcome::Rendered { .. })))
            .count()
    }

    /// Number of regions whose renderer returned an error.
    pub fn failed_regions(&self) -> usize {
        self.regions.iter().filter(|r| r.result.is_err()).count()
    }
}

/// Runs the region renderers and the theme initializer over a page.
///
/// The persisted store and the optional host theme hook are injected so they
/// can be swapped for fakes.
pub struct Pipeline<'a> {
    registry: RegionRegistry,
    theme: ThemeSettings,
    store: &'a mut dyn KeyValueStore,
    hook: Option<&'a dyn ThemeHook>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with the built-in region renderers.
    pub fn new(store: &'a mut dyn KeyValueStore, theme: ThemeSettings) -> Self {
        Self {
            registry: RegionRegistry::new(),
            theme,
            store,
            hook: None,
        }
    }

    /// Delegate theme application to a host theme engine.
    pub fn with_hook(mut self, hook: &'a dyn ThemeHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Replace the built-in region renderers.
    pub fn with_registry(mut self, registry: RegionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Load the content document, then render it into `page`.
    #[instrument(skip_all, fields(url = %loader.source()))]
    pub async fn run(&mut self, loader: &ContentLoader, page: &mut Page) -> RenderReport {
        let (doc, source) = loader.load_with_source().await;
        let mut report = self.render(&doc, page);
        report.source = Some(source);
        report
    }

    /// Render an already-loaded document into `page`.
    ///
    /// Each region is isolated: an error in one renderer is logged and the
    /// remaining renderers still run.
    pub fn render(&mut self, doc: &ContentDocument, page: &mut Page) -> RenderReport {
        let mut regions = Vec::new();

        for renderer in self.registry.iter() {
            let region = renderer.name().to_string();
            let result = match renderer.render(doc, page) {
                Ok(outcome) => {
                    debug!(%region, ?outcome, "region done");
                    Ok(outcome)
                }
                Err(e) => {
                    warn!(%region, error = %e, "region render failed, continuing");
                    Err(e.to_string())
                }
            };
            regions.push(RegionReport { region, result });
        }

        let theme = init_default(
            doc.default_theme(),
            &self.theme,
            &mut *self.store,
            page,
            self.hook,
        );

        let report = RenderReport {
            source: None,
            regions,
            theme,
        };
        info!(
            rendered = report.rendered_regions(),
            failed = report.failed_regions(),
            theme = ?report.theme,
            "page rendered"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_loader::LoaderOptions;
    use folio_render::{Page, ProfileRenderer, RegionRenderer, SkillsRenderer};
    use folio_shared::{FolioError, Result};
    use folio_storage::MemoryStore;
    use serde_json::json;
    use url::Url;

    fn load_fixture(name: &str) -> Page {
        let path = format!("../../../fixtures/html/{name}");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("missing fixture: {path}"));
        Page::parse(&content)
    }

    fn applied(theme: &str, via_hook: bool) -> ThemeOutcome {
        ThemeOutcome::Applied {
            theme: theme.to_string(),
            via_hook,
        }
    }

    /// Always fails, as a renderer hitting a broken selector would.
    struct FailingRenderer;

    impl RegionRenderer for FailingRenderer {
        fn render(&self, _doc: &ContentDocument, _page: &mut Page) -> Result<RegionOutcome> {
            Err(FolioError::selector("#about >>", "unexpected token"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn load_content() -> ContentDocument {
        ContentDocument::from_path(std::path::Path::new(
            "../../../fixtures/json/content.fixture.json",
        ))
        .expect("content fixture")
    }

    #[test]
    fn renders_every_region_and_theme() {
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio.html");

        let report = Pipeline::new(&mut store, ThemeSettings::default())
            .render(&load_content(), &mut page);

        let names: Vec<&str> = report.regions.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, ["profile", "experience", "education", "certifications", "skills"]);
        assert_eq!(report.rendered_regions(), 5);
        assert_eq!(report.theme, applied("slate", false));
        assert_eq!(page.root_attr("data-theme").as_deref(), Some("slate"));
        assert_eq!(store.get("talal-theme-v1").unwrap().as_deref(), Some("slate"));
    }

    #[test]
    fn empty_document_is_a_no_op() {
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio.html");
        let before = page.to_html();

        let report = Pipeline::new(&mut store, ThemeSettings::default())
            .render(&ContentDocument::default(), &mut page);

        assert_eq!(page.to_html(), before);
        assert_eq!(report.rendered_regions(), 0);
        assert_eq!(report.theme, ThemeOutcome::NoDefault);
        assert_eq!(store.get("talal-theme-v1").unwrap(), None);
    }

    #[test]
    fn second_run_yields_identical_page() {
        let content = load_content();
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio-legacy.html");

        let mut pipeline = Pipeline::new(&mut store, ThemeSettings::default());
        pipeline.render(&content, &mut page);
        let first = page.to_html();
        let report = pipeline.render(&content, &mut page);

        assert_eq!(page.to_html(), first);
        assert_eq!(report.theme, ThemeOutcome::AlreadySet("slate".into()));
    }

    #[test]
    fn malformed_region_does_not_block_others() {
        let content = ContentDocument::from_value(json!({
            "profile": { "name": "Ada Lovelace" },
            "experience": "should be a list",
            "skills": { "professional": ["Analysis"] }
        }))
        .unwrap();
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio.html");

        let report =
            Pipeline::new(&mut store, ThemeSettings::default()).render(&content, &mut page);

        assert_eq!(page.text("#hero .name").unwrap().as_deref(), Some("Ada Lovelace"));
        assert_eq!(page.text("#skills .pro").unwrap().as_deref(), Some("Analysis"));
        assert_eq!(
            page.text("#experience .timeline-card").unwrap().as_deref(),
            Some("Experience placeholder")
        );
        assert_eq!(report.regions[1].result, Ok(RegionOutcome::Skipped));
        assert_eq!(report.failed_regions(), 0);
    }

    #[test]
    fn failing_renderer_does_not_stop_later_regions() {
        let renderers: Vec<Box<dyn RegionRenderer>> = vec![
            Box::new(ProfileRenderer),
            Box::new(FailingRenderer),
            Box::new(SkillsRenderer),
        ];
        let registry = RegionRegistry::with_renderers(renderers);
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio.html");

        let report = Pipeline::new(&mut store, ThemeSettings::default())
            .with_registry(registry)
            .render(&load_content(), &mut page);

        assert_eq!(report.failed_regions(), 1);
        assert_eq!(report.rendered_regions(), 2);
        assert_eq!(report.regions[1].region, "failing");
        assert!(report.regions[1].result.is_err());
        assert_eq!(page.text("#hero .name").unwrap().as_deref(), Some("Talal Example"));
        assert_eq!(page.count("#skills .personal .pill").unwrap(), 1);
        assert_eq!(report.theme, applied("slate", false));
    }

    #[test]
    fn host_hook_is_used_for_theme() {
        let hook = |page: &mut Page, theme: &str, initial: bool| {
            assert!(initial);
            let _ = page.set_root_attribute("data-host-theme", theme);
        };
        let content =
            ContentDocument::from_value(json!({ "theme": { "default": "slate" } })).unwrap();
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio.html");

        let report = Pipeline::new(&mut store, ThemeSettings::default())
            .with_hook(&hook)
            .render(&content, &mut page);

        assert_eq!(report.theme, applied("slate", true));
        assert_eq!(page.root_attr("data-host-theme").as_deref(), Some("slate"));
        assert_eq!(page.root_attr("data-theme"), None);
    }

    #[tokio::test]
    async fn run_fetches_then_renders() {
        let server = wiremock::MockServer::start().await;
        let content = std::fs::read_to_string("../../../fixtures/json/content.fixture.json")
            .expect("read content fixture");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/content.json"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(&content))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/content.json", server.uri())).unwrap();
        let loader =
            ContentLoader::new(url, ContentDocument::default(), &LoaderOptions::default()).unwrap();
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio.html");

        let report = Pipeline::new(&mut store, ThemeSettings::default())
            .run(&loader, &mut page)
            .await;

        assert_eq!(report.source, Some(LoadSource::Fetched));
        assert_eq!(page.text("#hero .name").unwrap().as_deref(), Some("Talal Example"));
    }

    #[tokio::test]
    async fn run_falls_back_when_fetch_fails() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fallback = ContentDocument::from_value(json!({
            "profile": { "title": "Fallback Title" }
        }))
        .unwrap();
        let url = Url::parse(&format!("{}/content.json", server.uri())).unwrap();
        let loader = ContentLoader::new(url, fallback, &LoaderOptions::default()).unwrap();
        let mut store = MemoryStore::new();
        let mut page = load_fixture("portfolio.html");

        let report = Pipeline::new(&mut store, ThemeSettings::default())
            .run(&loader, &mut page)
            .await;

        assert_eq!(report.source, Some(LoadSource::Fallback));
        assert_eq!(page.text("#hero .title").unwrap().as_deref(), Some("Fallback Title"));
        assert_eq!(page.text("#hero .name").unwrap().as_deref(), Some("Your Name"));
    }
}
