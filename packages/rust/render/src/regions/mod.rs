//! Region renderer trait and built-in renderers.
//!
//! Each renderer consumes one slice of the content document and mutates only
//! its own region. A missing field or a missing target is a silent no-op.

mod certifications;
mod education;
mod experience;
mod profile;
mod skills;

use folio_shared::{ContentDocument, Result, TextList};

use crate::escape::escape;
use crate::page::Page;
use crate::targets::{Candidates, Target, resolve_first};

pub use certifications::CertificationsRenderer;
pub use education::EducationRenderer;
pub use experience::ExperienceRenderer;
pub use profile::ProfileRenderer;
pub use skills::SkillsRenderer;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// What a renderer did to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOutcome {
    /// The document has no data for this region; the page is untouched.
    Skipped,
    /// Data was present but none of the region's targets exist in the page.
    NoTarget,
    /// Content was written into `targets` elements.
    Rendered { targets: usize },
}

impl RegionOutcome {
    fn from_count(targets: usize) -> Self {
        if targets == 0 {
            Self::NoTarget
        } else {
            Self::Rendered { targets }
        }
    }
}

/// Renders one page region from the content document.
pub trait RegionRenderer: Send + Sync {
    /// Apply this region's slice of `doc` to `page`.
    fn render(&self, doc: &ContentDocument, page: &mut Page) -> Result<RegionOutcome>;

    /// Region name for tracing and reports.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds the region renderers in invocation order.
pub struct RegionRegistry {
    renderers: Vec<Box<dyn RegionRenderer>>,
}

impl RegionRegistry {
    /// Create a registry with all built-in renderers.
    pub fn new() -> Self {
        Self {
            renderers: vec![
                Box::new(ProfileRenderer),
                Box::new(ExperienceRenderer),
                Box::new(EducationRenderer),
                Box::new(CertificationsRenderer),
                Box::new(SkillsRenderer),
            ],
        }
    }

    /// Create a registry holding exactly `renderers`, invoked in the given order.
    pub fn with_renderers(renderers: Vec<Box<dyn RegionRenderer>>) -> Self {
        Self { renderers }
    }

    /// Append a renderer after the existing ones.
    pub fn register(&mut self, renderer: Box<dyn RegionRenderer>) {
        self.renderers.push(renderer);
    }

    /// Renderers in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RegionRenderer> {
        self.renderers.iter().map(|r| r.as_ref())
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Shared markup helpers
// ---------------------------------------------------------------------------

/// Render each item as `<span class="{class}">item</span>`, no separator.
pub(crate) fn pills(items: &TextList, class: &str) -> String {
    items
        .iter()
        .map(|item| format!(r#"<span class="{class}">{}</span>"#, escape(item)))
        .collect()
}

/// Wrap timeline cards in their grid container, unless the target already is
/// the grid (re-rendering must not nest a new grid inside the old one).
pub(crate) fn timeline_markup(page: &Page, target: &Target, cards: &str) -> String {
    if page.target_has_class(target, "timeline-grid") {
        cards.to_string()
    } else {
        format!(r#"<div class="timeline-grid">{cards}</div>"#)
    }
}

/// Set `text` into the first resolved candidate. Empty or absent text is a no-op.
pub(crate) fn set_text_first(
    page: &mut Page,
    candidates: Candidates,
    text: Option<&str>,
) -> Result<bool> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Ok(false);
    };
    match resolve_first(page, candidates)? {
        Some(target) => page.set_text(&target, text),
        None => Ok(false),
    }
}
