//! Region target resolution.
//!
//! A region may be rendered by several markup layouts. Each region lists its
//! candidate selectors in priority order; the first pattern that matches any
//! element wins, and within that pattern the first element in document order.

use folio_shared::{FolioError, Result};
use scraper::Selector;
use tracing::trace;

use crate::page::Page;

/// Ordered candidate selectors for one region, highest priority first.
pub type Candidates = &'static [&'static str];

pub const CONTACT_STRIP: Candidates = &["#contact-strip", ".contact-strip"];
pub const ABOUT: Candidates = &["#about .about-text", "#about .content", "#about p"];
pub const HERO_NAME: Candidates = &["#hero .name", ".hero .name", ".brand .name"];
pub const HERO_TITLE: Candidates = &["#hero .title", ".hero .title", ".brand .title"];
pub const LINKEDIN_LINK: Candidates = &[r#"a[href*="linkedin.com"]"#];
pub const EXPERIENCE: Candidates = &["#experience .timeline-grid", "#experience .content"];
pub const EDUCATION: Candidates = &[
    "#education .timeline-grid",
    "#education .edu-grid",
    "#education .content",
];
pub const CERTIFICATIONS: Candidates = &[
    "#certifications .content",
    "#certifications .pills",
    ".certifications .pills",
    "#certifications",
];
pub const SKILLS_PROFESSIONAL: Candidates = &["#skills .pro"];
pub const SKILLS_PERSONAL: Candidates = &["#skills .personal"];
pub const SKILLS_TOOLS: Candidates = &["#skills .tools"];
pub const SKILLS_PILLS: Candidates = &["#skills .pills"];

/// A resolved region target: the winning pattern and its compiled selector.
///
/// Page mutations apply to the first element in document order matching the
/// selector, which is the element the resolver saw.
#[derive(Debug, Clone)]
pub struct Target {
    pattern: String,
    selector: Selector,
}

impl Target {
    /// The candidate pattern that matched.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// Compile one selector pattern.
pub fn compile(pattern: &str) -> Result<Selector> {
    Selector::parse(pattern).map_err(|e| FolioError::selector(pattern, e.to_string()))
}

/// Return the first candidate that matches an element in `page`, or `None`.
pub fn resolve_first(page: &Page, candidates: &[&str]) -> Result<Option<Target>> {
    for pattern in candidates {
        let selector = compile(pattern)?;
        if page.first_match(&selector).is_some() {
            trace!(pattern, "resolved region target");
            return Ok(Some(Target {
                pattern: (*pattern).to_string(),
                selector,
            }));
        }
    }
    Ok(None)
}
