//! Education region: one timeline card per degree, badges as pills.

use folio_shared::{ContentDocument, Education, Result, Text};
use tracing::debug;

use super::profile::SEPARATOR;
use super::{RegionOutcome, RegionRenderer, pills, timeline_markup};
use crate::escape::escape;
use crate::page::Page;
use crate::targets::{EDUCATION, resolve_first};

/// Renders the `education` slice.
pub struct EducationRenderer;

impl RegionRenderer for EducationRenderer {
    fn render(&self, doc: &ContentDocument, page: &mut Page) -> Result<RegionOutcome> {
        let Some(entries) = doc.education.as_deref().filter(|e| !e.is_empty()) else {
            return Ok(RegionOutcome::Skipped);
        };
        let Some(target) = resolve_first(page, EDUCATION)? else {
            return Ok(RegionOutcome::NoTarget);
        };

        let cards: String = entries.iter().map(card).collect();
        let markup = timeline_markup(page, &target, &cards);
        page.set_inner_html(&target, &markup)?;

        debug!(cards = entries.len(), target = target.pattern(), "education rendered");
        Ok(RegionOutcome::Rendered { targets: 1 })
    }

    fn name(&self) -> &str {
        "education"
    }
}

fn card(entry: &Education) -> String {
    format!(
        concat!(
            r#"<div class="timeline-card reveal">"#,
            r#"<h3 class="title">{degree}</h3>"#,
            r#"<div class="inst">{school}{sep}{years}</div>"#,
            r#"<div class="meta">{badges}</div>"#,
            "</div>"
        ),
        degree = escape(Text::or_empty(&entry.degree)),
        school = escape(Text::or_empty(&entry.school)),
        years = escape(Text::or_empty(&entry.years)),
        sep = SEPARATOR,
        badges = pills(&entry.badges, "badge"),
    )
}
