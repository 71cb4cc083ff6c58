//! Experience region: one timeline card per job.

use folio_shared::{ContentDocument, Experience, Result, Text};
use tracing::debug;

use super::profile::SEPARATOR;
use super::{RegionOutcome, RegionRenderer, timeline_markup};
use crate::escape::escape;
use crate::page::Page;
use crate::targets::{EXPERIENCE, resolve_first};

/// Renders the `experience` slice. Absent or empty input leaves any
/// placeholder markup in the page untouched.
pub struct ExperienceRenderer;

impl RegionRenderer for ExperienceRenderer {
    fn render(&self, doc: &ContentDocument, page: &mut Page) -> Result<RegionOutcome> {
        let Some(jobs) = doc.experience.as_deref().filter(|jobs| !jobs.is_empty()) else {
            return Ok(RegionOutcome::Skipped);
        };
        let Some(target) = resolve_first(page, EXPERIENCE)? else {
            return Ok(RegionOutcome::NoTarget);
        };

        let cards: String = jobs.iter().map(card).collect();
        let markup = timeline_markup(page, &target, &cards);
        page.set_inner_html(&target, &markup)?;

        debug!(cards = jobs.len(), target = target.pattern(), "experience rendered");
        Ok(RegionOutcome::Rendered { targets: 1 })
    }

    fn name(&self) -> &str {
        "experience"
    }
}

fn card(job: &Experience) -> String {
    let bullets: String = job
        .bullets
        .iter()
        .map(|b| format!("<li>{}</li>", escape(b)))
        .collect();

    format!(
        concat!(
            r#"<div class="timeline-card reveal">"#,
            r#"<h3 class="title">{role} — {company}</h3>"#,
            r#"<div class="inst">{city}{sep}{dates}</div>"#,
            r#"<ul class="muted" style="margin-top:10px;line-height:1.8">{bullets}</ul>"#,
            "</div>"
        ),
        role = escape(Text::or_empty(&job.role)),
        company = escape(Text::or_empty(&job.company)),
        city = escape(Text::or_empty(&job.city)),
        dates = escape(Text::or_empty(&job.dates)),
        sep = SEPARATOR,
        bullets = bullets,
    )
}
