//! Skills region: professional, personal and tools pill groups.

use folio_shared::{ContentDocument, Result};
use tracing::debug;

use super::{RegionOutcome, RegionRenderer, pills};
use crate::page::Page;
use crate::targets::{
    SKILLS_PERSONAL, SKILLS_PILLS, SKILLS_PROFESSIONAL, SKILLS_TOOLS, resolve_first,
};

/// Renders the `skills` slice.
///
/// Pages with per-group containers get one pill run per group. Pages with a
/// single `.pills` container get professional and tools pills only.
pub struct SkillsRenderer;

impl RegionRenderer for SkillsRenderer {
    fn render(&self, doc: &ContentDocument, page: &mut Page) -> Result<RegionOutcome> {
        let Some(skills) = &doc.skills else {
            return Ok(RegionOutcome::Skipped);
        };

        let groups = [
            (SKILLS_PROFESSIONAL, &skills.professional),
            (SKILLS_PERSONAL, &skills.personal),
            (SKILLS_TOOLS, &skills.tools),
        ];

        let mut targets = 0;
        for (candidates, items) in groups {
            if let Some(target) = resolve_first(page, candidates)? {
                page.set_inner_html(&target, &pills(items, "pill"))?;
                targets += 1;
            }
        }

        if targets == 0 {
            if let Some(target) = resolve_first(page, SKILLS_PILLS)? {
                // NOTE: personal pills are left out of the single-container
                // layout. Existing pages rely on this; whether it is intended
                // is an open product question.
                let markup = pills(&skills.professional, "pill") + &pills(&skills.tools, "pill");
                page.set_inner_html(&target, &markup)?;
                targets += 1;
            }
        }

        debug!(targets, "skills rendered");
        Ok(RegionOutcome::from_count(targets))
    }

    fn name(&self) -> &str {
        "skills"
    }
}
