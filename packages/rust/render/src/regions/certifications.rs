//! Certifications region: a flat run of pills.

use folio_shared::{ContentDocument, Result};
use tracing::debug;

use super::{RegionOutcome, RegionRenderer, pills};
use crate::page::Page;
use crate::targets::{CERTIFICATIONS, resolve_first};

/// Renders the `certifications` slice (single value or sequence).
pub struct CertificationsRenderer;

impl RegionRenderer for CertificationsRenderer {
    fn render(&self, doc: &ContentDocument, page: &mut Page) -> Result<RegionOutcome> {
        let Some(certs) = &doc.certifications else {
            return Ok(RegionOutcome::Skipped);
        };
        let Some(target) = resolve_first(page, CERTIFICATIONS)? else {
            return Ok(RegionOutcome::NoTarget);
        };

        page.set_inner_html(&target, &pills(certs, "pill"))?;

        debug!(count = certs.len(), target = target.pattern(), "certifications rendered");
        Ok(RegionOutcome::Rendered { targets: 1 })
    }

    fn name(&self) -> &str {
        "certifications"
    }
}
