//! Profile region: contact strip, about text, LinkedIn link, hero name/title.

use std::sync::LazyLock;

use folio_shared::{ContentDocument, Profile, Result, Text};
use regex::Regex;
use tracing::debug;

use super::{RegionOutcome, RegionRenderer, set_text_first};
use crate::page::Page;
use crate::targets::{ABOUT, CONTACT_STRIP, HERO_NAME, HERO_TITLE, LINKEDIN_LINK, resolve_first};

/// Separator between contact items and between timeline metadata parts.
pub(crate) const SEPARATOR: &str = " • ";

/// Renders the `profile` slice.
pub struct ProfileRenderer;

impl RegionRenderer for ProfileRenderer {
    fn render(&self, doc: &ContentDocument, page: &mut Page) -> Result<RegionOutcome> {
        let Some(profile) = &doc.profile else {
            return Ok(RegionOutcome::Skipped);
        };

        let mut targets = 0;

        let contact = contact_line(profile);
        if set_text_first(page, CONTACT_STRIP, Some(contact.as_str()))? {
            targets += 1;
        }

        if set_text_first(page, ABOUT, Text::non_empty(&profile.about))? {
            targets += 1;
        }

        if let Some(url) = Text::non_empty(&profile.linkedin) {
            if let Some(link) = resolve_first(page, LINKEDIN_LINK)? {
                page.set_attribute(&link, "href", url)?;
                targets += 1;
            }
        }

        if set_text_first(page, HERO_NAME, Text::non_empty(&profile.name))? {
            targets += 1;
        }
        if set_text_first(page, HERO_TITLE, Text::non_empty(&profile.title))? {
            targets += 1;
        }

        debug!(targets, "profile rendered");
        Ok(RegionOutcome::from_count(targets))
    }

    fn name(&self) -> &str {
        "profile"
    }
}

/// Location, phone, email and the scheme-less LinkedIn URL, skipping blanks.
pub(crate) fn contact_line(profile: &Profile) -> String {
    static SCHEME_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^https?://").expect("valid regex"));

    let linkedin = SCHEME_RE.replace(Text::or_empty(&profile.linkedin), "");

    [
        Text::or_empty(&profile.location),
        Text::or_empty(&profile.phone),
        Text::or_empty(&profile.email),
        linkedin.as_ref(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(SEPARATOR)
}
