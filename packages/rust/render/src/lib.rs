//! DOM-side rendering for Folio pages.
//!
//! This crate provides:
//! - [`escape`] — the HTML escaper applied to every untrusted string inserted as markup
//! - [`Page`] — a parsed HTML document that supports "replace region content" mutations
//! - [`targets`] — ordered selector candidates per region and [`resolve_first`]
//! - [`regions`] — one renderer per page region, collected in a [`RegionRegistry`]

pub mod escape;
pub mod page;
pub mod regions;
pub mod targets;

pub use escape::escape;
pub use page::Page;
pub use regions::{
    CertificationsRenderer, EducationRenderer, ExperienceRenderer, ProfileRenderer,
    RegionOutcome, RegionRegistry, RegionRenderer, SkillsRenderer,
};
pub use targets::{Target, resolve_first};
