//! Page rendering orchestration for Folio.
//!
//! This crate ties the content loader, the region renderers and the theme
//! initializer together into one run over a page (see [`pipeline`]).

pub mod pipeline;
pub mod theme;

pub use pipeline::{Pipeline, RegionReport, RenderReport};
pub use theme::{THEME_ATTRIBUTE, ThemeHook, ThemeOutcome, ThemeSettings, init_default};
