//! Page rendering for the component playground.
//!
//! Fills the landing, demo, documentation and prerender templates from the
//! component manifest, and bundles the stylesheets and browser scripts those
//! pages load.

pub mod assets;
pub mod sections;
pub mod templates;

pub use assets::Asset;
pub use sections::{AttributeRow, ExampleSnippet, LandingSections, PayloadRow, TitleBlock};
pub use templates::{
    PageError, PrerenderView, RenderContext, TemplateEngine, TemplateId, DEFAULT_FRONTEND_ENTRY,
};
