//! Template engine for rendering playground pages.

use minijinja::{context, Environment};
use serde::Serialize;

use playground_docs::TocEntry;
use playground_manifest::{is_custom_element_name, Manifest};

use crate::sections::LandingSections;

/// The pages the playground renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    Landing,
    Demo,
    Docs,
    Prerender,
}

impl TemplateId {
    /// Template file name registered with the environment.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Landing => "landing.html",
            Self::Demo => "demo.html",
            Self::Docs => "docs.html",
            Self::Prerender => "prerender.html",
        }
    }
}

/// What the prerender page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum PrerenderView {
    /// HTML fragment produced by the backend, embedded as-is
    Fragment(String),
    /// Informational message, escaped
    Notice(String),
    /// Failure message, escaped
    Failure(String),
}

/// Per-request data a page is rendered with.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub manifest: &'a Manifest,

    /// Rendered documentation HTML
    pub text: Option<String>,

    /// Documentation headings
    pub toc: Vec<TocEntry>,

    /// Prerender page content
    pub prerender: Option<PrerenderView>,

    /// Module loaded by the demo page to define the element
    pub frontend_entry: &'a str,
}

impl<'a> RenderContext<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self {
            manifest,
            text: None,
            toc: Vec::new(),
            prerender: None,
            frontend_entry: DEFAULT_FRONTEND_ENTRY,
        }
    }
}

/// Module path the demo page loads when none is configured.
pub const DEFAULT_FRONTEND_ENTRY: &str = "/frontend/index.ts";

/// Errors raised while rendering a page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Failed to render {template}: {source}")]
    Render {
        template: &'static str,
        #[source]
        source: minijinja::Error,
    },
}

/// Template engine using minijinja.
///
/// Templates are compiled once; rendering does no disk I/O.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the bundled templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in TEMPLATES {
            env.add_template_owned(name.to_string(), source.to_string())
                .expect("Failed to add bundled template");
        }

        Self { env }
    }

    /// Render a page with the given context.
    pub fn render_page(&self, id: TemplateId, ctx: &RenderContext<'_>) -> Result<String, PageError> {
        let name = id.file_name();
        let map_err = |source| PageError::Render {
            template: name,
            source,
        };

        let tmpl = self.env.get_template(name).map_err(map_err)?;

        tmpl.render(context! {
            manifest => ctx.manifest,
            sections => LandingSections::from_manifest(ctx.manifest),
            example_markup => crate::sections::ExampleSnippet::from_manifest(ctx.manifest)
                .map(|s| s.to_markup()),
            example_attributes => ctx.manifest.example_attributes(),
            element_tag => is_custom_element_name(&ctx.manifest.tag)
                .then_some(&ctx.manifest.tag),
            text => &ctx.text,
            toc => &ctx.toc,
            prerender => &ctx.prerender,
            frontend_entry => ctx.frontend_entry,
            documentation => ctx.manifest.links_documentation(),
        })
        .map_err(map_err)
    }

    /// Render the page shown when another page fails to render.
    pub fn render_error_page(&self, title: &str, message: &str) -> String {
        let rendered = self.env.get_template("error.html").and_then(|tmpl| {
            tmpl.render(context! {
                title => title,
                message => message,
            })
        });

        rendered.unwrap_or_else(|e| {
            tracing::warn!("Failed to render error page: {}", e);
            format!(
                "<!DOCTYPE html><title>Playground error</title><p>{}</p>",
                minijinja::HtmlEscape(message)
            )
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../templates/pages/base.html")),
    ("landing.html", include_str!("../templates/pages/landing.html")),
    ("demo.html", include_str!("../templates/pages/demo.html")),
    ("docs.html", include_str!("../templates/pages/docs.html")),
    ("prerender.html", include_str!("../templates/pages/prerender.html")),
    ("error.html", include_str!("../templates/pages/error.html")),
];
