//! Shared, read-only state for the playground routes.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use playground_manifest::Manifest;
use playground_pages::{RenderContext, TemplateEngine, TemplateId};

use crate::prerender::PrerenderProxy;

/// Snapshot built once at startup and shared by every request.
pub struct AppState {
    pub manifest: Arc<Manifest>,
    pub templates: TemplateEngine,
    pub docs_path: PathBuf,
    pub frontend_entry: String,
    pub prerender: PrerenderProxy,
}

impl AppState {
    pub fn new(manifest: Manifest, docs_path: PathBuf, prerender: PrerenderProxy) -> Self {
        Self {
            manifest: Arc::new(manifest),
            templates: TemplateEngine::new(),
            docs_path,
            frontend_entry: playground_pages::DEFAULT_FRONTEND_ENTRY.to_string(),
            prerender,
        }
    }

    pub fn with_frontend_entry(mut self, entry: impl Into<String>) -> Self {
        self.frontend_entry = entry.into();
        self
    }

    /// A render context for this state's manifest.
    pub fn context(&self) -> RenderContext<'_> {
        RenderContext {
            frontend_entry: &self.frontend_entry,
            ..RenderContext::new(&self.manifest)
        }
    }

    /// Render a page, degrading to the error page on template failure.
    ///
    /// Both outcomes answer 200 so the browser always shows something.
    pub fn render(&self, id: TemplateId, ctx: &RenderContext<'_>) -> Response {
        match self.templates.render_page(id, ctx) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::warn!("{}", e);
                let page = self
                    .templates
                    .render_error_page("Page failed to render", &e.to_string());
                (StatusCode::OK, Html(page)).into_response()
            }
        }
    }
}
