//! The playground as a host dev server plugin.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use futures::future::BoxFuture;

use crate::bridge::bridge;
use crate::host::{
    HostServer, Middleware, NativeRequest, NativeResponse, Outcome, Plugin, PluginError,
};
use crate::prerender::{PrerenderFetchError, PrerenderProxy};
use crate::router::create_router;
use crate::state::AppState;

/// Settings for the playground plugin.
#[derive(Debug, Clone)]
pub struct PlaygroundConfig {
    /// Component manifest, loaded once at startup
    pub manifest_path: PathBuf,

    /// Markdown documentation, read on every request
    pub docs_path: PathBuf,

    /// Base URL of the server-rendering backend
    pub backend_url: Option<String>,

    /// Module the demo page loads
    pub frontend_entry: String,

    pub prerender_timeout: Option<Duration>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("src/manifest.yaml"),
            docs_path: PathBuf::from("src/openmfe/index.md"),
            backend_url: None,
            frontend_entry: playground_pages::DEFAULT_FRONTEND_ENTRY.to_string(),
            prerender_timeout: None,
        }
    }
}

/// Errors raised by the playground plugin hooks.
#[derive(Debug, thiserror::Error)]
pub enum PlaygroundError {
    #[error(transparent)]
    Manifest(#[from] playground_manifest::ManifestLoadError),

    #[error(transparent)]
    Prerender(#[from] PrerenderFetchError),

    #[error("configure_server ran before build_start")]
    NotStarted,
}

/// Host plugin that mounts the playground routes.
pub struct PlaygroundPlugin {
    config: PlaygroundConfig,
    state: Option<Arc<AppState>>,
}

impl PlaygroundPlugin {
    pub fn new(config: PlaygroundConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// State built by `build_start`, if it has run.
    pub fn state(&self) -> Option<&Arc<AppState>> {
        self.state.as_ref()
    }

    fn build_state(&self) -> Result<AppState, PlaygroundError> {
        let manifest = playground_manifest::load(&self.config.manifest_path)?;
        let prerender = PrerenderProxy::new(
            self.config.backend_url.clone(),
            self.config.prerender_timeout,
        )?;

        match prerender.backend_url() {
            Some(url) => tracing::info!("Prerender backend: {}", url),
            None => tracing::info!("No prerender backend configured"),
        }

        Ok(
            AppState::new(manifest, self.config.docs_path.clone(), prerender)
                .with_frontend_entry(self.config.frontend_entry.clone()),
        )
    }
}

impl Plugin for PlaygroundPlugin {
    fn name(&self) -> &'static str {
        "playground"
    }

    fn build_start(&mut self) -> Result<(), PluginError> {
        let state = self.build_state()?;
        self.state = Some(Arc::new(state));
        Ok(())
    }

    fn configure_server(&self, server: &mut HostServer) -> Result<(), PluginError> {
        let state = self.state.clone().ok_or(PlaygroundError::NotStarted)?;
        server.use_middleware(PlaygroundMiddleware::new(state));
        Ok(())
    }
}

/// Host middleware running requests through the playground router.
#[derive(Clone)]
pub struct PlaygroundMiddleware {
    router: Router,
}

impl PlaygroundMiddleware {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            router: create_router(state),
        }
    }
}

impl Middleware for PlaygroundMiddleware {
    fn handle<'a>(
        &'a self,
        req: &'a NativeRequest,
        res: &'a mut NativeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(bridge(self.router.clone(), req, res))
    }
}
