//! Host development server contract.
//!
//! The playground runs as a middleware inside a host dev server that has its
//! own request/response representation. This module models that host: plain
//! data native requests and responses, a middleware chain with a `next`
//! continuation, plugin lifecycle hooks, and a static-file fallback.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures::future::BoxFuture;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::bridge::{bridge_with, is_not_found};

/// A request as the host hands it to middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeRequest {
    pub method: String,
    /// Path and query, e.g. `/demo?x=1`
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl NativeRequest {
    /// A `GET` request for `url` with no headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn from_request(req: &Request) -> Self {
        let url = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let headers = req
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Self {
            method: req.method().as_str().to_string(),
            url,
            headers,
        }
    }
}

/// A mutable response middleware writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeResponse {
    pub status_code: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    finished: bool,
}

impl Default for NativeResponse {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: Vec::new(),
            body: Vec::new(),
            finished: false,
        }
    }
}

impl NativeResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    /// Add a header value, keeping existing values with the same name.
    pub fn append_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.push((name.to_string(), value.into()));
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Write the body and close the response.
    pub fn end(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header {}", name),
            }
        }

        response
    }
}

/// What a middleware did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was written and closed
    Handled,
    /// Continue with the next middleware
    Next,
}

/// A link in the host's middleware chain.
pub trait Middleware: Send + Sync {
    fn handle<'a>(
        &'a self,
        req: &'a NativeRequest,
        res: &'a mut NativeResponse,
    ) -> BoxFuture<'a, Outcome>;
}

/// Error returned by plugin hooks.
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

/// An extension of the host dev server.
pub trait Plugin: Send {
    fn name(&self) -> &'static str;

    /// Runs once before the server accepts connections.
    fn build_start(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Registers middleware. Runs after every plugin's `build_start`.
    fn configure_server(&self, server: &mut HostServer) -> Result<(), PluginError>;
}

/// Errors that can occur with the host server.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Plugin {plugin} failed to start: {source}")]
    Plugin {
        plugin: &'static str,
        #[source]
        source: PluginError,
    },

    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Host dev server: an ordered middleware chain with a fallback.
#[derive(Default)]
pub struct HostServer {
    middlewares: Vec<Arc<dyn Middleware>>,
    fallback: Vec<Arc<dyn Middleware>>,
}

impl HostServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run plugin lifecycle hooks and build the server.
    ///
    /// Every `build_start` runs before any `configure_server`; the first
    /// failure aborts startup.
    pub fn start(mut plugins: Vec<Box<dyn Plugin>>) -> Result<Self, HostError> {
        for plugin in plugins.iter_mut() {
            tracing::debug!("Running build_start for {}", plugin.name());
            plugin.build_start().map_err(|source| HostError::Plugin {
                plugin: plugin.name(),
                source,
            })?;
        }

        let mut server = Self::new();
        for plugin in &plugins {
            plugin
                .configure_server(&mut server)
                .map_err(|source| HostError::Plugin {
                    plugin: plugin.name(),
                    source,
                })?;
        }

        Ok(server)
    }

    /// Append a middleware to the chain.
    pub fn use_middleware(&mut self, middleware: impl Middleware + 'static) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Append a handler to the host's own fallback chain.
    pub fn with_fallback(mut self, middleware: impl Middleware + 'static) -> Self {
        self.fallback.push(Arc::new(middleware));
        self
    }

    /// Run a request through the middleware and fallback chains.
    pub async fn dispatch(&self, req: &NativeRequest) -> NativeResponse {
        let mut res = NativeResponse::new();

        for middleware in self.middlewares.iter().chain(&self.fallback) {
            if middleware.handle(req, &mut res).await == Outcome::Handled {
                return res;
            }
        }

        let mut res = NativeResponse::new();
        res.status_code = 404;
        res.set_header("content-type", "text/plain; charset=utf-8");
        res.end("Not Found");
        res
    }

    /// Serve the host over TCP until the listener fails.
    pub async fn serve(self, listener: tokio::net::TcpListener) -> Result<(), HostError> {
        let host = Arc::new(self);

        let app = Router::new()
            .fallback(move |req: Request| {
                let host = Arc::clone(&host);
                async move {
                    let native = NativeRequest::from_request(&req);
                    host.dispatch(&native).await.into_response()
                }
            })
            .layer(TraceLayer::new_for_http());

        axum::serve(listener, app).await.map_err(HostError::Serve)
    }

    /// Bind `addr` and serve.
    pub async fn listen(self, addr: SocketAddr) -> Result<(), HostError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| HostError::Bind(addr, e))?;

        tracing::info!("Dev server listening on http://{}", addr);

        self.serve(listener).await
    }
}

/// Host fallback serving files from the project directory.
///
/// Only a 404 or 405 falls through; redirects and `304 Not Modified`
/// responses are passed to the client.
#[derive(Clone)]
pub struct StaticFiles {
    dir: ServeDir,
}

impl StaticFiles {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: ServeDir::new(root),
        }
    }
}

impl Middleware for StaticFiles {
    fn handle<'a>(
        &'a self,
        req: &'a NativeRequest,
        res: &'a mut NativeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(bridge_with(self.dir.clone(), req, res, is_not_found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct Fixed(&'static str);

    impl Middleware for Fixed {
        fn handle<'a>(
            &'a self,
            _req: &'a NativeRequest,
            res: &'a mut NativeResponse,
        ) -> BoxFuture<'a, Outcome> {
            Box::pin(async move {
                res.end(self.0);
                Outcome::Handled
            })
        }
    }

    struct Pass(Arc<AtomicUsize>);

    impl Middleware for Pass {
        fn handle<'a>(
            &'a self,
            _req: &'a NativeRequest,
            _res: &'a mut NativeResponse,
        ) -> BoxFuture<'a, Outcome> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
                Outcome::Next
            })
        }
    }

    struct Recorder {
        log: Arc<std::sync::Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl Plugin for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn build_start(&mut self) -> Result<(), PluginError> {
            self.log.lock().unwrap().push("build_start");
            if self.fail {
                return Err("no manifest".into());
            }
            Ok(())
        }

        fn configure_server(&self, server: &mut HostServer) -> Result<(), PluginError> {
            self.log.lock().unwrap().push("configure_server");
            server.use_middleware(Fixed("from plugin"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn runs_middleware_in_order_until_handled() {
        let passes = Arc::new(AtomicUsize::new(0));
        let mut host = HostServer::new();
        host.use_middleware(Pass(Arc::clone(&passes)));
        host.use_middleware(Fixed("second"));
        host.use_middleware(Fixed("third"));

        let res = host.dispatch(&NativeRequest::get("/")).await;

        assert_eq!(passes.load(Ordering::SeqCst), 1);
        assert_eq!(res.body(), b"second");
    }

    #[tokio::test]
    async fn falls_back_then_404s() {
        let host = HostServer::new().with_fallback(Fixed("fallback"));
        let res = host.dispatch(&NativeRequest::get("/x")).await;
        assert_eq!(res.body(), b"fallback");

        let res = HostServer::new().dispatch(&NativeRequest::get("/x")).await;
        assert_eq!(res.status_code, 404);
        assert!(res.is_finished());
    }

    #[test]
    fn lifecycle_hooks_run_in_order() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let plugin = Recorder {
            log: Arc::clone(&log),
            fail: false,
        };

        let host = HostServer::start(vec![Box::new(plugin)]).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["build_start", "configure_server"]);
        assert_eq!(host.middlewares.len(), 1);
    }

    #[test]
    fn failing_build_start_aborts() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let plugin = Recorder {
            log: Arc::clone(&log),
            fail: true,
        };

        let result = HostServer::start(vec![Box::new(plugin)]);

        assert!(matches!(result, Err(HostError::Plugin { plugin: "recorder", .. })));
        assert_eq!(*log.lock().unwrap(), vec!["build_start"]);
    }

    #[tokio::test]
    async fn static_fallback_serves_project_files() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("hello.txt"), "hi").unwrap();
        let host = HostServer::new().with_fallback(StaticFiles::new(temp.path()));

        let res = host.dispatch(&NativeRequest::get("/hello.txt")).await;
        assert_eq!(res.status_code, 200);
        assert_eq!(res.body(), b"hi");

        let res = host.dispatch(&NativeRequest::get("/missing.txt")).await;
        assert_eq!(res.status_code, 404);
        assert_eq!(res.body(), b"Not Found");
    }

    #[tokio::test]
    async fn static_fallback_answers_revalidation_with_not_modified() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("hello.txt"), "hi").unwrap();
        let host = HostServer::new().with_fallback(StaticFiles::new(temp.path()));

        let first = host.dispatch(&NativeRequest::get("/hello.txt")).await;
        let last_modified = first.header("last-modified").unwrap().to_string();

        let revalidate = NativeRequest {
            headers: vec![("If-Modified-Since".to_string(), last_modified)],
            ..NativeRequest::get("/hello.txt")
        };
        let res = host.dispatch(&revalidate).await;

        assert_eq!(res.status_code, 304);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn static_fallback_redirects_directories_to_trailing_slash() {
        let temp = tempdir().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub").join("index.html"), "<p>sub</p>").unwrap();
        let host = HostServer::new().with_fallback(StaticFiles::new(temp.path()));

        let res = host.dispatch(&NativeRequest::get("/sub")).await;

        assert_eq!(res.status_code, 307);
        assert_eq!(res.header("location"), Some("/sub/"));

        let res = host.dispatch(&NativeRequest::get("/sub/")).await;
        assert_eq!(res.status_code, 200);
        assert_eq!(res.body(), b"<p>sub</p>");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let mut res = NativeResponse::new();
        res.set_header("Content-Type", "text/plain");
        res.set_header("content-type", "text/html");

        assert_eq!(res.headers().len(), 1);
        assert_eq!(res.header("CONTENT-TYPE"), Some("text/html"));
    }
}
