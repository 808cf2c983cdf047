//! Proxy for server-rendered previews.
//!
//! The prerender page shows whatever HTML the component's backend renders at
//! `{backend}/api/prerender`. Failures are shown on the page instead of being
//! turned into HTTP errors.

use std::time::Duration;

use playground_pages::PrerenderView;

/// Shown when no backend URL is configured.
pub const PLACEHOLDER_MESSAGE: &str =
    "No backend URL configured. Set BACKEND_URL to preview server-rendered output.";

/// Path appended to the backend URL.
pub const PRERENDER_PATH: &str = "/api/prerender";

/// Outcome of a prerender fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerender {
    /// HTML fragment returned by the backend
    Fragment(String),
    /// No backend configured
    Placeholder,
    /// The backend could not be reached or answered with an error
    Failed(String),
}

impl Prerender {
    /// Text shown on the page.
    pub fn body(&self) -> &str {
        match self {
            Self::Fragment(html) => html,
            Self::Placeholder => PLACEHOLDER_MESSAGE,
            Self::Failed(message) => message,
        }
    }
}

impl From<Prerender> for PrerenderView {
    fn from(prerender: Prerender) -> Self {
        match prerender {
            Prerender::Fragment(html) => Self::Fragment(html),
            Prerender::Placeholder => Self::Notice(PLACEHOLDER_MESSAGE.to_string()),
            Prerender::Failed(message) => Self::Failure(message),
        }
    }
}

/// Errors that can occur while fetching a prerendered fragment.
#[derive(Debug, thiserror::Error)]
pub enum PrerenderFetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to reach prerender backend at {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Prerender backend at {url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// HTTP client for the prerender backend.
#[derive(Debug, Clone)]
pub struct PrerenderProxy {
    client: reqwest::Client,
    backend_url: Option<String>,
}

impl PrerenderProxy {
    /// Create a proxy for `backend_url`.
    ///
    /// Requests have no timeout unless one is given.
    pub fn new(
        backend_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, PrerenderFetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(PrerenderFetchError::Client)?;

        let backend_url = backend_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            client,
            backend_url,
        })
    }

    /// Configured backend base URL.
    pub fn backend_url(&self) -> Option<&str> {
        self.backend_url.as_deref()
    }

    /// Fetch the prerendered fragment. Never fails.
    pub async fn fetch_prerender(&self) -> Prerender {
        let Some(base) = self.backend_url.as_deref() else {
            return Prerender::Placeholder;
        };

        match self.request(base).await {
            Ok(html) => Prerender::Fragment(html),
            Err(e) => {
                tracing::warn!("Prerender fetch failed: {}", e);
                Prerender::Failed(e.to_string())
            }
        }
    }

    async fn request(&self, base: &str) -> Result<String, PrerenderFetchError> {
        let url = format!("{}{}", base, PRERENDER_PATH);
        tracing::debug!("Fetching prerendered fragment from {}", url);

        let request_error = |source| PrerenderFetchError::Request {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrerenderFetchError::Status {
                url: url.clone(),
                status,
            });
        }

        response.text().await.map_err(request_error)
    }
}

/// Fetch the prerendered fragment from `backend_url` with a default client.
pub async fn fetch_prerender(backend_url: Option<&str>) -> Prerender {
    match PrerenderProxy::new(backend_url.map(str::to_string), None) {
        Ok(proxy) => proxy.fetch_prerender().await,
        Err(e) => Prerender::Failed(e.to_string()),
    }
}
