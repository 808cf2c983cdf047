//! Endpoint placeholder substitution for published manifests.
//!
//! Manifests reference their deployed frontend and backend through the
//! `__FRONTEND__` and `__BACKEND__` markers. Publishing a manifest replaces
//! them with the configured URLs.

/// Marker replaced by the frontend URL.
pub const FRONTEND_PLACEHOLDER: &str = "__FRONTEND__";

/// Marker replaced by the backend URL.
pub const BACKEND_PLACEHOLDER: &str = "__BACKEND__";

/// Deployed URLs substituted into the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub frontend_url: Option<String>,
    pub backend_url: Option<String>,
}

/// Replace every endpoint marker in `source`.
///
/// An unset endpoint substitutes the empty string.
pub fn substitute_placeholders(source: &str, endpoints: &Endpoints) -> String {
    source
        .replace(
            FRONTEND_PLACEHOLDER,
            endpoints.frontend_url.as_deref().unwrap_or_default(),
        )
        .replace(
            BACKEND_PLACEHOLDER,
            endpoints.backend_url.as_deref().unwrap_or_default(),
        )
}
