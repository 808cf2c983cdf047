//! Playground routes and the host dev server they plug into.
//!
//! The playground serves a landing page, demo, documentation and prerender
//! preview for a single component. Its routes live in an ordinary axum router
//! that is mounted into the host's middleware chain through [`bridge`].

pub mod bridge;
pub mod host;
pub mod plugin;
pub mod prerender;
pub mod router;
pub mod state;

pub use bridge::{bridge, bridge_with, is_not_found, is_not_success};
pub use host::{
    HostError, HostServer, Middleware, NativeRequest, NativeResponse, Outcome, Plugin,
    PluginError, StaticFiles,
};
pub use plugin::{PlaygroundConfig, PlaygroundError, PlaygroundMiddleware, PlaygroundPlugin};
pub use prerender::{fetch_prerender, Prerender, PrerenderFetchError, PrerenderProxy};
pub use router::create_router;
pub use state::AppState;
