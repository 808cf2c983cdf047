//! Internal router for the playground pages and assets.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use playground_docs::render_document;
use playground_pages::{assets, TemplateId};

use crate::state::AppState;

/// Build the playground router.
///
/// Unknown paths get axum's default 404, which the bridge turns into a
/// hand-off to the next host middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route("/demo", get(demo_handler))
        .route("/documentation", get(documentation_handler))
        .route("/prerender", get(prerender_handler))
        .route("/css/{*path}", get(asset_handler))
        .route("/js/{*path}", get(asset_handler))
        .route("/assets/{*path}", get(asset_handler))
        .route("/favicon.png", get(asset_handler))
        .with_state(state)
}

async fn landing_handler(State(state): State<Arc<AppState>>) -> Response {
    state.render(TemplateId::Landing, &state.context())
}

async fn demo_handler(State(state): State<Arc<AppState>>) -> Response {
    state.render(TemplateId::Demo, &state.context())
}

async fn documentation_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut ctx = state.context();

    match tokio::fs::read_to_string(&state.docs_path).await {
        Ok(markdown) => {
            let doc = render_document(&markdown);
            ctx.text = Some(doc.html);
            ctx.toc = doc.toc;
        }
        Err(e) => {
            tracing::warn!(
                "Failed to read documentation {}: {}",
                state.docs_path.display(),
                e
            );
            ctx.text = Some(missing_docs_notice(&state.docs_path.display().to_string(), &e));
        }
    }

    state.render(TemplateId::Docs, &ctx)
}

fn missing_docs_notice(path: &str, error: &std::io::Error) -> String {
    format!(
        r#"<p class="docs-missing">No documentation could be read from <code>{}</code>: {}</p>"#,
        html_escape::encode_text(path),
        html_escape::encode_text(&error.to_string())
    )
}

async fn prerender_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut ctx = state.context();
    ctx.prerender = Some(state.prerender.fetch_prerender().await.into());

    state.render(TemplateId::Prerender, &ctx)
}

async fn asset_handler(uri: Uri) -> Response {
    match assets::get(uri.path()) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type())], asset.bytes).into_response(),
        None => {
            tracing::debug!("No bundled asset at {}", uri.path());
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::Request;
    use playground_manifest::Manifest;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::prerender::{PrerenderProxy, PLACEHOLDER_MESSAGE};

    const MY_WIDGET: &str = r#"
tag: my-widget
attributes:
  - name: label
    required: true
    schema:
      type: string
"#;

    fn state_with(yaml: &str, docs_path: PathBuf, backend_url: Option<String>) -> Arc<AppState> {
        let manifest = Manifest::from_yaml(yaml).unwrap();
        let prerender = PrerenderProxy::new(backend_url, None).unwrap();
        Arc::new(AppState::new(manifest, docs_path, prerender))
    }

    async fn get_page(router: Router, path: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn landing_page_for_minimal_widget() {
        let router = create_router(state_with(MY_WIDGET, PathBuf::from("missing.md"), None));

        let (status, html) = get_page(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<h1 class="title">my-widget</h1>"#));
        assert_eq!(html.matches(r#"<tr class="attribute-row required""#).count(), 1);
        assert!(!html.contains(r#"id="events-section""#));
        assert!(!html.contains(r#"id="functions-section""#));
    }

    #[tokio::test]
    async fn demo_page_renders() {
        let router = create_router(state_with(MY_WIDGET, PathBuf::from("missing.md"), None));

        let (status, html) = get_page(router, "/demo").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<my-widget"));
    }

    #[tokio::test]
    async fn documentation_is_read_fresh_each_request() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("index.md");
        std::fs::write(&docs, "# First\n").unwrap();
        let router = create_router(state_with(MY_WIDGET, docs.clone(), None));

        let (_, html) = get_page(router.clone(), "/documentation").await;
        assert!(html.contains(r#"<h1 id="first">First</h1>"#));

        std::fs::write(&docs, "# Second\n\n```js\nconst a = 1;\n```\n").unwrap();
        let (status, html) = get_page(router, "/documentation").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<h1 id="second">Second</h1>"#));
        assert!(html.contains(r#"class="hljs language-js""#));
    }

    #[tokio::test]
    async fn missing_documentation_renders_inline_notice() {
        let dir = tempdir().unwrap();
        let router = create_router(state_with(MY_WIDGET, dir.path().join("nope.md"), None));

        let (status, html) = get_page(router, "/documentation").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"class="docs-missing""#));
        assert!(html.contains("nope.md"));
    }

    #[tokio::test]
    async fn prerender_without_backend_shows_placeholder() {
        let router = create_router(state_with(MY_WIDGET, PathBuf::from("missing.md"), None));

        let (status, html) = get_page(router, "/prerender").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(PLACEHOLDER_MESSAGE));
    }

    #[tokio::test]
    async fn prerender_with_refused_backend_shows_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let router = create_router(state_with(
            MY_WIDGET,
            PathBuf::from("missing.md"),
            Some(format!("http://{}", addr)),
        ));

        let (status, html) = get_page(router, "/prerender").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("prerender-failure"));
        assert!(html.contains("Failed to reach prerender backend"));
    }

    #[tokio::test]
    async fn serves_bundled_assets() {
        let router = create_router(state_with(MY_WIDGET, PathBuf::from("missing.md"), None));

        let response = router
            .clone()
            .oneshot(Request::get("/css/playground.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let (status, _) = get_page(router.clone(), "/favicon.png").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_page(router, "/js/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let router = create_router(state_with(MY_WIDGET, PathBuf::from("missing.md"), None));

        let (status, body) = get_page(router, "/does-not-exist").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }
}
