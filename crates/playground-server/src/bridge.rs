//! Bridge between the host's native request/response and standard HTTP types.
//!
//! The playground routes are an ordinary axum router speaking
//! `http::Request`/`http::Response`. The bridge converts a native host request
//! into a standard one, runs the service, and either copies a successful
//! response back onto the native response or hands the request to the next
//! host middleware.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tower::{Service, ServiceExt};

use crate::host::{NativeRequest, NativeResponse, Outcome};

/// Build a standard request from a native one.
///
/// The body is always empty; none of the bridged routes read it.
pub fn to_standard_request(req: &NativeRequest) -> Result<Request, axum::http::Error> {
    let mut builder = Request::builder()
        .method(req.method.as_str())
        .uri(req.url.as_str());

    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Body::empty())
}

/// Serve a native request with `service`.
///
/// Steps run strictly in order: convert the request, call the service, then
/// either defer (`Outcome::Next`, nothing written) on any non-2xx status or
/// copy status, headers and body onto `res` and close it.
pub async fn bridge<S>(service: S, req: &NativeRequest, res: &mut NativeResponse) -> Outcome
where
    S: Service<Request, Error = Infallible> + Send,
    S::Response: IntoResponse,
    S::Future: Send,
{
    bridge_with(service, req, res, is_not_success).await
}

/// Any status outside 2xx.
pub fn is_not_success(status: StatusCode) -> bool {
    !status.is_success()
}

/// 404 and 405 only; redirects and `304 Not Modified` are real answers.
pub fn is_not_found(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED
}

/// Like [`bridge`], deferring whenever `is_miss` holds for the status.
pub async fn bridge_with<S>(
    service: S,
    req: &NativeRequest,
    res: &mut NativeResponse,
    is_miss: fn(StatusCode) -> bool,
) -> Outcome
where
    S: Service<Request, Error = Infallible> + Send,
    S::Response: IntoResponse,
    S::Future: Send,
{
    let request = match to_standard_request(req) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Deferring unconvertible request {} {}: {}", req.method, req.url, e);
            return Outcome::Next;
        }
    };

    let response = match service.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    };

    let status = response.status();
    if is_miss(status) {
        tracing::debug!("Deferring {} {} ({})", req.method, req.url, status);
        return Outcome::Next;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read response body for {}: {}", req.url, e);
            return Outcome::Next;
        }
    };

    res.status_code = status.as_u16();
    for (name, value) in parts.headers.iter() {
        res.append_header(
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    res.end(bytes.to_vec());

    Outcome::Handled
}
