//! Request handlers.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Prefix of file routes.
pub(crate) const FILE_ROUTE_PREFIX: &str = "/file/";

/// `GET /list`: the cached listing, byte for byte.
pub(crate) async fn list(State(state): State<Arc<AppState>>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], state.listing()).into_response()
}

/// `GET /file/{*path}`: stream one indexed file, honouring `Range`.
pub(crate) async fn file(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<Response, ApiError> {
    let raw = req
        .uri()
        .path()
        .strip_prefix(FILE_ROUTE_PREFIX)
        .unwrap_or_default();
    let path = decode_path(raw).ok_or_else(|| ApiError::bad_request("Invalid URL path"))?;

    let node = state
        .tree()
        .resolve_path(&path)
        .ok_or_else(|| ApiError::not_found(format!("No file at {path}")))?;
    let local_path = node
        .local_path()
        .ok_or_else(|| ApiError::not_found(format!("No file at {path}")))?;
    debug!(path = %path, local = %local_path.display(), "streaming file");

    let response = ServeFile::new(local_path)
        .oneshot(req)
        .await
        .map_err(|err| ApiError::bad_request(format!("cannot send file: {err}")))?;

    // The file was resolved, so a 404 or 500 here means it could not be opened
    let status = response.status();
    if status.is_server_error() || status == axum::http::StatusCode::NOT_FOUND {
        warn!(local = %local_path.display(), %status, "cannot open indexed file");
        return Err(ApiError::bad_request("cannot send file"));
    }

    Ok(response.map(Body::new))
}

/// Percent-decode a request path.
///
/// Returns `None` for a `%` not followed by two hex digits or for bytes that
/// do not decode to UTF-8.
pub(crate) fn decode_path(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    urlencoding::decode(raw).ok().map(|decoded| decoded.into_owned())
}
