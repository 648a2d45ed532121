//! Page endpoint.
//!
//! Fetches the content tree for the requested identifier and responds with
//! the rendered XHTML document.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use cms_renderer::PageRenderer;
use encoding_rs::{Encoding, UTF_8};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

/// Used when the page declares no usable content type.
const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Handle GET / (the front page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    serve_page(&state, String::new(), &headers).await
}

/// Handle GET /{*identifier}.
pub(crate) async fn get_page(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    serve_page(&state, identifier, &headers).await
}

async fn serve_page(
    state: &AppState,
    identifier: String,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    tracing::debug!(identifier = %identifier, "Serving page");

    // The CMS client is blocking.
    let pages = Arc::clone(&state.source);
    let tree = tokio::task::spawn_blocking(move || {
        pages
            .get_page(&identifier)
            .map_err(|source| ServerError::Fetch { identifier, source })
    })
    .await??;

    let renderer = PageRenderer::new(&tree);
    let html = renderer.render_page()?;
    let status = StatusCode::from_u16(renderer.http_status()).unwrap_or(StatusCode::OK);
    let etag = compute_etag(&state.version, &html);

    if status == StatusCode::OK && etag_matches(headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    let (content_type, body) = encode_body(html, content_type(&tree.content_type));

    Ok((
        status,
        [(header::CONTENT_TYPE, content_type)],
        [(header::ETAG, etag)],
        body,
    )
        .into_response())
}

/// Whether `If-None-Match` lists `etag` (weak tags compare equal) or is `*`.
fn etag_matches(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .any(|tag| tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag)
}

/// Encode the document in the charset its content type declares.
///
/// Characters outside a legacy charset become numeric character references.
/// An unknown charset, or one that cannot be produced (UTF-16), falls back to
/// UTF-8 under the default content type.
fn encode_body(html: String, content_type: HeaderValue) -> (HeaderValue, Vec<u8>) {
    let Some(label) = content_type.to_str().ok().and_then(declared_charset) else {
        return (content_type, html.into_bytes());
    };

    let encoding = Encoding::for_label(label.as_bytes());
    if encoding == Some(UTF_8) {
        return (content_type, html.into_bytes());
    }

    let encoded = encoding.and_then(|encoding| {
        let (bytes, used, _) = encoding.encode(&html);
        (used == encoding).then(|| bytes.into_owned())
    });

    match encoded {
        Some(bytes) => (content_type, bytes),
        None => {
            tracing::warn!(charset = label, "Cannot encode page in declared charset");
            (HeaderValue::from_static(DEFAULT_CONTENT_TYPE), html.into_bytes())
        }
    }
}

/// The `charset` parameter of a content type.
fn declared_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// The page's declared content type, if it is a valid header value.
fn content_type(declared: &str) -> HeaderValue {
    let declared = declared.trim();
    if !declared.is_empty()
        && let Ok(value) = HeaderValue::from_str(declared)
    {
        return value;
    }
    HeaderValue::from_static(DEFAULT_CONTENT_TYPE)
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
