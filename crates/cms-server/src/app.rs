//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Every path maps to the CMS page with that identifier; `/` is the front
/// page.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::pages::get_root_page))
        .route("/{*identifier}", get(handlers::pages::get_page))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use cms_client::{ClientError, PageSearch, PageSource};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Serves canned payloads keyed by identifier.
    struct StubSource;

    impl PageSource for StubSource {
        fn page(&self, identifier: &str) -> Result<Value, ClientError> {
            match identifier {
                "" => Ok(json!({
                    "id": 1,
                    "language": "da",
                    "title": "Forside",
                    "navigation_toplevel": [
                        {"id": 1, "url": "/", "navigation_name": "Home"},
                        {"id": 2, "url": "/news", "navigation_name": "News"}
                    ],
                    "sections": [
                        {"section_identifier": "head", "type": "shorttext", "text": "Hello & welcome"}
                    ]
                })),
                "news/2024" => Ok(json!({
                    "title": "News",
                    "content_type": "application/xhtml+xml; charset=utf-8",
                    "sections": []
                })),
                "dansk" => Ok(json!({
                    "title": "Idrætshøjskole",
                    "content_type": "text/html; charset=iso-8859-1",
                    "sections": []
                })),
                "gone" => Ok(json!({
                    "title": "Not found",
                    "http_header_status": "HTTP/1.0 404 Not Found",
                    "sections": []
                })),
                "odd" => Ok(json!({
                    "sections": [{"section_identifier": "x", "type": "hologram"}]
                })),
                "broken" => Ok(json!(["not", "a", "page"])),
                _ => Err(ClientError::Fault {
                    code: 3,
                    message: "<b>no such page</b>".to_owned(),
                }),
            }
        }

        fn page_list(&self, _search: &PageSearch) -> Result<Value, ClientError> {
            Ok(json!([]))
        }
    }

    fn router() -> Router {
        create_router(Arc::new(AppState {
            source: Arc::new(StubSource),
            version: "1.0.0".to_owned(),
        }))
    }

    async fn get(uri: &str, if_none_match: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(etag) = if_none_match {
            request = request.header(header::IF_NONE_MATCH, etag);
        }
        router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_front_page() {
        let response = get("/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert!(response.headers().contains_key(header::ETAG));

        let body = body_text(response).await;
        assert!(body.starts_with("<!DOCTYPE html"));
        assert!(body.contains("<title>Forside</title>"));
        assert!(body.contains("<h2>Hello &amp; welcome</h2>"));
        assert!(body.contains("<li id=\"navigation-current\""));
    }

    #[tokio::test]
    async fn test_nested_identifier_and_declared_content_type() {
        let response = get("/news/2024", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xhtml+xml; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_declared_status() {
        let response = get("/gone", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("<title>Not found</title>"));
    }

    #[tokio::test]
    async fn test_if_none_match() {
        let response = get("/", None).await;
        let etag = response.headers()[header::ETAG].to_str().unwrap().to_owned();

        let response = get("/", Some(&etag)).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers()[header::ETAG], etag.as_str());
        assert!(body_text(response).await.is_empty());

        let response = get("/", Some("\"stale\"")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_bad_gateway() {
        let response = get("/missing", None).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_text(response).await;
        assert!(body.contains("&lt;b&gt;no such page&lt;/b&gt;"));
        assert!(!body.contains("<b>"));
    }

    #[tokio::test]
    async fn test_malformed_page_is_bad_gateway() {
        let response = get("/broken", None).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_render_failure_is_internal_error() {
        let response = get("/odd", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("hologram"));
    }

    #[tokio::test]
    async fn test_security_headers() {
        for uri in ["/", "/missing"] {
            let response = get(uri, None).await;
            assert_eq!(response.headers()["x-content-type-options"], "nosniff");
            assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
        }
    }

    #[tokio::test]
    async fn test_body_is_encoded_in_declared_charset() {
        let response = get("/dansk", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=iso-8859-1"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let latin1 = b"<title>Idr\xe6tsh\xf8jskole</title>";
        assert!(body.windows(latin1.len()).any(|w| w == latin1));
        assert!(!body.windows(2).any(|w| w == "æ".as_bytes()));
    }

    #[tokio::test]
    async fn test_weak_etag_in_list_is_not_modified() {
        let response = get("/", None).await;
        let etag = response.headers()[header::ETAG].to_str().unwrap().to_owned();

        let response = get("/", Some(&format!("\"stale\", W/{etag}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }
}
