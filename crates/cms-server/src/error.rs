//! Server error types.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use cms_client::ClientError;
use cms_renderer::{RenderError, escape};

/// Error from serving a page.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// The page could not be fetched, or the CMS sent a malformed page.
    #[error("Failed to fetch page '{identifier}': {source}")]
    Fetch {
        identifier: String,
        #[source]
        source: ClientError,
    },

    /// The page was fetched but could not be rendered.
    #[error("Failed to render page: {0}")]
    Render(#[from] RenderError),

    /// The blocking fetch task panicked or was cancelled.
    #[error("Page fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Fetch { .. } => StatusCode::BAD_GATEWAY,
            Self::Render(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = status.as_u16(), error = %self, "Request failed");

        (
            status,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            error_page(status, &self.to_string()),
        )
            .into_response()
    }
}

/// Minimal XHTML document describing an error.
fn error_page(status: StatusCode, message: &str) -> String {
    let title = escape(&status.to_string());
    format!(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
         \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
         <head><title>{title}</title></head>\n\
         <body><h1>{title}</h1><p>{}</p></body>\n\
         </html>\n",
        escape(message)
    )
}
