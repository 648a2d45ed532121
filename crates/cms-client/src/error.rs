//! Error types for CMS access.

use cms_content::ContentError;

use crate::xmlrpc::XmlRpcError;

/// Error from fetching pages from the CMS.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The CMS answered with an XML-RPC fault.
    #[error("CMS fault {code}: {message}")]
    Fault {
        /// Fault code reported by the CMS.
        code: i64,
        /// Fault message reported by the CMS.
        message: String,
    },

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The response is not a valid XML-RPC document.
    #[error("invalid XML-RPC response")]
    XmlRpc(#[source] XmlRpcError),

    /// The response decoded, but is not a valid page payload.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Unknown character encoding label.
    #[error("unsupported encoding '{0}'")]
    Encoding(String),
}

impl From<XmlRpcError> for ClientError {
    fn from(err: XmlRpcError) -> Self {
        match err {
            XmlRpcError::Fault { code, message } => Self::Fault { code, message },
            other => Self::XmlRpc(other),
        }
    }
}
