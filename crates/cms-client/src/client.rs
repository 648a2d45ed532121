//! Blocking XML-RPC client for the CMS endpoint.

use std::borrow::Cow;
use std::time::Duration;

use encoding_rs::Encoding;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::error::ClientError;
use crate::search::PageSearch;
use crate::source::PageSource;
use crate::xmlrpc::{self, Value};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Prefix of every remote method name.
const DEFAULT_METHOD_PREFIX: &str = "cms.";

/// Default wire encoding of the public CMS endpoint.
const DEFAULT_ENCODING: &str = "iso-8859-1";

/// Connection settings for [`CmsClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// XML-RPC endpoint URL.
    pub url: String,
    /// Private key identifying the site owner.
    pub private_key: String,
    /// Session id sent along with the private key.
    pub session_id: String,
    /// Site whose pages are fetched.
    pub site_id: i32,
    /// Encoding label for requests, and for responses without a declaration.
    pub encoding: String,
    /// Prefix prepended to method names (`cms.`).
    pub method_prefix: String,
    /// HTTP timeout for one call.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings with the default encoding, method prefix and timeout.
    pub fn new(
        url: impl Into<String>,
        private_key: impl Into<String>,
        session_id: impl Into<String>,
        site_id: i32,
    ) -> Self {
        Self {
            url: url.into(),
            private_key: private_key.into(),
            session_id: session_id.into(),
            site_id,
            encoding: DEFAULT_ENCODING.to_owned(),
            method_prefix: DEFAULT_METHOD_PREFIX.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
        }
    }
}

/// XML-RPC client for the CMS `getPage` / `getPageList` methods.
pub struct CmsClient {
    agent: Agent,
    config: ClientConfig,
    encoding: &'static Encoding,
}

impl CmsClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Encoding`] if the configured encoding label is
    /// unknown.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let encoding = Encoding::for_label(config.encoding.as_bytes())
            .ok_or_else(|| ClientError::Encoding(config.encoding.clone()))?;

        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            config,
            encoding,
        })
    }

    /// Site whose pages this client fetches.
    #[must_use]
    pub fn site_id(&self) -> i32 {
        self.config.site_id
    }

    fn credentials(&self) -> Value {
        Value::structure([
            ("private_key", Value::from(self.config.private_key.as_str())),
            ("session_id", Value::from(self.config.session_id.as_str())),
        ])
    }

    /// Call a CMS method with the credentials and site id prepended to
    /// `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Fault`] when the CMS reports a fault, and a
    /// transport or decoding error otherwise.
    pub fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        let method = format!("{}{method}", self.config.method_prefix);
        let mut all_params = vec![self.credentials(), Value::from(self.config.site_id)];
        all_params.extend(params);

        let xml = xmlrpc::encode_call(&method, &all_params, &self.config.encoding);
        let (body, _, unmappable) = self.encoding.encode(&xml);
        if unmappable {
            debug!(method = %method, "Request contains characters outside the wire encoding");
        }

        info!(method = %method, url = %self.config.url, "Calling CMS");

        let content_type = format!("text/xml; charset={}", self.config.encoding);
        let response = self
            .agent
            .post(&self.config.url)
            .header("Content-Type", &content_type)
            .send(&body[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ClientError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let bytes = body_reader.read_to_vec()?;
        let text = decode_body(&bytes, self.encoding);
        Ok(xmlrpc::decode_response(&text)?)
    }
}

impl PageSource for CmsClient {
    fn page(&self, identifier: &str) -> Result<serde_json::Value, ClientError> {
        let value = self.call("getPage", vec![Value::from(identifier)])?;
        Ok(value.into_json())
    }

    fn page_list(&self, search: &PageSearch) -> Result<serde_json::Value, ClientError> {
        let value = self.call("getPageList", vec![search.to_value()])?;
        Ok(value.into_json())
    }
}

/// Decode a response body using its XML declaration, falling back to the
/// configured encoding. A byte order mark overrides both.
fn decode_body<'a>(bytes: &'a [u8], fallback: &'static Encoding) -> Cow<'a, str> {
    let encoding = declared_encoding(bytes).unwrap_or(fallback);
    let (text, used, malformed) = encoding.decode(bytes);
    if malformed {
        warn!(encoding = used.name(), "Response contains malformed byte sequences");
    }
    text
}

/// Encoding named in the `<?xml ... encoding="..."?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let start = head.find("<?xml")?;
    let decl = &head[start..];
    let decl = &decl[..decl.find("?>")?];

    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let label = &value[..value.find(quote)?];
    Encoding::for_label(label.as_bytes())
}
