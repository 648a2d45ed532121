//! XML-RPC access to the Intraface CMS.
//!
//! The CMS exposes two methods, `cms.getPage` and `cms.getPageList`, each
//! taking the site owner's credentials, the site id and a page identifier or
//! search struct. This crate provides:
//!
//! - [`xmlrpc`]: the wire codec (`<methodCall>` / `<methodResponse>`)
//! - [`CmsClient`]: a blocking client over `ureq` with a configurable
//!   timeout and wire encoding
//! - [`PageSource`]: the seam the server and CLI fetch pages through
//! - [`CachedSource`]: a [`PageSource`] wrapper backed by `cms-cache`
//!
//! # Example
//!
//! ```no_run
//! use cms_client::{ClientConfig, CmsClient, PageSource};
//!
//! let config = ClientConfig::new(
//!     "http://www.intraface.dk/xmlrpc/cms/server0300.php",
//!     "private-key",
//!     "session",
//!     12,
//! );
//! let client = CmsClient::new(config)?;
//! let tree = client.get_page("")?;
//! println!("{}", tree.title);
//! # Ok::<(), cms_client::ClientError>(())
//! ```

mod client;
mod error;
mod search;
mod source;
pub mod xmlrpc;

pub use client::{ClientConfig, CmsClient};
pub use error::ClientError;
pub use search::PageSearch;
pub use source::{CachedSource, PageSource};
