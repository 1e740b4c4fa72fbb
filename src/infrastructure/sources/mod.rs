//! # Product Sources
//!
//! Ports and adapters for the upstream company sources and the detail
//! endpoint.
//!
//! - [`ProductSource`] / [`ProductDetailSource`]: the ports
//! - [`HttpProductSource`] / [`HttpDetailSource`]: HTTP adapters
//! - [`StaticProductSource`]: fixed in-memory catalog
//! - [`SourceRegistry`]: ordered set of listing sources

pub mod error;
pub mod http_client;
pub mod http_source;
pub mod in_memory;
pub mod registry;
pub mod traits;

pub use error::{SourceError, SourceErrorKind, SourceResult};
pub use http_client::HttpClient;
pub use http_source::{HttpDetailSource, HttpProductSource};
pub use in_memory::StaticProductSource;
pub use registry::SourceRegistry;
pub use traits::{ProductDetailSource, ProductSource};
