//! metadex-source — where metric metadata comes from.
//!
//! # Architecture
//!
//! ```text
//! MetadataSource (trait, boxed futures)
//!   ├── HttpMetadataSource — JSON POST to the remote list/sync API
//!   └── FixtureSource      — rows from a JSON file, filtered locally
//! ```

pub mod error;
pub mod fixture;
pub mod http;
pub mod source;

pub use error::{SourceError, SourceResult};
pub use fixture::FixtureSource;
pub use http::HttpMetadataSource;
pub use source::{MetadataSource, SourceFuture};
