//! The `MetadataSource` seam.
//!
//! The console never talks to the network directly; it is handed a
//! `MetadataSource` so tests and offline mode can substitute their own.

use std::future::Future;
use std::pin::Pin;

use metadex_core::{DatasourceId, ListReply, SearchRequest};

use crate::error::SourceResult;

/// Boxed future alias for source calls.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = SourceResult<T>> + Send + 'a>>;

/// Remote metadata listing and sync service.
pub trait MetadataSource: Send + Sync {
    /// List one page of metadata matching `request`.
    fn list_metadata<'a>(&'a self, request: &'a SearchRequest) -> SourceFuture<'a, ListReply>;

    /// Ask the service to re-sync metadata from the datasource.
    fn sync_metadata<'a>(&'a self, datasource_id: &'a DatasourceId) -> SourceFuture<'a, ()>;
}
