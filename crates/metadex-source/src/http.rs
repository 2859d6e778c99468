//! HTTP client for the remote metadata service.
//!
//! Both calls are JSON `POST`s against paths configured in
//! `[source]`. A non-2xx reply is an error carrying the status and body.

use std::time::Duration;

use tracing::{debug, warn};

use metadex_core::config::SourceConfig;
use metadex_core::{DatasourceId, ListReply, SearchRequest, SyncRequest};

use crate::error::{SourceError, SourceResult};
use crate::source::{MetadataSource, SourceFuture};

/// `MetadataSource` backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpMetadataSource {
    client: reqwest::Client,
    list_url: String,
    sync_url: String,
    token: Option<String>,
}

impl HttpMetadataSource {
    pub fn new(config: &SourceConfig, timeout: Duration) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("metadex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            list_url: format!("{base}{}", config.list_path),
            sync_url: format!("{base}{}", config.sync_path),
            token: config.token.clone(),
        })
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.client.post(url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(resp: reqwest::Response) -> SourceResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %body, "metadata service returned an error");
        Err(SourceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl MetadataSource for HttpMetadataSource {
    fn list_metadata<'a>(&'a self, request: &'a SearchRequest) -> SourceFuture<'a, ListReply> {
        Box::pin(async move {
            if request.datasource_id.is_none() {
                return Err(SourceError::MissingDatasource);
            }
            debug!(url = %self.list_url, ?request, "listing metadata");
            let resp = self.post(&self.list_url).json(request).send().await?;
            let resp = Self::check(resp).await?;
            Ok(resp.json::<ListReply>().await?)
        })
    }

    fn sync_metadata<'a>(&'a self, datasource_id: &'a DatasourceId) -> SourceFuture<'a, ()> {
        Box::pin(async move {
            debug!(url = %self.sync_url, %datasource_id, "syncing metadata");
            let body = SyncRequest {
                datasource_id: datasource_id.clone(),
            };
            let resp = self.post(&self.sync_url).json(&body).send().await?;
            Self::check(resp).await?;
            Ok(())
        })
    }
}
