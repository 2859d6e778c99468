//! metadexd library — assembles a running console from configuration.
//!
//! The binary parses the CLI and owns the listener; everything between a
//! loaded [`MetadexConfig`] and a ready [`DashboardState`] lives here so
//! integration tests can drive the same wiring.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use metadex_core::{DatasourceId, MetadexConfig};
use metadex_dashboard::DashboardState;
use metadex_query::{MetadataSession, QueryStateController, settle};
use metadex_source::{FixtureSource, HttpMetadataSource, MetadataSource};

/// Build the metadata source: a fixture file when given, else the remote API.
pub fn build_source(
    config: &MetadexConfig,
    fixture: Option<&Path>,
) -> anyhow::Result<Arc<dyn MetadataSource>> {
    if let Some(path) = fixture {
        let source = FixtureSource::from_file(path)
            .with_context(|| format!("loading fixture {}", path.display()))?;
        info!(path = %path.display(), rows = source.len(), "fixture source loaded");
        return Ok(Arc::new(source));
    }

    let timeout = config.source.timeout()?;
    let source = HttpMetadataSource::new(&config.source, timeout)?;
    info!(
        base_url = %config.source.base_url,
        timeout_ms = timeout.as_millis() as u64,
        "http metadata source configured"
    );
    Ok(Arc::new(source))
}

/// Build the dashboard state and run the initial fetch for
/// `ui.default_datasource`, if one is configured.
pub async fn build_state(
    config: MetadexConfig,
    fixture: Option<&Path>,
) -> anyhow::Result<DashboardState> {
    let source = build_source(&config, fixture)?;
    let controller = QueryStateController::with_page_size(config.ui.default_page_size);
    let session = MetadataSession::new(source, controller);

    if let Some(raw) = config.ui.default_datasource.as_deref() {
        match DatasourceId::parse(raw) {
            Some(id) => {
                if config.find_datasource(&id).is_none() {
                    warn!(datasource_id = %id, "default datasource is not in [[datasources]]");
                }
                debug!(datasource_id = %id, "selecting default datasource");
                settle(session.set_datasource(id).await).await;
            }
            None => debug!("blank default datasource ignored"),
        }
    }

    Ok(DashboardState::new(session, Arc::new(config)))
}
