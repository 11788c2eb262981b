// ── Orchestrator ──
//
// Lifecycle verbs over the controller. Each submodule adds one group of
// verbs as an `impl` block. Creation workflows undo their own partial work
// on failure; deletion workflows treat "already absent" as success.

mod node;
mod routing;
mod subintf;
mod vpc;
mod vxnet;

use std::sync::Arc;

use tracing::{info, warn};

use terra_api::TerraClient;

use crate::config::OrchestratorConfig;
use crate::error::CoreError;
use crate::extension::{FabricExtension, TerraExtension};
use crate::model::HostInfo;

/// Entry point for callers.
///
/// Generic over the extension so tests and alternative backends can swap
/// host/BGP handling without touching the workflows.
pub struct Orchestrator<E = TerraExtension> {
    client: Arc<TerraClient>,
    extension: E,
    config: OrchestratorConfig,
}

impl Orchestrator<TerraExtension> {
    /// Orchestrator using the Terra-backed extension on the same client.
    pub fn new(client: Arc<TerraClient>, config: OrchestratorConfig) -> Self {
        let extension = TerraExtension::new(Arc::clone(&client), config.retry);
        Self {
            client,
            extension,
            config,
        }
    }
}

impl<E: FabricExtension> Orchestrator<E> {
    pub fn with_extension(client: Arc<TerraClient>, extension: E, config: OrchestratorConfig) -> Self {
        Self {
            client,
            extension,
            config,
        }
    }

    pub fn client(&self) -> &TerraClient {
        &self.client
    }

    pub fn extension(&self) -> &E {
        &self.extension
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    // ── Hosts ───────────────────────────────────────────────────────

    pub async fn get_host(&self, hostname: &str) -> Result<Option<HostInfo>, CoreError> {
        self.extension.get_host(hostname).await
    }

    pub async fn create_host(&self, host: &HostInfo) -> Result<(), CoreError> {
        self.extension.create_host(host).await
    }

    pub async fn delete_host(&self, hostname: &str) -> Result<(), CoreError> {
        ignore_not_found(self.extension.delete_host(hostname).await, "host", hostname)
    }
}

/// Map NotFound to the default value; everything else passes through.
fn ignore_not_found<T, Er>(result: Result<T, Er>, what: &str, id: &str) -> Result<T, CoreError>
where
    T: Default,
    Er: Into<CoreError>,
{
    match result.map_err(Into::into) {
        Err(e) if e.is_not_found() => {
            info!(what, id, error = %e, "already absent");
            Ok(T::default())
        }
        other => other,
    }
}

/// Log a failed compensating action. The triggering error is what the
/// caller sees.
fn log_compensation<T, Er>(result: Result<T, Er>, what: &str, id: &str)
where
    Er: Into<CoreError>,
{
    if let Err(e) = result.map_err(Into::into) {
        warn!(what, id, error = %e, "rollback failed, manual cleanup may be needed");
    }
}
