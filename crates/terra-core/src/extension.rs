// ── Fabric extension capability set ──
//
// Host inventory, BGP peering and direct ports are the operations a fabric
// backend must provide beyond plain networks and routers. The orchestrator
// only talks to them through this trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use terra_api::models::{BgpPeer, Port};
use terra_api::requests::{BgpPeerSpec, DirectPortSpec, FixedIpSpec, PortSpec, TenantRef};
use terra_api::{RetryPolicy, TerraClient};

use crate::error::CoreError;
use crate::model::{HostInfo, SubInterfaceSpec};

/// Backend operations for hosts, BGP peers and switch-bound ports.
#[async_trait]
pub trait FabricExtension: Send + Sync {
    /// The host and its switch links, or `None` if unknown.
    async fn get_host(&self, hostname: &str) -> Result<Option<HostInfo>, CoreError>;

    async fn create_host(&self, host: &HostInfo) -> Result<(), CoreError>;

    /// Remove the host and all of its links.
    async fn delete_host(&self, hostname: &str) -> Result<(), CoreError>;

    async fn add_router_bgp_peer(
        &self,
        vpc_id: &str,
        peer: &BgpPeerSpec,
    ) -> Result<BgpPeer, CoreError>;

    /// Remove every BGP peer of the router. A missing router is not an error.
    async fn delete_router_bgp_peers(&self, vpc_id: &str) -> Result<usize, CoreError>;

    async fn create_direct_port(&self, spec: &SubInterfaceSpec) -> Result<Port, CoreError>;
}

/// [`FabricExtension`] backed by the Terra controller.
#[derive(Clone)]
pub struct TerraExtension {
    client: Arc<TerraClient>,
    retry: RetryPolicy,
}

impl TerraExtension {
    pub fn new(client: Arc<TerraClient>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }
}

#[async_trait]
impl FabricExtension for TerraExtension {
    async fn get_host(&self, hostname: &str) -> Result<Option<HostInfo>, CoreError> {
        let Some(host) = self.client.get_host_by_name(hostname).await? else {
            return Ok(None);
        };
        let links = self.client.list_host_links(hostname).await?;

        Ok(Some(HostInfo {
            hostname: host.hostname,
            mgmt_ip: host.host_ip,
            connections: links.into_iter().map(|l| l.connection).collect(),
        }))
    }

    async fn create_host(&self, host: &HostInfo) -> Result<(), CoreError> {
        let mgmt_ip = host.mgmt_ip.as_deref().unwrap_or_default();
        self.client.create_host(&host.hostname, mgmt_ip).await?;
        if !host.connections.is_empty() {
            self.client.add_host_links(&host.connections).await?;
        }
        info!(hostname = %host.hostname, links = host.connections.len(), "host created");
        Ok(())
    }

    async fn delete_host(&self, hostname: &str) -> Result<(), CoreError> {
        let Some(host) = self.client.get_host_by_name(hostname).await? else {
            return Err(CoreError::HostNotFound {
                hostname: hostname.to_owned(),
            });
        };

        for link in self.client.list_host_links(hostname).await? {
            debug!(hostname, link = %link.id, "deleting host link");
            self.client.delete_host_link(&link.id).await?;
        }
        self.client.delete_host(&host.id).await?;
        info!(hostname, "host deleted");
        Ok(())
    }

    async fn add_router_bgp_peer(
        &self,
        vpc_id: &str,
        peer: &BgpPeerSpec,
    ) -> Result<BgpPeer, CoreError> {
        Ok(self.client.add_bgp_peer(vpc_id, peer, &self.retry).await?)
    }

    async fn delete_router_bgp_peers(&self, vpc_id: &str) -> Result<usize, CoreError> {
        match self.client.delete_bgp_peers(vpc_id, None, &self.retry).await {
            Ok(n) => Ok(n),
            Err(e) if e.is_not_found() => {
                warn!(vpc_id, error = %e, "router not found, no bgp peers to delete");
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_direct_port(&self, spec: &SubInterfaceSpec) -> Result<Port, CoreError> {
        let port = DirectPortSpec {
            port: PortSpec {
                original_id: spec.vxnet_id.clone(),
                name: format!("{}-subif", spec.vxnet_id),
                tenant: TenantRef::named_by_id(spec.user_id.clone()),
                network_original_id: spec.vxnet_id.clone(),
                fixed_ips: vec![FixedIpSpec {
                    subnet_original_id: spec.vxnet_id.clone(),
                    ip_address: Some(spec.ip_address.clone()),
                }],
            },
            switch_name: spec.switch_name.clone(),
            interface_name: spec.interface_name.clone(),
            vlan_id: spec.vlan_id,
        };
        Ok(self.client.create_direct_port(&port).await?)
    }
}
