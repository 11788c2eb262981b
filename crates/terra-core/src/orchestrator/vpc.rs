// VPC (VRF router) lifecycle and BGP peering.

use tracing::{info, warn};

use terra_api::models::{BgpPeer, Router};
use terra_api::requests::{BgpPeerSpec, RouterSpec, TenantRef};

use super::{Orchestrator, ignore_not_found, log_compensation};
use crate::error::CoreError;
use crate::extension::FabricExtension;
use crate::model::VpcSpec;

impl<E: FabricExtension> Orchestrator<E> {
    /// Create the router, then attach every listed BGP peer.
    ///
    /// If any peer fails the router is torn down again (peers first) and
    /// the peer error is returned.
    pub async fn create_vpc(&self, spec: &VpcSpec) -> Result<Router, CoreError> {
        let router = self
            .client
            .create_router(&RouterSpec {
                original_id: spec.vpc_id.clone(),
                name: spec.vpc_id.clone(),
                tenant: TenantRef::named_by_id(spec.user_id.clone()),
                l3_vni: spec.l3_vni,
                l3_vni_pool_name: self.config.l3_vni_pool_name.clone(),
            })
            .await?;
        info!(vpc_id = %spec.vpc_id, router_id = %router.id, "router created");

        for peer in &spec.bgp_peers {
            if let Err(e) = self.extension.add_router_bgp_peer(&spec.vpc_id, peer).await {
                warn!(
                    vpc_id = %spec.vpc_id,
                    peer = %peer.ip_address,
                    error = %e,
                    "bgp peer attach failed, rolling back router"
                );
                self.rollback_vpc(&spec.vpc_id).await;
                return Err(e);
            }
        }

        Ok(router)
    }

    async fn rollback_vpc(&self, vpc_id: &str) {
        log_compensation(
            self.extension.delete_router_bgp_peers(vpc_id).await,
            "bgp peers",
            vpc_id,
        );
        log_compensation(self.client.delete_router(vpc_id).await, "router", vpc_id);
    }

    /// Delete the router's BGP peers, then the router. Missing pieces are fine.
    pub async fn delete_vpc(&self, vpc_id: &str) -> Result<(), CoreError> {
        let peers = ignore_not_found(
            self.extension.delete_router_bgp_peers(vpc_id).await,
            "bgp peers",
            vpc_id,
        )?;
        ignore_not_found(self.client.delete_router(vpc_id).await, "router", vpc_id)?;
        info!(vpc_id, peers, "vpc deleted");
        Ok(())
    }

    pub async fn add_bgp_peer(&self, vpc_id: &str, peer: &BgpPeerSpec) -> Result<BgpPeer, CoreError> {
        self.extension.add_router_bgp_peer(vpc_id, peer).await
    }

    /// Delete all peers of the router, or only `peer_id`.
    pub async fn delete_bgp_peers(
        &self,
        vpc_id: &str,
        peer_id: Option<&str>,
    ) -> Result<usize, CoreError> {
        ignore_not_found(
            self.client
                .delete_bgp_peers(vpc_id, peer_id, &self.config.retry)
                .await,
            "bgp peers",
            vpc_id,
        )
    }
}
