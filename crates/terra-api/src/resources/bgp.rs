// BGP neighbor endpoints under `routers/{id}/bgp_neighbors`.
//
// Mutations take a `RetryPolicy`: the controller answers 400 while its
// VRF consistency check is still running.

use serde::Serialize;
use tracing::{debug, info};

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::BgpPeer;
use crate::requests::BgpPeerSpec;
use crate::resolve::ResourceKind;
use crate::retry::RetryPolicy;

#[derive(Serialize)]
struct BgpPeerPayload<'a> {
    device_id: &'a str,
    as_number: u32,
    ip_address: &'a str,
    advertise_host_route: bool,
}

impl TerraClient {
    /// Resolve the router and the border switch, then add the neighbor.
    ///
    /// `POST routers/{id}/bgp_neighbors`
    pub async fn add_bgp_peer(
        &self,
        router_original_id: &str,
        peer: &BgpPeerSpec,
        retry: &RetryPolicy,
    ) -> Result<BgpPeer, Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        let switch = self.get_switch(&peer.device_name).await?;
        let payload = BgpPeerPayload {
            device_id: &switch.id,
            as_number: peer.as_number,
            ip_address: &peer.ip_address,
            advertise_host_route: peer.advertise_host_route,
        };
        let path = format!("routers/{router_id}/bgp_neighbors");

        debug!(
            router = router_original_id,
            device = %peer.device_name,
            as_number = peer.as_number,
            ip = %peer.ip_address,
            "adding bgp peer"
        );
        retry
            .run("add bgp peer", || self.post(&path, &payload))
            .await
    }

    /// `GET routers/{id}/bgp_neighbors`
    pub async fn list_bgp_peers(&self, router_original_id: &str) -> Result<Vec<BgpPeer>, Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        self.get_list(&format!("routers/{router_id}/bgp_neighbors"), &[])
            .await
    }

    /// `DELETE routers/{id}/bgp_neighbors/{peer_id}`
    pub async fn delete_bgp_peer(
        &self,
        router_original_id: &str,
        peer_id: &str,
        retry: &RetryPolicy,
    ) -> Result<(), Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        self.delete_bgp_peer_by_id(&router_id, peer_id, retry).await
    }

    /// Delete the router's neighbors, all of them or only `peer_id`.
    ///
    /// Returns how many were deleted; entries that vanish mid-loop are skipped.
    pub async fn delete_bgp_peers(
        &self,
        router_original_id: &str,
        peer_id: Option<&str>,
        retry: &RetryPolicy,
    ) -> Result<usize, Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        let peers: Vec<BgpPeer> = self
            .get_list(&format!("routers/{router_id}/bgp_neighbors"), &[])
            .await?;

        let mut deleted = 0;
        for peer in peers
            .iter()
            .filter(|p| peer_id.is_none_or(|wanted| p.id == wanted))
        {
            match self.delete_bgp_peer_by_id(&router_id, &peer.id, retry).await {
                Ok(()) => deleted += 1,
                Err(e) if e.is_not_found() => {
                    debug!(router = router_original_id, peer_id = %peer.id, "bgp peer already gone");
                }
                Err(e) => return Err(e),
            }
        }
        info!(router = router_original_id, deleted, "bgp peers deleted");
        Ok(deleted)
    }

    async fn delete_bgp_peer_by_id(
        &self,
        router_id: &str,
        peer_id: &str,
        retry: &RetryPolicy,
    ) -> Result<(), Error> {
        let path = format!("routers/{router_id}/bgp_neighbors/{peer_id}");
        debug!(router_id, peer_id, "deleting bgp peer");
        retry.run("delete bgp peer", || self.delete(&path)).await
    }
}
