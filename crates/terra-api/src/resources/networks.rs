// Network endpoints

use serde::Serialize;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::{Network, SegmentType};
use crate::requests::NetworkSpec;
use crate::resolve::ResourceKind;

#[derive(Serialize)]
struct NetworkPayload<'a> {
    name: &'a str,
    origin: &'a str,
    original_id: &'a str,
    tenant_id: String,
    #[serde(rename = "segment:type")]
    segment_type: SegmentType,
    #[serde(rename = "router:external")]
    external: bool,
    #[serde(
        rename = "segment:global_id_pool_name",
        skip_serializing_if = "Option::is_none"
    )]
    vni_pool_name: Option<&'a str>,
    #[serde(rename = "segment:global_id", skip_serializing_if = "Option::is_none")]
    segment_global_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment_local_id: Option<u32>,
}

impl TerraClient {
    async fn network_payload<'a>(&'a self, spec: &'a NetworkSpec) -> Result<NetworkPayload<'a>, Error> {
        Ok(NetworkPayload {
            name: &spec.name,
            origin: self.origin(),
            original_id: &spec.original_id,
            tenant_id: self.tenant_id(&spec.tenant).await?,
            segment_type: spec.segment_type,
            external: spec.external,
            vni_pool_name: spec.vni_pool_name.as_deref(),
            segment_global_id: spec.segment_global_id,
            segment_local_id: spec.segment_local_id,
        })
    }

    /// `POST networks`
    pub async fn create_network(&self, spec: &NetworkSpec) -> Result<Network, Error> {
        let payload = self.network_payload(spec).await?;
        debug!(original_id = %spec.original_id, segment_type = %spec.segment_type, "creating network");
        self.post("networks", &payload).await
    }

    /// `GET networks/{id}`
    pub async fn get_network(&self, original_id: &str) -> Result<Network, Error> {
        let id = self.resolve(ResourceKind::Network, original_id).await?;
        self.get(&format!("networks/{id}"), &[]).await
    }

    /// `PUT networks/{id}` with a full replacement body.
    pub async fn update_network(&self, spec: &NetworkSpec) -> Result<Network, Error> {
        let id = self.resolve(ResourceKind::Network, &spec.original_id).await?;
        let payload = self.network_payload(spec).await?;
        debug!(original_id = %spec.original_id, id = %id, "updating network");
        self.put(&format!("networks/{id}"), &payload).await
    }

    /// `DELETE networks/{id}`. The controller refuses while subnets remain.
    pub async fn delete_network(&self, original_id: &str) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::Network, original_id).await?;
        debug!(original_id, id = %id, "deleting network");
        self.delete(&format!("networks/{id}")).await
    }
}
