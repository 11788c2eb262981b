// Subnet endpoints

use serde::Serialize;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::Subnet;
use crate::requests::SubnetSpec;
use crate::resolve::ResourceKind;

#[derive(Serialize)]
struct SubnetPayload<'a> {
    name: &'a str,
    origin: &'a str,
    original_id: &'a str,
    tenant_id: String,
    network_id: String,
    enable_dhcp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateway_ip: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cidr: Option<&'a str>,
}

impl TerraClient {
    async fn subnet_payload<'a>(&'a self, spec: &'a SubnetSpec) -> Result<SubnetPayload<'a>, Error> {
        let tenant_id = self.tenant_id(&spec.tenant).await?;
        let network_id = self
            .resolve(ResourceKind::Network, &spec.network_original_id)
            .await?;
        Ok(SubnetPayload {
            name: &spec.name,
            origin: self.origin(),
            original_id: &spec.original_id,
            tenant_id,
            network_id,
            enable_dhcp: spec.enable_dhcp,
            ip_version: spec.ip_version,
            gateway_ip: spec.gateway_ip.as_deref(),
            cidr: spec.cidr.as_deref(),
        })
    }

    /// `POST subnets`. The parent network must already exist.
    pub async fn create_subnet(&self, spec: &SubnetSpec) -> Result<Subnet, Error> {
        let payload = self.subnet_payload(spec).await?;
        debug!(original_id = %spec.original_id, cidr = ?spec.cidr, "creating subnet");
        self.post("subnets", &payload).await
    }

    /// `PUT subnets/{id}`
    pub async fn update_subnet(&self, spec: &SubnetSpec) -> Result<Subnet, Error> {
        let id = self.resolve(ResourceKind::Subnet, &spec.original_id).await?;
        let payload = self.subnet_payload(spec).await?;
        self.put(&format!("subnets/{id}"), &payload).await
    }

    /// `DELETE subnets/{id}`
    pub async fn delete_subnet(&self, original_id: &str) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::Subnet, original_id).await?;
        debug!(original_id, id = %id, "deleting subnet");
        self.delete(&format!("subnets/{id}")).await
    }
}
