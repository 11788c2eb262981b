// Router (VRF) endpoints, including interfaces and the external gateway.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::{FixedIp, Router};
use crate::requests::{ExternalGateway, RouterSpec};
use crate::resolve::ResourceKind;

#[derive(Serialize)]
struct RouterPayload<'a> {
    name: &'a str,
    origin: &'a str,
    original_id: &'a str,
    tenant_id: String,
    #[serde(rename = "cisco:l3_vni")]
    l3_vni: Option<u32>,
    #[serde(
        rename = "cisco:l3_vni_pool_name",
        skip_serializing_if = "Option::is_none"
    )]
    l3_vni_pool_name: Option<&'a str>,
}

/// Updates are wrapped in a single-element `router` list.
#[derive(Serialize)]
struct RouterUpdate<'a> {
    router: [RouterPayload<'a>; 1],
}

#[derive(Serialize)]
struct InterfacePayload {
    subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    port_id: Option<String>,
}

#[derive(Serialize)]
struct GatewayPayload {
    network_id: String,
    enable_snat: bool,
    fixed_ips: Vec<FixedIp>,
}

#[derive(Serialize)]
struct GatewayList {
    external_gateways: [GatewayPayload; 1],
}

impl TerraClient {
    async fn router_payload<'a>(&'a self, spec: &'a RouterSpec) -> Result<RouterPayload<'a>, Error> {
        Ok(RouterPayload {
            name: &spec.name,
            origin: self.origin(),
            original_id: &spec.original_id,
            tenant_id: self.tenant_id(&spec.tenant).await?,
            l3_vni: spec.l3_vni,
            l3_vni_pool_name: spec.l3_vni_pool_name.as_deref(),
        })
    }

    /// `POST routers`
    pub async fn create_router(&self, spec: &RouterSpec) -> Result<Router, Error> {
        let payload = self.router_payload(spec).await?;
        debug!(original_id = %spec.original_id, l3_vni = ?spec.l3_vni, "creating router");
        self.post("routers", &payload).await
    }

    /// `GET routers/{id}`
    pub async fn get_router(&self, original_id: &str) -> Result<Router, Error> {
        let id = self.resolve(ResourceKind::Router, original_id).await?;
        self.get(&format!("routers/{id}"), &[]).await
    }

    /// `PUT routers/{id}`
    pub async fn update_router(&self, spec: &RouterSpec) -> Result<Router, Error> {
        let id = self.resolve(ResourceKind::Router, &spec.original_id).await?;
        let body = RouterUpdate {
            router: [self.router_payload(spec).await?],
        };
        debug!(original_id = %spec.original_id, id = %id, "updating router");
        self.put(&format!("routers/{id}"), &body).await
    }

    /// `DELETE routers/{id}`
    pub async fn delete_router(&self, original_id: &str) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::Router, original_id).await?;
        debug!(original_id, id = %id, "deleting router");
        self.delete(&format!("routers/{id}")).await
    }

    async fn interface_payload(
        &self,
        subnet_original_id: &str,
        port_original_id: Option<&str>,
    ) -> Result<InterfacePayload, Error> {
        let port_id = match port_original_id {
            Some(port) => Some(self.resolve(ResourceKind::Port, port).await?),
            None => None,
        };
        Ok(InterfacePayload {
            subnet_id: self.resolve(ResourceKind::Subnet, subnet_original_id).await?,
            port_id,
        })
    }

    /// Attach a subnet to a router.
    ///
    /// `POST routers/{id}/add_router_interface`
    pub async fn add_router_interface(
        &self,
        router_original_id: &str,
        subnet_original_id: &str,
        port_original_id: Option<&str>,
    ) -> Result<(), Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        let body = self
            .interface_payload(subnet_original_id, port_original_id)
            .await?;
        debug!(router = router_original_id, subnet = subnet_original_id, "adding router interface");
        let _: Value = self
            .post(&format!("routers/{router_id}/add_router_interface"), &body)
            .await?;
        Ok(())
    }

    /// `POST routers/{id}/remove_router_interface`
    pub async fn remove_router_interface(
        &self,
        router_original_id: &str,
        subnet_original_id: &str,
        port_original_id: Option<&str>,
    ) -> Result<(), Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        let body = self
            .interface_payload(subnet_original_id, port_original_id)
            .await?;
        debug!(router = router_original_id, subnet = subnet_original_id, "removing router interface");
        let _: Value = self
            .post(&format!("routers/{router_id}/remove_router_interface"), &body)
            .await?;
        Ok(())
    }

    /// `PUT routers/{id}/external_gateway`
    pub async fn set_external_gateway(
        &self,
        router_original_id: &str,
        gateway: &ExternalGateway,
    ) -> Result<(), Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        let body = GatewayList {
            external_gateways: [GatewayPayload {
                network_id: self
                    .resolve(ResourceKind::Network, &gateway.network_original_id)
                    .await?,
                enable_snat: gateway.enable_snat,
                fixed_ips: self.resolve_fixed_ips(&gateway.fixed_ips).await?,
            }],
        };
        debug!(router = router_original_id, "setting external gateway");
        let _: Value = self
            .put(&format!("routers/{router_id}/external_gateway"), &body)
            .await?;
        Ok(())
    }

    /// `DELETE routers/{id}/external_gateway`
    pub async fn clear_external_gateway(&self, router_original_id: &str) -> Result<(), Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        debug!(router = router_original_id, "clearing external gateway");
        self.delete(&format!("routers/{router_id}/external_gateway"))
            .await
    }
}
