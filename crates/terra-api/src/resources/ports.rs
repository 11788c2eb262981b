// Port endpoints, including switch-bound direct ports and bind/unbind.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::{FixedIp, Port};
use crate::requests::{DirectPortSpec, PortBindSpec, PortSpec};
use crate::resolve::ResourceKind;

#[derive(Serialize)]
struct DirectPortAttachment<'a> {
    switch_interface_id: &'a str,
    vlan_id: u16,
}

#[derive(Serialize)]
struct PortPayload<'a> {
    name: &'a str,
    origin: &'a str,
    original_id: &'a str,
    tenant_id: String,
    network_id: String,
    ips: Vec<FixedIp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direct_port: Option<DirectPortAttachment<'a>>,
}

#[derive(Serialize)]
struct BindPayload<'a> {
    switch_name: &'a str,
    interface_name: &'a str,
    vlan_native: bool,
}

impl TerraClient {
    async fn port_payload<'a>(&'a self, spec: &'a PortSpec) -> Result<PortPayload<'a>, Error> {
        let tenant_id = self.tenant_id(&spec.tenant).await?;
        let network_id = self
            .resolve(ResourceKind::Network, &spec.network_original_id)
            .await?;
        Ok(PortPayload {
            name: &spec.name,
            origin: self.origin(),
            original_id: &spec.original_id,
            tenant_id,
            network_id,
            ips: self.resolve_fixed_ips(&spec.fixed_ips).await?,
            direct_port: None,
        })
    }

    /// `POST ports`
    pub async fn create_port(&self, spec: &PortSpec) -> Result<Port, Error> {
        let payload = self.port_payload(spec).await?;
        debug!(original_id = %spec.original_id, "creating port");
        self.post("ports", &payload).await
    }

    /// Create a port pinned to a switch interface with a VLAN tag.
    ///
    /// The switch interface is looked up by name on the named device.
    pub async fn create_direct_port(&self, spec: &DirectPortSpec) -> Result<Port, Error> {
        let interface = self
            .get_switch_interface(&spec.switch_name, &spec.interface_name)
            .await?;
        let mut payload = self.port_payload(&spec.port).await?;
        payload.direct_port = Some(DirectPortAttachment {
            switch_interface_id: &interface.id,
            vlan_id: spec.vlan_id,
        });
        debug!(
            original_id = %spec.port.original_id,
            switch = %spec.switch_name,
            interface = %spec.interface_name,
            vlan_id = spec.vlan_id,
            "creating direct port"
        );
        self.post("ports", &payload).await
    }

    /// `PUT ports/{id}`
    pub async fn update_port(&self, spec: &PortSpec) -> Result<Port, Error> {
        let id = self.resolve(ResourceKind::Port, &spec.original_id).await?;
        let payload = self.port_payload(spec).await?;
        self.put(&format!("ports/{id}"), &payload).await
    }

    /// `DELETE ports/{id}`
    pub async fn delete_port(&self, original_id: &str) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::Port, original_id).await?;
        debug!(original_id, id = %id, "deleting port");
        self.delete(&format!("ports/{id}")).await
    }

    /// `POST ports/{id}/bind`
    pub async fn bind_port(&self, original_id: &str, binding: &PortBindSpec) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::Port, original_id).await?;
        let payload = BindPayload {
            switch_name: &binding.switch_name,
            interface_name: &binding.interface_name,
            vlan_native: binding.vlan_native,
        };
        debug!(original_id, switch = %binding.switch_name, interface = %binding.interface_name, "binding port");
        let _: Value = self.post(&format!("ports/{id}/bind"), &payload).await?;
        Ok(())
    }

    /// `POST ports/{id}/unbind`
    pub async fn unbind_port(&self, original_id: &str) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::Port, original_id).await?;
        debug!(original_id, "unbinding port");
        self.post_empty(&format!("ports/{id}/unbind")).await
    }
}
