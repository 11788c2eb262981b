// Network-to-switch-interface bindings (`port_bindings`).

use serde::Serialize;
use tracing::{debug, error};

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::PortBinding;
use crate::requests::PortBindingSpec;
use crate::resolve::ResourceKind;

#[derive(Serialize)]
struct PortBindingPayload<'a> {
    network_id: String,
    switch_name: &'a str,
    interface_name: &'a str,
    vlan_native: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_vlan_id: Option<u16>,
}

impl TerraClient {
    /// `POST port_bindings`
    pub async fn create_port_binding(&self, spec: &PortBindingSpec) -> Result<PortBinding, Error> {
        let payload = PortBindingPayload {
            network_id: self
                .resolve(ResourceKind::Network, &spec.network_original_id)
                .await?,
            switch_name: &spec.switch_name,
            interface_name: &spec.interface_name,
            vlan_native: spec.vlan_native,
            local_vlan_id: spec.local_vlan_id,
        };
        debug!(
            network = %spec.network_original_id,
            switch = %spec.switch_name,
            interface = %spec.interface_name,
            native = spec.vlan_native,
            "creating port binding"
        );
        self.post("port_bindings", &payload).await
    }

    /// Bindings on a switch interface, optionally only those of one network.
    pub async fn find_port_bindings(
        &self,
        network_original_id: Option<&str>,
        switch_name: &str,
        interface_name: &str,
    ) -> Result<Vec<PortBinding>, Error> {
        let network_id = match network_original_id {
            Some(network) => Some(self.resolve(ResourceKind::Network, network).await?),
            None => None,
        };

        let mut query = vec![("switch_name", switch_name), ("interface_name", interface_name)];
        if let Some(ref id) = network_id {
            query.push(("network_id", id.as_str()));
        }
        self.get_list("port_bindings", &query).await
    }

    /// The binding for `(network, switch, interface)`.
    ///
    /// The first binding the controller returns is authoritative.
    pub async fn get_port_binding(
        &self,
        network_original_id: Option<&str>,
        switch_name: &str,
        interface_name: &str,
    ) -> Result<PortBinding, Error> {
        self.find_port_bindings(network_original_id, switch_name, interface_name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                let msg = format!(
                    "binding for network {}, switch {switch_name}, interface {interface_name}",
                    network_original_id.unwrap_or("<any>")
                );
                error!("{msg} not found");
                Error::not_found(msg)
            })
    }

    /// Look the binding up, then `DELETE port_bindings/{id}`.
    pub async fn delete_port_binding(
        &self,
        network_original_id: Option<&str>,
        switch_name: &str,
        interface_name: &str,
    ) -> Result<(), Error> {
        let binding = self
            .get_port_binding(network_original_id, switch_name, interface_name)
            .await?;
        debug!(id = %binding.id, switch = switch_name, interface = interface_name, "deleting port binding");
        self.delete(&format!("port_bindings/{}", binding.id)).await
    }
}
