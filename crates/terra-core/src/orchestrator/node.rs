// Attaching hosts (bare metal or hypervisors) to a vxnet.
//
// Two binding flavours, picked by `OrchestratorConfig::binding_mode`:
// per-interface `port_bindings`, or a shared VLAN domain per (vxnet, VLAN)
// with one binding covering all of the host's switch ports.

use tracing::{debug, info, warn};

use terra_api::ResourceKind;
use terra_api::models::{PortBinding, SwitchPort, VlanDomainBinding};
use terra_api::requests::{PortBindingSpec, TenantRef, VlanDomainBindingSpec, VlanDomainSpec};

use super::{Orchestrator, ignore_not_found, log_compensation};
use crate::config::BindingMode;
use crate::error::CoreError;
use crate::extension::FabricExtension;
use crate::model::{NodeAttachment, NodeBinding};

impl<E: FabricExtension> Orchestrator<E> {
    /// Bind the host's switch ports to the vxnet.
    pub async fn add_node(&self, node: &NodeAttachment) -> Result<NodeBinding, CoreError> {
        let ports = self.host_ports(&node.host).await?;
        match self.config.binding_mode {
            BindingMode::Network => self.bind_network(node, &ports).await?,
            BindingMode::VlanDomain => self.bind_vlan_domain(node, &ports).await?,
        }

        info!(
            vxnet_id = %node.vxnet_id,
            host = %node.host,
            mode = %self.config.binding_mode,
            ports = ports.len(),
            native = node.native_vlan,
            "node attached"
        );
        Ok(NodeBinding {
            port_id: node.port_id(),
            mode: self.config.binding_mode,
            physical_network: self.config.physical_network.clone(),
            local_vlan_id: node.vlan_id,
            ports,
        })
    }

    /// Undo [`add_node`](Self::add_node). Missing bindings are fine.
    pub async fn remove_node(&self, node: &NodeAttachment) -> Result<(), CoreError> {
        let ports = match self.host_ports(&node.host).await {
            Ok(ports) => ports,
            Err(e) if e.is_not_found() => {
                info!(host = %node.host, "host already gone, nothing to unbind");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match self.config.binding_mode {
            BindingMode::Network => {
                for port in &ports {
                    ignore_not_found(
                        self.client
                            .delete_port_binding(Some(&node.vxnet_id), &port.device_name, &port.port_name)
                            .await,
                        "port binding",
                        &node.port_id(),
                    )?;
                }
            }
            BindingMode::VlanDomain => {
                let port_id = node.port_id();
                ignore_not_found(
                    self.client.delete_vlan_domain_binding(&port_id).await,
                    "vlan domain binding",
                    &port_id,
                )?;
                if let Some(domain_id) = node.vlan_domain_id() {
                    self.release_vlan_domain(&domain_id).await;
                }
            }
        }

        info!(vxnet_id = %node.vxnet_id, host = %node.host, "node detached");
        Ok(())
    }

    /// Switch ports of the host that take part in bindings.
    async fn host_ports(&self, hostname: &str) -> Result<Vec<SwitchPort>, CoreError> {
        let host = self
            .extension
            .get_host(hostname)
            .await?
            .ok_or_else(|| CoreError::HostNotFound {
                hostname: hostname.to_owned(),
            })?;

        let mut ports: Vec<SwitchPort> = host
            .connections
            .into_iter()
            .map(|c| SwitchPort {
                device_name: c.switch_name,
                port_name: c.switch_interface_name,
            })
            .collect();

        if ports.is_empty() {
            return Err(CoreError::HostNotConnected {
                hostname: hostname.to_owned(),
            });
        }
        if !self.config.complete_binding {
            ports.truncate(1);
        }
        Ok(ports)
    }

    async fn bind_network(&self, node: &NodeAttachment, ports: &[SwitchPort]) -> Result<(), CoreError> {
        let network_id = self
            .client
            .resolve(ResourceKind::Network, &node.vxnet_id)
            .await?;

        // Check every port before creating anything.
        let mut pending = Vec::with_capacity(ports.len());
        for port in ports {
            let existing = self
                .client
                .find_port_bindings(None, &port.device_name, &port.port_name)
                .await?;
            if check_native_vlan(port, &existing, &network_id, node.native_vlan)? {
                debug!(switch = %port.device_name, interface = %port.port_name, "already bound");
            } else {
                pending.push(port);
            }
        }

        let mut created: Vec<&SwitchPort> = Vec::with_capacity(pending.len());
        for port in pending {
            let result = self
                .client
                .create_port_binding(&PortBindingSpec {
                    network_original_id: node.vxnet_id.clone(),
                    switch_name: port.device_name.clone(),
                    interface_name: port.port_name.clone(),
                    vlan_native: node.native_vlan,
                    local_vlan_id: node.vlan_id,
                })
                .await;

            if let Err(e) = result {
                warn!(
                    switch = %port.device_name,
                    interface = %port.port_name,
                    error = %e,
                    "port binding failed, rolling back earlier bindings"
                );
                for done in created {
                    log_compensation(
                        self.client
                            .delete_port_binding(Some(&node.vxnet_id), &done.device_name, &done.port_name)
                            .await,
                        "port binding",
                        &node.port_id(),
                    );
                }
                return Err(e.into());
            }
            created.push(port);
        }
        Ok(())
    }

    async fn bind_vlan_domain(&self, node: &NodeAttachment, ports: &[SwitchPort]) -> Result<(), CoreError> {
        let (Some(vlan), Some(domain_id)) = (node.vlan_id, node.vlan_domain_id()) else {
            return Err(CoreError::InvalidRequest {
                message: format!(
                    "vlan_id is required to attach {} in vlan_domain binding mode",
                    node.host
                ),
            });
        };

        // Check every port before creating anything.
        let port_id = node.port_id();
        let existing = self.client.list_vlan_domain_bindings().await?;
        for port in ports {
            check_domain_native_vlan(port, &existing, &port_id, node.native_vlan)?;
        }

        match self.client.get_vlan_domain(&domain_id).await {
            Ok(_) => debug!(domain_id = %domain_id, "vlan domain exists"),
            Err(e) if e.is_not_found() => {
                info!(domain_id = %domain_id, vlan, vni = node.vni, "vlan domain does not exist, creating");
                self.client
                    .create_vlan_domain(&VlanDomainSpec::single(domain_id.clone(), vlan, node.vni))
                    .await?;
            }
            Err(e) => return Err(e.into()),
        }

        self.client
            .create_vlan_domain_binding(&VlanDomainBindingSpec {
                original_id: port_id,
                tenant: Some(TenantRef::named_by_id(node.user_id.clone())),
                vlan_domain_original_id: domain_id,
                bind_port_list: ports.to_vec(),
                untagged_vni: node.native_vlan.then_some(node.vni),
            })
            .await?;
        Ok(())
    }

    /// Drop a VLAN domain once its last binding is gone. Other hosts may
    /// still use it, in which case the controller refuses and we move on.
    async fn release_vlan_domain(&self, domain_id: &str) {
        match self.client.delete_vlan_domain(domain_id).await {
            Ok(()) => debug!(domain_id, "vlan domain deleted"),
            Err(e) if e.is_not_found() => {}
            Err(e) => info!(domain_id, error = %e, "vlan domain kept"),
        }
    }
}

fn native_conflict(port: &SwitchPort, detail: String) -> CoreError {
    CoreError::NativeVlanConflict {
        switch_name: port.device_name.clone(),
        interface_name: port.port_name.clone(),
        detail,
    }
}

/// Apply the untagged-VLAN rules to the bindings already on `port`.
///
/// Returns `Ok(true)` when `network_id` is already bound there in the
/// requested mode.
fn check_native_vlan(
    port: &SwitchPort,
    existing: &[PortBinding],
    network_id: &str,
    want_native: bool,
) -> Result<bool, CoreError> {
    let is_ours = |b: &PortBinding| b.network_id.as_deref() == Some(network_id);

    if let Some(native) = existing.iter().find(|b| b.vlan_native && !is_ours(b)) {
        return Err(native_conflict(
            port,
            format!(
                "interface already carries untagged network {}",
                native.network_id.as_deref().unwrap_or("<unknown>")
            ),
        ));
    }
    if want_native {
        if let Some(other) = existing.iter().find(|b| !is_ours(b)) {
            return Err(native_conflict(
                port,
                format!(
                    "untagged attach requested but network {} is already bound",
                    other.network_id.as_deref().unwrap_or("<unknown>")
                ),
            ));
        }
    }
    match existing.iter().find(|b| is_ours(b)) {
        Some(own) if own.vlan_native != want_native => Err(native_conflict(
            port,
            format!(
                "network {network_id} is already bound {}",
                if own.vlan_native { "untagged" } else { "tagged" }
            ),
        )),
        Some(_) => Ok(true),
        None => Ok(false),
    }
}

/// Same rules for VLAN-domain bindings: an untagged VNI claims the port,
/// and an untagged request needs the port to itself. `own_id` is skipped.
fn check_domain_native_vlan(
    port: &SwitchPort,
    existing: &[VlanDomainBinding],
    own_id: &str,
    want_native: bool,
) -> Result<(), CoreError> {
    let covering: Vec<&VlanDomainBinding> = existing
        .iter()
        .filter(|b| b.original_id.as_deref() != Some(own_id))
        .filter(|b| b.binding.bind_port_list.contains(port))
        .collect();

    if let Some(native) = covering.iter().find(|b| b.binding.untagged_vni.is_some()) {
        return Err(native_conflict(
            port,
            format!("port already carries untagged binding {}", native.id),
        ));
    }
    if want_native {
        if let Some(other) = covering.first() {
            return Err(native_conflict(
                port,
                format!("untagged attach requested but binding {} already covers the port", other.id),
            ));
        }
    }
    Ok(())
}
