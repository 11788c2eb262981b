// VLAN sub-interface endpoints: a direct port on a switch interface,
// optionally attached to the vxnet's VPC router.

use tracing::{info, warn};

use terra_api::models::Port;

use super::{Orchestrator, ignore_not_found, log_compensation};
use crate::error::CoreError;
use crate::extension::FabricExtension;
use crate::model::SubInterfaceSpec;

impl<E: FabricExtension> Orchestrator<E> {
    /// Create the direct port and attach it to the router, if one is named.
    ///
    /// The port is removed again if the router attach fails.
    pub async fn add_subintf(&self, spec: &SubInterfaceSpec) -> Result<Port, CoreError> {
        let port = self.extension.create_direct_port(spec).await?;

        if let Some(ref vpc_id) = spec.vpc_id {
            let attached = self
                .client
                .add_router_interface(vpc_id, &spec.vxnet_id, Some(&spec.vxnet_id))
                .await;
            if let Err(e) = attached {
                warn!(vpc_id = %vpc_id, vxnet_id = %spec.vxnet_id, error = %e, "router attach failed, removing direct port");
                log_compensation(
                    self.client.delete_port(&spec.vxnet_id).await,
                    "direct port",
                    &spec.vxnet_id,
                );
                return Err(e.into());
            }
        }

        info!(
            vxnet_id = %spec.vxnet_id,
            switch = %spec.switch_name,
            interface = %spec.interface_name,
            vlan_id = spec.vlan_id,
            "sub-interface created"
        );
        Ok(port)
    }

    /// Detach from the router (if given) and delete the direct port.
    pub async fn delete_subintf(&self, vxnet_id: &str, vpc_id: Option<&str>) -> Result<(), CoreError> {
        if let Some(vpc_id) = vpc_id {
            ignore_not_found(
                self.client
                    .remove_router_interface(vpc_id, vxnet_id, Some(vxnet_id))
                    .await,
                "router interface",
                vxnet_id,
            )?;
        }
        ignore_not_found(self.client.delete_port(vxnet_id).await, "direct port", vxnet_id)
    }
}
