// Vxnet lifecycle (network + its single subnet) and router membership.

use tracing::{info, warn};

use terra_api::requests::{NetworkSpec, SubnetSpec, TenantRef};

use super::{Orchestrator, ignore_not_found, log_compensation};
use crate::error::CoreError;
use crate::extension::FabricExtension;
use crate::model::{Vxnet, VxnetSpec};

impl<E: FabricExtension> Orchestrator<E> {
    /// Create the network, then its subnet under the same id.
    ///
    /// A failed subnet takes the new network down with it.
    pub async fn create_vxnet(&self, spec: &VxnetSpec) -> Result<Vxnet, CoreError> {
        let tenant = TenantRef::named_by_id(spec.user_id.clone());
        let network = self
            .client
            .create_network(&NetworkSpec {
                original_id: spec.vxnet_id.clone(),
                name: spec.vxnet_id.clone(),
                tenant: tenant.clone(),
                segment_type: spec.segment_type,
                segment_global_id: spec.vni,
                segment_local_id: None,
                external: false,
                vni_pool_name: self.config.vni_pool_name.clone(),
            })
            .await?;

        let subnet = self
            .client
            .create_subnet(&SubnetSpec {
                original_id: spec.vxnet_id.clone(),
                name: spec.vxnet_id.clone(),
                tenant,
                network_original_id: spec.vxnet_id.clone(),
                cidr: Some(spec.cidr.clone()),
                gateway_ip: spec.gateway_ip.clone(),
                ip_version: Some(if spec.cidr.contains(':') { 6 } else { 4 }),
                enable_dhcp: false,
            })
            .await;

        match subnet {
            Ok(subnet) => {
                info!(vxnet_id = %spec.vxnet_id, network_id = %network.id, cidr = %spec.cidr, "vxnet created");
                Ok(Vxnet { network, subnet })
            }
            Err(e) => {
                warn!(vxnet_id = %spec.vxnet_id, error = %e, "subnet create failed, rolling back network");
                log_compensation(
                    self.client.delete_network(&spec.vxnet_id).await,
                    "network",
                    &spec.vxnet_id,
                );
                Err(e.into())
            }
        }
    }

    /// Delete the subnet, then the network.
    pub async fn delete_vxnet(&self, vxnet_id: &str) -> Result<(), CoreError> {
        ignore_not_found(self.client.delete_subnet(vxnet_id).await, "subnet", vxnet_id)?;
        ignore_not_found(self.client.delete_network(vxnet_id).await, "network", vxnet_id)?;
        info!(vxnet_id, "vxnet deleted");
        Ok(())
    }

    /// Attach the vxnet's subnet to the VPC router.
    pub async fn join_vpc(&self, vpc_id: &str, vxnet_id: &str) -> Result<(), CoreError> {
        self.client
            .add_router_interface(vpc_id, vxnet_id, None)
            .await?;
        info!(vpc_id, vxnet_id, "vxnet joined vpc");
        Ok(())
    }

    pub async fn leave_vpc(&self, vpc_id: &str, vxnet_id: &str) -> Result<(), CoreError> {
        ignore_not_found(
            self.client
                .remove_router_interface(vpc_id, vxnet_id, None)
                .await,
            "router interface",
            vxnet_id,
        )
    }
}
