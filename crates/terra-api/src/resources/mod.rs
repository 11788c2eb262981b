// Resource endpoint groups, one `impl TerraClient` block per file.

mod bgp;
mod bindings;
mod devices;
mod hosts;
mod networks;
mod ports;
mod routers;
mod routes;
mod subnets;
mod tenants;
mod vlan_domains;
mod vni_pools;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::FixedIp;
use crate::requests::{FixedIpSpec, TenantRef};
use crate::resolve::ResourceKind;

impl TerraClient {
    /// Remote id of the owning tenant, provisioning it if needed.
    pub(crate) async fn tenant_id(&self, tenant: &TenantRef) -> Result<String, Error> {
        self.get_or_create_tenant(&tenant.original_id, &tenant.name)
            .await
    }

    /// Swap caller subnet ids for controller subnet ids.
    pub(crate) async fn resolve_fixed_ips(
        &self,
        ips: &[FixedIpSpec],
    ) -> Result<Vec<FixedIp>, Error> {
        let mut resolved = Vec::with_capacity(ips.len());
        for ip in ips {
            resolved.push(FixedIp {
                subnet_id: self
                    .resolve(ResourceKind::Subnet, &ip.subnet_original_id)
                    .await?,
                ip_address: ip.ip_address.clone(),
            });
        }
        Ok(resolved)
    }
}
