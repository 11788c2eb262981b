// VLAN domains and the VLAN-domain flavour of port binding.

use serde::Serialize;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::{SwitchPort, VlanDomain, VlanDomainBinding};
use crate::requests::{VlanDomainBindingSpec, VlanDomainSpec};
use crate::resolve::ResourceKind;

#[derive(Serialize)]
struct VlanDomainPayload<'a> {
    name: &'a str,
    origin: &'a str,
    original_id: &'a str,
    start_vlan: u16,
    end_vlan: u16,
    start_vxlan: u32,
    end_vxlan: u32,
}

#[derive(Serialize)]
struct BindingDetail<'a> {
    vlan_domain_id: String,
    bind_port_list: &'a [SwitchPort],
    #[serde(skip_serializing_if = "Option::is_none")]
    untagged_vni: Option<u32>,
}

#[derive(Serialize)]
struct VlanDomainBindingPayload<'a> {
    origin: &'a str,
    original_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
    binding: BindingDetail<'a>,
}

impl TerraClient {
    /// `POST vlan_domains`
    pub async fn create_vlan_domain(&self, spec: &VlanDomainSpec) -> Result<VlanDomain, Error> {
        let payload = VlanDomainPayload {
            name: &spec.name,
            origin: self.origin(),
            original_id: &spec.original_id,
            start_vlan: spec.start_vlan,
            end_vlan: spec.end_vlan,
            start_vxlan: spec.start_vxlan,
            end_vxlan: spec.end_vxlan,
        };
        debug!(original_id = %spec.original_id, "creating vlan domain");
        self.post("vlan_domains", &payload).await
    }

    /// `GET vlan_domains/{id}`
    pub async fn get_vlan_domain(&self, original_id: &str) -> Result<VlanDomain, Error> {
        let id = self.resolve(ResourceKind::VlanDomain, original_id).await?;
        self.get(&format!("vlan_domains/{id}"), &[]).await
    }

    /// `DELETE vlan_domains/{id}`
    pub async fn delete_vlan_domain(&self, original_id: &str) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::VlanDomain, original_id).await?;
        debug!(original_id, id = %id, "deleting vlan domain");
        self.delete(&format!("vlan_domains/{id}")).await
    }

    /// `POST port_vlan_domain_bindings`
    pub async fn create_vlan_domain_binding(
        &self,
        spec: &VlanDomainBindingSpec,
    ) -> Result<VlanDomainBinding, Error> {
        let tenant_id = match spec.tenant {
            Some(ref tenant) => Some(self.tenant_id(tenant).await?),
            None => None,
        };
        let payload = VlanDomainBindingPayload {
            origin: self.origin(),
            original_id: &spec.original_id,
            tenant_id,
            binding: BindingDetail {
                vlan_domain_id: self
                    .resolve(ResourceKind::VlanDomain, &spec.vlan_domain_original_id)
                    .await?,
                bind_port_list: &spec.bind_port_list,
                untagged_vni: spec.untagged_vni,
            },
        };
        debug!(
            original_id = %spec.original_id,
            domain = %spec.vlan_domain_original_id,
            ports = spec.bind_port_list.len(),
            "creating vlan domain binding"
        );
        self.post("port_vlan_domain_bindings", &payload).await
    }

    /// Every binding this origin created, across all domains.
    ///
    /// `GET port_vlan_domain_bindings?origin=..`
    pub async fn list_vlan_domain_bindings(&self) -> Result<Vec<VlanDomainBinding>, Error> {
        self.get_list("port_vlan_domain_bindings", &[("origin", self.origin())])
            .await
    }

    /// `GET port_vlan_domain_bindings/{id}`
    pub async fn get_vlan_domain_binding(&self, original_id: &str) -> Result<VlanDomainBinding, Error> {
        let id = self
            .resolve(ResourceKind::VlanDomainBinding, original_id)
            .await?;
        self.get(&format!("port_vlan_domain_bindings/{id}"), &[])
            .await
    }

    /// `DELETE port_vlan_domain_bindings/{id}`
    pub async fn delete_vlan_domain_binding(&self, original_id: &str) -> Result<(), Error> {
        let id = self
            .resolve(ResourceKind::VlanDomainBinding, original_id)
            .await?;
        debug!(original_id, id = %id, "deleting vlan domain binding");
        self.delete(&format!("port_vlan_domain_bindings/{id}"))
            .await
    }
}
