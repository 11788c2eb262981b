// Caller-facing request types.
//
// These carry caller-local ids (`*_original_id`); the resource operations
// resolve them to controller ids before building the wire payload.

use crate::models::{SegmentType, SwitchPort};

/// Tenant a resource is created under; created on first use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantRef {
    pub original_id: String,
    pub name: String,
}

impl TenantRef {
    pub fn new(original_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            original_id: original_id.into(),
            name: name.into(),
        }
    }

    /// Tenant whose display name is its id.
    pub fn named_by_id(original_id: impl Into<String>) -> Self {
        let original_id = original_id.into();
        Self {
            name: original_id.clone(),
            original_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkSpec {
    pub original_id: String,
    pub name: String,
    pub tenant: TenantRef,
    pub segment_type: SegmentType,
    /// VNI; allocated from `vni_pool_name` by the controller when absent.
    pub segment_global_id: Option<u32>,
    pub segment_local_id: Option<u32>,
    pub external: bool,
    pub vni_pool_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubnetSpec {
    pub original_id: String,
    pub name: String,
    pub tenant: TenantRef,
    pub network_original_id: String,
    pub cidr: Option<String>,
    pub gateway_ip: Option<String>,
    pub ip_version: Option<u8>,
    pub enable_dhcp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouterSpec {
    pub original_id: String,
    pub name: String,
    pub tenant: TenantRef,
    pub l3_vni: Option<u32>,
    pub l3_vni_pool_name: Option<String>,
}

/// Address request on a port; `subnet_original_id` is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixedIpSpec {
    pub subnet_original_id: String,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortSpec {
    pub original_id: String,
    pub name: String,
    pub tenant: TenantRef,
    pub network_original_id: String,
    pub fixed_ips: Vec<FixedIpSpec>,
}

/// A port pinned to one switch interface with a VLAN tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectPortSpec {
    pub port: PortSpec,
    pub switch_name: String,
    pub interface_name: String,
    pub vlan_id: u16,
}

/// Attach a port to a switch interface (`ports/{id}/bind`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortBindSpec {
    pub switch_name: String,
    pub interface_name: String,
    pub vlan_native: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortBindingSpec {
    pub network_original_id: String,
    pub switch_name: String,
    pub interface_name: String,
    /// Untagged (native VLAN) attachment.
    pub vlan_native: bool,
    pub local_vlan_id: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BgpPeerSpec {
    pub as_number: u32,
    pub ip_address: String,
    /// Border switch the session is configured on.
    pub device_name: String,
    pub advertise_host_route: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteSpec {
    /// Destination prefix, e.g. `10.10.0.0/16`.
    pub destination: String,
    pub nexthop: String,
    /// Switch the next hop sits behind, when the controller needs it.
    pub device_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VlanDomainSpec {
    pub original_id: String,
    pub name: String,
    pub start_vlan: u16,
    pub end_vlan: u16,
    pub start_vxlan: u32,
    pub end_vxlan: u32,
}

impl VlanDomainSpec {
    /// One VLAN mapped onto one VNI.
    pub fn single(original_id: impl Into<String>, vlan: u16, vni: u32) -> Self {
        let original_id = original_id.into();
        Self {
            name: original_id.clone(),
            original_id,
            start_vlan: vlan,
            end_vlan: vlan,
            start_vxlan: vni,
            end_vxlan: vni,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VlanDomainBindingSpec {
    pub original_id: String,
    pub tenant: Option<TenantRef>,
    pub vlan_domain_original_id: String,
    pub bind_port_list: Vec<SwitchPort>,
    /// VNI carried untagged on the bound ports.
    pub untagged_vni: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExternalGateway {
    pub network_original_id: String,
    pub enable_snat: bool,
    pub fixed_ips: Vec<FixedIpSpec>,
}
