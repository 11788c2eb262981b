// Workflow request and result types.
//
// Ids here are the caller's own (vpc / vxnet / user ids); the orchestrator
// passes them through as `original_id`s.

use terra_api::models::{HostConnection, Network, SegmentType, Subnet, SwitchPort};
use terra_api::requests::BgpPeerSpec;

use crate::config::BindingMode;

/// A VRF-backed router.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VpcSpec {
    pub vpc_id: String,
    pub user_id: String,
    /// Allocated from the configured L3 pool when absent.
    pub l3_vni: Option<u32>,
    pub bgp_peers: Vec<BgpPeerSpec>,
}

/// A network with exactly one subnet sharing its id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VxnetSpec {
    pub vxnet_id: String,
    pub user_id: String,
    pub vni: Option<u32>,
    pub cidr: String,
    pub gateway_ip: Option<String>,
    pub segment_type: SegmentType,
}

/// What `create_vxnet` built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vxnet {
    pub network: Network,
    pub subnet: Subnet,
}

/// Attach or detach a host to a vxnet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeAttachment {
    pub vxnet_id: String,
    pub vni: u32,
    pub host: String,
    pub user_id: String,
    /// Untagged attach (bare metal). Hypervisors attach tagged.
    pub native_vlan: bool,
    /// Local VLAN on the switch ports. Required in VLAN-domain mode.
    pub vlan_id: Option<u16>,
}

impl NodeAttachment {
    /// Id of the logical port for this (vxnet, host) pair.
    pub fn port_id(&self) -> String {
        format!("{}_{}", self.vxnet_id, self.host)
    }

    /// Id of the VLAN domain shared by every host on this (vxnet, VLAN).
    pub fn vlan_domain_id(&self) -> Option<String> {
        self.vlan_id.map(|vlan| format!("{}_{vlan}", self.vxnet_id))
    }
}

/// Result of a node attach, for the caller's own port binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBinding {
    pub port_id: String,
    pub mode: BindingMode,
    pub physical_network: Option<String>,
    pub local_vlan_id: Option<u16>,
    /// Switch ports that were bound (or found already bound).
    pub ports: Vec<SwitchPort>,
}

/// A VLAN sub-interface endpoint on a switch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubInterfaceSpec {
    pub vxnet_id: String,
    pub user_id: String,
    /// Router to attach the endpoint to, if any.
    pub vpc_id: Option<String>,
    pub switch_name: String,
    pub interface_name: String,
    pub ip_address: String,
    pub vlan_id: u16,
}

/// A host as the extension reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostInfo {
    pub hostname: String,
    pub mgmt_ip: Option<String>,
    pub connections: Vec<HostConnection>,
}
