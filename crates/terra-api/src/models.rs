// Response models for the Terra controller.
//
// Only `id` is guaranteed by the controller; everything else is optional or
// defaulted so a sparse response still decodes. Attribute names that carry
// a namespace prefix on the wire (`segment:type`, `cisco:l3_vni`) are renamed.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Overlay type of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SegmentType {
    #[default]
    Vxlan,
    /// VLAN sub-interface segment.
    Subintf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tenant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub original_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Network {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(rename = "segment:type", default)]
    pub segment_type: Option<SegmentType>,
    #[serde(rename = "segment:global_id", default)]
    pub segment_global_id: Option<u32>,
    #[serde(rename = "router:external", default)]
    pub external: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subnet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_id: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub cidr: Option<String>,
    #[serde(default)]
    pub gateway_ip: Option<String>,
    #[serde(default)]
    pub enable_dhcp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Router {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(rename = "cisco:l3_vni", default)]
    pub l3_vni: Option<u32>,
}

/// One `{subnet, address}` assignment on a port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    pub subnet_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Port {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_id: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub ips: Vec<FixedIp>,
}

/// Network attached to a physical switch interface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PortBinding {
    pub id: String,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub switch_name: Option<String>,
    #[serde(default)]
    pub interface_name: Option<String>,
    #[serde(default)]
    pub vlan_native: bool,
    #[serde(default)]
    pub local_vlan_id: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BgpPeer {
    pub id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub as_number: Option<u32>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub advertise_host_route: bool,
}

/// Static route on a router.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Route {
    pub id: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub nexthop: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// VLAN-to-VXLAN translation range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VlanDomain {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_id: Option<String>,
    #[serde(default)]
    pub start_vlan: Option<u16>,
    #[serde(default)]
    pub end_vlan: Option<u16>,
    #[serde(default)]
    pub start_vxlan: Option<u32>,
    #[serde(default)]
    pub end_vxlan: Option<u32>,
}

/// A `{device, port}` pair a VLAN-domain binding applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchPort {
    pub device_name: String,
    pub port_name: String,
}

/// Binding body nested in a VLAN-domain binding response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VlanDomainBindingDetail {
    #[serde(default)]
    pub vlan_domain_id: Option<String>,
    #[serde(default)]
    pub bind_port_list: Vec<SwitchPort>,
    #[serde(default)]
    pub untagged_vni: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VlanDomainBinding {
    pub id: String,
    #[serde(default)]
    pub original_id: Option<String>,
    #[serde(default)]
    pub binding: VlanDomainBindingDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Host {
    pub id: String,
    pub hostname: String,
    #[serde(default)]
    pub host_ip: Option<String>,
}

/// One cable between a host NIC and a switch interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConnection {
    pub host_name: String,
    pub host_interface_name: String,
    pub switch_name: String,
    pub switch_interface_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostLink {
    pub id: String,
    #[serde(flatten)]
    pub connection: HostConnection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceInterface {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A fabric switch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<DeviceInterface>,
}

impl Device {
    /// Interface with the given name, if the switch reported one.
    pub fn interface(&self, name: &str) -> Option<&DeviceInterface> {
        self.interfaces
            .iter()
            .find(|intf| intf.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VniRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VniPool {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub vni_ranges: Vec<VniRange>,
}
