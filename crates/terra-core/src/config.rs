// Orchestration knobs. Built by the caller (or terra-config) and handed to
// the orchestrator; never read from disk here.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use terra_api::RetryPolicy;

/// How a node is attached to a network.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BindingMode {
    /// One `port_bindings` entry per switch interface.
    #[default]
    Network,
    /// A VLAN domain per (network, VLAN) plus one `port_vlan_domain_bindings`
    /// entry covering all of the host's switch ports.
    VlanDomain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Provider network name reported back with every node binding.
    pub physical_network: Option<String>,
    /// Bind every switch link of a host instead of only the first one.
    pub complete_binding: bool,
    pub binding_mode: BindingMode,
    /// Pool the controller allocates L2 VNIs from when none is given.
    pub vni_pool_name: Option<String>,
    /// Pool the controller allocates L3 VNIs from when none is given.
    pub l3_vni_pool_name: Option<String>,
    /// Applied to BGP peer and static route mutations.
    pub retry: RetryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            physical_network: None,
            complete_binding: false,
            binding_mode: BindingMode::Network,
            vni_pool_name: None,
            l3_vni_pool_name: None,
            retry: RetryPolicy::default(),
        }
    }
}
