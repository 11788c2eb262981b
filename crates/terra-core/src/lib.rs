// terra-core: provisioning workflows over the Terra DC controller client
//
// The orchestrator composes terra-api resource operations into the
// caller-visible verbs (vpc, vxnet, node, sub-interface, routing) and owns
// the rollback and NotFound-tolerance rules. Host and BGP management go
// through the `FabricExtension` capability trait.

pub mod config;
pub mod error;
pub mod extension;
pub mod model;
pub mod orchestrator;

pub use config::{BindingMode, OrchestratorConfig};
pub use error::CoreError;
pub use extension::{FabricExtension, TerraExtension};
pub use model::{HostInfo, NodeAttachment, NodeBinding, SubInterfaceSpec, VpcSpec, Vxnet, VxnetSpec};
pub use orchestrator::Orchestrator;
