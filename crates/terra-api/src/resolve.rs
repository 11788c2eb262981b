// Identifier resolution: (origin, original_id) -> controller id.
//
// Every lookup is a fresh filtered list query; nothing is cached. Tenants are
// the one kind that is created on a miss.

use serde::Deserialize;
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::client::TerraClient;
use crate::error::Error;

/// Resource kinds that carry an `origin`/`original_id` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumIter)]
pub enum ResourceKind {
    #[strum(serialize = "tenants")]
    Tenant,
    #[strum(serialize = "networks")]
    Network,
    #[strum(serialize = "subnets")]
    Subnet,
    #[strum(serialize = "routers")]
    Router,
    #[strum(serialize = "ports")]
    Port,
    #[strum(serialize = "vlan_domains")]
    VlanDomain,
    #[strum(serialize = "port_vlan_domain_bindings")]
    VlanDomainBinding,
}

impl ResourceKind {
    /// Collection path under the base URL.
    pub fn collection(self) -> &'static str {
        self.into()
    }
}

/// A caller-side reference to a controller resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub original_id: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, original_id: impl Into<String>) -> Self {
        Self {
            kind,
            original_id: original_id.into(),
        }
    }
}

#[derive(Deserialize)]
struct Identified {
    #[serde(default)]
    id: Option<String>,
}

impl TerraClient {
    /// Controller id of the resource created under `original_id` by this origin.
    ///
    /// `GET {collection}?origin=..&original_id=..`. No match is `NotFound`;
    /// the first match wins if the controller returns several.
    pub async fn resolve(&self, kind: ResourceKind, original_id: &str) -> Result<String, Error> {
        if original_id.is_empty() {
            return Err(Error::not_found(format!("{kind} <empty id>")));
        }

        let matches: Vec<Identified> = self
            .get_list(
                kind.collection(),
                &[("origin", self.origin()), ("original_id", original_id)],
            )
            .await?;

        if matches.len() > 1 {
            warn!(%kind, original_id, count = matches.len(), "ambiguous original_id, using first match");
        }

        match matches.into_iter().next().and_then(|m| m.id) {
            Some(id) if !id.is_empty() => {
                debug!(%kind, original_id, id = %id, "resolved");
                Ok(id)
            }
            _ => {
                warn!(%kind, original_id, "not found");
                Err(Error::not_found(format!("{kind} {original_id}")))
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but a miss is `Ok(None)`.
    pub async fn resolve_optional(
        &self,
        kind: ResourceKind,
        original_id: &str,
    ) -> Result<Option<String>, Error> {
        match self.resolve(kind, original_id).await {
            Ok(id) => Ok(Some(id)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve a [`ResourceRef`].
    pub async fn resolve_ref(&self, reference: &ResourceRef) -> Result<String, Error> {
        self.resolve(reference.kind, &reference.original_id).await
    }

    /// Remote tenant id for `original_id`, creating the tenant on first use.
    pub async fn get_or_create_tenant(&self, original_id: &str, name: &str) -> Result<String, Error> {
        match self.resolve(ResourceKind::Tenant, original_id).await {
            Ok(id) => Ok(id),
            Err(e) if e.is_not_found() => {
                info!(original_id, name, "tenant not found, creating");
                Ok(self.create_tenant(original_id, name).await?.id)
            }
            Err(e) => Err(e),
        }
    }
}
