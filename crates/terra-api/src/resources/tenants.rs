// Tenant endpoints
//
// Tenants are normally provisioned implicitly through
// `get_or_create_tenant`; these are the explicit forms.

use serde::Serialize;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::Tenant;
use crate::resolve::ResourceKind;

#[derive(Serialize)]
struct TenantPayload<'a> {
    name: &'a str,
    origin: &'a str,
    original_id: &'a str,
    description: String,
}

impl TerraClient {
    /// `POST tenants`
    pub async fn create_tenant(&self, original_id: &str, name: &str) -> Result<Tenant, Error> {
        let payload = TenantPayload {
            name,
            origin: self.origin(),
            original_id,
            description: format!("Created by {}", self.origin()),
        };
        debug!(original_id, name, "creating tenant");
        self.post(ResourceKind::Tenant.collection(), &payload).await
    }

    /// `DELETE tenants/{id}`
    pub async fn delete_tenant(&self, original_id: &str) -> Result<(), Error> {
        let id = self.resolve(ResourceKind::Tenant, original_id).await?;
        debug!(original_id, id = %id, "deleting tenant");
        self.delete(&format!("tenants/{id}")).await
    }
}
