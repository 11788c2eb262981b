// Global VNI pool management.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::{VniPool, VniRange};

#[derive(Serialize)]
struct PoolPayload<'a> {
    name: &'a str,
    vni_ranges: [VniRange; 1],
}

#[derive(Serialize)]
struct PoolList<'a> {
    vni_pool: [PoolPayload<'a>; 1],
}

impl TerraClient {
    /// `POST global_vni` with a single-range pool.
    pub async fn create_vni_pool(&self, name: &str, range: VniRange) -> Result<(), Error> {
        let body = PoolList {
            vni_pool: [PoolPayload {
                name,
                vni_ranges: [range],
            }],
        };
        debug!(name, start = range.start, end = range.end, "creating vni pool");
        let _: Value = self.post("global_vni", &body).await?;
        Ok(())
    }

    /// `GET vni_pools`
    pub async fn list_vni_pools(&self) -> Result<Vec<VniPool>, Error> {
        self.get_list("vni_pools", &[]).await
    }

    /// `GET vni_pools/{id}`
    pub async fn get_vni_pool(&self, id: &str) -> Result<VniPool, Error> {
        self.get(&format!("vni_pools/{id}"), &[]).await
    }

    /// `DELETE vni_pools/{id}`
    pub async fn delete_vni_pool(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting vni pool");
        self.delete(&format!("vni_pools/{id}")).await
    }
}
