// Static routes on a VPC router.

use terra_api::models::Route;
use terra_api::requests::RouteSpec;

use super::{Orchestrator, ignore_not_found};
use crate::error::CoreError;
use crate::extension::FabricExtension;

impl<E: FabricExtension> Orchestrator<E> {
    pub async fn add_route(&self, vpc_id: &str, route: &RouteSpec) -> Result<Route, CoreError> {
        Ok(self
            .client
            .add_route(vpc_id, route, &self.config.retry)
            .await?)
    }

    /// Delete the router's routes, all or only those to `destination`.
    pub async fn delete_routes(
        &self,
        vpc_id: &str,
        destination: Option<&str>,
    ) -> Result<usize, CoreError> {
        ignore_not_found(
            self.client
                .delete_routes(vpc_id, destination, &self.config.retry)
                .await,
            "routes",
            vpc_id,
        )
    }
}
