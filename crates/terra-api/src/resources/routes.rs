// Static routes under `routers/{id}/routes`.

use serde::Serialize;
use tracing::{debug, info};

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::Route;
use crate::requests::RouteSpec;
use crate::resolve::ResourceKind;
use crate::retry::RetryPolicy;

#[derive(Serialize)]
struct RoutePayload<'a> {
    destination: &'a str,
    nexthop: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<String>,
}

impl TerraClient {
    /// `POST routers/{id}/routes`
    pub async fn add_route(
        &self,
        router_original_id: &str,
        route: &RouteSpec,
        retry: &RetryPolicy,
    ) -> Result<Route, Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        let device_id = match route.device_name.as_deref() {
            Some(name) => Some(self.get_switch(name).await?.id),
            None => None,
        };
        let payload = RoutePayload {
            destination: &route.destination,
            nexthop: &route.nexthop,
            device_id,
        };
        let path = format!("routers/{router_id}/routes");

        debug!(
            router = router_original_id,
            destination = %route.destination,
            nexthop = %route.nexthop,
            "adding static route"
        );
        retry.run("add route", || self.post(&path, &payload)).await
    }

    /// `GET routers/{id}/routes`
    pub async fn list_routes(&self, router_original_id: &str) -> Result<Vec<Route>, Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        self.get_list(&format!("routers/{router_id}/routes"), &[])
            .await
    }

    /// Delete the router's static routes, all or those to `destination`.
    ///
    /// Returns how many were deleted; entries that vanish mid-loop are skipped.
    pub async fn delete_routes(
        &self,
        router_original_id: &str,
        destination: Option<&str>,
        retry: &RetryPolicy,
    ) -> Result<usize, Error> {
        let router_id = self.resolve(ResourceKind::Router, router_original_id).await?;
        let routes: Vec<Route> = self
            .get_list(&format!("routers/{router_id}/routes"), &[])
            .await?;

        let mut deleted = 0;
        for route in routes
            .iter()
            .filter(|r| destination.is_none_or(|d| r.destination.as_deref() == Some(d)))
        {
            let path = format!("routers/{router_id}/routes/{}", route.id);
            debug!(router = router_original_id, route_id = %route.id, "deleting static route");
            match retry.run("delete route", || self.delete(&path)).await {
                Ok(()) => deleted += 1,
                Err(e) if e.is_not_found() => {
                    debug!(router = router_original_id, route_id = %route.id, "static route already gone");
                }
                Err(e) => return Err(e),
            }
        }
        info!(router = router_original_id, deleted, "static routes deleted");
        Ok(deleted)
    }
}
