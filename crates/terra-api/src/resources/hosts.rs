// Hosts and host links. Neither carries an origin tag: hosts are keyed by
// hostname, links by the host name they belong to.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::{Host, HostConnection, HostLink};

#[derive(Serialize)]
struct HostPayload<'a> {
    hostname: &'a str,
    host_ip: &'a str,
}

impl TerraClient {
    /// `GET host?hostname=..`; `None` when the controller has no such host.
    pub async fn get_host_by_name(&self, hostname: &str) -> Result<Option<Host>, Error> {
        let hosts: Vec<Host> = self.get_list("host", &[("hostname", hostname)]).await?;
        Ok(hosts.into_iter().next())
    }

    /// `POST host`
    pub async fn create_host(&self, hostname: &str, mgmt_ip: &str) -> Result<Host, Error> {
        debug!(hostname, mgmt_ip, "creating host");
        self.post(
            "host",
            &HostPayload {
                hostname,
                host_ip: mgmt_ip,
            },
        )
        .await
    }

    /// `DELETE host/{id}`
    pub async fn delete_host(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting host");
        self.delete(&format!("host/{id}")).await
    }

    /// `POST host_links` with all links in one body.
    pub async fn add_host_links(&self, links: &[HostConnection]) -> Result<(), Error> {
        debug!(count = links.len(), "adding host links");
        let _: Value = self.post("host_links", links).await?;
        Ok(())
    }

    /// `GET host_links?host_name=..`
    pub async fn list_host_links(&self, hostname: &str) -> Result<Vec<HostLink>, Error> {
        self.get_list("host_links", &[("host_name", hostname)])
            .await
    }

    /// `DELETE host_links/{id}`
    pub async fn delete_host_link(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting host link");
        self.delete(&format!("host_links/{id}")).await
    }
}
