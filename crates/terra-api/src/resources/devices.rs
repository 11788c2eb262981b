// Switch lookup by name (`devices?name=..`).

use tracing::error;

use crate::client::TerraClient;
use crate::error::Error;
use crate::models::{Device, DeviceInterface};

impl TerraClient {
    /// The first device the controller returns for `name`.
    pub async fn get_switch(&self, name: &str) -> Result<Device, Error> {
        let devices: Vec<Device> = self.get_list("devices", &[("name", name)]).await?;
        devices
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("switch {name}")))
    }

    /// An interface of the named switch.
    pub async fn get_switch_interface(
        &self,
        switch_name: &str,
        interface_name: &str,
    ) -> Result<DeviceInterface, Error> {
        let devices: Vec<Device> = self
            .get_list("devices", &[("name", switch_name)])
            .await?;
        devices
            .first()
            .and_then(|device| device.interface(interface_name))
            .cloned()
            .ok_or_else(|| {
                error!(switch_name, interface_name, "can't find interface");
                Error::not_found(format!("interface {switch_name} {interface_name}"))
            })
    }
}
