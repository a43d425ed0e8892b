// devices/registry.rs
use super::{Device, DeviceId, DeviceView};
use tracing::debug;

/// Every device in the room, one slot per [`DeviceId`].
///
/// Lookups by string id treat unknown ids as absent: mutators do nothing and
/// readers report "off".
#[derive(Debug, Clone)]
pub struct Registry {
    devices: [Device; 4],
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            devices: DeviceId::ALL.map(Device::new),
        }
    }

    pub fn turn_on(&mut self, id: &str) {
        self.set_by_name(id, true);
    }

    pub fn turn_off(&mut self, id: &str) {
        self.set_by_name(id, false);
    }

    pub fn set(&mut self, id: DeviceId, power: bool) {
        self.devices[id.index()].is_on = power;
    }

    pub fn status_of(&self, id: &str) -> bool {
        id.parse::<DeviceId>()
            .map(|id| self.get(id).is_on)
            .unwrap_or(false)
    }

    pub fn get(&self, id: DeviceId) -> &Device {
        &self.devices[id.index()]
    }

    /// `(name, label)` for each device in display order.
    pub fn describe_all(&self) -> Vec<(&'static str, String)> {
        self.devices
            .iter()
            .map(|device| (device.id.name(), device.label()))
            .collect()
    }

    /// [`Registry::describe_all`] joined with each device's id and state.
    pub fn views(&self) -> Vec<DeviceView> {
        self.devices
            .iter()
            .zip(self.describe_all())
            .map(|(device, (name, label))| DeviceView {
                id: device.id,
                name: name.to_string(),
                is_on: device.is_on,
                label,
            })
            .collect()
    }

    fn set_by_name(&mut self, id: &str, power: bool) {
        match id.parse::<DeviceId>() {
            Ok(id) => self.set(id, power),
            Err(e) => debug!(%e, power, "ignoring state change"),
        }
    }
}
