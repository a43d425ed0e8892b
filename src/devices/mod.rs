// devices/mod.rs
mod registry;
pub use registry::Registry;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// The closed set of devices in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceId {
    Light,
    Fan,
    Ac,
    Led,
}

impl DeviceId {
    /// Display order used by every status column.
    pub const ALL: [DeviceId; 4] = [DeviceId::Light, DeviceId::Fan, DeviceId::Ac, DeviceId::Led];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceId::Light => "light",
            DeviceId::Fan => "fan",
            DeviceId::Ac => "ac",
            DeviceId::Led => "led",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceId::Light => "Light",
            DeviceId::Fan => "Fan",
            DeviceId::Ac => "AC",
            DeviceId::Led => "LED",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown device: {0}")]
pub struct UnknownDevice(pub String);

impl FromStr for DeviceId {
    type Err = UnknownDevice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownDevice(s.to_string()))
    }
}

/// A named on/off toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub is_on: bool,
}

impl Device {
    pub fn new(id: DeviceId) -> Self {
        Self { id, is_on: false }
    }

    pub fn label(&self) -> String {
        let indicator = if self.is_on { "🟢 On" } else { "🔴 Off" };
        format!("{}: {}", self.id.name(), indicator)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeviceView {
    pub id: DeviceId,
    pub name: String,
    pub is_on: bool,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_ids() {
        for id in DeviceId::ALL {
            assert_eq!(id.as_str().parse::<DeviceId>().unwrap(), id);
        }
        assert!("garage".parse::<DeviceId>().is_err());
        assert!("Light".parse::<DeviceId>().is_err());
    }

    #[test]
    fn label_shows_name_and_indicator() {
        let mut device = Device::new(DeviceId::Ac);
        assert_eq!(device.label(), "AC: 🔴 Off");
        device.is_on = true;
        assert_eq!(device.label(), "AC: 🟢 On");
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&DeviceId::Led).unwrap(), "\"led\"");
    }
}
