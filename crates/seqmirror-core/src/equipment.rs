use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic "not configured" device id.
pub const NO_DEVICE: &str = "No_Device";

/// Ordered settings-key → endpoint-name table driving equipment discovery.
const DEVICE_TABLE: [(&str, &str); 11] = [
    ("CameraSettings", "camera"),
    ("DomeSettings", "dome"),
    ("FilterWheelSettings", "filter"),
    ("FocuserSettings", "focuser"),
    ("SwitchSettings", "switch"),
    ("TelescopeSettings", "mount"),
    ("SafetyMonitorSettings", "safety"),
    ("FlatDeviceSettings", "flatdevice"),
    ("RotatorSettings", "rotator"),
    ("WeatherDataSettings", "weather"),
    ("GuiderSettings", "guider"),
];

/// One configured device derived from the active profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    /// Settings key on the profile, e.g. "CameraSettings".
    #[serde(rename = "type")]
    pub kind: String,
    /// Driver/device id as configured in the profile.
    pub id: String,
    /// Endpoint name the device is reachable under, e.g. "camera".
    #[serde(rename = "apiName")]
    pub api_name: String,
}

/// Derives the configured-equipment list from an active profile payload.
///
/// A device is listed when its id is present and not a sentinel. Guider keys
/// off `GuiderName` with sentinel "No_Guider"; rotator and filter wheel
/// additionally exclude their manual-driver ids.
pub fn existing_equipment(active_profile: &Value) -> Vec<EquipmentEntry> {
    let mut list = Vec::new();
    for (key, api_name) in DEVICE_TABLE {
        let Some(device) = active_profile.get(key) else {
            continue;
        };
        let id = if key == "GuiderSettings" {
            device.get("GuiderName").and_then(Value::as_str)
        } else {
            device.get("Id").and_then(Value::as_str)
        };
        let Some(id) = id else { continue };
        let excluded = match key {
            "GuiderSettings" => id.is_empty() || id == "No_Guider",
            "RotatorSettings" => id == "Manual Rotator" || id == NO_DEVICE,
            "FilterWheelSettings" => id == "Manual Filter Wheel" || id == NO_DEVICE,
            _ => id.is_empty() || id == NO_DEVICE,
        };
        if excluded {
            continue;
        }
        list.push(EquipmentEntry {
            kind: key.to_string(),
            id: id.to_string(),
            api_name: api_name.to_string(),
        });
    }
    list
}
