use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Camera cooling defaults drawn from the active profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDefaults {
    /// Target sensor temperature in °C.
    pub cooling_temp: f64,
    /// Cooling ramp duration in minutes.
    pub cooling_duration: f64,
    /// Warming ramp duration in minutes.
    pub warming_duration: f64,
}

/// Observatory site coordinates from the profile's astrometry settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteCoordinates {
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: f64,
}

/// Cooling defaults with the controller's fallbacks (-10 °C, 10 min ramps).
pub fn camera_defaults(profile: &Value) -> CameraDefaults {
    let settings = profile.get("CameraSettings");
    let number = |key: &str, fallback: f64| {
        settings
            .and_then(|s| s.get(key))
            .and_then(Value::as_f64)
            .unwrap_or(fallback)
    };
    CameraDefaults {
        cooling_temp: number("Temperature", -10.0),
        cooling_duration: number("CoolingDuration", 10.0),
        warming_duration: number("WarmingDuration", 10.0),
    }
}

/// Site coordinates, or `None` when the profile has no astrometry settings.
pub fn site_coordinates(profile: &Value) -> Option<SiteCoordinates> {
    let astrometry = profile.get("AstrometrySettings")?;
    Some(SiteCoordinates {
        longitude: astrometry.get("Longitude").and_then(Value::as_f64)?,
        latitude: astrometry.get("Latitude").and_then(Value::as_f64)?,
        elevation: astrometry.get("Elevation").and_then(Value::as_f64)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camera_defaults_fall_back() {
        let defaults = camera_defaults(&json!({}));
        assert_eq!(defaults.cooling_temp, -10.0);
        assert_eq!(defaults.cooling_duration, 10.0);
        assert_eq!(defaults.warming_duration, 10.0);

        let defaults = camera_defaults(&json!({
            "CameraSettings": {"Temperature": -15.0, "CoolingDuration": 5.0}
        }));
        assert_eq!(defaults.cooling_temp, -15.0);
        assert_eq!(defaults.cooling_duration, 5.0);
        assert_eq!(defaults.warming_duration, 10.0);
    }

    #[test]
    fn site_coordinates_require_all_components() {
        let profile = json!({"AstrometrySettings": {
            "Longitude": 11.5, "Latitude": 48.1, "Elevation": 520.0
        }});
        let coords = site_coordinates(&profile).unwrap();
        assert_eq!(coords.longitude, 11.5);
        assert_eq!(coords.latitude, 48.1);
        assert_eq!(coords.elevation, 520.0);

        let partial = json!({"AstrometrySettings": {"Longitude": 11.5}});
        assert!(site_coordinates(&partial).is_none());
        assert!(site_coordinates(&json!({})).is_none());
    }
}
