use crate::{Container, EquipmentEntry, GuideSeries};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Reconciled controller state published to consumers.
///
/// Each subsystem field holds the last successfully fetched payload; a failed
/// fetch leaves the previous value in place. The whole struct resets to the
/// empty-initial state when the backend is unreachable or incompatible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub backend_reachable: bool,
    pub version_compatible: bool,
    pub current_api_version: Option<String>,

    pub camera: Value,
    pub mount: Value,
    pub filter_wheel: Value,
    pub focuser: Value,
    pub focuser_autofocus: Value,
    pub rotator: Value,
    pub guider: Value,
    pub guider_chart: Value,
    pub flat_device: Value,
    pub dome: Value,
    pub safety: Value,
    pub switches: Value,
    pub weather: Value,
    pub image_history: Value,

    pub profile: Value,
    pub existing_equipment_list: Vec<EquipmentEntry>,
    pub guide_series: GuideSeries,

    pub sequence_tree: Vec<Container>,
    pub sequence_is_loaded: bool,
    pub sequence_running: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            backend_reachable: false,
            version_compatible: false,
            current_api_version: None,
            // Consumers poke at these two before the first fetch lands, so
            // they start with their disconnected shapes instead of null.
            camera: json!({"IsExposing": false}),
            safety: json!({"Connected": false, "IsSafe": false}),
            mount: Value::Null,
            filter_wheel: Value::Null,
            focuser: Value::Null,
            focuser_autofocus: Value::Null,
            rotator: Value::Null,
            guider: Value::Null,
            guider_chart: Value::Null,
            flat_device: Value::Null,
            dome: Value::Null,
            switches: Value::Null,
            weather: Value::Null,
            image_history: Value::Null,
            profile: Value::Null,
            existing_equipment_list: Vec::new(),
            guide_series: GuideSeries::default(),
            sequence_tree: Vec::new(),
            sequence_is_loaded: false,
            sequence_running: false,
        }
    }
}

impl Snapshot {
    /// Resets to the empty-initial state.
    pub fn clear(&mut self) {
        *self = Snapshot::default();
    }
}
