use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parallel RA/DEC guide-error series extracted from a guider graph payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideSeries {
    pub ra_distance_raw: Vec<f64>,
    pub dec_distance_raw: Vec<f64>,
}

/// Pulls the display series out of a guider graph payload.
///
/// Each step contributes its `*RawDisplay` value when the matching `*Raw`
/// field is numeric, otherwise 0. Returns `None` when `GuideSteps` is missing
/// or not an array.
pub fn extract_guide_series(graph: &Value) -> Option<GuideSeries> {
    let steps = graph.get("GuideSteps")?.as_array()?;
    Some(GuideSeries {
        ra_distance_raw: steps
            .iter()
            .map(|step| display_value(step, "RADistanceRaw", "RADistanceRawDisplay"))
            .collect(),
        dec_distance_raw: steps
            .iter()
            .map(|step| display_value(step, "DECDistanceRaw", "DECDistanceRawDisplay"))
            .collect(),
    })
}

fn display_value(step: &Value, raw_key: &str, display_key: &str) -> f64 {
    if step.get(raw_key).map(Value::is_number).unwrap_or(false) {
        step.get(display_key).and_then(Value::as_f64).unwrap_or(0.0)
    } else {
        0.0
    }
}
