use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Item status literal that marks an active run.
pub const RUNNING_STATUS: &str = "RUNNING";

/// Names for the first four top-level containers of a sequence. Anything
/// beyond these is addressed as `Custom-{index}`.
const ROOT_NAMES: [&str; 4] = ["Global", "Start", "Imaging", "End"];

/// Top-level container of a sequence tree.
///
/// Only the fields the sync layer inspects are typed; everything else the
/// controller sends rides along in `extra` so the tree round-trips intact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Items", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SequenceItem>,
    #[serde(rename = "Triggers", default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<SequenceNode>,
    #[serde(rename = "Conditions", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<SequenceNode>,
    #[serde(rename = "GlobalTriggers", default, skip_serializing_if = "Vec::is_empty")]
    pub global_triggers: Vec<SequenceNode>,
    #[serde(rename = "_path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An instruction inside a container. Items nest arbitrarily deep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceItem {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Items", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SequenceItem>,
    #[serde(rename = "Triggers", default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<SequenceNode>,
    #[serde(rename = "Conditions", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<SequenceNode>,
    #[serde(rename = "_path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Trigger or condition leaf. Never recursed into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceNode {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "_path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stamps every node of the tree with its hierarchical path, in place.
///
/// Paths depend only on tree position, so re-running after any edit that
/// keeps sibling order produces identical strings.
pub fn assign_paths(containers: &mut [Container]) {
    for (index, container) in containers.iter_mut().enumerate() {
        let path = match ROOT_NAMES.get(index) {
            Some(name) => (*name).to_string(),
            None => format!("Custom-{index}"),
        };
        for (j, trigger) in container.global_triggers.iter_mut().enumerate() {
            trigger.path = Some(format!("{path}-GlobalTriggers-{j}"));
        }
        assign_item_paths(&mut container.items, &path);
        assign_leaf_paths(&mut container.triggers, &path, "Triggers");
        assign_leaf_paths(&mut container.conditions, &path, "Conditions");
        container.path = Some(path);
    }
}

fn assign_item_paths(items: &mut [SequenceItem], parent: &str) {
    for (index, item) in items.iter_mut().enumerate() {
        let path = format!("{parent}-Items-{index}");
        assign_item_paths(&mut item.items, &path);
        assign_leaf_paths(&mut item.triggers, &path, "Triggers");
        assign_leaf_paths(&mut item.conditions, &path, "Conditions");
        item.path = Some(path);
    }
}

fn assign_leaf_paths(nodes: &mut [SequenceNode], parent: &str, kind: &str) {
    for (index, node) in nodes.iter_mut().enumerate() {
        node.path = Some(format!("{parent}-{kind}-{index}"));
    }
}

/// True when any container has a direct item with status `RUNNING`.
///
/// Only the first item tier of each container is inspected; deeper-nested
/// items are not scanned.
pub fn any_running(containers: &[Container]) -> bool {
    containers.iter().any(|container| {
        container
            .items
            .iter()
            .any(|item| item.status.as_deref() == Some(RUNNING_STATUS))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(n: usize) -> Vec<Container> {
        (0..n).map(|_| Container::default()).collect()
    }

    #[test]
    fn container_names_by_index() {
        let mut containers = tree(5);
        assign_paths(&mut containers);
        let paths: Vec<_> = containers.iter().map(|c| c.path.clone().unwrap()).collect();
        assert_eq!(paths, ["Global", "Start", "Imaging", "End", "Custom-4"]);
    }

    #[test]
    fn nested_items_triggers_and_conditions() {
        let mut containers = tree(3);
        containers[2].items = vec![
            SequenceItem::default(),
            SequenceItem::default(),
            SequenceItem {
                items: vec![SequenceItem::default()],
                triggers: vec![SequenceNode::default()],
                conditions: vec![SequenceNode::default(), SequenceNode::default()],
                ..Default::default()
            },
        ];
        assign_paths(&mut containers);

        let item = &containers[2].items[2];
        assert_eq!(item.path.as_deref(), Some("Imaging-Items-2"));
        assert_eq!(item.items[0].path.as_deref(), Some("Imaging-Items-2-Items-0"));
        assert_eq!(
            item.triggers[0].path.as_deref(),
            Some("Imaging-Items-2-Triggers-0")
        );
        assert_eq!(
            item.conditions[1].path.as_deref(),
            Some("Imaging-Items-2-Conditions-1")
        );
    }

    #[test]
    fn container_tier_children_get_paths() {
        let mut containers = tree(1);
        containers[0].global_triggers = vec![SequenceNode::default()];
        containers[0].triggers = vec![SequenceNode::default()];
        containers[0].conditions = vec![SequenceNode::default()];
        assign_paths(&mut containers);

        let c = &containers[0];
        assert_eq!(
            c.global_triggers[0].path.as_deref(),
            Some("Global-GlobalTriggers-0")
        );
        assert_eq!(c.triggers[0].path.as_deref(), Some("Global-Triggers-0"));
        assert_eq!(c.conditions[0].path.as_deref(), Some("Global-Conditions-0"));
    }

    #[test]
    fn assignment_is_idempotent() {
        let mut containers = tree(6);
        containers[1].items = vec![SequenceItem {
            items: vec![SequenceItem::default()],
            ..Default::default()
        }];
        assign_paths(&mut containers);
        let first = serde_json::to_value(&containers).unwrap();
        assign_paths(&mut containers);
        let second = serde_json::to_value(&containers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn paths_ignore_payload_content() {
        let mut a = tree(2);
        let mut b = tree(2);
        b[0].name = Some("renamed".into());
        b[0].extra.insert("Foo".into(), json!(42));
        assign_paths(&mut a);
        assign_paths(&mut b);
        assert_eq!(a[0].path, b[0].path);
    }

    #[test]
    fn running_scan_is_shallow() {
        let mut containers = tree(3);
        containers[2].items = vec![SequenceItem {
            status: Some("CREATED".into()),
            items: vec![SequenceItem {
                status: Some(RUNNING_STATUS.into()),
                ..Default::default()
            }],
            ..Default::default()
        }];
        // A nested RUNNING item is not seen by the shallow scan.
        assert!(!any_running(&containers));

        containers[2].items[0].status = Some(RUNNING_STATUS.into());
        assert!(any_running(&containers));
    }

    #[test]
    fn wire_round_trip_keeps_unknown_fields() {
        let payload = json!([{
            "Name": "Imaging session",
            "Status": "CREATED",
            "ExpandedKey": true,
            "Items": [{"Name": "Take exposure", "Status": "RUNNING", "ExposureTime": 120}]
        }]);
        let mut containers: Vec<Container> = serde_json::from_value(payload).unwrap();
        assign_paths(&mut containers);
        let out = serde_json::to_value(&containers).unwrap();
        assert_eq!(out[0]["ExpandedKey"], json!(true));
        assert_eq!(out[0]["Items"][0]["ExposureTime"], json!(120));
        assert_eq!(out[0]["Items"][0]["_path"], json!("Global-Items-0"));
    }
}
