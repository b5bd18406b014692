//! Integration tests for the text label lifecycle.

use std::cell::RefCell;
use std::rc::Rc;

use node_model::graph::events::{LABEL_ADD, LABEL_DELETE};
use node_model::node::{LabelEntry, LabelPatch, LabelRecord, LabelSelector, LabelSet};
use node_model::{GraphContext, LabelConfig, NodeData, NodeModel, Point};
use pretty_assertions::assert_eq;
use serde_json::json;

fn single(text: impl Into<node_model::node::LabelInput>) -> NodeModel {
    NodeModel::new(
        NodeData::new("rect", 100.0, 100.0).with_id("n").with_text(text),
        GraphContext::new().shared(),
    )
}

fn multiple(max: Option<usize>, entries: Vec<LabelEntry>) -> NodeModel {
    let config = serde_json::to_value(LabelConfig::multiple(max)).unwrap();
    NodeModel::new(
        NodeData::new("rect", 100.0, 100.0)
            .with_id("n")
            .with_property("labelConfig", config)
            .with_text(entries),
        GraphContext::new().shared(),
    )
}

fn values(node: &NodeModel) -> Vec<String> {
    node.labels().iter().map(|label| label.value.clone()).collect()
}

#[test]
fn single_mode_accepts_every_input_shape() {
    let from_string = single("hi");
    let from_record = single(LabelRecord::text("hi"));
    let from_list = single(vec![LabelEntry::Text("hi".into())]);

    for node in [&from_string, &from_record, &from_list] {
        let LabelSet::Single(label) = node.labels() else {
            panic!("expected a single label");
        };
        assert_eq!(label.value, "hi");
        assert_eq!(label.content, "hi");
        assert_eq!(label.relate_id, "n");
        assert_eq!((label.x, label.y), (100.0, 100.0));
    }
}

#[test]
fn multiple_mode_trims_to_max() {
    let node = multiple(
        Some(2),
        vec![
            LabelEntry::Text("a".into()),
            LabelEntry::Text("b".into()),
            LabelEntry::Text("c".into()),
        ],
    );
    assert_eq!(values(&node), vec!["a", "b"]);
}

#[test]
fn add_label_respects_max() {
    let mut node = multiple(Some(2), Vec::new());
    let first = node.add_label(Point::new(0.0, 0.0));
    let second = node.add_label(Point::new(0.0, 20.0));
    let third = node.add_label(Point::new(0.0, 40.0));

    assert!(first.is_some());
    assert!(second.is_some());
    assert_eq!(third, None);
    assert_eq!(node.labels().len(), 2);

    let focused: Vec<bool> = node.labels().iter().map(|label| label.focused).collect();
    assert_eq!(focused, vec![false, true]);
}

#[test]
fn add_label_in_single_mode_focuses_existing() {
    let mut node = single("hi");
    let id = node.add_label(Point::new(0.0, 0.0)).unwrap();
    assert_eq!(node.labels().len(), 1);
    assert!(node.labels().get(&id).unwrap().focused);
}

#[test]
fn delete_by_index_zero() {
    let mut node = multiple(
        None,
        vec![LabelEntry::Text("a".into()), LabelEntry::Text("b".into())],
    );
    assert!(node.delete_label(LabelSelector::by_index(0)));
    assert_eq!(values(&node), vec!["b"]);
}

#[test]
fn delete_by_id_and_unknown_id() {
    let mut node = multiple(
        None,
        vec![LabelEntry::Text("a".into()), LabelEntry::Text("b".into())],
    );
    let id = node.labels().iter().nth(1).unwrap().id.clone();
    assert!(node.delete_label(LabelSelector::by_id(id)));
    assert!(!node.delete_label(LabelSelector::by_id("missing")));
    assert_eq!(values(&node), vec!["a"]);
}

#[test]
fn delete_in_single_mode_clears_text() {
    let mut node = single("hi");
    assert!(node.delete_label(LabelSelector::default()));
    assert_eq!(node.labels().len(), 1);
    assert_eq!(values(&node), vec![""]);
    assert!(node.snapshot().text.is_none());
}

#[test]
fn update_label_by_id() {
    let mut node = single("hi");
    let id = node.labels().iter().next().unwrap().id.clone();

    assert!(node.update_label("bye", &id));
    assert_eq!(values(&node), vec!["bye"]);

    let patch = LabelPatch {
        x: Some(5.0),
        ..LabelPatch::default()
    };
    assert!(node.update_label(patch, &id));
    assert_eq!(node.labels().get(&id).unwrap().x, 5.0);

    assert!(!node.update_label("ignored", "missing"));
}

#[test]
fn labels_follow_node_moves() {
    let mut node = multiple(
        None,
        vec![LabelEntry::Text("a".into()), LabelEntry::Text("b".into())],
    );
    let before: Vec<(f64, f64)> = node.labels().iter().map(|l| (l.x, l.y)).collect();
    node.move_by(10.0, -4.0, false);
    node.move_to(0.0, 0.0, false);
    let after: Vec<(f64, f64)> = node.labels().iter().map(|l| (l.x, l.y)).collect();

    let expected: Vec<(f64, f64)> = before.iter().map(|(x, y)| (x - 100.0, y - 100.0)).collect();
    assert_eq!(after, expected);
}

#[test]
fn switching_label_config_reshapes() {
    let mut node = single("hi");
    node.set_property("labelConfig", json!({"multiple": true, "max": 3}));
    assert!(node.labels().is_multiple());
    assert_eq!(values(&node), vec!["hi"]);

    node.set_property("labelConfig", json!({"multiple": false}));
    assert!(!node.labels().is_multiple());
    assert_eq!(values(&node), vec!["hi"]);
}

#[test]
fn structural_label_events() {
    let ctx = GraphContext::new().shared();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for event in [LABEL_ADD, LABEL_DELETE] {
        let sink = Rc::clone(&seen);
        ctx.on(event, move |payload| {
            sink.borrow_mut().push((event, payload["nodeId"].clone()))
        });
    }

    let config = serde_json::to_value(LabelConfig::multiple(None)).unwrap();
    let mut node = NodeModel::new(
        NodeData::new("rect", 0.0, 0.0)
            .with_id("n")
            .with_property("labelConfig", config),
        ctx,
    );
    node.add_label(Point::new(0.0, 0.0));
    node.delete_label(LabelSelector::by_index(0));

    assert_eq!(
        *seen.borrow(),
        vec![(LABEL_ADD, json!("n")), (LABEL_DELETE, json!("n"))]
    );
}

#[test]
fn malformed_text_falls_back_to_empty_label() {
    let data =
        NodeData::from_json_str(r#"{"id": "a", "type": "rect", "x": 1, "y": 2, "text": 123}"#)
            .unwrap();
    let node = NodeModel::new(data, GraphContext::new().shared());
    assert_eq!(values(&node), vec![""]);
    assert!(node.snapshot().text.is_none());
}

#[test]
fn malformed_list_entries_are_skipped() {
    let data = NodeData::from_json_str(
        r#"{
            "id": "a",
            "properties": {"labelConfig": {"multiple": true}},
            "text": ["a", 7, {"value": "b"}, null]
        }"#,
    )
    .unwrap();
    let node = NodeModel::new(data, GraphContext::new().shared());
    assert_eq!(values(&node), vec!["a", "b"]);
}

#[test]
fn equivalent_label_config_is_normalized() {
    let mut node = single("hi");
    node.set_property("labelConfig", json!({"multiple": false}));
    assert_eq!(
        node.properties()["labelConfig"],
        json!({"multiple": false, "verticalText": false})
    );
    assert_eq!(values(&node), vec!["hi"]);
}
