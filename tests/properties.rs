//! Integration tests for property and style mutation.

use std::cell::RefCell;
use std::rc::Rc;

use node_model::graph::events::NODE_PROPERTIES_CHANGE;
use node_model::node::Properties;
use node_model::{GraphContext, NodeData, NodeModel, Theme};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn props(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

#[test]
fn set_property_reports_new_key() {
    let mut node = NodeModel::new(NodeData::new("rect", 0.0, 0.0), GraphContext::new().shared());
    assert_eq!(node.set_property("color", "red"), vec!["color"]);
}

#[test]
fn repeated_set_properties_is_idempotent() {
    let ctx = GraphContext::new().shared();
    let keys = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&keys);
    ctx.on(NODE_PROPERTIES_CHANGE, move |payload| {
        sink.borrow_mut().push(payload["keys"].clone())
    });

    let mut node = NodeModel::new(NodeData::new("rect", 0.0, 0.0), ctx);
    let update = props(json!({"color": "red", "meta": {"tags": ["a", "b"]}}));
    node.set_properties(update.clone());
    let before = node.properties().clone();
    let changed = node.set_properties(update);

    assert!(changed.is_empty());
    assert_eq!(node.properties(), &before);
    assert_eq!(*keys.borrow(), vec![json!(["color", "meta"]), json!([])]);
}

#[test]
fn observers_see_a_new_map() {
    let mut node = NodeModel::new(NodeData::new("rect", 0.0, 0.0), GraphContext::new().shared());
    let held = node.properties_handle();
    node.set_property("a", 1);
    assert!(!Rc::ptr_eq(&held, &node.properties_handle()));
    assert_eq!(held.get("a"), None);
}

#[test]
fn listener_runs_before_mutation_returns() {
    let ctx = GraphContext::new().shared();
    let observed = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&observed);
    ctx.on(NODE_PROPERTIES_CHANGE, move |payload| {
        *sink.borrow_mut() = Some(payload["properties"]["size"].clone());
    });

    let mut node = NodeModel::new(NodeData::new("rect", 0.0, 0.0), ctx);
    node.set_property("size", 3);
    assert_eq!(*observed.borrow(), Some(json!(3)));
}

#[test]
fn ellipse_geometry_follows_properties() {
    let mut node = NodeModel::new(NodeData::new("ellipse", 0.0, 0.0), GraphContext::new().shared());
    node.set_properties(props(json!({"rx": 10, "ry": 4})));
    assert_eq!((node.width(), node.height()), (20.0, 8.0));
}

#[test]
fn node_style_layers_theme_and_overrides() {
    let theme = Theme::from_str(
        r##"
[metadata]
name = "dark"

[base]
fill = "#111111"
stroke = "#eeeeee"

[circle]
stroke = "#ff0000"
"##,
    )
    .unwrap();
    let ctx = GraphContext::new().with_theme(theme).shared();
    let mut node = NodeModel::new(NodeData::new("circle", 0.0, 0.0), ctx);
    node.set_style("fill", "#00ff00");

    assert_eq!(node.context().theme().name.as_deref(), Some("dark"));
    let style = node.node_style();
    assert_eq!(style["fill"], json!("#00ff00"));
    assert_eq!(style["stroke"], json!("#ff0000"));
}
