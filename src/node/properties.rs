//! Property and style mutation
//!
//! Property updates never mutate the current map in place: a new map is
//! built and swapped in, so observers holding the previous `Rc` can detect
//! the change by pointer identity.

use std::rc::Rc;

use serde_json::{json, Value};

use crate::graph::events::NODE_PROPERTIES_CHANGE;
use crate::node::data::{Properties, StyleMap};
use crate::node::model::NodeModel;

const LABEL_CONFIG_KEY: &str = "labelConfig";

impl NodeModel {
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Shared handle to the current property map
    pub fn properties_handle(&self) -> Rc<Properties> {
        Rc::clone(&self.properties)
    }

    /// Set one property; returns the changed keys (empty if the value was equal)
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Vec<String> {
        let mut update = Properties::new();
        update.insert(key.into(), value.into());
        self.set_properties(update)
    }

    /// Merge `updates` into a fresh property map, run the shape's property
    /// hook and emit `node:properties-change` with the keys whose value
    /// changed or that are new.
    pub fn set_properties(&mut self, updates: Properties) -> Vec<String> {
        let previous = Rc::clone(&self.properties);
        let changed: Vec<String> = updates
            .iter()
            .filter(|(key, value)| previous.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();

        let mut next = (*previous).clone();
        next.extend(updates);
        self.properties = Rc::new(next);

        if changed.iter().any(|key| key == LABEL_CONFIG_KEY) {
            self.sync_label_config();
        }
        self.set_attributes();

        self.ctx.emit(
            NODE_PROPERTIES_CHANGE,
            json!({
                "id": self.id,
                "keys": changed,
                "preProperties": *previous,
                "properties": *self.properties,
            }),
        );
        changed
    }

    /// Remove a property and rerun the shape's property hook. No change
    /// event is emitted.
    ///
    /// `labelConfig` cannot be removed. Returns whether a key was removed.
    pub fn delete_property(&mut self, key: &str) -> bool {
        if key == LABEL_CONFIG_KEY {
            tracing::warn!(node = %self.id, "labelConfig cannot be deleted");
            return false;
        }
        if !self.properties.contains_key(key) {
            return false;
        }
        let mut next = (*self.properties).clone();
        next.remove(key);
        self.properties = Rc::new(next);
        self.set_attributes();
        true
    }

    /// Run the shape's post-mutation hook (property-derived geometry)
    pub fn set_attributes(&mut self) {
        let shape = Rc::clone(&self.shape);
        shape.apply_properties(self);
    }

    pub(super) fn write_label_config(&mut self) {
        let value = serde_json::to_value(self.label_config).unwrap_or(Value::Null);
        if self.properties.get(LABEL_CONFIG_KEY) == Some(&value) {
            return;
        }
        let mut next = (*self.properties).clone();
        next.insert(LABEL_CONFIG_KEY.to_string(), value);
        self.properties = Rc::new(next);
    }

    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    /// Theme style for this node's kind overlaid with its own overrides
    pub fn node_style(&self) -> StyleMap {
        let mut style = self.ctx.theme().style_for(&self.kind);
        for (key, value) in &self.style {
            style.insert(key.clone(), value.clone());
        }
        style
    }

    /// Set one style key, keeping the others
    pub fn set_style(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.style.insert(key.into(), value.into());
    }

    /// Merge several style keys, keeping the others
    pub fn set_styles(&mut self, styles: StyleMap) {
        self.style.extend(styles);
    }

    /// Replace the whole style map
    pub fn update_styles(&mut self, styles: StyleMap) {
        self.style = styles;
    }
}
