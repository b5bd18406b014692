//! Text labels bound to a node
//!
//! A node carries either exactly one label record or a list of them,
//! depending on its [`LabelConfig`]. The two shapes never mix: input of any
//! shape is normalized into the configured one at construction, and a
//! configuration change reshapes the existing labels in place.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::geometry::Point;
use crate::graph::events::{LABEL_ADD, LABEL_DELETE, LABEL_UPDATE};
use crate::graph::GraphContext;
use crate::node::data::{LabelEntry, LabelInput, LabelRecord, SnapshotText, TextSnapshot};
use crate::node::model::NodeModel;

/// Policy controlling how many labels a node carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelConfig {
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    #[serde(default)]
    pub vertical_text: bool,
}

impl LabelConfig {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn multiple(max: Option<usize>) -> Self {
        Self {
            multiple: true,
            max,
            vertical_text: false,
        }
    }

    fn at_capacity(&self, count: usize) -> bool {
        self.max.is_some_and(|max| count >= max)
    }
}

/// A positioned text record owned by a node
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub id: String,
    /// Id of the owning node
    pub relate_id: String,
    pub value: String,
    /// Rendered content; may differ from `value` (e.g. rich formatting)
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub draggable: bool,
    pub editable: bool,
    pub focused: bool,
}

impl TextLabel {
    fn to_snapshot(&self) -> TextSnapshot {
        TextSnapshot {
            x: self.x,
            y: self.y,
            value: self.value.clone(),
            content: self.content.clone(),
        }
    }

    fn shift(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    fn apply(&mut self, update: &LabelUpdate) {
        match update {
            LabelUpdate::Text(text) => {
                self.value = text.clone();
                self.content = text.clone();
            }
            LabelUpdate::Patch(patch) => {
                if let Some(value) = &patch.value {
                    self.value = value.clone();
                }
                if let Some(content) = &patch.content {
                    self.content = content.clone();
                }
                if let Some(x) = patch.x {
                    self.x = x;
                }
                if let Some(y) = patch.y {
                    self.y = y;
                }
                if let Some(draggable) = patch.draggable {
                    self.draggable = draggable;
                }
                if let Some(editable) = patch.editable {
                    self.editable = editable;
                }
                if let Some(focused) = patch.focused {
                    self.focused = focused;
                }
            }
        }
    }
}

/// The node's labels, shaped by its label configuration
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSet {
    Single(TextLabel),
    Multiple(Vec<TextLabel>),
}

impl LabelSet {
    pub fn len(&self) -> usize {
        match self {
            LabelSet::Single(_) => 1,
            LabelSet::Multiple(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, LabelSet::Multiple(_))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextLabel> {
        match self {
            LabelSet::Single(label) => std::slice::from_ref(label).iter(),
            LabelSet::Multiple(list) => list.iter(),
        }
    }

    fn iter_mut(&mut self) -> std::slice::IterMut<'_, TextLabel> {
        match self {
            LabelSet::Single(label) => std::slice::from_mut(label).iter_mut(),
            LabelSet::Multiple(list) => list.iter_mut(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&TextLabel> {
        self.iter().find(|label| label.id == id)
    }

    /// Snapshot form; an empty single label or empty list is omitted
    pub fn to_snapshot(&self) -> Option<SnapshotText> {
        match self {
            LabelSet::Single(label) if label.value.is_empty() => None,
            LabelSet::Single(label) => Some(SnapshotText::Single(label.to_snapshot())),
            LabelSet::Multiple(list) if list.is_empty() => None,
            LabelSet::Multiple(list) => Some(SnapshotText::Multiple(
                list.iter().map(TextLabel::to_snapshot).collect(),
            )),
        }
    }
}

/// A change applied by `update_label`
#[derive(Debug, Clone, PartialEq)]
pub enum LabelUpdate {
    /// Shorthand that sets both value and content
    Text(String),
    Patch(LabelPatch),
}

impl From<&str> for LabelUpdate {
    fn from(text: &str) -> Self {
        LabelUpdate::Text(text.to_string())
    }
}

impl From<String> for LabelUpdate {
    fn from(text: String) -> Self {
        LabelUpdate::Text(text)
    }
}

impl From<LabelPatch> for LabelUpdate {
    fn from(patch: LabelPatch) -> Self {
        LabelUpdate::Patch(patch)
    }
}

/// Partial label fields; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelPatch {
    pub value: Option<String>,
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub draggable: Option<bool>,
    pub editable: Option<bool>,
    pub focused: Option<bool>,
}

/// Which label `delete_label` targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    pub index: Option<usize>,
    pub id: Option<String>,
}

impl LabelSelector {
    pub fn by_index(index: usize) -> Self {
        Self {
            index: Some(index),
            id: None,
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            index: None,
            id: Some(id.into()),
        }
    }
}

/// Where labels without explicit coordinates are placed
#[derive(Debug, Clone, Copy)]
pub(super) struct LabelPlacement {
    pub center: Point,
    pub height: f64,
    pub inset: f64,
    pub stagger: f64,
}

impl LabelPlacement {
    /// A single label sits on the node center; stacked labels start `inset`
    /// below the top edge and step down by `stagger`.
    fn default_position(&self, index: usize, multiple: bool) -> Point {
        if !multiple {
            return self.center;
        }
        Point::new(
            self.center.x,
            self.center.y - self.height / 2.0 + self.inset + index as f64 * self.stagger,
        )
    }
}

fn build_label(
    record: LabelRecord,
    owner: &str,
    position: Point,
    ctx: &GraphContext,
) -> TextLabel {
    let content = record.content.unwrap_or_else(|| record.value.clone());
    TextLabel {
        id: record.id.unwrap_or_else(|| ctx.create_id()),
        relate_id: owner.to_string(),
        value: record.value,
        content,
        x: record.x.unwrap_or(position.x),
        y: record.y.unwrap_or(position.y),
        draggable: record.draggable.unwrap_or(false),
        editable: record.editable.unwrap_or(true),
        focused: false,
    }
}

/// Normalize any accepted text input into the configured label shape
pub(super) fn normalize_labels(
    input: Option<LabelInput>,
    config: &LabelConfig,
    owner: &str,
    placement: LabelPlacement,
    ctx: &GraphContext,
) -> LabelSet {
    let mut records: Vec<LabelRecord> = match input {
        None => Vec::new(),
        Some(LabelInput::Text(text)) => vec![LabelRecord::text(text)],
        Some(LabelInput::Record(record)) => vec![record],
        Some(LabelInput::List(entries)) => {
            let total = entries.len();
            let records: Vec<LabelRecord> =
                entries.into_iter().filter_map(LabelEntry::into_record).collect();
            if records.len() < total {
                tracing::warn!(
                    node = owner,
                    dropped = total - records.len(),
                    "malformed label entries ignored"
                );
            }
            records
        }
        Some(LabelInput::Invalid(value)) => {
            tracing::warn!(node = owner, text = %value, "malformed text ignored, using empty label");
            Vec::new()
        }
    };

    if config.multiple {
        if let Some(max) = config.max {
            if records.len() > max {
                tracing::warn!(
                    node = owner,
                    supplied = records.len(),
                    max,
                    "label count exceeds labelConfig.max, extra labels dropped"
                );
                records.truncate(max);
            }
        }
        let labels = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| build_label(record, owner, placement.default_position(i, true), ctx))
            .collect();
        LabelSet::Multiple(labels)
    } else {
        if records.len() > 1 {
            tracing::warn!(
                node = owner,
                supplied = records.len(),
                "single-label node given several labels, keeping the first"
            );
        }
        let record = records.into_iter().next().unwrap_or_default();
        LabelSet::Single(build_label(
            record,
            owner,
            placement.default_position(0, false),
            ctx,
        ))
    }
}

/// Convert an existing label set to a new configuration
pub(super) fn reshape_labels(
    labels: LabelSet,
    config: &LabelConfig,
    owner: &str,
    placement: LabelPlacement,
    ctx: &GraphContext,
) -> LabelSet {
    match (labels, config.multiple) {
        (LabelSet::Single(label), true) => {
            if config.max == Some(0) {
                tracing::warn!(node = owner, "labelConfig.max is 0, existing label dropped");
                LabelSet::Multiple(Vec::new())
            } else {
                LabelSet::Multiple(vec![label])
            }
        }
        (LabelSet::Multiple(mut list), true) => {
            if let Some(max) = config.max {
                if list.len() > max {
                    tracing::warn!(
                        node = owner,
                        count = list.len(),
                        max,
                        "labelConfig.max lowered, extra labels dropped"
                    );
                    list.truncate(max);
                }
            }
            LabelSet::Multiple(list)
        }
        (LabelSet::Multiple(list), false) => {
            if list.len() > 1 {
                tracing::warn!(
                    node = owner,
                    count = list.len(),
                    "switched to single label, keeping the first"
                );
            }
            match list.into_iter().next() {
                Some(label) => LabelSet::Single(label),
                None => LabelSet::Single(build_label(
                    LabelRecord::default(),
                    owner,
                    placement.default_position(0, false),
                    ctx,
                )),
            }
        }
        (single @ LabelSet::Single(_), false) => single,
    }
}

impl NodeModel {
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn label_config(&self) -> &LabelConfig {
        &self.label_config
    }

    /// Start editing a label at `position`.
    ///
    /// With multiple labels a new empty, focused record is appended unless
    /// `max` is reached. With a single label no record is created; the
    /// existing one is focused instead. Returns the id of the focused label.
    pub fn add_label(&mut self, position: Point) -> Option<String> {
        let config = self.label_config;
        let owner = self.id.clone();
        let new_id = match &mut self.labels {
            LabelSet::Single(label) => {
                label.focused = true;
                return Some(label.id.clone());
            }
            LabelSet::Multiple(list) => {
                if config.at_capacity(list.len()) {
                    tracing::warn!(node = %owner, max = ?config.max, "label limit reached");
                    return None;
                }
                for label in list.iter_mut() {
                    label.focused = false;
                }
                let mut label = build_label(LabelRecord::default(), &owner, position, &self.ctx);
                label.focused = true;
                let id = label.id.clone();
                list.push(label);
                id
            }
        };
        self.ctx
            .emit(LABEL_ADD, json!({ "nodeId": owner, "labelId": new_id }));
        Some(new_id)
    }

    /// Merge `update` into the label with `id`; returns false if none matched
    pub fn update_label(&mut self, update: impl Into<LabelUpdate>, id: &str) -> bool {
        let update = update.into();
        let Some(label) = self.labels.iter_mut().find(|label| label.id == id) else {
            return false;
        };
        label.apply(&update);
        self.ctx
            .emit(LABEL_UPDATE, json!({ "nodeId": self.id, "labelId": id }));
        true
    }

    /// Remove a label (multiple mode) or clear its text (single mode).
    ///
    /// In multiple mode a supplied index wins over an id. Index 0 is a valid
    /// index. Returns false when nothing matched.
    pub fn delete_label(&mut self, selector: LabelSelector) -> bool {
        let removed_id = match &mut self.labels {
            LabelSet::Multiple(list) => match (selector.index, selector.id.as_deref()) {
                (Some(index), _) if index < list.len() => list.remove(index).id,
                (Some(_), _) => return false,
                (None, Some(id)) => match list.iter().position(|label| label.id == id) {
                    Some(pos) => list.remove(pos).id,
                    None => return false,
                },
                (None, None) => return false,
            },
            LabelSet::Single(label) => {
                let id_matches = selector.id.as_deref().map_or(true, |id| id == label.id);
                let index_matches = selector.index.map_or(true, |index| index == 0);
                if !(id_matches && index_matches) {
                    return false;
                }
                label.value.clear();
                label.content.clear();
                label.id.clone()
            }
        };
        self.ctx
            .emit(LABEL_DELETE, json!({ "nodeId": self.id, "labelId": removed_id }));
        true
    }

    /// Shift every label by the node's displacement
    pub fn on_node_moved(&mut self, dx: f64, dy: f64) {
        for label in self.labels.iter_mut() {
            label.shift(dx, dy);
        }
    }

    pub(super) fn label_placement(&self) -> LabelPlacement {
        let config = self.ctx.config();
        LabelPlacement {
            center: Point::new(self.x, self.y),
            height: self.height,
            inset: config.label_inset,
            stagger: config.label_stagger,
        }
    }

    /// Re-read `labelConfig` from the properties and reshape labels to match
    pub(super) fn sync_label_config(&mut self) {
        let parsed = self
            .properties
            .get("labelConfig")
            .map(|value| serde_json::from_value::<LabelConfig>(value.clone()));
        let config = match parsed {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                tracing::warn!(node = %self.id, error = %err, "invalid labelConfig ignored");
                self.write_label_config();
                return;
            }
            None => {
                self.write_label_config();
                return;
            }
        };
        if config != self.label_config {
            let placement = self.label_placement();
            let labels = std::mem::replace(&mut self.labels, LabelSet::Multiple(Vec::new()));
            self.labels = reshape_labels(labels, &config, &self.id, placement, &self.ctx);
            self.label_config = config;
        }
        self.write_label_config();
    }
}
