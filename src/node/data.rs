//! Serialized forms of a node: the input record and the data snapshot
//!
//! Both use camelCase keys so a snapshot can be fed back as input, which is
//! how history and persistence collaborators restore nodes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NodeDataError;

/// Free-form node properties (always carries `labelConfig` once on a node)
pub type Properties = Map<String, Value>;

/// Style overrides for a node
pub type StyleMap = Map<String, Value>;

fn default_kind() -> String {
    "rect".to_string()
}

/// Input record used to construct a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Rotation in degrees, clockwise positive
    #[serde(default)]
    pub rotate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<LabelInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchors_offset: Option<Vec<AnchorOffset>>,
}

impl Default for NodeData {
    fn default() -> Self {
        Self {
            id: None,
            kind: default_kind(),
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            rotate: 0.0,
            z_index: None,
            properties: Properties::new(),
            style: StyleMap::new(),
            text: None,
            anchors_offset: None,
        }
    }
}

impl NodeData {
    pub fn new(kind: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn with_text(mut self, text: impl Into<LabelInput>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_anchors_offset(mut self, offsets: Vec<AnchorOffset>) -> Self {
        self.anchors_offset = Some(offsets);
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self, NodeDataError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, NodeDataError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a record from a `.json` or `.toml` file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NodeDataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(NodeDataError::unsupported(path)),
        }
    }
}

/// A label record as supplied by callers; missing fields take defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
}

impl LabelRecord {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

/// One entry of a label list: a bare string or a full record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelEntry {
    Text(String),
    Record(LabelRecord),
    /// Anything else; dropped when labels are built
    Invalid(Value),
}

impl LabelEntry {
    /// The entry as a record, or `None` for an invalid entry
    pub fn into_record(self) -> Option<LabelRecord> {
        match self {
            LabelEntry::Text(value) => Some(LabelRecord::text(value)),
            LabelEntry::Record(record) => Some(record),
            LabelEntry::Invalid(_) => None,
        }
    }
}

/// The accepted input shapes for a node's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelInput {
    Text(String),
    // before Record: derived structs also accept sequences
    List(Vec<LabelEntry>),
    Record(LabelRecord),
    /// Any other value; the node falls back to its empty default labels
    Invalid(Value),
}

impl From<&str> for LabelInput {
    fn from(value: &str) -> Self {
        LabelInput::Text(value.to_string())
    }
}

impl From<String> for LabelInput {
    fn from(value: String) -> Self {
        LabelInput::Text(value)
    }
}

impl From<LabelRecord> for LabelInput {
    fn from(record: LabelRecord) -> Self {
        LabelInput::Record(record)
    }
}

impl From<Vec<LabelEntry>> for LabelInput {
    fn from(entries: Vec<LabelEntry>) -> Self {
        LabelInput::List(entries)
    }
}

/// An explicit anchor offset relative to the node center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnchorOffset {
    /// Legacy `[dx, dy]` form
    Pair([f64; 2]),
    Record {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        x: f64,
        y: f64,
    },
}

impl AnchorOffset {
    pub fn offset(&self) -> (f64, f64) {
        match self {
            AnchorOffset::Pair([dx, dy]) => (*dx, *dy),
            AnchorOffset::Record { x, y, .. } => (*x, *y),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            AnchorOffset::Pair(_) => None,
            AnchorOffset::Record { id, .. } => id.as_deref(),
        }
    }
}

/// Position and text of one label in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSnapshot {
    pub x: f64,
    pub y: f64,
    pub value: String,
    pub content: String,
}

/// Text field of a snapshot, shaped like the node's label configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotText {
    Multiple(Vec<TextSnapshot>),
    Single(TextSnapshot),
}

/// Serializable projection of a node used for persistence and history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<SnapshotText>,
}

impl NodeSnapshot {
    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<NodeSnapshot> for NodeData {
    fn from(snapshot: NodeSnapshot) -> Self {
        let text = snapshot.text.map(|text| match text {
            SnapshotText::Single(t) => LabelInput::Record(t.into()),
            SnapshotText::Multiple(list) => LabelInput::List(
                list.into_iter()
                    .map(|t| LabelEntry::Record(t.into()))
                    .collect(),
            ),
        });
        NodeData {
            id: Some(snapshot.id),
            kind: snapshot.kind,
            x: snapshot.x,
            y: snapshot.y,
            rotate: snapshot.rotate.unwrap_or(0.0),
            z_index: snapshot.z_index,
            properties: snapshot.properties,
            text,
            ..NodeData::default()
        }
    }
}

impl From<TextSnapshot> for LabelRecord {
    fn from(t: TextSnapshot) -> Self {
        LabelRecord {
            value: t.value,
            content: Some(t.content),
            x: Some(t.x),
            y: Some(t.y),
            ..LabelRecord::default()
        }
    }
}
