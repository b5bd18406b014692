//! The node data model
//!
//! A [`NodeModel`] is one shape on the canvas. Construction normalizes a
//! [`NodeData`] record; the remaining modules add behavior by concern:
//! anchors, connection and move rules, movement, labels and properties.

pub mod anchor;
pub mod config;
pub mod data;
pub mod label;
pub mod model;
pub mod movement;
pub mod properties;
pub mod rules;
pub mod shape;

pub use config::NodeConfig;
pub use data::{
    AnchorOffset, LabelEntry, LabelInput, LabelRecord, NodeData, NodeSnapshot, Properties,
    SnapshotText, StyleMap, TextSnapshot,
};
pub use label::{LabelConfig, LabelPatch, LabelSelector, LabelSet, LabelUpdate, TextLabel};
pub use model::{NodeModel, NodeState, SizeBounds};
pub use movement::ResizeInfo;
pub use rules::{
    AxisPermission, ConnectAttempt, ConnectRule, ConnectRuleResult, MoveRule, MoveVerdict,
};
pub use shape::{
    CircleShape, DiamondShape, EllipseShape, NodeShape, PolygonShape, RectShape, ShapeRegistry,
    TextShape,
};
