//! Node Model - the node data model of a diagram editor
//!
//! This library provides nodes with rotation-aware geometry, anchors,
//! connection and move rules, text labels and observable properties.
//!
//! # Example
//!
//! ```rust
//! use node_model::{GraphContext, NodeData, NodeModel};
//!
//! let ctx = GraphContext::new().shared();
//! let mut node = NodeModel::new(NodeData::new("rect", 100.0, 100.0).with_text("hello"), ctx);
//!
//! node.move_by(10.0, 0.0, false);
//! assert_eq!(node.x(), 110.0);
//! assert_eq!(node.labels().iter().next().unwrap().x, 110.0);
//! ```

pub mod error;
pub mod geometry;
pub mod graph;
pub mod node;
pub mod theme;

use std::path::Path;
use std::rc::Rc;

pub use error::{Error, NodeDataError};
pub use geometry::{Anchor, Bounds, Point, RotationTransform, TransformDescriptor};
pub use graph::{GraphContext, OverlapMode};
pub use node::{
    ConnectRule, ConnectRuleResult, LabelConfig, MoveRule, MoveVerdict, NodeConfig, NodeData,
    NodeModel, NodeSnapshot, ResizeInfo,
};
pub use theme::{Theme, ThemeError};

/// Load a node record from a `.json` or `.toml` file and build it in `ctx`
pub fn load_node(path: impl AsRef<Path>, ctx: Rc<GraphContext>) -> Result<NodeModel, Error> {
    let data = NodeData::from_file(path)?;
    Ok(NodeModel::new(data, ctx))
}
