//! The node model: one shape on the canvas
//!
//! Geometry, UI state, labels and rule lists live here. Behavior is split by
//! concern across sibling modules (`anchor`, `movement`, `label`, `rules`,
//! `properties`), each adding its own `impl NodeModel` block.

use std::cell::OnceCell;
use std::rc::Rc;

use crate::geometry::{Bounds, Point, RotationTransform, TransformDescriptor};
use crate::graph::{GraphContext, OverlapMode};
use crate::node::data::{AnchorOffset, NodeData, NodeSnapshot, Properties, StyleMap};
use crate::node::label::{normalize_labels, LabelConfig, LabelSet};
use crate::node::rules::{ConnectRule, MoveRule};
use crate::node::shape::{NodeShape, RectShape};

/// Advisory size limits; exposed to callers but not enforced by `resize`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min_width: 30.0,
            max_width: 2000.0,
            min_height: 30.0,
            max_height: 2000.0,
        }
    }
}

impl SizeBounds {
    pub fn clamp(&self, width: f64, height: f64) -> (f64, f64) {
        (
            width.clamp(self.min_width, self.max_width),
            height.clamp(self.min_height, self.max_height),
        )
    }
}

/// Interaction flags read by painters and the owning editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeState {
    pub selected: bool,
    pub hovered: bool,
    pub dragging: bool,
    pub draggable: bool,
    pub visible: bool,
    pub hittable: bool,
    pub enable_rotate: bool,
    pub enable_resize: bool,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            selected: false,
            hovered: false,
            dragging: false,
            draggable: true,
            visible: true,
            hittable: true,
            enable_rotate: true,
            enable_resize: true,
        }
    }
}

#[derive(Debug)]
pub struct NodeModel {
    pub(super) id: String,
    pub(super) kind: String,
    pub(super) shape: Rc<dyn NodeShape>,
    pub(super) ctx: Rc<GraphContext>,

    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) width: f64,
    pub(super) height: f64,
    pub(super) size_bounds: SizeBounds,
    /// Degrees, clockwise positive
    pub(super) rotate: f64,
    pub(super) transform: TransformDescriptor,

    pub(super) properties: Rc<Properties>,
    pub(super) style: StyleMap,
    pub(super) anchors_offset: Option<Vec<AnchorOffset>>,

    pub(super) label_config: LabelConfig,
    pub(super) labels: LabelSet,

    pub(super) state: NodeState,
    pub(super) z_index: i64,

    pub(super) source_rules: Vec<ConnectRule>,
    pub(super) target_rules: Vec<ConnectRule>,
    pub(super) resolved_source_rules: OnceCell<Vec<ConnectRule>>,
    pub(super) resolved_target_rules: OnceCell<Vec<ConnectRule>>,
    pub(super) move_rules: Vec<MoveRule>,
}

impl NodeModel {
    /// Build a node from an input record.
    ///
    /// Never fails: an unknown type falls back to a rectangle and malformed
    /// label configuration falls back to the context default.
    pub fn new(data: NodeData, ctx: Rc<GraphContext>) -> Self {
        let shape: Rc<dyn NodeShape> = match ctx.shapes().get(&data.kind) {
            Some(shape) => shape,
            None => {
                tracing::warn!(kind = %data.kind, "unknown node type, using rect");
                Rc::new(RectShape)
            }
        };
        Self::with_shape(data, ctx, shape)
    }

    /// Build a node bound to an explicit shape, bypassing the registry
    pub fn with_shape(data: NodeData, ctx: Rc<GraphContext>, shape: Rc<dyn NodeShape>) -> Self {
        let id = data.id.unwrap_or_else(|| ctx.create_id());
        let (default_width, default_height) = shape.default_size(ctx.config());

        let label_config = data
            .properties
            .get("labelConfig")
            .and_then(|value| match serde_json::from_value(value.clone()) {
                Ok(config) => Some(config),
                Err(err) => {
                    tracing::warn!(node = %id, error = %err, "invalid labelConfig, using default");
                    None
                }
            })
            .unwrap_or(ctx.config().default_label_config);

        let z_index = data.z_index.unwrap_or_else(|| ctx.initial_z_index());

        let mut node = Self {
            id,
            kind: data.kind,
            shape,
            x: data.x,
            y: data.y,
            width: data.width.unwrap_or(default_width),
            height: data.height.unwrap_or(default_height),
            size_bounds: SizeBounds::default(),
            rotate: data.rotate,
            transform: TransformDescriptor::default(),
            properties: Rc::new(data.properties),
            style: data.style,
            anchors_offset: data.anchors_offset,
            label_config,
            labels: LabelSet::Multiple(Vec::new()),
            state: NodeState::default(),
            z_index,
            source_rules: Vec::new(),
            target_rules: Vec::new(),
            resolved_source_rules: OnceCell::new(),
            resolved_target_rules: OnceCell::new(),
            move_rules: Vec::new(),
            ctx,
        };

        node.write_label_config();
        node.set_attributes();
        let placement = node.label_placement();
        node.labels = normalize_labels(
            data.text,
            &node.label_config,
            &node.id,
            placement,
            &node.ctx,
        );
        node.refresh_transform();
        node
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Shape kind (the `type` field)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn shape(&self) -> &Rc<dyn NodeShape> {
        &self.shape
    }

    pub fn context(&self) -> &Rc<GraphContext> {
        &self.ctx
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set width and height directly; size bounds are not applied
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn size_bounds(&self) -> SizeBounds {
        self.size_bounds
    }

    pub fn set_size_bounds(&mut self, bounds: SizeBounds) {
        self.size_bounds = bounds;
    }

    /// Clamp a proposed size to this node's advisory bounds
    pub fn clamp_size(&self, width: f64, height: f64) -> (f64, f64) {
        self.size_bounds.clamp(width, height)
    }

    /// Rotation in degrees, clockwise positive
    pub fn rotate(&self) -> f64 {
        self.rotate
    }

    pub fn set_rotate(&mut self, degrees: f64) {
        self.rotate = degrees;
        self.refresh_transform();
    }

    pub fn transform(&self) -> &TransformDescriptor {
        &self.transform
    }

    pub(super) fn refresh_transform(&mut self) {
        self.transform = TransformDescriptor::rotate_about(self.center(), self.rotate);
    }

    pub fn rotation(&self) -> RotationTransform {
        RotationTransform::new(self.rotate, self.center())
    }

    /// Axis-aligned bounds in the unrotated frame
    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.center(), self.width, self.height)
    }

    /// Whether `point` falls inside the shape, honoring rotation and hittability
    pub fn is_hit(&self, point: Point) -> bool {
        if !self.state.hittable || !self.state.visible {
            return false;
        }
        let local = self.rotation().inverse().transform_point(point);
        self.shape.contains(self, local)
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.state.selected = selected;
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.state.hovered = hovered;
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.state.dragging = dragging;
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.state.draggable = draggable;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.state.visible = visible;
    }

    pub fn set_hittable(&mut self, hittable: bool) {
        self.state.hittable = hittable;
    }

    pub fn set_enable_rotate(&mut self, enabled: bool) {
        self.state.enable_rotate = enabled;
    }

    pub fn set_enable_resize(&mut self, enabled: bool) {
        self.state.enable_resize = enabled;
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    /// Serializable projection used by persistence and history.
    ///
    /// `rotate` appears only when non-zero and `zIndex` only under
    /// [`OverlapMode::Increase`].
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id.clone(),
            kind: self.kind.clone(),
            x: self.x,
            y: self.y,
            properties: (*self.properties).clone(),
            rotate: (self.rotate != 0.0).then_some(self.rotate),
            z_index: (self.ctx.overlap_mode() == OverlapMode::Increase).then_some(self.z_index),
            text: self.labels.to_snapshot(),
        }
    }
}
