//! Per-shape node behavior
//!
//! Every node is bound at construction to one [`NodeShape`], the capability
//! set that varies by shape kind: default size, default anchors, how
//! properties feed geometry, connection-rule hooks and the hit area. Built-in
//! kinds are registered in [`ShapeRegistry::with_builtins`]; custom kinds are
//! added with [`ShapeRegistry::register`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::geometry::{Anchor, Bounds, Point};
use crate::node::config::NodeConfig;
use crate::node::model::NodeModel;
use crate::node::rules::ConnectRule;

/// Shape-specific behavior of a node
pub trait NodeShape: fmt::Debug {
    /// Shape kind name, as used in the node `type` field
    fn kind(&self) -> &str;

    /// Size used when the input record omits width/height
    fn default_size(&self, config: &NodeConfig) -> (f64, f64);

    /// Anchors in the node's unrotated frame, in absolute coordinates
    fn default_anchors(&self, node: &NodeModel) -> Vec<Anchor>;

    /// Recompute property-derived state after properties change
    fn apply_properties(&self, _node: &mut NodeModel) {}

    /// Write the new size back into properties after a resize
    fn on_resized(&self, _node: &mut NodeModel) {}

    /// Source connection rules; resolved once per node.
    ///
    /// Must not check connections on `node` itself: the chain is being
    /// resolved, and a re-entrant `is_allowed_connected_as_*` call panics.
    fn source_rules(&self, node: &NodeModel) -> Vec<ConnectRule> {
        node.source_rules().to_vec()
    }

    /// Target connection rules; resolved once per node. The same
    /// re-entrancy restriction as [`NodeShape::source_rules`] applies.
    fn target_rules(&self, node: &NodeModel) -> Vec<ConnectRule> {
        node.target_rules().to_vec()
    }

    /// Hit test for a point already mapped into the node's unrotated frame
    fn contains(&self, node: &NodeModel, point: Point) -> bool {
        node.bounds().contains(point)
    }
}

fn number(node: &NodeModel, key: &str) -> Option<f64> {
    node.properties().get(key).and_then(Value::as_f64)
}

/// Top, right, bottom and left points at the given half-extents
fn cardinal_anchors(node: &NodeModel, rx: f64, ry: f64) -> Vec<Anchor> {
    let (x, y) = (node.x(), node.y());
    let id = node.id();
    vec![
        Anchor::new(format!("{}_0", id), x, y - ry),
        Anchor::new(format!("{}_1", id), x + rx, y),
        Anchor::new(format!("{}_2", id), x, y + ry),
        Anchor::new(format!("{}_3", id), x - rx, y),
    ]
}

/// Shared geometry of box shapes: optional `width`/`height` properties
fn apply_box_size(node: &mut NodeModel) {
    let width = number(node, "width").unwrap_or(node.width());
    let height = number(node, "height").unwrap_or(node.height());
    node.set_size(width, height);
}

fn write_box_size(node: &mut NodeModel) {
    let mut size = serde_json::Map::new();
    size.insert("width".to_string(), json!(node.width()));
    size.insert("height".to_string(), json!(node.height()));
    node.set_properties(size);
}

/// Rectangle; a resize records its size in the `width`/`height` properties
#[derive(Debug, Default)]
pub struct RectShape;

impl NodeShape for RectShape {
    fn kind(&self) -> &str {
        "rect"
    }

    fn default_size(&self, config: &NodeConfig) -> (f64, f64) {
        config.default_rect_size
    }

    fn default_anchors(&self, node: &NodeModel) -> Vec<Anchor> {
        cardinal_anchors(node, node.width() / 2.0, node.height() / 2.0)
    }

    fn apply_properties(&self, node: &mut NodeModel) {
        apply_box_size(node);
    }

    fn on_resized(&self, node: &mut NodeModel) {
        write_box_size(node);
    }
}

/// Text-only node; anchors sit on its box like a rectangle
#[derive(Debug, Default)]
pub struct TextShape;

impl NodeShape for TextShape {
    fn kind(&self) -> &str {
        "text"
    }

    fn default_size(&self, config: &NodeConfig) -> (f64, f64) {
        config.default_text_size
    }

    fn default_anchors(&self, node: &NodeModel) -> Vec<Anchor> {
        cardinal_anchors(node, node.width() / 2.0, node.height() / 2.0)
    }

    fn apply_properties(&self, node: &mut NodeModel) {
        apply_box_size(node);
    }

    fn on_resized(&self, node: &mut NodeModel) {
        write_box_size(node);
    }
}

/// Circle sized by the `r` property
#[derive(Debug, Default)]
pub struct CircleShape;

impl NodeShape for CircleShape {
    fn kind(&self) -> &str {
        "circle"
    }

    fn default_size(&self, config: &NodeConfig) -> (f64, f64) {
        let d = config.default_circle_radius * 2.0;
        (d, d)
    }

    fn default_anchors(&self, node: &NodeModel) -> Vec<Anchor> {
        let r = node.width() / 2.0;
        cardinal_anchors(node, r, r)
    }

    fn apply_properties(&self, node: &mut NodeModel) {
        if let Some(r) = number(node, "r") {
            node.set_size(r * 2.0, r * 2.0);
        }
    }

    fn on_resized(&self, node: &mut NodeModel) {
        node.set_property("r", json!(node.width() / 2.0));
    }

    fn contains(&self, node: &NodeModel, point: Point) -> bool {
        Point::new(node.x(), node.y()).distance_to(point) <= node.width() / 2.0
    }
}

/// Shared geometry of shapes described by two half-extents `rx`/`ry`
fn apply_radii(node: &mut NodeModel) {
    let rx = number(node, "rx").unwrap_or(node.width() / 2.0);
    let ry = number(node, "ry").unwrap_or(node.height() / 2.0);
    node.set_size(rx * 2.0, ry * 2.0);
}

fn write_radii(node: &mut NodeModel) {
    let mut radii = serde_json::Map::new();
    radii.insert("rx".to_string(), json!(node.width() / 2.0));
    radii.insert("ry".to_string(), json!(node.height() / 2.0));
    node.set_properties(radii);
}

/// Ellipse sized by the `rx`/`ry` properties
#[derive(Debug, Default)]
pub struct EllipseShape;

impl NodeShape for EllipseShape {
    fn kind(&self) -> &str {
        "ellipse"
    }

    fn default_size(&self, config: &NodeConfig) -> (f64, f64) {
        let (rx, ry) = config.default_ellipse_radii;
        (rx * 2.0, ry * 2.0)
    }

    fn default_anchors(&self, node: &NodeModel) -> Vec<Anchor> {
        cardinal_anchors(node, node.width() / 2.0, node.height() / 2.0)
    }

    fn apply_properties(&self, node: &mut NodeModel) {
        apply_radii(node);
    }

    fn on_resized(&self, node: &mut NodeModel) {
        write_radii(node);
    }

    fn contains(&self, node: &NodeModel, point: Point) -> bool {
        let rx = node.width() / 2.0;
        let ry = node.height() / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let nx = (point.x - node.x()) / rx;
        let ny = (point.y - node.y()) / ry;
        nx * nx + ny * ny <= 1.0
    }
}

/// Diamond sized by the `rx`/`ry` half-diagonals
#[derive(Debug, Default)]
pub struct DiamondShape;

impl NodeShape for DiamondShape {
    fn kind(&self) -> &str {
        "diamond"
    }

    fn default_size(&self, config: &NodeConfig) -> (f64, f64) {
        let (rx, ry) = config.default_diamond_radii;
        (rx * 2.0, ry * 2.0)
    }

    fn default_anchors(&self, node: &NodeModel) -> Vec<Anchor> {
        cardinal_anchors(node, node.width() / 2.0, node.height() / 2.0)
    }

    fn apply_properties(&self, node: &mut NodeModel) {
        apply_radii(node);
    }

    fn on_resized(&self, node: &mut NodeModel) {
        write_radii(node);
    }

    fn contains(&self, node: &NodeModel, point: Point) -> bool {
        let rx = node.width() / 2.0;
        let ry = node.height() / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        (point.x - node.x()).abs() / rx + (point.y - node.y()).abs() / ry <= 1.0
    }
}

/// Polygon whose vertices come from the `points` property (`[[x, y], ...]`)
#[derive(Debug, Default)]
pub struct PolygonShape;

impl PolygonShape {
    fn raw_points(node: &NodeModel) -> Vec<Point> {
        let parsed = node
            .properties()
            .get("points")
            .and_then(|value| serde_json::from_value::<Vec<[f64; 2]>>(value.clone()).ok());
        match parsed {
            Some(points) if !points.is_empty() => {
                points.into_iter().map(|[x, y]| Point::new(x, y)).collect()
            }
            _ => node.context().config().default_polygon_points.clone(),
        }
    }

    /// Vertices in absolute coordinates, the point cloud centered on the node
    pub fn vertices(node: &NodeModel) -> Vec<Point> {
        let points = Self::raw_points(node);
        let Some(extent) = Bounds::enclosing(&points) else {
            return Vec::new();
        };
        let left = node.x() - extent.width() / 2.0;
        let top = node.y() - extent.height() / 2.0;
        points
            .iter()
            .map(|p| Point::new(left + p.x - extent.x1, top + p.y - extent.y1))
            .collect()
    }
}

impl NodeShape for PolygonShape {
    fn kind(&self) -> &str {
        "polygon"
    }

    fn default_size(&self, config: &NodeConfig) -> (f64, f64) {
        Bounds::enclosing(&config.default_polygon_points)
            .map(|b| (b.width(), b.height()))
            .unwrap_or(config.default_rect_size)
    }

    fn default_anchors(&self, node: &NodeModel) -> Vec<Anchor> {
        Self::vertices(node)
            .into_iter()
            .enumerate()
            .map(|(i, p)| Anchor::new(format!("{}_{}", node.id(), i), p.x, p.y))
            .collect()
    }

    fn apply_properties(&self, node: &mut NodeModel) {
        if let Some(extent) = Bounds::enclosing(&Self::raw_points(node)) {
            node.set_size(extent.width(), extent.height());
        }
    }

    fn on_resized(&self, node: &mut NodeModel) {
        let points = Self::raw_points(node);
        let Some(extent) = Bounds::enclosing(&points) else {
            return;
        };
        let sx = if extent.width() > 0.0 {
            node.width() / extent.width()
        } else {
            1.0
        };
        let sy = if extent.height() > 0.0 {
            node.height() / extent.height()
        } else {
            1.0
        };
        let scaled: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [(p.x - extent.x1) * sx, (p.y - extent.y1) * sy])
            .collect();
        node.set_property("points", json!(scaled));
    }

    fn contains(&self, node: &NodeModel, point: Point) -> bool {
        // even-odd ray casting
        let vertices = Self::vertices(node);
        let mut inside = false;
        let mut j = vertices.len().wrapping_sub(1);
        for i in 0..vertices.len() {
            let (a, b) = (vertices[i], vertices[j]);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Shapes available to a graph, keyed by kind
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<String, Rc<dyn NodeShape>>,
}

impl ShapeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with rect, circle, ellipse, diamond, polygon and text
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let builtins: [Rc<dyn NodeShape>; 6] = [
            Rc::new(RectShape),
            Rc::new(CircleShape),
            Rc::new(EllipseShape),
            Rc::new(DiamondShape),
            Rc::new(PolygonShape),
            Rc::new(TextShape),
        ];
        for shape in builtins {
            let kind = shape.kind().to_string();
            registry.register(kind, shape);
        }
        registry
    }

    /// Register a shape, replacing any previous shape of the same kind
    pub fn register(&mut self, kind: impl Into<String>, shape: Rc<dyn NodeShape>) {
        self.shapes.insert(kind.into(), shape);
    }

    pub fn get(&self, kind: &str) -> Option<Rc<dyn NodeShape>> {
        self.shapes.get(kind).cloned()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.shapes.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.shapes.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphContext;
    use crate::node::data::NodeData;

    fn build(data: NodeData) -> NodeModel {
        NodeModel::new(data, GraphContext::new().shared())
    }

    #[test]
    fn test_builtin_kinds() {
        let registry = ShapeRegistry::with_builtins();
        assert_eq!(
            registry.kinds(),
            vec!["circle", "diamond", "ellipse", "polygon", "rect", "text"]
        );
        assert!(registry.get("hexagon").is_none());
    }

    #[test]
    fn test_circle_sized_from_r() {
        let node = build(NodeData::new("circle", 0.0, 0.0).with_property("r", 20));
        assert_eq!((node.width(), node.height()), (40.0, 40.0));
        let anchors = node.anchors();
        let ids: Vec<&str> = anchors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(node.anchors().len(), 4);
        assert!(ids[0].ends_with("_0"));
        assert_eq!(node.anchors()[1].x, 20.0);
    }

    #[test]
    fn test_ellipse_contains() {
        let node = build(
            NodeData::new("ellipse", 0.0, 0.0)
                .with_property("rx", 40)
                .with_property("ry", 20),
        );
        assert!(node.is_hit(Point::new(39.0, 0.0)));
        assert!(!node.is_hit(Point::new(35.0, 15.0)));
    }

    #[test]
    fn test_diamond_contains() {
        let node = build(NodeData::new("diamond", 0.0, 0.0).with_size(60.0, 100.0));
        assert!(node.is_hit(Point::new(0.0, 49.0)));
        assert!(!node.is_hit(Point::new(25.0, 40.0)));
    }

    #[test]
    fn test_polygon_vertices_centered() {
        let node = build(
            NodeData::new("polygon", 100.0, 100.0)
                .with_property("points", serde_json::json!([[0, 0], [40, 0], [40, 20]])),
        );
        assert_eq!((node.width(), node.height()), (40.0, 20.0));
        let anchors = node.anchors();
        assert_eq!(anchors.len(), 3);
        assert_eq!((anchors[0].x, anchors[0].y), (80.0, 90.0));
        assert_eq!((anchors[2].x, anchors[2].y), (120.0, 110.0));
        assert!(node.is_hit(Point::new(115.0, 95.0)));
        assert!(!node.is_hit(Point::new(85.0, 108.0)));
    }

    #[test]
    fn test_rect_size_from_properties() {
        let node = build(
            NodeData::new("rect", 0.0, 0.0)
                .with_property("width", 40)
                .with_property("height", 10),
        );
        assert_eq!((node.width(), node.height()), (40.0, 10.0));
    }

    #[test]
    fn test_polygon_default_points() {
        let node = build(NodeData::new("polygon", 0.0, 0.0));
        assert_eq!((node.width(), node.height()), (100.0, 100.0));
        assert_eq!(node.anchors().len(), 3);
    }
}
