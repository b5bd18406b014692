//! Move and resize
//!
//! `move_by` decides each axis on its own, `move_to` accepts or rejects the
//! whole displacement vector. Every applied displacement also shifts the
//! node's labels and recomputes the transform before returning.

use serde::{Deserialize, Serialize};

use crate::node::data::NodeSnapshot;
use crate::node::model::NodeModel;
use crate::node::rules::{allowed_axes, allows_whole_move, AxisPermission, MoveRule};

/// Size change requested by a resize handle.
///
/// `delta_x`/`delta_y` are the center displacement of a one-edge-anchored
/// resize; the node moves by half of them so the opposite edge stays put.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeInfo {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default)]
    pub delta_y: f64,
}

impl ResizeInfo {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_delta(mut self, delta_x: f64, delta_y: f64) -> Self {
        self.delta_x = delta_x;
        self.delta_y = delta_y;
        self
    }
}

impl NodeModel {
    /// Add a rule that only gates this node
    pub fn add_move_rule(&mut self, rule: MoveRule) {
        self.move_rules.push(rule);
    }

    /// Add a rule to the graph-wide list, gating every node of the graph
    pub fn add_graph_move_rule(&self, rule: MoveRule) {
        self.ctx.add_move_rule(rule);
    }

    /// Node-local rules followed by the graph-wide rules
    pub fn move_rules(&self) -> Vec<MoveRule> {
        let mut rules = self.move_rules.clone();
        rules.extend(self.ctx.move_rules());
        rules
    }

    /// Which axes of `(dx, dy)` the rules allow
    pub fn is_allow_move(&self, dx: f64, dy: f64) -> AxisPermission {
        allowed_axes(&self.move_rules(), self, dx, dy)
    }

    /// Displace the node, applying each axis only if the rules allow it.
    ///
    /// Returns whether either axis moved.
    pub fn move_by(&mut self, dx: f64, dy: f64, ignore_rules: bool) -> bool {
        let allowed = if ignore_rules {
            AxisPermission::both()
        } else {
            self.is_allow_move(dx, dy)
        };
        if !allowed.any() {
            tracing::debug!(node = %self.id, dx, dy, "move vetoed");
            return false;
        }

        let step_x = if allowed.x { dx } else { 0.0 };
        let step_y = if allowed.y { dy } else { 0.0 };
        self.x += step_x;
        self.y += step_y;
        self.on_node_moved(step_x, step_y);
        self.refresh_transform();
        true
    }

    /// Move the center to `(x, y)`.
    ///
    /// The rules judge the whole displacement at once: a rejected vector
    /// leaves the node where it is, with no partial move along one axis.
    pub fn move_to(&mut self, x: f64, y: f64, ignore_rules: bool) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        if !ignore_rules && !allows_whole_move(&self.move_rules(), self, dx, dy) {
            tracing::debug!(node = %self.id, x, y, "move_to vetoed");
            return false;
        }
        self.x = x;
        self.y = y;
        self.on_node_moved(dx, dy);
        self.refresh_transform();
        true
    }

    /// Place the center at `(x, y)` without consulting rules
    pub fn update_position(&mut self, x: f64, y: f64) {
        self.move_to(x, y, true);
    }

    /// Apply a resize and return the resulting snapshot.
    ///
    /// The size is written as given; [`NodeModel::size_bounds`] is not
    /// applied here. Callers wanting limits use [`NodeModel::clamp_size`].
    pub fn resize(&mut self, info: ResizeInfo) -> NodeSnapshot {
        self.move_by(info.delta_x / 2.0, info.delta_y / 2.0, false);
        self.set_size(info.width, info.height);
        let shape = std::rc::Rc::clone(&self.shape);
        shape.on_resized(self);
        self.refresh_transform();
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphContext;
    use crate::node::data::NodeData;
    use crate::node::rules::MoveVerdict;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn labelled(ctx: Rc<GraphContext>) -> NodeModel {
        NodeModel::new(
            NodeData::new("rect", 100.0, 100.0).with_text("hi"),
            ctx,
        )
    }

    fn label_position(node: &NodeModel) -> (f64, f64) {
        let label = node.labels().iter().next().unwrap();
        (label.x, label.y)
    }

    #[test]
    fn test_move_shifts_labels() {
        let mut node = labelled(GraphContext::new().shared());
        assert!(node.move_by(10.0, -5.0, false));
        assert_eq!((node.x(), node.y()), (110.0, 95.0));
        assert_eq!(label_position(&node), (110.0, 95.0));
    }

    #[test]
    fn test_per_axis_rule() {
        let mut node = labelled(GraphContext::new().shared());
        node.add_move_rule(MoveRule::new(|_, _, _| MoveVerdict::PerAxis { x: false, y: true }));

        assert!(node.move_by(10.0, 10.0, false));
        assert_eq!((node.x(), node.y()), (100.0, 110.0));
        assert_eq!(label_position(&node), (100.0, 110.0));
    }

    #[test]
    fn test_boolean_veto_and_ignore_rules() {
        let mut node = labelled(GraphContext::new().shared());
        node.add_move_rule(MoveRule::new(|_, _, _| false.into()));

        assert!(!node.move_by(10.0, 10.0, false));
        assert_eq!((node.x(), node.y()), (100.0, 100.0));

        assert!(node.move_by(10.0, 10.0, true));
        assert_eq!((node.x(), node.y()), (110.0, 110.0));
    }

    #[test]
    fn test_move_to_whole_vector() {
        let mut node = labelled(GraphContext::new().shared());
        node.add_move_rule(MoveRule::new(|_, dx, _| (dx <= 50.0).into()));

        assert!(!node.move_to(200.0, 100.0, false));
        assert_eq!(node.x(), 100.0);

        node.add_move_rule(MoveRule::new(|_, _, _| MoveVerdict::PerAxis { x: false, y: true }));
        assert!(node.move_to(120.0, 130.0, false));
        assert_eq!((node.x(), node.y()), (120.0, 130.0));
        assert_eq!(label_position(&node), (120.0, 130.0));
    }

    #[test]
    fn test_graph_rule_shared_across_nodes() {
        let ctx = GraphContext::new().shared();
        let first = labelled(Rc::clone(&ctx));
        let mut second = labelled(Rc::clone(&ctx));

        first.add_graph_move_rule(MoveRule::new(|_, _, _| false.into()));
        assert!(!second.move_by(1.0, 1.0, false));
        assert!(!second.is_allow_move(1.0, 1.0).any());
    }

    #[test]
    fn test_move_updates_transform() {
        let mut node = labelled(GraphContext::new().shared());
        node.set_rotate(90.0);
        let before = node.transform().css.clone();
        node.move_by(10.0, 0.0, true);
        assert_ne!(node.transform().css, before);
    }

    #[test]
    fn test_update_position_bypasses_rules() {
        let mut node = labelled(GraphContext::new().shared());
        node.add_move_rule(MoveRule::new(|_, _, _| false.into()));
        node.update_position(0.0, 0.0);
        assert_eq!((node.x(), node.y()), (0.0, 0.0));
        assert_eq!(label_position(&node), (0.0, 0.0));
    }

    #[test]
    fn test_resize_moves_half_delta_without_bounds() {
        let mut node = labelled(GraphContext::new().shared());
        let snapshot = node.resize(ResizeInfo::new(10.0, 5000.0).with_delta(20.0, -10.0));

        assert_eq!((node.width(), node.height()), (10.0, 5000.0));
        assert_eq!((snapshot.x, snapshot.y), (110.0, 95.0));
    }

    #[test]
    fn test_resize_writes_back_circle_radius() {
        let mut node = NodeModel::new(
            NodeData::new("circle", 0.0, 0.0),
            GraphContext::new().shared(),
        );
        let snapshot = node.resize(ResizeInfo::new(60.0, 60.0));
        assert_eq!(snapshot.properties["r"], serde_json::json!(30.0));
    }
}
