//! Anchor resolution
//!
//! Anchors are derived on every read, never cached: from the explicit offset
//! list when one is present, otherwise from the shape's default generator.
//! Either way they are rotated to match the node's current rotation.

use crate::geometry::{closest_anchor, Anchor, Point};
use crate::node::data::AnchorOffset;
use crate::node::model::NodeModel;

impl NodeModel {
    /// Connection points in absolute, rotated coordinates
    pub fn anchors(&self) -> Vec<Anchor> {
        let unrotated = match self.anchors_offset.as_deref() {
            Some(offsets) if !offsets.is_empty() => self.anchors_from_offsets(offsets),
            _ => self.shape.default_anchors(self),
        };
        let rotation = self.rotation();
        if rotation.is_identity() {
            return unrotated;
        }
        unrotated
            .iter()
            .map(|anchor| rotation.transform_anchor(anchor))
            .collect()
    }

    fn anchors_from_offsets(&self, offsets: &[AnchorOffset]) -> Vec<Anchor> {
        offsets
            .iter()
            .enumerate()
            .map(|(index, offset)| {
                let (dx, dy) = offset.offset();
                let id = match offset.id() {
                    Some(id) => id.to_string(),
                    None => format!("{}_{}", self.id, index),
                };
                Anchor::new(id, self.x + dx, self.y + dy)
            })
            .collect()
    }

    /// Look up a resolved anchor by id; `None` matches nothing
    pub fn find_anchor_by_id(&self, id: Option<&str>) -> Option<Anchor> {
        let id = id?;
        self.anchors().into_iter().find(|anchor| anchor.id == id)
    }

    /// Resolved anchor nearest to `point`
    pub fn find_closest_anchor(&self, point: Point) -> Option<Anchor> {
        closest_anchor(&self.anchors(), point).cloned()
    }

    pub fn anchors_offset(&self) -> Option<&[AnchorOffset]> {
        self.anchors_offset.as_deref()
    }

    /// Replace the explicit offset list; `None` restores the shape defaults
    pub fn set_anchors_offset(&mut self, offsets: Option<Vec<AnchorOffset>>) {
        self.anchors_offset = offsets;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphContext;
    use crate::node::data::NodeData;
    use pretty_assertions::assert_eq;

    fn rect(rotate: f64) -> NodeModel {
        NodeModel::new(
            NodeData::new("rect", 100.0, 100.0)
                .with_id("n")
                .with_size(100.0, 80.0)
                .with_rotate(rotate),
            GraphContext::new().shared(),
        )
    }

    fn rounded(anchor: &Anchor) -> (String, f64, f64) {
        (
            anchor.id.clone(),
            (anchor.x * 1e6).round() / 1e6,
            (anchor.y * 1e6).round() / 1e6,
        )
    }

    #[test]
    fn test_default_rect_anchors() {
        let anchors: Vec<_> = rect(0.0).anchors().iter().map(rounded).collect();
        assert_eq!(
            anchors,
            vec![
                ("n_0".to_string(), 100.0, 60.0),
                ("n_1".to_string(), 150.0, 100.0),
                ("n_2".to_string(), 100.0, 140.0),
                ("n_3".to_string(), 50.0, 100.0),
            ]
        );
    }

    #[test]
    fn test_right_anchor_rotates_clockwise() {
        let node = rect(90.0);
        let right = node.find_anchor_by_id(Some("n_1")).unwrap();
        assert_eq!(rounded(&right), ("n_1".to_string(), 100.0, 150.0));
    }

    #[test]
    fn test_offsets_take_precedence() {
        let mut node = rect(0.0);
        node.set_anchors_offset(Some(vec![
            AnchorOffset::Pair([10.0, 0.0]),
            AnchorOffset::Record {
                id: Some("custom".into()),
                x: 0.0,
                y: -5.0,
            },
        ]));
        let anchors: Vec<_> = node.anchors().iter().map(rounded).collect();
        assert_eq!(
            anchors,
            vec![
                ("n_0".to_string(), 110.0, 100.0),
                ("custom".to_string(), 100.0, 95.0),
            ]
        );
    }

    #[test]
    fn test_empty_offsets_fall_back_to_shape() {
        let mut node = rect(0.0);
        node.set_anchors_offset(Some(Vec::new()));
        assert_eq!(node.anchors().len(), 4);
    }

    #[test]
    fn test_find_by_id_none_and_missing() {
        let node = rect(0.0);
        assert!(node.find_anchor_by_id(None).is_none());
        assert!(node.find_anchor_by_id(Some("missing")).is_none());
    }

    #[test]
    fn test_find_closest() {
        let node = rect(0.0);
        let closest = node.find_closest_anchor(Point::new(140.0, 105.0)).unwrap();
        assert_eq!(closest.id, "n_1");
    }

    #[test]
    fn test_anchors_follow_position() {
        let mut node = rect(0.0);
        node.move_by(5.0, 5.0, true);
        assert_eq!(node.anchors()[1].x, 155.0);
    }
}
