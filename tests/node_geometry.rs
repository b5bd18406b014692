//! Integration tests for node geometry: rotation, anchors and bounds.

use node_model::{Bounds, GraphContext, NodeData, NodeModel, Point};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

fn rect_at(x: f64, y: f64, rotate: f64) -> NodeModel {
    NodeModel::new(
        NodeData::new("rect", x, y)
            .with_id("n")
            .with_size(100.0, 80.0)
            .with_rotate(rotate),
        GraphContext::new().shared(),
    )
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[test]
fn right_anchor_lands_below_center_at_90_degrees() {
    let unrotated = rect_at(100.0, 100.0, 0.0);
    let right = unrotated.find_anchor_by_id(Some("n_1")).unwrap();
    assert_eq!((right.x, right.y), (150.0, 100.0));

    let rotated = rect_at(100.0, 100.0, 90.0);
    let right = rotated.find_anchor_by_id(Some("n_1")).unwrap();
    assert!(approx(right.x, 100.0), "x = {}", right.x);
    assert!(approx(right.y, 150.0), "y = {}", right.y);
}

#[test]
fn transform_css_for_quarter_turn() {
    let node = rect_at(100.0, 100.0, 90.0);
    insta::assert_snapshot!(node.transform().css, @"matrix(0,1,-1,0,200,0)");
}

#[test]
fn bounds_stay_axis_aligned_under_rotation() {
    let node = rect_at(100.0, 100.0, 45.0);
    assert_eq!(node.bounds(), Bounds::new(50.0, 60.0, 150.0, 140.0));
}

#[test]
fn closest_anchor_follows_rotation() {
    let node = rect_at(0.0, 0.0, 90.0);
    let closest = node.find_closest_anchor(Point::new(0.0, 60.0)).unwrap();
    assert_eq!(closest.id, "n_1");
}

proptest! {
    #[test]
    fn rotation_round_trip_restores_anchors(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        theta in -720.0f64..720.0,
    ) {
        let original = rect_at(x, y, 0.0).anchors();
        let mut node = rect_at(x, y, 0.0);

        node.set_rotate(theta);
        let rotated = node.anchors();
        for (before, after) in original.iter().zip(&rotated) {
            let center = node.center();
            prop_assert!(
                (before.position().distance_to(center) - after.position().distance_to(center)).abs() < EPSILON
            );
        }

        let rotation = node.rotation().inverse();
        for (before, after) in original.iter().zip(&rotated) {
            let back = rotation.transform_point(after.position());
            prop_assert!((back.x - before.x).abs() < EPSILON);
            prop_assert!((back.y - before.y).abs() < EPSILON);
        }
    }
}
