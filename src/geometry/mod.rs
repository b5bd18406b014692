//! Geometry primitives and helpers consumed by the node model

pub mod transform;
pub mod types;

pub use transform::{Matrix, RotationTransform, TransformDescriptor};
pub use types::{Anchor, Bounds, Point};

/// Return the anchor closest to `point` by Euclidean distance.
///
/// Ties resolve to the earliest anchor in the list.
pub fn closest_anchor(anchors: &[Anchor], point: Point) -> Option<&Anchor> {
    anchors.iter().fold(None, |best: Option<(&Anchor, f64)>, anchor| {
        let dist = anchor.position().distance_to(point);
        match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((anchor, dist)),
        }
    })
    .map(|(anchor, _)| anchor)
}
