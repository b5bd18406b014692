//! Affine transforms used to rotate a node about its own center.
//!
//! A node's transform descriptor is the composition
//! `translate(-cx, -cy) -> rotate(θ) -> translate(cx, cy)`, built here as a
//! [`Matrix`] and rendered in SVG `matrix(a,b,c,d,e,f)` form for painters.
//! Anchors go through the same composition point by point via
//! [`RotationTransform`].
//!
//! ## Rotation Convention
//!
//! Rotation uses the SVG convention: clockwise positive angles, in degrees,
//! with the Y axis pointing down.
//! - 0° = no rotation
//! - 90° = rotated clockwise (right becomes down)
//! - 180° = upside down
//! - 270° = rotated counter-clockwise (right becomes up)

use std::fmt;

use crate::geometry::types::{Anchor, Bounds, Point};

/// A 2D affine matrix in SVG column order.
///
/// ```text
/// x' = a * x + c * y + e
/// y' = b * x + d * y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::identity()
        }
    }

    /// Clockwise rotation about the origin
    pub fn rotation(angle_degrees: f64) -> Self {
        let (sin_a, cos_a) = angle_degrees.to_radians().sin_cos();
        Self {
            a: cos_a,
            b: sin_a,
            c: -sin_a,
            d: cos_a,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Apply `next` after `self`, returning the combined matrix
    pub fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn translate(&self, tx: f64, ty: f64) -> Matrix {
        self.then(&Matrix::translation(tx, ty))
    }

    pub fn rotate(&self, angle_degrees: f64) -> Matrix {
        self.then(&Matrix::rotation(angle_degrees))
    }

    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({},{},{},{},{},{})",
            fmt_coord(self.a),
            fmt_coord(self.b),
            fmt_coord(self.c),
            fmt_coord(self.d),
            fmt_coord(self.e),
            fmt_coord(self.f)
        )
    }
}

/// Round to 6 decimals so trig noise (e.g. `cos(90°)`) prints as `0`
fn fmt_coord(v: f64) -> String {
    let rounded = (v * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

/// The derived transform of a node: its matrix and the SVG attribute string.
///
/// Kept on the node and recomputed by every setter that changes rotation or
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformDescriptor {
    pub matrix: Matrix,
    pub css: String,
}

impl TransformDescriptor {
    /// Rotation of `angle_degrees` about `center`
    pub fn rotate_about(center: Point, angle_degrees: f64) -> Self {
        let matrix = Matrix::translation(-center.x, -center.y)
            .rotate(angle_degrees)
            .translate(center.x, center.y);
        Self {
            css: matrix.to_string(),
            matrix,
        }
    }
}

impl Default for TransformDescriptor {
    fn default() -> Self {
        Self::rotate_about(Point::default(), 0.0)
    }
}

/// Represents a 2D rotation transformation around a center point.
#[derive(Debug, Clone, Copy)]
pub struct RotationTransform {
    /// Rotation angle in degrees (clockwise positive, per SVG convention)
    pub angle_degrees: f64,
    /// Center point of rotation (the node center)
    pub center: Point,
}

impl RotationTransform {
    pub fn new(angle_degrees: f64, center: Point) -> Self {
        Self {
            angle_degrees,
            center,
        }
    }

    /// Check if this is effectively a no-op (0° rotation).
    pub fn is_identity(&self) -> bool {
        self.angle_degrees.abs() < f64::EPSILON
    }

    /// The inverse rotation about the same center
    pub fn inverse(&self) -> Self {
        Self::new(-self.angle_degrees, self.center)
    }

    /// Rotate a point around the center.
    ///
    /// ```text
    /// x' = cx + (x - cx) * cos(θ) - (y - cy) * sin(θ)
    /// y' = cy + (x - cx) * sin(θ) + (y - cy) * cos(θ)
    /// ```
    pub fn transform_point(&self, point: Point) -> Point {
        if self.is_identity() {
            return point;
        }
        Matrix::translation(-self.center.x, -self.center.y)
            .rotate(self.angle_degrees)
            .translate(self.center.x, self.center.y)
            .apply(point)
    }

    /// Transform a box using the "loose bounds" algorithm: rotate the four
    /// corners and take the axis-aligned box around them.
    pub fn transform_bounds(&self, bounds: &Bounds) -> Bounds {
        if self.is_identity() {
            return *bounds;
        }

        let corners = [
            Point::new(bounds.x1, bounds.y1),
            Point::new(bounds.x2, bounds.y1),
            Point::new(bounds.x1, bounds.y2),
            Point::new(bounds.x2, bounds.y2),
        ];
        let rotated: Vec<Point> = corners.iter().map(|p| self.transform_point(*p)).collect();

        Bounds::enclosing(&rotated).unwrap_or(*bounds)
    }

    /// Transform an anchor's position, keeping its id
    pub fn transform_anchor(&self, anchor: &Anchor) -> Anchor {
        if self.is_identity() {
            return anchor.clone();
        }
        let p = self.transform_point(anchor.position());
        Anchor::new(anchor.id.clone(), p.x, p.y)
    }
}
