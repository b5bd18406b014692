//! Configuration for node construction defaults

use crate::geometry::Point;
use crate::node::label::LabelConfig;

/// Default geometry and label placement used when a node record omits them
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Default size for rectangles (width, height)
    pub default_rect_size: (f64, f64),

    /// Default radius for circles
    pub default_circle_radius: f64,

    /// Default radii for ellipses (rx, ry)
    pub default_ellipse_radii: (f64, f64),

    /// Default half-diagonals for diamonds (rx, ry)
    pub default_diamond_radii: (f64, f64),

    /// Default size for text nodes (width, height)
    pub default_text_size: (f64, f64),

    /// Default polygon vertices, relative to the polygon's top-left corner
    pub default_polygon_points: Vec<Point>,

    /// Distance of the first stacked label below the node's top edge
    pub label_inset: f64,

    /// Vertical distance between consecutive stacked labels
    pub label_stagger: f64,

    /// Label configuration used when `properties.labelConfig` is absent
    pub default_label_config: LabelConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            default_rect_size: (100.0, 80.0),
            default_circle_radius: 50.0,
            default_ellipse_radii: (50.0, 30.0),
            default_diamond_radii: (30.0, 50.0),
            default_text_size: (60.0, 20.0),
            default_polygon_points: vec![
                Point::new(50.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ],
            label_inset: 12.0,
            label_stagger: 20.0,
            default_label_config: LabelConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default rectangle size
    pub fn with_rect_size(mut self, width: f64, height: f64) -> Self {
        self.default_rect_size = (width, height);
        self
    }

    /// Set the default circle radius
    pub fn with_circle_radius(mut self, radius: f64) -> Self {
        self.default_circle_radius = radius;
        self
    }

    /// Set the stacked-label placement
    pub fn with_label_placement(mut self, inset: f64, stagger: f64) -> Self {
        self.label_inset = inset;
        self.label_stagger = stagger;
        self
    }

    /// Set the label configuration used by nodes that don't specify one
    pub fn with_label_config(mut self, config: LabelConfig) -> Self {
        self.default_label_config = config;
        self
    }
}
