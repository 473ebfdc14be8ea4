//! Geometry primitives for the active area.
//!
//! Coordinates are camera pixels. `z` is carried on vertices so the area
//! file round-trips, but containment only looks at `x` and `y`.

use serde::{Deserialize, Serialize};

/// A polygon vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A vertex on the image plane (`z = 0`).
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Drop `z`.
    pub fn xy(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A 2D vector (blob direction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle enclosing a set of vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Zero-sized box at the origin; what an empty polygon reports.
    pub const EMPTY: BoundingBox = BoundingBox {
        min_x: 0.0,
        min_y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Smallest box containing every vertex. Empty input yields [`Self::EMPTY`].
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        match extent(vertices) {
            Some((min_x, min_y, max_x, max_y)) => Self {
                min_x,
                min_y,
                width: max_x - min_x,
                height: max_y - min_y,
            },
            None => Self::EMPTY,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when the box cannot be used as a normalization frame.
    pub fn is_degenerate(&self) -> bool {
        let area = self.area();
        !(self.width > 0.0 && self.height > 0.0 && area > 0.0 && area.is_finite())
    }

    /// Inclusive containment on all four edges.
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x()
            && point.y >= self.min_y
            && point.y <= self.max_y()
    }
}

/// `(min_x, min_y, max_x, max_y)` over all vertices.
fn extent(vertices: &[Vertex]) -> Option<(f64, f64, f64, f64)> {
    let first = vertices.first()?;
    let init = (first.x, first.y, first.x, first.y);
    Some(vertices[1..].iter().fold(init, |(min_x, min_y, max_x, max_y), v| {
        (min_x.min(v.x), min_y.min(v.y), max_x.max(v.x), max_y.max(v.y))
    }))
}

/// Even-odd point-in-polygon test over an implicitly closed vertex ring.
///
/// Edges are half-open in y: an edge from `a` to `b` is crossed when exactly
/// one endpoint lies strictly below the point, and the crossing counts only
/// when the point is strictly left of the intersection. For an axis-aligned
/// rectangle the min-x and min-y edges are therefore inside and the max-x
/// and max-y edges outside.
///
/// Fewer than three vertices or a non-finite point is never inside.
pub fn point_in_polygon(vertices: &[Vertex], point: Point2D) -> bool {
    if vertices.len() < 3 || !point.is_finite() {
        return false;
    }
    let Some((min_x, min_y, max_x, max_y)) = extent(vertices) else {
        return false;
    };
    if point.x < min_x || point.x > max_x || point.y < min_y || point.y > max_y {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Vec<Vertex> {
        vec![
            Vertex::planar(0.0, 0.0),
            Vertex::planar(100.0, 0.0),
            Vertex::planar(100.0, 100.0),
            Vertex::planar(0.0, 100.0),
        ]
    }

    #[test]
    fn test_bounding_box_of_square() {
        let bbox = BoundingBox::from_vertices(&square());
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(bbox.area(), 10_000.0);
        assert!(!bbox.is_degenerate());
    }

    #[test]
    fn test_empty_bounding_box_is_degenerate() {
        let bbox = BoundingBox::from_vertices(&[]);
        assert_eq!(bbox, BoundingBox::EMPTY);
        assert!(bbox.is_degenerate());
    }

    #[test]
    fn test_collinear_vertices_give_degenerate_box() {
        let line = vec![
            Vertex::planar(0.0, 10.0),
            Vertex::planar(50.0, 10.0),
            Vertex::planar(100.0, 10.0),
        ];
        assert!(BoundingBox::from_vertices(&line).is_degenerate());
    }

    #[test]
    fn test_point_inside_and_outside_square() {
        let sq = square();
        assert!(point_in_polygon(&sq, Point2D::new(50.0, 25.0)));
        assert!(!point_in_polygon(&sq, Point2D::new(150.0, 25.0)));
        assert!(!point_in_polygon(&sq, Point2D::new(-1.0, 50.0)));
    }

    #[test]
    fn test_half_open_boundary_convention() {
        let sq = square();
        assert!(point_in_polygon(&sq, Point2D::new(0.0, 50.0)));
        assert!(point_in_polygon(&sq, Point2D::new(50.0, 0.0)));
        assert!(!point_in_polygon(&sq, Point2D::new(100.0, 50.0)));
        assert!(!point_in_polygon(&sq, Point2D::new(50.0, 100.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening upwards
        let u = vec![
            Vertex::planar(0.0, 0.0),
            Vertex::planar(30.0, 0.0),
            Vertex::planar(30.0, 20.0),
            Vertex::planar(70.0, 20.0),
            Vertex::planar(70.0, 0.0),
            Vertex::planar(100.0, 0.0),
            Vertex::planar(100.0, 100.0),
            Vertex::planar(0.0, 100.0),
        ];
        assert!(point_in_polygon(&u, Point2D::new(15.0, 10.0)));
        assert!(!point_in_polygon(&u, Point2D::new(50.0, 10.0)));
        assert!(point_in_polygon(&u, Point2D::new(50.0, 50.0)));
    }

    #[test]
    fn test_degenerate_inputs_are_outside() {
        assert!(!point_in_polygon(&[], Point2D::new(0.0, 0.0)));
        let two = vec![Vertex::planar(0.0, 0.0), Vertex::planar(10.0, 10.0)];
        assert!(!point_in_polygon(&two, Point2D::new(5.0, 5.0)));
        assert!(!point_in_polygon(&square(), Point2D::new(f64::NAN, 5.0)));
    }

    #[test]
    fn test_vertex_z_defaults_when_missing() {
        let v: Vertex = serde_json::from_str(r#"{"x":1.5,"y":2.5}"#).unwrap();
        assert_eq!(v, Vertex::new(1.5, 2.5, 0.0));
    }

    fn polygon_strategy() -> impl Strategy<Value = Vec<Vertex>> {
        prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 3..12)
            .prop_map(|pts| pts.into_iter().map(|(x, y)| Vertex::planar(x, y)).collect())
    }

    proptest! {
        #[test]
        fn prop_points_outside_bounding_box_are_never_inside(
            polygon in polygon_strategy(),
            side in 0u8..4,
            offset in 0.001f64..1000.0,
            along in -1000.0f64..1000.0,
        ) {
            let bbox = BoundingBox::from_vertices(&polygon);
            let point = match side {
                0 => Point2D::new(bbox.min_x - offset, along),
                1 => Point2D::new(bbox.max_x() + offset, along),
                2 => Point2D::new(along, bbox.min_y - offset),
                _ => Point2D::new(along, bbox.max_y() + offset),
            };
            prop_assert!(!point_in_polygon(&polygon, point));
        }

        #[test]
        fn prop_bounding_box_contains_every_vertex(polygon in polygon_strategy()) {
            let bbox = BoundingBox::from_vertices(&polygon);
            for v in &polygon {
                prop_assert!(v.x >= bbox.min_x && v.x <= bbox.max_x() + 1e-9);
                prop_assert!(v.y >= bbox.min_y && v.y <= bbox.max_y() + 1e-9);
            }
        }
    }
}
