// src/geometry.rs
//
// Point-in-polygon containment for the region of interest and the sub-zones.
// Boundary-inclusive: a point sitting exactly on an edge or vertex counts as
// inside, matching how pointPolygonTest treats the boundary (>= 0).

use crate::types::ConfigError;

const EDGE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A simple closed polygon, immutable once constructed.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<Point>,
    // Bounding box for the cheap early reject
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Polygon {
    /// Build a polygon from `[x, y]` vertex pairs. `name` is error context
    /// only. Fewer than 3 vertices is a configuration error, caught here
    /// rather than at query time.
    pub fn new(name: &str, vertices: &[[f32; 2]]) -> Result<Self, ConfigError> {
        if vertices.len() < 3 {
            return Err(ConfigError::DegeneratePolygon {
                name: name.to_string(),
                vertices: vertices.len(),
            });
        }

        let points: Vec<Point> = vertices.iter().map(|v| Point::new(v[0], v[1])).collect();

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for p in &points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Ok(Self {
            points,
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// True iff `p` lies on or inside the polygon boundary.
    pub fn contains(&self, p: Point) -> bool {
        if p.x < self.min_x || p.x > self.max_x || p.y < self.min_y || p.y > self.max_y {
            return false;
        }

        // Even-odd ray cast, with an explicit on-edge check first so the
        // boundary is always inside regardless of ray orientation.
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[j];
            let b = self.points[i];

            if on_segment(a, b, p) {
                return true;
            }

            if (b.y > p.y) != (a.y > p.y) {
                let x_cross = b.x + (p.y - b.y) * (a.x - b.x) / (a.y - b.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Does `p` lie on the segment a-b?
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let seg_len_sq = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if cross.abs() > EDGE_EPSILON * seg_len_sq.max(1.0) {
        return false;
    }
    p.x >= a.x.min(b.x) - EDGE_EPSILON
        && p.x <= a.x.max(b.x) + EDGE_EPSILON
        && p.y >= a.y.min(b.y) - EDGE_EPSILON
        && p.y <= a.y.max(b.y) + EDGE_EPSILON
}
