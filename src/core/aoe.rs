//! Area-of-effect geometry for targeting feedback.
//!
//! Pure functions over an unbounded grid; callers clip the result to map
//! bounds. Cell order is deterministic (row-major, line-walk order for
//! lines) so announcements are stable frame to frame.

use serde::{Deserialize, Serialize};

use crate::schema::geometry::{raster_line, Point};

/// The targeting shape. `radius` and `range` travel separately with the
/// targeting mode that selected the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AoeShape {
    EmptyCell,
    Line,
    Cone,
    Circle,
    Burst,
}

impl AoeShape {
    /// Human-readable shape description for announcements.
    pub fn describe(&self, radius: i32) -> String {
        match self {
            Self::EmptyCell => "single cell".to_string(),
            Self::Line => "line".to_string(),
            Self::Cone => format!("cone of radius {}", radius),
            Self::Circle => format!("circle of radius {}", radius),
            Self::Burst => format!("burst of radius {}", radius),
        }
    }
}

/// Affected cells for a shape, given the acting agent's cell (`origin`) and
/// the cursor cell.
pub fn cells(shape: AoeShape, radius: i32, range: i32, origin: Point, cursor: Point) -> Vec<Point> {
    match shape {
        AoeShape::EmptyCell => vec![cursor],
        AoeShape::Line => {
            let mut line = raster_line(origin, cursor);
            line.retain(|p| *p != origin);
            line
        }
        AoeShape::Circle => disc(cursor, radius),
        AoeShape::Burst => box_around(cursor, radius),
        AoeShape::Cone => cone(origin, cursor, radius, range),
    }
}

/// Cells within Euclidean `radius` of `center`.
fn disc(center: Point, radius: i32) -> Vec<Point> {
    let mut out = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                out.push(Point::new(center.x + dx, center.y + dy));
            }
        }
    }
    out
}

/// The square bounding box of side `2 * radius + 1` centered on `center`,
/// unfiltered by distance.
fn box_around(center: Point, radius: i32) -> Vec<Point> {
    let mut out = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            out.push(Point::new(center.x + dx, center.y + dy));
        }
    }
    out
}

/// Directional cone from `origin` toward `cursor`, bounded by Euclidean
/// `range` and the half-angle implied by `radius`. The origin itself is
/// excluded; a cursor on the origin yields no cells.
fn cone(origin: Point, cursor: Point, radius: i32, range: i32) -> Vec<Point> {
    if cursor == origin {
        return Vec::new();
    }
    let dir = ((cursor.y - origin.y) as f64).atan2((cursor.x - origin.x) as f64);
    let half_angle = (radius.max(1) as f64).atan2(range.max(1) as f64);
    let mut out = Vec::new();
    for dy in -range..=range {
        for dx in -range..=range {
            if dx == 0 && dy == 0 {
                continue;
            }
            if dx * dx + dy * dy > range * range {
                continue;
            }
            let angle = (dy as f64).atan2(dx as f64);
            let mut diff = (angle - dir).abs();
            if diff > std::f64::consts::PI {
                diff = 2.0 * std::f64::consts::PI - diff;
            }
            if diff <= half_angle + 1e-9 {
                out.push(Point::new(origin.x + dx, origin.y + dy));
            }
        }
    }
    out
}
