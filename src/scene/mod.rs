// src/scene/mod.rs

//! The rendering seam.
//!
//! The editor never draws pixels itself. Everything visible is expressed as
//! groups of `Primitive`s handed to a `Surface`, a retained-mode scene that
//! keeps each group as one node until it is removed. A surface implementation
//! only has to interpret the four primitive kinds.

pub mod mock;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Rgba;
pub use crate::layout::Point;

/// Stroke weight of user-drawn lines (edges, centerlines, thin paths),
/// expressed as a fraction of the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineWeight {
    #[default]
    Thin,
    Medium,
    Fat,
}

impl LineWeight {
    /// Stroke width in pixels for a box of edge length `size`.
    pub fn width(self, size: f32) -> f32 {
        match self {
            LineWeight::Thin => size * 0.05,
            LineWeight::Medium => size * 0.1,
            LineWeight::Fat => size * 0.3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineWeight::Thin => "thin",
            LineWeight::Medium => "medium",
            LineWeight::Fat => "fat",
        }
    }
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineWeight {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "thin" => LineWeight::Thin,
            "medium" => LineWeight::Medium,
            "fat" => LineWeight::Fat,
            other => anyhow::bail!("unknown line weight '{}'", other),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
}

/// Fill and stroke of a shape. A `None` fill or stroke is not painted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: f32,
    /// Dash length; gaps have the same length.
    pub dash: Option<f32>,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl ShapeStyle {
    pub fn stroked(color: Rgba, width: f32) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn filled(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_dash(mut self, dash: f32) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn round(mut self) -> Self {
        self.cap = LineCap::Round;
        self.join = LineJoin::Round;
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

/// A drawable shape in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        origin: Point,
        width: f32,
        height: f32,
        style: ShapeStyle,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        style: ShapeStyle,
    },
    Circle {
        center: Point,
        radius: f32,
        style: ShapeStyle,
    },
    /// Text centered in the box at `origin`.
    Text {
        origin: Point,
        width: f32,
        height: f32,
        font_size: f32,
        text: String,
        color: Rgba,
    },
}

impl Primitive {
    pub fn line(from: Point, to: Point, style: ShapeStyle) -> Self {
        Primitive::Polyline {
            points: vec![from, to],
            closed: false,
            style,
        }
    }
}

/// Z-ordered layers of the scene, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Color fills and selection highlight.
    Fills,
    /// Cages and paths.
    Decorations,
    /// Grid lines and frame.
    Grid,
    /// Digits, marks and symbols.
    Content,
    /// Boundary content, edges, centerlines and crosses.
    Overlay,
}

/// Handle of a node added to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A retained-mode drawing surface.
pub trait Surface {
    /// Adds a group of primitives as one node on `layer`.
    fn add(&mut self, layer: Layer, group: Vec<Primitive>) -> NodeId;

    /// Removes a node. Unknown ids are ignored.
    fn remove(&mut self, node: NodeId);

    /// Removes every node.
    fn clear(&mut self);

    /// Pushes pending changes to the screen.
    fn flush(&mut self) -> Result<()>;
}

/// The two barbs of an arrowhead at `tip`, for a shaft arriving from `from`.
///
/// Returns `[barb, tip, barb]` as one polyline, or `None` when the two points
/// coincide and the direction is undefined.
pub fn arrow_head(from: Point, tip: Point, length: f32) -> Option<[Point; 3]> {
    let (dx, dy) = (from.x - tip.x, from.y - tip.y);
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let angle = dy.atan2(dx);
    let quarter = std::f32::consts::FRAC_PI_4;
    let barb = |a: f32| Point::new(tip.x + length * a.cos(), tip.y + length * a.sin());
    Some([barb(angle - quarter), tip, barb(angle + quarter)])
}

/// Vertices of a star polygon, alternating outer and inner radius, first
/// spike pointing up.
pub fn star_points(center: Point, inner: f32, outer: f32, spikes: usize) -> Vec<Point> {
    let step = std::f32::consts::PI / spikes as f32;
    (0..spikes * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = i as f32 * step - std::f32::consts::FRAC_PI_2;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn close(a: Point, b: Point) -> bool {
        a.distance_to(b) < 1e-3
    }

    #[test]
    fn arrow_head_points_back_along_the_shaft() {
        let head = arrow_head(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 2.0_f32.sqrt()).unwrap();
        assert!(close(head[1], Point::new(10.0, 0.0)));
        // Barbs trail behind the tip at 45 degrees on either side.
        assert!(close(head[0], Point::new(9.0, 1.0)) || close(head[0], Point::new(9.0, -1.0)));
        assert!(close(head[2], Point::new(9.0, 1.0)) || close(head[2], Point::new(9.0, -1.0)));
        assert!(!close(head[0], head[2]));
    }

    #[test]
    fn degenerate_shaft_has_no_head() {
        assert!(arrow_head(Point::new(3.0, 3.0), Point::new(3.0, 3.0), 5.0).is_none());
    }

    #[test]
    fn star_has_two_vertices_per_spike() {
        let star = star_points(Point::new(0.0, 0.0), 1.0, 2.0, 5);
        assert_eq!(star.len(), 10);
        assert!(close(star[0], Point::new(0.0, -2.0)));
    }

    #[test]
    fn line_weights_scale_with_size() {
        assert!((LineWeight::Fat.width(100.0) - 30.0).abs() < 1e-4);
        assert_eq!("medium".parse::<LineWeight>().unwrap(), LineWeight::Medium);
        assert!("bold".parse::<LineWeight>().is_err());
    }
}
