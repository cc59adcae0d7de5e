// src/decoration/path.rs

//! Path rendering: a polyline through the centers of the path's cells,
//! styled per `PathStyle`. Widths are fractions of the cell size.

use crate::color::{palette_color, Rgba};
use crate::decoration::PathStyle;
use crate::layout::{Layout, Point};
use crate::scene::{arrow_head, LineCap, LineJoin, LineWeight, Primitive, ShapeStyle};

const BULB_RADIUS: f32 = 0.4;
const THERMO_WIDTH: f32 = 0.3;
const BAND_WIDTH: f32 = 0.8;
const BAND_CORE_WIDTH: f32 = 0.67;
const ARROW_WIDTH: f32 = 0.07;
const ARROW_HEAD: f32 = 0.3;

/// Drawable geometry of a path. An empty path draws nothing; a single cell
/// is drawn as a zero-length line so caps and bulbs still show.
pub fn path(cells: &[(usize, usize)], style: PathStyle, color: u8, layout: &Layout) -> Vec<Primitive> {
    let mut points: Vec<Point> = cells.iter().map(|&(x, y)| layout.cell_center(x, y)).collect();
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if points.len() == 1 {
        points.push(first);
    }
    let cs = layout.cell_size;
    let ink = palette_color(color).premultiplied();
    let line = |points: &[Point], style: ShapeStyle| Primitive::Polyline {
        points: points.to_vec(),
        closed: false,
        style,
    };

    match style {
        PathStyle::Thermo => vec![
            Primitive::Circle {
                center: first,
                radius: cs * BULB_RADIUS,
                style: ShapeStyle::filled(ink),
            },
            line(&points, ShapeStyle::stroked(ink, cs * THERMO_WIDTH).round()),
        ],
        PathStyle::Thin | PathStyle::Medium | PathStyle::Fat => {
            let weight = match style {
                PathStyle::Thin => LineWeight::Thin,
                PathStyle::Medium => LineWeight::Medium,
                _ => LineWeight::Fat,
            };
            vec![line(&points, ShapeStyle::stroked(ink, weight.width(cs)).with_join(LineJoin::Round))]
        }
        PathStyle::RoundBorder | PathStyle::Border => {
            let cap = if style == PathStyle::RoundBorder { LineCap::Round } else { LineCap::Square };
            vec![
                line(&points, ShapeStyle::stroked(ink, cs * BAND_WIDTH).with_cap(cap).with_join(LineJoin::Round)),
                line(
                    &points,
                    ShapeStyle::stroked(Rgba::WHITE, cs * BAND_CORE_WIDTH).with_cap(cap).with_join(LineJoin::Round),
                ),
            ]
        }
        PathStyle::RoundFill => vec![line(&points, ShapeStyle::stroked(ink, cs * BAND_WIDTH).round())],
        PathStyle::SquareFill => vec![line(
            &points,
            ShapeStyle::stroked(ink, cs * BAND_WIDTH).with_cap(LineCap::Square),
        )],
        PathStyle::Arrow | PathStyle::ArrowCircle => {
            let stroke = ShapeStyle::stroked(ink, cs * ARROW_WIDTH);
            let mut out = vec![line(&points, stroke)];
            let tip = points[points.len() - 1];
            let before = points[points.len() - 2];
            if let Some(barbs) = arrow_head(before, tip, cs * ARROW_HEAD) {
                out.push(line(&barbs, stroke));
            }
            if style == PathStyle::ArrowCircle {
                out.push(Primitive::Circle {
                    center: first,
                    radius: cs * BULB_RADIUS,
                    style: stroke.with_fill(Rgba::WHITE),
                });
            }
            out
        }
        PathStyle::Polygon => vec![Primitive::Polyline {
            points,
            closed: true,
            style: ShapeStyle::stroked(ink, LineWeight::Thin.width(cs)),
        }],
        PathStyle::PolygonFill => vec![Primitive::Polyline {
            points,
            closed: true,
            style: ShapeStyle::filled(ink),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use test_log::test;

    fn layout() -> Layout {
        Layout::new(&GridConfig { cell_size: 100, ..GridConfig::default() })
    }

    fn polyline_points(p: &Primitive) -> &[Point] {
        match p {
            Primitive::Polyline { points, .. } => points,
            other => panic!("expected a polyline, got {:?}", other),
        }
    }

    #[test]
    fn empty_path_draws_nothing() {
        assert!(path(&[], PathStyle::Thermo, 0, &layout()).is_empty());
    }

    #[test]
    fn thermo_is_bulb_then_line_through_centers() {
        let prims = path(&[(0, 0), (1, 0), (1, 1)], PathStyle::Thermo, 1, &layout());
        assert_eq!(prims.len(), 2);
        match &prims[0] {
            Primitive::Circle { center, radius, .. } => {
                assert_eq!(*center, Point::new(50.0, 50.0));
                assert!((radius - 40.0).abs() < 1e-3);
            }
            other => panic!("expected the bulb, got {:?}", other),
        }
        assert_eq!(
            polyline_points(&prims[1]),
            &[Point::new(50.0, 50.0), Point::new(150.0, 50.0), Point::new(150.0, 150.0)]
        );
    }

    #[test]
    fn single_cell_path_duplicates_its_point() {
        let prims = path(&[(2, 2)], PathStyle::Fat, 0, &layout());
        assert_eq!(polyline_points(&prims[0]), &[Point::new(250.0, 250.0), Point::new(250.0, 250.0)]);
    }

    #[test]
    fn arrow_head_follows_the_last_segment() {
        let prims = path(&[(0, 0), (0, 1), (1, 1)], PathStyle::Arrow, 0, &layout());
        assert_eq!(prims.len(), 2);
        let head = polyline_points(&prims[1]);
        assert_eq!(head[1], Point::new(150.0, 150.0));
        // Last segment runs left to right, so both barbs trail to the left.
        assert!(head[0].x < 150.0 && head[2].x < 150.0);
    }

    #[test]
    fn single_cell_arrow_has_no_head() {
        let prims = path(&[(0, 0)], PathStyle::Arrow, 0, &layout());
        assert_eq!(prims.len(), 1);
    }

    #[test]
    fn arrow_circle_draws_white_bulb_on_top() {
        let prims = path(&[(0, 0), (1, 0)], PathStyle::ArrowCircle, 0, &layout());
        assert!(matches!(prims.last(), Some(Primitive::Circle { style, .. }) if style.fill == Some(Rgba::WHITE)));
    }

    #[test]
    fn borders_are_band_then_white_core() {
        let prims = path(&[(0, 0), (1, 0)], PathStyle::Border, 3, &layout());
        match (&prims[0], &prims[1]) {
            (Primitive::Polyline { style: band, .. }, Primitive::Polyline { style: core, .. }) => {
                assert!(band.stroke_width > core.stroke_width);
                assert_eq!(core.stroke, Some(Rgba::WHITE));
                assert_eq!(band.cap, LineCap::Square);
            }
            other => panic!("unexpected primitives {:?}", other),
        }
    }

    #[test]
    fn colors_are_premultiplied_and_opaque() {
        let prims = path(&[(0, 0), (1, 0)], PathStyle::Thin, 3, &layout());
        match &prims[0] {
            Primitive::Polyline { style, .. } => {
                assert_eq!(style.stroke, Some(palette_color(3).premultiplied()));
            }
            other => panic!("unexpected primitive {:?}", other),
        }

        // Palette entry 3 is translucent; no style may draw it raw.
        let raw = palette_color(3);
        assert!(raw.a < 1.0);
        for path_style in PathStyle::ALL {
            for prim in path(&[(0, 0), (1, 0), (1, 1)], path_style, 3, &layout()) {
                let shape = match &prim {
                    Primitive::Rect { style, .. }
                    | Primitive::Polyline { style, .. }
                    | Primitive::Circle { style, .. } => style,
                    Primitive::Text { color, .. } => {
                        assert_eq!(color.a, 1.0, "{} text", path_style.name());
                        continue;
                    }
                };
                for color in [shape.fill, shape.stroke].into_iter().flatten() {
                    assert_eq!(color.a, 1.0, "{} draws {:?}", path_style.name(), color);
                }
            }
        }
    }

    #[test]
    fn polygons_close_their_outline() {
        let prims = path(&[(0, 0), (1, 0), (1, 1)], PathStyle::PolygonFill, 4, &layout());
        assert!(matches!(&prims[0], Primitive::Polyline { closed: true, .. }));
    }
}
