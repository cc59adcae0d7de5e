// src/decoration/cage.rs

//! Cage outlines.
//!
//! Each owned cell draws one segment for every orthogonal side whose
//! neighbour is not in the cage. In the dashed style segments are inset by
//! the corner offset; where the outline turns around a concave corner the
//! segment is stretched so that it meets the neighbour's segment, which is
//! decided by looking at the diagonal neighbours.

use std::collections::BTreeSet;

use crate::color::palette_color;
use crate::decoration::CageStyle;
use crate::layout::{Layout, Point, Side};
use crate::scene::{Primitive, ShapeStyle};

/// One straight piece of a cage outline, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CageSegment {
    pub cell: (usize, usize),
    pub side: Side,
    pub from: Point,
    pub to: Point,
}

/// Outline segments of a cage, ordered by cell (row-major) then side.
pub fn cage_segments(cells: &[(usize, usize)], style: CageStyle, layout: &Layout) -> Vec<CageSegment> {
    let owned: BTreeSet<(isize, isize)> = cells.iter().map(|&(x, y)| (x as isize, y as isize)).collect();
    let has = |x: isize, y: isize| owned.contains(&(x, y));
    let cs = layout.cell_size;
    let o = layout.corner_offset();

    // Inset corners clockwise from top-left, then the points where the inset
    // lines cross the cell border, clockwise from the left side's top.
    let c = [(o, o), (cs - o, o), (cs - o, cs - o), (o, cs - o)];
    let ext = [
        (0.0, o),
        (o, 0.0),
        (cs - o, 0.0),
        (cs, o),
        (cs, cs - o),
        (cs - o, cs),
        (o, cs),
        (0.0, cs - o),
    ];

    let mut ordered: Vec<(isize, isize)> = owned.iter().copied().collect();
    ordered.sort_by_key(|&(x, y)| (y, x));

    let mut segments = Vec::new();
    for (x, y) in ordered {
        let left = has(x - 1, y);
        let right = has(x + 1, y);
        let up = has(x, y - 1);
        let down = has(x, y + 1);
        let ul = has(x - 1, y - 1);
        let ur = has(x + 1, y - 1);
        let dl = has(x - 1, y + 1);
        let dr = has(x + 1, y + 1);

        let missing = [(Side::Left, !left), (Side::Top, !up), (Side::Right, !right), (Side::Bottom, !down)];
        for (side, open) in missing {
            if !open {
                continue;
            }
            let (from, to) = match style {
                CageStyle::Edge => match side {
                    Side::Left => ((0.0, 0.0), (0.0, cs)),
                    Side::Top => ((0.0, 0.0), (cs, 0.0)),
                    Side::Right => ((cs, 0.0), (cs, cs)),
                    Side::Bottom => ((0.0, cs), (cs, cs)),
                },
                CageStyle::Dash => match side {
                    Side::Left => {
                        let mut start = c[0];
                        let mut end = c[3];
                        if up {
                            start = ext[1];
                            if ul {
                                start.1 -= o;
                            }
                        }
                        if down {
                            end = ext[6];
                            if dl {
                                end.1 += o;
                            }
                        }
                        (start, end)
                    }
                    Side::Right => {
                        let mut start = c[1];
                        let mut end = c[2];
                        if up {
                            start = ext[2];
                            if ur {
                                start.1 -= o;
                            }
                        }
                        if down {
                            end = ext[5];
                            if dr {
                                end.1 += o;
                            }
                        }
                        (start, end)
                    }
                    Side::Top => {
                        let mut start = c[0];
                        let mut end = c[1];
                        if left {
                            start = ext[0];
                            if ul {
                                start.0 -= o;
                            }
                        }
                        if right {
                            end = ext[3];
                            if ur {
                                end.0 += o;
                            }
                        }
                        (start, end)
                    }
                    Side::Bottom => {
                        let mut start = c[3];
                        let mut end = c[2];
                        if left {
                            start = ext[7];
                            if dl {
                                start.0 -= o;
                            }
                        }
                        if right {
                            end = ext[4];
                            if dr {
                                end.0 += o;
                            }
                        }
                        (start, end)
                    }
                },
            };
            let origin = Point::new(x as f32 * cs, y as f32 * cs);
            segments.push(CageSegment {
                cell: (x as usize, y as usize),
                side,
                from: origin.offset(from.0, from.1),
                to: origin.offset(to.0, to.1),
            });
        }
    }
    segments
}

/// Drawable outline of a cage.
pub fn cage(cells: &[(usize, usize)], style: CageStyle, color: u8, layout: &Layout) -> Vec<Primitive> {
    let cs = layout.cell_size;
    let ink = palette_color(color).premultiplied();
    let stroke = match style {
        CageStyle::Dash => ShapeStyle::stroked(ink, cs / 32.0).with_dash(cs / 16.0),
        CageStyle::Edge => ShapeStyle::stroked(ink, cs / 16.0),
    };
    cage_segments(cells, style, layout)
        .into_iter()
        .map(|s| Primitive::line(s.from, s.to, stroke))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use test_log::test;

    fn layout() -> Layout {
        Layout::new(&GridConfig { cell_size: 100, ..GridConfig::default() })
    }

    #[test]
    fn single_cell_has_four_inset_sides() {
        let segments = cage_segments(&[(1, 1)], CageStyle::Dash, &layout());
        assert_eq!(segments.len(), 4);
        let left = segments.iter().find(|s| s.side == Side::Left).unwrap();
        assert_eq!(left.from, Point::new(108.0, 108.0));
        assert_eq!(left.to, Point::new(108.0, 192.0));
    }

    #[test]
    fn one_segment_per_open_side() {
        // An L of three cells: 12 sides, 4 shared (2 pairs seen from both sides).
        let cells = [(0, 0), (0, 1), (1, 1)];
        for style in [CageStyle::Dash, CageStyle::Edge] {
            let segments = cage_segments(&cells, style, &layout());
            assert_eq!(segments.len(), 8);
            let mut keys: Vec<_> = segments.iter().map(|s| (s.cell, s.side as u8)).collect();
            keys.dedup();
            assert_eq!(keys.len(), 8);
        }
    }

    #[test]
    fn dashed_lines_meet_around_a_concave_corner() {
        // (1,0) above (1,1), and (0,1) left of (1,1): the corner at (1,1)'s
        // top-left is concave.
        let cells = [(1, 0), (0, 1), (1, 1)];
        let segments = cage_segments(&cells, CageStyle::Dash, &layout());
        let above_left = segments.iter().find(|s| s.cell == (1, 0) && s.side == Side::Left).unwrap();
        let left_top = segments.iter().find(|s| s.cell == (0, 1) && s.side == Side::Top).unwrap();
        // Both stop at the inset point diagonal to the corner.
        assert_eq!(above_left.to, Point::new(108.0, 108.0));
        assert_eq!(left_top.to, above_left.to);
    }

    #[test]
    fn diagonal_neighbour_extends_the_inset_line() {
        // (1,1) and (0,0) touch only diagonally; (1,0) links them.
        let cells = [(0, 0), (1, 0), (1, 1)];
        let segments = cage_segments(&cells, CageStyle::Dash, &layout());
        let left = segments.iter().find(|s| s.cell == (1, 1) && s.side == Side::Left).unwrap();
        let bottom = segments.iter().find(|s| s.cell == (0, 0) && s.side == Side::Bottom).unwrap();
        assert_eq!(left.from, Point::new(108.0, 92.0));
        assert_eq!(bottom.to, left.from);
    }

    #[test]
    fn order_of_cells_does_not_change_geometry() {
        let a = cage_segments(&[(0, 0), (1, 0), (1, 1)], CageStyle::Dash, &layout());
        let b = cage_segments(&[(1, 1), (0, 0), (1, 0)], CageStyle::Dash, &layout());
        assert_eq!(a, b);
    }

    #[test]
    fn edge_style_is_flush_and_colored() {
        let prims = cage(&[(0, 0)], CageStyle::Edge, 0, &layout());
        assert_eq!(prims.len(), 4);
        match &prims[0] {
            Primitive::Polyline { points, style, .. } => {
                assert_eq!(points, &vec![Point::new(0.0, 0.0), Point::new(0.0, 100.0)]);
                assert_eq!(style.dash, None);
            }
            other => panic!("unexpected primitive {:?}", other),
        }
    }
}
