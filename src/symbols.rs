// src/symbols.rs

//! Symbol library.
//!
//! Text starting with `#` is a symbol code `#<page><index>`; anything else is
//! drawn as plain text. Codes resolve through a lookup table to generator
//! functions that lay out the glyph inside a square box. Several codes may be
//! concatenated (`#11#44`) and are drawn on top of each other.

use log::trace;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::color::{Ink, Rgba};
use crate::grid::{Content, Mark};
use crate::layout::Point;
use crate::scene::{star_points, arrow_head, Primitive, ShapeStyle};

pub const SYMBOL_PREFIX: char = '#';

/// Code of the cross glyph, used for cell and boundary crosses.
pub const CROSS_CODE: &str = "#44";

pub fn is_symbol_code(text: &str) -> bool {
    text.starts_with(SYMBOL_PREFIX)
}

/// Text a digit keystroke produces on the given symbol page.
pub fn keystroke_text(page: u8, digit: u8) -> String {
    if page == 0 {
        digit.to_string()
    } else {
        format!("{}{}{}", SYMBOL_PREFIX, page, digit)
    }
}

/// A parsed `#<page><index>` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolCode {
    pub page: u8,
    pub index: u8,
}

impl SymbolCode {
    pub const fn new(page: u8, index: u8) -> Self {
        Self { page, index }
    }

    /// Parses a single code such as `#23`.
    pub fn parse(code: &str) -> Option<Self> {
        Self::parse_body(code.strip_prefix(SYMBOL_PREFIX)?)
    }

    fn parse_body(body: &str) -> Option<Self> {
        let mut digits = body.chars();
        let page = digits.next()?.to_digit(10)? as u8;
        let index = digits.next()?.to_digit(10)? as u8;
        digits.next().is_none().then_some(Self { page, index })
    }

    /// Parses every code in a concatenation; malformed pieces are skipped.
    pub fn parse_all(text: &str) -> Vec<Self> {
        text.split(SYMBOL_PREFIX)
            .filter(|piece| !piece.is_empty())
            .filter_map(Self::parse_body)
            .collect()
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", SYMBOL_PREFIX, self.page, self.index)
    }
}

/// Writes `text` into a content container.
///
/// Empty text clears both the text and the symbol. Symbol codes go to the
/// symbol slot, everything else to the text slot; with `append` set the new
/// text is added to what the slot already holds.
pub fn set_symbol(content: &mut Content, text: &str, ink: Ink, background: bool, append: bool) {
    if text.is_empty() {
        content.text = None;
        content.symbol = None;
        return;
    }
    let slot = if is_symbol_code(text) {
        &mut content.symbol
    } else {
        &mut content.text
    };
    match slot {
        Some(mark) if append => {
            mark.text.push_str(text);
            mark.ink = ink;
            mark.background = background;
        }
        _ => {
            *slot = Some(Mark {
                text: text.to_string(),
                ink,
                background,
            })
        }
    }
}

/// The square a glyph is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub origin: Point,
    pub width: f32,
    pub height: f32,
}

impl GlyphBox {
    pub fn square(origin: Point, size: f32) -> Self {
        Self { origin, width: size, height: size }
    }

    fn size(&self) -> f32 {
        self.width.min(self.height)
    }

    fn cx(&self) -> f32 {
        self.width / 2.0
    }

    fn cy(&self) -> f32 {
        self.height / 2.0
    }

    fn at(&self, x: f32, y: f32) -> Point {
        self.origin.offset(x, y)
    }
}

/// Draws `text` (plain text or symbol codes) into `bx`.
pub fn draw_symbol(text: &str, color: Rgba, bx: &GlyphBox, font_size: f32, background: bool) -> Vec<Primitive> {
    let mut out = Vec::new();
    if text.is_empty() {
        return out;
    }
    if background {
        out.push(Primitive::Rect {
            origin: bx.origin,
            width: bx.width,
            height: bx.height,
            style: ShapeStyle::filled(Rgba::WHITE),
        });
    }
    if !is_symbol_code(text) {
        out.push(Primitive::Text {
            origin: bx.origin,
            width: bx.width,
            height: bx.height,
            font_size,
            text: text.to_string(),
            color,
        });
        return out;
    }
    for code in SymbolCode::parse_all(text) {
        match CATALOGUE.get(&code) {
            Some(generate) => out.extend(generate(bx, color)),
            None => trace!("No glyph registered for symbol {}", code),
        }
    }
    out
}

/// Every registered code, sorted by page and index.
pub fn catalogue_codes() -> Vec<SymbolCode> {
    let mut codes: Vec<_> = CATALOGUE.keys().copied().collect();
    codes.sort();
    codes
}

type GlyphFn = fn(&GlyphBox, Rgba) -> Vec<Primitive>;

static CATALOGUE: Lazy<HashMap<SymbolCode, GlyphFn>> = Lazy::new(|| {
    let table: [(u8, u8, GlyphFn); 37] = [
        (1, 1, |b, c| circle(b, c, Some(c), Some(Rgba::BLACK), false)),
        (1, 2, |b, c| circle(b, c, Some(Rgba::WHITE), Some(c), false)),
        (1, 3, |b, c| circle(b, c, Some(c), Some(Rgba::BLACK), true)),
        (1, 4, |b, c| circle(b, c, None, Some(c), true)),
        (1, 5, |b, c| circle(b, c, Some(c), None, false)),
        (2, 1, |b, c| killer_arrow(b, c, 1)),
        (2, 2, |b, c| killer_arrow(b, c, 2)),
        (2, 3, |b, c| killer_arrow(b, c, 3)),
        (2, 4, |b, c| killer_arrow(b, c, 4)),
        (2, 5, |b, c| killer_arrow(b, c, 5)),
        (2, 6, |b, c| killer_arrow(b, c, 6)),
        (2, 7, |b, c| killer_arrow(b, c, 7)),
        (2, 8, |b, c| killer_arrow(b, c, 8)),
        (3, 1, |b, c| corner_arrow(b, c, 1)),
        (3, 2, |b, c| corner_arrow(b, c, 2)),
        (3, 3, |b, c| corner_arrow(b, c, 3)),
        (3, 4, |b, c| corner_arrow(b, c, 4)),
        (3, 5, |b, c| corner_arrow(b, c, 5)),
        (3, 6, |b, c| corner_arrow(b, c, 6)),
        (3, 7, |b, c| corner_arrow(b, c, 7)),
        (3, 8, |b, c| corner_arrow(b, c, 8)),
        (4, 1, star),
        (4, 2, triangle),
        (4, 3, kakuro_box),
        (4, 4, cross),
        (4, 5, |b, c| chevron(b, c, 5)),
        (4, 6, |b, c| chevron(b, c, 6)),
        (4, 7, |b, c| chevron(b, c, 7)),
        (4, 8, |b, c| chevron(b, c, 8)),
        (5, 1, |b, c| square(b, c, Some(c), Some(Rgba::BLACK), false)),
        (5, 2, |b, c| square(b, c, Some(Rgba::WHITE), Some(c), false)),
        (5, 3, |b, c| square(b, c, Some(c), Some(Rgba::BLACK), true)),
        (5, 4, |b, c| square(b, c, None, Some(c), true)),
        (5, 5, |b, c| square(b, c, Some(c), None, false)),
        (6, 1, |b, c| tick(b, c, true, false)),
        (6, 2, |b, c| tick(b, c, false, true)),
        (6, 3, |b, c| tick(b, c, true, true)),
    ];
    table
        .into_iter()
        .map(|(page, index, generate)| (SymbolCode::new(page, index), generate))
        .collect()
});

// --- Generators ---
//
// Coordinates are relative to the glyph box and proportional to its size.

fn outline_width(size: f32) -> f32 {
    size * 0.06
}

fn dash_length(size: f32) -> f32 {
    size * 0.08
}

fn shape_style(fill: Option<Rgba>, stroke: Option<Rgba>, dashed: bool, size: f32) -> ShapeStyle {
    let mut style = ShapeStyle {
        fill,
        stroke,
        stroke_width: if stroke.is_some() { outline_width(size) } else { 0.0 },
        ..ShapeStyle::default()
    };
    if dashed {
        style = style.with_dash(dash_length(size));
    }
    style
}

fn circle(b: &GlyphBox, _color: Rgba, fill: Option<Rgba>, stroke: Option<Rgba>, dashed: bool) -> Vec<Primitive> {
    let s = b.size();
    vec![Primitive::Circle {
        center: b.at(b.cx(), b.cy()),
        radius: s * 0.35,
        style: shape_style(fill, stroke, dashed, s),
    }]
}

fn square(b: &GlyphBox, _color: Rgba, fill: Option<Rgba>, stroke: Option<Rgba>, dashed: bool) -> Vec<Primitive> {
    let s = b.size();
    let side = s * 0.7;
    vec![Primitive::Rect {
        origin: b.at(b.cx() - side / 2.0, b.cy() - side / 2.0),
        width: side,
        height: side,
        style: shape_style(fill, stroke, dashed, s),
    }]
}

fn arrow(from: Point, to: Point, head: f32, width: f32, color: Rgba) -> Vec<Primitive> {
    let style = ShapeStyle::stroked(color, width);
    let mut out = vec![Primitive::line(from, to, style)];
    if let Some(barbs) = arrow_head(from, to, head) {
        out.push(Primitive::Polyline {
            points: barbs.to_vec(),
            closed: false,
            style,
        });
    }
    out
}

/// Diagonal and straight arrows pointing out of the box center, as used for
/// sum clues outside the grid.
fn killer_arrow(b: &GlyphBox, color: Rgba, index: u8) -> Vec<Primitive> {
    let s = b.size();
    let (o, o2) = (s * 0.05, s * 0.15);
    let (cx, cy) = (b.cx(), b.cy());
    let (w, h) = (b.width, b.height);
    let (from, to) = match index {
        1 => ((cx, cy), (w - o, h - o)),
        2 => ((cx, cy), (w - o, o)),
        3 => ((cx, cy), (o, o)),
        4 => ((cx, cy), (o, h - o)),
        5 => ((o2, cy), (w - o2, cy)),
        6 => ((w - o2, cy), (o2, cy)),
        7 => ((cx, o2), (cx, h - o2)),
        _ => ((cx, h - o2), (cx, o2)),
    };
    arrow(b.at(from.0, from.1), b.at(to.0, to.1), s * 0.3, outline_width(s), color)
}

/// Small arrows along one side of the box, pointing along that side.
fn corner_arrow(b: &GlyphBox, color: Rgba, index: u8) -> Vec<Primitive> {
    let s = b.size();
    let o = s * 0.2;
    let (w, h) = (b.width, b.height);
    let (from, to) = match index {
        1 => ((o, o), (w - o, o)),
        2 => ((w - o, o), (o, o)),
        3 => ((w - o, o), (w - o, h - o)),
        4 => ((w - o, h - o), (w - o, o)),
        5 => ((w - o, h - o), (o, h - o)),
        6 => ((o, h - o), (w - o, h - o)),
        7 => ((o, h - o), (o, o)),
        _ => ((o, o), (o, h - o)),
    };
    arrow(b.at(from.0, from.1), b.at(to.0, to.1), s * 0.1, s * 0.03, color)
}

fn star(b: &GlyphBox, color: Rgba) -> Vec<Primitive> {
    let s = b.size();
    vec![Primitive::Polyline {
        points: star_points(b.at(b.cx(), b.cy()), s * 0.2, s * 0.4, 5),
        closed: true,
        style: shape_style(Some(color), Some(Rgba::BLACK), false, s),
    }]
}

fn triangle(b: &GlyphBox, color: Rgba) -> Vec<Primitive> {
    let s = b.size();
    let o = s * 0.15;
    vec![Primitive::Polyline {
        points: vec![b.at(o, o), b.at(b.width - o, b.cy()), b.at(o, b.height - o)],
        closed: true,
        style: ShapeStyle::filled(color),
    }]
}

fn kakuro_box(b: &GlyphBox, color: Rgba) -> Vec<Primitive> {
    let s = b.size();
    vec![
        Primitive::Rect {
            origin: b.origin,
            width: b.width,
            height: b.height,
            style: ShapeStyle::filled(color),
        },
        Primitive::line(b.at(0.0, 0.0), b.at(b.width, b.height), ShapeStyle::stroked(Rgba::WHITE, outline_width(s))),
    ]
}

fn cross(b: &GlyphBox, color: Rgba) -> Vec<Primitive> {
    let s = b.size();
    let o = s * 0.2;
    let style = ShapeStyle::stroked(color, outline_width(s));
    vec![
        Primitive::line(b.at(o, o), b.at(b.width - o, b.height - o), style),
        Primitive::line(b.at(b.width - o, o), b.at(o, b.height - o), style),
    ]
}

fn chevron(b: &GlyphBox, color: Rgba, index: u8) -> Vec<Primitive> {
    let s = b.size();
    let o = s * 0.3;
    let (w, h, cx, cy) = (b.width, b.height, b.cx(), b.cy());
    let points = match index {
        5 => [(o, o), (w - o, cy), (o, h - o)],
        6 => [(w - o, o), (o, cy), (w - o, h - o)],
        7 => [(o, o), (cx, h - o), (w - o, o)],
        _ => [(o, h - o), (cx, o), (w - o, h - o)],
    };
    vec![Primitive::Polyline {
        points: points.iter().map(|&(x, y)| b.at(x, y)).collect(),
        closed: false,
        style: ShapeStyle::stroked(color, outline_width(s)).round(),
    }]
}

fn tick(b: &GlyphBox, color: Rgba, vertical: bool, horizontal: bool) -> Vec<Primitive> {
    let s = b.size();
    let o = s * 0.2;
    let style = ShapeStyle::stroked(color, outline_width(s));
    let mut out = Vec::new();
    if vertical {
        out.push(Primitive::line(b.at(b.cx(), o), b.at(b.cx(), b.height - o), style));
    }
    if horizontal {
        out.push(Primitive::line(b.at(o, b.cy()), b.at(b.width - o, b.cy()), style));
    }
    out
}
