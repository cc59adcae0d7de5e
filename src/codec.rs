// src/codec.rs

//! Puzzle codes.
//!
//! A puzzle is exchanged as a compact, URL-safe string:
//! MessagePack record -> zlib deflate -> base64 (URL-safe alphabet, no
//! padding). Share links carry it in the `p` query parameter.
//!
//! The wire record is a map with the keys `version`, `grid`, `cells`,
//! `stuff` (decorations), `edges` and `desc` (free-text metadata). Cell
//! entries are positional arrays `[position, lock, text, color, background?]`
//! whose lock code tells clue, color fill and boundary entries apart.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, trace};
use percent_encoding::percent_decode_str;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};

use crate::config::GridConfig;
use crate::decoration::Decoration;
use crate::grid::EdgeKey;
use crate::scene::LineWeight;
use crate::symbols::is_symbol_code;

/// The only record version this build reads and writes.
pub const FORMAT_VERSION: u32 = 2;

/// Query parameter carrying the puzzle code in share links.
pub const CODE_PARAM: &str = "p";

const LOCK_NORMAL: u8 = 1;
const LOCK_COLOR: u8 = 2;
const LOCK_BOUNDARY: u8 = 3;

const DECORATION_PATH: u8 = 1;
const DECORATION_CAGE: u8 = 2;

/// Largest main-grid side a code may declare.
pub const MAX_GRID_SIDE: u32 = 64;
/// Largest margin a code may declare on any side.
pub const MAX_MARGIN: u32 = 16;
/// Largest cell size in pixels a code may declare.
pub const MAX_CELL_SIZE: u32 = 1024;

// --- Decoded Record ---

/// One serialized cell entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRecord {
    /// Authored text or symbol in a cell.
    Clue {
        x: usize,
        y: usize,
        text: String,
        color: u8,
        background: bool,
    },
    /// Authored color fill.
    ColorFill { x: usize, y: usize, color: u8 },
    /// Text or symbol in a boundary region.
    BoundarySymbol {
        x: usize,
        y: usize,
        index: usize,
        text: String,
        color: u8,
        background: bool,
    },
}

/// A serialized (always locked) edge line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub weight: LineWeight,
    pub color: u8,
}

/// Everything a puzzle code carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PuzzleRecord {
    pub grid: GridConfig,
    pub cells: Vec<CellRecord>,
    pub decorations: Vec<Decoration>,
    pub edges: BTreeMap<EdgeKey, EdgeRecord>,
    pub metadata: String,
}

// --- Public API ---

/// Encodes a record into a puzzle code.
pub fn encode(record: &PuzzleRecord) -> Result<String> {
    let wire = WireRecord::from(record);
    let packed = rmp_serde::to_vec_named(&wire).context("Failed to pack puzzle record")?;
    let code = compress_to_base64(&packed)?;
    debug!(
        "Encoded puzzle: {} cells, {} decorations, {} edges -> {} chars",
        record.cells.len(),
        record.decorations.len(),
        record.edges.len(),
        code.len()
    );
    Ok(code)
}

/// Decodes a puzzle code. Fails on anything malformed and on any version
/// other than `FORMAT_VERSION`.
pub fn decode(code: &str) -> Result<PuzzleRecord> {
    let packed = base64_to_packed(code)?;
    let probe: VersionProbe = rmp_serde::from_slice(&packed).context("Failed to read puzzle format version")?;
    if probe.version != FORMAT_VERSION {
        bail!("unsupported puzzle format version {}", probe.version);
    }
    let wire: WireRecord = rmp_serde::from_slice(&packed).context("Malformed puzzle record")?;
    PuzzleRecord::try_from(wire)
}

/// Reads only the metadata of a puzzle code.
pub fn read_metadata(code: &str) -> Result<String> {
    Ok(decode(code)?.metadata)
}

/// Builds a share link for `code`.
pub fn puzzle_url(origin: &str, code: &str) -> String {
    format!("{}/?s=1&{}={}", origin.trim_end_matches('/'), CODE_PARAM, code)
}

/// Extracts the puzzle code from a share link, undoing percent escapes.
pub fn code_from_url(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix(CODE_PARAM)?.strip_prefix('='))?;
    match percent_decode_str(raw).decode_utf8() {
        Ok(code) => Some(code.into_owned()),
        Err(err) => {
            debug!("Ignoring share link with a non-UTF-8 code: {}", err);
            None
        }
    }
}

fn compress_to_base64(packed: &[u8]) -> Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(packed).context("Failed to deflate puzzle record")?;
    let compressed = encoder.finish().context("Failed to finish deflate stream")?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

pub(crate) fn base64_to_packed(code: &str) -> Result<Vec<u8>> {
    // Accept the standard alphabet and padding too.
    let normalized: String = code
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let compressed = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .context("Puzzle code is not valid base64")?;
    let mut packed = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut packed)
        .context("Failed to inflate puzzle code")?;
    trace!("Inflated puzzle code to {} bytes", packed.len());
    Ok(packed)
}

// --- Wire Format ---

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireRecord {
    version: u32,
    grid: WireGrid,
    cells: Vec<WireCell>,
    stuff: Vec<WireDecoration>,
    edges: BTreeMap<String, (String, u8)>,
    desc: String,
}

/// `[cell_size, width, height, left, right, top, bottom, div_width,
/// div_height, style, left_diagonal, right_diagonal]`
#[derive(Debug, Serialize, Deserialize)]
struct WireGrid(u32, u32, u32, u32, u32, u32, u32, u32, u32, String, bool, bool);

/// `[type, style, color, [[x, y], ...]]`
#[derive(Debug, Serialize, Deserialize)]
struct WireDecoration(u8, String, u8, Vec<(u32, u32)>);

/// `[position, lock, text, color, background?]`; the background flag is
/// written for symbols and whenever it is set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WireCell {
    position: Vec<u32>,
    lock: u8,
    text: Option<String>,
    color: u8,
    background: Option<bool>,
}

impl Serialize for WireCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.background.is_some() { 5 } else { 4 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.position)?;
        seq.serialize_element(&self.lock)?;
        seq.serialize_element(&self.text)?;
        seq.serialize_element(&self.color)?;
        if let Some(background) = self.background {
            seq.serialize_element(&background)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for WireCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct WireCellVisitor;

        impl<'de> Visitor<'de> for WireCellVisitor {
            type Value = WireCell;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [position, lock, text, color, background?] cell entry")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<WireCell, A::Error> {
                let position = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let lock = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let text = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(2, &self))?;
                let color = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(3, &self))?;
                let background = seq.next_element::<Option<bool>>()?.flatten();
                Ok(WireCell {
                    position,
                    lock,
                    text,
                    color,
                    background,
                })
            }
        }

        deserializer.deserialize_seq(WireCellVisitor)
    }
}

/// Rejects grid geometry no editor could hold.
fn check_dimensions(grid: &GridConfig) -> Result<()> {
    if grid.cell_size == 0 || grid.cell_size > MAX_CELL_SIZE {
        bail!("cell size {} is out of range (1 to {})", grid.cell_size, MAX_CELL_SIZE);
    }
    for (name, side) in [("width", grid.width), ("height", grid.height)] {
        if side == 0 || side > MAX_GRID_SIDE {
            bail!("grid {} {} is out of range (1 to {})", name, side, MAX_GRID_SIDE);
        }
    }
    for (name, margin) in [
        ("left", grid.left),
        ("right", grid.right),
        ("top", grid.top),
        ("bottom", grid.bottom),
    ] {
        if margin > MAX_MARGIN {
            bail!("{} margin {} exceeds {}", name, margin, MAX_MARGIN);
        }
    }
    Ok(())
}

fn edge_key_string((x, y, index): EdgeKey) -> String {
    format!("{},{},{}", x, y, index)
}

fn parse_edge_key(key: &str) -> Result<EdgeKey> {
    let parts: Vec<usize> = key
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Malformed edge key '{}'", key))?;
    match parts[..] {
        [x, y, index] => Ok((x, y, index)),
        _ => bail!("Edge key '{}' does not have three parts", key),
    }
}

fn text_background(text: &str, background: bool) -> Option<bool> {
    (background || is_symbol_code(text)).then_some(background)
}

fn coords(cells: &[(usize, usize)]) -> Vec<(u32, u32)> {
    cells.iter().map(|&(x, y)| (x as u32, y as u32)).collect()
}

impl From<&PuzzleRecord> for WireRecord {
    fn from(record: &PuzzleRecord) -> Self {
        let g = &record.grid;
        let cells = record
            .cells
            .iter()
            .map(|cell| match cell {
                CellRecord::Clue { x, y, text, color, background } => WireCell {
                    position: vec![*x as u32, *y as u32],
                    lock: LOCK_NORMAL,
                    text: Some(text.clone()),
                    color: *color,
                    background: text_background(text, *background),
                },
                CellRecord::ColorFill { x, y, color } => WireCell {
                    position: vec![*x as u32, *y as u32],
                    lock: LOCK_COLOR,
                    text: None,
                    color: *color,
                    background: None,
                },
                CellRecord::BoundarySymbol { x, y, index, text, color, background } => WireCell {
                    position: vec![*x as u32, *y as u32, *index as u32],
                    lock: LOCK_BOUNDARY,
                    text: Some(text.clone()),
                    color: *color,
                    background: text_background(text, *background),
                },
            })
            .collect();
        let stuff = record
            .decorations
            .iter()
            .map(|decoration| match decoration {
                Decoration::Path { style, color, cells } => {
                    WireDecoration(DECORATION_PATH, style.name().to_string(), *color, coords(cells))
                }
                Decoration::Cage { style, color, cells } => {
                    WireDecoration(DECORATION_CAGE, style.name().to_string(), *color, coords(cells))
                }
            })
            .collect();
        let edges = record
            .edges
            .iter()
            .map(|(key, edge)| (edge_key_string(*key), (edge.weight.name().to_string(), edge.color)))
            .collect();
        WireRecord {
            version: FORMAT_VERSION,
            grid: WireGrid(
                g.cell_size,
                g.width,
                g.height,
                g.left,
                g.right,
                g.top,
                g.bottom,
                g.div_width,
                g.div_height,
                g.style.name().to_string(),
                g.left_diagonal,
                g.right_diagonal,
            ),
            cells,
            stuff,
            edges,
            desc: record.metadata.clone(),
        }
    }
}

impl TryFrom<WireRecord> for PuzzleRecord {
    type Error = anyhow::Error;

    fn try_from(wire: WireRecord) -> Result<Self> {
        if wire.version != FORMAT_VERSION {
            bail!("unsupported puzzle format version {}", wire.version);
        }
        let WireGrid(cell_size, width, height, left, right, top, bottom, div_width, div_height, style, ld, rd) =
            wire.grid;
        let grid = GridConfig {
            cell_size,
            width,
            height,
            left,
            right,
            top,
            bottom,
            div_width,
            div_height,
            style: style.parse()?,
            left_diagonal: ld,
            right_diagonal: rd,
        };
        check_dimensions(&grid)?;
        let (cols, rows) = (grid.total_width(), grid.total_height());
        let in_grid = |x: usize, y: usize| -> Result<()> {
            if x >= cols || y >= rows {
                bail!("position ({}, {}) lies outside the {}x{} grid", x, y, cols, rows);
            }
            Ok(())
        };

        let mut cells = Vec::with_capacity(wire.cells.len());
        for entry in wire.cells {
            let position: Vec<usize> = entry.position.iter().map(|&v| v as usize).collect();
            let background = entry.background.unwrap_or(false);
            let record = match (&position[..], entry.lock, entry.text) {
                (&[x, y], LOCK_NORMAL, Some(text)) => CellRecord::Clue { x, y, text, color: entry.color, background },
                (&[x, y], LOCK_COLOR, _) => CellRecord::ColorFill { x, y, color: entry.color },
                (&[x, y, index], LOCK_BOUNDARY, Some(text)) => CellRecord::BoundarySymbol {
                    x,
                    y,
                    index,
                    text,
                    color: entry.color,
                    background,
                },
                (_, lock, _) => bail!("malformed cell entry at {:?} with lock type {}", position, lock),
            };
            let (x, y) = match record {
                CellRecord::Clue { x, y, .. }
                | CellRecord::ColorFill { x, y, .. }
                | CellRecord::BoundarySymbol { x, y, .. } => (x, y),
            };
            in_grid(x, y)?;
            cells.push(record);
        }

        let mut decorations = Vec::with_capacity(wire.stuff.len());
        for WireDecoration(kind, style, color, points) in wire.stuff {
            let cells: Vec<(usize, usize)> = points.iter().map(|&(x, y)| (x as usize, y as usize)).collect();
            for &(x, y) in &cells {
                in_grid(x, y)?;
            }
            decorations.push(match kind {
                DECORATION_PATH => Decoration::Path { style: style.parse()?, color, cells },
                DECORATION_CAGE => Decoration::Cage { style: style.parse()?, color, cells },
                other => bail!("unknown decoration type {}", other),
            });
        }

        let mut edges = BTreeMap::new();
        for (key, (weight, color)) in wire.edges {
            let key = parse_edge_key(&key)?;
            in_grid(key.0, key.1)?;
            edges.insert(key, EdgeRecord { weight: weight.parse()?, color });
        }

        Ok(PuzzleRecord {
            grid,
            cells,
            decorations,
            edges,
            metadata: wire.desc,
        })
    }
}
