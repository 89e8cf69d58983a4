//! Export formats: ring CSV, BOM tables and the printable assembly map.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

use crate::bom::Bom;
use crate::calibration::CalibrationContext;
use crate::color::HexColor;
use crate::font_manager::{draw_text, label_font, text_width};
use crate::geometry::RingGeometry;
use crate::lattice::{CellKey, LatticeSpan};
use crate::palette::Palette;
use crate::ring_store::RingStore;

pub const RING_CSV_HEADER: &str = "row,col,colorHex,paletteIndex,innerDiameter,wireDiameter";

/// One CSV line per ring in row-major order.
///
/// When the rings fill their bounding rows and columns completely, the row
/// and column extents are written as `#` comment lines before the header.
pub fn rings_to_csv(store: &RingStore, geometry: &RingGeometry, palette: &Palette) -> String {
    let mut out = String::new();
    if let Some(span) = store.span() {
        if span.cell_count() == store.len() {
            let _ = writeln!(
                out,
                "# rows: {}..{} ({})",
                span.min_row,
                span.max_row,
                span.rows()
            );
            let _ = writeln!(
                out,
                "# cols: {}..{} ({})",
                span.min_col,
                span.max_col,
                span.cols()
            );
        }
    }
    out.push_str(RING_CSV_HEADER);
    out.push('\n');

    let mut indices: HashMap<HexColor, usize> = HashMap::new();
    for (key, ring) in store.snapshot() {
        let index = *indices
            .entry(ring.color)
            .or_insert_with(|| palette.quantize(ring.color).index);
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            key.row, key.col, ring.color, index, geometry.inner_diameter, geometry.wire_diameter
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// BOM as CSV: `index,hex,name,count,packs,supplier,material`.
pub fn bom_to_csv(bom: &Bom) -> String {
    let mut out = String::from("index,hex,name,count,packs,supplier,material\n");
    for line in &bom.lines {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            line.index,
            line.hex,
            csv_field(&line.name),
            line.count,
            line.packs,
            csv_field(line.supplier.as_deref().unwrap_or("")),
            csv_field(line.material.as_deref().unwrap_or(""))
        );
    }
    out
}

/// Plain-text order sheet pages. Totals are printed on the last page.
pub fn bom_print_pages(bom: &Bom, rows_per_page: usize) -> Vec<String> {
    let pages = bom.pages(rows_per_page);
    let last = pages.len();
    pages
        .iter()
        .map(|page| {
            let mut text = String::new();
            let _ = writeln!(
                text,
                "Order sheet: {} (page {}/{})",
                bom.palette_name, page.number, page.page_count
            );
            let _ = writeln!(text, "Pack size: {}", bom.pack_size);
            let _ = writeln!(
                text,
                "{:>3}  {:<8}  {:<20}  {:>7}  {:>5}",
                "#", "Color", "Name", "Count", "Packs"
            );
            for line in page.lines {
                let _ = writeln!(
                    text,
                    "{:>3}  {:<8}  {:<20}  {:>7}  {:>5}",
                    line.index,
                    line.hex.to_string(),
                    line.name,
                    line.count,
                    line.packs
                );
            }
            if page.number == last {
                let _ = writeln!(
                    text,
                    "Total: {} rings, {} packs",
                    bom.total_rings, bom.total_packs
                );
            }
            text
        })
        .collect()
}

/// Layout of the printable assembly map.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyMapOptions {
    /// Pixels per center spacing.
    pub cell_px: u32,
    /// Lattice rows per tile.
    pub tile_rows: usize,
    /// Lattice columns per tile.
    pub tile_cols: usize,
    /// Blank border around each tile, in pixels.
    pub margin_px: u32,
    /// Print each ring's palette number inside it.
    pub label_rings: bool,
    /// Installed font family for labels; the bundled face when `None`.
    pub font_family: Option<String>,
}

impl Default for AssemblyMapOptions {
    fn default() -> Self {
        Self {
            cell_px: 32,
            tile_rows: 40,
            tile_cols: 30,
            margin_px: 24,
            label_rings: true,
            font_family: None,
        }
    }
}

/// One printed page of the assembly map.
#[derive(Debug, Clone)]
pub struct AssemblyTile {
    /// 1-based tile number, row-major across the map.
    pub number: usize,
    pub span: LatticeSpan,
    pub image: RgbaImage,
}

#[derive(Debug, Clone)]
pub struct AssemblyMap {
    pub tiles: Vec<AssemblyTile>,
    pub tiles_across: usize,
    pub tiles_down: usize,
}

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const EMPTY_MARK: Rgba<u8> = Rgba([225, 225, 225, 255]);
const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

/// Rasterizes the rings into numbered tiles covering the occupied span.
/// With `label_rings` each ring carries the 1-based index of its nearest
/// palette color, matching the BOM lines. Returns an empty map when there
/// are no rings.
pub fn build_assembly_map(
    store: &RingStore,
    geometry: &RingGeometry,
    palette: &Palette,
    calibration: &CalibrationContext,
    options: &AssemblyMapOptions,
) -> AssemblyMap {
    let Some(span) = store.span() else {
        return AssemblyMap {
            tiles: Vec::new(),
            tiles_across: 0,
            tiles_down: 0,
        };
    };
    let tile_rows = options.tile_rows.max(1);
    let tile_cols = options.tile_cols.max(1);
    let tiles_down = span.rows().div_ceil(tile_rows);
    let tiles_across = span.cols().div_ceil(tile_cols);

    let mut tiles = Vec::with_capacity(tiles_down * tiles_across);
    for ty in 0..tiles_down {
        for tx in 0..tiles_across {
            let min_row = span.min_row + (ty * tile_rows) as i32;
            let min_col = span.min_col + (tx * tile_cols) as i32;
            let tile_span = LatticeSpan {
                min_row,
                max_row: (min_row + tile_rows as i32 - 1).min(span.max_row),
                min_col,
                max_col: (min_col + tile_cols as i32 - 1).min(span.max_col),
            };
            let number = tiles.len() + 1;
            let image = render_tile(
                store,
                geometry,
                palette,
                calibration,
                options,
                &tile_span,
                number,
            );
            tiles.push(AssemblyTile {
                number,
                span: tile_span,
                image,
            });
        }
    }

    AssemblyMap {
        tiles,
        tiles_across,
        tiles_down,
    }
}

fn render_tile(
    store: &RingStore,
    geometry: &RingGeometry,
    palette: &Palette,
    calibration: &CalibrationContext,
    options: &AssemblyMapOptions,
    span: &LatticeSpan,
    number: usize,
) -> RgbaImage {
    let cell = options.cell_px.max(4) as f64;
    let scale = cell / geometry.center_spacing;
    let pitch = geometry.lattice().row_pitch() * scale;
    let margin = options.margin_px as f64;
    // One extra half cell on each side covers the odd-row stagger and ring radius.
    let width = (span.cols() as f64 * cell + cell * 1.5 + margin * 2.0).ceil() as u32;
    let height = ((span.rows() as f64 - 1.0) * pitch + cell + margin * 2.0).ceil() as u32;
    let mut img = RgbaImage::from_pixel(width.max(1), height.max(1), BACKGROUND);

    let lattice = geometry.lattice();
    let origin = lattice.cell_to_logical(CellKey::new(span.min_row, span.min_col));
    let even_origin_x = span.min_col as f64 * geometry.center_spacing;
    let outer = geometry.outer_diameter() / 2.0 * scale;
    let inner = (geometry.inner_diameter / 2.0) * scale;
    let font = label_font(options.font_family.as_deref());
    // Labels sit in the ring hole; two digits must fit across it.
    let label_px = (inner * 1.1).min(cell * 0.5) as f32;
    let ring_font = font.filter(|_| options.label_rings && label_px >= 6.0);
    let mut labels: Vec<(f64, f64, HexColor)> = Vec::new();

    for row in span.min_row..=span.max_row {
        for col in span.min_col..=span.max_col {
            let key = CellKey::new(row, col);
            let p = lattice.cell_to_logical(key);
            let cx = margin + cell * 0.5 + (p.x - even_origin_x) * scale;
            let cy = margin + cell * 0.5 + (p.y - origin.y) * scale;
            match store.get(key) {
                Some(ring) => {
                    let color = calibration.display_color(ring.color);
                    let [r, g, b] = color.to_rgb8();
                    fill_annulus(&mut img, cx, cy, inner, outer, Rgba([r, g, b, 255]));
                    labels.push((cx, cy, ring.color));
                }
                None => fill_annulus(&mut img, cx, cy, 0.0, 1.5, EMPTY_MARK),
            }
        }
    }

    // Neighboring rings overlap, so labels go on top once every ring is drawn.
    if let Some(font) = ring_font {
        let mut text: HashMap<HexColor, String> = HashMap::new();
        for (cx, cy, color) in labels {
            let label = text
                .entry(color)
                .or_insert_with(|| palette.quantize(color).index.to_string());
            let w = text_width(font, label, label_px);
            let x = cx as f32 - w / 2.0;
            let y = cy as f32 - label_px / 2.0;
            draw_text(&mut img, font, label, x, y, label_px, INK);
        }
    }

    if let Some(font) = font {
        let title_px = (margin * 0.5).max(8.0) as f32;
        let inset = (margin * 0.2) as f32;
        let title = format!(
            "{}  rows {}..{}  cols {}..{}",
            number, span.min_row, span.max_row, span.min_col, span.max_col
        );
        draw_text(&mut img, font, &title, inset, inset, title_px, INK);
    }
    img
}

fn fill_annulus(img: &mut RgbaImage, cx: f64, cy: f64, inner: f64, outer: f64, color: Rgba<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x0 = ((cx - outer).floor() as i64).max(0);
    let x1 = ((cx + outer).ceil() as i64).min(w - 1);
    let y0 = ((cy - outer).floor() as i64).max(0);
    let y1 = ((cy + outer).ceil() as i64).min(h - 1);
    let (inner2, outer2) = (inner * inner, outer * outer);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let d2 = dx * dx + dy * dy;
            if d2 <= outer2 && d2 >= inner2 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Writes the tiles as PNG files. A single tile goes to `path`; several tiles
/// go to `<stem>-<n>.<ext>` next to it.
pub fn save_assembly_map(map: &AssemblyMap, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let mut written = Vec::with_capacity(map.tiles.len());
    for tile in &map.tiles {
        let target = if map.tiles.len() == 1 {
            path.to_path_buf()
        } else {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("assembly-map");
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
            path.with_file_name(format!("{}-{}.{}", stem, tile.number, ext))
        };
        tile.image
            .save(&target)
            .with_context(|| format!("Failed to write assembly map tile {}", target.display()))?;
        written.push(target);
    }
    Ok(written)
}
