//! Bill of materials aggregation.
//!
//! Every ring color is first snapped to the palette, then counted per palette
//! entry. Lines are emitted in palette order, so the output never depends on
//! hash-map iteration order or on the order rings were placed in.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use chainweave_core::constants::BOM_ROWS_PER_PAGE;

use crate::color::HexColor;
use crate::palette::Palette;

/// Which palette entries get a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BomMode {
    /// Only colors that are actually used.
    #[default]
    UsedOnly,
    /// Every palette entry, zero counts included, for a fill-in order sheet.
    FullSheet,
}

/// One orderable color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BomLine {
    /// 1-based palette index.
    pub index: usize,
    pub hex: HexColor,
    pub name: String,
    pub count: usize,
    pub packs: usize,
    pub supplier: Option<String>,
    pub material: Option<String>,
}

/// A complete bill of materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bom {
    pub palette_name: String,
    pub pack_size: usize,
    pub mode: BomMode,
    pub lines: Vec<BomLine>,
    pub total_rings: usize,
    pub total_packs: usize,
}

/// A printed page of BOM lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BomPage<'a> {
    /// 1-based page number.
    pub number: usize,
    pub page_count: usize,
    pub lines: &'a [BomLine],
}

/// Packs needed for `count` rings. A zero pack size is treated as one.
pub fn packs_for(count: usize, pack_size: usize) -> usize {
    count.div_ceil(pack_size.max(1))
}

/// Builds a BOM from ring colors.
pub fn build_bom<I>(colors: I, palette: &Palette, pack_size: usize, mode: BomMode) -> Bom
where
    I: IntoIterator<Item = HexColor>,
{
    let pack_size = pack_size.max(1);
    let mut counts = vec![0usize; palette.len()];
    let mut cache: HashMap<HexColor, usize> = HashMap::new();
    let mut total_rings = 0;

    for color in colors {
        let index = *cache
            .entry(color)
            .or_insert_with(|| palette.quantize(color).index);
        counts[index - 1] += 1;
        total_rings += 1;
    }

    let lines: Vec<BomLine> = palette
        .entries()
        .iter()
        .zip(counts)
        .enumerate()
        .filter(|(_, (_, count))| mode == BomMode::FullSheet || *count > 0)
        .map(|(i, (entry, count))| BomLine {
            index: i + 1,
            hex: entry.hex,
            name: entry.name.clone(),
            count,
            packs: packs_for(count, pack_size),
            supplier: entry.supplier.clone(),
            material: entry.material.clone(),
        })
        .collect();

    let total_packs = lines.iter().map(|l| l.packs).sum();
    debug!(
        "BOM: {} rings, {} lines, {} packs",
        total_rings,
        lines.len(),
        total_packs
    );

    Bom {
        palette_name: palette.name().to_string(),
        pack_size,
        mode,
        lines,
        total_rings,
        total_packs,
    }
}

impl Bom {
    /// Lines with a non-zero count.
    pub fn used_lines(&self) -> impl Iterator<Item = &BomLine> {
        self.lines.iter().filter(|l| l.count > 0)
    }

    pub fn line_for(&self, hex: HexColor) -> Option<&BomLine> {
        self.lines.iter().find(|l| l.hex == hex)
    }

    /// Splits the lines into print pages of `rows_per_page` lines (at least one page).
    pub fn pages(&self, rows_per_page: usize) -> Vec<BomPage<'_>> {
        let rows = rows_per_page.max(1);
        let page_count = self.lines.len().div_ceil(rows).max(1);
        if self.lines.is_empty() {
            return vec![BomPage {
                number: 1,
                page_count,
                lines: &[],
            }];
        }
        self.lines
            .chunks(rows)
            .enumerate()
            .map(|(i, lines)| BomPage {
                number: i + 1,
                page_count,
                lines,
            })
            .collect()
    }

    pub fn default_pages(&self) -> Vec<BomPage<'_>> {
        self.pages(BOM_ROWS_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> HexColor {
        s.parse().unwrap()
    }

    #[test]
    fn test_scenario_red_green() {
        let palette = Palette::default();
        let colors = [hex("#ff0000"), hex("#00ff00"), hex("#ff0000")];
        let bom = build_bom(colors, &palette, 1500, BomMode::UsedOnly);
        assert_eq!(bom.lines.len(), 2);
        let red = bom.line_for(hex("#ff0000")).unwrap();
        assert_eq!((red.count, red.packs), (2, 1));
        let green = bom.line_for(hex("#00ff00")).unwrap();
        assert_eq!((green.count, green.packs), (1, 1));
        assert_eq!(bom.total_rings, 3);
        assert_eq!(bom.total_packs, 2);
    }

    #[test]
    fn test_near_colors_count_together() {
        let palette = Palette::default();
        let colors = [hex("#ff0000"), hex("#fd0203")];
        let bom = build_bom(colors, &palette, 1500, BomMode::UsedOnly);
        assert_eq!(bom.lines.len(), 1);
        assert_eq!(bom.lines[0].count, 2);
    }

    #[test]
    fn test_full_sheet_lists_every_entry() {
        let palette = Palette::default();
        let bom = build_bom([hex("#ff0000")], &palette, 1500, BomMode::FullSheet);
        assert_eq!(bom.lines.len(), 24);
        assert!(bom.lines.windows(2).all(|w| w[0].index < w[1].index));
        assert_eq!(bom.used_lines().count(), 1);
        assert_eq!(bom.lines[0].packs, 0);
    }

    #[test]
    fn test_packs_round_up() {
        assert_eq!(packs_for(0, 1500), 0);
        assert_eq!(packs_for(1, 1500), 1);
        assert_eq!(packs_for(1500, 1500), 1);
        assert_eq!(packs_for(1501, 1500), 2);
        assert_eq!(packs_for(3, 0), 3);
    }

    #[test]
    fn test_pagination() {
        let palette = Palette::default();
        let bom = build_bom(std::iter::empty(), &palette, 1500, BomMode::FullSheet);
        let pages = bom.default_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 12);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].page_count, 2);

        let empty = build_bom(std::iter::empty(), &palette, 1500, BomMode::UsedOnly);
        assert_eq!(empty.pages(12).len(), 1);
    }
}
