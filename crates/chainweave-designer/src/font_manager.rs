//! Fonts for printed output: the bundled label face, optional system faces
//! looked up by family name, and a small raster text helper for `image`
//! buffers.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use tracing::{debug, warn};

/// Family name that always resolves to the bundled face.
pub const BUNDLED_FAMILY: &str = "DejaVu Sans Mono";

fn bundled_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let data = include_bytes!("../assets/fonts/DejaVuSansMono-Bold.ttf");
        let font = Font::try_from_bytes(data as &[u8]);
        if font.is_none() {
            warn!("Bundled label font failed to parse");
        }
        font
    })
    .as_ref()
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!("Font database: {} faces", db.len());
        db
    })
}

fn load_system_font(family: &str) -> Option<Font<'static>> {
    let families = match family {
        "Sans" => [Family::SansSerif],
        "Serif" => [Family::Serif],
        "Monospace" => [Family::Monospace],
        other => [Family::Name(other)],
    };
    let id = db().query(&Query {
        families: &families,
        weight: Weight::BOLD,
        stretch: Stretch::Normal,
        style: Style::Normal,
    })?;
    db().with_face_data(id, |data, index| {
        Font::try_from_vec_and_index(data.to_vec(), index)
    })?
}

/// Font for map labels. An empty or unknown family, or one that equals
/// [`BUNDLED_FAMILY`], gives the bundled face; `None` only if that face is
/// unusable.
pub fn label_font(family: Option<&str>) -> Option<&'static Font<'static>> {
    let family = match family.map(str::trim) {
        None | Some("") => return bundled_font(),
        Some(f) if f == BUNDLED_FAMILY => return bundled_font(),
        Some(f) => f,
    };

    static CACHE: OnceLock<Mutex<HashMap<String, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(|p| p.into_inner());
    let font = *cache.entry(family.to_string()).or_insert_with(|| {
        let found = load_system_font(family).map(|f| &*Box::leak(Box::new(f)));
        if found.is_none() {
            debug!("Font family '{}' not installed, using bundled face", family);
        }
        found
    });
    font.or_else(bundled_font)
}

/// Width in pixels of `text` at `height` pixels.
pub fn text_width(font: &Font<'_>, text: &str, height: f32) -> f32 {
    let scale = Scale::uniform(height);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Draws `text` with its top-left corner at `(x, y)`, blending glyph coverage
/// over the existing pixels. Pixels outside the image are clipped.
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'_>,
    text: &str,
    x: f32,
    y: f32,
    height: f32,
    color: Rgba<u8>,
) {
    let scale = Scale::uniform(height);
    let ascent = font.v_metrics(scale).ascent;
    let (w, h) = (img.width() as i32, img.height() as i32);
    for glyph in font.layout(text, scale, point(x, y + ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || py < 0 || px >= w || py >= h {
                return;
            }
            let dst = img.get_pixel_mut(px as u32, py as u32);
            let a = coverage.clamp(0.0, 1.0);
            for c in 0..3 {
                let blended = dst.0[c] as f32 * (1.0 - a) + color.0[c] as f32 * a;
                dst.0[c] = blended.round() as u8;
            }
        });
    }
}
