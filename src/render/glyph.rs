//! Glyph providers: measuring and drawing label text.
//!
//! Font discovery depends on the machine, so the compositor never looks for
//! fonts itself. A [`GlyphProvider`] is resolved once at startup with
//! [`resolve_glyphs`] and passed in. Resolution never fails; it walks a
//! fallback chain and ends at a built-in 8x8 bitmap font.

use std::path::Path;

use ab_glyph::{FontArc, FontVec};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Measures and draws single-line label text.
pub trait GlyphProvider: Send + Sync {
    /// Short description of where the glyphs came from, for logs.
    fn source(&self) -> &str;

    /// Returns the `(width, height)` in pixels of `text` at `px` size.
    fn text_size(&self, text: &str, px: f32) -> (u32, u32);

    /// Draws `text` with its top-left corner at `(x, y)`.
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        color: Rgba<u8>,
        x: i32,
        y: i32,
        px: f32,
        text: &str,
    );
}

/// Glyphs from a TrueType/OpenType font file.
pub struct OutlineGlyphs {
    font: FontArc,
    source: String,
}

impl OutlineGlyphs {
    /// Loads face `index` of a font file or collection from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>, index: u32, source: impl Into<String>) -> Option<Self> {
        let font = FontVec::try_from_vec_and_index(bytes, index).ok()?;
        Some(Self {
            font: FontArc::new(font),
            source: source.into(),
        })
    }

    /// Loads the first face of a font file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        Self::from_bytes(bytes, 0, path.display().to_string())
    }
}

impl GlyphProvider for OutlineGlyphs {
    fn source(&self) -> &str {
        &self.source
    }

    fn text_size(&self, text: &str, px: f32) -> (u32, u32) {
        text_size(px, &self.font, text)
    }

    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        color: Rgba<u8>,
        x: i32,
        y: i32,
        px: f32,
        text: &str,
    ) {
        draw_text_mut(canvas, color, x, y, px, &self.font, text);
    }
}

/// The built-in 8x8 bitmap font, scaled by whole pixels.
///
/// Covers basic Latin only; other characters render as `?`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapGlyphs;

impl BitmapGlyphs {
    const CELL: i32 = 8;

    fn scale(px: f32) -> i32 {
        ((px / Self::CELL as f32).round() as i32).max(1)
    }
}

impl GlyphProvider for BitmapGlyphs {
    fn source(&self) -> &str {
        "built-in 8x8 bitmap"
    }

    fn text_size(&self, text: &str, px: f32) -> (u32, u32) {
        let cell = (Self::CELL * Self::scale(px)) as u32;
        (text.chars().count() as u32 * cell, cell)
    }

    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        color: Rgba<u8>,
        x: i32,
        y: i32,
        px: f32,
        text: &str,
    ) {
        let scale = Self::scale(px);
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);
        let mut cursor_x = x;

        for ch in text.chars() {
            let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
            if let Some(glyph) = glyph {
                for (row_idx, row_bits) in glyph.iter().enumerate() {
                    for col_idx in 0..Self::CELL {
                        if (*row_bits >> col_idx) & 1 == 0 {
                            continue;
                        }
                        let px0 = cursor_x + col_idx * scale;
                        let py0 = y + row_idx as i32 * scale;
                        for sy in 0..scale {
                            for sx in 0..scale {
                                let (tx, ty) = (px0 + sx, py0 + sy);
                                if tx >= 0 && ty >= 0 && tx < width && ty < height {
                                    canvas.put_pixel(tx as u32, ty as u32, color);
                                }
                            }
                        }
                    }
                }
            }
            cursor_x += Self::CELL * scale;
        }
    }
}

/// Fonts known to carry CJK glyphs (circled numerals included), per platform.
fn platform_font_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
            "/Library/Fonts/Arial Unicode.ttf",
            "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            "C:/Windows/Fonts/meiryo.ttc",
            "C:/Windows/Fonts/msgothic.ttc",
            "C:/Windows/Fonts/YuGothM.ttc",
        ]
    } else {
        &[
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/opentype/noto/NotoSansCJK.ttc",
            "/usr/share/fonts/opentype/ipafont-gothic/ipagp.ttf",
            "/usr/share/fonts/truetype/takao-gothic/TakaoGothic.ttf",
        ]
    }
}

/// Asks the system font database for any sans-serif face.
fn system_sans_serif() -> Option<OutlineGlyphs> {
    let mut db = Database::new();
    db.load_system_fonts();

    let query = Query {
        families: &[Family::SansSerif],
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db.query(&query)?;
    let family = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "sans-serif".to_string());

    db.with_face_data(id, |data, index| {
        OutlineGlyphs::from_bytes(data.to_vec(), index, format!("system font '{}'", family))
    })
    .flatten()
}

/// Resolves the glyph provider used for every render in this process.
///
/// Order: the explicit `font_path`, the platform's CJK font candidates, the
/// system's generic sans-serif face, and finally [`BitmapGlyphs`].
pub fn resolve_glyphs(font_path: Option<&Path>) -> Box<dyn GlyphProvider> {
    if let Some(path) = font_path {
        match OutlineGlyphs::from_path(path) {
            Some(glyphs) => return Box::new(glyphs),
            None => tracing::warn!(path = %path.display(), "cannot load font; falling back"),
        }
    }

    for candidate in platform_font_candidates() {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        if let Some(glyphs) = OutlineGlyphs::from_path(path) {
            tracing::debug!(font = %glyphs.source(), "using platform font");
            return Box::new(glyphs);
        }
    }

    if let Some(glyphs) = system_sans_serif() {
        tracing::info!(font = %glyphs.source(), "no CJK font found; labels may miss glyphs");
        return Box::new(glyphs);
    }

    tracing::warn!("no usable system font; using built-in bitmap font");
    Box::new(BitmapGlyphs)
}
