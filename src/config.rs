//! Annotation configuration.
//!
//! Every option has a default, so an empty JSON object (or no file at all)
//! yields the standard layout: labels split across 400px margins on both
//! sides, 35px label spacing, circled-number identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::WiremarkError;
use crate::filter::ExclusionRules;
use crate::ir::{IdentifierAlphabet, OVERFLOW_PLACEHOLDER};

/// The default 8-color cycle, as hex strings.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#E60012", // red
    "#0066CC", // blue
    "#009944", // green
    "#FF6600", // orange
    "#9933CC", // purple
    "#00A0E9", // cyan
    "#E4007F", // magenta
    "#8B4513", // brown
];

/// Where labels go.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One margin on the right; every label goes there.
    Single,
    /// Margins on both sides; labels follow the region's horizontal half.
    #[default]
    Bilateral,
}

impl Mode {
    /// Horizontal offset at which the base image is pasted onto the canvas.
    pub fn paste_offset(self, margin_width: u32) -> u32 {
        match self {
            Mode::Single => 0,
            Mode::Bilateral => margin_width,
        }
    }

    /// Output canvas width, or `None` on overflow.
    pub fn canvas_width(self, base_width: u32, margin_width: u32) -> Option<u32> {
        let margins = match self {
            Mode::Single => margin_width,
            Mode::Bilateral => margin_width.checked_mul(2)?,
        };
        base_width.checked_add(margins)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Single => f.write_str("single"),
            Mode::Bilateral => f.write_str("bilateral"),
        }
    }
}

/// An opaque RGB color, written as `#RRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `RRGGBB` (case insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Returns the color as an opaque RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A cyclic color sequence indexed by rank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Color>);

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self(colors)
    }

    /// Returns the color for a rank, cycling through the palette.
    ///
    /// An empty palette yields black; [`AnnotateConfig::validate`] rejects
    /// empty palettes before rendering.
    pub fn color_for(&self, rank: usize) -> Color {
        if self.0.is_empty() {
            return Color::rgb(0, 0, 0);
        }
        self.0[rank % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(
            DEFAULT_PALETTE
                .iter()
                .filter_map(|hex| Color::from_hex(hex))
                .collect(),
        )
    }
}

/// All options recognised by the annotation engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotateConfig {
    /// Single right margin or left/right split.
    pub mode: Mode,

    /// Margin width in pixels, per side.
    pub margin_width: u32,

    /// Minimum vertical distance between two labels on the same side.
    pub label_height: f64,

    /// Cap on the downward de-collision search for one label.
    pub max_deconflict_attempts: u32,

    /// Labels longer than this many characters are shortened on the image.
    pub label_truncate_length: usize,

    /// Colors cycled by rank.
    pub palette: Palette,

    /// Symbols and overflow template for identifiers.
    pub identifier_alphabet: IdentifierAlphabet,

    /// Label font size in pixels.
    pub font_size: f32,

    /// Font file tried before system discovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,

    /// Keywords for regions dropped before ordering. Lists left out of the
    /// file keep their built-in keywords; an empty list disables that rule.
    pub exclusion_rules: ExclusionRules,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            margin_width: 400,
            label_height: 35.0,
            max_deconflict_attempts: 50,
            label_truncate_length: 12,
            palette: Palette::default(),
            identifier_alphabet: IdentifierAlphabet::default(),
            font_size: 22.0,
            font_path: None,
            exclusion_rules: ExclusionRules::default(),
        }
    }
}

impl AnnotateConfig {
    /// Checks that the options describe a renderable layout.
    ///
    /// # Errors
    /// Returns [`WiremarkError::InvalidConfig`] naming the first bad option.
    pub fn validate(&self) -> Result<(), WiremarkError> {
        if self.margin_width == 0 {
            return Err(WiremarkError::InvalidConfig(
                "marginWidth must be positive".into(),
            ));
        }
        if !(self.label_height.is_finite() && self.label_height > 0.0) {
            return Err(WiremarkError::InvalidConfig(format!(
                "labelHeight must be a positive number, got {}",
                self.label_height
            )));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(WiremarkError::InvalidConfig(format!(
                "fontSize must be a positive number, got {}",
                self.font_size
            )));
        }
        if self.palette.is_empty() {
            return Err(WiremarkError::InvalidConfig(
                "palette must contain at least one color".into(),
            ));
        }

        let alphabet = &self.identifier_alphabet;
        if alphabet.overflow_parts().is_none() {
            return Err(WiremarkError::InvalidConfig(format!(
                "identifierAlphabet overflow template '{}' has no standalone '{}' placeholder",
                alphabet.overflow, OVERFLOW_PLACEHOLDER
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for symbol in &alphabet.symbols {
            if symbol.is_empty() {
                return Err(WiremarkError::InvalidConfig(
                    "identifierAlphabet contains an empty symbol".into(),
                ));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(WiremarkError::InvalidConfig(format!(
                    "identifierAlphabet repeats symbol '{}'",
                    symbol
                )));
            }
            if alphabet.is_overflow_token(symbol) {
                return Err(WiremarkError::InvalidConfig(format!(
                    "identifierAlphabet symbol '{}' can also come from overflow template '{}'",
                    symbol, alphabet.overflow
                )));
            }
        }

        Ok(())
    }
}

/// Loads configuration from an optional JSON file.
///
/// Missing keys keep their defaults. The result is validated.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid JSON, or
/// describes an invalid layout.
pub fn load_config(path: Option<&Path>) -> Result<AnnotateConfig, WiremarkError> {
    let config = match path {
        None => AnnotateConfig::default(),
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents).map_err(|source| WiremarkError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?
        }
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnnotateConfig::default();
        assert_eq!(config.mode, Mode::Bilateral);
        assert_eq!(config.margin_width, 400);
        assert_eq!(config.label_height, 35.0);
        assert_eq!(config.max_deconflict_attempts, 50);
        assert_eq!(config.label_truncate_length, 12);
        assert_eq!(config.palette.len(), 8);
        assert_eq!(config.identifier_alphabet.symbols.len(), 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnnotateConfig =
            serde_json::from_str(r#"{"mode": "single", "marginWidth": 300}"#).unwrap();
        assert_eq!(config.mode, Mode::Single);
        assert_eq!(config.margin_width, 300);
        assert_eq!(config.label_height, 35.0);
    }

    #[test]
    fn test_exclusion_rules_from_json() {
        let config: AnnotateConfig =
            serde_json::from_str(r#"{"exclusionRules": {"callToAction": [], "breadcrumb": ["crumbs"]}}"#)
                .unwrap();
        let rules = &config.exclusion_rules;
        assert!(rules.call_to_action.is_empty());
        assert_eq!(rules.breadcrumb, ["crumbs"]);
        assert_eq!(rules.imagery, ExclusionRules::default().imagery);
    }

    #[test]
    fn test_palette_from_json() {
        let config: AnnotateConfig =
            serde_json::from_str(r##"{"palette": ["#000000", "ff0000"]}"##).unwrap();
        assert_eq!(config.palette.color_for(0), Color::rgb(0, 0, 0));
        assert_eq!(config.palette.color_for(1), Color::rgb(255, 0, 0));
        assert_eq!(config.palette.color_for(2), Color::rgb(0, 0, 0));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        assert!(serde_json::from_str::<AnnotateConfig>(r#"{"palette": ["red"]}"#).is_err());
    }

    #[test]
    fn test_palette_cycles_by_rank() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(0), palette.color_for(8));
        assert_eq!(palette.color_for(0).to_string(), "#E60012");
        assert_eq!(palette.color_for(7).to_string(), "#8B4513");
    }

    #[test]
    fn test_mode_geometry() {
        assert_eq!(Mode::Single.canvas_width(1280, 400), Some(1680));
        assert_eq!(Mode::Bilateral.canvas_width(1280, 400), Some(2080));
        assert_eq!(Mode::Single.paste_offset(400), 0);
        assert_eq!(Mode::Bilateral.paste_offset(400), 400);
        assert_eq!(Mode::Bilateral.canvas_width(u32::MAX, 1), None);
    }

    #[test]
    fn test_validate_rejects_duplicate_symbols() {
        let mut config = AnnotateConfig::default();
        config.identifier_alphabet.symbols = vec!["A".into(), "A".into()];
        assert!(matches!(
            config.validate(),
            Err(WiremarkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_template_without_placeholder() {
        let mut config = AnnotateConfig::default();
        config.identifier_alphabet.overflow = "(x)".into();
        assert!(config.validate().is_err());

        config.identifier_alphabet.overflow = "Item".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_symbol_the_template_can_produce() {
        let mut config = AnnotateConfig::default();
        config.identifier_alphabet.symbols = vec!["A".into(), "(3)".into()];
        assert!(matches!(
            config.validate(),
            Err(WiremarkError::InvalidConfig(_))
        ));

        config.identifier_alphabet.symbols = vec!["A".into(), "B".into()];
        config.validate().unwrap();
        let tokens: Vec<String> = (0..3)
            .map(|rank| config.identifier_alphabet.token(rank).to_string())
            .collect();
        assert_eq!(tokens, ["A", "B", "(3)"]);
    }

    #[test]
    fn test_validate_rejects_zero_margin() {
        let config = AnnotateConfig {
            margin_width: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
