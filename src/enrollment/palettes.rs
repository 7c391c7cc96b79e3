//! Palette registry for categorical department colors
//!
//! Loads palettes from palettes.json (embedded at compile time) and provides
//! access by name. Colors repeat once a palette is exhausted.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// Embedded palettes.json content
const PALETTES_JSON: &str = include_str!("../../palettes.json");

/// Global palette registry, initialized lazily on first access
pub static PALETTE_REGISTRY: Lazy<PaletteRegistry> = Lazy::new(|| {
    PaletteRegistry::from_json(PALETTES_JSON).unwrap_or_else(|e| {
        error!("failed to load palettes.json: {}", e);
        PaletteRegistry::default()
    })
});

/// Default categorical palette name (ten hues)
pub const DEFAULT_PALETTE: &str = "Category10";

/// Neutral fallback when a palette is empty or a color fails to parse
const FALLBACK_COLOR: [u8; 3] = [128, 128, 128];

/// A single palette definition from palettes.json
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    pub colors: Vec<String>,
}

impl PaletteDefinition {
    /// Get a color by index (wraps around)
    pub fn get_color(&self, index: usize) -> [u8; 3] {
        if self.colors.is_empty() {
            return FALLBACK_COLOR;
        }
        let idx = index % self.colors.len();
        parse_hex_color(&self.colors[idx]).unwrap_or(FALLBACK_COLOR)
    }

    /// Get the number of colors in this palette
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Registry of all available palettes
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    /// All palettes by name (lowercase keys for case-insensitive lookup)
    palettes: HashMap<String, PaletteDefinition>,
    /// Palette names in file order
    names: Vec<String>,
}

impl PaletteRegistry {
    /// Load palettes from JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        let definitions: Vec<PaletteDefinition> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse palettes JSON: {}", e))?;

        let mut registry = Self::default();
        for def in definitions {
            registry.names.push(def.name.clone());
            registry.palettes.insert(def.name.to_lowercase(), def);
        }

        debug!(count = registry.palettes.len(), "loaded palettes");
        Ok(registry)
    }

    /// Get a palette by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PaletteDefinition> {
        self.palettes.get(&name.to_lowercase())
    }

    /// Get the default categorical palette
    pub fn default_palette(&self) -> Option<&PaletteDefinition> {
        self.get(DEFAULT_PALETTE)
    }

    /// List palette names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Resolve a palette by name, falling back to the default palette
    pub fn resolve(&self, name: &str) -> Option<&PaletteDefinition> {
        self.get(name).or_else(|| {
            warn!("palette '{}' not found, using {}", name, DEFAULT_PALETTE);
            self.default_palette()
        })
    }
}

/// Parse a hex color string to RGB array
///
/// Supports `#RRGGBB`, `#RRGGBBAA` (alpha ignored) and the same without `#`.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 && hex.len() != 8 {
        warn!("invalid hex color length '{}': {}", hex, hex.len());
        return None;
    }

    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

    Some([r, g, b])
}

/// Format an RGB triple as a lowercase `#rrggbb` string
pub fn to_hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("#1f77b4"), Some([31, 119, 180]));
        assert_eq!(parse_hex_color("1F78B4"), Some([31, 120, 180]));
        assert_eq!(parse_hex_color("#440154FF"), Some([68, 1, 84]));

        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("GGGGGG"), None);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex([31, 119, 180]), "#1f77b4");
        assert_eq!(to_hex([0, 0, 0]), "#000000");
    }

    #[test]
    fn test_palette_registry_loads() {
        let registry = &*PALETTE_REGISTRY;
        assert!(!registry.names().is_empty());

        let category10 = registry.get("category10").unwrap();
        assert_eq!(category10.len(), 10);
        assert_eq!(category10.get_color(0), [31, 119, 180]);
        assert_eq!(category10.get_color(1), [255, 127, 14]);
    }

    #[test]
    fn test_palette_names_match_property_values() {
        let values = crate::enrollment::properties::registry()
            .get_property("palette")
            .and_then(|p| p.valid_values.clone())
            .unwrap();
        for name in values {
            assert!(PALETTE_REGISTRY.get(&name).is_some(), "missing palette {}", name);
        }
    }

    #[test]
    fn test_palette_color_wrapping() {
        let palette = PALETTE_REGISTRY.default_palette().unwrap();
        let len = palette.len();
        assert_eq!(palette.get_color(0), palette.get_color(len));
        assert_eq!(palette.get_color(3), palette.get_color(len + 3));
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let palette = PALETTE_REGISTRY.resolve("NoSuchPalette").unwrap();
        assert_eq!(palette.name, DEFAULT_PALETTE);
    }
}
