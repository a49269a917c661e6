//! Page format lookup.
//!
//! Formats are stored portrait-first (width ≤ height); landscape pages are
//! produced by rotating the portrait dimensions.

use crate::core::{
    config::Orientation,
    units::{Dimensions, LengthUnit},
};
use fxhash::FxHashMap;
use once_cell::sync::Lazy;

/// Source of physical page dimensions, indexed by format name
pub trait FormatLookup: Send + Sync {
    /// Portrait dimensions of `name`, if known
    fn get_format(&self, name: &str) -> Option<Dimensions>;

    /// Dimensions of `name` as laid out for `orientation`
    fn page(&self, name: &str, orientation: Orientation) -> Option<Dimensions> {
        self.get_format(name).map(|dims| match orientation {
            Orientation::Portrait => dims,
            Orientation::Landscape => dims.rotated(),
        })
    }
}

static STANDARD_FORMATS: Lazy<FxHashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    let mut formats = FxHashMap::default();
    formats.insert("a0", (841.0, 1189.0));
    formats.insert("a1", (594.0, 841.0));
    formats.insert("a2", (420.0, 594.0));
    formats.insert("a3", (297.0, 420.0));
    formats.insert("a4", (210.0, 297.0));
    formats.insert("a5", (148.0, 210.0));
    formats.insert("a6", (105.0, 148.0));
    formats.insert("b4", (250.0, 353.0));
    formats.insert("b5", (176.0, 250.0));
    formats.insert("letter", (215.9, 279.4));
    formats.insert("legal", (215.9, 355.6));
    formats.insert("tabloid", (279.4, 431.8));
    formats
});

/// ISO 216 A/B sizes and the common North American sizes, in millimeters
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormats;

impl StandardFormats {
    /// Names of every known format, sorted
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<_> = STANDARD_FORMATS.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl FormatLookup for StandardFormats {
    fn get_format(&self, name: &str) -> Option<Dimensions> {
        STANDARD_FORMATS
            .get(name.trim().to_ascii_lowercase().as_str())
            .map(|&(width, height)| Dimensions::new(width, height, LengthUnit::Millimeters))
    }
}
