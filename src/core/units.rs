//! Physical page lengths and unit conversion.
//!
//! All conversions go through millimeters; the inch is defined as exactly 25.4 mm
//! and the PostScript point as 1/72 inch.

use serde::{Deserialize, Serialize};

/// Linear units used for page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[serde(alias = "mm")]
    Millimeters,
    #[serde(alias = "cm")]
    Centimeters,
    #[serde(alias = "in")]
    Inches,
    #[serde(alias = "pt")]
    Points,
}

impl LengthUnit {
    /// How many millimeters fit into one of this unit
    pub fn millimeters(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1.0,
            LengthUnit::Centimeters => 10.0,
            LengthUnit::Inches => 25.4,
            LengthUnit::Points => 25.4 / 72.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Inches => "in",
            LengthUnit::Points => "pt",
        }
    }

    fn convert(self, value: f64, target: LengthUnit) -> f64 {
        if self == target {
            value
        } else {
            value * self.millimeters() / target.millimeters()
        }
    }
}

/// A single physical length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Returns the same length expressed in `unit`
    pub fn to(&self, unit: LengthUnit) -> Length {
        Length::new(self.unit.convert(self.value, unit), unit)
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit.symbol())
    }
}

/// Width and height of a page in one unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    width: f64,
    height: f64,
    unit: LengthUnit,
}

impl Dimensions {
    pub fn new(width: f64, height: f64, unit: LengthUnit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn to(&self, unit: LengthUnit) -> Dimensions {
        Dimensions::new(
            self.unit.convert(self.width, unit),
            self.unit.convert(self.height, unit),
            unit,
        )
    }

    /// Swaps width and height
    pub fn rotated(&self) -> Dimensions {
        Dimensions::new(self.height, self.width, self.unit)
    }

    /// The longer of the two edges
    pub fn longest_edge(&self) -> Length {
        Length::new(self.width.max(self.height), self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversion() {
        let a4_width = Length::new(210.0, LengthUnit::Millimeters);
        assert!((a4_width.to(LengthUnit::Centimeters).value() - 21.0).abs() < 1e-12);
        assert!((a4_width.to(LengthUnit::Inches).value() - 8.267716535).abs() < 1e-8);

        let letter = Length::new(8.5, LengthUnit::Inches);
        assert!((letter.to(LengthUnit::Points).value() - 612.0).abs() < 1e-9);
        assert_eq!(letter.to(LengthUnit::Inches), letter);
    }

    #[test]
    fn test_dimensions_conversion() {
        let a4 = Dimensions::new(210.0, 297.0, LengthUnit::Millimeters).to(LengthUnit::Centimeters);
        assert!((a4.width() - 21.0).abs() < 1e-12);
        assert!((a4.height() - 29.7).abs() < 1e-12);
        assert_eq!(a4.unit(), LengthUnit::Centimeters);

        let landscape = a4.rotated();
        assert_eq!(landscape.width(), a4.height());
        assert_eq!(landscape.longest_edge().value(), a4.height());
    }

    #[test]
    fn test_unit_aliases() {
        let unit: LengthUnit = serde_json::from_str("\"mm\"").unwrap();
        assert_eq!(unit, LengthUnit::Millimeters);
        let unit: LengthUnit = serde_json::from_str("\"inches\"").unwrap();
        assert_eq!(unit, LengthUnit::Inches);
    }
}
