use crate::{
    core::{
        config::ScaleUnit,
        constants::{METERS_PER_FOOT, METERS_PER_MILE, METERS_PER_NAUTICAL_MILE},
    },
    print::scale::CalibrationResult,
    traits::{ControlHost, MapControl},
    PrintError, Result,
};
use serde::{Deserialize, Serialize};
use std::{any::Any, str::FromStr};

/// Corner of the map a control is docked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "top-left",
            ControlPosition::TopRight => "top-right",
            ControlPosition::BottomLeft => "bottom-left",
            ControlPosition::BottomRight => "bottom-right",
        }
    }
}

impl FromStr for ControlPosition {
    type Err = PrintError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "top-left" => Ok(ControlPosition::TopLeft),
            "top-right" => Ok(ControlPosition::TopRight),
            "bottom-left" => Ok(ControlPosition::BottomLeft),
            "bottom-right" => Ok(ControlPosition::BottomRight),
            other => Err(PrintError::Control(format!("unknown position {other:?}"))),
        }
    }
}

/// Constructor options for a graphical scale bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleControlOptions {
    /// Absolute width cap of the bar in CSS pixels
    pub max_width: f64,
    pub unit: ScaleUnit,
}

/// What a scale bar shows for a given ground resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBarReading {
    pub width_px: f64,
    pub distance: f64,
    pub unit_label: &'static str,
}

impl ScaleBarReading {
    pub fn label(&self) -> String {
        format!("{} {}", self.distance, self.unit_label)
    }
}

/// Graphical scale bar: picks a round distance that fits under `max_width`
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBarControl {
    options: ScaleControlOptions,
}

impl ScaleBarControl {
    pub fn new(options: ScaleControlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScaleControlOptions {
        &self.options
    }

    /// Bar width and label for a map showing `meters_per_pixel` at the bar
    pub fn measure(&self, meters_per_pixel: f64) -> ScaleBarReading {
        let max_width = self.options.max_width;
        let max_meters = meters_per_pixel * max_width;

        let (max_distance, unit_label) = match self.options.unit {
            ScaleUnit::Metric if max_meters >= 1000.0 => (max_meters / 1000.0, "km"),
            ScaleUnit::Metric => (max_meters, "m"),
            ScaleUnit::Imperial => {
                let max_feet = max_meters / METERS_PER_FOOT;
                if max_meters >= METERS_PER_MILE {
                    (max_meters / METERS_PER_MILE, "mi")
                } else {
                    (max_feet, "ft")
                }
            }
            ScaleUnit::Nautical => (max_meters / METERS_PER_NAUTICAL_MILE, "nm"),
        };

        let distance = round_distance(max_distance);
        let width_px = if max_distance > 0.0 {
            max_width * distance / max_distance
        } else {
            0.0
        };

        ScaleBarReading {
            width_px,
            distance,
            unit_label,
        }
    }
}

/// Largest value of the form {1, 2, 3, 5} x 10^n not exceeding `value`
fn round_distance(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    let pow10 = 10_f64.powf(value.log10().floor());
    let d = value / pow10;
    let d = if d >= 10.0 {
        10.0
    } else if d >= 5.0 {
        5.0
    } else if d >= 3.0 {
        3.0
    } else if d >= 2.0 {
        2.0
    } else {
        1.0
    };
    pow10 * d
}

impl MapControl for ScaleBarControl {
    fn kind(&self) -> &str {
        "scale"
    }

    fn on_add(&mut self, host: &ControlHost) -> Result<()> {
        if !self.options.max_width.is_finite() || self.options.max_width <= 0.0 {
            return Err(PrintError::Control(format!(
                "scale bar needs a positive width, got {}",
                self.options.max_width
            ))
            .into());
        }
        // The bar can never be wider than the map it sits on
        self.options.max_width = self.options.max_width.min(host.container_width);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Numeric scale legend ("1 cm = 200 m") for printed output
#[derive(Debug, Clone, PartialEq)]
pub struct NumericScaleControl {
    calibration: CalibrationResult,
}

impl NumericScaleControl {
    pub fn new(calibration: CalibrationResult) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> CalibrationResult {
        self.calibration
    }

    pub fn label(&self) -> String {
        self.calibration.legend()
    }
}

impl MapControl for NumericScaleControl {
    fn kind(&self) -> &str {
        "numeric-scale"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(max_width: f64, unit: ScaleUnit) -> ScaleBarControl {
        ScaleBarControl::new(ScaleControlOptions { max_width, unit })
    }

    #[test]
    fn test_round_distance() {
        assert_eq!(round_distance(7.3), 5.0);
        assert_eq!(round_distance(2.9), 2.0);
        assert_eq!(round_distance(480.0), 300.0);
        assert_eq!(round_distance(1.0), 1.0);
        assert!((round_distance(0.42) - 0.3).abs() < 1e-12);
        assert_eq!(round_distance(0.0), 0.0);
    }

    #[test]
    fn test_metric_bar() {
        // 100 px at 12 m/px = 1200 m -> 1 km bar of 83.33 px
        let reading = bar(100.0, ScaleUnit::Metric).measure(12.0);
        assert_eq!(reading.unit_label, "km");
        assert_eq!(reading.distance, 1.0);
        assert!((reading.width_px - 100.0 / 1.2).abs() < 1e-9);
        assert_eq!(reading.label(), "1 km");

        let reading = bar(100.0, ScaleUnit::Metric).measure(2.5);
        assert_eq!(reading.unit_label, "m");
        assert_eq!(reading.distance, 200.0);
        assert!((reading.width_px - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_imperial_and_nautical_bars() {
        let reading = bar(100.0, ScaleUnit::Imperial).measure(1.0);
        assert_eq!(reading.unit_label, "ft");
        assert_eq!(reading.distance, 300.0);

        let reading = bar(200.0, ScaleUnit::Imperial).measure(50.0);
        assert_eq!(reading.unit_label, "mi");
        assert_eq!(reading.distance, 5.0);

        let reading = bar(100.0, ScaleUnit::Nautical).measure(40.0);
        assert_eq!(reading.unit_label, "nm");
        assert_eq!(reading.distance, 2.0);
    }

    #[test]
    fn test_bar_is_capped_by_container() {
        let mut control = bar(900.0, ScaleUnit::Metric);
        let host = ControlHost {
            container_width: 640.0,
            container_height: 480.0,
        };
        control.on_add(&host).unwrap();
        assert_eq!(control.options().max_width, 640.0);

        let mut broken = bar(-1.0, ScaleUnit::Metric);
        assert!(broken.on_add(&host).is_err());
    }

    #[test]
    fn test_position_names() {
        for position in [
            ControlPosition::TopLeft,
            ControlPosition::TopRight,
            ControlPosition::BottomLeft,
            ControlPosition::BottomRight,
        ] {
            assert_eq!(position.as_str().parse::<ControlPosition>().unwrap(), position);
            assert_eq!(
                serde_json::to_string(&position).unwrap(),
                format!("\"{}\"", position.as_str())
            );
        }
        assert!("middle".parse::<ControlPosition>().is_err());
    }
}
