//! Scale calibration
//!
//! Two indicators can be attached to a print surface: the engine's graphical
//! scale bar, and a numeric legend stating how many ground meters one
//! centimeter of paper covers. The numeric ratio is measured along the
//! horizontal midline of the container and divided by the page span.

use crate::{
    core::{
        config::{Orientation, ScaleSpec, ScaleUnit},
        format::FormatLookup,
        geo::Point,
        units::LengthUnit,
    },
    traits::{MapEngine, MapFactory},
    ui::controls::{ControlPosition, NumericScaleControl, ScaleControlOptions},
    PrintError, Result,
};
use serde::{Deserialize, Serialize};

/// Ground meters covered by one centimeter of printed page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub ratio: f64,
}

impl CalibrationResult {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Legend text, e.g. `"1 cm = 200 m"` or `"1 cm = 2.5 km"`
    pub fn legend(&self) -> String {
        if self.ratio >= 1000.0 {
            format!("1 cm = {} km", trim_decimals(self.ratio / 1000.0))
        } else {
            format!("1 cm = {} m", trim_decimals(self.ratio))
        }
    }

    /// Scale as a fraction of paper to ground, e.g. `"1:20000"`
    pub fn representative_fraction(&self) -> String {
        format!("1:{}", (self.ratio * 100.0).round())
    }
}

fn trim_decimals(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Page and container the numeric scale is calibrated for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTarget {
    pub format: String,
    pub orientation: Orientation,
    /// Width in CSS pixels of the view being measured
    pub client_width: f64,
    pub client_height: f64,
}

/// Ground meters per page centimeter for `ground_meters` spread over `page_span_cm`
pub fn scale_ratio(ground_meters: f64, page_span_cm: f64) -> f64 {
    ground_meters * (0.01 / (page_span_cm / 100.0))
}

/// Measures the ground distance across the view and relates it to the page.
///
/// The page span is the format's width for portrait pages and its height for
/// landscape pages.
pub fn calibrate_numeric_scale<M: MapEngine + ?Sized>(
    map: &M,
    formats: &dyn FormatLookup,
    target: &ScaleTarget,
) -> Result<CalibrationResult> {
    let page = formats
        .get_format(&target.format)
        .ok_or_else(|| PrintError::UnknownFormat(target.format.clone()))?
        .to(LengthUnit::Centimeters);
    let span_cm = match target.orientation {
        Orientation::Portrait => page.width(),
        Orientation::Landscape => page.height(),
    };

    let y = target.client_height / 2.0;
    let left = map.unproject(Point::new(0.0, y));
    let right = map.unproject(Point::new(target.client_width, y));
    if !left.is_valid() || !right.is_valid() {
        return Err(PrintError::Surface(format!(
            "view midline unprojects outside the globe ({left:?} to {right:?})"
        ))
        .into());
    }
    let ground_meters = left.distance_to(&right);

    let calibration = CalibrationResult::new(scale_ratio(ground_meters, span_cm));
    log::debug!(
        "Calibrated {} {:?}: {:.1} m across {:.2} cm ({})",
        target.format,
        target.orientation,
        ground_meters,
        span_cm,
        calibration.legend()
    );
    Ok(calibration)
}

/// Scale indicators worked out for one export, ready to attach
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedScale {
    pub numeric: Option<CalibrationResult>,
    /// Bar width as a fraction of the container, and its unit
    pub graphic: Option<(f64, ScaleUnit)>,
}

impl ResolvedScale {
    pub fn is_empty(&self) -> bool {
        self.numeric.is_none() && self.graphic.is_none()
    }

    /// Attaches the graphical bar at the engine's default corner, then the
    /// numeric legend at `numeric_position`
    pub fn attach<S, F>(&self, surface: &S, factory: &F, numeric_position: ControlPosition) -> Result<()>
    where
        S: MapEngine + ?Sized,
        F: MapFactory + ?Sized,
    {
        if let Some((max_width_percent, unit)) = self.graphic {
            let bar = factory.scale_control(ScaleControlOptions {
                max_width: max_width_percent * surface.container_width(),
                unit,
            })?;
            surface.add_control(bar, ControlPosition::default())?;
        }

        if let Some(calibration) = self.numeric {
            surface.add_control(Box::new(NumericScaleControl::new(calibration)), numeric_position)?;
        }
        Ok(())
    }
}

/// Works out which indicators `spec` asks for, calibrating against `map`.
///
/// Calibration happens here, before anything is attached, so a failing
/// calibration leaves the target without either indicator.
pub fn resolve_scale<M: MapEngine + ?Sized>(
    map: &M,
    spec: Option<&ScaleSpec>,
    formats: &dyn FormatLookup,
    target: &ScaleTarget,
) -> Result<ResolvedScale> {
    let Some(spec) = spec else {
        return Ok(ResolvedScale::default());
    };

    let numeric = if spec.numeric() {
        Some(calibrate_numeric_scale(map, formats, target)?)
    } else {
        None
    };
    let graphic = spec
        .graphic()
        .then(|| (spec.max_width_percent(), spec.unit()));

    Ok(ResolvedScale { numeric, graphic })
}

/// Calibrates against `map` and attaches the requested indicators to it.
///
/// Without a spec, or with both indicators off, nothing is attached. The
/// numeric scale is calibrated before the bar is attached: when calibration
/// fails (an unknown format, say) the error is returned and the map gets no
/// scale bar either.
pub fn add_scale<M, F>(
    map: &M,
    spec: Option<&ScaleSpec>,
    factory: &F,
    formats: &dyn FormatLookup,
    target: &ScaleTarget,
) -> Result<()>
where
    M: MapEngine + ?Sized,
    F: MapFactory + ?Sized,
{
    resolve_scale(map, spec, formats, target)?.attach(map, factory, ControlPosition::BottomLeft)
}
