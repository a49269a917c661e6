//! End-to-end export preparation
//!
//! [`PrintPipeline::prepare`] runs the print stages strictly in sequence:
//!
//! 1. resolution: maximum DPI for the longest page edge, requested DPI clamped to it
//! 2. layout: container size in CSS pixels and the device pixel ratio
//! 3. print surface construction
//! 4. scale calibration against the live view
//! 5. quiescence wait on the surface
//! 6. scale indicators, then caller controls
//!
//! The returned surface is settled and decorated; capturing its pixels is up
//! to the caller.

use crate::{
    core::{
        config::{Orientation, PrintConfig, ScaleSpec},
        constants::CSS_PIXELS_PER_INCH,
        format::{FormatLookup, StandardFormats},
        units::{Dimensions, LengthUnit},
    },
    print::{
        controls::{add_custom_controls, ControlDescriptor},
        diagnostics::{DiagnosticSink, LogDiagnostics, PrintDiagnostic},
        dpi::calculate_maximum_dpi,
        quiesce::{wait_for_map_to_render_within, QuiescenceReport},
        scale::{resolve_scale, CalibrationResult, ScaleTarget},
        surface::{build_print_map, PrintContainer, PrintMapOptions},
    },
    traits::{MapEngine, MapFactory},
    PrintError, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_container_id() -> String {
    "print-map".to_string()
}

/// What the caller wants printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Page format name, e.g. `"a4"`
    pub format: String,
    #[serde(default)]
    pub orientation: Orientation,
    /// Requested resolution; the configured default when absent
    #[serde(default)]
    pub dpi: Option<f64>,
    #[serde(default)]
    pub scale: Option<ScaleSpec>,
    /// Size in CSS pixels of the live view the scale is calibrated on
    pub client_width: f64,
    pub client_height: f64,
    #[serde(default = "default_container_id")]
    pub container_id: String,
    /// Extra print-surface constructor options
    #[serde(default)]
    pub overrides: serde_json::Map<String, serde_json::Value>,
}

impl ExportRequest {
    pub fn new(
        format: impl Into<String>,
        orientation: Orientation,
        client_width: f64,
        client_height: f64,
    ) -> Self {
        Self {
            format: format.into(),
            orientation,
            dpi: None,
            scale: None,
            client_width,
            client_height,
            container_id: default_container_id(),
            overrides: serde_json::Map::new(),
        }
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn with_scale(mut self, scale: ScaleSpec) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.overrides.insert(key.into(), value);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A settled, decorated print surface and the numbers it was laid out with
#[derive(Debug)]
pub struct PreparedExport<S> {
    pub surface: S,
    /// Page dimensions for the requested orientation
    pub page: Dimensions,
    /// Effective resolution
    pub dpi: f64,
    /// Hardware ceiling, or the requested DPI when the ceiling is unknown
    pub max_dpi: f64,
    pub pixel_ratio: f64,
    pub calibration: Option<CalibrationResult>,
    pub quiescence: QuiescenceReport,
}

impl<S> PreparedExport<S> {
    /// Output size in device pixels.
    ///
    /// Fails when an edge does not fit in `u32`, which can only happen when
    /// the hardware ceiling is unknown and the requested DPI was used as is.
    pub fn pixel_size(&self) -> Result<(u32, u32)> {
        let inches = self.page.to(LengthUnit::Inches);
        let edge = |length: f64| {
            let pixels = (length * self.dpi).round();
            if pixels.is_finite() && pixels >= 0.0 && pixels <= u32::MAX as f64 {
                Ok(pixels as u32)
            } else {
                Err(PrintError::Surface(format!(
                    "{pixels} px edge at {} dpi exceeds the supported output size",
                    self.dpi
                )))
            }
        };
        Ok((edge(inches.width())?, edge(inches.height())?))
    }
}

/// Runs the print stages against one engine
pub struct PrintPipeline<'a, F: MapFactory> {
    factory: &'a F,
    formats: Box<dyn FormatLookup>,
    config: PrintConfig,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<'a, F: MapFactory> PrintPipeline<'a, F> {
    pub fn new(factory: &'a F) -> Self {
        Self {
            factory,
            formats: Box::new(StandardFormats),
            config: PrintConfig::default(),
            diagnostics: Arc::new(LogDiagnostics),
        }
    }

    pub fn with_formats(mut self, formats: impl FormatLookup + 'static) -> Self {
        self.formats = Box::new(formats);
        self
    }

    pub fn with_config(mut self, config: PrintConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    /// Prepares a print surface for `request` from the `live` map.
    ///
    /// Errors from any stage abort the run and are returned unchanged. The
    /// quiescence wait is bounded only when the configuration sets a timeout.
    pub async fn prepare<M: MapEngine + ?Sized>(
        &self,
        live: &M,
        request: ExportRequest,
        custom_controls: Vec<ControlDescriptor>,
    ) -> Result<PreparedExport<F::Map>> {
        self.config.validate()?;
        let page = self
            .formats
            .page(&request.format, request.orientation)
            .ok_or_else(|| PrintError::UnknownFormat(request.format.clone()))?;

        // Resolution
        let requested = request.dpi.unwrap_or(self.config.default_dpi);
        if !requested.is_finite() || requested <= 0.0 {
            return Err(PrintError::InvalidDpi(requested).into());
        }
        let max_dpi =
            calculate_maximum_dpi(page.longest_edge(), live, requested, self.diagnostics.as_ref());
        let dpi = if requested > max_dpi {
            self.diagnostics.emit(PrintDiagnostic::DpiClamped {
                requested,
                maximum: max_dpi,
            });
            max_dpi
        } else {
            requested
        };

        // Layout
        let inches = page.to(LengthUnit::Inches);
        let container = PrintContainer::new(
            request.container_id.clone(),
            inches.width() * CSS_PIXELS_PER_INCH,
            inches.height() * CSS_PIXELS_PER_INCH,
        );
        let pixel_ratio = dpi / CSS_PIXELS_PER_INCH;
        let mut overrides = request.overrides.clone();
        overrides.insert("pixelRatio".to_string(), serde_json::json!(pixel_ratio));
        log::debug!(
            "Laying out {} {:?} at {dpi:.1} dpi ({}x{} css px, pixel ratio {pixel_ratio:.3})",
            request.format,
            request.orientation,
            container.width.round(),
            container.height.round()
        );

        // Surface
        let options = PrintMapOptions::from_live(
            live,
            container,
            overrides,
            &self.config,
            self.diagnostics.as_ref(),
        );
        let surface = build_print_map(live, self.factory, options)?;

        // Scale
        let target = ScaleTarget {
            format: request.format.clone(),
            orientation: request.orientation,
            client_width: request.client_width,
            client_height: request.client_height,
        };
        let scale = resolve_scale(live, request.scale.as_ref(), self.formats.as_ref(), &target)?;

        // Quiescence
        let quiescence = wait_for_map_to_render_within(
            &surface,
            self.config.quiescence.settle_window(),
            self.config.quiescence.timeout(),
        )
        .await?;

        // Decoration
        scale.attach(&surface, self.factory, self.config.numeric_scale_position)?;
        add_custom_controls(&surface, custom_controls)?;

        Ok(PreparedExport {
            surface,
            page,
            dpi,
            max_dpi,
            pixel_ratio,
            calibration: scale.numeric,
            quiescence,
        })
    }
}
