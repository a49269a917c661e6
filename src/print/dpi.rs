//! Maximum print resolution for a hardware buffer limit

use crate::{
    core::units::{Length, LengthUnit},
    print::{
        capability::query_render_capability,
        diagnostics::{DiagnosticSink, PrintDiagnostic},
    },
    traits::MapEngine,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DpiError {
    #[error("Couldn't calculate the maximum size of the render buffer")]
    CapabilityUnavailable,

    #[error("Page size must be positive, got {0}")]
    InvalidSize(Length),
}

/// Largest DPI at which `size` still fits into one render buffer edge.
///
/// Distinguishes "no numeric result" (`Err`) from any actual value.
pub fn get_dpi_for_size<M: MapEngine + ?Sized>(size: Length, map: &M) -> Result<f64, DpiError> {
    let inches = size.to(LengthUnit::Inches).value();
    if !inches.is_finite() || inches <= 0.0 {
        return Err(DpiError::InvalidSize(size));
    }

    let capability = query_render_capability(map);
    if !capability.is_known() {
        return Err(DpiError::CapabilityUnavailable);
    }

    Ok(capability.0 as f64 / inches)
}

/// Like [`get_dpi_for_size`], but degrades to `fallback_dpi` on failure.
///
/// The failure is reported to `diagnostics`; the export carries on.
pub fn calculate_maximum_dpi<M: MapEngine + ?Sized>(
    size: Length,
    map: &M,
    fallback_dpi: f64,
    diagnostics: &dyn DiagnosticSink,
) -> f64 {
    match get_dpi_for_size(size, map) {
        Ok(dpi) => dpi,
        Err(e) => {
            diagnostics.emit(PrintDiagnostic::DpiFallback {
                reason: e.to_string(),
                fallback_dpi,
            });
            fallback_dpi
        }
    }
}
