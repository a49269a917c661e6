//! # maplet-print
//!
//! Print-export orchestration for asynchronous, event-driven map renderers.
//!
//! The crate sits on top of a rendering engine (abstracted by [`MapEngine`] and
//! [`MapFactory`]) and prepares a high-resolution export: it works out the
//! largest DPI the hardware can allocate, builds a non-interactive print
//! surface cloned from the live view, calibrates scale indicators against
//! ground distance, and waits until the renderer has quiesced before the
//! caller captures pixels.

pub mod core;
pub mod headless;
pub mod prelude;
pub mod print;
pub mod rendering;
pub mod runtime;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{Orientation, PrintConfig, PrintProfile, ScaleSpec, ScaleUnit},
    format::{FormatLookup, StandardFormats},
    geo::{LatLng, LatLngBounds, Point},
    units::{Dimensions, Length, LengthUnit},
};

pub use print::{
    capability::{query_render_capability, RenderCapability},
    controls::{add_custom_controls, ControlDescriptor},
    diagnostics::{DiagnosticSink, LogDiagnostics, PrintDiagnostic},
    dpi::{calculate_maximum_dpi, get_dpi_for_size, DpiError},
    pipeline::{ExportRequest, PreparedExport, PrintPipeline},
    quiesce::{
        wait_for_map_to_render, wait_for_map_to_render_within, QuiescenceReport, QuiescenceTracker,
    },
    scale::{
        add_scale, calibrate_numeric_scale, resolve_scale, scale_ratio, CalibrationResult,
        ResolvedScale, ScaleTarget,
    },
    surface::{create_print_map, PrintContainer, PrintMapOptions},
};

pub use traits::{ListenerId, MapControl, MapEngine, MapFactory, RenderListener};

pub use ui::controls::{ControlPosition, NumericScaleControl, ScaleBarControl};

/// Result type used throughout the library
///
/// Errors raised by engine collaborators are boxed as-is so callers can
/// downcast to the original error type.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid scale configuration: {0}")]
    InvalidScale(String),

    #[error("Invalid orientation: {0:?} (expected \"p\", \"portrait\", \"l\" or \"landscape\")")]
    InvalidOrientation(String),

    #[error("Unknown page format: {0}")]
    UnknownFormat(String),

    #[error("Requested resolution must be a positive number, got {0} dpi")]
    InvalidDpi(f64),

    #[error("Invalid print configuration: {0}")]
    InvalidConfig(String),

    #[error("Print surface error: {0}")]
    Surface(String),

    #[error("Control error: {0}")]
    Control(String),

    #[error("Map did not settle within {0:?}")]
    Timeout(std::time::Duration),
}

/// Error type alias for convenience
pub type Error = PrintError;

/// Install `env_logger` as the `log` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(false).try_init();
}
