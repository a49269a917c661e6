//! Prelude module for common maplet-print types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_print::prelude::*;`

pub use crate::core::{
    config::{Orientation, PrintConfig, PrintProfile, QuiescenceConfig, ScaleSpec, ScaleUnit},
    format::{FormatLookup, StandardFormats},
    geo::{LatLng, LatLngBounds, Point},
    units::{Dimensions, Length, LengthUnit},
    viewport::Viewport,
};

pub use crate::print::{
    capability::{query_render_capability, RenderCapability},
    controls::{add_custom_controls, ControlDescriptor},
    diagnostics::{CollectingDiagnostics, DiagnosticSink, LogDiagnostics, PrintDiagnostic},
    dpi::{calculate_maximum_dpi, get_dpi_for_size, DpiError},
    pipeline::{ExportRequest, PreparedExport, PrintPipeline},
    quiesce::{wait_for_map_to_render, wait_for_map_to_render_within, QuiescenceReport},
    scale::{add_scale, calibrate_numeric_scale, CalibrationResult, ScaleTarget},
    surface::{create_print_map, PrintContainer, PrintMapOptions},
};

pub use crate::traits::{MapControl, MapEngine, MapFactory, RenderListener};

pub use crate::ui::controls::{ControlPosition, NumericScaleControl, ScaleBarControl};

pub use crate::rendering::context::{HardwareContext, StaticContext};

pub use crate::headless::{HeadlessFactory, HeadlessMap};

pub use crate::runtime::{async_delay, with_deadline};

pub use crate::{PrintError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
