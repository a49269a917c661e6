//! Print-pipeline constants derived from common web-map print conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Quiet period (ms) the renderer must stay idle before a capture is taken.
pub const QUIESCE_TIMEOUT_MS: u64 = 500;

/// Zoom ceiling for print surfaces; deeper than interactive maps allow.
pub const PRINT_MAX_ZOOM: f64 = 24.0;

/// CSS reference resolution: one CSS pixel is 1/96 inch.
pub const CSS_PIXELS_PER_INCH: f64 = 96.0;

/// Resolution used when no DPI is requested and the hardware cannot be queried.
pub const DEFAULT_PRINT_DPI: f64 = 300.0;

/// Capability value reported when the render buffer size cannot be determined.
pub const UNKNOWN_RENDER_BUFFER_SIZE: i64 = -1;

/// Meters per statute foot, mile and nautical mile.
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const METERS_PER_MILE: f64 = 1609.344;
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;
