pub mod config;
pub mod constants;
pub mod format;
pub mod geo;
pub mod units;
pub mod viewport;
