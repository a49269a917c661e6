//! Print-export stages
//!
//! Each stage is independently usable; [`pipeline::PrintPipeline`] runs them
//! in the order an export needs.

pub mod capability;
pub mod controls;
pub mod diagnostics;
pub mod dpi;
pub mod pipeline;
pub mod quiesce;
pub mod scale;
pub mod surface;
