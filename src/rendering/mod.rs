pub mod context;

// Re-export main types
pub use context::{HardwareContext, StaticContext};
