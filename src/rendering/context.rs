//! Hardware rendering contexts the capability query can interrogate

use crate::Result;

/// A rendering context that can report its allocation limits
pub trait HardwareContext: Send + Sync {
    /// Maximum edge length, in pixels, of a renderable buffer.
    ///
    /// Mirrors `MAX_RENDERBUFFER_SIZE` on GL contexts and
    /// `max_texture_dimension_2d` on wgpu devices.
    fn max_renderbuffer_size(&self) -> Result<i64>;
}

/// Context with a fixed, known limit; used by headless engines and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticContext {
    pub max_renderbuffer_size: i64,
}

impl StaticContext {
    pub fn new(max_renderbuffer_size: i64) -> Self {
        Self {
            max_renderbuffer_size,
        }
    }
}

impl HardwareContext for StaticContext {
    fn max_renderbuffer_size(&self) -> Result<i64> {
        Ok(self.max_renderbuffer_size)
    }
}

#[cfg(feature = "render")]
impl HardwareContext for wgpu::Device {
    fn max_renderbuffer_size(&self) -> Result<i64> {
        Ok(i64::from(self.limits().max_texture_dimension_2d))
    }
}

#[cfg(feature = "render")]
impl HardwareContext for wgpu::Adapter {
    fn max_renderbuffer_size(&self) -> Result<i64> {
        Ok(i64::from(self.limits().max_texture_dimension_2d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_context_reports_limit() {
        let context = StaticContext::new(16_384);
        assert_eq!(context.max_renderbuffer_size().unwrap(), 16_384);
    }
}
