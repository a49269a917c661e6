//! Render-buffer capability query

use crate::{core::constants::UNKNOWN_RENDER_BUFFER_SIZE, traits::MapEngine};

/// Maximum edge length in pixels a rendering context can allocate.
///
/// Non-positive values mean the limit is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderCapability(pub i64);

impl RenderCapability {
    pub const UNKNOWN: RenderCapability = RenderCapability(UNKNOWN_RENDER_BUFFER_SIZE);

    pub fn is_known(&self) -> bool {
        self.0 > 0
    }

    /// The limit in pixels, if known
    pub fn pixels(&self) -> Option<u32> {
        if self.is_known() {
            u32::try_from(self.0).ok()
        } else {
            None
        }
    }
}

/// Reads the maximum render-buffer size from the map's hardware context.
///
/// Never fails: an unloaded map, a missing context or a failing query all
/// yield [`RenderCapability::UNKNOWN`]. The value is read fresh on every call.
pub fn query_render_capability<M: MapEngine + ?Sized>(map: &M) -> RenderCapability {
    if !map.loaded() {
        log::debug!("Map not loaded yet, render buffer size unknown");
        return RenderCapability::UNKNOWN;
    }

    let Some(context) = map.hardware_context() else {
        log::debug!("Map exposes no hardware context, render buffer size unknown");
        return RenderCapability::UNKNOWN;
    };

    match context.max_renderbuffer_size() {
        Ok(size) => RenderCapability(size),
        Err(e) => {
            log::debug!("Render buffer size query failed: {e}");
            RenderCapability::UNKNOWN
        }
    }
}
