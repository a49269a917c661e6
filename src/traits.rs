//! Seams between the print pipeline and the rendering engine
//!
//! The engine itself (tile loading, style application, projection, GPU
//! context) is a collaborator. Everything the pipeline needs from it is
//! expressed by the traits in this module.

use crate::{
    core::geo::{LatLng, LatLngBounds, Point},
    print::surface::PrintMapOptions,
    rendering::context::HardwareContext,
    ui::controls::{ControlPosition, ScaleControlOptions},
    Result,
};
use std::{any::Any, sync::Arc};

/// Callback invoked on every `render` event of a map
pub type RenderListener = Arc<dyn Fn() + Send + Sync>;

/// Registration handle returned by [`MapEngine::on_render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A live map instance.
///
/// Instances behave like handles: all methods take `&self` and engines are
/// expected to use interior mutability where state changes.
pub trait MapEngine: Send + Sync {
    /// Whether the map has finished its initial load
    fn loaded(&self) -> bool;

    fn is_style_loaded(&self) -> bool;

    fn are_tiles_loaded(&self) -> bool;

    /// Hardware context backing the map canvas, if one can be obtained
    fn hardware_context(&self) -> Option<Arc<dyn HardwareContext>>;

    /// Subscribe to render events
    fn on_render(&self, listener: RenderListener) -> ListenerId;

    /// Remove a listener registered with [`MapEngine::on_render`]; unknown ids are ignored
    fn off_render(&self, id: ListenerId);

    /// Convert a container pixel to a geographical coordinate
    fn unproject(&self, pixel: Point) -> LatLng;

    fn center(&self) -> LatLng;

    /// Currently visible bounds
    fn bounds(&self) -> LatLngBounds;

    /// Current style document
    fn style(&self) -> serde_json::Value;

    fn bearing(&self) -> f64;

    fn pitch(&self) -> f64;

    /// Scroll width of the map container in CSS pixels
    fn container_width(&self) -> f64;

    fn fit_bounds(&self, bounds: &LatLngBounds);

    /// Attach a control at `position`. Errors raised by the control are returned unchanged.
    fn add_control(&self, control: Box<dyn MapControl>, position: ControlPosition) -> Result<()>;
}

/// Constructors supplied by the rendering engine
pub trait MapFactory {
    type Map: MapEngine;

    /// Build a new, independent map surface
    fn create_map(&self, options: PrintMapOptions) -> Result<Self::Map>;

    /// Build the engine's own graphical scale bar
    fn scale_control(&self, options: ScaleControlOptions) -> Result<Box<dyn MapControl>>;
}

/// What a control sees of the map it is attached to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlHost {
    pub container_width: f64,
    pub container_height: f64,
}

/// A decoration that can be attached to a map
pub trait MapControl: Send + Sync + std::fmt::Debug {
    /// Short identifier, e.g. `"scale"`
    fn kind(&self) -> &str;

    /// Called by the engine while attaching; an error aborts the attachment
    fn on_add(&mut self, _host: &ControlHost) -> Result<()> {
        Ok(())
    }

    /// Dynamic casting support
    fn as_any(&self) -> &dyn Any;
}
