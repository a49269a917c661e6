use crate::{
    headless::map::HeadlessMap,
    print::surface::PrintMapOptions,
    rendering::context::HardwareContext,
    traits::{MapControl, MapFactory},
    ui::controls::{ScaleBarControl, ScaleControlOptions},
    PrintError, Result,
};
use std::sync::Arc;

/// Builds [`HeadlessMap`] surfaces
#[derive(Clone, Default)]
pub struct HeadlessFactory {
    context: Option<Arc<dyn HardwareContext>>,
    ready_on_create: bool,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hardware context handed to every surface this factory creates
    pub fn with_context(mut self, context: Arc<dyn HardwareContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Create surfaces that are already fully loaded
    pub fn ready_on_create(mut self, ready: bool) -> Self {
        self.ready_on_create = ready;
        self
    }
}

impl MapFactory for HeadlessFactory {
    type Map = HeadlessMap;

    fn create_map(&self, options: PrintMapOptions) -> Result<HeadlessMap> {
        let container = &options.container;
        if !(container.width > 0.0 && container.height > 0.0) {
            return Err(PrintError::Surface(format!(
                "container {:?} has no size ({}x{})",
                container.id, container.width, container.height
            ))
            .into());
        }

        let map = HeadlessMap::from_options(options, self.context.clone());
        if self.ready_on_create {
            map.mark_ready();
        }
        Ok(map)
    }

    fn scale_control(&self, options: ScaleControlOptions) -> Result<Box<dyn MapControl>> {
        Ok(Box::new(ScaleBarControl::new(options)))
    }
}
