//! Caller-supplied controls for the print surface

use crate::{
    traits::{MapControl, MapEngine},
    ui::controls::ControlPosition,
    Result,
};

/// A control and the corner it goes in
#[derive(Debug)]
pub struct ControlDescriptor {
    pub component: Box<dyn MapControl>,
    pub position: ControlPosition,
}

impl ControlDescriptor {
    pub fn new(component: impl MapControl + 'static, position: ControlPosition) -> Self {
        Self {
            component: Box::new(component),
            position,
        }
    }
}

/// Attaches `controls` to `map` in order.
///
/// Stops at the first failure and returns that error unchanged. Controls
/// attached before the failure stay on the map.
pub fn add_custom_controls<M: MapEngine + ?Sized>(
    map: &M,
    controls: Vec<ControlDescriptor>,
) -> Result<()> {
    let total = controls.len();
    for (index, descriptor) in controls.into_iter().enumerate() {
        let kind = descriptor.component.kind().to_string();
        if let Err(e) = map.add_control(descriptor.component, descriptor.position) {
            log::debug!("Custom control {} of {total} ({kind}) failed: {e}", index + 1);
            return Err(e);
        }
    }
    Ok(())
}
