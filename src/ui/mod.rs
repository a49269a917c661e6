pub mod controls;

pub use controls::{
    ControlPosition, NumericScaleControl, ScaleBarControl, ScaleBarReading, ScaleControlOptions,
};
