//! Print surface construction
//!
//! The print surface is a second, non-interactive map cloned from the live
//! view's camera and style. It keeps its drawing buffer after each frame so
//! pixels can be read back once the renderer has settled.

use crate::{
    core::{config::PrintConfig, geo::LatLng},
    print::diagnostics::{DiagnosticSink, LogDiagnostics, PrintDiagnostic},
    traits::{MapEngine, MapFactory},
    Result,
};
use serde::{Deserialize, Serialize};

/// Option keys the print surface always sets itself
const RESERVED_OPTIONS: [&str; 10] = [
    "container",
    "center",
    "style",
    "bearing",
    "pitch",
    "maxZoom",
    "interactive",
    "attributionControl",
    "preserveDrawingBuffer",
    "antialias",
];

/// Target element of a print surface and its CSS pixel size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintContainer {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl PrintContainer {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// Constructor options handed to [`MapFactory::create_map`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintMapOptions {
    pub container: PrintContainer,
    pub center: LatLng,
    pub style: serde_json::Value,
    pub bearing: f64,
    pub pitch: f64,
    pub max_zoom: f64,
    pub interactive: bool,
    pub attribution_control: bool,
    pub preserve_drawing_buffer: bool,
    pub antialias: bool,
    /// Caller-supplied options that do not collide with the fixed ones
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PrintMapOptions {
    /// Clones camera and style from `map`; fixed print options win over `overrides`
    pub fn from_live<M: MapEngine + ?Sized>(
        map: &M,
        container: PrintContainer,
        overrides: serde_json::Map<String, serde_json::Value>,
        config: &PrintConfig,
        diagnostics: &dyn DiagnosticSink,
    ) -> Self {
        let extra = overrides
            .into_iter()
            .filter(|(key, _)| {
                let reserved = RESERVED_OPTIONS.contains(&key.as_str());
                if reserved {
                    diagnostics.emit(PrintDiagnostic::OverrideIgnored { key: key.clone() });
                }
                !reserved
            })
            .collect();

        Self {
            container,
            center: map.center(),
            style: map.style(),
            bearing: map.bearing(),
            pitch: map.pitch(),
            max_zoom: config.max_zoom,
            interactive: false,
            attribution_control: false,
            preserve_drawing_buffer: true,
            antialias: config.antialias,
            extra,
        }
    }
}

/// Creates a print surface mirroring `map` and fits it to the live bounds.
///
/// Errors raised by the factory are returned unchanged.
pub fn create_print_map<M, F>(
    map: &M,
    factory: &F,
    container: PrintContainer,
    overrides: serde_json::Map<String, serde_json::Value>,
) -> Result<F::Map>
where
    M: MapEngine + ?Sized,
    F: MapFactory,
{
    let options = PrintMapOptions::from_live(
        map,
        container,
        overrides,
        &PrintConfig::default(),
        &LogDiagnostics,
    );
    build_print_map(map, factory, options)
}

/// Builds the surface from prepared options and fits it to the live bounds
pub(crate) fn build_print_map<M, F>(map: &M, factory: &F, options: PrintMapOptions) -> Result<F::Map>
where
    M: MapEngine + ?Sized,
    F: MapFactory,
{
    log::debug!(
        "Creating print surface in {:?} ({}x{})",
        options.container.id,
        options.container.width,
        options.container.height
    );
    let surface = factory.create_map(options)?;
    surface.fit_bounds(&map.bounds());
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{geo::Point, viewport::Viewport},
        headless::{HeadlessFactory, HeadlessMap},
        print::diagnostics::CollectingDiagnostics,
        traits::MapControl,
        ui::controls::ScaleControlOptions,
    };
    use serde_json::json;

    fn live_map() -> HeadlessMap {
        let mut viewport = Viewport::new(LatLng::new(45.764, 4.8357), 13.4, Point::new(960.0, 640.0));
        viewport.bearing = 12.0;
        viewport.pitch = 30.0;
        let map = HeadlessMap::new(viewport).with_style(json!({ "version": 8, "name": "streets" }));
        map.mark_ready();
        map
    }

    #[test]
    fn test_print_surface_mirrors_live_map() {
        let live = live_map();
        let surface = create_print_map(
            &live,
            &HeadlessFactory::new(),
            PrintContainer::new("print", 960.0, 640.0),
            serde_json::Map::new(),
        )
        .unwrap();

        assert!(!surface.is_interactive());
        assert!(surface.preserves_drawing_buffer());
        assert!(surface.is_antialiased());
        assert_eq!(surface.style(), live.style());
        assert_eq!(surface.bearing(), 12.0);
        assert_eq!(surface.pitch(), 30.0);
        assert!(surface.bounds().approx_eq(&live.bounds(), 1e-7));

        let options = surface.options().unwrap();
        assert_eq!(options.max_zoom, 24.0);
        assert!(!options.attribution_control);
    }

    #[test]
    fn test_fixed_options_win_over_overrides() {
        let live = live_map();
        let overrides = json!({ "interactive": true, "pitch": 80.0, "pixelRatio": 3.125 });
        let overrides = overrides.as_object().unwrap().clone();
        let diagnostics = CollectingDiagnostics::new();

        let options = PrintMapOptions::from_live(
            &live,
            PrintContainer::new("print", 100.0, 100.0),
            overrides,
            &PrintConfig::default(),
            &diagnostics,
        );

        assert!(!options.interactive);
        assert_eq!(options.pitch, 30.0);
        assert_eq!(options.extra.get("pixelRatio"), Some(&json!(3.125)));
        assert_eq!(options.extra.len(), 1);
        assert_eq!(diagnostics.events().len(), 2);

        let wire = serde_json::to_value(&options).unwrap();
        assert_eq!(wire["preserveDrawingBuffer"], json!(true));
        assert_eq!(wire["pixelRatio"], json!(3.125));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("webgl context lost")]
    struct ContextLost;

    struct BrokenFactory;

    impl MapFactory for BrokenFactory {
        type Map = HeadlessMap;

        fn create_map(&self, _options: PrintMapOptions) -> Result<HeadlessMap> {
            Err(Box::new(ContextLost))
        }

        fn scale_control(&self, options: ScaleControlOptions) -> Result<Box<dyn MapControl>> {
            HeadlessFactory::new().scale_control(options)
        }
    }

    #[test]
    fn test_construction_error_is_returned_unchanged() {
        let err = create_print_map(
            &live_map(),
            &BrokenFactory,
            PrintContainer::new("print", 100.0, 100.0),
            serde_json::Map::new(),
        )
        .unwrap_err();
        assert!(err.downcast_ref::<ContextLost>().is_some());

        let err = create_print_map(
            &live_map(),
            &HeadlessFactory::new(),
            PrintContainer::new("print", 0.0, 100.0),
            serde_json::Map::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("has no size"));
    }
}
