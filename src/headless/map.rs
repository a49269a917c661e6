use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    print::surface::PrintMapOptions,
    rendering::context::HardwareContext,
    traits::{ControlHost, ListenerId, MapControl, MapEngine, RenderListener},
    ui::controls::ControlPosition,
    Result,
};
use fxhash::FxHashMap;
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, RwLock,
    },
    time::Duration,
};

type AttachedControl = (Box<dyn MapControl>, ControlPosition);

/// In-memory map engine.
///
/// Projects with plain Web Mercator, keeps load flags that callers flip by
/// hand and fires `render` listeners on [`HeadlessMap::emit_render`]. Used as
/// the engine in tests and in the demo application.
pub struct HeadlessMap {
    viewport: RwLock<Viewport>,
    style: serde_json::Value,
    interactive: bool,
    preserve_drawing_buffer: bool,
    antialias: bool,
    loaded: AtomicBool,
    style_loaded: AtomicBool,
    tiles_loaded: AtomicBool,
    context: Option<Arc<dyn HardwareContext>>,
    listeners: Mutex<FxHashMap<ListenerId, RenderListener>>,
    next_listener: AtomicU64,
    controls: Mutex<Vec<AttachedControl>>,
    options: Option<PrintMapOptions>,
}

impl std::fmt::Debug for HeadlessMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessMap")
            .field("viewport", &self.viewport())
            .field("interactive", &self.interactive)
            .field("loaded", &self.loaded())
            .field("listeners", &self.listener_count())
            .field("controls", &self.control_count())
            .finish()
    }
}

impl HeadlessMap {
    /// Creates an interactive, not yet loaded map
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: RwLock::new(viewport),
            style: serde_json::json!({ "version": 8, "sources": {}, "layers": [] }),
            interactive: true,
            preserve_drawing_buffer: false,
            antialias: false,
            loaded: AtomicBool::new(false),
            style_loaded: AtomicBool::new(false),
            tiles_loaded: AtomicBool::new(false),
            context: None,
            listeners: Mutex::new(FxHashMap::default()),
            next_listener: AtomicU64::new(1),
            controls: Mutex::new(Vec::new()),
            options: None,
        }
    }

    /// Builds a non-interactive surface from print options
    pub(crate) fn from_options(
        options: PrintMapOptions,
        context: Option<Arc<dyn HardwareContext>>,
    ) -> Self {
        let mut viewport = Viewport::new(
            options.center,
            0.0,
            Point::new(options.container.width, options.container.height),
        );
        viewport.set_zoom_limits(0.0, options.max_zoom);
        viewport.bearing = options.bearing;
        viewport.pitch = options.pitch;

        let mut map = Self::new(viewport);
        map.style = options.style.clone();
        map.interactive = options.interactive;
        map.preserve_drawing_buffer = options.preserve_drawing_buffer;
        map.antialias = options.antialias;
        map.context = context;
        map.options = Some(options);
        map
    }

    pub fn with_style(mut self, style: serde_json::Value) -> Self {
        self.style = style;
        self
    }

    pub fn with_context(mut self, context: Arc<dyn HardwareContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::SeqCst);
    }

    pub fn set_style_loaded(&self, loaded: bool) {
        self.style_loaded.store(loaded, Ordering::SeqCst);
    }

    pub fn set_tiles_loaded(&self, loaded: bool) {
        self.tiles_loaded.store(loaded, Ordering::SeqCst);
    }

    /// Marks the map, its style and its tiles as loaded
    pub fn mark_ready(&self) {
        self.set_loaded(true);
        self.set_style_loaded(true);
        self.set_tiles_loaded(true);
    }

    /// Fires a `render` event to every registered listener
    pub fn emit_render(&self) {
        let listeners: Vec<RenderListener> = match self.listeners.lock() {
            Ok(listeners) => listeners.values().cloned().collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
            .read()
            .map(|v| v.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn preserves_drawing_buffer(&self) -> bool {
        self.preserve_drawing_buffer
    }

    pub fn is_antialiased(&self) -> bool {
        self.antialias
    }

    /// Options the map was created with, when built by a factory
    pub fn options(&self) -> Option<&PrintMapOptions> {
        self.options.as_ref()
    }

    pub fn control_count(&self) -> usize {
        self.controls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Kind and position of every attached control, in attachment order
    pub fn controls(&self) -> Vec<(String, ControlPosition)> {
        self.controls
            .lock()
            .map(|controls| {
                controls
                    .iter()
                    .map(|(control, position)| (control.kind().to_string(), *position))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First attached control of type `T`
    pub fn find_control<T: MapControl + Clone + 'static>(&self) -> Option<T> {
        let controls = self.controls.lock().ok()?;
        controls
            .iter()
            .find_map(|(control, _)| control.as_any().downcast_ref::<T>().cloned())
    }

    /// Emits `frames` render events `frame_interval` apart, then marks the map ready
    pub fn spawn_load_simulation(
        map: Arc<Self>,
        frames: u32,
        frame_interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            map.set_loaded(true);
            for frame in 0..frames {
                map.emit_render();
                if frame + 1 == frames / 2 {
                    map.set_style_loaded(true);
                }
                tokio::time::sleep(frame_interval).await;
            }
            map.mark_ready();
            map.emit_render();
            log::debug!("Headless map finished loading after {frames} frames");
        })
    }
}

impl MapEngine for HeadlessMap {
    fn loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn is_style_loaded(&self) -> bool {
        self.style_loaded.load(Ordering::SeqCst)
    }

    fn are_tiles_loaded(&self) -> bool {
        self.tiles_loaded.load(Ordering::SeqCst)
    }

    fn hardware_context(&self) -> Option<Arc<dyn HardwareContext>> {
        self.context.clone()
    }

    fn on_render(&self, listener: RenderListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.insert(id, listener);
        }
        id
    }

    fn off_render(&self, id: ListenerId) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.remove(&id);
        }
    }

    fn unproject(&self, pixel: Point) -> LatLng {
        self.viewport().pixel_to_lat_lng(&pixel)
    }

    fn center(&self) -> LatLng {
        self.viewport().center
    }

    fn bounds(&self) -> LatLngBounds {
        self.viewport().bounds()
    }

    fn style(&self) -> serde_json::Value {
        self.style.clone()
    }

    fn bearing(&self) -> f64 {
        self.viewport().bearing
    }

    fn pitch(&self) -> f64 {
        self.viewport().pitch
    }

    fn container_width(&self) -> f64 {
        self.viewport().size.x
    }

    fn fit_bounds(&self, bounds: &LatLngBounds) {
        if let Ok(mut viewport) = self.viewport.write() {
            viewport.fit_bounds(bounds);
        }
    }

    fn add_control(&self, mut control: Box<dyn MapControl>, position: ControlPosition) -> Result<()> {
        let size = self.viewport().size;
        control.on_add(&ControlHost {
            container_width: size.x,
            container_height: size.y,
        })?;

        log::debug!("Attached {} control at {}", control.kind(), position.as_str());
        self.controls
            .lock()
            .map_err(|_| crate::PrintError::Control("control registry poisoned".into()))?
            .push((control, position));
        Ok(())
    }
}
