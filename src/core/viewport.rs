use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::core::constants::PRINT_MAX_ZOOM;
use std::f64::consts::PI;

const EARTH_RADIUS: f64 = 6378137.0;
const TILE_SIZE: f64 = 512.0;

/// Camera state of a map: Web Mercator center/zoom plus the container size.
///
/// Bearing and pitch are carried for cloning but do not affect projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Container size in CSS pixels
    pub size: Point,
    pub bearing: f64,
    pub pitch: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, PRINT_MAX_ZOOM),
            size,
            bearing: 0.0,
            pitch: 0.0,
            min_zoom: 0.0,
            max_zoom: PRINT_MAX_ZOOM,
        }
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// World size in pixels at `zoom`
    fn world_size(zoom: f64) -> f64 {
        TILE_SIZE * 2_f64.powf(zoom)
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let world = Self::world_size(zoom.unwrap_or(self.zoom));
        let meters = lat_lng.to_mercator();
        let half = PI * EARTH_RADIUS;

        Point::new(
            (meters.x + half) / (2.0 * half) * world,
            (half - meters.y) / (2.0 * half) * world,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let world = Self::world_size(zoom.unwrap_or(self.zoom));
        let half = PI * EARTH_RADIUS;

        LatLng::from_mercator(Point::new(
            pixel.x / world * (2.0 * half) - half,
            half - pixel.y / world * (2.0 * half),
        ))
    }

    /// Converts a container pixel (origin top-left) to a geographical coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self
            .project(&self.center, None)
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0));
        self.unproject(&origin.add(pixel), None)
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&Point::new(self.size.x, self.size.y));

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Centers on `bounds` at the largest (fractional) zoom that still shows all of it
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        let nw = self.project(
            &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
            Some(0.0),
        );
        let se = self.project(
            &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
            Some(0.0),
        );

        let width = (se.x - nw.x).abs();
        let height = (se.y - nw.y).abs();
        if width > 0.0 && height > 0.0 && self.size.x > 0.0 && self.size.y > 0.0 {
            let zoom = (self.size.x / width).log2().min((self.size.y / height).log2());
            self.set_zoom(zoom);
        }

        let middle = Point::new((nw.x + se.x) / 2.0, (nw.y + se.y) / 2.0);
        self.center = self.unproject(&middle, Some(0.0));
    }

    /// Ground resolution in meters per pixel at the center latitude
    pub fn resolution(&self) -> f64 {
        let equator = 2.0 * PI * EARTH_RADIUS;
        equator * self.center.lat.to_radians().cos() / Self::world_size(self.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
