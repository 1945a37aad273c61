//! Turning a GPS track into something a map can draw.

use crate::api::TrackPoint;

/// Geographic extent of a track, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    fn around(latitude: f64, longitude: f64) -> Self {
        Self {
            south: latitude,
            west: longitude,
            north: latitude,
            east: longitude,
        }
    }

    fn include(&mut self, latitude: f64, longitude: f64) {
        self.south = self.south.min(latitude);
        self.north = self.north.max(latitude);
        self.west = self.west.min(longitude);
        self.east = self.east.max(longitude);
    }

    /// Grows the box by `fraction` of its span on every side, with a floor of
    /// `min_margin` degrees so a single point still gets a visible area.
    #[must_use]
    pub fn padded(&self, fraction: f64, min_margin: f64) -> Self {
        let lat = ((self.north - self.south) * fraction).max(min_margin);
        let lon = ((self.east - self.west) * fraction).max(min_margin);
        Self {
            south: self.south - lat,
            west: self.west - lon,
            north: self.north + lat,
            east: self.east + lon,
        }
    }
}

/// What the map panel shows for a track.
#[derive(Debug, Clone, PartialEq)]
pub enum MapView {
    /// The track has no points; nothing to center on.
    NoTrack,
    Track {
        /// `(latitude, longitude)` per point, in recording order.
        polyline: Vec<(f64, f64)>,
        /// The middle sample, `points[len / 2]`.
        center: TrackPoint,
        start: (f64, f64),
        end: (f64, f64),
        bounds: Bounds,
    },
}

impl MapView {
    #[must_use]
    pub const fn is_track(&self) -> bool {
        matches!(self, Self::Track { .. })
    }
}

/// Derives the map view for a track.
///
/// The center is the sample at index `len / 2` rounded down, so for an even
/// length it is the later of the two middle samples.
#[must_use]
pub fn derive_map_view(points: &[TrackPoint]) -> MapView {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return MapView::NoTrack;
    };

    let mut bounds = Bounds::around(first.latitude, first.longitude);
    let polyline = points
        .iter()
        .map(|p| {
            bounds.include(p.latitude, p.longitude);
            (p.latitude, p.longitude)
        })
        .collect();

    MapView::Track {
        polyline,
        center: points[points.len() / 2].clone(),
        start: (first.latitude, first.longitude),
        end: (last.latitude, last.longitude),
        bounds,
    }
}
