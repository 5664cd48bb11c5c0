//! Spatial index for radius queries over waypoint positions
//!
//! At a few thousand waypoints a flat scan beats any tree on constant factors, so the
//! index is a plain vector of positions. A latitude-band test discards most entries
//! before the haversine is evaluated. Past roughly 10k waypoints this should become
//! a grid or R-tree.

use crate::{GazetteerStore, utils};
use geo::Point;
use std::cmp::Ordering;

/// One indexed waypoint position
#[derive(Debug, Clone)]
struct SpatialEntry {
    /// x = longitude, y = latitude
    position: Point<f64>,
    id: String,
}

/// A waypoint found by a radius query
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyWaypoint {
    pub id: String,
    pub distance_nm: f64,
}

/// Flat list of waypoint positions derived from a [`GazetteerStore`]
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    entries: Vec<SpatialEntry>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SpatialIndex {
    /// Build the index from every waypoint in the store
    pub fn build(store: &GazetteerStore) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("spatial::build");

        let mut entries: Vec<SpatialEntry> = store
            .waypoints()
            .map(|w| SpatialEntry {
                position: w.position(),
                id: w.id.clone(),
            })
            .collect();
        // Stable scan order independent of hash map iteration
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        Self { entries }
    }

    /// All waypoints within `radius_nm` of (lat, lon), nearest first
    ///
    /// Results are sorted by ascending distance with ties broken by id. A radius of 0
    /// returns exact coordinate matches only; a negative radius returns nothing.
    pub fn nearby(&self, lat: f64, lon: f64, radius_nm: f64) -> Vec<NearbyWaypoint> {
        if radius_nm.is_nan() || radius_nm < 0.0 {
            return Vec::new();
        }

        // Distance along a meridian is a lower bound on great-circle distance
        let max_delta_lat = (radius_nm / utils::EARTH_RADIUS_NM).to_degrees();

        let mut results: Vec<NearbyWaypoint> = self
            .entries
            .iter()
            .filter(|entry| (entry.position.y() - lat).abs() <= max_delta_lat)
            .filter_map(|entry| {
                let distance_nm =
                    utils::haversine_nm(lat, lon, entry.position.y(), entry.position.x());
                (distance_nm <= radius_nm).then(|| NearbyWaypoint {
                    id: entry.id.clone(),
                    distance_nm,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance_nm
                .partial_cmp(&b.distance_nm)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
