//! Neighbor generation strategies for route search

use super::NavGraph;
use crate::model::Waypoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Required clearance above a waypoint's elevation for radius-based legs
pub const TERRAIN_CLEARANCE_FT: i32 = 1000;

/// Which adjacency model a search uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdjacencyKind {
    /// Consecutive entries of an airway whose altitude band contains the cruise altitude
    StrictAirway,
    /// Any waypoint within the search radius that clears terrain at cruise altitude
    #[default]
    Radius,
}

/// Produces the outgoing edges of a waypoint
///
/// Edge weights must be great-circle distances (or anything no shorter), otherwise
/// the A* heuristic stops being admissible.
pub trait Adjacency {
    /// Push `(neighbor, edge weight NM)` pairs for `from` into `out`
    fn neighbors<'a>(
        &self,
        graph: &NavGraph<'a>,
        from: &'a Waypoint,
        cruise_altitude_ft: i32,
        destination_id: &str,
        out: &mut Vec<(&'a Waypoint, f64)>,
    );
}

/// Edges only between consecutive airway entries, gated by the airway altitude band
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictAirwayAdjacency;

impl Adjacency for StrictAirwayAdjacency {
    fn neighbors<'a>(
        &self,
        graph: &NavGraph<'a>,
        from: &'a Waypoint,
        cruise_altitude_ft: i32,
        _destination_id: &str,
        out: &mut Vec<(&'a Waypoint, f64)>,
    ) {
        for airway_name in graph.reverse().airways_containing(&from.id) {
            let Some(airway) = graph.store().airway(airway_name) else {
                continue;
            };
            if !airway.allows_altitude(cruise_altitude_ft) {
                continue;
            }
            for neighbor_id in airway.neighbors_of(&from.id) {
                if let Some(neighbor) = graph.store().waypoint(neighbor_id) {
                    out.push((neighbor, from.distance_to(neighbor)));
                }
            }
        }
    }
}

/// Edges to every waypoint within a radius
///
/// Waypoints whose elevation plus [`TERRAIN_CLEARANCE_FT`] exceeds the cruise altitude
/// are skipped, except the destination itself.
#[derive(Debug, Clone, Copy)]
pub struct RadiusAdjacency {
    pub radius_nm: f64,
}

impl RadiusAdjacency {
    pub fn new(radius_nm: f64) -> Self {
        Self { radius_nm }
    }
}

impl Adjacency for RadiusAdjacency {
    fn neighbors<'a>(
        &self,
        graph: &NavGraph<'a>,
        from: &'a Waypoint,
        cruise_altitude_ft: i32,
        destination_id: &str,
        out: &mut Vec<(&'a Waypoint, f64)>,
    ) {
        for nearby in graph
            .spatial()
            .nearby(from.latitude, from.longitude, self.radius_nm)
        {
            if nearby.id == from.id {
                continue;
            }
            let Some(neighbor) = graph.store().waypoint(&nearby.id) else {
                continue;
            };
            let clears_terrain =
                neighbor.elevation_ft.saturating_add(TERRAIN_CLEARANCE_FT) <= cruise_altitude_ft;
            if clears_terrain || neighbor.id == destination_id {
                out.push((neighbor, nearby.distance_nm));
            }
        }
    }
}
