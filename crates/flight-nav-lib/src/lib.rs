//! Flight Navigation Library - Navigation Database and Airway Routing
//!
//! This library stores waypoints, airways and terminal procedures, answers point and
//! proximity queries, and computes altitude-constrained routes over the airway graph.
//! Everything is read-mostly: a dataset is loaded once and then queried concurrently
//! from many threads.
//!
//! # Architecture
//!
//! - **[`model`]**: Plain entity records (waypoints, airways, SIDs, STARs, approaches)
//! - **[`GazetteerStore`]**: Owns the entities, keyed by identifier
//! - **[`SpatialIndex`]**: Radius queries over waypoint positions
//! - **[`ReverseIndex`]**: Waypoint id to the airways that contain it
//! - **[`PathPlanner`]**: Best-first search with pluggable adjacency
//!   ([`StrictAirwayAdjacency`] or [`RadiusAdjacency`])
//! - **[`RouteCache`]**: Capacity-bounded TTL cache of computed routes
//! - **[`AirwayRouter`]**: Annotated route products (segments, fuel, time, heading)
//! - **[`NavDatabase`]**: Thread-safe facade; one reader/writer lock over the store and
//!   indices, a separate mutex over the route cache
//!
//! # Performance Characteristics
//!
//! - **Point lookups**: O(1)
//! - **Radius queries**: O(N) linear scan, fine for a few thousand waypoints
//! - **Route search**: O((V + E) log V) over the eligible airway graph

mod cache;
mod config;
mod database;
mod dataset;
pub mod logging;
pub mod model;
mod planner;
mod reverse;
mod router;
mod spatial;
mod store;
pub mod utils;
mod validation;

// Public API exports
pub use cache::{
    CacheStats, CachedRoute, Clock, ManualClock, MonotonicClock, RouteCache, RouteKey,
};
pub use config::NavConfig;
pub use database::{NavDatabase, NavStatistics, RouteResult};
pub use dataset::NavDataset;
pub use model::{
    Airway, AirwayLevel, ApproachKind, ApproachProcedure, Sid, Star, Waypoint, WaypointType,
};
pub use planner::{
    Adjacency, AdjacencyKind, NavGraph, PathPlanner, RadiusAdjacency, SearchOutcome,
    StrictAirwayAdjacency, TERRAIN_CLEARANCE_FT,
};
pub use reverse::ReverseIndex;
pub use router::{
    AirwayRouter, DIRECT_MAXIMUM_ALTITUDE_FT, RoutePlan, RouteQuality, RouteSegment,
    route_description,
};
pub use spatial::{NearbyWaypoint, SpatialIndex};
pub use store::GazetteerStore;
pub use validation::{
    FlightPlanValidation, MAX_CRUISE_ALTITUDE_FT, MIN_CRUISE_ALTITUDE_FT,
    VALIDATION_REFERENCE_SPEED_KT, ValidationError, ValidationWarning, validate_flight_plan,
};

/// A single data-integrity violation found while checking a dataset
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsistencyIssue {
    #[error("Waypoint {id} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Airway {airway} references unknown waypoint {waypoint}")]
    UnknownAirwayWaypoint { airway: String, waypoint: String },

    #[error("Airway {airway} has {count} waypoints, at least 2 required")]
    AirwayTooShort { airway: String, count: usize },

    #[error("Airway {airway} has an inverted altitude band [{minimum_ft}, {maximum_ft}]")]
    InvalidAltitudeBand {
        airway: String,
        minimum_ft: i32,
        maximum_ft: i32,
    },

    #[error("Procedure {procedure} references unknown waypoint {waypoint}")]
    UnknownProcedureWaypoint { procedure: String, waypoint: String },

    #[error("Duplicate {kind} identifier {id}")]
    Duplicate { kind: &'static str, id: String },
}

/// Error types for the navigation library
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Inconsistent dataset: {0}")]
    Inconsistent(#[from] ConsistencyIssue),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(NavConfig) -> NavDatabase = NavDatabase::new;
        let _: fn() -> NavConfig = NavConfig::default;
        let _: fn() -> NavDataset = NavDataset::builtin;
    }

    #[test]
    fn test_error_messages() {
        let issue = ConsistencyIssue::UnknownAirwayWaypoint {
            airway: "J80".into(),
            waypoint: "NOPE".into(),
        };
        assert_eq!(issue.to_string(), "Airway J80 references unknown waypoint NOPE");

        let err = NavError::from(issue);
        assert!(err.to_string().starts_with("Inconsistent dataset:"));
    }
}
