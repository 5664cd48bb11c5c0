//! Thread-safe navigation database
//!
//! One reader/writer lock guards the store together with both derived indices, so a
//! query never sees a store paired with indices from another dataset. The route cache
//! sits behind its own mutex. When both are needed the state lock is always taken
//! first.

use crate::cache::{self, CacheStats, Clock, MonotonicClock, RouteCache, RouteKey};
use crate::model::{
    Airway, ApproachKind, ApproachProcedure, Sid, Star, Waypoint, WaypointType,
};
use crate::planner::{NavGraph, PathPlanner};
use crate::router::route_description;
use crate::validation::{self, FlightPlanValidation, VALIDATION_REFERENCE_SPEED_KT};
use crate::{
    AdjacencyKind, AirwayRouter, GazetteerStore, NavConfig, NavDataset, NavError,
    NearbyWaypoint, ReverseIndex, Result, RoutePlan, SpatialIndex, utils,
};

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Store and indices of one loaded dataset
#[derive(Debug, Default)]
struct NavState {
    store: GazetteerStore,
    spatial: SpatialIndex,
    reverse: ReverseIndex,
    ready: bool,
    /// Bumped on every successful load
    generation: u64,
    last_update_time_ms: u64,
}

impl NavState {
    fn graph(&self) -> NavGraph<'_> {
        NavGraph::new(&self.store, &self.spatial, &self.reverse)
    }
}

/// Outcome of [`NavDatabase::find_route`]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteResult {
    /// `false` only when an endpoint is unknown
    pub success: bool,
    pub waypoint_sequence: Vec<String>,
    /// One entry per consecutive pair in `waypoint_sequence`
    pub leg_distances_nm: Vec<f64>,
    pub total_distance_nm: f64,
    pub estimated_time_minutes: f64,
    pub fuel_required_lb: f64,
    pub route_description: String,
    /// No airway path existed at the requested altitude
    pub is_direct: bool,
}

/// Counts and status of the loaded dataset
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavStatistics {
    pub waypoint_count: usize,
    pub airway_count: usize,
    pub sid_count: usize,
    pub star_count: usize,
    pub approach_count: usize,
    pub average_airway_distance_nm: f64,
    pub is_ready: bool,
    /// Database clock reading at the last successful load
    pub last_update_time_ms: u64,
    pub generation: u64,
}

/// Navigation database shared between threads
///
/// Starts empty; [`load`](Self::load) installs a dataset and can be called again to
/// replace it. All queries take `&self` and return owned values.
#[derive(Debug)]
pub struct NavDatabase {
    config: NavConfig,
    state: RwLock<NavState>,
    cache: Mutex<RouteCache>,
    clock: Arc<dyn Clock>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl NavDatabase {
    /// Create an empty database with the given configuration
    pub fn new(config: NavConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Like [`new`](Self::new) but rejects an invalid configuration
    pub fn try_new(config: NavConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create an empty database whose cache and timestamps read `clock`
    pub fn with_clock(config: NavConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = RouteCache::with_clock(
            config.route_cache_capacity,
            config.route_cache_ttl,
            clock.clone(),
        );
        Self {
            config,
            state: RwLock::new(NavState::default()),
            cache: Mutex::new(cache),
            clock,
        }
    }

    /// Create a database loaded with [`NavDataset::builtin`]
    pub fn with_builtin_data(config: NavConfig) -> Result<Self> {
        let database = Self::try_new(config)?;
        database.load(NavDataset::builtin())?;
        Ok(database)
    }

    /// Validate `dataset` and make it the current one
    ///
    /// Indices are built before the write lock is taken, so readers keep using the
    /// previous dataset until the swap. Routes cached for the previous dataset are
    /// dropped. A rejected dataset leaves the database untouched.
    pub fn load(&self, dataset: NavDataset) -> Result<()> {
        #[cfg(feature = "profiling")]
        profiling::scope!("database::load");

        let start = instant::Instant::now();
        let store = GazetteerStore::from_dataset(dataset).map_err(|issue| {
            tracing::warn!(%issue, "Dataset rejected");
            NavError::from(issue)
        })?;
        let (spatial, reverse) = rayon::join(
            || SpatialIndex::build(&store),
            || ReverseIndex::build(&store),
        );

        let mut state = self.write_state();
        let generation = state.generation + 1;
        *state = NavState {
            store,
            spatial,
            reverse,
            ready: true,
            generation,
            last_update_time_ms: self.clock.now_ms(),
        };
        cache::lock(&self.cache).clear();

        tracing::info!(
            waypoints = state.store.waypoint_count(),
            airways = state.store.airway_count(),
            sids = state.store.sid_count(),
            stars = state.store.star_count(),
            approaches = state.store.approach_count(),
            generation,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Navigation data loaded"
        );
        Ok(())
    }

    /// Configuration this database was built with
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Whether a dataset has been loaded
    pub fn is_ready(&self) -> bool {
        self.read_state().ready
    }

    /// Number of successful loads so far
    pub fn generation(&self) -> u64 {
        self.read_state().generation
    }

    // ------------------------------------------------------------------
    // Waypoints
    // ------------------------------------------------------------------

    /// Waypoint by id
    pub fn get_waypoint(&self, id: &str) -> Option<Waypoint> {
        self.read_state().store.waypoint(id).cloned()
    }

    /// All waypoints of one type, ordered by id
    pub fn get_waypoints_by_type(&self, kind: WaypointType) -> Vec<Waypoint> {
        self.read_state()
            .store
            .waypoints_by_type(kind)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Waypoints within `radius_nm` of a position, nearest first
    pub fn get_waypoints_nearby(&self, lat: f64, lon: f64, radius_nm: f64) -> Vec<Waypoint> {
        let state = self.read_state();
        state
            .spatial
            .nearby(lat, lon, radius_nm)
            .iter()
            .filter_map(|hit| state.store.waypoint(&hit.id).cloned())
            .collect()
    }

    /// Same as [`get_waypoints_nearby`](Self::get_waypoints_nearby) with distances
    pub fn get_waypoints_nearby_with_distance(
        &self,
        lat: f64,
        lon: f64,
        radius_nm: f64,
    ) -> Vec<NearbyWaypoint> {
        self.read_state().spatial.nearby(lat, lon, radius_nm)
    }

    /// Number of loaded waypoints
    pub fn get_waypoint_count(&self) -> usize {
        self.read_state().store.waypoint_count()
    }

    // ------------------------------------------------------------------
    // Airways
    // ------------------------------------------------------------------

    /// Airway by name
    pub fn get_airway(&self, name: &str) -> Option<Airway> {
        self.read_state().store.airway(name).cloned()
    }

    /// Waypoints of an airway in sequence order
    pub fn get_airway_waypoints(&self, name: &str) -> Vec<Waypoint> {
        self.read_state()
            .store
            .airway_waypoints(name)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Airways on which `a` and `b` are consecutive entries
    pub fn get_connecting_airways(&self, a: &str, b: &str) -> Vec<Airway> {
        self.read_state()
            .store
            .connecting_airways(a, b)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Airways whose altitude band contains `altitude_ft`
    pub fn get_airways_by_altitude(&self, altitude_ft: i32) -> Vec<Airway> {
        self.read_state()
            .store
            .airways_by_altitude(altitude_ft)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Names of the airways passing through a waypoint
    pub fn get_airways_through(&self, waypoint_id: &str) -> Vec<String> {
        self.read_state()
            .reverse
            .airways_containing(waypoint_id)
            .to_vec()
    }

    /// Number of loaded airways
    pub fn get_airway_count(&self) -> usize {
        self.read_state().store.airway_count()
    }

    // ------------------------------------------------------------------
    // Procedures
    // ------------------------------------------------------------------

    /// SID for an airport runway
    pub fn get_sid(&self, airport: &str, runway: &str) -> Option<Sid> {
        self.read_state().store.sid(airport, runway).cloned()
    }

    /// All SIDs of an airport
    pub fn get_sids_by_airport(&self, airport: &str) -> Vec<Sid> {
        self.read_state()
            .store
            .sids_by_airport(airport)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of loaded SIDs
    pub fn get_sid_count(&self) -> usize {
        self.read_state().store.sid_count()
    }

    /// STAR for an airport runway
    pub fn get_star(&self, airport: &str, runway: &str) -> Option<Star> {
        self.read_state().store.star(airport, runway).cloned()
    }

    /// All STARs of an airport
    pub fn get_stars_by_airport(&self, airport: &str) -> Vec<Star> {
        self.read_state()
            .store
            .stars_by_airport(airport)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of loaded STARs
    pub fn get_star_count(&self) -> usize {
        self.read_state().store.star_count()
    }

    /// Approach of one kind to an airport runway
    pub fn get_approach(
        &self,
        airport: &str,
        runway: &str,
        kind: ApproachKind,
    ) -> Option<ApproachProcedure> {
        self.read_state()
            .store
            .approach(airport, runway, kind)
            .cloned()
    }

    /// All approaches to an airport runway
    pub fn get_approaches_for_runway(&self, airport: &str, runway: &str) -> Vec<ApproachProcedure> {
        self.read_state()
            .store
            .approaches_for_runway(airport, runway)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All approaches of an airport
    pub fn get_approaches_by_airport(&self, airport: &str) -> Vec<ApproachProcedure> {
        self.read_state()
            .store
            .approaches_by_airport(airport)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of loaded approach procedures
    pub fn get_approach_count(&self) -> usize {
        self.read_state().store.approach_count()
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Great-circle distance in NM, `None` if either waypoint is unknown
    pub fn calculate_distance(&self, from: &str, to: &str) -> Option<f64> {
        let state = self.read_state();
        let a = state.store.waypoint(from)?;
        let b = state.store.waypoint(to)?;
        Some(a.distance_to(b))
    }

    /// Great-circle distance in NM between two positions
    pub fn calculate_distance_coordinates(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        utils::haversine_nm(lat1, lon1, lat2, lon2)
    }

    /// Magnetic heading in `[0, 360)`, `None` if either waypoint is unknown
    pub fn calculate_heading(&self, from: &str, to: &str) -> Option<f64> {
        let state = self.read_state();
        let a = state.store.waypoint(from)?;
        let b = state.store.waypoint(to)?;
        Some(utils::true_to_magnetic(
            a.bearing_to(b),
            self.config.magnetic_variation_deg,
        ))
    }

    /// Minutes to fly `distance_nm`, 0 when the speed is not positive
    pub fn calculate_flight_time(&self, distance_nm: f64, ground_speed_kt: f64) -> f64 {
        utils::flight_time_minutes(distance_nm, ground_speed_kt)
    }

    // ------------------------------------------------------------------
    // Flight plans and routes
    // ------------------------------------------------------------------

    /// Validate a waypoint sequence, timed at [`VALIDATION_REFERENCE_SPEED_KT`]
    pub fn validate_flight_plan<S: AsRef<str>>(
        &self,
        sequence: &[S],
        cruise_altitude_ft: i32,
    ) -> FlightPlanValidation {
        validation::validate_flight_plan(
            &self.read_state().store,
            sequence,
            cruise_altitude_ft,
            VALIDATION_REFERENCE_SPEED_KT,
        )
    }

    /// Shortest airway route at a cruise altitude, direct when no airway path exists
    ///
    /// Uses Dijkstra over strict airway adjacency. Results, including direct
    /// fallbacks, are cached per (origin, destination, altitude).
    pub fn find_route(&self, origin: &str, destination: &str, cruise_altitude_ft: i32) -> RouteResult {
        #[cfg(feature = "profiling")]
        profiling::scope!("database::find_route");

        let state = self.read_state();
        let store = &state.store;
        if store.waypoint(origin).is_none() || store.waypoint(destination).is_none() {
            tracing::debug!(origin, destination, "Route endpoint not found");
            return RouteResult::default();
        }

        let key = RouteKey::new(
            origin,
            destination,
            cruise_altitude_ft,
            AdjacencyKind::StrictAirway,
        );
        let cached = cache::lock(&self.cache).lookup(&key, state.generation);

        let (ids, is_direct) = match cached {
            Some(cached) => (cached.waypoint_ids, cached.is_direct),
            None => {
                let outcome =
                    PathPlanner::new(state.graph()).find_route(origin, destination, cruise_altitude_ft);
                let (ids, is_direct) = if outcome.is_found() {
                    (outcome.ids(), false)
                } else {
                    tracing::warn!(
                        origin,
                        destination,
                        cruise_altitude_ft,
                        "No airway route, falling back to direct"
                    );
                    (vec![origin.to_string(), destination.to_string()], true)
                };
                cache::lock(&self.cache).store(key, ids.clone(), is_direct, state.generation);
                (ids, is_direct)
            }
        };

        let leg_distances_nm: Vec<f64> = ids
            .windows(2)
            .map(|pair| {
                match (store.waypoint(&pair[0]), store.waypoint(&pair[1])) {
                    (Some(a), Some(b)) => a.distance_to(b),
                    _ => 0.0,
                }
            })
            .collect();
        let total_distance_nm: f64 = leg_distances_nm.iter().sum();

        RouteResult {
            success: true,
            route_description: route_description(&ids, total_distance_nm, is_direct),
            waypoint_sequence: ids,
            leg_distances_nm,
            total_distance_nm,
            estimated_time_minutes: utils::flight_time_minutes(
                total_distance_nm,
                self.config.cruise_speed_kt,
            ),
            fuel_required_lb: total_distance_nm * self.config.fuel_burn_lb_per_nm,
            is_direct,
        }
    }

    /// A* route under an explicit adjacency model
    pub fn find_optimal_route(
        &self,
        origin: &str,
        destination: &str,
        cruise_altitude_ft: i32,
        adjacency: AdjacencyKind,
    ) -> Option<RoutePlan> {
        let state = self.read_state();
        self.router(&state)
            .find_optimal_route(origin, destination, cruise_altitude_ft, adjacency)
    }

    /// Single great-circle leg, see [`AirwayRouter::find_direct_route`]
    pub fn find_direct_route(&self, origin: &str, destination: &str) -> Option<RoutePlan> {
        let state = self.read_state();
        self.router(&state).find_direct_route(origin, destination)
    }

    /// Up to `max_results` candidate routes, see [`AirwayRouter::find_alternate_routes`]
    pub fn find_alternate_routes(
        &self,
        origin: &str,
        destination: &str,
        max_results: usize,
    ) -> Vec<RoutePlan> {
        let state = self.read_state();
        self.router(&state)
            .find_alternate_routes(origin, destination, max_results)
    }

    /// Route along preferred airways, see [`AirwayRouter::find_preferred_route`]
    pub fn find_preferred_route<S: AsRef<str>>(
        &self,
        origin: &str,
        destination: &str,
        preferred_airways: &[S],
        cruise_altitude_ft: i32,
    ) -> Option<RoutePlan> {
        let state = self.read_state();
        self.router(&state).find_preferred_route(
            origin,
            destination,
            preferred_airways,
            cruise_altitude_ft,
        )
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Entity counts and load state
    pub fn get_statistics(&self) -> NavStatistics {
        let state = self.read_state();
        NavStatistics {
            waypoint_count: state.store.waypoint_count(),
            airway_count: state.store.airway_count(),
            sid_count: state.store.sid_count(),
            star_count: state.store.star_count(),
            approach_count: state.store.approach_count(),
            average_airway_distance_nm: state.store.average_airway_distance_nm(),
            is_ready: state.ready,
            last_update_time_ms: state.last_update_time_ms,
            generation: state.generation,
        }
    }

    /// First integrity violation of the loaded dataset, empty when consistent
    pub fn check_database_consistency(&self) -> String {
        self.read_state()
            .store
            .check_consistency()
            .map(|issue| issue.to_string())
            .unwrap_or_default()
    }

    /// Route cache counters
    pub fn cache_stats(&self) -> CacheStats {
        cache::lock(&self.cache).stats()
    }

    /// Drop every cached route
    pub fn clear_route_cache(&self) {
        cache::lock(&self.cache).clear();
    }

    fn router<'a>(&'a self, state: &'a NavState) -> AirwayRouter<'a> {
        AirwayRouter::new(state.graph(), &self.config).with_cache(&self.cache, state.generation)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, NavState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Navigation state lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, NavState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Navigation state lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use crate::model::AirwayLevel;
    use rayon::prelude::*;
    use std::time::Duration;

    fn create_test_database() -> NavDatabase {
        NavDatabase::with_builtin_data(NavConfig::default()).unwrap()
    }

    fn fix(id: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(id, lat, lon, WaypointType::Fix)
    }

    fn line_dataset() -> NavDataset {
        NavDataset::new()
            .with_waypoints([
                fix("W1", 40.0, -76.0),
                fix("W2", 40.1, -75.0),
                fix("W3", 40.0, -74.0),
                fix("W4", 40.1, -73.0),
            ])
            .with_airways([Airway::new(
                "V1",
                AirwayLevel::Low,
                1200,
                18000,
                ["W1", "W2", "W3", "W4"],
            )])
    }

    #[test]
    fn test_uninitialized_database_is_empty() {
        let database = NavDatabase::new(NavConfig::default());
        assert!(!database.is_ready());
        assert_eq!(database.generation(), 0);
        assert!(database.get_waypoint("KJFK").is_none());
        assert!(database.get_waypoints_nearby(40.0, -74.0, 500.0).is_empty());
        assert!(!database.find_route("KJFK", "KLAX", 35000).success);
        assert_eq!(database.get_statistics(), NavStatistics::default());
        assert!(database.check_database_consistency().is_empty());
    }

    #[test]
    fn test_builtin_load() {
        let database = create_test_database();
        let stats = database.get_statistics();
        assert!(stats.is_ready);
        assert_eq!(stats.generation, 1);
        assert!(stats.waypoint_count > 50);
        assert_eq!(stats.airway_count, 11);
        assert_eq!(stats.sid_count, 4);
        assert_eq!(stats.star_count, 3);
        assert!(stats.average_airway_distance_nm > 0.0);
        assert!(database.check_database_consistency().is_empty());
    }

    #[test]
    fn test_rejected_dataset_keeps_previous() {
        let database = create_test_database();
        let broken = NavDataset::new()
            .with_waypoints([fix("A", 10.0, 10.0)])
            .with_airways([Airway::new("V9", AirwayLevel::Low, 1200, 18000, ["A", "GHOST"])]);

        let err = database.load(broken).unwrap_err();
        assert!(matches!(err, NavError::Inconsistent(_)));
        assert!(err.to_string().contains("GHOST"));
        assert!(database.get_waypoint("KJFK").is_some());
        assert_eq!(database.generation(), 1);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = NavConfig {
            route_cache_capacity: 0,
            ..Default::default()
        };
        assert!(NavDatabase::try_new(config.clone()).is_err());
        assert!(NavDatabase::with_builtin_data(config).is_err());
    }

    #[test]
    fn test_waypoint_queries() {
        let database = create_test_database();
        let jfk = database.get_waypoint("KJFK").unwrap();
        assert_eq!(jfk, database.get_waypoint("KJFK").unwrap());
        assert_eq!(jfk.kind, WaypointType::Airport);

        let airports = database.get_waypoints_by_type(WaypointType::Airport);
        assert_eq!(airports.len(), 20);
        assert!(airports.windows(2).all(|w| w[0].id < w[1].id));

        let nearby = database.get_waypoints_nearby(jfk.latitude, jfk.longitude, 0.0);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].id, "KJFK");

        let around = database.get_waypoints_nearby_with_distance(jfk.latitude, jfk.longitude, 30.0);
        assert_eq!(around[0].id, "KJFK");
        assert!(around.iter().any(|w| w.id == "JFK"));
    }

    #[test]
    fn test_airway_queries() {
        let database = create_test_database();
        let j80 = database.get_airway("J80").unwrap();
        let waypoints = database.get_airway_waypoints("J80");
        assert_eq!(waypoints.len(), j80.waypoints.len());
        assert_eq!(waypoints[0].id, "KJFK");

        let connecting = database.get_connecting_airways("KJFK", "JFK");
        let names: Vec<&str> = connecting.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["J80", "V16"]);
        assert!(database.get_connecting_airways("KJFK", "ETX").is_empty());

        assert_eq!(database.get_airways_through("JFK"), vec!["J80", "V139", "V16"]);
        assert_eq!(database.get_airways_by_altitude(35000).len(), 8);
        assert_eq!(database.get_airways_by_altitude(10000).len(), 3);
    }

    #[test]
    fn test_procedure_queries() {
        let database = create_test_database();
        assert_eq!(database.get_sid("KJFK", "31L").unwrap().name, "SKORR5");
        assert_eq!(database.get_sids_by_airport("KJFK").len(), 2);
        assert!(database.get_sids_by_airport("KSEA").is_empty());
        assert_eq!(database.get_star("KLAX", "24R").unwrap().name, "ANJLL4");
        assert_eq!(database.get_stars_by_airport("KORD").len(), 1);

        let ils = database.get_approach("KLAX", "24R", ApproachKind::Ils).unwrap();
        assert!(ils.has_glideslope);
        assert_eq!(database.get_approaches_for_runway("KLAX", "24R").len(), 2);
        assert_eq!(database.get_approaches_by_airport("KJFK").len(), 2);
        assert!(database.get_approach("KLAX", "24R", ApproachKind::Ndb).is_none());
    }

    #[test]
    fn test_geometry() {
        let database = create_test_database();
        assert_eq!(database.calculate_distance("KJFK", "KJFK"), Some(0.0));
        assert_eq!(database.calculate_distance("KJFK", "NOPE"), None);
        assert_eq!(database.calculate_heading("NOPE", "KJFK"), None);

        let ab = database.calculate_distance("KJFK", "KORD").unwrap();
        let bc = database.calculate_distance("KORD", "KLAX").unwrap();
        let ac = database.calculate_distance("KJFK", "KLAX").unwrap();
        assert!(ac <= ab + bc + 1e-6);

        let heading = database.calculate_heading("KJFK", "KLAX").unwrap();
        assert!((0.0..360.0).contains(&heading));
        // Westbound
        assert!(heading > 180.0 && heading < 360.0);

        let direct = database.calculate_distance_coordinates(0.0, 0.0, 0.0, 1.0);
        assert!((direct - 60.04).abs() < 0.01);

        assert_eq!(database.calculate_flight_time(450.0, 450.0), 60.0);
        assert_eq!(database.calculate_flight_time(450.0, 0.0), 0.0);
        assert_eq!(database.calculate_flight_time(450.0, -10.0), 0.0);
    }

    #[test]
    fn test_find_route_along_airway() {
        let database = NavDatabase::new(NavConfig::default());
        database.load(line_dataset()).unwrap();

        let result = database.find_route("W1", "W4", 10000);
        assert!(result.success);
        assert!(!result.is_direct);
        assert_eq!(result.waypoint_sequence, vec!["W1", "W2", "W3", "W4"]);
        assert_eq!(result.leg_distances_nm.len(), 3);
        let sum: f64 = result.leg_distances_nm.iter().sum();
        assert!((result.total_distance_nm - sum).abs() < 1e-9);
        assert!(result.route_description.starts_with("W1 -> W2 -> W3 -> W4 ("));
        assert!((result.fuel_required_lb - sum * 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_find_route_falls_back_to_direct() {
        let database = NavDatabase::new(NavConfig::default());
        database.load(line_dataset()).unwrap();

        let result = database.find_route("W1", "W4", 30000);
        assert!(result.success);
        assert!(result.is_direct);
        assert_eq!(result.waypoint_sequence, vec!["W1", "W4"]);
        let direct = database.calculate_distance("W1", "W4").unwrap();
        assert!((result.total_distance_nm - direct).abs() < 1e-9);
        assert_eq!(
            result.route_description,
            format!("W1 direct to W4 ({} NM)", direct as i64)
        );
    }

    #[test]
    fn test_find_route_unknown_endpoint() {
        let database = create_test_database();
        let result = database.find_route("KJFK", "NOPE", 35000);
        assert!(!result.success);
        assert!(result.waypoint_sequence.is_empty());
    }

    #[test]
    fn test_find_route_uses_cache_until_ttl() {
        let clock = Arc::new(ManualClock::new(0));
        let database = NavDatabase::with_clock(NavConfig::default(), clock.clone());
        database.load(NavDataset::builtin()).unwrap();

        let first = database.find_route("KJFK", "KLAX", 35000);
        let second = database.find_route("KJFK", "KLAX", 35000);
        assert_eq!(first, second);
        assert_eq!(database.cache_stats().hits, 1);
        assert_eq!(database.cache_stats().misses, 1);

        clock.advance(Duration::from_secs(3600));
        let third = database.find_route("KJFK", "KLAX", 35000);
        assert_eq!(third.waypoint_sequence, first.waypoint_sequence);
        let stats = database.cache_stats();
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_reload_invalidates_cache() {
        let database = NavDatabase::new(NavConfig::default());
        database.load(line_dataset()).unwrap();
        assert!(!database.find_route("W1", "W4", 10000).is_direct);

        // Same waypoints, no airways
        let mut bare = line_dataset();
        bare.airways.clear();
        database.load(bare).unwrap();

        assert_eq!(database.generation(), 2);
        assert_eq!(database.cache_stats().entries, 0);
        assert!(database.find_route("W1", "W4", 10000).is_direct);
    }

    #[test]
    fn test_find_route_independent_of_a_star_cache() {
        // Two equal-cost airways between S and T
        let dataset = NavDataset::new()
            .with_waypoints([
                fix("S", 0.0, 0.0),
                fix("ZULU", 0.3, 0.5),
                fix("ALPHA", 0.3, 1.5),
                fix("T", 0.0, 2.0),
            ])
            .with_airways([
                Airway::new("V1", AirwayLevel::Low, 1200, 18000, ["S", "ZULU", "T"]),
                Airway::new("V2", AirwayLevel::Low, 1200, 18000, ["S", "ALPHA", "T"]),
            ]);

        let fresh = NavDatabase::new(NavConfig::default());
        fresh.load(dataset.clone()).unwrap();
        let expected = fresh.find_route("S", "T", 10000).waypoint_sequence;

        let database = NavDatabase::new(NavConfig::default());
        database.load(dataset).unwrap();
        database
            .find_optimal_route("S", "T", 10000, AdjacencyKind::StrictAirway)
            .unwrap();
        let after = database.find_route("S", "T", 10000).waypoint_sequence;

        assert_eq!(after, expected);
        assert_eq!(database.cache_stats().entries, 2);
    }

    #[test]
    fn test_router_entry_points() {
        let database = create_test_database();
        let optimal = database
            .find_optimal_route("KJFK", "KLAX", 35000, AdjacencyKind::StrictAirway)
            .unwrap();
        assert_eq!(optimal.airways_used().first(), Some(&"J80"));

        let direct = database.find_direct_route("KJFK", "KLAX").unwrap();
        assert!(direct.total_distance_nm < optimal.total_distance_nm);

        assert_eq!(database.find_alternate_routes("KJFK", "KORD", 3).len(), 3);
        let preferred = database
            .find_preferred_route("KJFK", "KORD", &["J80"], 35000)
            .unwrap();
        assert_eq!(preferred.icao_route(), "KJFK J80 KORD");
    }

    #[test]
    fn test_flight_plan_validation() {
        let database = create_test_database();
        assert!(!database.validate_flight_plan::<&str>(&[], 10000).is_valid);
        assert!(!database.validate_flight_plan(&["KJFK", "KLAX"], 500).is_valid);

        let valid = database.validate_flight_plan(&["KJFK", "KLAX"], 35000);
        assert!(valid.is_valid);
        assert!((valid.total_distance_nm - 2146.0).abs() < 50.0);
        assert!(valid.estimated_time_minutes > 0.0);
    }

    #[test]
    fn test_flight_plan_validation_uses_reference_speed() {
        let config = NavConfig {
            cruise_speed_kt: 200.0,
            ..Default::default()
        };
        let database = NavDatabase::with_builtin_data(config).unwrap();
        let result = database.validate_flight_plan(&["KJFK", "KORD"], 35000);
        let expected = result.total_distance_nm / VALIDATION_REFERENCE_SPEED_KT * 60.0;
        assert!((result.estimated_time_minutes - expected).abs() < 1e-9);
    }

    #[test]
    fn test_concurrent_mixed_queries() {
        let database = create_test_database();
        let expected_route = database.find_route("KJFK", "KLAX", 35000).waypoint_sequence;
        let expected_nearby = database.get_waypoints_nearby(40.64, -73.78, 50.0).len();

        std::thread::scope(|scope| {
            for t in 0..4 {
                let database = &database;
                let expected_route = &expected_route;
                scope.spawn(move || {
                    (0..25).into_par_iter().for_each(|i| match (t * 25 + i) % 3 {
                        0 => assert!(database.get_waypoint("KORD").is_some()),
                        1 => assert_eq!(
                            &database.find_route("KJFK", "KLAX", 35000).waypoint_sequence,
                            expected_route
                        ),
                        _ => assert_eq!(
                            database.get_waypoints_nearby(40.64, -73.78, 50.0).len(),
                            expected_nearby
                        ),
                    });
                });
            }
        });

        assert!(database.cache_stats().hits >= 1);
    }

    #[test]
    fn test_concurrent_reload_and_queries() {
        let database = create_test_database();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..3 {
                    database.load(NavDataset::builtin()).unwrap();
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..20 {
                        let result = database.find_route("KJFK", "KORD", 35000);
                        assert!(result.success);
                        assert_eq!(result.waypoint_sequence.first().map(String::as_str), Some("KJFK"));
                    }
                });
            }
        });
        assert_eq!(database.generation(), 4);
    }
}
