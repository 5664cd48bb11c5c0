//! Annotated route products on top of the planner
//!
//! The router turns waypoint paths into [`RoutePlan`]s with per-leg airway, heading,
//! altitude limits, fuel and time. It offers optimal, direct, alternate and preferred
//! airway strategies, and consults the route cache when one is attached.

mod format;

pub use format::route_description;

use crate::cache::{self, RouteCache, RouteKey};
use crate::model::{Airway, Waypoint};
use crate::planner::{NavGraph, PathPlanner, RadiusAdjacency, SearchOutcome};
use crate::{AdjacencyKind, NavConfig, StrictAirwayAdjacency, TERRAIN_CLEARANCE_FT, utils};
use std::sync::Mutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ceiling for legs flown off airways
pub const DIRECT_MAXIMUM_ALTITUDE_FT: i32 = 60000;

/// Distance at which the cost index saturates
const COST_INDEX_SATURATION_NM: f64 = 3000.0;

/// One leg of a route
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSegment {
    pub from: String,
    pub to: String,
    /// Airway flown, `None` for a direct leg
    pub airway: Option<String>,
    pub distance_nm: f64,
    pub magnetic_heading_deg: f64,
    pub minimum_altitude_ft: i32,
    pub maximum_altitude_ft: i32,
    pub fuel_burn_lb: f64,
    pub estimated_time_minutes: f64,
}

impl RouteSegment {
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.airway.is_none()
    }
}

/// Summary score of a route
///
/// `None` counters are not computed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteQuality {
    /// Linear in distance, 1.0 from 3000 NM up
    pub cost_index: f64,
    pub altitude_violations: Option<u32>,
    pub turn_violations: Option<u32>,
}

impl RouteQuality {
    fn for_distance(total_distance_nm: f64) -> Self {
        Self {
            cost_index: (total_distance_nm / COST_INDEX_SATURATION_NM).min(1.0),
            altitude_violations: None,
            turn_violations: None,
        }
    }
}

/// A complete route with totals
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoutePlan {
    pub origin: String,
    pub destination: String,
    /// `None` for a direct route, which is flown at any altitude in its band
    pub cruise_altitude_ft: Option<i32>,
    pub segments: Vec<RouteSegment>,
    pub total_distance_nm: f64,
    pub total_fuel_lb: f64,
    pub estimated_time_minutes: f64,
    pub quality: RouteQuality,
    /// Single great-circle leg rather than a searched path
    pub is_direct: bool,
}

impl RoutePlan {
    /// Waypoint ids from origin to destination
    pub fn waypoint_ids(&self) -> Vec<&str> {
        let mut ids = Vec::with_capacity(self.segments.len() + 1);
        ids.push(self.origin.as_str());
        ids.extend(self.segments.iter().map(|s| s.to.as_str()));
        ids
    }

    /// `"A -> B -> C (<int> NM)"`, or `"A direct to B (<int> NM)"`
    pub fn description(&self) -> String {
        route_description(&self.waypoint_ids(), self.total_distance_nm, self.is_direct)
    }

    /// ICAO route string, e.g. `KJFK J80 KORD J94 KDEN DCT KLAX`
    pub fn icao_route(&self) -> String {
        format::icao_route(self)
    }

    /// Names of the airways used, in flight order, without consecutive repeats
    pub fn airways_used(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.segments.iter().filter_map(|s| s.airway.as_deref()) {
            if names.last() != Some(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Route strategies over a borrowed graph
#[derive(Debug, Clone, Copy)]
pub struct AirwayRouter<'a> {
    graph: NavGraph<'a>,
    config: &'a NavConfig,
    cache: Option<(&'a Mutex<RouteCache>, u64)>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> AirwayRouter<'a> {
    pub fn new(graph: NavGraph<'a>, config: &'a NavConfig) -> Self {
        Self {
            graph,
            config,
            cache: None,
        }
    }

    /// Consult and fill `cache` for optimal routes computed against dataset `generation`
    pub fn with_cache(mut self, cache: &'a Mutex<RouteCache>, generation: u64) -> Self {
        self.cache = Some((cache, generation));
        self
    }

    #[inline]
    pub fn planner(&self) -> PathPlanner<'a> {
        PathPlanner::new(self.graph)
    }

    /// A* search with the great-circle distance to the destination as heuristic
    pub fn search(
        &self,
        origin: &str,
        destination: &str,
        cruise_altitude_ft: i32,
        adjacency: AdjacencyKind,
    ) -> SearchOutcome<'a> {
        let planner = self.planner();
        match adjacency {
            AdjacencyKind::StrictAirway => planner.find_route_a_star(
                origin,
                destination,
                cruise_altitude_ft,
                &StrictAirwayAdjacency,
            ),
            AdjacencyKind::Radius => planner.find_route_a_star(
                origin,
                destination,
                cruise_altitude_ft,
                &RadiusAdjacency::new(self.config.effective_search_radius_nm()),
            ),
        }
    }

    /// Shortest route under `adjacency`, `None` when unreachable or an endpoint is unknown
    pub fn find_optimal_route(
        &self,
        origin: &str,
        destination: &str,
        cruise_altitude_ft: i32,
        adjacency: AdjacencyKind,
    ) -> Option<RoutePlan> {
        let store = self.graph.store();
        if store.waypoint(origin).is_none() || store.waypoint(destination).is_none() {
            return None;
        }

        let key = RouteKey::new(origin, destination, cruise_altitude_ft, adjacency).a_star();
        if let Some((route_cache, generation)) = self.cache {
            let cached = cache::lock(route_cache).lookup(&key, generation);
            if let Some(cached) = cached {
                if cached.is_direct {
                    return None;
                }
                let ids: Vec<&str> = cached.waypoint_ids.iter().map(String::as_str).collect();
                return self.plan_from_path(&ids, Some(cruise_altitude_ft));
            }
        }

        let outcome = self.search(origin, destination, cruise_altitude_ft, adjacency);
        let ids = outcome.ids();

        if let Some((route_cache, generation)) = self.cache {
            if outcome.is_found() {
                cache::lock(route_cache).store(key, ids.clone(), false, generation);
            } else {
                let direct = vec![origin.to_string(), destination.to_string()];
                cache::lock(route_cache).store(key, direct, true, generation);
            }
        }

        if !outcome.is_found() {
            return None;
        }
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.plan_from_path(&ids, Some(cruise_altitude_ft))
    }

    /// Single great-circle leg
    ///
    /// The leg floor clears the higher endpoint by [`TERRAIN_CLEARANCE_FT`]; the ceiling
    /// is [`DIRECT_MAXIMUM_ALTITUDE_FT`].
    pub fn find_direct_route(&self, origin: &str, destination: &str) -> Option<RoutePlan> {
        let store = self.graph.store();
        let from = store.waypoint(origin)?;
        let to = store.waypoint(destination)?;

        let segment = self.segment(from, to, None);
        Some(self.assemble(origin, destination, None, vec![segment], true))
    }

    /// Optimal route at the reference altitude, then the direct route, then an optimal
    /// route at the alternate altitude
    ///
    /// Strategies that produce nothing are skipped. Results are not de-duplicated.
    pub fn find_alternate_routes(
        &self,
        origin: &str,
        destination: &str,
        max_results: usize,
    ) -> Vec<RoutePlan> {
        let adjacency = self.config.default_adjacency;
        let reference = || {
            self.find_optimal_route(
                origin,
                destination,
                self.config.reference_altitude_ft,
                adjacency,
            )
        };
        let direct = || self.find_direct_route(origin, destination);
        let alternate = || {
            self.find_optimal_route(
                origin,
                destination,
                self.config.alternate_altitude_ft,
                adjacency,
            )
        };
        let strategies: [&dyn Fn() -> Option<RoutePlan>; 3] = [&reference, &direct, &alternate];

        strategies
            .iter()
            .filter_map(|strategy| strategy())
            .take(max_results)
            .collect()
    }

    /// Walk the preferred airways in order, then fly direct to the destination
    ///
    /// Each airway is joined where the route currently stands and left at the
    /// destination if it lies on the airway, else at the junction with the next
    /// preferred airway, else at whichever airway end is closer to the destination.
    /// The walk stops at the first airway that is unknown, excludes the cruise
    /// altitude, or does not contain the current position.
    pub fn find_preferred_route<S: AsRef<str>>(
        &self,
        origin: &str,
        destination: &str,
        preferred_airways: &[S],
        cruise_altitude_ft: i32,
    ) -> Option<RoutePlan> {
        let store = self.graph.store();
        let mut current = store.waypoint(origin)?;
        let goal = store.waypoint(destination)?;
        let mut segments = Vec::new();

        for (index, name) in preferred_airways.iter().enumerate() {
            if current.id == goal.id {
                break;
            }
            let Some(airway) = store.airway(name.as_ref()) else {
                tracing::debug!(airway = name.as_ref(), "Preferred airway not found");
                break;
            };
            if !airway.allows_altitude(cruise_altitude_ft) {
                break;
            }
            let Some(entry) = airway.position_of(&current.id) else {
                break;
            };

            let next_airway = preferred_airways
                .get(index + 1)
                .and_then(|next| store.airway(next.as_ref()));
            let exit = airway
                .position_of(&goal.id)
                .or_else(|| {
                    let next = next_airway?;
                    airway
                        .waypoints
                        .iter()
                        .enumerate()
                        .filter(|&(i, id)| i != entry && next.contains(id))
                        .min_by_key(|&(i, _)| i.abs_diff(entry))
                        .map(|(i, _)| i)
                })
                .or_else(|| self.closer_end(airway, goal));
            let Some(exit) = exit.filter(|&exit| exit != entry) else {
                continue;
            };

            let indices: Vec<usize> = if exit > entry {
                (entry..=exit).collect()
            } else {
                (exit..=entry).rev().collect()
            };
            for pair in indices.windows(2) {
                let (Some(from), Some(to)) = (
                    store.waypoint(&airway.waypoints[pair[0]]),
                    store.waypoint(&airway.waypoints[pair[1]]),
                ) else {
                    break;
                };
                segments.push(self.segment(from, to, Some(airway)));
                current = to;
            }
        }

        if current.id != goal.id {
            segments.push(self.segment(current, goal, None));
        }
        let is_direct = !segments.is_empty() && segments.iter().all(|s| s.airway.is_none());
        Some(self.assemble(origin, destination, Some(cruise_altitude_ft), segments, is_direct))
    }

    /// Build a plan from a resolved path
    ///
    /// Each leg is labelled with the alphabetically first airway that links the pair at
    /// the cruise altitude, or flown direct when none does.
    pub fn plan_from_path(&self, ids: &[&str], cruise_altitude_ft: Option<i32>) -> Option<RoutePlan> {
        let store = self.graph.store();
        let (origin, destination) = (ids.first()?, ids.last()?);
        let waypoints = ids
            .iter()
            .map(|id| store.waypoint(id))
            .collect::<Option<Vec<_>>>()?;

        let segments = waypoints
            .windows(2)
            .map(|pair| {
                let airway = store
                    .connecting_airways(&pair[0].id, &pair[1].id)
                    .into_iter()
                    .find(|a| cruise_altitude_ft.is_none_or(|alt| a.allows_altitude(alt)));
                self.segment(pair[0], pair[1], airway)
            })
            .collect();

        Some(self.assemble(origin, destination, cruise_altitude_ft, segments, false))
    }

    fn closer_end(&self, airway: &Airway, goal: &Waypoint) -> Option<usize> {
        let store = self.graph.store();
        let last = airway.waypoints.len().checked_sub(1)?;
        let distance = |i: usize| {
            store
                .waypoint(&airway.waypoints[i])
                .map_or(f64::INFINITY, |w| w.distance_to(goal))
        };
        Some(if distance(last) < distance(0) { last } else { 0 })
    }

    fn segment(&self, from: &Waypoint, to: &Waypoint, airway: Option<&Airway>) -> RouteSegment {
        let distance_nm = from.distance_to(to);
        let (minimum_altitude_ft, maximum_altitude_ft) = match airway {
            Some(airway) => (airway.minimum_altitude_ft, airway.maximum_altitude_ft),
            None => (
                from.elevation_ft.max(to.elevation_ft).saturating_add(TERRAIN_CLEARANCE_FT),
                DIRECT_MAXIMUM_ALTITUDE_FT,
            ),
        };
        RouteSegment {
            from: from.id.clone(),
            to: to.id.clone(),
            airway: airway.map(|a| a.name.clone()),
            distance_nm,
            magnetic_heading_deg: utils::true_to_magnetic(
                from.bearing_to(to),
                self.config.magnetic_variation_deg,
            ),
            minimum_altitude_ft,
            maximum_altitude_ft,
            fuel_burn_lb: distance_nm * self.config.fuel_burn_lb_per_nm,
            estimated_time_minutes: utils::flight_time_minutes(
                distance_nm,
                self.config.cruise_speed_kt,
            ),
        }
    }

    fn assemble(
        &self,
        origin: &str,
        destination: &str,
        cruise_altitude_ft: Option<i32>,
        segments: Vec<RouteSegment>,
        is_direct: bool,
    ) -> RoutePlan {
        let total_distance_nm: f64 = segments.iter().map(|s| s.distance_nm).sum();
        let total_fuel_lb = segments.iter().map(|s| s.fuel_burn_lb).sum();
        let estimated_time_minutes = segments.iter().map(|s| s.estimated_time_minutes).sum();
        RoutePlan {
            origin: origin.to_string(),
            destination: destination.to_string(),
            cruise_altitude_ft,
            segments,
            total_distance_nm,
            total_fuel_lb,
            estimated_time_minutes,
            quality: RouteQuality::for_distance(total_distance_nm),
            is_direct,
        }
    }
}
