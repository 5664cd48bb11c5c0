//! Best-first route search over the waypoint graph
//!
//! One search loop serves both the strict airway graph (Dijkstra, section-by-section
//! along airways) and the looser radius graph (A* with a great-circle heuristic). The
//! adjacency model is picked by the caller through [`Adjacency`].

mod adjacency;

pub use adjacency::{
    Adjacency, AdjacencyKind, RadiusAdjacency, StrictAirwayAdjacency, TERRAIN_CLEARANCE_FT,
};

use crate::model::Waypoint;
use crate::{GazetteerStore, ReverseIndex, SpatialIndex};

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Borrowed view over the store and its derived indices
#[derive(Debug, Clone, Copy)]
pub struct NavGraph<'a> {
    store: &'a GazetteerStore,
    spatial: &'a SpatialIndex,
    reverse: &'a ReverseIndex,
}

impl<'a> NavGraph<'a> {
    pub fn new(
        store: &'a GazetteerStore,
        spatial: &'a SpatialIndex,
        reverse: &'a ReverseIndex,
    ) -> Self {
        Self {
            store,
            spatial,
            reverse,
        }
    }

    #[inline]
    pub fn store(&self) -> &'a GazetteerStore {
        self.store
    }

    #[inline]
    pub fn spatial(&self) -> &'a SpatialIndex {
        self.spatial
    }

    #[inline]
    pub fn reverse(&self) -> &'a ReverseIndex {
        self.reverse
    }
}

/// Result of a route search
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome<'a> {
    /// Origin to destination inclusive, empty when unreachable
    pub path: Vec<&'a Waypoint>,
    /// Sum of edge weights along `path`
    pub distance_nm: f64,
    /// Number of nodes finalized before the search stopped
    pub expanded: usize,
}

impl SearchOutcome<'_> {
    #[inline]
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Waypoint ids along the path
    pub fn ids(&self) -> Vec<String> {
        self.path.iter().map(|w| w.id.clone()).collect()
    }
}

/// Priority queue entry, ordered so `BinaryHeap` pops the lowest priority first and
/// the lexicographically smallest id among equal priorities
#[derive(Debug)]
struct QueueEntry<'a> {
    priority: f64,
    cost: f64,
    id: &'a str,
}

impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry<'_> {}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.id.cmp(self.id))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path search over a [`NavGraph`]
#[derive(Debug, Clone, Copy)]
pub struct PathPlanner<'a> {
    graph: NavGraph<'a>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> PathPlanner<'a> {
    pub fn new(graph: NavGraph<'a>) -> Self {
        Self { graph }
    }

    #[inline]
    pub fn graph(&self) -> NavGraph<'a> {
        self.graph
    }

    /// Dijkstra over strict airway adjacency
    ///
    /// Two waypoints are connected only when they are consecutive on an airway whose
    /// altitude band contains `cruise_altitude_ft`. An empty outcome means no airway
    /// path exists; callers fall back to a direct route.
    pub fn find_route(
        &self,
        origin: &str,
        destination: &str,
        cruise_altitude_ft: i32,
    ) -> SearchOutcome<'a> {
        self.search(
            origin,
            destination,
            cruise_altitude_ft,
            &StrictAirwayAdjacency,
            false,
        )
    }

    /// A* with the great-circle distance to `destination` as heuristic
    pub fn find_route_a_star<A: Adjacency + ?Sized>(
        &self,
        origin: &str,
        destination: &str,
        cruise_altitude_ft: i32,
        adjacency: &A,
    ) -> SearchOutcome<'a> {
        self.search(origin, destination, cruise_altitude_ft, adjacency, true)
    }

    /// Best-first search shared by Dijkstra (`use_heuristic = false`) and A*
    ///
    /// Equal-priority entries pop in id order, so results are reproducible. There is
    /// no iteration cap; the search ends on reaching the destination or exhausting the
    /// frontier.
    pub fn search<A: Adjacency + ?Sized>(
        &self,
        origin: &str,
        destination: &str,
        cruise_altitude_ft: i32,
        adjacency: &A,
        use_heuristic: bool,
    ) -> SearchOutcome<'a> {
        #[cfg(feature = "profiling")]
        profiling::scope!("planner::search");

        let store = self.graph.store();
        let (Some(start), Some(goal)) = (store.waypoint(origin), store.waypoint(destination))
        else {
            tracing::debug!(origin, destination, "Route endpoint not found");
            return SearchOutcome::default();
        };

        if start.id == goal.id {
            return SearchOutcome {
                path: vec![start],
                distance_nm: 0.0,
                expanded: 0,
            };
        }

        let heuristic = |w: &Waypoint| {
            if use_heuristic {
                w.distance_to(goal)
            } else {
                0.0
            }
        };

        let mut best_cost: HashMap<&'a str, f64> = HashMap::new();
        let mut predecessor: HashMap<&'a str, &'a str> = HashMap::new();
        let mut finalized: HashSet<&'a str> = HashSet::new();
        let mut queue = BinaryHeap::new();
        let mut neighbors: Vec<(&'a Waypoint, f64)> = Vec::new();

        best_cost.insert(start.id.as_str(), 0.0);
        queue.push(QueueEntry {
            priority: heuristic(start),
            cost: 0.0,
            id: start.id.as_str(),
        });

        while let Some(QueueEntry { cost, id, .. }) = queue.pop() {
            if !finalized.insert(id) {
                continue;
            }

            if id == goal.id {
                let path = self.reconstruct(&predecessor, id);
                tracing::debug!(
                    origin,
                    destination,
                    cruise_altitude_ft,
                    hops = path.len().saturating_sub(1),
                    distance_nm = cost,
                    expanded = finalized.len(),
                    "Route found"
                );
                return SearchOutcome {
                    path,
                    distance_nm: cost,
                    expanded: finalized.len(),
                };
            }

            let Some(current) = store.waypoint(id) else {
                continue;
            };

            neighbors.clear();
            adjacency.neighbors(
                &self.graph,
                current,
                cruise_altitude_ft,
                destination,
                &mut neighbors,
            );

            for &(next, weight) in &neighbors {
                let next_id = next.id.as_str();
                if finalized.contains(next_id) {
                    continue;
                }
                let candidate = cost + weight;
                let improves = best_cost
                    .get(next_id)
                    .is_none_or(|&known| candidate < known);
                if improves {
                    best_cost.insert(next_id, candidate);
                    predecessor.insert(next_id, id);
                    queue.push(QueueEntry {
                        priority: candidate + heuristic(next),
                        cost: candidate,
                        id: next_id,
                    });
                }
            }
        }

        tracing::debug!(
            origin,
            destination,
            cruise_altitude_ft,
            expanded = finalized.len(),
            "No route: frontier exhausted"
        );
        SearchOutcome {
            path: Vec::new(),
            distance_nm: 0.0,
            expanded: finalized.len(),
        }
    }

    fn reconstruct(&self, predecessor: &HashMap<&'a str, &'a str>, end: &'a str) -> Vec<&'a Waypoint> {
        let mut ids = vec![end];
        let mut current = end;
        while let Some(&previous) = predecessor.get(current) {
            ids.push(previous);
            current = previous;
        }
        ids.reverse();

        let store = self.graph.store();
        ids.into_iter().filter_map(|id| store.waypoint(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NavDataset;
    use crate::model::{Airway, AirwayLevel, WaypointType};

    struct Fixture {
        store: GazetteerStore,
        spatial: SpatialIndex,
        reverse: ReverseIndex,
    }

    impl Fixture {
        fn new(dataset: NavDataset) -> Self {
            let store = GazetteerStore::from_dataset(dataset).unwrap();
            let spatial = SpatialIndex::build(&store);
            let reverse = ReverseIndex::build(&store);
            Self {
                store,
                spatial,
                reverse,
            }
        }

        fn planner(&self) -> PathPlanner<'_> {
            PathPlanner::new(NavGraph::new(&self.store, &self.spatial, &self.reverse))
        }
    }

    fn fix(id: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(id, lat, lon, WaypointType::Fix)
    }

    /// W1-W2-W3-W4 on one low airway, plus a detached waypoint
    fn line_dataset() -> NavDataset {
        NavDataset::new()
            .with_waypoints([
                fix("W1", 40.0, -76.0),
                fix("W2", 40.1, -75.0),
                fix("W3", 40.0, -74.0),
                fix("W4", 40.1, -73.0),
                fix("ISLAND", 20.0, -60.0),
            ])
            .with_airways([Airway::new(
                "V1",
                AirwayLevel::Low,
                1200,
                18000,
                ["W1", "W2", "W3", "W4"],
            )])
    }

    /// Diamond where the two branches have identical length
    fn diamond_dataset() -> NavDataset {
        NavDataset::new()
            .with_waypoints([
                fix("S", 0.0, 0.0),
                fix("NORTH", 1.0, 1.0),
                fix("ALPHA", -1.0, 1.0),
                fix("T", 0.0, 2.0),
            ])
            .with_airways([
                Airway::new("V1", AirwayLevel::Low, 1200, 18000, ["S", "NORTH", "T"]),
                Airway::new("V2", AirwayLevel::Low, 1200, 18000, ["S", "ALPHA", "T"]),
            ])
    }

    fn ids(outcome: &SearchOutcome<'_>) -> Vec<String> {
        outcome.ids()
    }

    #[test]
    fn test_strict_route_follows_airway() {
        let fixture = Fixture::new(line_dataset());
        let planner = fixture.planner();
        let outcome = planner.find_route("W1", "W4", 10000);

        assert_eq!(ids(&outcome), vec!["W1", "W2", "W3", "W4"]);

        let store = &fixture.store;
        let legs: f64 = ["W1", "W2", "W3", "W4"]
            .windows(2)
            .map(|p| {
                store
                    .waypoint(p[0])
                    .unwrap()
                    .distance_to(store.waypoint(p[1]).unwrap())
            })
            .sum();
        assert!((outcome.distance_nm - legs).abs() < 1e-9);
    }

    #[test]
    fn test_strict_route_is_bidirectional() {
        let fixture = Fixture::new(line_dataset());
        let outcome = fixture.planner().find_route("W4", "W1", 10000);
        assert_eq!(ids(&outcome), vec!["W4", "W3", "W2", "W1"]);
    }

    #[test]
    fn test_altitude_outside_band_has_no_edges() {
        let fixture = Fixture::new(line_dataset());
        let outcome = fixture.planner().find_route("W1", "W4", 30000);
        assert!(!outcome.is_found());
        assert_eq!(outcome.expanded, 1);
    }

    #[test]
    fn test_same_origin_and_destination() {
        let fixture = Fixture::new(line_dataset());
        let outcome = fixture.planner().find_route("W2", "W2", 10000);
        assert_eq!(ids(&outcome), vec!["W2"]);
        assert_eq!(outcome.distance_nm, 0.0);
    }

    #[test]
    fn test_unknown_endpoints() {
        let fixture = Fixture::new(line_dataset());
        let planner = fixture.planner();
        assert!(!planner.find_route("NOPE", "W4", 10000).is_found());
        assert!(!planner.find_route("W1", "NOPE", 10000).is_found());
    }

    #[test]
    fn test_unreachable_detached_waypoint() {
        let fixture = Fixture::new(line_dataset());
        let outcome = fixture.planner().find_route("W1", "ISLAND", 10000);
        assert!(!outcome.is_found());
        assert_eq!(outcome.expanded, 4);
    }

    #[test]
    fn test_equal_cost_tie_breaks_by_id() {
        let fixture = Fixture::new(diamond_dataset());
        let planner = fixture.planner();
        for _ in 0..5 {
            let outcome = planner.find_route("S", "T", 5000);
            assert_eq!(ids(&outcome), vec!["S", "ALPHA", "T"]);
        }
    }

    #[test]
    fn test_a_star_matches_dijkstra_cost() {
        let fixture = Fixture::new(NavDataset::builtin());
        let planner = fixture.planner();
        let dijkstra = planner.find_route("KJFK", "KLAX", 35000);
        let a_star =
            planner.find_route_a_star("KJFK", "KLAX", 35000, &StrictAirwayAdjacency);

        assert!(dijkstra.is_found());
        assert!((dijkstra.distance_nm - a_star.distance_nm).abs() < 1e-6);
    }

    #[test]
    fn test_radius_adjacency_reaches_off_airway_waypoint() {
        let fixture = Fixture::new(line_dataset());
        let planner = fixture.planner();

        // ISLAND is over 1000 NM from everything else
        let short = RadiusAdjacency::new(200.0);
        assert!(!planner.find_route_a_star("W1", "ISLAND", 10000, &short).is_found());

        let long = RadiusAdjacency::new(2000.0);
        let outcome = planner.find_route_a_star("W1", "ISLAND", 10000, &long);
        assert_eq!(outcome.path.last().unwrap().id, "ISLAND");
    }

    #[test]
    fn test_radius_adjacency_direct_when_in_range() {
        let fixture = Fixture::new(line_dataset());
        let outcome = fixture.planner().find_route_a_star(
            "W1",
            "W4",
            10000,
            &RadiusAdjacency::new(500.0),
        );
        // Great-circle shortest path is the direct edge
        assert_eq!(ids(&outcome), vec!["W1", "W4"]);
    }

    #[test]
    fn test_radius_adjacency_skips_high_terrain() {
        let dataset = NavDataset::new().with_waypoints([
            fix("A", 40.0, -106.0),
            Waypoint::new("PEAK", 40.0, -105.0, WaypointType::Vor).with_elevation(12000),
            fix("B", 40.0, -104.0),
        ]);
        let fixture = Fixture::new(dataset);
        let planner = fixture.planner();
        let radius = RadiusAdjacency::new(50.0);

        // Legs are ~46 NM, so A-B only connects through PEAK
        assert!(!planner.find_route_a_star("A", "B", 10000, &radius).is_found());
        let outcome = planner.find_route_a_star("A", "B", 15000, &radius);
        assert_eq!(ids(&outcome), vec!["A", "PEAK", "B"]);
        // The destination is always allowed
        assert!(planner.find_route_a_star("A", "PEAK", 5000, &radius).is_found());
    }

    #[test]
    fn test_radius_adjacency_extreme_elevation() {
        let dataset = NavDataset::new().with_waypoints([
            fix("A", 40.0, -106.0),
            Waypoint::new("WALL", 40.0, -105.0, WaypointType::Fix).with_elevation(i32::MAX),
            fix("B", 40.0, -104.0),
        ]);
        let fixture = Fixture::new(dataset);
        let radius = RadiusAdjacency::new(50.0);
        assert!(!fixture.planner().find_route_a_star("A", "B", 60000, &radius).is_found());
    }

    #[test]
    fn test_queue_entry_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry {
            priority: 2.0,
            cost: 0.0,
            id: "A",
        });
        heap.push(QueueEntry {
            priority: 1.0,
            cost: 0.0,
            id: "Z",
        });
        heap.push(QueueEntry {
            priority: 1.0,
            cost: 0.0,
            id: "B",
        });
        let order: Vec<&str> = std::iter::from_fn(|| heap.pop().map(|e| e.id)).collect();
        assert_eq!(order, vec!["B", "Z", "A"]);
    }
}
