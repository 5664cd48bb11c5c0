//! GazetteerStore - owner of all navigation entities
//!
//! Entities are stored by value and keyed by identifier. Lookups are total: a missing
//! identifier yields `None` or an empty list, never an error.

use crate::model::{Airway, ApproachKind, ApproachProcedure, Sid, Star, Waypoint, WaypointType};
use crate::{ConsistencyIssue, NavDataset, utils};

use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// (airport, runway)
type RunwayKey = (String, String);

/// (airport, runway, approach kind)
type ApproachKey = (String, String, ApproachKind);

/// Owns every entity of a loaded dataset
#[derive(Debug, Clone, Default)]
pub struct GazetteerStore {
    waypoints: HashMap<String, Waypoint>,
    airways: HashMap<String, Airway>,
    sids: BTreeMap<RunwayKey, Sid>,
    stars: BTreeMap<RunwayKey, Star>,
    approaches: BTreeMap<ApproachKey, ApproachProcedure>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl GazetteerStore {
    /// Build a store from a dataset and reject it on the first integrity violation
    ///
    /// Every airway and procedure waypoint of an accepted store resolves, so airway
    /// materialization never has gaps.
    pub fn from_dataset(dataset: NavDataset) -> Result<Self, ConsistencyIssue> {
        let store = Self::from_dataset_unchecked(dataset)?;
        match store.check_consistency() {
            Some(issue) => Err(issue),
            None => Ok(store),
        }
    }

    /// Build a store rejecting only duplicate keys
    pub(crate) fn from_dataset_unchecked(dataset: NavDataset) -> Result<Self, ConsistencyIssue> {
        let mut store = Self::default();

        for waypoint in dataset.waypoints {
            if store.waypoints.contains_key(&waypoint.id) {
                return Err(duplicate("waypoint", waypoint.id));
            }
            store.waypoints.insert(waypoint.id.clone(), waypoint);
        }

        for airway in dataset.airways {
            if store.airways.contains_key(&airway.name) {
                return Err(duplicate("airway", airway.name));
            }
            store.airways.insert(airway.name.clone(), airway);
        }

        for sid in dataset.sids {
            let key = (sid.airport.clone(), sid.runway.clone());
            if store.sids.contains_key(&key) {
                return Err(duplicate("SID", format!("{}/{}", key.0, key.1)));
            }
            store.sids.insert(key, sid);
        }

        for star in dataset.stars {
            let key = (star.airport.clone(), star.runway.clone());
            if store.stars.contains_key(&key) {
                return Err(duplicate("STAR", format!("{}/{}", key.0, key.1)));
            }
            store.stars.insert(key, star);
        }

        for approach in dataset.approaches {
            let key = (
                approach.airport.clone(),
                approach.runway.clone(),
                approach.kind,
            );
            if store.approaches.contains_key(&key) {
                return Err(duplicate(
                    "approach",
                    format!("{}/{}/{}", key.0, key.1, key.2),
                ));
            }
            store.approaches.insert(key, approach);
        }

        Ok(store)
    }

    // ------------------------------------------------------------------
    // Waypoints
    // ------------------------------------------------------------------

    #[inline]
    pub fn waypoint(&self, id: &str) -> Option<&Waypoint> {
        self.waypoints.get(id)
    }

    /// All waypoints of a kind, ordered by id
    pub fn waypoints_by_type(&self, kind: WaypointType) -> Vec<&Waypoint> {
        let mut result: Vec<&Waypoint> =
            self.waypoints.values().filter(|w| w.kind == kind).collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        result
    }

    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.values()
    }

    #[inline]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    // ------------------------------------------------------------------
    // Airways
    // ------------------------------------------------------------------

    #[inline]
    pub fn airway(&self, name: &str) -> Option<&Airway> {
        self.airways.get(name)
    }

    /// Resolve an airway's waypoint sequence, in order
    ///
    /// Unknown airway names yield an empty list. Stores built through
    /// [`GazetteerStore::from_dataset`] reject unresolved airway ids up front, so the
    /// resolved list always has the same length as the airway.
    pub fn airway_waypoints(&self, name: &str) -> Vec<&Waypoint> {
        self.airway(name)
            .map(|airway| {
                airway
                    .waypoints
                    .iter()
                    .filter_map(|id| self.waypoints.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Airways on which `a` and `b` are consecutive entries, ordered by name
    pub fn connecting_airways(&self, a: &str, b: &str) -> Vec<&Airway> {
        let mut result: Vec<&Airway> = self
            .airways
            .values()
            .filter(|airway| airway.are_adjacent(a, b))
            .collect();
        result.sort_by(|x, y| x.name.cmp(&y.name));
        result
    }

    /// Airways whose altitude band contains `altitude_ft`, ordered by name
    pub fn airways_by_altitude(&self, altitude_ft: i32) -> Vec<&Airway> {
        let mut result: Vec<&Airway> = self
            .airways
            .values()
            .filter(|airway| airway.allows_altitude(altitude_ft))
            .collect();
        result.sort_by(|x, y| x.name.cmp(&y.name));
        result
    }

    pub fn airways(&self) -> impl Iterator<Item = &Airway> {
        self.airways.values()
    }

    #[inline]
    pub fn airway_count(&self) -> usize {
        self.airways.len()
    }

    /// Along-track length of an airway in nautical miles
    pub fn airway_length_nm(&self, airway: &Airway) -> f64 {
        airway
            .waypoints
            .windows(2)
            .filter_map(|pair| {
                let a = self.waypoints.get(&pair[0])?;
                let b = self.waypoints.get(&pair[1])?;
                Some(a.distance_to(b))
            })
            .sum()
    }

    /// Mean along-track airway length, 0 when there are no airways
    pub fn average_airway_distance_nm(&self) -> f64 {
        if self.airways.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .airways
            .values()
            .map(|airway| self.airway_length_nm(airway))
            .sum();
        total / self.airways.len() as f64
    }

    // ------------------------------------------------------------------
    // Procedures
    // ------------------------------------------------------------------

    pub fn sid(&self, airport: &str, runway: &str) -> Option<&Sid> {
        self.sids.get(&(airport.to_string(), runway.to_string()))
    }

    /// SIDs of an airport ordered by runway, empty if none
    pub fn sids_by_airport(&self, airport: &str) -> Vec<&Sid> {
        self.sids
            .iter()
            .filter(|((apt, _), _)| apt == airport)
            .map(|(_, sid)| sid)
            .collect()
    }

    pub fn star(&self, airport: &str, runway: &str) -> Option<&Star> {
        self.stars.get(&(airport.to_string(), runway.to_string()))
    }

    /// STARs of an airport ordered by runway, empty if none
    pub fn stars_by_airport(&self, airport: &str) -> Vec<&Star> {
        self.stars
            .iter()
            .filter(|((apt, _), _)| apt == airport)
            .map(|(_, star)| star)
            .collect()
    }

    pub fn approach(
        &self,
        airport: &str,
        runway: &str,
        kind: ApproachKind,
    ) -> Option<&ApproachProcedure> {
        self.approaches
            .get(&(airport.to_string(), runway.to_string(), kind))
    }

    /// All approaches to one runway, ordered by kind
    pub fn approaches_for_runway(&self, airport: &str, runway: &str) -> Vec<&ApproachProcedure> {
        self.approaches
            .iter()
            .filter(|((apt, rwy, _), _)| apt == airport && rwy == runway)
            .map(|(_, approach)| approach)
            .collect()
    }

    /// All approaches of an airport, ordered by runway then kind
    pub fn approaches_by_airport(&self, airport: &str) -> Vec<&ApproachProcedure> {
        self.approaches
            .iter()
            .filter(|((apt, _, _), _)| apt == airport)
            .map(|(_, approach)| approach)
            .collect()
    }

    #[inline]
    pub fn sid_count(&self) -> usize {
        self.sids.len()
    }

    #[inline]
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    #[inline]
    pub fn approach_count(&self) -> usize {
        self.approaches.len()
    }

    // ------------------------------------------------------------------
    // Consistency
    // ------------------------------------------------------------------

    /// Full integrity scan returning the first violation, `None` when consistent
    ///
    /// Waypoints are checked in id order, then airways and procedures in name/key
    /// order, so the reported violation is deterministic. Meant for load time and
    /// tests, not the query path.
    pub fn check_consistency(&self) -> Option<ConsistencyIssue> {
        let mut waypoints: Vec<&Waypoint> = self.waypoints.values().collect();
        waypoints.sort_by(|a, b| a.id.cmp(&b.id));

        let coordinate_issue = waypoints.par_iter().find_map_first(|w| {
            (!utils::is_valid_coordinate(w.latitude, w.longitude)).then(|| {
                ConsistencyIssue::InvalidCoordinate {
                    id: w.id.clone(),
                    latitude: w.latitude,
                    longitude: w.longitude,
                }
            })
        });
        if coordinate_issue.is_some() {
            return coordinate_issue;
        }

        let mut airways: Vec<&Airway> = self.airways.values().collect();
        airways.sort_by(|a, b| a.name.cmp(&b.name));

        let airway_issue = airways
            .par_iter()
            .find_map_first(|airway| self.check_airway(airway));
        if airway_issue.is_some() {
            return airway_issue;
        }

        let procedures = self
            .sids
            .values()
            .map(|p| (format!("SID {}", p.name), &p.waypoints))
            .chain(
                self.stars
                    .values()
                    .map(|p| (format!("STAR {}", p.name), &p.waypoints)),
            )
            .chain(self.approaches.values().map(|p| {
                (
                    format!("{} {} RWY {}", p.kind, p.airport, p.runway),
                    &p.waypoints,
                )
            }));

        for (procedure, ids) in procedures {
            if let Some(missing) = ids.iter().find(|id| !self.waypoints.contains_key(*id)) {
                return Some(ConsistencyIssue::UnknownProcedureWaypoint {
                    procedure,
                    waypoint: missing.clone(),
                });
            }
        }

        None
    }

    fn check_airway(&self, airway: &Airway) -> Option<ConsistencyIssue> {
        if airway.waypoints.len() < 2 {
            return Some(ConsistencyIssue::AirwayTooShort {
                airway: airway.name.clone(),
                count: airway.waypoints.len(),
            });
        }
        if airway.minimum_altitude_ft > airway.maximum_altitude_ft {
            return Some(ConsistencyIssue::InvalidAltitudeBand {
                airway: airway.name.clone(),
                minimum_ft: airway.minimum_altitude_ft,
                maximum_ft: airway.maximum_altitude_ft,
            });
        }
        airway
            .waypoints
            .iter()
            .find(|id| !self.waypoints.contains_key(*id))
            .map(|missing| ConsistencyIssue::UnknownAirwayWaypoint {
                airway: airway.name.clone(),
                waypoint: missing.clone(),
            })
    }
}

fn duplicate(kind: &'static str, id: String) -> ConsistencyIssue {
    ConsistencyIssue::Duplicate { kind, id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AirwayLevel;

    fn fix(id: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(id, lat, lon, WaypointType::Fix)
    }

    fn create_test_dataset() -> NavDataset {
        NavDataset::new()
            .with_waypoints([
                fix("W1", 40.0, -75.0),
                fix("W2", 40.0, -74.0),
                fix("W3", 40.0, -73.0),
                Waypoint::new("VOR1", 41.0, -74.0, WaypointType::Vor).with_frequency(113.1),
                Waypoint::new("KAAA", 39.0, -74.0, WaypointType::Airport).with_elevation(500),
            ])
            .with_airways([
                Airway::new("V1", AirwayLevel::Low, 1200, 18000, ["W1", "W2", "W3"]),
                Airway::new("J1", AirwayLevel::High, 18000, 45000, ["W1", "VOR1", "W3"]),
                Airway::new("V2", AirwayLevel::Low, 1200, 18000, ["W2", "W1"]),
            ])
            .with_sids([Sid {
                name: "DEP1".into(),
                airport: "KAAA".into(),
                runway: "09".into(),
                waypoints: vec!["W1".into()],
                altitude_restrictions: vec![Some(3000)],
                speed_restrictions: vec![None],
                initial_heading_deg: 90.0,
                initial_altitude_ft: 3000,
                is_rnav: false,
                distance_nm: 10.0,
            }])
            .with_approaches([
                ApproachProcedure {
                    airport: "KAAA".into(),
                    runway: "27".into(),
                    kind: ApproachKind::Rnav,
                    waypoints: vec!["W2".into()],
                    decision_altitude_ft: 700,
                    minimum_visibility_sm: 1.0,
                    has_glideslope: false,
                },
                ApproachProcedure {
                    airport: "KAAA".into(),
                    runway: "27".into(),
                    kind: ApproachKind::Ils,
                    waypoints: vec!["W2".into()],
                    decision_altitude_ft: 700,
                    minimum_visibility_sm: 0.5,
                    has_glideslope: true,
                },
            ])
    }

    fn create_test_store() -> GazetteerStore {
        GazetteerStore::from_dataset(create_test_dataset()).unwrap()
    }

    #[test]
    fn test_waypoint_lookup() {
        let store = create_test_store();
        assert_eq!(store.waypoint("W1").unwrap().latitude, 40.0);
        assert!(store.waypoint("NOPE").is_none());
        assert_eq!(store.waypoint_count(), 5);
    }

    #[test]
    fn test_repeated_lookup_is_identical() {
        let store = create_test_store();
        assert_eq!(store.waypoint("VOR1"), store.waypoint("VOR1"));
    }

    #[test]
    fn test_waypoints_by_type_sorted() {
        let store = create_test_store();
        let fixes: Vec<&str> = store
            .waypoints_by_type(WaypointType::Fix)
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(fixes, vec!["W1", "W2", "W3"]);
        assert!(store.waypoints_by_type(WaypointType::Ndb).is_empty());
    }

    #[test]
    fn test_airway_waypoints_in_order() {
        let store = create_test_store();
        let ids: Vec<&str> = store
            .airway_waypoints("J1")
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, vec!["W1", "VOR1", "W3"]);
        assert!(store.airway_waypoints("NOPE").is_empty());
    }

    #[test]
    fn test_connecting_airways_requires_adjacency() {
        let store = create_test_store();
        let names: Vec<&str> = store
            .connecting_airways("W2", "W1")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["V1", "V2"]);
        // Both on J1 but not consecutive
        assert!(store.connecting_airways("W1", "W3").is_empty());
    }

    #[test]
    fn test_airways_by_altitude() {
        let store = create_test_store();
        let low: Vec<&str> = store
            .airways_by_altitude(10000)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(low, vec!["V1", "V2"]);
        // Band edges are inclusive
        assert_eq!(store.airways_by_altitude(18000).len(), 3);
        assert!(store.airways_by_altitude(50000).is_empty());
    }

    #[test]
    fn test_procedure_queries() {
        let store = create_test_store();
        assert_eq!(store.sid("KAAA", "09").unwrap().name, "DEP1");
        assert!(store.sid("KAAA", "27").is_none());
        assert_eq!(store.sids_by_airport("KAAA").len(), 1);
        assert!(store.sids_by_airport("KBBB").is_empty());
        assert!(store.stars_by_airport("KAAA").is_empty());
        assert!(store.star("KAAA", "09").is_none());

        let approaches = store.approaches_for_runway("KAAA", "27");
        assert_eq!(approaches.len(), 2);
        assert_eq!(approaches[0].kind, ApproachKind::Ils);
        assert!(store.approach("KAAA", "27", ApproachKind::Rnav).is_some());
        assert!(store.approach("KAAA", "27", ApproachKind::Vor).is_none());
        assert_eq!(store.approaches_by_airport("KAAA").len(), 2);

        assert_eq!(store.sid_count(), 1);
        assert_eq!(store.star_count(), 0);
        assert_eq!(store.approach_count(), 2);
    }

    #[test]
    fn test_average_airway_distance() {
        let store = create_test_store();
        let v1 = store.airway_length_nm(store.airway("V1").unwrap());
        assert!(v1 > 80.0 && v1 < 100.0, "got {v1}");
        assert!(store.average_airway_distance_nm() > 0.0);
        assert_eq!(GazetteerStore::default().average_airway_distance_nm(), 0.0);
    }

    #[test]
    fn test_consistent_store_has_no_issue() {
        assert!(create_test_store().check_consistency().is_none());
    }

    #[test]
    fn test_builtin_dataset_is_consistent() {
        let store = GazetteerStore::from_dataset(NavDataset::builtin()).unwrap();
        assert!(store.check_consistency().is_none());
        // Every airway id resolves through the point lookup
        for airway in store.airways() {
            for id in &airway.waypoints {
                assert!(store.waypoint(id).is_some());
            }
        }
    }

    #[test]
    fn test_unknown_airway_waypoint_detected() {
        let dataset = create_test_dataset().with_airways([Airway::new(
            "V9",
            AirwayLevel::Low,
            1200,
            18000,
            ["W1", "GHOST"],
        )]);
        let store = GazetteerStore::from_dataset_unchecked(dataset.clone()).unwrap();
        assert_eq!(
            store.check_consistency(),
            Some(ConsistencyIssue::UnknownAirwayWaypoint {
                airway: "V9".into(),
                waypoint: "GHOST".into(),
            })
        );
        assert!(GazetteerStore::from_dataset(dataset).is_err());
    }

    #[test]
    fn test_invalid_coordinate_detected_first() {
        let dataset = create_test_dataset()
            .with_waypoints([fix("BAD", 95.0, 0.0)])
            .with_airways([Airway::new("V9", AirwayLevel::Low, 1200, 18000, ["W1", "GHOST"])]);
        let store = GazetteerStore::from_dataset_unchecked(dataset).unwrap();
        assert!(matches!(
            store.check_consistency(),
            Some(ConsistencyIssue::InvalidCoordinate { ref id, .. }) if id == "BAD"
        ));
    }

    #[test]
    fn test_short_and_inverted_airways_detected() {
        let short = create_test_dataset().with_airways([Airway::new(
            "V9",
            AirwayLevel::Low,
            1200,
            18000,
            ["W1"],
        )]);
        assert!(matches!(
            GazetteerStore::from_dataset(short),
            Err(ConsistencyIssue::AirwayTooShort { count: 1, .. })
        ));

        let inverted = create_test_dataset().with_airways([Airway::new(
            "V9",
            AirwayLevel::Low,
            18000,
            1200,
            ["W1", "W2"],
        )]);
        assert!(matches!(
            GazetteerStore::from_dataset(inverted),
            Err(ConsistencyIssue::InvalidAltitudeBand { .. })
        ));
    }

    #[test]
    fn test_unknown_procedure_waypoint_detected() {
        let mut dataset = create_test_dataset();
        dataset.sids[0].waypoints.push("GHOST".into());
        assert!(matches!(
            GazetteerStore::from_dataset(dataset),
            Err(ConsistencyIssue::UnknownProcedureWaypoint { ref waypoint, .. }) if waypoint == "GHOST"
        ));
    }

    #[test]
    fn test_duplicates_rejected() {
        let dataset = create_test_dataset().with_waypoints([fix("W1", 0.0, 0.0)]);
        assert_eq!(
            GazetteerStore::from_dataset(dataset).unwrap_err(),
            ConsistencyIssue::Duplicate {
                kind: "waypoint",
                id: "W1".into()
            }
        );
    }
}
