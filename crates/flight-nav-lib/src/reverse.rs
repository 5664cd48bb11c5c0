//! Reverse adjacency index: waypoint id to the airways that contain it

use crate::GazetteerStore;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Most waypoints sit on one to three airways
type AirwayNames = SmallVec<[String; 4]>;

/// Waypoint id to the sorted, de-duplicated names of the airways containing it
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    airways_by_waypoint: HashMap<String, AirwayNames>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl ReverseIndex {
    pub fn build(store: &GazetteerStore) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("reverse::build");

        let mut airways_by_waypoint: HashMap<String, AirwayNames> = HashMap::new();
        for airway in store.airways() {
            for id in &airway.waypoints {
                airways_by_waypoint
                    .entry(id.clone())
                    .or_default()
                    .push(airway.name.clone());
            }
        }
        for names in airways_by_waypoint.values_mut() {
            names.sort_unstable();
            names.dedup();
        }

        Self {
            airways_by_waypoint,
        }
    }

    /// Names of the airways containing `waypoint_id`, ordered by name
    #[inline]
    pub fn airways_containing(&self, waypoint_id: &str) -> &[String] {
        self.airways_by_waypoint
            .get(waypoint_id)
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }

    /// Number of waypoints that lie on at least one airway
    #[inline]
    pub fn len(&self) -> usize {
        self.airways_by_waypoint.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.airways_by_waypoint.is_empty()
    }
}
