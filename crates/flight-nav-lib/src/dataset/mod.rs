//! Load input for the navigation database
//!
//! A [`NavDataset`] is a plain bag of owned entities. It is validated and turned into
//! a [`GazetteerStore`](crate::GazetteerStore) plus derived indices by
//! [`NavDatabase::load`](crate::NavDatabase::load).

mod builtin;

use crate::model::{Airway, ApproachProcedure, Sid, Star, Waypoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Owned navigation data ready to be loaded
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavDataset {
    pub waypoints: Vec<Waypoint>,
    pub airways: Vec<Airway>,
    pub sids: Vec<Sid>,
    pub stars: Vec<Star>,
    pub approaches: Vec<ApproachProcedure>,
}

impl NavDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample US dataset: major airports, VORs, NDBs, fixes, jet and victor
    /// airways, and a handful of SIDs, STARs and approaches
    pub fn builtin() -> Self {
        builtin::dataset()
    }

    pub fn with_waypoints(mut self, waypoints: impl IntoIterator<Item = Waypoint>) -> Self {
        self.waypoints.extend(waypoints);
        self
    }

    pub fn with_airways(mut self, airways: impl IntoIterator<Item = Airway>) -> Self {
        self.airways.extend(airways);
        self
    }

    pub fn with_sids(mut self, sids: impl IntoIterator<Item = Sid>) -> Self {
        self.sids.extend(sids);
        self
    }

    pub fn with_stars(mut self, stars: impl IntoIterator<Item = Star>) -> Self {
        self.stars.extend(stars);
        self
    }

    pub fn with_approaches(
        mut self,
        approaches: impl IntoIterator<Item = ApproachProcedure>,
    ) -> Self {
        self.approaches.extend(approaches);
        self
    }

    /// Total number of entities of all kinds
    pub fn entity_count(&self) -> usize {
        self.waypoints.len()
            + self.airways.len()
            + self.sids.len()
            + self.stars.len()
            + self.approaches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}
