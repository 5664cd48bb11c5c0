//! Navigation entities
//!
//! Plain records owned by the [`GazetteerStore`](crate::GazetteerStore). Everything
//! outside the store refers to them by identifier, never by reference.

use crate::utils;
use geo::Point;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of navigation point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WaypointType {
    Airport,
    Fix,
    Vor,
    Ndb,
}

impl fmt::Display for WaypointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaypointType::Airport => "AIRPORT",
            WaypointType::Fix => "FIX",
            WaypointType::Vor => "VOR",
            WaypointType::Ndb => "NDB",
        };
        f.write_str(name)
    }
}

/// A named, geolocated navigation point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    /// Unique identifier (ICAO code for airports, name for fixes and navaids)
    pub id: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    pub kind: WaypointType,
    /// Elevation in feet, 0 when not applicable
    pub elevation_ft: i32,
    /// Radio frequency in MHz (kHz / 1000 for NDBs), 0 when not applicable
    pub frequency_mhz: f64,
    /// Region tag (e.g. "K6" for the north-east US)
    pub region: String,
}

impl Waypoint {
    /// Create a waypoint with no elevation, frequency or region
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, kind: WaypointType) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            kind,
            elevation_ft: 0,
            frequency_mhz: 0.0,
            region: String::new(),
        }
    }

    pub fn with_elevation(mut self, elevation_ft: i32) -> Self {
        self.elevation_ft = elevation_ft;
        self
    }

    pub fn with_frequency(mut self, frequency_mhz: f64) -> Self {
        self.frequency_mhz = frequency_mhz;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Position as a `geo::Point` (x = longitude, y = latitude)
    #[inline]
    pub fn position(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Great-circle distance to another waypoint in nautical miles
    #[inline]
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        utils::distance_nm(self.position(), other.position())
    }

    /// Initial true bearing to another waypoint in degrees
    #[inline]
    pub fn bearing_to(&self, other: &Waypoint) -> f64 {
        utils::bearing_deg(self.position(), other.position())
    }
}

/// Airway stratum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AirwayLevel {
    /// Victor airways and other low-altitude routes
    Low,
    /// Jet routes
    High,
}

/// A named, altitude-banded chain of waypoints
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Airway {
    pub name: String,
    pub minimum_altitude_ft: i32,
    pub maximum_altitude_ft: i32,
    pub level: AirwayLevel,
    /// Ordered waypoint identifiers, at least two
    pub waypoints: Vec<String>,
}

impl Airway {
    pub fn new<I, S>(
        name: impl Into<String>,
        level: AirwayLevel,
        minimum_altitude_ft: i32,
        maximum_altitude_ft: i32,
        waypoints: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            minimum_altitude_ft,
            maximum_altitude_ft,
            level,
            waypoints: waypoints.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `altitude_ft` lies inside the inclusive altitude band
    #[inline]
    pub fn allows_altitude(&self, altitude_ft: i32) -> bool {
        (self.minimum_altitude_ft..=self.maximum_altitude_ft).contains(&altitude_ft)
    }

    /// Index of the first occurrence of a waypoint in the sequence
    #[inline]
    pub fn position_of(&self, waypoint_id: &str) -> Option<usize> {
        self.waypoints.iter().position(|id| id == waypoint_id)
    }

    #[inline]
    pub fn contains(&self, waypoint_id: &str) -> bool {
        self.position_of(waypoint_id).is_some()
    }

    /// Whether `a` and `b` appear as consecutive entries, in either order
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.waypoints
            .windows(2)
            .any(|pair| (pair[0] == a && pair[1] == b) || (pair[0] == b && pair[1] == a))
    }

    /// Waypoints immediately before and after every occurrence of `waypoint_id`
    pub fn neighbors_of<'a>(&'a self, waypoint_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.waypoints
            .windows(2)
            .filter_map(move |pair| {
                if pair[0] == waypoint_id {
                    Some(pair[1].as_str())
                } else if pair[1] == waypoint_id {
                    Some(pair[0].as_str())
                } else {
                    None
                }
            })
    }
}

/// Standard Instrument Departure
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sid {
    pub name: String,
    pub airport: String,
    pub runway: String,
    pub waypoints: Vec<String>,
    /// Altitude restriction per waypoint, `None` when unrestricted
    pub altitude_restrictions: Vec<Option<i32>>,
    /// Speed restriction in knots per waypoint, `None` when unrestricted
    pub speed_restrictions: Vec<Option<i32>>,
    pub initial_heading_deg: f64,
    pub initial_altitude_ft: i32,
    pub is_rnav: bool,
    pub distance_nm: f64,
}

/// Standard Terminal Arrival Route
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Star {
    pub name: String,
    pub airport: String,
    pub runway: String,
    pub waypoints: Vec<String>,
    pub altitude_restrictions: Vec<Option<i32>>,
    pub speed_restrictions: Vec<Option<i32>>,
    pub initial_altitude_ft: i32,
    pub final_altitude_ft: i32,
    pub is_rnav: bool,
    pub distance_nm: f64,
}

/// Type of instrument approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ApproachKind {
    Ils,
    Rnav,
    Vor,
    Ndb,
    Localizer,
    Visual,
}

impl fmt::Display for ApproachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApproachKind::Ils => "ILS",
            ApproachKind::Rnav => "RNAV",
            ApproachKind::Vor => "VOR",
            ApproachKind::Ndb => "NDB",
            ApproachKind::Localizer => "LOC",
            ApproachKind::Visual => "VISUAL",
        };
        f.write_str(name)
    }
}

/// Instrument approach to a runway
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApproachProcedure {
    pub airport: String,
    pub runway: String,
    pub kind: ApproachKind,
    pub waypoints: Vec<String>,
    pub decision_altitude_ft: i32,
    /// Minimum visibility in statute miles
    pub minimum_visibility_sm: f64,
    pub has_glideslope: bool,
}
