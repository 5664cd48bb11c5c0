//! Flight-plan validation

use crate::{GazetteerStore, TERRAIN_CLEARANCE_FT, utils};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lowest cruise altitude accepted for a flight plan
pub const MIN_CRUISE_ALTITUDE_FT: i32 = 1200;
/// Highest cruise altitude accepted for a flight plan
pub const MAX_CRUISE_ALTITUDE_FT: i32 = 60000;
/// Ground speed used for the time estimate of [`NavDatabase::validate_flight_plan`](crate::NavDatabase::validate_flight_plan)
pub const VALIDATION_REFERENCE_SPEED_KT: f64 = 450.0;

/// Why a flight plan was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidationError {
    #[error("Flight plan is empty")]
    EmptyPlan,

    #[error("Cruise altitude {altitude_ft} ft outside [1200, 60000] ft")]
    AltitudeOutOfRange { altitude_ft: i32 },

    #[error("Unknown waypoint: {id}")]
    UnknownWaypoint { id: String },
}

/// Non-fatal finding on an otherwise valid plan
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidationWarning {
    /// Cruise altitude is less than the required clearance above a waypoint
    TerrainClearance {
        waypoint: String,
        elevation_ft: i32,
        cruise_altitude_ft: i32,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerrainClearance {
                waypoint,
                elevation_ft,
                cruise_altitude_ft,
            } => write!(
                f,
                "Cruise altitude {cruise_altitude_ft} ft gives less than \
                 {TERRAIN_CLEARANCE_FT} ft clearance over {waypoint} (elevation {elevation_ft} ft)"
            ),
        }
    }
}

/// Outcome of [`validate_flight_plan`]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightPlanValidation {
    pub is_valid: bool,
    pub error: Option<ValidationError>,
    pub total_distance_nm: f64,
    pub estimated_time_minutes: f64,
    pub warnings: Vec<ValidationWarning>,
}

impl FlightPlanValidation {
    fn rejected(error: ValidationError) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
            ..Default::default()
        }
    }

    /// Human-readable reason, empty when the plan is valid
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}

/// Check a waypoint sequence at a cruise altitude
///
/// Stops at the first hard error. A valid plan carries the summed great-circle leg
/// distance, the time at `cruise_speed_kt`, and clearance warnings.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn validate_flight_plan<S: AsRef<str>>(
    store: &GazetteerStore,
    sequence: &[S],
    cruise_altitude_ft: i32,
    cruise_speed_kt: f64,
) -> FlightPlanValidation {
    if sequence.is_empty() {
        return FlightPlanValidation::rejected(ValidationError::EmptyPlan);
    }
    if !(MIN_CRUISE_ALTITUDE_FT..=MAX_CRUISE_ALTITUDE_FT).contains(&cruise_altitude_ft) {
        return FlightPlanValidation::rejected(ValidationError::AltitudeOutOfRange {
            altitude_ft: cruise_altitude_ft,
        });
    }

    let mut waypoints = Vec::with_capacity(sequence.len());
    for id in sequence {
        match store.waypoint(id.as_ref()) {
            Some(waypoint) => waypoints.push(waypoint),
            None => {
                return FlightPlanValidation::rejected(ValidationError::UnknownWaypoint {
                    id: id.as_ref().to_string(),
                });
            }
        }
    }

    let total_distance_nm: f64 = waypoints
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .sum();

    let warnings = waypoints
        .iter()
        .filter(|w| w.elevation_ft.saturating_add(TERRAIN_CLEARANCE_FT) > cruise_altitude_ft)
        .map(|w| ValidationWarning::TerrainClearance {
            waypoint: w.id.clone(),
            elevation_ft: w.elevation_ft,
            cruise_altitude_ft,
        })
        .collect();

    FlightPlanValidation {
        is_valid: true,
        error: None,
        total_distance_nm,
        estimated_time_minutes: utils::flight_time_minutes(total_distance_nm, cruise_speed_kt),
        warnings,
    }
}
