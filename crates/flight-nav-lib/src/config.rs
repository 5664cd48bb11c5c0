use crate::{AdjacencyKind, NavError, Result};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`NavDatabase`](crate::NavDatabase)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavConfig {
    /// How long a computed route stays valid in the cache.
    /// Default: 1 hour
    pub route_cache_ttl: Duration,
    /// Maximum number of cached routes; least recently used ones are evicted first.
    /// Default: 1024
    pub route_cache_capacity: usize,
    /// Neighbor radius for radius-based adjacency (default 200 NM)
    pub search_radius_nm: f64,
    /// Hard cap on the neighbor radius (default 500 NM)
    pub max_search_distance_nm: f64,
    /// Reference cruise speed for time estimates (default 450 kt)
    pub cruise_speed_kt: f64,
    /// Fuel burn per nautical mile (default 15 lb/NM)
    pub fuel_burn_lb_per_nm: f64,
    /// Cruise altitude of the primary alternate route (default 35000 ft)
    pub reference_altitude_ft: i32,
    /// Cruise altitude of the last alternate route (default 25000 ft)
    pub alternate_altitude_ft: i32,
    /// Magnetic variation in degrees, east positive.
    /// Magnetic heading = true bearing - variation. Default: 0
    pub magnetic_variation_deg: f64,
    /// Adjacency used when generating alternate routes
    pub default_adjacency: AdjacencyKind,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            route_cache_ttl: Duration::from_secs(60 * 60),
            route_cache_capacity: 1024,
            search_radius_nm: 200.0,
            max_search_distance_nm: 500.0,
            cruise_speed_kt: 450.0,
            fuel_burn_lb_per_nm: 15.0,
            reference_altitude_ft: 35000,
            alternate_altitude_ft: 25000,
            magnetic_variation_deg: 0.0,
            default_adjacency: AdjacencyKind::default(),
        }
    }
}

impl NavConfig {
    /// Radius actually used by radius-based adjacency
    #[inline]
    pub fn effective_search_radius_nm(&self) -> f64 {
        self.search_radius_nm.min(self.max_search_distance_nm)
    }

    /// Reject settings no database can work with
    pub fn validate(&self) -> Result<()> {
        if self.route_cache_capacity == 0 {
            return Err(NavError::InvalidConfig(
                "route_cache_capacity must be at least 1".into(),
            ));
        }
        if self.route_cache_ttl.is_zero() {
            return Err(NavError::InvalidConfig(
                "route_cache_ttl must be non-zero".into(),
            ));
        }
        let positive = [
            ("search_radius_nm", self.search_radius_nm),
            ("max_search_distance_nm", self.max_search_distance_nm),
            ("cruise_speed_kt", self.cruise_speed_kt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(NavError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !(self.fuel_burn_lb_per_nm.is_finite() && self.fuel_burn_lb_per_nm >= 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "fuel_burn_lb_per_nm must be non-negative, got {}",
                self.fuel_burn_lb_per_nm
            )));
        }
        if !self.magnetic_variation_deg.is_finite() {
            return Err(NavError::InvalidConfig(
                "magnetic_variation_deg must be finite".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = NavConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.route_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.effective_search_radius_nm(), 200.0);
        assert_eq!(config.default_adjacency, AdjacencyKind::Radius);
    }

    #[test]
    fn test_search_radius_is_capped() {
        let config = NavConfig {
            search_radius_nm: 800.0,
            ..Default::default()
        };
        assert_eq!(config.effective_search_radius_nm(), 500.0);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = NavConfig {
            route_cache_capacity: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("route_cache_capacity"));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        for speed in [0.0, -450.0, f64::NAN] {
            let config = NavConfig {
                cruise_speed_kt: speed,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(NavError::InvalidConfig(_))));
        }
    }
}
