//! # Navigation Configuration
//!
//! Tuning constants for deadlock detection, escape behaviour, goal termination
//! and the world box. Two profiles have been observed in practice for the same
//! control law; both are kept as presets:
//!
//! - **tactical** (default): 10-tick deadlock limit, 45-tick escape, lateral
//!   escape force of magnitude 60, 1.2x escape stride, goal radius 0.3.
//! - **randomized**: 15-tick deadlock limit, 60-tick escape, random-direction
//!   escape force of magnitude 150, 1.5x escape stride, goal radius 0.2.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::structs::{is_positive, WorldBounds};

/// How the override force is chosen when a deadlock is detected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EscapePolicy {
    /// Uniformly random direction scaled by `boost`.
    Randomized { boost: f64 },
    /// Sideways push away from the start-goal axis with a small forward
    /// component, scaled by `magnitude`.
    Lateral { magnitude: f64, forward_bias: f64 },
}

impl EscapePolicy {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        match *self {
            EscapePolicy::Randomized { boost } => {
                if !is_positive(boost) {
                    return Err(ConfigError::Threshold {
                        field: "escape boost",
                        value: boost,
                    });
                }
            }
            EscapePolicy::Lateral {
                magnitude,
                forward_bias,
            } => {
                if !is_positive(magnitude) {
                    return Err(ConfigError::Threshold {
                        field: "escape magnitude",
                        value: magnitude,
                    });
                }
                if !(forward_bias.is_finite() && forward_bias >= 0.0) {
                    return Err(ConfigError::Threshold {
                        field: "escape forward bias",
                        value: forward_bias,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Net force magnitude below which the agent counts as possibly stuck.
    pub stuck_force_threshold: f64,
    /// Within this distance of the goal a weak force is expected, not a deadlock.
    pub goal_proximity_threshold: f64,
    /// Escape starts once the stuck counter exceeds this many ticks.
    pub stuck_tick_limit: u32,
    /// Number of ticks an escape lasts.
    pub escape_duration: u32,
    /// Stride multiplier applied while escaping.
    pub escape_step_boost: f64,
    /// The goal counts as reached strictly inside this radius.
    pub goal_radius: f64,
    pub bounds: WorldBounds,
    pub escape_policy: EscapePolicy,
    /// Seed for the default random angle source.
    pub seed: u64,
}

impl NavigationConfig {
    pub fn tactical() -> Self {
        NavigationConfig {
            stuck_force_threshold: 10.0,
            goal_proximity_threshold: 1.0,
            stuck_tick_limit: 10,
            escape_duration: 45,
            escape_step_boost: 1.2,
            goal_radius: 0.3,
            bounds: WorldBounds::default(),
            escape_policy: EscapePolicy::Lateral {
                magnitude: 60.0,
                forward_bias: 0.2,
            },
            seed: 42,
        }
    }

    pub fn randomized() -> Self {
        NavigationConfig {
            stuck_tick_limit: 15,
            escape_duration: 60,
            escape_step_boost: 1.5,
            goal_radius: 0.2,
            escape_policy: EscapePolicy::Randomized { boost: 150.0 },
            ..NavigationConfig::tactical()
        }
    }

    pub fn with_bounds(mut self, bounds: WorldBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !is_positive(self.stuck_force_threshold) {
            return Err(ConfigError::Threshold {
                field: "stuck force threshold",
                value: self.stuck_force_threshold,
            });
        }
        if !(self.goal_proximity_threshold.is_finite() && self.goal_proximity_threshold >= 0.0) {
            return Err(ConfigError::Threshold {
                field: "goal proximity threshold",
                value: self.goal_proximity_threshold,
            });
        }
        if !is_positive(self.goal_radius) {
            return Err(ConfigError::Threshold {
                field: "goal radius",
                value: self.goal_radius,
            });
        }
        if self.stuck_tick_limit == 0 {
            return Err(ConfigError::TickCount("stuck tick limit"));
        }
        if self.escape_duration == 0 {
            return Err(ConfigError::TickCount("escape duration"));
        }
        if !(self.escape_step_boost.is_finite() && self.escape_step_boost >= 1.0) {
            return Err(ConfigError::StepBoost(self.escape_step_boost));
        }
        self.bounds.validate()?;
        self.escape_policy.validate()
    }

    /// Parses a JSON document; absent fields take the tactical defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NavigationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig::tactical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavigationError;

    #[test]
    fn test_default_is_tactical() {
        assert_eq!(NavigationConfig::default(), NavigationConfig::tactical());
    }

    #[test]
    fn test_presets_validate() {
        assert!(NavigationConfig::tactical().validate().is_ok());
        assert!(NavigationConfig::randomized().validate().is_ok());
    }

    #[test]
    fn test_randomized_profile_values() {
        let config = NavigationConfig::randomized();
        assert_eq!(config.stuck_tick_limit, 15);
        assert_eq!(config.escape_duration, 60);
        assert_eq!(config.escape_step_boost, 1.5);
        assert_eq!(config.escape_policy, EscapePolicy::Randomized { boost: 150.0 });
        assert_eq!(config.bounds, WorldBounds::default());
    }

    #[test]
    fn test_validate_rejects_zero_tick_counts() {
        let config = NavigationConfig {
            stuck_tick_limit: 0,
            ..NavigationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TickCount("stuck tick limit")));

        let config = NavigationConfig {
            escape_duration: 0,
            ..NavigationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TickCount("escape duration")));
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let config = NavigationConfig {
            goal_radius: 0.0,
            ..NavigationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Threshold { field: "goal radius", .. })
        ));

        let config = NavigationConfig {
            stuck_force_threshold: f64::NAN,
            ..NavigationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = NavigationConfig {
            escape_step_boost: 0.5,
            ..NavigationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::StepBoost(0.5)));
    }

    #[test]
    fn test_validate_rejects_bad_policy() {
        let config = NavigationConfig {
            escape_policy: EscapePolicy::Randomized { boost: 0.0 },
            ..NavigationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = NavigationConfig {
            escape_policy: EscapePolicy::Lateral {
                magnitude: 60.0,
                forward_bias: -0.2,
            },
            ..NavigationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial_document() {
        let json = r#"{
            "stuck_tick_limit": 15,
            "escape_policy": { "kind": "randomized", "boost": 150.0 }
        }"#;
        let config = NavigationConfig::from_json(json).unwrap();
        assert_eq!(config.stuck_tick_limit, 15);
        assert_eq!(config.escape_policy, EscapePolicy::Randomized { boost: 150.0 });
        // Unspecified fields keep the tactical defaults
        assert_eq!(config.escape_duration, 45);
        assert_eq!(config.goal_radius, 0.3);
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let result = NavigationConfig::from_json(r#"{ "escape_duration": 0 }"#);
        assert!(matches!(
            result,
            Err(NavigationError::InvalidConfiguration(ConfigError::TickCount(_)))
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        let result = NavigationConfig::from_json("{ not json");
        assert!(matches!(result, Err(NavigationError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip_preserves_profile() {
        let config = NavigationConfig::randomized().with_seed(7);
        let json = config.to_json().unwrap();
        assert_eq!(NavigationConfig::from_json(&json).unwrap(), config);
    }
}
