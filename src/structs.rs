//! # Core Data Structures
//!
//! Value types shared by the force model and the navigation state machine:
//!
//! - **Vec2**: 2D position/force vector (nalgebra)
//! - **Obstacle**: circular obstacle with an optional per-obstacle influence radius
//! - **FieldGains**: attractive/repulsive gains and the global influence radius
//! - **WorldBounds**: hard clamping box for the agent position
//! - **NavigationState**: navigating / escaping / reached, with per-state data

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub type Vec2 = Vector2<f64>;

pub type Path = Vec<Vec2>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec2,
    /// Drawing radius only; never enters the force computation.
    pub visual_radius: f64,
    /// Overrides the agent-wide influence radius when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub influence_radius: Option<f64>,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, visual_radius: f64) -> Self {
        Obstacle {
            center: Vec2::new(x, y),
            visual_radius,
            influence_radius: None,
        }
    }

    pub fn with_influence_radius(mut self, radius: f64) -> Self {
        self.influence_radius = Some(radius);
        self
    }

    /// Influence radius in effect for this obstacle given the agent-wide default.
    pub fn effective_radius(&self, default_radius: f64) -> f64 {
        self.influence_radius.unwrap_or(default_radius)
    }

    pub fn distance_to(&self, position: &Vec2) -> f64 {
        (position - self.center).norm()
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(ConfigError::ObstacleCenter { index });
        }
        if !(self.visual_radius.is_finite() && self.visual_radius > 0.0) {
            return Err(ConfigError::ObstacleRadius {
                index,
                field: "visual radius",
                value: self.visual_radius,
            });
        }
        if let Some(radius) = self.influence_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(ConfigError::ObstacleRadius {
                    index,
                    field: "influence radius",
                    value: radius,
                });
            }
        }
        Ok(())
    }
}

/// The `k_att`, `k_rep`, `rr` coefficients of the potential field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGains {
    pub attractive_gain: f64,
    pub repulsive_gain: f64,
    pub influence_radius: f64,
}

impl FieldGains {
    pub fn new(attractive_gain: f64, repulsive_gain: f64, influence_radius: f64) -> Self {
        FieldGains {
            attractive_gain,
            repulsive_gain,
            influence_radius,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.attractive_gain) {
            return Err(ConfigError::AttractiveGain(self.attractive_gain));
        }
        if !is_positive(self.repulsive_gain) {
            return Err(ConfigError::RepulsiveGain(self.repulsive_gain));
        }
        if !is_positive(self.influence_radius) {
            return Err(ConfigError::InfluenceRadius(self.influence_radius));
        }
        Ok(())
    }
}

impl Default for FieldGains {
    fn default() -> Self {
        FieldGains::new(5.0, 100.0, 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        WorldBounds {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    pub fn contains(&self, point: &Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.sup(&self.min).inf(&self.max)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        if !finite || self.min.x >= self.max.x || self.min.y >= self.max.y {
            return Err(ConfigError::Bounds);
        }
        Ok(())
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        WorldBounds::new(-2.0, 14.0, -6.0, 6.0)
    }
}

/// Navigation state machine. Each state carries only the data that is
/// meaningful in it, so an agent can never be counting towards a deadlock and
/// escaping at the same time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationState {
    Navigating {
        /// Consecutive ticks spent in a low-force region away from the goal.
        stuck_ticks: u32,
    },
    Escaping {
        ticks_remaining: u32,
        /// Override force frozen for the whole escape.
        force: Vec2,
    },
    Reached,
}

impl NavigationState {
    pub fn mode(&self) -> NavigationMode {
        match self {
            NavigationState::Navigating { .. } => NavigationMode::Navigating,
            NavigationState::Escaping { .. } => NavigationMode::Escaping,
            NavigationState::Reached => NavigationMode::Reached,
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        NavigationState::Navigating { stuck_ticks: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    Navigating,
    Escaping,
    Reached,
}

impl NavigationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMode::Navigating => "navigating",
            NavigationMode::Escaping => "escaping",
            NavigationMode::Reached => "reached",
        }
    }
}

pub fn path_length(path: &[Vec2]) -> f64 {
    path.windows(2).map(|pair| (pair[1] - pair[0]).norm()).sum()
}

pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==================== Obstacle Tests ====================

    #[test]
    fn test_obstacle_new_uses_default_radius() {
        let obstacle = Obstacle::new(6.0, 1.8, 1.5);
        assert_eq!(obstacle.center, Vec2::new(6.0, 1.8));
        assert_eq!(obstacle.influence_radius, None);
        assert_eq!(obstacle.effective_radius(2.2), 2.2);
    }

    #[test]
    fn test_obstacle_influence_override() {
        let obstacle = Obstacle::new(0.0, 0.0, 1.0).with_influence_radius(4.0);
        assert_eq!(obstacle.effective_radius(2.2), 4.0);
    }

    #[test]
    fn test_obstacle_distance_to() {
        let obstacle = Obstacle::new(3.0, 4.0, 1.0);
        assert_relative_eq!(obstacle.distance_to(&Vec2::zeros()), 5.0);
    }

    #[test]
    fn test_obstacle_validate_rejects_bad_radii() {
        assert!(Obstacle::new(0.0, 0.0, 0.0).validate(0).is_err());
        assert!(Obstacle::new(0.0, 0.0, 1.0)
            .with_influence_radius(-1.0)
            .validate(3)
            .is_err());
        assert!(Obstacle::new(f64::NAN, 0.0, 1.0).validate(0).is_err());
        assert!(Obstacle::new(1.0, 1.0, 0.5).validate(0).is_ok());
    }

    // ==================== FieldGains Tests ====================

    #[test]
    fn test_gains_validate() {
        assert!(FieldGains::new(5.0, 120.0, 2.2).validate().is_ok());
        assert_eq!(
            FieldGains::new(0.0, 120.0, 2.2).validate(),
            Err(ConfigError::AttractiveGain(0.0))
        );
        assert_eq!(
            FieldGains::new(5.0, -1.0, 2.2).validate(),
            Err(ConfigError::RepulsiveGain(-1.0))
        );
        assert!(matches!(
            FieldGains::new(5.0, 120.0, f64::INFINITY).validate(),
            Err(ConfigError::InfluenceRadius(_))
        ));
    }

    // ==================== WorldBounds Tests ====================

    #[test]
    fn test_bounds_clamp_inside_is_identity() {
        let bounds = WorldBounds::default();
        let p = Vec2::new(3.0, -1.0);
        assert_eq!(bounds.clamp(p), p);
        assert!(bounds.contains(&p));
    }

    #[test]
    fn test_bounds_clamp_outside() {
        let bounds = WorldBounds::default();
        assert_eq!(bounds.clamp(Vec2::new(20.0, -9.0)), Vec2::new(14.0, -6.0));
        assert_eq!(bounds.clamp(Vec2::new(-5.0, 7.0)), Vec2::new(-2.0, 6.0));
        assert!(!bounds.contains(&Vec2::new(14.1, 0.0)));
    }

    #[test]
    fn test_bounds_validate() {
        assert!(WorldBounds::default().validate().is_ok());
        assert_eq!(WorldBounds::new(1.0, 1.0, 0.0, 1.0).validate(), Err(ConfigError::Bounds));
        assert_eq!(
            WorldBounds::new(0.0, 1.0, 0.0, f64::NAN).validate(),
            Err(ConfigError::Bounds)
        );
    }

    // ==================== NavigationState Tests ====================

    #[test]
    fn test_state_default_is_navigating() {
        assert_eq!(
            NavigationState::default(),
            NavigationState::Navigating { stuck_ticks: 0 }
        );
    }

    #[test]
    fn test_state_mode() {
        let escaping = NavigationState::Escaping {
            ticks_remaining: 3,
            force: Vec2::new(0.0, 60.0),
        };
        assert_eq!(escaping.mode(), NavigationMode::Escaping);
        assert_eq!(NavigationState::Reached.mode().as_str(), "reached");
    }

    // ==================== path_length Tests ====================

    #[test]
    fn test_path_length_short_paths() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[Vec2::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_path_length_multi_segment() {
        let path = vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(3.0, 4.0)];
        assert_relative_eq!(path_length(&path), 7.0);
    }
}
