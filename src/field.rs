//! # Artificial Potential Field
//!
//! The force model that drives the agent:
//!
//! - **Attractive force**: a linear spring towards the goal,
//!   `F_att = -k_att * (q - q_goal)`, uncapped.
//! - **Repulsive force**: for every obstacle whose centre is within its
//!   influence radius `rr`,
//!   `|F_rep| = k_rep * (1/d - 1/rr) * 1/d^2`, pointing away from the centre.
//!   Contributions of all obstacles are summed.
//!
//! ## Degenerate distance
//!
//! At `d = 0` the repulsive term has neither a finite magnitude nor a
//! direction. Any distance below [`MIN_DISTANCE`] is treated as coincident:
//! the contribution is evaluated at `MIN_DISTANCE` and pushes along `+y`.
//! [`PotentialField::try_repulsive_force`] reports the condition instead.

use tracing::warn;

use crate::error::{NavigationError, Result};
use crate::structs::{FieldGains, Obstacle, Vec2};

/// Below this centre distance the agent is considered to sit on the obstacle.
pub const MIN_DISTANCE: f64 = 1e-9;

/// Tie-break direction used when the agent coincides with an obstacle centre.
pub fn fallback_direction() -> Vec2 {
    Vec2::y()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PotentialField {
    goal: Vec2,
    obstacles: Vec<Obstacle>,
    gains: FieldGains,
}

impl PotentialField {
    pub fn new(goal: Vec2, obstacles: Vec<Obstacle>, gains: FieldGains) -> Self {
        PotentialField {
            goal,
            obstacles,
            gains,
        }
    }

    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn gains(&self) -> FieldGains {
        self.gains
    }

    pub fn attractive_force(&self, position: &Vec2) -> Vec2 {
        (position - self.goal) * -self.gains.attractive_gain
    }

    /// Sum of all obstacle contributions, falling back to the fixed direction
    /// for obstacles the agent coincides with.
    pub fn repulsive_force(&self, position: &Vec2) -> Vec2 {
        let mut total = Vec2::zeros();
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            match self.contribution(obstacle, position) {
                Contribution::None => {}
                Contribution::Force(force) => total += force,
                Contribution::Degenerate(force) => {
                    warn!(
                        obstacle = index,
                        x = position.x,
                        y = position.y,
                        "{}; repelling along fallback direction",
                        NavigationError::DegenerateDistance { obstacle: index }
                    );
                    total += force;
                }
            }
        }
        total
    }

    pub fn try_repulsive_force(&self, position: &Vec2) -> Result<Vec2> {
        let mut total = Vec2::zeros();
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            match self.contribution(obstacle, position) {
                Contribution::None => {}
                Contribution::Force(force) => total += force,
                Contribution::Degenerate(_) => {
                    return Err(NavigationError::DegenerateDistance { obstacle: index });
                }
            }
        }
        Ok(total)
    }

    /// Index of the first obstacle whose centre the position coincides with.
    pub fn degenerate_obstacle(&self, position: &Vec2) -> Option<usize> {
        self.obstacles
            .iter()
            .position(|obstacle| obstacle.distance_to(position) < MIN_DISTANCE)
    }

    pub fn total_force(&self, position: &Vec2) -> Vec2 {
        self.attractive_force(position) + self.repulsive_force(position)
    }

    fn contribution(&self, obstacle: &Obstacle, position: &Vec2) -> Contribution {
        let radius = obstacle.effective_radius(self.gains.influence_radius);
        let offset = position - obstacle.center;
        let distance = offset.norm();

        if distance > radius {
            return Contribution::None;
        }
        if distance < MIN_DISTANCE {
            let magnitude = self.magnitude(MIN_DISTANCE, radius);
            return Contribution::Degenerate(fallback_direction() * magnitude);
        }

        let magnitude = self.magnitude(distance, radius);
        Contribution::Force(offset / distance * magnitude)
    }

    fn magnitude(&self, distance: f64, radius: f64) -> f64 {
        self.gains.repulsive_gain * (1.0 / distance - 1.0 / radius) * (1.0 / (distance * distance))
    }
}

enum Contribution {
    None,
    Force(Vec2),
    Degenerate(Vec2),
}
