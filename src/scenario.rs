//! # Scenarios
//!
//! Ready-made obstacle layouts and coefficient sets for drivers: the classic
//! four-obstacle field and the U-shaped trap, with and without escape.
//! Scenarios are plain data and can be stored as JSON.

use serde::{Deserialize, Serialize};

use crate::agent::NavigationAgent;
use crate::config::NavigationConfig;
use crate::error::Result;
use crate::structs::{FieldGains, Obstacle, Vec2, WorldBounds};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub start: Vec2,
    pub goal: Vec2,
    pub obstacles: Vec<Obstacle>,
    pub gains: FieldGains,
    pub step_size: f64,
    pub escape_enabled: bool,
    #[serde(default)]
    pub config: NavigationConfig,
}

impl Scenario {
    /// Four scattered obstacles between (0, 0) and (10, 10); reachable by the
    /// plain field without any escape.
    pub fn classic() -> Self {
        Scenario {
            name: "classic".to_string(),
            start: Vec2::new(0.0, 0.0),
            goal: Vec2::new(10.0, 10.0),
            obstacles: vec![
                Obstacle::new(3.0, 2.0, 1.0),
                Obstacle::new(6.0, 5.0, 1.5),
                Obstacle::new(8.0, 9.0, 1.0),
                Obstacle::new(4.0, 7.0, 1.0),
            ],
            gains: FieldGains::new(1.0, 20.0, 3.0),
            step_size: 0.1,
            escape_enabled: false,
            config: NavigationConfig {
                goal_radius: 0.2,
                ..NavigationConfig::default()
            }
            .with_bounds(WorldBounds::new(-1.0, 12.0, -1.0, 12.0)),
        }
    }

    /// Three obstacles forming a pocket on the straight line to the goal.
    /// Without escape the agent stalls in front of it for good.
    pub fn trap() -> Self {
        Scenario {
            name: "trap".to_string(),
            start: Vec2::new(0.0, 0.0),
            goal: Vec2::new(12.0, 0.0),
            obstacles: vec![
                Obstacle::new(6.0, 1.8, 1.5),
                Obstacle::new(6.0, -1.8, 1.5),
                Obstacle::new(7.5, 0.0, 1.8),
            ],
            gains: FieldGains::new(5.0, 120.0, 2.2),
            step_size: 0.1,
            escape_enabled: false,
            config: NavigationConfig::default(),
        }
    }

    /// The trap layout with deadlock escape enabled.
    pub fn escape() -> Self {
        Scenario {
            name: "escape".to_string(),
            escape_enabled: true,
            ..Scenario::trap()
        }
    }

    pub fn presets() -> Vec<Scenario> {
        vec![Scenario::classic(), Scenario::trap(), Scenario::escape()]
    }

    pub fn by_name(name: &str) -> Option<Scenario> {
        Scenario::presets()
            .into_iter()
            .find(|scenario| scenario.name == name)
    }

    pub fn with_config(mut self, config: NavigationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(&self) -> Result<NavigationAgent> {
        NavigationAgent::new(
            self.start,
            self.goal,
            self.obstacles.clone(),
            self.gains,
            self.step_size,
            self.escape_enabled,
            self.config.clone(),
        )
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
