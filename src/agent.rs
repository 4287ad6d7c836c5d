//! # Navigation Agent
//!
//! A point agent steered by an artificial potential field, with optional
//! deadlock recovery.
//!
//! ## Tick
//!
//! Every call to [`NavigationAgent::advance`]:
//! 1. Computes the repulsive force at the current position.
//! 2. While escaping, drives with `escape force + repulsion` (the goal pull is
//!    suspended) and counts the escape window down.
//! 3. Otherwise drives with `attraction + repulsion`. A weak net force far from
//!    the goal increments the stuck counter; once it exceeds the configured
//!    limit (and escape is enabled) an escape starts on the same tick.
//! 4. Moves one stride along the unit net force. Escape strides are boosted.
//! 5. Clamps into the world box, appends to the path and checks the goal.
//!
//! ## States
//!
//! `Navigating -> Escaping` on deadlock, `Escaping -> Navigating` when the
//! window runs out, and either `-> Reached` inside the goal radius. `Reached`
//! is terminal: further ticks do nothing.

use tracing::{debug, info};

use crate::config::NavigationConfig;
use crate::error::{ConfigError, Result};
use crate::escape::{AngleSource, RngAngleSource};
use crate::field::PotentialField;
use crate::structs::{path_length, FieldGains, NavigationMode, NavigationState, Obstacle, Path, Vec2};

/// Start and goal closer than this are the same point.
pub const GOAL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct NavigationAgent<A: AngleSource = RngAngleSource> {
    start: Vec2,
    position: Vec2,
    field: PotentialField,
    step_size: f64,
    escape_enabled: bool,
    config: NavigationConfig,
    state: NavigationState,
    path: Path,
    ticks: u64,
    escapes_triggered: u32,
    last_force: Vec2,
    angles: A,
}

/// Outcome of [`NavigationAgent::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Ticks executed by this run.
    pub ticks: u64,
    pub reached: bool,
    /// Escapes triggered over the agent's whole lifetime.
    pub escapes: u32,
    pub path_length: f64,
    pub final_position: Vec2,
}

impl NavigationAgent<RngAngleSource> {
    pub fn new(
        start: Vec2,
        goal: Vec2,
        obstacles: Vec<Obstacle>,
        gains: FieldGains,
        step_size: f64,
        escape_enabled: bool,
        config: NavigationConfig,
    ) -> Result<Self> {
        config.validate()?;
        gains.validate()?;
        for (index, obstacle) in obstacles.iter().enumerate() {
            obstacle.validate(index)?;
        }
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(ConfigError::StepSize(step_size).into());
        }
        for (which, point) in [("start", &start), ("goal", &goal)] {
            if !config.bounds.contains(point) {
                return Err(ConfigError::OutOfBounds {
                    which,
                    x: point.x,
                    y: point.y,
                }
                .into());
            }
        }
        if (start - goal).norm() <= GOAL_TOLERANCE {
            return Err(ConfigError::DegenerateGoal.into());
        }

        let angles = RngAngleSource::seeded(config.seed);
        Ok(NavigationAgent {
            start,
            position: start,
            field: PotentialField::new(goal, obstacles, gains),
            step_size,
            escape_enabled,
            config,
            state: NavigationState::default(),
            path: vec![start],
            ticks: 0,
            escapes_triggered: 0,
            last_force: Vec2::zeros(),
            angles,
        })
    }
}

impl<A: AngleSource> NavigationAgent<A> {
    /// Replaces the source of escape angles, e.g. with a fixed angle for
    /// reproducible trajectories.
    pub fn with_angle_source<B: AngleSource>(self, angles: B) -> NavigationAgent<B> {
        NavigationAgent {
            start: self.start,
            position: self.position,
            field: self.field,
            step_size: self.step_size,
            escape_enabled: self.escape_enabled,
            config: self.config,
            state: self.state,
            path: self.path,
            ticks: self.ticks,
            escapes_triggered: self.escapes_triggered,
            last_force: self.last_force,
            angles,
        }
    }

    pub fn compute_attractive_force(&self) -> Vec2 {
        self.field.attractive_force(&self.position)
    }

    pub fn compute_repulsive_force(&self) -> Vec2 {
        self.field.repulsive_force(&self.position)
    }

    /// Performs one simulation tick. No-op once the goal has been reached.
    pub fn advance(&mut self) {
        if self.reached() {
            return;
        }

        let repulsive = self.compute_repulsive_force();
        let state = self.state;
        let (force, escaping) = match state {
            NavigationState::Escaping {
                ticks_remaining,
                force,
            } => {
                let ticks_remaining = ticks_remaining.saturating_sub(1);
                self.state = if ticks_remaining == 0 {
                    debug!(tick = self.ticks + 1, "escape window finished");
                    NavigationState::Navigating { stuck_ticks: 0 }
                } else {
                    NavigationState::Escaping {
                        ticks_remaining,
                        force,
                    }
                };
                (force + repulsive, true)
            }
            NavigationState::Navigating { stuck_ticks } => {
                self.navigate(stuck_ticks, repulsive)
            }
            NavigationState::Reached => return,
        };

        let magnitude = force.norm();
        if magnitude > 0.0 {
            let stride = if escaping {
                self.step_size * self.config.escape_step_boost
            } else {
                self.step_size
            };
            self.position += force.normalize() * stride;
        }
        self.position = self.config.bounds.clamp(self.position);
        self.path.push(self.position);
        self.last_force = force;
        self.ticks += 1;

        if self.distance_to_goal() < self.config.goal_radius {
            info!(
                tick = self.ticks,
                x = self.position.x,
                y = self.position.y,
                escapes = self.escapes_triggered,
                "goal reached"
            );
            self.state = NavigationState::Reached;
        }
    }

    /// Normal-mode force plus deadlock bookkeeping. Returns the force to apply
    /// this tick and whether it is an escape force.
    fn navigate(&mut self, stuck_ticks: u32, repulsive: Vec2) -> (Vec2, bool) {
        let force = self.compute_attractive_force() + repulsive;

        let weak = force.norm() < self.config.stuck_force_threshold;
        let far = self.distance_to_goal() > self.config.goal_proximity_threshold;
        let stuck_ticks = if weak && far {
            stuck_ticks.saturating_add(1)
        } else {
            0
        };

        if self.escape_enabled && stuck_ticks > self.config.stuck_tick_limit {
            let goal = self.field.goal();
            let escape_force = self.config.escape_policy.escape_force(
                &self.position,
                &self.start,
                &goal,
                &mut self.angles,
            );
            self.escapes_triggered += 1;
            debug!(
                tick = self.ticks + 1,
                x = self.position.x,
                y = self.position.y,
                fx = escape_force.x,
                fy = escape_force.y,
                "deadlock detected, escaping"
            );
            self.state = NavigationState::Escaping {
                ticks_remaining: self.config.escape_duration,
                force: escape_force,
            };
            return (escape_force + repulsive, true);
        }

        self.state = NavigationState::Navigating { stuck_ticks };
        (force, false)
    }

    /// Polls `advance` until the goal is reached or `max_ticks` have run.
    pub fn run(&mut self, max_ticks: u64) -> RunSummary {
        let mut ticks = 0;
        while ticks < max_ticks && !self.reached() {
            self.advance();
            ticks += 1;
        }
        RunSummary {
            ticks,
            reached: self.reached(),
            escapes: self.escapes_triggered,
            path_length: path_length(&self.path),
            final_position: self.position,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn reached(&self) -> bool {
        self.state == NavigationState::Reached
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn mode(&self) -> NavigationMode {
        self.state.mode()
    }

    /// Current deadlock counter; zero unless navigating.
    pub fn stuck_ticks(&self) -> u32 {
        match self.state {
            NavigationState::Navigating { stuck_ticks } => stuck_ticks,
            _ => 0,
        }
    }

    pub fn escape_ticks_remaining(&self) -> u32 {
        match self.state {
            NavigationState::Escaping {
                ticks_remaining, ..
            } => ticks_remaining,
            _ => 0,
        }
    }

    pub fn escape_force(&self) -> Option<Vec2> {
        match self.state {
            NavigationState::Escaping { force, .. } => Some(force),
            _ => None,
        }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn goal(&self) -> Vec2 {
        self.field.goal()
    }

    pub fn distance_to_goal(&self) -> f64 {
        (self.position - self.field.goal()).norm()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn escapes_triggered(&self) -> u32 {
        self.escapes_triggered
    }

    /// Net force applied on the most recent tick.
    pub fn last_force(&self) -> Vec2 {
        self.last_force
    }

    pub fn field(&self) -> &PotentialField {
        &self.field
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn escape_enabled(&self) -> bool {
        self.escape_enabled
    }
}
