//! # APF Navigation
//!
//! Reactive navigation of a point agent through a 2D field of circular
//! obstacles using an artificial potential field, with deadlock detection and
//! a time-boxed escape manoeuvre.
//!
//! ## Components
//!
//! - **Potential field** ([`field`]): linear attraction to the goal plus
//!   superposed repulsion from every obstacle within its influence radius.
//! - **Navigation agent** ([`agent`]): one tick per [`NavigationAgent::advance`]
//!   call; tracks the path, detects force-balance deadlocks and switches
//!   between navigating, escaping and reached.
//! - **Escape policies** ([`escape`]): randomized or lateral override force,
//!   with injectable randomness.
//! - **Scenarios** ([`scenario`]): preset layouts for drivers and tests.
//!
//! ## Usage
//!
//! Rendering and animation live outside this crate. A driver builds an agent,
//! calls `advance()` once per frame and reads `position()`/`path()`. With the
//! `python` feature the crate also builds as a PyO3 extension module.

pub mod agent;
pub mod config;
pub mod error;
pub mod escape;
pub mod field;
pub mod scenario;
pub mod structs;

#[cfg(feature = "python")]
mod python;

pub use agent::{NavigationAgent, RunSummary};
pub use config::{EscapePolicy, NavigationConfig};
pub use error::{ConfigError, NavigationError, Result};
pub use escape::{AngleSource, FixedAngle, RngAngleSource};
pub use field::PotentialField;
pub use scenario::Scenario;
pub use structs::{
    path_length, FieldGains, NavigationMode, NavigationState, Obstacle, Vec2, WorldBounds,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_drives_a_scenario() {
        let mut agent = Scenario::escape().build().unwrap();
        let mut frames = 0;
        while !agent.reached() && frames < 800 {
            agent.advance();
            frames += 1;
        }
        assert!(agent.reached());
        assert_eq!(agent.path().len(), frames + 1);
        assert!(path_length(agent.path()) > 12.0, "Detour is longer than the straight line");
    }
}
