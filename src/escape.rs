//! # Escape Force Selection
//!
//! When the agent is trapped in a force-balance deadlock, the attractive pull
//! is suspended and a large override force is frozen for the escape window.
//! See [`EscapePolicy`] for the two ways of choosing it.
//!
//! The randomized policy is the only nondeterministic part of the system, so
//! its angles come from an injectable [`AngleSource`]: seeded ChaCha in
//! production, a fixed angle in tests.

use std::f64::consts::TAU;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::config::EscapePolicy;
use crate::structs::Vec2;

/// Supplies escape directions as angles in `[0, 2π)`.
pub trait AngleSource {
    fn next_angle(&mut self) -> f64;
}

#[derive(Debug, Clone)]
pub struct RngAngleSource<R = ChaCha12Rng> {
    rng: R,
}

impl RngAngleSource<ChaCha12Rng> {
    pub fn seeded(seed: u64) -> Self {
        RngAngleSource {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngAngleSource<R> {
    pub fn from_rng(rng: R) -> Self {
        RngAngleSource { rng }
    }
}

impl<R: Rng> AngleSource for RngAngleSource<R> {
    fn next_angle(&mut self) -> f64 {
        self.rng.gen_range(0.0..TAU)
    }
}

/// Always yields the same angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAngle(pub f64);

impl AngleSource for FixedAngle {
    fn next_angle(&mut self) -> f64 {
        self.0
    }
}

impl EscapePolicy {
    /// Chooses the override force for an escape starting at `position`.
    /// `start` and `goal` define the goal axis used by the lateral policy.
    pub fn escape_force(
        &self,
        position: &Vec2,
        start: &Vec2,
        goal: &Vec2,
        angles: &mut dyn AngleSource,
    ) -> Vec2 {
        match *self {
            EscapePolicy::Randomized { boost } => {
                let angle = angles.next_angle();
                Vec2::new(angle.cos(), angle.sin()) * boost
            }
            EscapePolicy::Lateral {
                magnitude,
                forward_bias,
            } => {
                let axis = (goal - start).normalize();
                let normal = Vec2::new(-axis.y, axis.x);
                let offset = (position - start).dot(&normal);
                // On-axis ties go to the right-hand side
                let side = if offset > 0.0 { 1.0 } else { -1.0 };
                (axis * forward_bias + normal * side) * magnitude
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn lateral() -> EscapePolicy {
        EscapePolicy::Lateral {
            magnitude: 60.0,
            forward_bias: 0.2,
        }
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut a = RngAngleSource::seeded(42);
        let mut b = RngAngleSource::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.next_angle(), b.next_angle());
        }
    }

    #[test]
    fn test_seeded_source_stays_in_range() {
        let mut source = RngAngleSource::seeded(7);
        for _ in 0..1000 {
            let angle = source.next_angle();
            assert!((0.0..TAU).contains(&angle), "Angle out of range: {}", angle);
        }
    }

    #[test]
    fn test_from_rng_accepts_any_rng() {
        let mut source = RngAngleSource::from_rng(ChaCha12Rng::seed_from_u64(1));
        let mut seeded = RngAngleSource::seeded(1);
        assert_eq!(source.next_angle(), seeded.next_angle());
    }

    #[test]
    fn test_fixed_angle_repeats() {
        let mut source = FixedAngle(1.25);
        assert_eq!(source.next_angle(), 1.25);
        assert_eq!(source.next_angle(), 1.25);
    }

    #[test]
    fn test_randomized_force_uses_angle_and_boost() {
        let policy = EscapePolicy::Randomized { boost: 150.0 };
        let force = policy.escape_force(
            &Vec2::new(6.2, 0.0),
            &Vec2::zeros(),
            &Vec2::new(12.0, 0.0),
            &mut FixedAngle(FRAC_PI_2),
        );
        assert_relative_eq!(force, Vec2::new(0.0, 150.0), epsilon = 1e-9);
    }

    #[test]
    fn test_randomized_force_magnitude_is_boost() {
        let policy = EscapePolicy::Randomized { boost: 150.0 };
        let mut source = RngAngleSource::seeded(3);
        for _ in 0..10 {
            let force = policy.escape_force(
                &Vec2::zeros(),
                &Vec2::zeros(),
                &Vec2::new(1.0, 0.0),
                &mut source,
            );
            assert_relative_eq!(force.norm(), 150.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_lateral_force_above_axis_pushes_up() {
        let force = lateral().escape_force(
            &Vec2::new(6.0, 0.4),
            &Vec2::zeros(),
            &Vec2::new(12.0, 0.0),
            &mut FixedAngle(0.0),
        );
        assert_relative_eq!(force, Vec2::new(12.0, 60.0), epsilon = 1e-9);
    }

    #[test]
    fn test_lateral_force_below_or_on_axis_pushes_down() {
        let below = lateral().escape_force(
            &Vec2::new(6.0, -0.4),
            &Vec2::zeros(),
            &Vec2::new(12.0, 0.0),
            &mut FixedAngle(0.0),
        );
        assert_relative_eq!(below, Vec2::new(12.0, -60.0), epsilon = 1e-9);

        let on_axis = lateral().escape_force(
            &Vec2::new(6.2, 0.0),
            &Vec2::zeros(),
            &Vec2::new(12.0, 0.0),
            &mut FixedAngle(0.0),
        );
        assert_eq!(on_axis, below);
    }

    #[test]
    fn test_lateral_force_follows_rotated_axis() {
        // Goal straight up: left of the axis is -x
        let force = lateral().escape_force(
            &Vec2::new(-1.0, 5.0),
            &Vec2::zeros(),
            &Vec2::new(0.0, 10.0),
            &mut FixedAngle(0.0),
        );
        assert_relative_eq!(force, Vec2::new(-60.0, 12.0), epsilon = 1e-9);
    }
}
