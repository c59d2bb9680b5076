//! Trajectory - Closed-form projectile motion models
//!
//! Every model maps elapsed flight time to a position given the launch
//! parameters and the aim point. None of them carries state between frames.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// World up axis
pub const UP: DVec3 = DVec3::Y;

/// Launch parameters shared by every motion model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub start: DVec3,
    /// Unit direction the projectile leaves in
    pub heading: DVec3,
    pub speed: f64,
    /// Total time from launch to impact
    pub flight_time: f64,
}

impl Launch {
    /// Launch toward `target`, flight time from straight-line distance
    pub fn toward(start: DVec3, target: DVec3, speed: f64, min_flight_time: f64) -> Self {
        let distance = start.distance(target);
        let flight_time = if speed > 0.0 {
            (distance / speed).max(min_flight_time)
        } else {
            min_flight_time
        };
        Launch {
            start,
            heading: (target - start).normalize_or_zero(),
            speed,
            flight_time: flight_time.max(f64::EPSILON),
        }
    }

    pub fn with_heading(mut self, heading: DVec3) -> Self {
        self.heading = heading.normalize_or_zero();
        self
    }

    /// Fraction of the flight completed at `elapsed`, 0..=1
    pub fn progress(&self, elapsed: f64) -> f64 {
        (elapsed / self.flight_time).clamp(0.0, 1.0)
    }
}

/// Motion model selected by a projectile's definition
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trajectory {
    /// Straight line
    #[default]
    Direct,
    /// Parabolic bump of `height` at mid-flight
    Arc {
        #[serde(alias = "arcHeight")]
        height: f64,
    },
    /// Turns from the launch heading toward the target
    Homing {
        #[serde(alias = "turnRate")]
        turn_rate: f64,
    },
    /// Corkscrews around the straight line
    Spiral {
        radius: f64,
        #[serde(alias = "angularSpeed", alias = "spiral_speed")]
        angular_speed: f64,
    },
    /// True parabola under gravity `arc_height * 4`
    Ballistic {
        #[serde(alias = "arcHeight")]
        arc_height: f64,
    },
}

impl Trajectory {
    /// Whether the aim point should follow the live target
    pub fn tracks_target(&self) -> bool {
        matches!(self, Trajectory::Homing { .. })
    }

    /// Position at `elapsed` seconds after launch toward `target`
    pub fn position(&self, launch: &Launch, target: DVec3, elapsed: f64) -> DVec3 {
        let t = elapsed.clamp(0.0, launch.flight_time);
        let u = launch.progress(elapsed);
        let line = launch.start.lerp(target, u);

        match *self {
            Trajectory::Direct => line,
            Trajectory::Arc { height } => line + UP * (4.0 * height * u * (1.0 - u)),
            Trajectory::Homing { turn_rate } => {
                let drift = launch.start + launch.heading * launch.speed * t;
                line.lerp(drift, 1.0 - homing_weight(turn_rate, t, launch.flight_time))
            }
            Trajectory::Spiral {
                radius,
                angular_speed,
            } => {
                let (right, up) = basis(target - launch.start);
                let phase = angular_speed * t;
                let envelope = radius * (PI * u).sin();
                line + (right * phase.cos() + up * phase.sin()) * envelope
            }
            Trajectory::Ballistic { arc_height } => {
                let gravity = arc_height * 4.0;
                if gravity <= 0.0 {
                    return line;
                }
                let g = -UP * gravity;
                let flight = launch.flight_time;
                let v0 = (target - launch.start) / flight - g * (0.5 * flight);
                launch.start + v0 * t + g * (0.5 * t * t)
            }
        }
    }
}

/// Exponential turn-in weight: 0 at launch, exactly 1 at impact
fn homing_weight(turn_rate: f64, t: f64, flight_time: f64) -> f64 {
    if flight_time <= 0.0 {
        return 1.0;
    }
    if turn_rate <= f64::EPSILON {
        return (t / flight_time).clamp(0.0, 1.0);
    }
    let denominator = 1.0 - (-turn_rate * flight_time).exp();
    if denominator <= f64::EPSILON {
        return (t / flight_time).clamp(0.0, 1.0);
    }
    ((1.0 - (-turn_rate * t).exp()) / denominator).clamp(0.0, 1.0)
}

/// Two unit vectors perpendicular to `direction` and to each other
fn basis(direction: DVec3) -> (DVec3, DVec3) {
    let forward = direction.normalize_or_zero();
    if forward == DVec3::ZERO {
        return (DVec3::X, UP);
    }
    let mut right = forward.cross(UP);
    if right.length_squared() < 1e-12 {
        right = forward.cross(DVec3::X);
    }
    let right = right.normalize();
    (right, right.cross(forward).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn launch() -> Launch {
        Launch::toward(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0), 5.0, 0.05)
    }

    fn target() -> DVec3 {
        DVec3::new(10.0, 0.0, 0.0)
    }

    fn all_models() -> Vec<Trajectory> {
        vec![
            Trajectory::Direct,
            Trajectory::Arc { height: 3.0 },
            Trajectory::Homing { turn_rate: 2.0 },
            Trajectory::Spiral {
                radius: 1.0,
                angular_speed: 6.0,
            },
            Trajectory::Ballistic { arc_height: 2.0 },
        ]
    }

    #[test]
    fn test_flight_time_from_speed() {
        assert!((launch().flight_time - 2.0).abs() < EPS);
        let close = Launch::toward(DVec3::ZERO, DVec3::new(0.01, 0.0, 0.0), 5.0, 0.05);
        assert!((close.flight_time - 0.05).abs() < EPS);
    }

    #[test]
    fn test_every_model_starts_and_lands_exactly() {
        let launch = launch();
        for model in all_models() {
            let start = model.position(&launch, target(), 0.0);
            let end = model.position(&launch, target(), launch.flight_time);
            assert!(start.distance(DVec3::ZERO) < EPS, "{:?} start {:?}", model, start);
            assert!(end.distance(target()) < EPS, "{:?} end {:?}", model, end);
        }
    }

    #[test]
    fn test_positions_are_deterministic() {
        let launch = launch();
        for model in all_models() {
            let a = model.position(&launch, target(), 0.7);
            let b = model.position(&launch, target(), 0.7);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_arc_peak_at_midpoint() {
        let launch = launch();
        let mid = Trajectory::Arc { height: 3.0 }.position(&launch, target(), 1.0);
        assert!((mid.y - 3.0).abs() < EPS);
        assert!((mid.x - 5.0).abs() < EPS);
    }

    #[test]
    fn test_ballistic_is_parabola() {
        let launch = launch();
        let model = Trajectory::Ballistic { arc_height: 2.0 };
        // g = 8, T = 2 -> apex at t = 1 with height g*T^2/8 = 4
        let apex = model.position(&launch, target(), 1.0);
        assert!((apex.y - 4.0).abs() < EPS);
        assert!((apex.x - 5.0).abs() < EPS);

        let early = model.position(&launch, target(), 0.5);
        let late = model.position(&launch, target(), 1.5);
        assert!((early.y - late.y).abs() < EPS);
    }

    #[test]
    fn test_homing_bends_toward_moved_target() {
        let launch = launch();
        let moved = DVec3::new(10.0, 0.0, 6.0);
        let model = Trajectory::Homing { turn_rate: 3.0 };

        let early = model.position(&launch, moved, 0.2);
        let straight = Trajectory::Direct.position(&launch, moved, 0.2);
        // Starts out following the launch heading, not the line to the new aim
        assert!(early.z < straight.z);
        assert!(early.z > 0.0);

        let end = model.position(&launch, moved, launch.flight_time);
        assert!(end.distance(moved) < EPS);
    }

    #[test]
    fn test_spiral_orbits_the_line() {
        let launch = launch();
        let model = Trajectory::Spiral {
            radius: 1.0,
            angular_speed: 0.0,
        };
        let mid = model.position(&launch, target(), 1.0);
        let line = Trajectory::Direct.position(&launch, target(), 1.0);
        assert!((mid.distance(line) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_trajectory_deserialize() {
        let t: Trajectory =
            serde_json::from_str(r#"{"type": "ballistic", "arcHeight": 1.5}"#).unwrap();
        assert_eq!(t, Trajectory::Ballistic { arc_height: 1.5 });
        let d: Trajectory = serde_json::from_str(r#"{"type": "direct"}"#).unwrap();
        assert_eq!(d, Trajectory::Direct);
    }
}
