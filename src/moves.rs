//! Slice moves and the autonomous scheduler that picks them.

use std::f64::consts::FRAC_PI_2;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::math::{self, Mat3, Vec3};

/// Seconds a quarter turn takes from arm to completion.
pub const MOVE_DURATION: f64 = 1.2;

/// Idle delay before the scheduler arms a move, in seconds.
pub const IDLE_DELAY: f64 = 0.2;

/// Backoff after a scheduling attempt during a resize, in seconds.
pub const RECOVERY_DELAY: f64 = 0.5;

/// How far a coordinate may sit from a layer's value and still belong to
/// it. Positions drift off the integers mid-rotation, so exact comparison
/// would drop cubies from their own slice.
pub const LAYER_TOLERANCE: f64 = 0.1;

/// One of the three principal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes, in enumeration order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Rotation matrix about this axis by `angle` radians.
    pub fn rotation(self, angle: f64) -> Mat3 {
        match self {
            Axis::X => math::rotation_x(angle),
            Axis::Y => math::rotation_y(angle),
            Axis::Z => math::rotation_z(angle),
        }
    }

    /// The component of `v` along this axis.
    pub fn component(self, v: &Vec3) -> f64 {
        match self {
            Axis::X => v[0],
            Axis::Y => v[1],
            Axis::Z => v[2],
        }
    }
}

/// Transient descriptor of an in-flight slice rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    /// Axis the slice rotates about.
    pub axis: Axis,
    /// Which slice along the axis: -1, 0, or 1.
    pub layer: i8,
    /// Rotation sense: +1 or -1.
    pub direction: i8,
    /// Target total angle, a quarter turn.
    pub rotation_angle: f64,
    /// Elapsed fraction of the move's duration, in [0, 1].
    pub progress: f64,
}

impl Move {
    /// A freshly armed move at progress 0.
    pub fn new(axis: Axis, layer: i8, direction: i8) -> Self {
        Move {
            axis,
            layer,
            direction,
            rotation_angle: FRAC_PI_2,
            progress: 0.0,
        }
    }

    /// Whether a cubie at `position` belongs to this move's slice.
    pub fn affects(&self, position: &Vec3) -> bool {
        (self.axis.component(position) - f64::from(self.layer)).abs() < LAYER_TOLERANCE
    }
}

/// All 18 (axis, layer, direction) combinations.
pub fn possible_moves() -> Vec<Move> {
    let mut moves = Vec::with_capacity(18);
    for axis in Axis::ALL {
        for layer in [-1, 0, 1] {
            for direction in [1, -1] {
                moves.push(Move::new(axis, layer, direction));
            }
        }
    }
    moves
}

/// Decides which slice to rotate and when.
///
/// Runs on a single countdown: when it lapses while idle a move is armed
/// and the countdown restarts at the move duration; when it lapses while a
/// move is still animating or a resize is in progress, nothing is armed and
/// the countdown restarts at the appropriate backoff. The countdown is only
/// advanced while the environment is eligible, so hiding the page pauses
/// scheduling entirely.
#[derive(Debug)]
pub struct MoveScheduler {
    rng: SmallRng,
    last_axis: Option<Axis>,
    countdown: f64,
}

impl MoveScheduler {
    /// Scheduler with an OS-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Scheduler with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        MoveScheduler {
            rng,
            last_axis: None,
            countdown: IDLE_DELAY,
        }
    }

    /// The axis of the previously armed move, excluded from the next draw.
    pub fn last_axis(&self) -> Option<Axis> {
        self.last_axis
    }

    /// Advances the countdown by `dt` seconds and arms a move if one is
    /// due. `animating` and `resizing` describe the environment at the
    /// moment the countdown lapses.
    pub fn poll(&mut self, dt: f64, animating: bool, resizing: bool) -> Option<Move> {
        self.countdown -= dt;
        if self.countdown > 0.0 {
            return None;
        }
        if resizing {
            self.countdown = RECOVERY_DELAY;
            return None;
        }
        if animating {
            self.countdown = MOVE_DURATION;
            return None;
        }
        let mv = self.select_move();
        self.last_axis = Some(mv.axis);
        self.countdown = MOVE_DURATION;
        debug!(axis = ?mv.axis, layer = mv.layer, direction = mv.direction, "armed move");
        Some(mv)
    }

    /// Restarts the countdown, e.g. when the page becomes visible again.
    pub fn restart(&mut self, delay: f64) {
        self.countdown = delay;
    }

    /// Forgets the no-repeat-axis memory. Called on reset so the first move
    /// after a reset is unconstrained.
    pub fn clear_last_axis(&mut self) {
        self.last_axis = None;
    }

    /// Uniform draw over the 18 moves, minus every move on the previously
    /// chosen axis.
    fn select_move(&mut self) -> Move {
        let available: Vec<Move> = possible_moves()
            .into_iter()
            .filter(|m| Some(m.axis) != self.last_axis)
            .collect();
        available[self.rng.random_range(0..available.len())]
    }
}

impl Default for MoveScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn there_are_eighteen_possible_moves() {
        let moves = possible_moves();
        assert_eq!(moves.len(), 18);
        for axis in Axis::ALL {
            assert_eq!(moves.iter().filter(|m| m.axis == axis).count(), 6);
        }
    }

    #[test]
    fn layer_membership_tolerates_drift() {
        let mv = Move::new(Axis::Y, 1, 1);
        assert!(mv.affects(&[0.0, 1.0, 0.0]));
        assert!(mv.affects(&[-0.7, 0.95, 0.3]));
        assert!(!mv.affects(&[0.0, 0.0, 0.0]));
        assert!(!mv.affects(&[0.0, 0.8, 0.0]));
    }

    #[test]
    fn nothing_is_armed_before_the_idle_delay() {
        let mut scheduler = MoveScheduler::seeded(7);
        assert!(scheduler.poll(0.1, false, false).is_none());
        assert!(scheduler.poll(0.05, false, false).is_none());
        assert!(scheduler.poll(0.1, false, false).is_some());
    }

    #[test]
    fn consecutive_moves_never_repeat_an_axis() {
        let mut scheduler = MoveScheduler::seeded(42);
        let mut previous: Option<Axis> = None;
        for _ in 0..200 {
            let mv = loop {
                if let Some(mv) = scheduler.poll(0.3, false, false) {
                    break mv;
                }
            };
            if let Some(prev) = previous {
                assert_ne!(mv.axis, prev);
            }
            previous = Some(mv.axis);
        }
    }

    #[test]
    fn lapse_while_animating_waits_a_full_move_duration() {
        let mut scheduler = MoveScheduler::seeded(1);
        assert!(scheduler.poll(IDLE_DELAY, true, false).is_none());
        // A hair under the full duration: still nothing.
        assert!(scheduler.poll(MOVE_DURATION - 0.01, false, false).is_none());
        assert!(scheduler.poll(0.02, false, false).is_some());
    }

    #[test]
    fn lapse_while_resizing_backs_off_by_the_recovery_delay() {
        let mut scheduler = MoveScheduler::seeded(1);
        assert!(scheduler.poll(IDLE_DELAY, false, true).is_none());
        assert!(scheduler.poll(RECOVERY_DELAY - 0.01, false, false).is_none());
        assert!(scheduler.poll(0.02, false, false).is_some());
    }

    #[test]
    fn first_move_after_clear_is_unconstrained() {
        let mut scheduler = MoveScheduler::seeded(3);
        while scheduler.poll(0.3, false, false).is_none() {}
        assert!(scheduler.last_axis().is_some());
        scheduler.clear_last_axis();
        assert!(scheduler.last_axis().is_none());
    }
}
