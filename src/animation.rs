//! Per-frame rotation stepping for the in-flight move.
//!
//! Each tick applies only the *incremental* eased delta between the old and
//! new progress, so repeated small steps compose to an exact quarter turn
//! without re-deriving the angle from absolute progress.

use crate::lattice::Lattice;
use crate::math::{multiply_matrices, multiply_matrix_vector};
use crate::moves::{Move, MOVE_DURATION};

/// Result of advancing an in-flight move by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The move is still animating.
    InFlight,
    /// Progress reached 1 this tick; the move is done and should be
    /// finalized and discarded.
    Completed,
}

/// Ease-in-ease-out quadratic curve.
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Advances `mv` by `dt` seconds, rotating every cubie in its slice by the
/// incremental eased angle. Cubies outside the slice are untouched. All
/// affected cubies are updated before this returns, so the lattice is never
/// observable in a partially stepped state.
pub fn advance(lattice: &mut Lattice, mv: &mut Move, dt: f64) -> StepOutcome {
    let rotation = dt / MOVE_DURATION;
    let prev_progress = mv.progress;
    let new_progress = (prev_progress + rotation).min(1.0);
    mv.progress = new_progress;

    let step_angle = (ease_in_out_quad(new_progress) - ease_in_out_quad(prev_progress))
        * mv.rotation_angle
        * f64::from(mv.direction);
    let step = mv.axis.rotation(step_angle);

    for cubie in lattice.cubies_mut() {
        if mv.affects(&cubie.position) {
            cubie.position = multiply_matrix_vector(&step, &cubie.position);
            // Left-compose: the step is applied in world space, not the
            // cubie's local space.
            cubie.orientation = multiply_matrices(&step, &cubie.orientation);
        }
    }

    if new_progress >= 1.0 {
        StepOutcome::Completed
    } else {
        StepOutcome::InFlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math;
    use crate::moves::Axis;

    fn run_to_completion(lattice: &mut Lattice, mv: &mut Move, dt: f64) {
        for _ in 0..10_000 {
            if advance(lattice, mv, dt) == StepOutcome::Completed {
                return;
            }
        }
        panic!("move never completed");
    }

    #[test]
    fn easing_hits_the_curve_anchors() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert!((ease_in_out_quad(0.25) - 0.125).abs() < 1e-12);
        assert!((ease_in_out_quad(0.75) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn full_quarter_turn_rotates_the_slice_onto_the_lattice() {
        let mut lattice = Lattice::new();
        let mut mv = Move::new(Axis::Y, 1, 1);
        run_to_completion(&mut lattice, &mut mv, 0.016);
        lattice.snap_to_lattice();

        for cubie in lattice.cubies() {
            let [ox, oy, oz] = cubie.original_coords.map(f64::from);
            if oy == 1.0 {
                // Ry(+pi/2): x' = z, z' = -x.
                assert_eq!(cubie.position, [oz, 1.0, -ox], "{}", cubie.id);
                assert!(math::is_rotation(&cubie.orientation, 1e-9));
            } else {
                assert_eq!(cubie.position, [ox, oy, oz], "{}", cubie.id);
                assert_eq!(cubie.orientation, math::identity());
            }
        }
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut lattice = Lattice::new();
        let mut cw = Move::new(Axis::Z, -1, 1);
        run_to_completion(&mut lattice, &mut cw, 0.02);
        lattice.snap_to_lattice();
        let mut ccw = Move::new(Axis::Z, -1, -1);
        run_to_completion(&mut lattice, &mut ccw, 0.02);
        lattice.snap_to_lattice();

        for cubie in lattice.cubies() {
            assert_eq!(cubie.position, cubie.original_coords.map(f64::from));
        }
    }

    #[test]
    fn mid_move_positions_are_fractional() {
        let mut lattice = Lattice::new();
        let mut mv = Move::new(Axis::X, 1, 1);
        for _ in 0..20 {
            assert_eq!(advance(&mut lattice, &mut mv, 0.016), StepOutcome::InFlight);
        }

        let moved = lattice
            .cubies()
            .iter()
            .find(|c| c.original_coords == [1, 1, 0])
            .unwrap();
        assert!(moved.position[1].fract().abs() > 1e-6);
        assert!(mv.progress > 0.0 && mv.progress < 1.0);
    }

    #[test]
    fn oversized_delta_clamps_to_completion() {
        let mut lattice = Lattice::new();
        let mut mv = Move::new(Axis::X, 0, -1);
        assert_eq!(advance(&mut lattice, &mut mv, 10.0), StepOutcome::Completed);
        assert_eq!(mv.progress, 1.0);
        lattice.snap_to_lattice();
        // Even a single giant step lands the slice back on the lattice.
        for cubie in lattice.cubies() {
            for coord in cubie.position {
                assert_eq!(coord, coord.round());
            }
        }
    }
}
