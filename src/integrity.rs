//! Post-move lattice invariant checks.
//!
//! Violations are logged and answered with a full reset, never a crash: the
//! animation must survive accumulated float error or a logic fault and
//! simply resynchronize.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::lattice::Lattice;
use crate::math;

/// Residual float slack allowed on a coordinate's magnitude.
pub const POSITION_SLACK: f64 = 1.1;

/// Tolerance for the orthonormality check on orientations.
pub const ORIENTATION_EPSILON: f64 = 1e-6;

/// A departure from the 27-cubie, on-lattice, rigid-orientation invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityViolation {
    #[error("expected 27 cubies, found {0}")]
    WrongCount(usize),
    #[error("cubie {id} out of range at ({x:.3}, {y:.3}, {z:.3})")]
    OutOfRange { id: String, x: f64, y: f64, z: f64 },
    #[error("cubies {first} and {second} occupy the same lattice point")]
    DuplicatePosition { first: String, second: String },
    #[error("cubie {id} no longer has a rigid orientation")]
    BentOrientation { id: String },
}

/// Checks the lattice after a finalized move. Returns the first violation
/// found, logging it on the way out.
pub fn check(lattice: &Lattice) -> Result<(), IntegrityViolation> {
    let result = run_checks(lattice);
    if let Err(violation) = &result {
        warn!(%violation, "lattice integrity violated");
    }
    result
}

fn run_checks(lattice: &Lattice) -> Result<(), IntegrityViolation> {
    let cubies = lattice.cubies();
    if cubies.len() != 27 {
        return Err(IntegrityViolation::WrongCount(cubies.len()));
    }

    for cubie in cubies {
        let [x, y, z] = cubie.position;
        if x.abs() > POSITION_SLACK || y.abs() > POSITION_SLACK || z.abs() > POSITION_SLACK {
            return Err(IntegrityViolation::OutOfRange {
                id: cubie.id.clone(),
                x,
                y,
                z,
            });
        }
    }

    // At rest the 27 positions must be a permutation of the lattice points,
    // so no two cubies may round to the same cell.
    let mut occupied: HashMap<[i8; 3], &str> = HashMap::with_capacity(27);
    for cubie in cubies {
        let cell = cubie.position.map(|c| c.round() as i8);
        if let Some(first) = occupied.insert(cell, &cubie.id) {
            return Err(IntegrityViolation::DuplicatePosition {
                first: first.to_owned(),
                second: cubie.id.clone(),
            });
        }
    }

    for cubie in cubies {
        if !math::is_rotation(&cubie.orientation, ORIENTATION_EPSILON) {
            return Err(IntegrityViolation::BentOrientation {
                id: cubie.id.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_lattice_passes() {
        assert_eq!(check(&Lattice::new()), Ok(()));
    }

    #[test]
    fn out_of_range_position_is_reported() {
        let mut lattice = Lattice::new();
        lattice.cubies_mut()[3].position = [1.2, 0.0, 0.0];
        assert!(matches!(
            check(&lattice),
            Err(IntegrityViolation::OutOfRange { .. })
        ));
    }

    #[test]
    fn slack_tolerates_residual_float_error() {
        let mut lattice = Lattice::new();
        lattice.cubies_mut()[3].position = [1.05, -1.02, 0.0];
        assert_eq!(check(&lattice), Ok(()));
    }

    #[test]
    fn duplicate_lattice_point_is_reported() {
        let mut lattice = Lattice::new();
        let clash = lattice.cubies()[0].position;
        lattice.cubies_mut()[1].position = clash;
        assert!(matches!(
            check(&lattice),
            Err(IntegrityViolation::DuplicatePosition { .. })
        ));
    }

    #[test]
    fn bent_orientation_is_reported() {
        let mut lattice = Lattice::new();
        lattice.cubies_mut()[7].orientation[1][1] = 1.5;
        assert!(matches!(
            check(&lattice),
            Err(IntegrityViolation::BentOrientation { .. })
        ));
    }
}
