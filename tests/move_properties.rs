//! Property tests: no sequence of fully applied slice moves may break the
//! lattice invariants.

use std::collections::HashSet;

use proptest::prelude::*;

use cube27::animation::{self, StepOutcome};
use cube27::integrity;
use cube27::lattice::Lattice;
use cube27::{Axis, Move};

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]
}

fn direction() -> impl Strategy<Value = i8> {
    prop_oneof![Just(1i8), Just(-1i8)]
}

fn apply_fully(lattice: &mut Lattice, mut mv: Move, dt: f64) {
    for _ in 0..10_000 {
        if animation::advance(lattice, &mut mv, dt) == StepOutcome::Completed {
            lattice.snap_to_lattice();
            return;
        }
    }
    panic!("move never completed");
}

proptest! {
    #[test]
    fn move_sequences_preserve_the_lattice_permutation(
        moves in prop::collection::vec((axis(), -1i8..=1, direction()), 0..16),
        dt in 0.005f64..0.1,
    ) {
        let mut lattice = Lattice::new();
        for (axis, layer, dir) in moves {
            apply_fully(&mut lattice, Move::new(axis, layer, dir), dt);
            prop_assert_eq!(integrity::check(&lattice), Ok(()));
        }

        let cells: HashSet<[i8; 3]> = lattice
            .cubies()
            .iter()
            .map(|c| c.position.map(|p| p.round() as i8))
            .collect();
        prop_assert_eq!(cells.len(), 27);
        for cubie in lattice.cubies() {
            for coord in cubie.position {
                prop_assert!((coord - coord.round()).abs() <= 0.001);
            }
        }
    }

    #[test]
    fn a_move_and_its_inverse_restore_positions(
        axis in axis(),
        layer in -1i8..=1,
        dir in direction(),
    ) {
        let mut lattice = Lattice::new();
        apply_fully(&mut lattice, Move::new(axis, layer, dir), 0.02);
        apply_fully(&mut lattice, Move::new(axis, layer, -dir), 0.02);
        for cubie in lattice.cubies() {
            prop_assert_eq!(cubie.position, cubie.original_coords.map(f64::from));
        }
    }
}
