//! The lattice store: owns the 27 cubie records and the canonical layout.

use tracing::debug;

use crate::cubie::Cubie;
use crate::math;

/// Positions this close to an integer lattice point are snapped to it after
/// a move completes. Positions further away are left alone so a real fault
/// stays visible to the integrity check.
pub const SNAP_EPSILON: f64 = 0.001;

/// Owns the 27 cubies. Created once at simulation start; `reset` restores
/// the canonical layout in place, cubies are never added or removed.
#[derive(Debug, Clone)]
pub struct Lattice {
    cubies: Vec<Cubie>,
}

impl Lattice {
    /// Builds the canonical layout: every integer triple in {-1,0,1}^3
    /// exactly once, identity orientation, position equal to the original
    /// coordinates.
    pub fn new() -> Self {
        Lattice {
            cubies: canonical_cubies(),
        }
    }

    /// Restores the canonical layout, discarding all accumulated motion.
    pub fn reset(&mut self) {
        debug!("lattice reset to canonical layout");
        self.cubies = canonical_cubies();
    }

    /// Read access for the render adapter and the integrity check.
    pub fn cubies(&self) -> &[Cubie] {
        &self.cubies
    }

    /// Mutable access for the rotation animator. Kept crate-private: only
    /// the animator and reset paths write cubie state.
    pub(crate) fn cubies_mut(&mut self) -> &mut [Cubie] {
        &mut self.cubies
    }

    /// Snaps each position coordinate to the nearest integer when it is
    /// within [`SNAP_EPSILON`] of it. Numerical cleanup after a completed
    /// move, not error correction.
    pub fn snap_to_lattice(&mut self) {
        for cubie in &mut self.cubies {
            let rounded = cubie.position.map(f64::round);
            let close = cubie
                .position
                .iter()
                .zip(&rounded)
                .all(|(p, r)| (p - r).abs() <= SNAP_EPSILON);
            if close {
                cubie.position = rounded;
            }
        }
    }

    /// Whether every cubie sits at its original coordinates with identity
    /// orientation.
    pub fn is_canonical(&self) -> bool {
        self.cubies.len() == 27
            && self.cubies.iter().all(|c| {
                c.position == c.original_coords.map(f64::from)
                    && c.orientation == math::identity()
            })
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_cubies() -> Vec<Cubie> {
    let mut cubies = Vec::with_capacity(27);
    for x in [-1, 0, 1] {
        for y in [-1, 0, 1] {
            for z in [-1, 0, 1] {
                cubies.push(Cubie::new(x, y, z));
            }
        }
    }
    cubies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn canonical_layout_covers_every_lattice_point_once() {
        let lattice = Lattice::new();
        assert_eq!(lattice.cubies().len(), 27);

        let points: HashSet<[i8; 3]> = lattice
            .cubies()
            .iter()
            .map(|c| c.original_coords)
            .collect();
        assert_eq!(points.len(), 27);

        for cubie in lattice.cubies() {
            assert_eq!(cubie.position, cubie.original_coords.map(f64::from));
            assert_eq!(cubie.orientation, crate::math::identity());
        }
    }

    #[test]
    fn reset_restores_canonical_layout() {
        let mut lattice = Lattice::new();
        lattice.cubies_mut()[4].position = [0.3, -0.7, 1.0];
        lattice.cubies_mut()[4].orientation = crate::math::rotation_x(0.5);
        assert!(!lattice.is_canonical());

        lattice.reset();
        assert!(lattice.is_canonical());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut lattice = Lattice::new();
        lattice.cubies_mut()[0].position = [9.0, 9.0, 9.0];
        lattice.reset();
        let once = lattice.clone();
        lattice.reset();
        assert_eq!(lattice.cubies(), once.cubies());
    }

    #[test]
    fn snap_fixes_near_lattice_positions_only() {
        let mut lattice = Lattice::new();
        lattice.cubies_mut()[0].position = [-1.0004, 0.0002, 0.9999];
        lattice.cubies_mut()[1].position = [-0.6, 0.0, 1.0];

        lattice.snap_to_lattice();
        assert_eq!(lattice.cubies()[0].position, [-1.0, 0.0, 1.0]);
        // Well off the lattice: left untouched rather than papered over.
        assert_eq!(lattice.cubies()[1].position, [-0.6, 0.0, 1.0]);
    }

    #[test]
    fn ids_are_stable_and_distinct() {
        let lattice = Lattice::new();
        let ids: HashSet<&str> = lattice.cubies().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 27);
        assert!(ids.contains("cubie-1--1-0"));
    }
}
