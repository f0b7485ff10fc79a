use crate::math::{Mat3, Vec3};

/// One of the 27 unit pieces composing the 3x3x3 lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Cubie {
    /// Stable identifier derived from the original lattice coordinates.
    pub id: String,
    /// The integer coordinates assigned at creation. Identity only; never
    /// used for rendering.
    pub original_coords: [i8; 3],
    /// Current position. An integer lattice point at rest, fractional
    /// mid-rotation.
    pub position: Vec3,
    /// Cumulative orientation relative to the original pose.
    pub orientation: Mat3,
}

impl Cubie {
    /// Creates a cubie at its canonical pose for the given lattice point.
    pub fn new(x: i8, y: i8, z: i8) -> Self {
        Cubie {
            id: format!("cubie-{x}-{y}-{z}"),
            original_coords: [x, y, z],
            position: [f64::from(x), f64::from(y), f64::from(z)],
            orientation: crate::math::identity(),
        }
    }
}
