//! A self-driving 3x3x3 cube animation.
//!
//! The simulation core maintains a physically consistent 27-piece lattice:
//! an autonomous scheduler picks which slice to rotate (never the same axis
//! twice in a row), an animator advances the rotation with eased
//! incremental steps from per-frame time deltas, an integrity check guards
//! the lattice invariants after every completed move, and a viewport
//! monitor suspends, resumes, or resets the animation around visibility
//! and resize changes. The included binary renders the cube into the
//! terminal with a half-block rasterizer.

pub mod animation;
pub mod cubie;
pub mod error;
pub mod graphics;
pub mod integrity;
pub mod lattice;
pub mod math;
pub mod moves;
pub mod scene;
pub mod sim;
pub mod state;
pub mod vertex;
pub mod viewport;

pub use cubie::Cubie;
pub use error::CubeError;
pub use integrity::IntegrityViolation;
pub use lattice::Lattice;
pub use moves::{Axis, Move, MoveScheduler};
pub use sim::Simulation;
pub use viewport::{DeviceTier, QualitySettings, ViewportMonitor};
