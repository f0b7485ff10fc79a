//! The simulation object: one owned struct holding the lattice, the
//! scheduler, the viewport monitor, and the in-flight move.
//!
//! Per tick the data flows one direction: the monitor gates whether
//! anything proceeds, the scheduler may arm a move, the animator advances
//! it, and a completed move is validated before the store is read again.

use tracing::{debug, warn};

use crate::animation::{self, StepOutcome};
use crate::cubie::Cubie;
use crate::integrity;
use crate::lattice::Lattice;
use crate::moves::{Move, MoveScheduler, IDLE_DELAY};
use crate::viewport::{DeviceTier, QualitySettings, ViewportMonitor};

/// Whole-cube tumble rates in radians per second about x, y, z.
pub const TUMBLE_RATES: [f64; 3] = [0.3, 0.5, 0.2];

/// The self-driving cube simulation.
#[derive(Debug)]
pub struct Simulation {
    lattice: Lattice,
    scheduler: MoveScheduler,
    viewport: ViewportMonitor,
    current_move: Option<Move>,
    group_rotation: [f64; 3],
    pending_reset: bool,
    mounted: bool,
}

impl Simulation {
    /// Simulation with an OS-seeded scheduler, classifying quality against
    /// the default breakpoint.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self::with_parts(
            MoveScheduler::new(),
            ViewportMonitor::new(viewport_width, viewport_height),
        )
    }

    /// Simulation with a seeded scheduler and a custom viewport monitor.
    pub fn with_parts(scheduler: MoveScheduler, viewport: ViewportMonitor) -> Self {
        Simulation {
            lattice: Lattice::new(),
            scheduler,
            viewport,
            current_move: None,
            group_rotation: [0.0; 3],
            pending_reset: false,
            mounted: true,
        }
    }

    /// Advances the simulation by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if !self.mounted {
            return;
        }

        // A reset requested by the integrity check last tick is applied
        // here, before anyone reads the store this tick.
        if self.pending_reset {
            self.reset();
        }

        // Timers run regardless of visibility, exactly like the wall-clock
        // callbacks they model.
        self.viewport.tick(dt);

        if !self.viewport.visible() {
            return;
        }

        for (angle, rate) in self.group_rotation.iter_mut().zip(TUMBLE_RATES) {
            *angle += dt * rate;
        }

        // A rotation must not finish under geometry that changed beneath
        // it; start over instead.
        if self.viewport.resizing() && self.current_move.is_some() {
            debug!("resize during move, resetting");
            self.reset();
            return;
        }

        let animating = self.current_move.is_some();
        if let Some(mv) = self.scheduler.poll(dt, animating, self.viewport.resizing()) {
            self.current_move = Some(mv);
            // The newly armed move takes its first step next tick.
            return;
        }

        if let Some(mv) = self.current_move.as_mut() {
            if animation::advance(&mut self.lattice, mv, dt) == StepOutcome::Completed {
                self.finalize_move();
            }
        }
    }

    /// Synchronously restores the canonical layout and clears all move and
    /// axis-memory state. Callable by the hosting environment.
    pub fn reset(&mut self) {
        if !self.mounted {
            return;
        }
        self.lattice.reset();
        self.current_move = None;
        self.group_rotation = [0.0; 3];
        self.scheduler.clear_last_axis();
        self.pending_reset = false;
    }

    /// Arms `mv` immediately, replacing any move in flight. Lets a host (or
    /// a test) script a specific rotation.
    pub fn start_move(&mut self, mv: Move) {
        if !self.mounted {
            return;
        }
        self.current_move = Some(mv);
    }

    /// Records a page-visibility transition. Hiding forces a full reset and
    /// suspends scheduling; becoming visible resumes it after the idle
    /// delay.
    pub fn set_visible(&mut self, visible: bool) {
        if !self.mounted {
            return;
        }
        if visible {
            self.viewport.set_visible(true);
            self.scheduler.restart(IDLE_DELAY);
        } else {
            self.reset();
            self.viewport.set_visible(false);
        }
    }

    /// Records a raw viewport resize report.
    pub fn viewport_resized(&mut self, width: f64, height: f64) {
        if !self.mounted {
            return;
        }
        self.viewport.raw_resize(width, height);
    }

    /// Records an orientation change. A move in flight is discarded.
    pub fn orientation_changed(&mut self) {
        if !self.mounted {
            return;
        }
        if self.current_move.is_some() {
            self.reset();
        }
        self.viewport.orientation_changed();
    }

    /// Signals teardown. Every later call on this object is a no-op; no
    /// further mutation occurs.
    pub fn teardown(&mut self) {
        self.mounted = false;
    }

    /// The 27 cubies with their render-ready transforms.
    pub fn cubies(&self) -> &[Cubie] {
        self.lattice.cubies()
    }

    /// The move currently animating, if any.
    pub fn current_move(&self) -> Option<&Move> {
        self.current_move.as_ref()
    }

    /// Whether a move is in flight.
    pub fn is_animating(&self) -> bool {
        self.current_move.is_some()
    }

    /// Whole-cube tumble angles about x, y, z in radians.
    pub fn group_rotation(&self) -> [f64; 3] {
        self.group_rotation
    }

    /// Device tier derived from the viewport width.
    pub fn device_tier(&self) -> DeviceTier {
        self.viewport.tier()
    }

    /// Quality settings for the current device tier.
    pub fn quality(&self) -> QualitySettings {
        self.viewport.quality()
    }

    /// Whether the simulation is currently eligible to animate.
    pub fn is_visible(&self) -> bool {
        self.viewport.visible()
    }

    fn finalize_move(&mut self) {
        self.lattice.snap_to_lattice();
        if let Err(violation) = integrity::check(&self.lattice) {
            // Reset asynchronously: the store may still be read this tick.
            warn!(%violation, "scheduling full reset");
            self.pending_reset = true;
        }
        self.current_move = None;
    }
}
