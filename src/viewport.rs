//! Viewport and page-lifecycle tracking.
//!
//! Raw resize reports are throttled to one evaluation per
//! [`THROTTLE_INTERVAL`], and each evaluation is debounced by
//! [`DEBOUNCE_WINDOW`] so a resize storm collapses into a single decision.
//! The two timers are deliberately separate: the throttle bounds how often
//! an evaluation can start, the debounce waits for the storm to end.

use tracing::debug;

/// Debounce window that collapses bursts of resize events, in seconds.
pub const DEBOUNCE_WINDOW: f64 = 0.15;

/// Minimum interval between evaluations of raw resize events, in seconds.
pub const THROTTLE_INTERVAL: f64 = 0.1;

/// Delay before re-evaluating the viewport after a visibility or
/// orientation change, in seconds. Gives the platform time to settle.
pub const SETTLE_DELAY: f64 = 0.1;

/// Size changes smaller than this in both dimensions are noise (mobile
/// toolbars appearing and disappearing) and are ignored.
pub const RESIZE_TOLERANCE: f64 = 10.0;

/// Default width below which the viewport is classified as mobile.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Coarse device classification derived from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTier {
    Mobile,
    Desktop,
}

/// Rendering quality knobs downstream drawing consumes. This module only
/// computes them; it never draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualitySettings {
    /// Mesh subdivision level for rounded cubie corners.
    pub smoothness: u8,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl QualitySettings {
    /// The quality profile for a device tier.
    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Mobile => QualitySettings {
                smoothness: 2,
                cast_shadow: false,
                receive_shadow: false,
            },
            DeviceTier::Desktop => QualitySettings {
                smoothness: 4,
                cast_shadow: true,
                receive_shadow: true,
            },
        }
    }
}

/// Observes visibility, viewport size, and orientation signals and answers
/// two questions for the rest of the simulation: is it eligible to run, and
/// what quality tier applies.
#[derive(Debug)]
pub struct ViewportMonitor {
    visible: bool,
    resizing: bool,
    width: f64,
    height: f64,
    latest: (f64, f64),
    throttle: Option<f64>,
    debounce: Option<f64>,
    settle: Option<f64>,
    breakpoint: f64,
    tier: DeviceTier,
}

impl ViewportMonitor {
    /// Monitor seeded with the initial viewport size, classifying against
    /// [`MOBILE_BREAKPOINT`].
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_breakpoint(width, height, MOBILE_BREAKPOINT)
    }

    /// Monitor with a custom mobile breakpoint, for hosts whose viewport
    /// units are not CSS pixels.
    pub fn with_breakpoint(width: f64, height: f64, breakpoint: f64) -> Self {
        let tier = classify(width, breakpoint);
        ViewportMonitor {
            visible: true,
            resizing: false,
            width,
            height,
            latest: (width, height),
            throttle: None,
            debounce: None,
            settle: None,
            breakpoint,
            tier,
        }
    }

    /// Whether the page is currently visible.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Whether a resize is being evaluated. Animation must not complete a
    /// rotation under possibly-changed geometry while this holds.
    pub fn resizing(&self) -> bool {
        self.resizing
    }

    /// The current device tier.
    pub fn tier(&self) -> DeviceTier {
        self.tier
    }

    /// Quality settings for the current tier.
    pub fn quality(&self) -> QualitySettings {
        QualitySettings::for_tier(self.tier)
    }

    /// The last accepted viewport size.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Records a visibility transition. Becoming visible queues a settled
    /// re-evaluation of the viewport.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.settle = Some(SETTLE_DELAY);
        }
    }

    /// Records a raw resize report. Evaluation happens later, on the
    /// monitor's own timers.
    pub fn raw_resize(&mut self, width: f64, height: f64) {
        self.latest = (width, height);
        if self.throttle.is_none() {
            self.throttle = Some(THROTTLE_INTERVAL);
        }
    }

    /// Records an orientation change. The viewport is re-evaluated after an
    /// extra settle delay.
    pub fn orientation_changed(&mut self) {
        self.settle = Some(SETTLE_DELAY);
    }

    /// Advances the monitor's timers by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if expire(&mut self.settle, dt) {
            self.begin_evaluation();
        }
        if expire(&mut self.throttle, dt) {
            self.begin_evaluation();
        }
        if expire(&mut self.debounce, dt) {
            self.evaluate();
        }
    }

    fn begin_evaluation(&mut self) {
        self.resizing = true;
        self.debounce = Some(DEBOUNCE_WINDOW);
    }

    fn evaluate(&mut self) {
        let (width, height) = self.latest;
        if (self.width - width).abs() < RESIZE_TOLERANCE
            && (self.height - height).abs() < RESIZE_TOLERANCE
        {
            self.resizing = false;
            return;
        }

        self.width = width;
        self.height = height;
        let tier = classify(width, self.breakpoint);
        if tier != self.tier {
            debug!(?tier, width, height, "device tier changed");
            self.tier = tier;
        }
        self.resizing = false;
    }
}

fn classify(width: f64, breakpoint: f64) -> DeviceTier {
    if width < breakpoint {
        DeviceTier::Mobile
    } else {
        DeviceTier::Desktop
    }
}

/// Counts a timer down by `dt`; true exactly once, on expiry.
fn expire(timer: &mut Option<f64>, dt: f64) -> bool {
    match timer {
        Some(remaining) => {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *timer = None;
                true
            } else {
                false
            }
        }
        None => false,
    }
}
