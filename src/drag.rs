//! Drag-to-scroll gesture handling.
//!
//! [`DragScroller`] turns pointer-down / move / up events on a horizontally
//! scrollable container into scroll commands. It knows nothing about the
//! terminal or any other input API: callers feed it pointer positions and
//! apply the [`ScrollCommand`]s it returns.
//!
//! ## States
//!
//! ```text
//!            pointer_down(x, offset)
//!   Idle ─────────────────────────────▶ Dragging ──┐ pointer_move(x)
//!    ▲                                     │  ▲    │ emits ScrollTo
//!    └──── pointer_up / pointer_cancel ────┘  └────┘
//!               / teardown / drop
//! ```
//!
//! Move and up listeners are acquired through [`PointerCapture`] when a gesture
//! starts and held inside the gesture, so every way out of `Dragging` releases
//! them, including dropping the scroller mid-gesture.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

/// Default multiplier applied to pointer displacement while dragging.
pub const DEFAULT_SENSITIVITY: f64 = 1.5;

/// How a scroll command should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// A scroll request for the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// Jump to an absolute offset.
    ScrollTo { offset: f64 },
    /// Move relative to the current offset.
    ScrollBy { delta: f64, behavior: ScrollBehavior },
}

/// Anchor of the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub anchor_x: f64,
    pub anchor_scroll_offset: f64,
}

/// Installs the move/up listeners for one gesture.
///
/// The returned guard represents the installed listeners; dropping it must
/// remove them.
pub trait PointerCapture {
    type Guard;

    fn capture(&self) -> Self::Guard;
}

struct Gesture<G> {
    state: DragState,
    _listeners: G,
}

/// The drag gesture state machine.
pub struct DragScroller<C: PointerCapture> {
    capture: C,
    sensitivity: f64,
    step: f64,
    gesture: Option<Gesture<C::Guard>>,
}

impl<C: PointerCapture> DragScroller<C> {
    /// Creates a scroller with the default sensitivity.
    ///
    /// `step` is the distance covered by [`scroll_next`](Self::scroll_next)
    /// and [`scroll_previous`](Self::scroll_previous).
    pub const fn new(capture: C, step: f64) -> Self {
        Self::with_sensitivity(capture, step, DEFAULT_SENSITIVITY)
    }

    pub const fn with_sensitivity(capture: C, step: f64, sensitivity: f64) -> Self {
        Self {
            capture,
            sensitivity,
            step,
            gesture: None,
        }
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    #[must_use]
    pub fn state(&self) -> Option<DragState> {
        self.gesture.as_ref().map(|gesture| gesture.state)
    }

    #[must_use]
    pub const fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Starts a gesture anchored at `x` and the container's current offset.
    ///
    /// A pointer-down during a gesture restarts it; the previous listeners are
    /// released before new ones are acquired.
    pub fn pointer_down(&mut self, x: f64, current_scroll_offset: f64) {
        self.gesture = None;
        trace!(x, offset = current_scroll_offset, "drag started");
        self.gesture = Some(Gesture {
            state: DragState {
                anchor_x: x,
                anchor_scroll_offset: current_scroll_offset,
            },
            _listeners: self.capture.capture(),
        });
    }

    /// Returns the offset for the pointer at `x`, or `None` when idle.
    ///
    /// The anchor never moves during a gesture, so the offset depends only on
    /// the current pointer position.
    pub fn pointer_move(&self, x: f64) -> Option<ScrollCommand> {
        let state = self.gesture.as_ref()?.state;
        let walk = (x - state.anchor_x) * self.sensitivity;
        Some(ScrollCommand::ScrollTo {
            offset: state.anchor_scroll_offset - walk,
        })
    }

    /// Ends the gesture and releases its listeners.
    pub fn pointer_up(&mut self) {
        if self.gesture.take().is_some() {
            trace!("drag ended");
        }
    }

    pub fn pointer_cancel(&mut self) {
        if self.gesture.take().is_some() {
            trace!("drag cancelled");
        }
    }

    /// Releases any gesture still in progress. Also runs on drop.
    pub fn teardown(&mut self) {
        self.gesture = None;
    }

    /// Smooth relative scroll, independent of drag state.
    #[must_use]
    pub const fn scroll_by(&self, delta: f64) -> ScrollCommand {
        ScrollCommand::ScrollBy {
            delta,
            behavior: ScrollBehavior::Smooth,
        }
    }

    #[must_use]
    pub const fn scroll_next(&self) -> ScrollCommand {
        self.scroll_by(self.step)
    }

    #[must_use]
    pub const fn scroll_previous(&self) -> ScrollCommand {
        self.scroll_by(-self.step)
    }
}

/// Pointer capture for a terminal: a shared flag that is raised while a
/// gesture holds it.
///
/// The application routes drag and release mouse events to the scroller only
/// while [`MouseGrab::is_grabbed`] is true.
#[derive(Debug, Clone, Default)]
pub struct MouseGrab {
    grabbed: Arc<AtomicBool>,
}

impl MouseGrab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_grabbed(&self) -> bool {
        self.grabbed.load(Ordering::Acquire)
    }
}

/// Releases a [`MouseGrab`] when dropped.
#[derive(Debug)]
pub struct GrabGuard {
    grabbed: Arc<AtomicBool>,
}

impl Drop for GrabGuard {
    fn drop(&mut self) {
        self.grabbed.store(false, Ordering::Release);
    }
}

impl PointerCapture for MouseGrab {
    type Guard = GrabGuard;

    fn capture(&self) -> GrabGuard {
        self.grabbed.store(true, Ordering::Release);
        GrabGuard {
            grabbed: self.grabbed.clone(),
        }
    }
}
