//! Horizontal scroll position of the playlist strip.

use crate::drag::{ScrollBehavior, ScrollCommand};

/// Share of the remaining distance covered per animation frame.
const EASING: f64 = 0.35;

/// Distance below which a smooth scroll snaps to its target.
const SNAP: f64 = 0.5;

/// Applies [`ScrollCommand`]s to a scroll offset clamped to
/// `[0, content - viewport]`.
///
/// Smooth scrolls set a target and approach it on every [`tick`](Self::tick).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollViewport {
    offset: f64,
    content: f64,
    viewport: f64,
    target: Option<f64>,
}

impl ScrollViewport {
    #[must_use]
    pub const fn new(content: f64, viewport: f64) -> Self {
        Self {
            offset: 0.0,
            content,
            viewport,
            target: None,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (self.content - self.viewport).max(0.0)
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Where the offset is heading: the animation target, or the offset
    /// itself when idle.
    #[must_use]
    pub fn destination(&self) -> f64 {
        self.target.unwrap_or(self.offset)
    }

    /// Updates the content and viewport widths, re-clamping the position.
    pub fn set_extent(&mut self, content: f64, viewport: f64) {
        self.content = content;
        self.viewport = viewport;
        self.offset = self.clamp(self.offset);
        self.target = self.target.map(|target| self.clamp(target));
    }

    pub fn apply(&mut self, command: ScrollCommand) {
        match command {
            ScrollCommand::ScrollTo { offset } => {
                self.target = None;
                self.offset = self.clamp(offset);
            }
            ScrollCommand::ScrollBy {
                delta,
                behavior: ScrollBehavior::Instant,
            } => {
                self.target = None;
                self.offset = self.clamp(self.offset + delta);
            }
            ScrollCommand::ScrollBy {
                delta,
                behavior: ScrollBehavior::Smooth,
            } => {
                // Repeated presses accumulate on the pending target.
                let target = self.clamp(self.destination() + delta);
                self.target = (target != self.offset).then_some(target);
            }
        }
    }

    /// Stops a running animation where it is.
    pub fn stop(&mut self) {
        self.target = None;
    }

    /// Advances a smooth scroll by one frame. Returns whether it is still
    /// running.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let remaining = target - self.offset;
        if remaining.abs() <= SNAP {
            self.offset = target;
            self.target = None;
            return false;
        }
        self.offset += remaining * EASING;
        true
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }
}
