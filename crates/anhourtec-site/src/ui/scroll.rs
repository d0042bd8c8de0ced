//! Frame-driven smooth scrolling.
//!
//! [`SmoothScroll`] resolves a [`ScrollTarget`] against a [`Viewport`] and
//! returns a [`ScrollAnimation`]. The caller advances the animation once per
//! frame, or hands it to [`drive_animation`] to run on a tokio interval.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::easing::Easing;
use crate::config::ScrollConfig;

/// Interval between frames when driving an animation, about 60 fps.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// The scrollable window.
pub trait Viewport {
    /// Current vertical scroll position.
    fn scroll_y(&self) -> f64;

    /// Jump to a vertical position.
    fn scroll_to(&mut self, y: f64);

    /// Top of the first element matching `selector`, relative to the top of
    /// the viewport. `None` when nothing matches.
    fn element_top(&self, selector: &str) -> Option<f64>;
}

/// Where to scroll.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// An absolute position.
    Position(f64),
    /// The first element matching a selector.
    Selector(String),
    /// An element whose top is this far below the top of the viewport.
    Element {
        /// Viewport-relative top of the element.
        top: f64,
    },
}

impl ScrollTarget {
    /// Resolve to an absolute position before any offset is applied.
    ///
    /// Returns `None` when a selector matches nothing.
    pub fn resolve<V: Viewport + ?Sized>(&self, viewport: &V) -> Option<f64> {
        match self {
            Self::Position(y) => Some(*y),
            Self::Selector(selector) => viewport
                .element_top(selector)
                .map(|top| top + viewport.scroll_y()),
            Self::Element { top } => Some(top + viewport.scroll_y()),
        }
    }
}

impl From<f64> for ScrollTarget {
    fn from(y: f64) -> Self {
        Self::Position(y)
    }
}

impl From<&str> for ScrollTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ScrollTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// Whether an animation wants another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Request another frame.
    Continue,
    /// The animation reached its target.
    Done,
}

/// An in-flight scroll from one position to another.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    duration_ms: f64,
    easing: Easing,
    started_at: Option<f64>,
}

impl ScrollAnimation {
    /// Create an animation. The clock starts on the first frame.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration.as_secs_f64() * 1000.0,
            easing,
            started_at: None,
        }
    }

    /// Starting position.
    #[must_use]
    pub fn origin(&self) -> f64 {
        self.from
    }

    /// Destination.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Position at `elapsed_ms` after the first frame.
    #[must_use]
    pub fn position_at(&self, elapsed_ms: f64) -> f64 {
        let progress = if self.duration_ms > 0.0 {
            (elapsed_ms / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Advance to `now_ms` and move the viewport.
    pub fn frame<V: Viewport + ?Sized>(&mut self, now_ms: f64, viewport: &mut V) -> FrameStatus {
        let started_at = *self.started_at.get_or_insert(now_ms);
        let elapsed = now_ms - started_at;

        let y = self.position_at(elapsed);
        trace!(elapsed, y, "scroll frame");
        viewport.scroll_to(y);

        if elapsed < self.duration_ms {
            FrameStatus::Continue
        } else {
            FrameStatus::Done
        }
    }
}

/// Options for [`SmoothScroll`].
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothScrollOptions {
    /// Animation length.
    pub duration: Duration,
    /// Curve applied to progress.
    pub easing: Easing,
    /// Subtracted from element and selector targets.
    pub offset: f64,
}

impl Default for SmoothScrollOptions {
    fn default() -> Self {
        Self::from(&ScrollConfig::default())
    }
}

impl From<&ScrollConfig> for SmoothScrollOptions {
    fn from(config: &ScrollConfig) -> Self {
        Self {
            duration: config.duration(),
            easing: config.easing,
            offset: config.offset,
        }
    }
}

/// Smooth scrolling without an engine.
#[derive(Debug, Clone, Default)]
pub struct SmoothScroll {
    options: SmoothScrollOptions,
}

impl SmoothScroll {
    /// Create with the given options.
    #[must_use]
    pub fn new(options: SmoothScrollOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &SmoothScrollOptions {
        &self.options
    }

    /// Absolute destination for `target`.
    ///
    /// Element and selector targets have the offset subtracted; absolute
    /// positions are used as given.
    pub fn destination<V: Viewport + ?Sized>(
        &self,
        viewport: &V,
        target: &ScrollTarget,
    ) -> Option<f64> {
        let y = target.resolve(viewport)?;
        Some(match target {
            ScrollTarget::Position(_) => y,
            _ => y - self.options.offset,
        })
    }

    /// Plan a scroll to `target`. `None` when a selector matches nothing.
    pub fn scroll_to<V: Viewport + ?Sized>(
        &self,
        viewport: &V,
        target: &ScrollTarget,
    ) -> Option<ScrollAnimation> {
        let Some(to) = self.destination(viewport, target) else {
            debug!(?target, "scroll target not found");
            return None;
        };
        Some(ScrollAnimation::new(
            viewport.scroll_y(),
            to,
            self.options.duration,
            self.options.easing,
        ))
    }

    /// Plan a scroll to the top of the page.
    pub fn scroll_to_top<V: Viewport + ?Sized>(&self, viewport: &V) -> ScrollAnimation {
        ScrollAnimation::new(
            viewport.scroll_y(),
            0.0,
            self.options.duration,
            self.options.easing,
        )
    }
}

/// Run `animation` to completion, one frame per `frame_interval`.
///
/// Returns the number of frames rendered.
pub async fn drive_animation<V: Viewport + ?Sized>(
    mut animation: ScrollAnimation,
    viewport: &mut V,
    frame_interval: Duration,
) -> usize {
    let origin = Instant::now();
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frames = 0;
    loop {
        let tick = ticker.tick().await;
        frames += 1;
        let now_ms = tick.duration_since(origin).as_secs_f64() * 1000.0;
        if animation.frame(now_ms, viewport) == FrameStatus::Done {
            break;
        }
    }
    debug!(frames, to = animation.target(), "scroll animation finished");
    frames
}

/// A viewport over a fixed-height page with named elements.
#[derive(Debug, Clone, Default)]
pub struct HeadlessViewport {
    scroll_y: f64,
    height: f64,
    page_height: f64,
    elements: BTreeMap<String, f64>,
}

impl HeadlessViewport {
    /// A viewport `height` tall over a page `page_height` tall.
    #[must_use]
    pub fn new(height: f64, page_height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            height,
            page_height,
            elements: BTreeMap::new(),
        }
    }

    /// Place an element matched by `selector` at page position `top`.
    #[must_use]
    pub fn with_element(mut self, selector: impl Into<String>, top: f64) -> Self {
        self.elements.insert(selector.into(), top);
        self
    }

    /// Largest reachable scroll position.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.page_height - self.height).max(0.0)
    }
}

impl Viewport for HeadlessViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    fn element_top(&self, selector: &str) -> Option<f64> {
        self.elements.get(selector).map(|top| top - self.scroll_y)
    }
}
