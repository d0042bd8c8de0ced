//! Scroll-triggered reveal state.
//!
//! [`ScrollReveal`] tracks whether an element has scrolled into view, with a
//! fallback timer that forces it visible shortly after mount so content is
//! never stuck hidden when observation is unavailable. [`BlurFade`] is the
//! one-shot variant that also produces the fade/blur transition style.
//!
//! Both are driven by the caller: feed layouts through `observe_layout` and
//! the clock through `tick`. Times are offsets from an arbitrary origin,
//! like a page's high-resolution timestamp.

use std::time::Duration;

use tracing::trace;

use super::observer::{IntersectionEntry, IntersectionObserver, Rect, RootMargin};

/// Delay after mount before the fallback forces an element visible.
pub const FALLBACK_DELAY: Duration = Duration::from_millis(100);

/// Options for [`ScrollReveal`].
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    /// Visible fraction required to reveal.
    pub threshold: f64,
    /// Margin applied to the viewport.
    pub root_margin: RootMargin,
    /// Stop observing after the first reveal.
    pub once: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::ZERO,
            once: true,
        }
    }
}

/// Visibility state for one scroll-revealed element.
#[derive(Debug, Clone)]
pub struct ScrollReveal {
    once: bool,
    observer: IntersectionObserver,
    visible: bool,
    fallback_at: Option<Duration>,
}

impl ScrollReveal {
    /// Create an unmounted, hidden reveal.
    #[must_use]
    pub fn new(options: RevealOptions) -> Self {
        Self {
            once: options.once,
            observer: IntersectionObserver::new(options.threshold, options.root_margin),
            visible: false,
            fallback_at: None,
        }
    }

    /// Whether the element should be shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the observer is still watching.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observer.is_observing()
    }

    /// When the fallback timer fires, if armed.
    #[must_use]
    pub fn fallback_deadline(&self) -> Option<Duration> {
        self.fallback_at
    }

    /// Attach to the element: start observing and arm the fallback timer.
    pub fn mount(&mut self, now: Duration) {
        self.observer.observe();
        self.fallback_at = Some(now + FALLBACK_DELAY);
    }

    /// Feed the element's current bounds and the viewport.
    ///
    /// Returns the entry produced, if visibility changed.
    pub fn observe_layout(&mut self, target: Rect, viewport: Rect) -> Option<IntersectionEntry> {
        let entry = self.observer.update(target, viewport)?;
        self.handle_entry(&entry);
        Some(entry)
    }

    fn handle_entry(&mut self, entry: &IntersectionEntry) {
        if entry.is_intersecting {
            self.visible = true;
            self.fallback_at = None;
            if self.once {
                self.observer.stop();
            }
        } else if !self.once {
            self.visible = false;
        }
        trace!(
            visible = self.visible,
            ratio = entry.intersection_ratio,
            "reveal entry"
        );
    }

    /// Advance the clock. Fires the fallback when its deadline has passed.
    pub fn tick(&mut self, now: Duration) {
        if self.fallback_at.is_some_and(|deadline| now >= deadline) {
            self.fallback_at = None;
            if !self.visible {
                trace!("reveal fallback fired");
                self.visible = true;
            }
        }
    }

    /// Detach: stop observing and clear any pending fallback.
    pub fn unmount(&mut self) {
        self.observer.stop();
        self.fallback_at = None;
    }
}

impl Default for ScrollReveal {
    fn default() -> Self {
        Self::new(RevealOptions::default())
    }
}

/// Inline style for a [`BlurFade`] element.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurFadeStyle {
    /// `0` hidden, `1` shown.
    pub opacity: f64,
    /// CSS transform.
    pub transform: String,
    /// CSS filter.
    pub filter: String,
    /// CSS transition.
    pub transition: String,
}

impl BlurFadeStyle {
    /// Render as a `style` attribute value.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "opacity: {}; transform: {}; filter: {}; transition: {}",
            self.opacity, self.transform, self.filter, self.transition
        )
    }
}

/// One-shot fade-in with blur.
#[derive(Debug, Clone)]
pub struct BlurFade {
    delay_secs: f64,
    duration_secs: f64,
    observer: IntersectionObserver,
    visible: bool,
}

impl BlurFade {
    /// Default transition duration in seconds.
    pub const DEFAULT_DURATION_SECS: f64 = 0.6;

    /// Create with a start delay and transition duration, in seconds.
    #[must_use]
    pub fn new(delay_secs: f64, duration_secs: f64) -> Self {
        Self {
            delay_secs,
            duration_secs,
            observer: IntersectionObserver::new(0.1, RootMargin::ZERO),
            visible: false,
        }
    }

    /// Whether the element has been revealed.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Start observing.
    pub fn mount(&mut self) {
        self.observer.observe();
    }

    /// Feed the element's current bounds and the viewport.
    pub fn observe_layout(&mut self, target: Rect, viewport: Rect) {
        if let Some(entry) = self.observer.update(target, viewport) {
            if entry.is_intersecting {
                self.visible = true;
                self.observer.stop();
            }
        }
    }

    /// Stop observing.
    pub fn unmount(&mut self) {
        self.observer.stop();
    }

    /// Style for the current state.
    #[must_use]
    pub fn style(&self) -> BlurFadeStyle {
        let (opacity, offset, blur) = if self.visible {
            (1.0, "0", "0px")
        } else {
            (0.0, "10px", "6px")
        };
        BlurFadeStyle {
            opacity,
            transform: format!("translateY({offset})"),
            filter: format!("blur({blur})"),
            transition: format!(
                "all {}s ease-out {}s",
                self.duration_secs, self.delay_secs
            ),
        }
    }
}

impl Default for BlurFade {
    fn default() -> Self {
        Self::new(0.0, Self::DEFAULT_DURATION_SECS)
    }
}
