//! Lenis-style smooth-scroll engine and the delegate that prefers it.
//!
//! A page installs at most one [`ScrollEngine`] into a [`LenisPlugin`].
//! [`LenisScroll`] routes scroll requests to that engine when present and
//! falls back to a frame-driven [`SmoothScroll`] otherwise.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use super::easing::Easing;
use super::scroll::{FrameStatus, ScrollAnimation, ScrollTarget, SmoothScroll, Viewport};

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Up and down.
    #[default]
    Vertical,
    /// Left and right.
    Horizontal,
}

/// Engine options.
#[derive(Debug, Clone, PartialEq)]
pub struct LenisOptions {
    /// Default animation length.
    pub duration: Duration,
    /// Default curve.
    pub easing: Easing,
    /// Scroll axis.
    pub orientation: Orientation,
    /// Axis gestures are read from.
    pub gesture_orientation: Orientation,
    /// Animate wheel input instead of jumping.
    pub smooth_wheel: bool,
    /// Scale applied to wheel deltas.
    pub wheel_multiplier: f64,
    /// Scale applied to touch deltas.
    pub touch_multiplier: f64,
    /// Allow scrolling past either end.
    pub infinite: bool,
}

impl Default for LenisOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1200),
            easing: Easing::ExpoOut,
            orientation: Orientation::Vertical,
            gesture_orientation: Orientation::Vertical,
            smooth_wheel: true,
            wheel_multiplier: 1.0,
            touch_multiplier: 2.0,
            infinite: false,
        }
    }
}

/// Per-call overrides for [`ScrollEngine::scroll_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollToOptions {
    /// Added to the resolved position.
    pub offset: Option<f64>,
    /// Overrides the engine's default duration.
    pub duration: Option<Duration>,
    /// Jump without animating.
    pub immediate: bool,
}

/// A smooth-scroll engine instance.
pub trait ScrollEngine: fmt::Debug {
    /// Start scrolling toward `target`.
    fn scroll_to(&mut self, target: &ScrollTarget, options: &ScrollToOptions);

    /// Advance one animation frame at `time_ms`.
    fn raf(&mut self, time_ms: f64);

    /// Pause; frames and new scrolls are ignored until [`start`](Self::start).
    fn stop(&mut self);

    /// Resume after [`stop`](Self::stop).
    fn start(&mut self);

    /// Tear down. The engine ignores all further calls.
    fn destroy(&mut self);

    /// Whether the engine is paused.
    fn is_stopped(&self) -> bool;

    /// Whether an animation is in flight.
    fn is_scrolling(&self) -> bool;

    /// Current scroll position.
    fn scroll(&self) -> f64;
}

/// Built-in engine animating a viewport it owns.
#[derive(Debug)]
pub struct InertialScroller<V> {
    options: LenisOptions,
    viewport: V,
    animation: Option<ScrollAnimation>,
    stopped: bool,
    destroyed: bool,
}

impl<V: Viewport + fmt::Debug> InertialScroller<V> {
    /// Create an engine over `viewport`.
    #[must_use]
    pub fn new(viewport: V, options: LenisOptions) -> Self {
        Self {
            options,
            viewport,
            animation: None,
            stopped: false,
            destroyed: false,
        }
    }

    /// Engine options.
    pub fn options(&self) -> &LenisOptions {
        &self.options
    }

    /// The driven viewport.
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Feed a wheel delta.
    pub fn wheel(&mut self, delta: f64) {
        let delta = delta * self.options.wheel_multiplier;
        if self.options.smooth_wheel {
            self.glide_by(delta);
        } else {
            self.jump_by(delta);
        }
    }

    /// Feed a touch delta. Touch input is never smoothed.
    pub fn touch(&mut self, delta: f64) {
        self.jump_by(delta * self.options.touch_multiplier);
    }

    fn accepts_input(&self) -> bool {
        !self.stopped && !self.destroyed
    }

    fn clamp(&self, y: f64) -> f64 {
        if self.options.infinite {
            y
        } else {
            y.max(0.0)
        }
    }

    fn glide_by(&mut self, delta: f64) {
        if !self.accepts_input() {
            return;
        }
        let base = self
            .animation
            .as_ref()
            .map_or_else(|| self.viewport.scroll_y(), ScrollAnimation::target);
        let to = self.clamp(base + delta);
        self.animation = Some(ScrollAnimation::new(
            self.viewport.scroll_y(),
            to,
            self.options.duration,
            self.options.easing,
        ));
    }

    fn jump_by(&mut self, delta: f64) {
        if !self.accepts_input() {
            return;
        }
        self.animation = None;
        let to = self.clamp(self.viewport.scroll_y() + delta);
        self.viewport.scroll_to(to);
    }
}

impl<V: Viewport + fmt::Debug> ScrollEngine for InertialScroller<V> {
    fn scroll_to(&mut self, target: &ScrollTarget, options: &ScrollToOptions) {
        if !self.accepts_input() {
            return;
        }
        let Some(y) = target.resolve(&self.viewport) else {
            debug!(?target, "scroll target not found");
            return;
        };
        let to = self.clamp(y + options.offset.unwrap_or(0.0));

        if options.immediate {
            self.animation = None;
            self.viewport.scroll_to(to);
            return;
        }

        self.animation = Some(ScrollAnimation::new(
            self.viewport.scroll_y(),
            to,
            options.duration.unwrap_or(self.options.duration),
            self.options.easing,
        ));
    }

    fn raf(&mut self, time_ms: f64) {
        if !self.accepts_input() {
            return;
        }
        if let Some(animation) = self.animation.as_mut() {
            if animation.frame(time_ms, &mut self.viewport) == FrameStatus::Done {
                self.animation = None;
            }
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.animation = None;
    }

    fn start(&mut self) {
        self.stopped = false;
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.animation = None;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn is_scrolling(&self) -> bool {
        self.animation.is_some()
    }

    fn scroll(&self) -> f64 {
        self.viewport.scroll_y()
    }
}

/// Holds the page's engine instance, if one was installed.
#[derive(Debug, Default)]
pub struct LenisPlugin {
    engine: Option<Box<dyn ScrollEngine>>,
}

impl LenisPlugin {
    /// A plugin with no engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A plugin with `engine` installed.
    #[must_use]
    pub fn with_engine(engine: impl ScrollEngine + 'static) -> Self {
        Self {
            engine: Some(Box::new(engine)),
        }
    }

    /// Install `engine`, destroying any previous one.
    pub fn install(&mut self, engine: impl ScrollEngine + 'static) {
        self.destroy();
        self.engine = Some(Box::new(engine));
    }

    /// The engine, if installed.
    #[must_use]
    pub fn instance(&self) -> Option<&dyn ScrollEngine> {
        self.engine.as_deref()
    }

    /// The engine, mutably.
    pub fn instance_mut(&mut self) -> Option<&mut (dyn ScrollEngine + 'static)> {
        self.engine.as_deref_mut()
    }

    /// Forward an animation frame.
    pub fn raf(&mut self, time_ms: f64) {
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.raf(time_ms);
        }
    }

    /// Forward a scroll request. No-op without an engine.
    pub fn scroll_to(&mut self, target: &ScrollTarget, options: &ScrollToOptions) {
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.scroll_to(target, options);
        }
    }

    /// Pause the engine, if any.
    pub fn stop(&mut self) {
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.stop();
        }
    }

    /// Resume the engine, if any.
    pub fn start(&mut self) {
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.start();
        }
    }

    /// Destroy and drop the engine.
    pub fn destroy(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.destroy();
        }
    }
}

/// How a [`LenisScroll`] request was carried out.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollDispatch {
    /// Handed to the installed engine.
    Engine,
    /// No engine; the caller drives this animation.
    Frames(ScrollAnimation),
    /// No engine and the target did not resolve.
    Skipped,
}

/// Scroll helper that delegates to the installed engine.
#[derive(Debug)]
pub struct LenisScroll<'a> {
    plugin: &'a mut LenisPlugin,
    fallback: SmoothScroll,
}

impl<'a> LenisScroll<'a> {
    /// Bind to `plugin`. The fallback uses default smooth-scroll options.
    pub fn new(plugin: &'a mut LenisPlugin) -> Self {
        Self {
            plugin,
            fallback: SmoothScroll::default(),
        }
    }

    /// The installed engine, if any.
    #[must_use]
    pub fn lenis(&self) -> Option<&dyn ScrollEngine> {
        self.plugin.instance()
    }

    /// Scroll to `target`.
    ///
    /// `options` only apply when an engine is installed.
    pub fn scroll_to<V: Viewport + ?Sized>(
        &mut self,
        target: &ScrollTarget,
        options: &ScrollToOptions,
        viewport: &V,
    ) -> ScrollDispatch {
        if self.plugin.instance().is_some() {
            self.plugin.scroll_to(target, options);
            return ScrollDispatch::Engine;
        }
        self.fallback
            .scroll_to(viewport, target)
            .map_or(ScrollDispatch::Skipped, ScrollDispatch::Frames)
    }

    /// Scroll to the top of the page.
    pub fn scroll_to_top<V: Viewport + ?Sized>(&mut self, viewport: &V) -> ScrollDispatch {
        self.scroll_to(&ScrollTarget::Position(0.0), &ScrollToOptions::default(), viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::scroll::HeadlessViewport;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn page() -> HeadlessViewport {
        HeadlessViewport::new(800.0, 6000.0).with_element("#blog", 2400.0)
    }

    fn run(scroller: &mut InertialScroller<HeadlessViewport>, until_ms: f64) {
        let mut t = 0.0;
        while t <= until_ms {
            scroller.raf(t);
            t += 16.0;
        }
    }

    #[test]
    fn test_default_options() {
        let options = LenisOptions::default();
        assert_eq!(options.duration, Duration::from_millis(1200));
        assert_eq!(options.easing, Easing::ExpoOut);
        assert_eq!(options.orientation, Orientation::Vertical);
        assert_eq!(options.gesture_orientation, Orientation::Vertical);
        assert!(options.smooth_wheel);
        assert!((options.wheel_multiplier - 1.0).abs() < f64::EPSILON);
        assert!((options.touch_multiplier - 2.0).abs() < f64::EPSILON);
        assert!(!options.infinite);
    }

    #[test]
    fn test_engine_animates_to_selector_with_offset() {
        let mut scroller = InertialScroller::new(page(), LenisOptions::default());
        scroller.scroll_to(
            &ScrollTarget::from("#blog"),
            &ScrollToOptions {
                offset: Some(-100.0),
                ..ScrollToOptions::default()
            },
        );
        assert!(scroller.is_scrolling());

        run(&mut scroller, 1300.0);
        assert!(!scroller.is_scrolling());
        assert!(close(scroller.scroll(), 2300.0));
    }

    #[test]
    fn test_engine_duration_override_and_immediate() {
        let mut scroller = InertialScroller::new(page(), LenisOptions::default());
        scroller.scroll_to(
            &ScrollTarget::from(1000.0),
            &ScrollToOptions {
                duration: Some(Duration::from_millis(100)),
                ..ScrollToOptions::default()
            },
        );
        run(&mut scroller, 112.0);
        assert!(close(scroller.scroll(), 1000.0));

        scroller.scroll_to(
            &ScrollTarget::from(10.0),
            &ScrollToOptions {
                immediate: true,
                ..ScrollToOptions::default()
            },
        );
        assert!(!scroller.is_scrolling());
        assert!(close(scroller.scroll(), 10.0));
    }

    #[test]
    fn test_stop_and_start() {
        let mut scroller = InertialScroller::new(page(), LenisOptions::default());
        scroller.stop();
        assert!(scroller.is_stopped());

        scroller.scroll_to(&ScrollTarget::from(500.0), &ScrollToOptions::default());
        assert!(!scroller.is_scrolling());

        scroller.start();
        scroller.scroll_to(&ScrollTarget::from(500.0), &ScrollToOptions::default());
        assert!(scroller.is_scrolling());
    }

    #[test]
    fn test_destroyed_engine_ignores_input() {
        let mut scroller = InertialScroller::new(page(), LenisOptions::default());
        scroller.destroy();
        scroller.scroll_to(&ScrollTarget::from(500.0), &ScrollToOptions::default());
        scroller.wheel(100.0);
        scroller.touch(100.0);
        run(&mut scroller, 2000.0);
        assert!(close(scroller.scroll(), 0.0));
    }

    #[test]
    fn test_wheel_and_touch_multipliers() {
        let mut scroller = InertialScroller::new(page(), LenisOptions::default());
        scroller.touch(50.0);
        assert!(close(scroller.scroll(), 100.0));

        scroller.wheel(120.0);
        scroller.wheel(120.0);
        run(&mut scroller, 1300.0);
        assert!(close(scroller.scroll(), 340.0));

        scroller.wheel(-10_000.0);
        run(&mut scroller, 1300.0);
        assert!(close(scroller.scroll(), 0.0));
    }

    #[test]
    fn test_delegate_uses_engine_when_installed() {
        let mut plugin =
            LenisPlugin::with_engine(InertialScroller::new(page(), LenisOptions::default()));
        let viewport = page();

        let mut scroll = LenisScroll::new(&mut plugin);
        assert!(scroll.lenis().is_some());
        let dispatch = scroll.scroll_to(
            &ScrollTarget::from(900.0),
            &ScrollToOptions::default(),
            &viewport,
        );
        assert_eq!(dispatch, ScrollDispatch::Engine);

        for t in 0..100 {
            plugin.raf(f64::from(t) * 16.0);
        }
        let engine = plugin.instance().unwrap();
        assert!(close(engine.scroll(), 900.0));
    }

    #[test]
    fn test_delegate_falls_back_without_engine() {
        let mut plugin = LenisPlugin::new();
        let mut viewport = page();
        viewport.scroll_to(300.0);

        let mut scroll = LenisScroll::new(&mut plugin);
        assert!(scroll.lenis().is_none());

        let options = ScrollToOptions::default();
        match scroll.scroll_to(&ScrollTarget::from("#blog"), &options, &viewport) {
            ScrollDispatch::Frames(animation) => {
                assert!(close(animation.origin(), 300.0));
                assert!(close(animation.target(), 2400.0));
            }
            other => panic!("expected frames, got {other:?}"),
        }

        assert_eq!(
            scroll.scroll_to(&ScrollTarget::from("#missing"), &options, &viewport),
            ScrollDispatch::Skipped
        );

        match scroll.scroll_to_top(&viewport) {
            ScrollDispatch::Frames(animation) => assert!(close(animation.target(), 0.0)),
            other => panic!("expected frames, got {other:?}"),
        }
    }

    #[test]
    fn test_plugin_controls_without_engine_are_noops() {
        let mut plugin = LenisPlugin::new();
        plugin.scroll_to(&ScrollTarget::from(100.0), &ScrollToOptions::default());
        plugin.stop();
        plugin.start();
        plugin.raf(16.0);
        assert!(plugin.instance().is_none());
    }

    #[test]
    fn test_plugin_stop_and_start_forward() {
        let mut plugin =
            LenisPlugin::with_engine(InertialScroller::new(page(), LenisOptions::default()));
        plugin.stop();
        assert!(plugin.instance().unwrap().is_stopped());

        plugin.scroll_to(&ScrollTarget::from(100.0), &ScrollToOptions::default());
        assert!(!plugin.instance().unwrap().is_scrolling());

        plugin.start();
        plugin.scroll_to(&ScrollTarget::from(100.0), &ScrollToOptions::default());
        assert!(plugin.instance().unwrap().is_scrolling());
    }

    #[test]
    fn test_plugin_destroy_drops_engine() {
        let mut plugin =
            LenisPlugin::with_engine(InertialScroller::new(page(), LenisOptions::default()));
        plugin.destroy();
        assert!(plugin.instance().is_none());
        plugin.raf(0.0);
        plugin.destroy();
    }

    #[test]
    fn test_plugin_install_replaces_engine() {
        let mut plugin = LenisPlugin::new();
        plugin.install(InertialScroller::new(page(), LenisOptions::default()));
        plugin.install(InertialScroller::new(
            HeadlessViewport::new(800.0, 900.0),
            LenisOptions::default(),
        ));
        let engine = plugin.instance_mut().unwrap();
        engine.scroll_to(
            &ScrollTarget::from(5000.0),
            &ScrollToOptions {
                immediate: true,
                ..ScrollToOptions::default()
            },
        );
        assert!(close(engine.scroll(), 100.0));
    }
}
