//! Headless intersection observation.
//!
//! Computes how much of a target rectangle lies inside a root rectangle
//! grown or shrunk by a CSS-style root margin, and reports an entry each
//! time the target crosses the configured visibility threshold.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Matches one margin component: `10px`, `-5%`, `0`.
static MARGIN_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)(px|%)?$").expect("Invalid regex pattern")
});

/// An axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, never negative.
    pub width: f64,
    /// Height, never negative.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle. Negative sizes are clamped to zero.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The overlapping region, if the rectangles touch or overlap.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }
}

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the root's width (left/right) or height (top/bottom).
    Percent(f64),
}

impl MarginValue {
    fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// A CSS-style margin applied to the root before intersecting.
///
/// Accepts one to four whitespace-separated components in CSS shorthand
/// order (top, right, bottom, left). Each component is a number with a
/// `px` or `%` unit; a bare number is only accepted as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    /// Top margin.
    pub top: MarginValue,
    /// Right margin.
    pub right: MarginValue,
    /// Bottom margin.
    pub bottom: MarginValue,
    /// Left margin.
    pub left: MarginValue,
}

impl RootMargin {
    /// `0px` on every side.
    pub const ZERO: Self = Self {
        top: MarginValue::Px(0.0),
        right: MarginValue::Px(0.0),
        bottom: MarginValue::Px(0.0),
        left: MarginValue::Px(0.0),
    };

    /// Grow the root rectangle by the margin. Negative margins shrink it.
    #[must_use]
    pub fn expand(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRootMargin {
            value: s.to_string(),
        };

        let values = s
            .split_whitespace()
            .map(|component| parse_component(component).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()?;

        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return Err(invalid()),
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

fn parse_component(component: &str) -> Option<MarginValue> {
    let captures = MARGIN_COMPONENT.captures(component)?;
    let number: f64 = captures.get(1)?.as_str().parse().ok()?;
    match captures.get(2).map(|unit| unit.as_str()) {
        Some("px") => Some(MarginValue::Px(number)),
        Some("%") => Some(MarginValue::Percent(number)),
        None if number == 0.0 => Some(MarginValue::Px(0.0)),
        _ => None,
    }
}

/// Fraction of `target` visible inside `root` after applying `margin`.
///
/// A zero-area target counts as fully visible when it touches the root.
#[must_use]
pub fn intersection_ratio(target: Rect, root: Rect, margin: &RootMargin) -> f64 {
    let root = margin.expand(root);
    match target.intersection(&root) {
        None => 0.0,
        Some(_) if target.area() == 0.0 => 1.0,
        Some(overlap) => (overlap.area() / target.area()).clamp(0.0, 1.0),
    }
}

/// A change in a target's visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Whether the visible ratio reached the threshold.
    pub is_intersecting: bool,
    /// Visible fraction of the target, `0.0..=1.0`.
    pub intersection_ratio: f64,
    /// The target's bounds at the time of the change.
    pub bounds: Rect,
}

/// Watches one target and reports threshold crossings.
///
/// The first layout after [`observe`](Self::observe) always produces an
/// entry; later layouts produce one only when the target crosses the
/// threshold. Nothing is reported once [`stop`](Self::stop) is called.
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    threshold: f64,
    root_margin: RootMargin,
    observing: bool,
    last: Option<bool>,
}

impl IntersectionObserver {
    /// Create an observer. The threshold is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(threshold: f64, root_margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
            observing: false,
            last: None,
        }
    }

    /// The visibility threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The root margin.
    #[must_use]
    pub fn root_margin(&self) -> &RootMargin {
        &self.root_margin
    }

    /// Start watching.
    pub fn observe(&mut self) {
        self.observing = true;
        self.last = None;
    }

    /// Stop watching. Idempotent.
    pub fn stop(&mut self) {
        self.observing = false;
    }

    /// Whether the observer is active.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Feed a new layout and return an entry if visibility changed.
    pub fn update(&mut self, target: Rect, root: Rect) -> Option<IntersectionEntry> {
        if !self.observing {
            return None;
        }

        let ratio = intersection_ratio(target, root, &self.root_margin);
        let touching = target.intersection(&self.root_margin.expand(root)).is_some();
        let is_intersecting = touching && ratio >= self.threshold;

        if self.last == Some(is_intersecting) {
            return None;
        }
        self.last = Some(is_intersecting);

        Some(IntersectionEntry {
            is_intersecting,
            intersection_ratio: ratio,
            bounds: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1000.0,
        height: 800.0,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert_eq!(a.intersection(&far), None);

        let edge = Rect::new(100.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&edge).map(|r| r.area()), Some(0.0));
    }

    #[test]
    fn test_parse_root_margin_shorthand() {
        let one: RootMargin = "10px".parse().unwrap();
        assert_eq!(one.top, MarginValue::Px(10.0));
        assert_eq!(one.left, MarginValue::Px(10.0));

        let two: RootMargin = "10px 5%".parse().unwrap();
        assert_eq!(two.top, MarginValue::Px(10.0));
        assert_eq!(two.bottom, MarginValue::Px(10.0));
        assert_eq!(two.right, MarginValue::Percent(5.0));
        assert_eq!(two.left, MarginValue::Percent(5.0));

        let three: RootMargin = "1px 2px 3px".parse().unwrap();
        assert_eq!(three.bottom, MarginValue::Px(3.0));
        assert_eq!(three.left, MarginValue::Px(2.0));

        let four: RootMargin = "1px 2px 3px -4px".parse().unwrap();
        assert_eq!(four.left, MarginValue::Px(-4.0));
    }

    #[test]
    fn test_parse_root_margin_zero() {
        assert_eq!("0px".parse::<RootMargin>().unwrap(), RootMargin::ZERO);
        assert_eq!("0".parse::<RootMargin>().unwrap(), RootMargin::ZERO);
    }

    #[test]
    fn test_parse_root_margin_rejects_garbage() {
        for input in ["", "10", "10em", "1px 2px 3px 4px 5px", "px", "auto"] {
            let err = input.parse::<RootMargin>().unwrap_err();
            assert!(
                matches!(err, Error::InvalidRootMargin { .. }),
                "{input:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_expand_root() {
        let margin: RootMargin = "10px 10%".parse().unwrap();
        let expanded = margin.expand(VIEWPORT);
        assert!(close(expanded.x, -100.0));
        assert!(close(expanded.y, -10.0));
        assert!(close(expanded.width, 1200.0));
        assert!(close(expanded.height, 820.0));
    }

    #[test]
    fn test_intersection_ratio() {
        let fully = Rect::new(0.0, 100.0, 200.0, 200.0);
        assert!(close(intersection_ratio(fully, VIEWPORT, &RootMargin::ZERO), 1.0));

        let half = Rect::new(0.0, 700.0, 200.0, 200.0);
        assert!(close(intersection_ratio(half, VIEWPORT, &RootMargin::ZERO), 0.5));

        let below = Rect::new(0.0, 900.0, 200.0, 200.0);
        assert!(close(intersection_ratio(below, VIEWPORT, &RootMargin::ZERO), 0.0));
    }

    #[test]
    fn test_negative_margin_delays_visibility() {
        let target = Rect::new(0.0, 750.0, 100.0, 100.0);
        let shrink: RootMargin = "0px 0px -100px 0px".parse().unwrap();
        assert!(close(intersection_ratio(target, VIEWPORT, &shrink), 0.0));
        assert!(intersection_ratio(target, VIEWPORT, &RootMargin::ZERO) > 0.0);
    }

    #[test]
    fn test_observer_reports_initial_state() {
        let mut observer = IntersectionObserver::new(0.1, RootMargin::ZERO);
        observer.observe();

        let entry = observer
            .update(Rect::new(0.0, 2000.0, 100.0, 100.0), VIEWPORT)
            .unwrap();
        assert!(!entry.is_intersecting);
    }

    #[test]
    fn test_observer_reports_crossings_only() {
        let mut observer = IntersectionObserver::new(0.1, RootMargin::ZERO);
        observer.observe();

        assert!(observer.update(Rect::new(0.0, 2000.0, 100.0, 100.0), VIEWPORT).is_some());
        // Still hidden: no entry.
        assert!(observer.update(Rect::new(0.0, 1500.0, 100.0, 100.0), VIEWPORT).is_none());
        // 5% visible is below the threshold.
        assert!(observer.update(Rect::new(0.0, 795.0, 100.0, 100.0), VIEWPORT).is_none());

        let entry = observer
            .update(Rect::new(0.0, 780.0, 100.0, 100.0), VIEWPORT)
            .unwrap();
        assert!(entry.is_intersecting);
        assert!(close(entry.intersection_ratio, 0.2));

        assert!(observer.update(Rect::new(0.0, 400.0, 100.0, 100.0), VIEWPORT).is_none());

        let entry = observer
            .update(Rect::new(0.0, -500.0, 100.0, 100.0), VIEWPORT)
            .unwrap();
        assert!(!entry.is_intersecting);
    }

    #[test]
    fn test_stopped_observer_is_silent() {
        let mut observer = IntersectionObserver::new(0.1, RootMargin::ZERO);
        assert!(observer.update(Rect::new(0.0, 0.0, 10.0, 10.0), VIEWPORT).is_none());

        observer.observe();
        observer.stop();
        observer.stop();
        assert!(!observer.is_observing());
        assert!(observer.update(Rect::new(0.0, 0.0, 10.0, 10.0), VIEWPORT).is_none());
    }

    #[test]
    fn test_threshold_zero_counts_touching() {
        let mut observer = IntersectionObserver::new(0.0, RootMargin::ZERO);
        observer.observe();
        let entry = observer
            .update(Rect::new(0.0, 800.0, 100.0, 100.0), VIEWPORT)
            .unwrap();
        assert!(entry.is_intersecting);
    }
}
