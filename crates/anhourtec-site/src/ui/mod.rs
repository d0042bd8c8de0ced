//! Headless front-end behaviour.
//!
//! The site's client-side helpers modelled without a browser: browser APIs
//! sit behind small traits ([`scroll::Viewport`], [`theme::DocumentRoot`],
//! [`crate::storage::PreferenceStore`], [`lenis::ScrollEngine`]) and time is
//! passed in by the caller.

pub mod easing;
pub mod lenis;
pub mod observer;
pub mod reveal;
pub mod scroll;
pub mod theme;

pub use easing::Easing;
pub use lenis::{InertialScroller, LenisOptions, LenisPlugin, LenisScroll, ScrollEngine};
pub use observer::{IntersectionObserver, Rect, RootMargin};
pub use reveal::{BlurFade, RevealOptions, ScrollReveal};
pub use scroll::{drive_animation, ScrollAnimation, ScrollTarget, SmoothScroll, Viewport};
pub use theme::{DocumentRoot, HeadlessDocument, Theme, ThemeMode};
