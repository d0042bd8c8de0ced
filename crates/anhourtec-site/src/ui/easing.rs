//! Easing curves for scroll animations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An easing curve mapping linear progress in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// `t`
    Linear,
    /// Cubic ease-in, `t³`.
    EaseIn,
    /// Cubic ease-out, `1 − (1 − t)³`.
    EaseOut,
    /// Cubic ease-in-out.
    #[default]
    EaseInOut,
    /// Exponential ease-out used by the inertial scroller,
    /// `min(1, 1.001 − 2^(−10t))`.
    ExpoOut,
}

impl Easing {
    /// All curves, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::ExpoOut,
    ];

    /// Apply the curve. Input is clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::ExpoOut => (1.001 - 2f64.powf(-10.0 * t)).min(1.0),
        }
    }

    /// The config/CLI name of the curve.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
            Self::ExpoOut => "expoOut",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|easing| easing.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown easing '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!(close(easing.apply(0.0), 0.0), "{easing} at 0");
            assert!(close(easing.apply(1.0), 1.0), "{easing} at 1");
        }
        assert!(close(Easing::ExpoOut.apply(1.0), 1.0));
        assert!(Easing::ExpoOut.apply(0.0).abs() < 0.01);
    }

    #[test]
    fn test_midpoints() {
        assert!(close(Easing::Linear.apply(0.5), 0.5));
        assert!(close(Easing::EaseIn.apply(0.5), 0.125));
        assert!(close(Easing::EaseOut.apply(0.5), 0.875));
        assert!(close(Easing::EaseInOut.apply(0.5), 0.5));
        assert!(close(Easing::EaseInOut.apply(0.25), 0.0625));
        assert!(close(Easing::EaseInOut.apply(0.75), 0.9375));
    }

    #[test]
    fn test_clamps_input() {
        assert!(close(Easing::EaseIn.apply(-1.0), 0.0));
        assert!(close(Easing::EaseOut.apply(2.0), 1.0));
    }

    #[test]
    fn test_monotonic() {
        for easing in Easing::ALL {
            let mut previous = easing.apply(0.0);
            for step in 1..=100 {
                let value = easing.apply(f64::from(step) / 100.0);
                assert!(value >= previous - 1e-12, "{easing} not monotonic");
                previous = value;
            }
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("easeInOut".parse::<Easing>().unwrap(), Easing::EaseInOut);
        assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!("EASEOUT".parse::<Easing>().unwrap(), Easing::EaseOut);
        assert!("bounce".parse::<Easing>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for easing in Easing::ALL {
            let json = serde_json::to_string(&easing).unwrap();
            assert_eq!(json, format!("\"{easing}\""));
        }
    }

    #[test]
    fn test_default_is_ease_in_out() {
        assert_eq!(Easing::default(), Easing::EaseInOut);
    }
}
