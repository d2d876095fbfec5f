use serde::{Deserialize, Serialize};

/// Global hazard level (flood water height) at `tick`.
///
/// Exponential growth damped by a slow sinusoid; zero at tick 0. The result is
/// truncated towards zero and never negative.
pub fn flood_level(tick: u32) -> i32 {
    let t = f64::from(tick);
    let exponent = 0.0028 * t - 1.38 * (0.00157 * t - 1.73).sin() + 1.38 * (-1.73f64).sin();
    (exponent.exp() - 1.0).max(0.0) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HazardCurve {
    /// Rising flood water, see [`flood_level`].
    Flood,
    /// Fixed level, used by scenarios that want a static hazard field.
    Constant { level: i32 },
}

impl HazardCurve {
    pub fn level(&self, tick: u32) -> i32 {
        match self {
            HazardCurve::Flood => flood_level(tick),
            HazardCurve::Constant { level } => (*level).max(0),
        }
    }
}

impl Default for HazardCurve {
    fn default() -> Self {
        HazardCurve::Flood
    }
}
