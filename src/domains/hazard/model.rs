use super::curve::HazardCurve;
use serde::{Deserialize, Serialize};

/// Maps `(tick, cell elevation)` to a local hazard level and decides passability.
///
/// Pure and closed-form: it is evaluated for every candidate cell on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardModel {
    pub curve: HazardCurve,
    /// A cell is impassable once its local hazard exceeds this value.
    pub threshold: i32,
}

impl HazardModel {
    pub fn new(curve: HazardCurve, threshold: i32) -> Self {
        Self { curve, threshold }
    }

    pub fn level(&self, tick: u32) -> i32 {
        self.curve.level(tick)
    }

    /// How far the global level stands above a cell of the given elevation.
    pub fn hazard_at(&self, tick: u32, elevation: i32) -> i32 {
        self.level(tick).saturating_sub(elevation).max(0)
    }

    pub fn is_hazardous(&self, tick: u32, elevation: i32) -> bool {
        self.hazard_at(tick, elevation) > self.threshold
    }

    /// True if the cell is hazardous now or will be `lookahead` ticks from now.
    pub fn is_hazardous_within(&self, tick: u32, elevation: i32, lookahead: u32) -> bool {
        self.is_hazardous(tick, elevation)
            || self.is_hazardous(tick.saturating_add(lookahead), elevation)
    }
}

impl Default for HazardModel {
    fn default() -> Self {
        Self {
            curve: HazardCurve::Flood,
            threshold: 0,
        }
    }
}
