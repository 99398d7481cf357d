//! Physical bands and the out-of-range diagnostics raised when a computed
//! value has to be clamped back into its band.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lo && v <= self.hi
    }

    pub fn is_valid(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite() && self.lo <= self.hi
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeViolation {
    pub subsystem: &'static str,
    pub quantity: &'static str,
    pub raw: f64,
    pub clamped: f64,
}

/// Collects the range violations raised while one tick is evaluated.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    violations: Vec<RangeViolation>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp `raw` into `band`. Out-of-band values are reported and
    /// replaced by the nearest bound; NaN is pulled to the lower bound.
    pub fn clamp(
        &mut self,
        subsystem: &'static str,
        quantity: &'static str,
        raw: f64,
        band: Band,
    ) -> f64 {
        if band.contains(raw) {
            return raw;
        }
        let clamped = if raw.is_nan() { band.lo } else { raw.clamp(band.lo, band.hi) };
        self.report(subsystem, quantity, raw, clamped);
        clamped
    }

    /// Lower bound only, for quantities such as neutron flux.
    pub fn at_least(&mut self, subsystem: &'static str, quantity: &'static str, raw: f64, lo: f64) -> f64 {
        if raw >= lo {
            return raw;
        }
        self.report(subsystem, quantity, raw, lo);
        lo
    }

    pub fn report(&mut self, subsystem: &'static str, quantity: &'static str, raw: f64, clamped: f64) {
        tracing::warn!(subsystem, quantity, raw, clamped, "value out of range, clamped");
        self.violations.push(RangeViolation {
            subsystem,
            quantity,
            raw,
            clamped,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[RangeViolation] {
        &self.violations
    }

    pub fn take(&mut self) -> Vec<RangeViolation> {
        std::mem::take(&mut self.violations)
    }
}
