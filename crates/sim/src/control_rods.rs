use serde::Serialize;

use crate::error::{require_finite, SimResult};
use crate::range::{Band, Diagnostics};
use crate::scenario::ControlRodsParams;

const NAME: &str = "control_rods";
const INSERTION_BAND: Band = Band::new(0.0, 100.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ControlRodsState {
    /// 0..=100 percent inserted
    pub insertion_level: f64,
    pub neutron_absorption_rate: f64,
}

#[derive(Clone, Debug)]
pub struct ControlRods {
    pub state: ControlRodsState,
}

/// Quadratic response: deeper insertion absorbs disproportionately more.
pub fn absorption_rate(insertion_level: f64) -> f64 {
    let f = insertion_level / 100.0;
    f * f * 100.0
}

impl ControlRods {
    pub fn new(p: &ControlRodsParams, diag: &mut Diagnostics) -> SimResult<Self> {
        let level = require_finite("ControlRods", "insertion_level", p.insertion_level)?;
        let level = diag.clamp(NAME, "insertion_level", level, INSERTION_BAND);
        Ok(Self {
            state: ControlRodsState {
                insertion_level: level,
                neutron_absorption_rate: absorption_rate(level),
            },
        })
    }

    /// Move the rods by a signed delta; the insertion clamp bounds the delta
    /// without reporting a violation.
    pub fn update(&mut self, delta: f64) {
        let delta = if delta.is_finite() {
            delta
        } else {
            tracing::warn!(delta, "ignoring non-finite rod adjustment");
            0.0
        };
        self.state.insertion_level =
            (self.state.insertion_level + delta).clamp(INSERTION_BAND.lo, INSERTION_BAND.hi);
        self.state.neutron_absorption_rate = absorption_rate(self.state.insertion_level);
    }

    pub fn drive_fully_in(&mut self) {
        self.state.insertion_level = INSERTION_BAND.hi;
        self.state.neutron_absorption_rate = absorption_rate(INSERTION_BAND.hi);
    }
}
