use serde::Serialize;

use crate::config::PowerConfig;
use crate::error::{require_finite, SimResult};
use crate::range::{Band, Diagnostics};
use crate::scenario::PowerGenerationParams;

const NAME: &str = "power_generation";
const EFFICIENCY_BAND: Band = Band::new(0.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PowerState {
    /// MW(e)
    pub electrical_power_output: f64,
    /// MW(th)
    pub thermal_power: f64,
    /// 0..=1
    pub thermal_efficiency: f64,
}

#[derive(Clone, Debug)]
pub struct PowerGeneration {
    pub state: PowerState,
    cfg: PowerConfig,
}

impl PowerGeneration {
    pub fn new(p: &PowerGenerationParams, cfg: &PowerConfig, diag: &mut Diagnostics) -> SimResult<Self> {
        let electrical = require_finite("PowerGeneration", "electrical_power_output", p.electrical_power_output)?;
        let thermal = require_finite("PowerGeneration", "thermal_power", p.thermal_power)?;
        let efficiency = require_finite("PowerGeneration", "thermal_efficiency", p.thermal_efficiency)?;
        Ok(Self {
            state: PowerState {
                electrical_power_output: diag.clamp(NAME, "electrical_power_output", electrical, cfg.electrical_band),
                thermal_power: diag.clamp(NAME, "thermal_power", thermal, cfg.thermal_band),
                thermal_efficiency: diag.clamp(NAME, "thermal_efficiency", efficiency, EFFICIENCY_BAND),
            },
            cfg: cfg.clone(),
        })
    }

    /// Recompute thermal and electrical output from the core conditions.
    /// Output is an algebraic function of its inputs and carries no state
    /// between ticks.
    pub fn update(
        &mut self,
        core_temperature: f64,
        core_pressure: f64,
        core_reactivity: f64,
        coolant_flow: f64,
        diag: &mut Diagnostics,
    ) {
        let c = &self.cfg;

        let thermal = (core_temperature - c.reference_temperature)
            * c.temperature_coefficient
            * (core_pressure / c.reference_pressure)
            * (coolant_flow * c.flow_coefficient)
            * (core_reactivity * c.reactivity_coefficient);
        let thermal = diag.clamp(NAME, "thermal_power", thermal, c.thermal_band);

        let electrical = thermal * self.state.thermal_efficiency;
        if electrical < 0.0 {
            tracing::warn!(electrical, "negative electrical output before clamping");
        }
        let electrical = diag.clamp(NAME, "electrical_power_output", electrical, c.electrical_band);

        self.state.thermal_power = thermal;
        self.state.electrical_power_output = electrical;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> PowerGeneration {
        PowerGeneration::new(
            &PowerGenerationParams {
                electrical_power_output: 0.0,
                thermal_power: 0.0,
                thermal_efficiency: 0.33,
            },
            &PowerConfig::default(),
            &mut Diagnostics::new(),
        )
        .unwrap()
    }

    #[test]
    fn nominal_output() {
        let mut d = Diagnostics::new();
        let mut g = generator();
        g.update(330.0, 150.0, 50.0, 500.0, &mut d);
        // 30 * 0.1 * 1 * 20 * 45
        assert!((g.state.thermal_power - 2700.0).abs() < 1e-9);
        assert!((g.state.electrical_power_output - 891.0).abs() < 1e-9);
        assert!(d.is_empty());
    }

    #[test]
    fn cold_core_output_is_clamped_to_zero() {
        let mut d = Diagnostics::new();
        let mut g = generator();
        g.update(250.0, 150.0, 50.0, 500.0, &mut d);
        assert_eq!(g.state.thermal_power, 0.0);
        assert_eq!(g.state.electrical_power_output, 0.0);
        assert_eq!(d.violations().len(), 1);
    }

    #[test]
    fn percent_efficiency_is_clamped_to_a_fraction() {
        let mut d = Diagnostics::new();
        let g = PowerGeneration::new(
            &PowerGenerationParams {
                electrical_power_output: 0.0,
                thermal_power: 0.0,
                thermal_efficiency: 33.0,
            },
            &PowerConfig::default(),
            &mut d,
        )
        .unwrap();
        assert_eq!(g.state.thermal_efficiency, 1.0);
        assert_eq!(d.violations()[0].quantity, "thermal_efficiency");
    }
}
