use serde::Serialize;

use crate::config::PrimaryLoopConfig;
use crate::error::{require_finite, SimResult};
use crate::range::{Band, Diagnostics};
use crate::scenario::PrimaryLoopParams;

const NAME: &str = "primary_loop";
const EFFICIENCY_BAND: Band = Band::new(0.0, 100.0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoopFlags {
    pub low_flow: bool,
    pub high_temperature: bool,
    pub low_pressure: bool,
}

impl LoopFlags {
    pub fn any(&self) -> bool {
        self.low_flow || self.high_temperature || self.low_pressure
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PrimaryLoopState {
    pub coolant_temperature: f64,
    pub coolant_pressure: f64,
    pub coolant_flow: f64,
    /// Percent of the rated heat transfer.
    pub heat_transfer_efficiency: f64,
    pub flags: LoopFlags,
}

#[derive(Clone, Debug)]
pub struct PrimaryCoolingLoop {
    pub state: PrimaryLoopState,
    cfg: PrimaryLoopConfig,
}

impl PrimaryCoolingLoop {
    pub fn new(p: &PrimaryLoopParams, cfg: &PrimaryLoopConfig, diag: &mut Diagnostics) -> SimResult<Self> {
        let temperature = require_finite("PrimaryCoolingLoop", "coolant_temperature", p.coolant_temperature)?;
        let pressure = require_finite("PrimaryCoolingLoop", "coolant_pressure", p.coolant_pressure)?;
        let flow = require_finite("PrimaryCoolingLoop", "coolant_flow", p.coolant_flow)?;
        let efficiency =
            require_finite("PrimaryCoolingLoop", "heat_transfer_efficiency", p.heat_transfer_efficiency)?;

        let mut l = Self {
            state: PrimaryLoopState {
                coolant_temperature: diag.clamp(NAME, "coolant_temperature", temperature, cfg.temperature_band),
                coolant_pressure: diag.clamp(NAME, "coolant_pressure", pressure, cfg.pressure_band),
                coolant_flow: diag.clamp(NAME, "coolant_flow", flow, cfg.flow_band),
                heat_transfer_efficiency: diag.clamp(NAME, "heat_transfer_efficiency", efficiency, EFFICIENCY_BAND),
                flags: LoopFlags::default(),
            },
            cfg: cfg.clone(),
        };
        l.refresh_flags();
        Ok(l)
    }

    /// Advance the loop against last tick's core. Coolant pressure relaxes
    /// toward the core pressure.
    pub fn update(&mut self, core_temperature: f64, core_pressure: f64, dt_s: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &mut self.state;

        let heat_removed =
            core_temperature * (s.coolant_flow / c.rated_flow) * (s.heat_transfer_efficiency / 100.0);
        let temperature = s.coolant_temperature + (core_temperature - heat_removed) * c.heat_rate * dt_s;

        s.coolant_temperature = diag.clamp(NAME, "coolant_temperature", temperature, c.temperature_band);
        let pressure = s.coolant_pressure + (core_pressure - s.coolant_pressure) * c.pressure_rate * dt_s;
        s.coolant_pressure = diag.clamp(NAME, "coolant_pressure", pressure, c.pressure_band);
        s.coolant_flow = diag.clamp(NAME, "coolant_flow", s.coolant_flow, c.flow_band);
        s.heat_transfer_efficiency =
            diag.clamp(NAME, "heat_transfer_efficiency", s.heat_transfer_efficiency, EFFICIENCY_BAND);

        self.refresh_flags();
    }

    /// Set the pump flow setpoint. Out-of-range requests are clamped and reported.
    pub fn adjust_flow(&mut self, flow: f64, diag: &mut Diagnostics) {
        self.state.coolant_flow = diag.clamp(NAME, "coolant_flow", flow, self.cfg.flow_band);
        self.refresh_flags();
    }

    fn refresh_flags(&mut self) {
        let c = &self.cfg;
        let s = &mut self.state;
        s.flags = LoopFlags {
            low_flow: s.coolant_flow < c.low_flow,
            high_temperature: s.coolant_temperature >= c.high_temperature,
            low_pressure: s.coolant_pressure <= c.low_pressure,
        };
    }
}
