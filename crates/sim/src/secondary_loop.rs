use serde::Serialize;

use crate::config::SecondaryLoopConfig;
use crate::error::{require_finite, SimResult};
use crate::primary_loop::LoopFlags;
use crate::range::{Band, Diagnostics};
use crate::scenario::SecondaryLoopParams;

const NAME: &str = "secondary_loop";
const EFFICIENCY_BAND: Band = Band::new(0.0, 100.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SecondaryLoopState {
    pub steam_temperature: f64,
    pub steam_pressure: f64,
    pub steam_flow: f64,
    pub heat_transfer_efficiency: f64,
    pub flags: LoopFlags,
}

#[derive(Clone, Debug)]
pub struct SecondaryCoolingLoop {
    pub state: SecondaryLoopState,
    cfg: SecondaryLoopConfig,
}

impl SecondaryCoolingLoop {
    pub fn new(p: &SecondaryLoopParams, cfg: &SecondaryLoopConfig, diag: &mut Diagnostics) -> SimResult<Self> {
        let temperature = require_finite("SecondaryCoolingLoop", "steam_temperature", p.steam_temperature)?;
        let pressure = require_finite("SecondaryCoolingLoop", "steam_pressure", p.steam_pressure)?;
        let flow = require_finite("SecondaryCoolingLoop", "steam_flow", p.steam_flow)?;
        let efficiency =
            require_finite("SecondaryCoolingLoop", "heat_transfer_efficiency", p.heat_transfer_efficiency)?;

        let mut l = Self {
            state: SecondaryLoopState {
                steam_temperature: diag.clamp(NAME, "steam_temperature", temperature, cfg.temperature_band),
                steam_pressure: diag.clamp(NAME, "steam_pressure", pressure, cfg.pressure_band),
                steam_flow: diag.clamp(NAME, "steam_flow", flow, cfg.flow_band),
                heat_transfer_efficiency: diag.clamp(NAME, "heat_transfer_efficiency", efficiency, EFFICIENCY_BAND),
                flags: LoopFlags::default(),
            },
            cfg: cfg.clone(),
        };
        l.refresh_flags();
        Ok(l)
    }

    /// Steam pressure as a pure function of steam temperature.
    fn saturation_pressure(&self, temperature: f64) -> f64 {
        let c = &self.cfg;
        (temperature - c.saturation_temperature) * c.pressure_slope + c.pressure_offset
    }

    pub fn update(&mut self, primary_temperature: f64, dt_s: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &self.state;

        let transferred =
            primary_temperature * (s.steam_flow / c.rated_flow) * (s.heat_transfer_efficiency / 100.0);
        let temperature = s.steam_temperature + (transferred - s.steam_temperature) * c.heat_rate * dt_s;
        let temperature = diag.clamp(NAME, "steam_temperature", temperature, c.temperature_band);
        let pressure = diag.clamp(NAME, "steam_pressure", self.saturation_pressure(temperature), c.pressure_band);
        let flow = diag.clamp(NAME, "steam_flow", s.steam_flow, c.flow_band);
        let efficiency = diag.clamp(NAME, "heat_transfer_efficiency", s.heat_transfer_efficiency, EFFICIENCY_BAND);

        self.state.steam_temperature = temperature;
        self.state.steam_pressure = pressure;
        self.state.steam_flow = flow;
        self.state.heat_transfer_efficiency = efficiency;
        self.refresh_flags();
    }

    pub fn adjust_flow(&mut self, flow: f64, diag: &mut Diagnostics) {
        self.state.steam_flow = diag.clamp(NAME, "steam_flow", flow, self.cfg.flow_band);
        self.refresh_flags();
    }

    fn refresh_flags(&mut self) {
        let c = &self.cfg;
        let s = &mut self.state;
        s.flags = LoopFlags {
            low_flow: s.steam_flow < c.low_flow,
            high_temperature: s.steam_temperature > c.high_temperature,
            low_pressure: s.steam_pressure < c.low_pressure,
        };
    }
}
