use serde::Serialize;

use crate::config::PressuriserConfig;
use crate::error::{require_finite, SimResult};
use crate::range::{Band, Diagnostics};
use crate::scenario::PressuriserParams;

const NAME: &str = "pressuriser";
const LEVEL_BAND: Band = Band::new(0.0, 100.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PressuriserState {
    pub temperature: f64,
    pub pressure: f64,
    /// 0..=100 percent fill
    pub water_level: f64,
    /// kW
    pub heating_power: f64,
    pub heater_on: bool,
    pub relief_valve_open: bool,
    pub spray_active: bool,
}

#[derive(Clone, Debug)]
pub struct Pressuriser {
    pub state: PressuriserState,
    cfg: PressuriserConfig,
}

impl Pressuriser {
    pub fn new(p: &PressuriserParams, cfg: &PressuriserConfig, diag: &mut Diagnostics) -> SimResult<Self> {
        let temperature = require_finite("Pressuriser", "temperature", p.temperature)?;
        let pressure = require_finite("Pressuriser", "pressure", p.pressure)?;
        let water_level = require_finite("Pressuriser", "water_level", p.water_level)?;
        let heating_power = require_finite("Pressuriser", "heating_power", p.heating_power)?;
        Ok(Self {
            state: PressuriserState {
                temperature: diag.clamp(NAME, "temperature", temperature, cfg.temperature_band),
                pressure: diag.clamp(NAME, "pressure", pressure, cfg.pressure_band()),
                water_level: diag.clamp(NAME, "water_level", water_level, LEVEL_BAND),
                heating_power: diag.at_least(NAME, "heating_power", heating_power, 0.0),
                heater_on: p.heater_on,
                relief_valve_open: p.relief_valve_open,
                spray_active: p.spray_active,
            },
            cfg: cfg.clone(),
        })
    }

    pub fn set_heater(&mut self, on: bool) {
        self.state.heater_on = on;
    }

    pub fn trigger_relief_valve(&mut self) {
        self.state.relief_valve_open = true;
    }

    pub fn trigger_spray(&mut self) {
        self.state.spray_active = true;
    }

    /// Advance the vessel by `dt_s` seconds with the current actuator
    /// positions, then let the automatic actuator logic react.
    pub fn update(&mut self, dt_s: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &mut self.state;

        let mut temperature = s.temperature;
        let mut pressure = s.pressure;
        let mut level = s.water_level;

        if s.heater_on {
            temperature += s.heating_power * c.heater_temperature_rate * dt_s;
            pressure += s.heating_power * c.heater_pressure_rate * dt_s;
            level -= s.heating_power * c.heater_boiloff_rate * dt_s;
        }
        if s.spray_active {
            temperature -= c.spray_cooling_rate * dt_s;
            pressure -= c.spray_pressure_rate * dt_s;
            level += c.spray_fill_rate * dt_s;
        }
        if s.relief_valve_open {
            pressure -= c.relief_rate * dt_s;
        }

        s.temperature = diag.clamp(NAME, "temperature", temperature, c.temperature_band);
        s.pressure = diag.clamp(NAME, "pressure", pressure, c.pressure_band());
        s.water_level = diag.clamp(NAME, "water_level", level, LEVEL_BAND);

        self.run_actuator_logic();
    }

    fn run_actuator_logic(&mut self) {
        let c = &self.cfg;
        let s = &mut self.state;

        if s.temperature <= c.min_temperature && s.water_level <= c.min_water_level {
            s.heater_on = true;
        } else if s.pressure >= c.max_pressure || s.water_level >= c.max_water_level {
            s.heater_on = false;
        }

        s.spray_active = s.temperature > c.max_temperature || s.pressure > c.max_pressure;

        // Single threshold: open above, close below, hold exactly on it.
        if s.pressure > c.max_pressure {
            s.relief_valve_open = true;
        } else if s.pressure < c.max_pressure {
            s.relief_valve_open = false;
        }
    }
}
