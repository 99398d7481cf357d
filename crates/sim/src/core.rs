//! Reactor core: reactivity, temperature, pressure and integrity.
//!
//! The core is evaluated last in a tick and reads the current-tick outputs
//! of every other subsystem. Each stage may raise the danger latch; no later
//! stage can lower it again before the next tick begins.

use safety::{TickLatch, TripReason};
use serde::Serialize;

use crate::config::CoreConfig;
use crate::error::{require_finite, SimResult};
use crate::pressuriser::Pressuriser;
use crate::range::{Band, Diagnostics};
use crate::scenario::CoreParams;

const NAME: &str = "core";
const PERCENT: Band = Band::new(0.0, 100.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CoreState {
    pub temperature: f64,
    pub pressure: f64,
    pub reactivity: f64,
    pub neutron_flux: f64,
    pub integrity: f64,
    pub fuel_integrity: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CoreIndicators {
    pub danger: bool,
    pub danger_reason: Option<TripReason>,
    pub overheating: bool,
    pub critical_overheating: bool,
    pub critical_mass: bool,
    pub reactive: bool,
    pub operating_power: bool,
}

/// Current-tick outputs of the other subsystems, as seen by the core.
#[derive(Clone, Copy, Debug)]
pub struct CoreInputs {
    pub absorption_rate: f64,
    pub loop_temperature: f64,
    pub loop_flow: f64,
    /// Primary loop heat transfer efficiency, percent.
    pub loop_efficiency: f64,
    pub thermal_power: f64,
    pub electrical_power: f64,
}

#[derive(Clone, Debug)]
pub struct Core {
    pub state: CoreState,
    pub indicators: CoreIndicators,
    latch: TickLatch,
    cfg: CoreConfig,
}

impl Core {
    /// Build the core from scenario values. Out-of-band values are clamped
    /// and reported, and the indicators are derived with the same rules as
    /// `update` so the initial snapshot is self-consistent.
    pub fn new(p: &CoreParams, cfg: &CoreConfig, diag: &mut Diagnostics) -> SimResult<Self> {
        let temperature = require_finite("Core", "temperature", p.temperature)?;
        let pressure = require_finite("Core", "pressure", p.pressure)?;
        let reactivity = require_finite("Core", "reactivity", p.reactivity)?;
        let neutron_flux = require_finite("Core", "neutron_flux", p.neutron_flux)?;
        let integrity = require_finite("Core", "integrity", p.integrity)?;
        let fuel_integrity = require_finite("Core", "fuel_integrity", p.fuel_integrity)?;

        let state = CoreState {
            temperature: diag.clamp(NAME, "temperature", temperature, cfg.temperature_band),
            pressure: diag.clamp(NAME, "pressure", pressure, cfg.pressure_band),
            reactivity: diag.clamp(NAME, "reactivity", reactivity, PERCENT),
            neutron_flux: diag.at_least(NAME, "neutron_flux", neutron_flux, 0.0),
            integrity: diag.clamp(NAME, "integrity", integrity, PERCENT),
            fuel_integrity: diag.clamp(NAME, "fuel_integrity", fuel_integrity, PERCENT),
        };
        let mut core = Self {
            state,
            indicators: CoreIndicators::default(),
            latch: TickLatch::default(),
            cfg: cfg.clone(),
        };
        core.check_reactivity();
        core.check_temperature();
        core.check_pressure();
        core.check_integrity();
        core.publish_danger();
        Ok(core)
    }

    /// Run the four core stages in order. The pressuriser is advanced as
    /// part of the pressure stage.
    pub fn update(&mut self, inputs: &CoreInputs, pressuriser: &mut Pressuriser, dt_s: f64, diag: &mut Diagnostics) {
        self.latch.begin_tick();

        self.update_reactivity(inputs, dt_s, diag);
        self.update_temperature(inputs, dt_s, diag);

        pressuriser.update(dt_s, diag);
        self.update_pressure(inputs, pressuriser.state.pressure, diag);

        self.update_integrity(dt_s, diag);
        self.update_fuel_integrity(inputs, dt_s, diag);

        self.indicators.operating_power = inputs.electrical_power > 0.0;
        self.publish_danger();
    }

    fn publish_danger(&mut self) {
        self.indicators.danger = self.latch.is_raised();
        self.indicators.danger_reason = self.latch.reason();
    }

    fn check_reactivity(&mut self) {
        let r = self.state.reactivity;
        self.indicators.critical_mass = r >= self.cfg.critical_mass_reactivity;
        self.indicators.reactive = r > 0.0;
        if r >= self.cfg.danger_reactivity {
            self.latch.raise(TripReason::ReactivityExcursion);
        }
    }

    fn check_temperature(&mut self) {
        let t = self.state.temperature;
        self.indicators.overheating = t >= self.cfg.overheating_temperature;
        self.indicators.critical_overheating = t >= self.cfg.critical_overheating_temperature;
        if self.indicators.overheating {
            self.latch.raise(TripReason::Overheat);
        }
    }

    fn check_pressure(&mut self) {
        if self.state.pressure > self.cfg.danger_pressure {
            self.latch.raise(TripReason::Overpressure);
        }
    }

    fn check_integrity(&mut self) {
        let c = &self.cfg;
        let s = &self.state;
        if s.integrity < c.danger_integrity
            || s.temperature > c.integrity_temperature_limit
            || s.pressure > c.integrity_pressure_limit
        {
            self.latch.raise(TripReason::IntegrityLoss);
        }
    }

    fn update_reactivity(&mut self, inputs: &CoreInputs, dt_s: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &mut self.state;

        let rod_effect = (1.0 - inputs.absorption_rate / 100.0).max(0.0);
        let coolant_effect = (inputs.loop_efficiency / 100.0
            * (1.0 - c.coolant_temperature_coefficient * (s.temperature - c.reference_temperature)))
            .max(0.0);
        let fuel_effect = (s.fuel_integrity / 100.0 * (1.0 - c.fuel_decay_rate * dt_s)).max(0.0);

        // Per-second multiplicative feedback, so a zero-length tick is a no-op.
        let factor = rod_effect * coolant_effect * fuel_effect;
        let reactivity = s.reactivity * factor.powf(dt_s);
        s.reactivity = diag.clamp(NAME, "reactivity", reactivity, PERCENT);

        let flux = c.flux_base + s.reactivity * c.flux_per_reactivity + inputs.thermal_power * c.flux_per_thermal_mw;
        s.neutron_flux = diag.at_least(NAME, "neutron_flux", flux, 0.0);

        self.check_reactivity();
    }

    fn update_temperature(&mut self, inputs: &CoreInputs, dt_s: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &mut self.state;

        let heat_generated = inputs.thermal_power * s.reactivity / 100.0;
        let coolant_removal = inputs.loop_flow * (inputs.loop_temperature - c.reference_temperature);
        let heat_transferred = inputs.loop_efficiency / 100.0 * (heat_generated - coolant_removal);

        let temperature = s.temperature + (heat_generated - heat_transferred) * c.heat_rate * dt_s;
        s.temperature = diag.clamp(NAME, "temperature", temperature, c.temperature_band);

        self.check_temperature();
    }

    fn update_pressure(&mut self, inputs: &CoreInputs, pressuriser_pressure: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &mut self.state;

        let pressure = pressuriser_pressure
            + (s.temperature - c.reference_temperature) * c.pressure_temperature_coefficient
            + inputs.thermal_power * c.power_pressure_coefficient
            - inputs.loop_flow * c.flow_pressure_coefficient;
        s.pressure = diag.clamp(NAME, "pressure", pressure, c.pressure_band);

        self.check_pressure();
    }

    fn update_integrity(&mut self, dt_s: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &mut self.state;

        let over_temperature = s.temperature > c.integrity_temperature_limit;
        let over_pressure = s.pressure > c.integrity_pressure_limit;

        let mut loss = (c.integrity_decay_rate + c.fuel_degradation_penalty * (100.0 - s.fuel_integrity)) * dt_s;
        if over_temperature {
            loss += c.integrity_temperature_penalty * (s.temperature - c.integrity_temperature_limit) * dt_s;
        }
        if over_pressure {
            loss += c.integrity_pressure_penalty * (s.pressure - c.integrity_pressure_limit) * dt_s;
        }
        s.integrity = diag.clamp(NAME, "integrity", s.integrity - loss, PERCENT);

        self.check_integrity();
    }

    fn update_fuel_integrity(&mut self, inputs: &CoreInputs, dt_s: f64, diag: &mut Diagnostics) {
        let c = &self.cfg;
        let s = &mut self.state;

        let heat_wear = c.fuel_temperature_wear * (s.temperature - c.fuel_temperature_limit).max(0.0);
        let power_wear = c.fuel_power_wear * inputs.thermal_power;
        let fuel = s.fuel_integrity - (heat_wear + power_wear) * dt_s;
        s.fuel_integrity = diag.clamp(NAME, "fuel_integrity", fuel, PERCENT);
    }
}
