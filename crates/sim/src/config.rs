//! Tunable coefficients and thresholds of the plant model.
//!
//! The defaults describe one internally consistent model. None of the
//! coefficients are derived from reactor physics; they are meant to be
//! tuned per scenario through a JSON config file.

use std::path::Path;

use safety::SafetyConfig;
use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::range::Band;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub core: CoreConfig,
    pub pressuriser: PressuriserConfig,
    pub primary_loop: PrimaryLoopConfig,
    pub secondary_loop: SecondaryLoopConfig,
    pub power: PowerConfig,
    pub safety: SafetyConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub temperature_band: Band,
    pub pressure_band: Band,
    pub reference_temperature: f64,

    // Reactivity
    pub coolant_temperature_coefficient: f64,
    pub fuel_decay_rate: f64,
    pub critical_mass_reactivity: f64,
    pub danger_reactivity: f64,

    // Temperature
    pub heat_rate: f64,
    pub overheating_temperature: f64,
    pub critical_overheating_temperature: f64,

    // Pressure
    pub pressure_temperature_coefficient: f64,
    pub power_pressure_coefficient: f64,
    pub flow_pressure_coefficient: f64,
    pub danger_pressure: f64,

    // Integrity
    pub integrity_decay_rate: f64,
    pub integrity_temperature_limit: f64,
    pub integrity_temperature_penalty: f64,
    pub integrity_pressure_limit: f64,
    pub integrity_pressure_penalty: f64,
    /// Integrity lost per second per percent of fuel degradation.
    pub fuel_degradation_penalty: f64,
    pub danger_integrity: f64,

    // Fuel wear
    pub fuel_temperature_limit: f64,
    pub fuel_temperature_wear: f64,
    pub fuel_power_wear: f64,

    // Neutron flux
    pub flux_base: f64,
    pub flux_per_reactivity: f64,
    pub flux_per_thermal_mw: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            temperature_band: Band::new(15.0, 500.0),
            pressure_band: Band::new(1.0, 180.0),
            reference_temperature: 300.0,
            coolant_temperature_coefficient: 0.01,
            fuel_decay_rate: 0.005,
            critical_mass_reactivity: 70.0,
            danger_reactivity: 98.0,
            heat_rate: 0.01,
            overheating_temperature: 340.0,
            critical_overheating_temperature: 400.0,
            pressure_temperature_coefficient: 0.5,
            power_pressure_coefficient: 0.001,
            flow_pressure_coefficient: 0.01,
            danger_pressure: 160.0,
            integrity_decay_rate: 0.005,
            integrity_temperature_limit: 350.0,
            integrity_temperature_penalty: 0.01,
            integrity_pressure_limit: 165.0,
            integrity_pressure_penalty: 0.1,
            fuel_degradation_penalty: 0.00025,
            danger_integrity: 20.0,
            fuel_temperature_limit: 400.0,
            fuel_temperature_wear: 0.00025,
            fuel_power_wear: 0.00005,
            flux_base: 1e13,
            flux_per_reactivity: 1e11,
            flux_per_thermal_mw: 1e9,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PressuriserConfig {
    pub min_pressure: f64,
    pub max_pressure: f64,
    pub min_water_level: f64,
    pub max_water_level: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,

    pub temperature_band: Band,
    /// Pressure band is `[0, max_pressure + pressure_headroom]`.
    pub pressure_headroom: f64,

    pub heater_temperature_rate: f64,
    pub heater_pressure_rate: f64,
    pub heater_boiloff_rate: f64,
    pub relief_rate: f64,
    pub spray_cooling_rate: f64,
    pub spray_pressure_rate: f64,
    pub spray_fill_rate: f64,
}

impl Default for PressuriserConfig {
    fn default() -> Self {
        Self {
            min_pressure: 145.0,
            max_pressure: 165.0,
            min_water_level: 20.0,
            max_water_level: 100.0,
            min_temperature: 320.0,
            max_temperature: 345.0,
            temperature_band: Band::new(15.0, 450.0),
            pressure_headroom: 15.0,
            heater_temperature_rate: 0.01,
            heater_pressure_rate: 0.005,
            heater_boiloff_rate: 0.001,
            relief_rate: 0.1,
            spray_cooling_rate: 0.2,
            spray_pressure_rate: 0.05,
            spray_fill_rate: 0.1,
        }
    }
}

impl PressuriserConfig {
    pub fn pressure_band(&self) -> Band {
        Band::new(0.0, self.max_pressure + self.pressure_headroom)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PrimaryLoopConfig {
    pub temperature_band: Band,
    pub pressure_band: Band,
    pub flow_band: Band,
    pub rated_flow: f64,
    pub heat_rate: f64,
    /// Fraction of the gap to core pressure closed per second.
    pub pressure_rate: f64,
    pub low_flow: f64,
    pub high_temperature: f64,
    pub low_pressure: f64,
}

impl Default for PrimaryLoopConfig {
    fn default() -> Self {
        Self {
            temperature_band: Band::new(15.0, 500.0),
            pressure_band: Band::new(0.0, 175.0),
            flow_band: Band::new(0.0, 500.0),
            rated_flow: 500.0,
            heat_rate: 0.01,
            pressure_rate: 0.1,
            low_flow: 100.0,
            high_temperature: 340.0,
            low_pressure: 145.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SecondaryLoopConfig {
    pub temperature_band: Band,
    pub pressure_band: Band,
    pub flow_band: Band,
    pub rated_flow: f64,
    pub heat_rate: f64,
    pub saturation_temperature: f64,
    pub pressure_slope: f64,
    pub pressure_offset: f64,
    pub low_flow: f64,
    pub high_temperature: f64,
    pub low_pressure: f64,
}

impl Default for SecondaryLoopConfig {
    fn default() -> Self {
        Self {
            temperature_band: Band::new(100.0, 400.0),
            pressure_band: Band::new(5.0, 60.0),
            flow_band: Band::new(0.0, 500.0),
            rated_flow: 500.0,
            heat_rate: 0.02,
            saturation_temperature: 100.0,
            pressure_slope: 0.18,
            pressure_offset: 5.0,
            low_flow: 100.0,
            high_temperature: 270.0,
            low_pressure: 10.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub reference_temperature: f64,
    pub temperature_coefficient: f64,
    pub reference_pressure: f64,
    pub flow_coefficient: f64,
    pub reactivity_coefficient: f64,
    pub thermal_band: Band,
    pub electrical_band: Band,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            reference_temperature: 300.0,
            temperature_coefficient: 0.1,
            reference_pressure: 150.0,
            flow_coefficient: 0.04,
            reactivity_coefficient: 0.9,
            thermal_band: Band::new(0.0, 4000.0),
            electrical_band: Band::new(0.0, 1000.0),
        }
    }
}

fn invalid(what: impl Into<String>) -> SimError {
    SimError::InvalidConfig { what: what.into() }
}

fn check_band(name: &str, band: Band) -> SimResult<()> {
    if band.is_valid() {
        Ok(())
    } else {
        Err(invalid(format!("{name} band [{}, {}] is empty or not finite", band.lo, band.hi)))
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("cannot read {}: {e}", path.display())))?;
        let cfg: SimConfig = serde_json::from_str(&text)
            .map_err(|e| invalid(format!("cannot parse {}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SimResult<()> {
        check_band("core temperature", self.core.temperature_band)?;
        check_band("core pressure", self.core.pressure_band)?;
        check_band("pressuriser temperature", self.pressuriser.temperature_band)?;
        check_band("pressuriser pressure", self.pressuriser.pressure_band())?;
        check_band("primary temperature", self.primary_loop.temperature_band)?;
        check_band("primary pressure", self.primary_loop.pressure_band)?;
        check_band("primary flow", self.primary_loop.flow_band)?;
        check_band("secondary temperature", self.secondary_loop.temperature_band)?;
        check_band("secondary pressure", self.secondary_loop.pressure_band)?;
        check_band("secondary flow", self.secondary_loop.flow_band)?;
        check_band("thermal power", self.power.thermal_band)?;
        check_band("electrical power", self.power.electrical_band)?;

        let p = &self.pressuriser;
        if p.min_pressure >= p.max_pressure {
            return Err(invalid("pressuriser min_pressure must be below max_pressure"));
        }
        if p.min_water_level >= p.max_water_level {
            return Err(invalid("pressuriser min_water_level must be below max_water_level"));
        }
        if p.min_temperature >= p.max_temperature {
            return Err(invalid("pressuriser min_temperature must be below max_temperature"));
        }
        if self.primary_loop.rated_flow <= 0.0 || self.secondary_loop.rated_flow <= 0.0 {
            return Err(invalid("rated loop flow must be positive"));
        }
        if self.power.reference_pressure <= 0.0 {
            return Err(invalid("power reference_pressure must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{"pressuriser": {"max_pressure": 170.0}, "safety": {"auto_scram": true}}"#)
                .unwrap();
        assert_eq!(cfg.pressuriser.max_pressure, 170.0);
        assert_eq!(cfg.pressuriser.min_pressure, 145.0);
        assert_eq!(cfg.pressuriser.pressure_band().hi, 185.0);
        assert!(cfg.safety.auto_scram);
        assert_eq!(cfg.core.pressure_temperature_coefficient, 0.5);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut cfg = SimConfig::default();
        cfg.pressuriser.min_pressure = 170.0;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig { .. })));
    }
}
