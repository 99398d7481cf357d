//! Initial-condition records loaded before a run starts.
//!
//! Every field except the descriptive ones is required: a scenario with a
//! missing value is rejected instead of silently starting from zeros.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioParameters {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub core: CoreParams,
    pub control_rods: ControlRodsParams,
    pub pressuriser: PressuriserParams,
    pub primary_loop: PrimaryLoopParams,
    pub secondary_loop: SecondaryLoopParams,
    pub power_generation: PowerGenerationParams,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreParams {
    pub temperature: f64,
    pub pressure: f64,
    pub reactivity: f64,
    pub neutron_flux: f64,
    pub integrity: f64,
    pub fuel_integrity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlRodsParams {
    pub insertion_level: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PressuriserParams {
    pub temperature: f64,
    pub pressure: f64,
    pub water_level: f64,
    pub heating_power: f64,
    pub heater_on: bool,
    pub relief_valve_open: bool,
    pub spray_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimaryLoopParams {
    pub coolant_temperature: f64,
    pub coolant_pressure: f64,
    pub coolant_flow: f64,
    pub heat_transfer_efficiency: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecondaryLoopParams {
    pub steam_temperature: f64,
    pub steam_pressure: f64,
    pub steam_flow: f64,
    pub heat_transfer_efficiency: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerGenerationParams {
    pub electrical_power_output: f64,
    pub thermal_power: f64,
    #[serde(default = "default_thermal_efficiency")]
    pub thermal_efficiency: f64,
}

fn default_thermal_efficiency() -> f64 {
    0.33
}

impl ScenarioParameters {
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::MissingScenario {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SimError::ScenarioParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Steady operating point: hot core, loops at 300 °C, actuators idle.
    pub fn nominal() -> Self {
        Self {
            name: "Nominal".to_string(),
            description: "Steady full-flow operation with the rods half inserted.".to_string(),
            core: CoreParams {
                temperature: 330.0,
                pressure: 155.0,
                reactivity: 50.0,
                neutron_flux: 1e13,
                integrity: 100.0,
                fuel_integrity: 100.0,
            },
            control_rods: ControlRodsParams {
                insertion_level: 50.0,
            },
            pressuriser: PressuriserParams {
                temperature: 330.0,
                pressure: 145.0,
                water_level: 50.0,
                heating_power: 100.0,
                heater_on: false,
                relief_valve_open: false,
                spray_active: false,
            },
            primary_loop: PrimaryLoopParams {
                coolant_temperature: 300.0,
                coolant_pressure: 155.0,
                coolant_flow: 500.0,
                heat_transfer_efficiency: 100.0,
            },
            secondary_loop: SecondaryLoopParams {
                steam_temperature: 300.0,
                steam_pressure: 41.0,
                steam_flow: 500.0,
                heat_transfer_efficiency: 100.0,
            },
            power_generation: PowerGenerationParams {
                electrical_power_output: 0.0,
                thermal_power: 0.0,
                thermal_efficiency: default_thermal_efficiency(),
            },
        }
    }
}
