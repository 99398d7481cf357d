use std::fmt;

use safety::{PlantStatus, SafetyState};
use serde::Serialize;

use crate::control_rods::ControlRodsState;
use crate::core::{CoreIndicators, CoreState};
use crate::power::PowerState;
use crate::pressuriser::PressuriserState;
use crate::primary_loop::PrimaryLoopState;
use crate::range::RangeViolation;
use crate::secondary_loop::SecondaryLoopState;

/// Immutable copy of the whole plant, published after each completed tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlantSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub elapsed_s: f64,
    pub core: CoreState,
    pub indicators: CoreIndicators,
    pub control_rods: ControlRodsState,
    pub pressuriser: PressuriserState,
    pub primary_loop: PrimaryLoopState,
    pub secondary_loop: SecondaryLoopState,
    pub power: PowerState,
    pub status: PlantStatus,
    pub safety: SafetyState,
    /// Values clamped back into their band during this tick.
    pub violations: Vec<RangeViolation>,
}

fn on_off(b: bool) -> &'static str {
    if b {
        "on"
    } else {
        "off"
    }
}

/// Human-readable block written to the tick log.
impl fmt::Display for PlantSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "New update: {}s (tick {})", self.elapsed_s, self.tick)?;
        writeln!(f, "Core Temperature: {:.3}°C", self.core.temperature)?;
        writeln!(f, "Core Pressure: {:.3} bar", self.core.pressure)?;
        writeln!(f, "Core Reactivity: {:.3}%", self.core.reactivity)?;
        writeln!(f, "Core Neutron Flux: {:.4e}", self.core.neutron_flux)?;
        writeln!(f, "Core Integrity: {:.3}%", self.core.integrity)?;
        writeln!(f, "Core Fuel Integrity: {:.3}%", self.core.fuel_integrity)?;

        writeln!(f, "Control Rods Insertion Level: {:.2}%", self.control_rods.insertion_level)?;
        writeln!(f, "Control Rods Absorption Rate: {:.2}", self.control_rods.neutron_absorption_rate)?;

        let p = &self.pressuriser;
        writeln!(f, "Pressuriser Temperature: {:.3}°C", p.temperature)?;
        writeln!(f, "Pressuriser Pressure: {:.3} bar", p.pressure)?;
        writeln!(f, "Pressuriser Water Level: {:.2}%", p.water_level)?;
        writeln!(f, "Pressuriser Heating Power: {:.1} kW", p.heating_power)?;
        writeln!(
            f,
            "Pressuriser Heater/Relief Valve/Spray: {}/{}/{}",
            on_off(p.heater_on),
            on_off(p.relief_valve_open),
            on_off(p.spray_active)
        )?;

        let l = &self.primary_loop;
        writeln!(f, "Primary Loop Temperature: {:.3}°C", l.coolant_temperature)?;
        writeln!(f, "Primary Loop Pressure: {:.3} bar", l.coolant_pressure)?;
        writeln!(f, "Primary Loop Coolant Flow: {:.1}", l.coolant_flow)?;

        let l = &self.secondary_loop;
        writeln!(f, "Secondary Loop Temperature: {:.3}°C", l.steam_temperature)?;
        writeln!(f, "Secondary Loop Pressure: {:.3} bar", l.steam_pressure)?;
        writeln!(f, "Secondary Loop Steam Flow: {:.1}", l.steam_flow)?;

        writeln!(f, "Power Generation Power Output: {:.3} MW", self.power.electrical_power_output)?;
        writeln!(f, "Power Generation Thermal Power: {:.3} MW", self.power.thermal_power)?;

        writeln!(f, "Status: {:?} (danger: {})", self.status, self.indicators.danger)?;
        for v in &self.violations {
            writeln!(
                f,
                "Out of range: {}.{} = {} (clamped to {})",
                v.subsystem, v.quantity, v.raw, v.clamped
            )?;
        }
        Ok(())
    }
}
