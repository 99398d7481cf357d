//! The plant orchestrator.
//!
//! `ReactorModel` owns one instance of every subsystem and advances them in
//! a fixed order, passing the outputs of subsystems already updated this
//! tick as plain arguments to the ones updated later.

use controller::OperatorCommand;
use safety::{PlantStatus, SafetyConfig, SafetyReadings, SafetyState, TripReason};

use crate::config::SimConfig;
use crate::control_rods::ControlRods;
use crate::core::{Core, CoreInputs};
use crate::error::{SimError, SimResult};
use crate::power::PowerGeneration;
use crate::pressuriser::Pressuriser;
use crate::primary_loop::PrimaryCoolingLoop;
use crate::range::{Diagnostics, RangeViolation};
use crate::scenario::ScenarioParameters;
use crate::secondary_loop::SecondaryCoolingLoop;
use crate::snapshot::PlantSnapshot;

pub struct ReactorModel {
    core: Core,
    control_rods: ControlRods,
    pressuriser: Pressuriser,
    primary_loop: PrimaryCoolingLoop,
    secondary_loop: SecondaryCoolingLoop,
    power: PowerGeneration,

    safety_cfg: SafetyConfig,
    safety: SafetyState,

    scenario: String,
    tick: u64,
    elapsed_s: f64,
    pending_rod_delta: f64,
    /// Violations raised by operator commands between ticks.
    command_diag: Diagnostics,
    snapshot: PlantSnapshot,
}

impl ReactorModel {
    /// Build every subsystem from the scenario. Out-of-band scenario values
    /// are clamped and show up as violations in the initial snapshot.
    pub fn new(scenario: &ScenarioParameters, cfg: SimConfig) -> SimResult<Self> {
        cfg.validate()?;

        let mut diag = Diagnostics::new();
        let mut core = Core::new(&scenario.core, &cfg.core, &mut diag)?;
        let control_rods = ControlRods::new(&scenario.control_rods, &mut diag)?;
        let pressuriser = Pressuriser::new(&scenario.pressuriser, &cfg.pressuriser, &mut diag)?;
        let primary_loop = PrimaryCoolingLoop::new(&scenario.primary_loop, &cfg.primary_loop, &mut diag)?;
        let secondary_loop = SecondaryCoolingLoop::new(&scenario.secondary_loop, &cfg.secondary_loop, &mut diag)?;
        let power = PowerGeneration::new(&scenario.power_generation, &cfg.power, &mut diag)?;
        core.indicators.operating_power = power.state.electrical_power_output > 0.0;

        tracing::info!(scenario = %scenario.name, violations = diag.violations().len(), "reactor model constructed");

        let safety = SafetyState::default();
        let readings = safety_readings(&core, &primary_loop, &secondary_loop);
        let snapshot = PlantSnapshot {
            scenario: scenario.name.clone(),
            tick: 0,
            elapsed_s: 0.0,
            core: core.state,
            indicators: core.indicators,
            control_rods: control_rods.state,
            pressuriser: pressuriser.state,
            primary_loop: primary_loop.state,
            secondary_loop: secondary_loop.state,
            power: power.state,
            status: safety::classify(&safety, &readings),
            safety: safety.clone(),
            violations: diag.take(),
        };

        Ok(Self {
            core,
            control_rods,
            pressuriser,
            primary_loop,
            secondary_loop,
            power,
            safety_cfg: cfg.safety,
            safety,
            scenario: scenario.name.clone(),
            tick: 0,
            elapsed_s: 0.0,
            pending_rod_delta: 0.0,
            command_diag: Diagnostics::new(),
            snapshot,
        })
    }

    /// Advance the plant by `dt_s` seconds and publish a new snapshot.
    ///
    /// A zero-length tick applies pending operator input but runs no
    /// physics, so every plant quantity keeps its value.
    pub fn tick(&mut self, dt_s: f64) -> SimResult<&PlantSnapshot> {
        if !dt_s.is_finite() || dt_s < 0.0 {
            return Err(SimError::InvalidTimeStep { dt: dt_s });
        }
        let mut diag = std::mem::take(&mut self.command_diag);

        if self.safety.scram {
            self.control_rods.drive_fully_in();
            self.pending_rod_delta = 0.0;
        }
        let rod_delta = std::mem::take(&mut self.pending_rod_delta);
        self.control_rods.update(rod_delta);

        if dt_s > 0.0 {
            self.advance(dt_s, &mut diag);
        }

        self.tick += 1;
        self.elapsed_s += dt_s;

        let readings = safety_readings(&self.core, &self.primary_loop, &self.secondary_loop);
        safety::evaluate(&self.safety_cfg, &mut self.safety, &readings);
        let status = safety::classify(&self.safety, &readings);

        self.publish(status, diag.take());
        tracing::debug!(
            tick = self.tick,
            temperature = self.core.state.temperature,
            pressure = self.core.state.pressure,
            reactivity = self.core.state.reactivity,
            ?status,
            "tick complete"
        );
        Ok(&self.snapshot)
    }

    fn advance(&mut self, dt_s: f64, diag: &mut Diagnostics) {
        // The core is updated last; everything before it sees last tick's core.
        let core_prev = self.core.state;

        self.primary_loop
            .update(core_prev.temperature, core_prev.pressure, dt_s, diag);
        self.secondary_loop
            .update(self.primary_loop.state.coolant_temperature, dt_s, diag);
        self.power.update(
            core_prev.temperature,
            core_prev.pressure,
            core_prev.reactivity,
            self.primary_loop.state.coolant_flow,
            diag,
        );

        let inputs = CoreInputs {
            absorption_rate: self.control_rods.state.neutron_absorption_rate,
            loop_temperature: self.primary_loop.state.coolant_temperature,
            loop_flow: self.primary_loop.state.coolant_flow,
            loop_efficiency: self.primary_loop.state.heat_transfer_efficiency,
            thermal_power: self.power.state.thermal_power,
            electrical_power: self.power.state.electrical_power_output,
        };
        self.core.update(&inputs, &mut self.pressuriser, dt_s, diag);
    }

    /// Route an operator command to the subsystem that owns the setpoint.
    /// Rod movements are applied at the start of the next tick.
    pub fn apply(&mut self, command: OperatorCommand) {
        tracing::debug!(?command, "operator command");
        match command {
            OperatorCommand::AdjustRods { delta } => {
                if self.safety.scram {
                    tracing::warn!(delta, "rod adjustment ignored while SCRAM is latched");
                } else if delta.is_finite() {
                    self.pending_rod_delta += delta;
                } else {
                    tracing::warn!(delta, "ignoring non-finite rod adjustment");
                }
            }
            OperatorCommand::SetHeater { on } => self.pressuriser.set_heater(on),
            OperatorCommand::TriggerReliefValve => self.pressuriser.trigger_relief_valve(),
            OperatorCommand::TriggerSpray => self.pressuriser.trigger_spray(),
            OperatorCommand::SetPrimaryFlow { flow } => {
                self.primary_loop.adjust_flow(flow, &mut self.command_diag)
            }
            OperatorCommand::SetSecondaryFlow { flow } => {
                self.secondary_loop.adjust_flow(flow, &mut self.command_diag)
            }
            OperatorCommand::Scram => safety::trip(&mut self.safety, TripReason::Manual),
            OperatorCommand::ResetScram => safety::reset(&mut self.safety),
        }
    }

    pub fn snapshot(&self) -> &PlantSnapshot {
        &self.snapshot
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn is_scrammed(&self) -> bool {
        self.safety.scram
    }

    fn publish(&mut self, status: PlantStatus, violations: Vec<RangeViolation>) {
        self.snapshot = PlantSnapshot {
            scenario: self.scenario.clone(),
            tick: self.tick,
            elapsed_s: self.elapsed_s,
            core: self.core.state,
            indicators: self.core.indicators,
            control_rods: self.control_rods.state,
            pressuriser: self.pressuriser.state,
            primary_loop: self.primary_loop.state,
            secondary_loop: self.secondary_loop.state,
            power: self.power.state,
            status,
            safety: self.safety.clone(),
            violations,
        };
    }
}

fn safety_readings(
    core: &Core,
    primary_loop: &PrimaryCoolingLoop,
    secondary_loop: &SecondaryCoolingLoop,
) -> SafetyReadings {
    SafetyReadings {
        danger: core.indicators.danger_reason,
        critical_overheating: core.indicators.critical_overheating,
        integrity_pct: core.state.integrity,
        loop_warning: primary_loop.state.flags.any() || secondary_loop.state.flags.any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ReactorModel {
        ReactorModel::new(&ScenarioParameters::nominal(), SimConfig::default()).unwrap()
    }

    #[test]
    fn negative_time_step_is_rejected() {
        let mut m = model();
        assert!(matches!(m.tick(-1.0), Err(SimError::InvalidTimeStep { .. })));
        assert!(matches!(m.tick(f64::NAN), Err(SimError::InvalidTimeStep { .. })));
        assert_eq!(m.tick_count(), 0);
    }

    #[test]
    fn zero_length_tick_publishes_an_unchanged_plant() {
        let mut m = model();
        let before = m.tick(1.0).unwrap().clone();
        let after = m.tick(0.0).unwrap().clone();
        assert_eq!(after.tick, before.tick + 1);
        assert_eq!(
            PlantSnapshot {
                tick: before.tick,
                ..after
            },
            before
        );
    }

    #[test]
    fn initial_snapshot_reports_clamped_scenario_values() {
        let mut s = ScenarioParameters::nominal();
        s.core.temperature = 900.0;
        s.core.integrity = 250.0;
        let m = ReactorModel::new(&s, SimConfig::default()).unwrap();

        let snap = m.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.core.temperature, 500.0);
        assert_eq!(snap.core.integrity, 100.0);
        assert_eq!(snap.violations.len(), 2);
        assert!(snap.indicators.overheating);
        assert!(snap.indicators.danger);
        assert_eq!(snap.status, PlantStatus::Danger);
    }

    #[test]
    fn rod_command_applies_on_next_tick() {
        let mut m = model();
        m.apply(OperatorCommand::AdjustRods { delta: 20.0 });
        assert_eq!(m.snapshot().control_rods.insertion_level, 50.0);
        let snap = m.tick(1.0).unwrap();
        assert_eq!(snap.control_rods.insertion_level, 70.0);
        assert!((snap.control_rods.neutron_absorption_rate - 49.0).abs() < 1e-9);
    }

    #[test]
    fn flow_command_violation_lands_in_next_snapshot() {
        let mut m = model();
        m.apply(OperatorCommand::SetPrimaryFlow { flow: -10.0 });
        let snap = m.tick(1.0).unwrap();
        assert!(snap
            .violations
            .iter()
            .any(|v| v.subsystem == "primary_loop" && v.quantity == "coolant_flow"));
        assert_eq!(snap.primary_loop.coolant_flow, 0.0);
        assert!(snap.primary_loop.flags.low_flow);
    }

    #[test]
    fn manual_scram_drives_rods_in_until_reset() {
        let mut m = model();
        m.apply(OperatorCommand::Scram);
        let snap = m.tick(1.0).unwrap();
        assert_eq!(snap.control_rods.insertion_level, 100.0);
        assert_eq!(snap.core.reactivity, 0.0);
        assert_eq!(snap.status, PlantStatus::Scrammed);

        m.apply(OperatorCommand::AdjustRods { delta: -40.0 });
        assert_eq!(m.tick(1.0).unwrap().control_rods.insertion_level, 100.0);

        m.apply(OperatorCommand::ResetScram);
        m.apply(OperatorCommand::AdjustRods { delta: -40.0 });
        let snap = m.tick(1.0).unwrap();
        assert_eq!(snap.control_rods.insertion_level, 60.0);
        assert!(!snap.safety.scram);
    }

    #[test]
    fn broken_scenario_fails_construction() {
        let mut s = ScenarioParameters::nominal();
        s.primary_loop.coolant_flow = f64::INFINITY;
        let err = ReactorModel::new(&s, SimConfig::default()).err().unwrap();
        assert!(matches!(
            err,
            SimError::Subsystem {
                subsystem: "PrimaryCoolingLoop",
                field: "coolant_flow",
                ..
            }
        ));
    }
}
