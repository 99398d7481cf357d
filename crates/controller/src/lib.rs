//! Operator input: the command vocabulary, scripted playback and an
//! automatic rod controller.

mod command;

pub use command::{CommandScript, ControlError, OperatorCommand, ScheduledCommand};

/// Gains for [`RodController`].
#[derive(Clone, Copy, Debug)]
pub struct RodControllerConfig {
    /// Rod percent per °C of temperature error.
    pub kp: f64,
    /// Rod percent per °C·s of accumulated error.
    pub ki: f64,
    /// Largest rod movement, in percent, issued for one tick.
    pub max_step: f64,
}

impl Default for RodControllerConfig {
    fn default() -> Self {
        Self {
            kp: 0.2,
            ki: 0.01,
            max_step: 5.0,
        }
    }
}

/// Holds the core temperature at a setpoint by nudging the control rods.
///
/// Proportional-integral on the temperature excess: a core hotter than the
/// setpoint gets a positive insertion delta. The integral only accumulates
/// while the step is not saturated.
#[derive(Clone, Debug)]
pub struct RodController {
    pub setpoint_c: f64,
    cfg: RodControllerConfig,
    integral: f64,
}

impl RodController {
    pub fn new(setpoint_c: f64, cfg: RodControllerConfig) -> Self {
        Self {
            setpoint_c,
            cfg,
            integral: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
    }

    /// Rod adjustment for the coming tick.
    pub fn command(&mut self, core_temperature_c: f64, dt_s: f64) -> OperatorCommand {
        let c = &self.cfg;
        let excess = core_temperature_c - self.setpoint_c;

        let integral = self.integral + excess * dt_s;
        let raw = c.kp * excess + c.ki * integral;
        let delta = raw.clamp(-c.max_step, c.max_step);
        if delta == raw {
            self.integral = integral;
        }
        OperatorCommand::AdjustRods { delta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(cmd: OperatorCommand) -> f64 {
        match cmd {
            OperatorCommand::AdjustRods { delta } => delta,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn step_is_limited() {
        let mut rc = RodController::new(300.0, RodControllerConfig::default());
        assert_eq!(delta(rc.command(1000.0, 1.0)), 5.0);
        assert_eq!(delta(rc.command(0.0, 1.0)), -5.0);
    }

    #[test]
    fn hot_core_inserts_rods() {
        let mut rc = RodController::new(320.0, RodControllerConfig::default());
        // 0.2 * 10 + 0.01 * 10
        assert!((delta(rc.command(330.0, 1.0)) - 2.1).abs() < 1e-12);
    }

    #[test]
    fn cold_core_withdraws_rods() {
        let mut rc = RodController::new(320.0, RodControllerConfig::default());
        assert!(delta(rc.command(300.0, 1.0)) < 0.0);
    }

    #[test]
    fn saturation_does_not_wind_up() {
        let mut rc = RodController::new(320.0, RodControllerConfig::default());
        for _ in 0..100 {
            rc.command(500.0, 1.0);
        }
        // Back at the setpoint the integral holds nothing from the saturated run.
        assert_eq!(delta(rc.command(320.0, 1.0)), 0.0);
    }
}
