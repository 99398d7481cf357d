use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TripReason {
    ReactivityExcursion,
    Overheat,
    Overpressure,
    IntegrityLoss,
    Manual,
}

/// Danger flag that may be raised any number of times during a tick but is
/// only cleared by `begin_tick`. The first reason raised wins.
#[derive(Clone, Debug, Default)]
pub struct TickLatch {
    reason: Option<TripReason>,
}

impl TickLatch {
    pub fn begin_tick(&mut self) {
        self.reason = None;
    }

    pub fn raise(&mut self, reason: TripReason) {
        if self.reason.is_none() {
            self.reason = Some(reason);
        }
    }

    pub fn is_raised(&self) -> bool {
        self.reason.is_some()
    }

    pub fn reason(&self) -> Option<TripReason> {
        self.reason
    }
}

#[derive(Clone, Copy, Debug, serde::Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Trip automatically on critical overheating or integrity loss.
    pub auto_scram: bool,
    pub scram_integrity_pct: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            auto_scram: false,
            scram_integrity_pct: 20.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SafetyState {
    pub scram: bool,
    pub reason: Option<TripReason>,
}

/// What the safety logic needs to know about the plant after a tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct SafetyReadings {
    pub danger: Option<TripReason>,
    pub critical_overheating: bool,
    pub integrity_pct: f64,
    /// Any low-flow / high-temperature / low-pressure loop flag.
    pub loop_warning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantStatus {
    Normal,
    Warning,
    Danger,
    Scrammed,
}

/// Evaluate the automatic trip conditions. Once SCRAM is asserted, it
/// remains latched until `reset`.
pub fn evaluate(cfg: &SafetyConfig, state: &mut SafetyState, readings: &SafetyReadings) {
    if state.scram || !cfg.auto_scram {
        return;
    }

    if readings.critical_overheating {
        trip(state, TripReason::Overheat);
    } else if readings.integrity_pct < cfg.scram_integrity_pct {
        trip(state, TripReason::IntegrityLoss);
    }
}

pub fn trip(state: &mut SafetyState, reason: TripReason) {
    if state.scram {
        return;
    }
    state.scram = true;
    state.reason = Some(reason);
    tracing::warn!(?reason, "SCRAM asserted");
}

pub fn reset(state: &mut SafetyState) {
    if state.scram {
        tracing::info!(reason = ?state.reason, "SCRAM reset");
    }
    state.scram = false;
    state.reason = None;
}

pub fn classify(state: &SafetyState, readings: &SafetyReadings) -> PlantStatus {
    if state.scram {
        PlantStatus::Scrammed
    } else if readings.danger.is_some() {
        PlantStatus::Danger
    } else if readings.loop_warning {
        PlantStatus::Warning
    } else {
        PlantStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_keeps_first_reason_until_next_tick() {
        let mut latch = TickLatch::default();
        latch.begin_tick();
        latch.raise(TripReason::Overheat);
        latch.raise(TripReason::Overpressure);
        assert_eq!(latch.reason(), Some(TripReason::Overheat));

        latch.begin_tick();
        assert!(!latch.is_raised());
    }

    #[test]
    fn auto_scram_latches() {
        let cfg = SafetyConfig {
            auto_scram: true,
            ..Default::default()
        };
        let mut state = SafetyState::default();
        let hot = SafetyReadings {
            critical_overheating: true,
            integrity_pct: 90.0,
            ..Default::default()
        };
        evaluate(&cfg, &mut state, &hot);
        assert!(state.scram);

        let calm = SafetyReadings {
            integrity_pct: 90.0,
            ..Default::default()
        };
        evaluate(&cfg, &mut state, &calm);
        assert!(state.scram);
        assert_eq!(state.reason, Some(TripReason::Overheat));
        assert_eq!(classify(&state, &calm), PlantStatus::Scrammed);

        reset(&mut state);
        assert_eq!(classify(&state, &calm), PlantStatus::Normal);
    }

    #[test]
    fn disabled_auto_scram_never_trips() {
        let mut state = SafetyState::default();
        let readings = SafetyReadings {
            critical_overheating: true,
            integrity_pct: 0.0,
            ..Default::default()
        };
        evaluate(&SafetyConfig::default(), &mut state, &readings);
        assert!(!state.scram);
        assert_eq!(
            classify(
                &state,
                &SafetyReadings {
                    danger: Some(TripReason::Overheat),
                    ..readings
                }
            ),
            PlantStatus::Danger
        );
    }
}
