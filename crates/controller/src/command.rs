use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operator actions routed by the reactor model to the owning subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OperatorCommand {
    /// Signed change of the control rod insertion level, in percent.
    AdjustRods { delta: f64 },
    SetHeater { on: bool },
    TriggerReliefValve,
    TriggerSpray,
    SetPrimaryFlow { flow: f64 },
    SetSecondaryFlow { flow: f64 },
    Scram,
    ResetScram,
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Invalid command script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Command script is not ordered by tick (tick {tick} follows {previous})")]
    Unordered { tick: u64, previous: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub tick: u64,
    #[serde(flatten)]
    pub command: OperatorCommand,
}

/// Operator commands to replay, each applied before the given tick runs.
#[derive(Clone, Debug, Default)]
pub struct CommandScript {
    entries: Vec<ScheduledCommand>,
    cursor: usize,
}

impl CommandScript {
    pub fn new(entries: Vec<ScheduledCommand>) -> Result<Self, ControlError> {
        for pair in entries.windows(2) {
            if pair[1].tick < pair[0].tick {
                return Err(ControlError::Unordered {
                    tick: pair[1].tick,
                    previous: pair[0].tick,
                });
            }
        }
        Ok(Self { entries, cursor: 0 })
    }

    pub fn from_json_str(s: &str) -> Result<Self, ControlError> {
        let entries: Vec<ScheduledCommand> = serde_json::from_str(s)?;
        Self::new(entries)
    }

    /// Commands scheduled at or before `tick` that have not been handed out yet.
    pub fn due(&mut self, tick: u64) -> Vec<OperatorCommand> {
        let start = self.cursor;
        while self.cursor < self.entries.len() && self.entries[self.cursor].tick <= tick {
            self.cursor += 1;
        }
        self.entries[start..self.cursor]
            .iter()
            .map(|e| e.command)
            .collect()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_commands() {
        let script = r#"[
            {"tick": 1, "command": "adjust_rods", "delta": -10.0},
            {"tick": 1, "command": "set_heater", "on": true},
            {"tick": 4, "command": "scram"}
        ]"#;
        let mut s = CommandScript::from_json_str(script).unwrap();

        assert!(s.due(0).is_empty());
        assert_eq!(
            s.due(1),
            vec![
                OperatorCommand::AdjustRods { delta: -10.0 },
                OperatorCommand::SetHeater { on: true },
            ]
        );
        assert!(s.due(3).is_empty());
        assert_eq!(s.due(10), vec![OperatorCommand::Scram]);
        assert!(s.is_exhausted());
    }

    #[test]
    fn rejects_unordered_script() {
        let script = r#"[
            {"tick": 5, "command": "trigger_spray"},
            {"tick": 2, "command": "trigger_relief_valve"}
        ]"#;
        let err = CommandScript::from_json_str(script).unwrap_err();
        assert!(matches!(err, ControlError::Unordered { tick: 2, previous: 5 }));
    }

    #[test]
    fn rejects_unknown_command() {
        let script = r#"[{"tick": 0, "command": "melt_down"}]"#;
        assert!(matches!(
            CommandScript::from_json_str(script),
            Err(ControlError::Parse(_))
        ));
    }
}
