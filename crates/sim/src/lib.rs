//! Pressurised-water reactor plant model.
//!
//! Six coupled subsystems advanced once per tick by [`ReactorModel`]:
//! control rods, primary loop, secondary loop, power generation and the
//! core, which advances the pressuriser during its pressure stage.

pub mod config;
pub mod control_rods;
pub mod core;
pub mod error;
pub mod model;
pub mod power;
pub mod pressuriser;
pub mod primary_loop;
pub mod range;
pub mod scenario;
pub mod secondary_loop;
pub mod snapshot;
pub mod tick_log;

pub use config::{CoreConfig, PowerConfig, PressuriserConfig, PrimaryLoopConfig, SecondaryLoopConfig, SimConfig};
pub use control_rods::{ControlRods, ControlRodsState};
pub use crate::core::{Core, CoreIndicators, CoreInputs, CoreState};
pub use error::{SimError, SimResult};
pub use model::ReactorModel;
pub use power::{PowerGeneration, PowerState};
pub use pressuriser::{Pressuriser, PressuriserState};
pub use primary_loop::{LoopFlags, PrimaryCoolingLoop, PrimaryLoopState};
pub use range::{Band, Diagnostics, RangeViolation};
pub use scenario::{
    ControlRodsParams, CoreParams, PowerGenerationParams, PressuriserParams, PrimaryLoopParams, ScenarioParameters,
    SecondaryLoopParams,
};
pub use secondary_loop::{SecondaryCoolingLoop, SecondaryLoopState};
pub use snapshot::PlantSnapshot;
pub use tick_log::TickLog;
