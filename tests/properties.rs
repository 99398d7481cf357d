//! Property-based checks over random time steps and operator input.

use proptest::prelude::*;
use pwr_plant_sim as pps;

fn within(value: f64, lo: f64, hi: f64) -> bool {
    value.is_finite() && value >= lo && value <= hi
}

fn check_bands(s: &pps::PlantSnapshot) -> Result<(), TestCaseError> {
    prop_assert!(within(s.core.temperature, 15.0, 500.0), "core temperature {}", s.core.temperature);
    prop_assert!(within(s.core.pressure, 1.0, 180.0), "core pressure {}", s.core.pressure);
    prop_assert!(within(s.core.reactivity, 0.0, 100.0), "reactivity {}", s.core.reactivity);
    prop_assert!(within(s.core.neutron_flux, 0.0, f64::MAX), "flux {}", s.core.neutron_flux);
    prop_assert!(within(s.core.integrity, 0.0, 100.0));
    prop_assert!(within(s.core.fuel_integrity, 0.0, 100.0));

    prop_assert!(within(s.control_rods.insertion_level, 0.0, 100.0));
    prop_assert!(within(s.control_rods.neutron_absorption_rate, 0.0, 100.0));

    prop_assert!(within(s.pressuriser.temperature, 15.0, 450.0));
    prop_assert!(within(s.pressuriser.pressure, 0.0, 180.0));
    prop_assert!(within(s.pressuriser.water_level, 0.0, 100.0));

    prop_assert!(within(s.primary_loop.coolant_temperature, 15.0, 500.0));
    prop_assert!(within(s.primary_loop.coolant_pressure, 0.0, 175.0));
    prop_assert!(within(s.primary_loop.coolant_flow, 0.0, 500.0));
    prop_assert!(within(s.primary_loop.heat_transfer_efficiency, 0.0, 100.0));

    prop_assert!(within(s.secondary_loop.steam_temperature, 100.0, 400.0));
    prop_assert!(within(s.secondary_loop.steam_pressure, 5.0, 60.0));
    prop_assert!(within(s.secondary_loop.steam_flow, 0.0, 500.0));

    prop_assert!(within(s.power.thermal_power, 0.0, 4000.0));
    prop_assert!(within(s.power.electrical_power_output, 0.0, 1000.0));
    Ok(())
}

fn command() -> impl Strategy<Value = pps::OperatorCommand> {
    prop_oneof![
        (-150.0f64..150.0).prop_map(|delta| pps::OperatorCommand::AdjustRods { delta }),
        any::<bool>().prop_map(|on| pps::OperatorCommand::SetHeater { on }),
        Just(pps::OperatorCommand::TriggerReliefValve),
        Just(pps::OperatorCommand::TriggerSpray),
        (-100.0f64..800.0).prop_map(|flow| pps::OperatorCommand::SetPrimaryFlow { flow }),
        (-100.0f64..800.0).prop_map(|flow| pps::OperatorCommand::SetSecondaryFlow { flow }),
        Just(pps::OperatorCommand::Scram),
        Just(pps::OperatorCommand::ResetScram),
    ]
}

fn scenario() -> impl Strategy<Value = pps::ScenarioParameters> {
    (0usize..3).prop_map(|i| {
        let file = ["nominal.json", "power_surge.json", "free_mode.json"][i];
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file);
        pps::ScenarioParameters::load(&path).unwrap()
    })
}

proptest! {
    /// Every state variable stays inside its band after every tick.
    #[test]
    fn state_stays_in_bands(
        scenario in scenario(),
        steps in prop::collection::vec((0.0f64..5.0, prop::option::of(command())), 1..60),
        auto_scram in any::<bool>(),
    ) {
        let mut cfg = pps::SimConfig::default();
        cfg.safety.auto_scram = auto_scram;
        let mut model = pps::ReactorModel::new(&scenario, cfg).unwrap();

        for (dt, cmd) in steps {
            if let Some(cmd) = cmd {
                model.apply(cmd);
            }
            let snap = model.tick(dt).unwrap();
            check_bands(snap)?;
        }
    }

    /// A latched SCRAM holds the rods fully inserted until reset.
    #[test]
    fn scram_holds_rods_in(
        deltas in prop::collection::vec(-100.0f64..100.0, 1..20),
    ) {
        let mut model = pps::ReactorModel::new(
            &pps::ScenarioParameters::nominal(),
            pps::SimConfig::default(),
        ).unwrap();
        model.apply(pps::OperatorCommand::Scram);

        for delta in deltas {
            model.apply(pps::OperatorCommand::AdjustRods { delta });
            let snap = model.tick(1.0).unwrap();
            prop_assert_eq!(snap.control_rods.insertion_level, 100.0);
            prop_assert_eq!(snap.status, pps::PlantStatus::Scrammed);
        }
    }
}
