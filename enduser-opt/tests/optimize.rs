mod common;

use common::example_enduser;
use enduser_model::{Horizon, SolveStatus};
use enduser_opt::{OptimizeError, optimize};

const TOL: f64 = 1e-6;

#[test]
fn test_unsolvable() {
    let mut enduser = example_enduser();
    enduser.grid.power_import_max = enduser.horizon.ones();
    optimize(&mut enduser).unwrap();
    assert_ne!(enduser.status, SolveStatus::Optimal);
}

#[test]
fn test_results_are_nan_after_infeasible_solve() {
    let mut enduser = example_enduser();
    enduser.grid.power_import_max = enduser.horizon.ones();
    optimize(&mut enduser).unwrap();

    assert_ne!(enduser.status, SolveStatus::Optimal);
    assert!(enduser.loss.is_none());
    assert!(enduser.include_results);
    // result arrays are written unconditionally, as NaN sentinels
    for consumer in &enduser.consumers {
        assert_eq!(consumer.power_actual.len(), enduser.horizon.steps);
        assert!(consumer.power_actual.iter().all(|v| v.is_nan()));
    }
    for storage in &enduser.storages {
        assert!(storage.energy.iter().all(|v| v.is_nan()));
    }
    assert!(enduser.grid.power_import.iter().all(|v| v.is_nan()));
}

#[test]
fn test_unflexible() {
    let mut enduser = example_enduser();
    enduser.flexibility = false;
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);

    for consumer in &enduser.consumers {
        assert!(consumer.energy_deficit.iter().all(|v| v.abs() < TOL));
    }
    for storage in &enduser.storages {
        assert!(storage.power_charging.iter().all(|v| v.abs() < TOL));
        assert!(storage.power_discharging.iter().all(|v| v.abs() < TOL));
    }
    // without thermal capacitance the tanks pass heat straight through,
    // minus standing losses
    for heatnode in &enduser.heatnodes {
        for heatstorage in &heatnode.heatstorages {
            for k in 0..enduser.horizon.steps {
                let balance = heatstorage.energy_in[k]
                    - heatstorage.energy_out[k]
                    - heatstorage.loss_factor * heatstorage.temperature[k];
                assert!(balance.abs() < TOL, "step {k}: residual {balance}");
            }
        }
    }
}

#[test]
fn test_flex_relax() {
    let mut enduser = example_enduser();
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);
    let flex_loss = enduser.loss.unwrap();

    enduser.flexibility = false;
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);
    let unflex_loss = enduser.loss.unwrap();

    assert!(
        unflex_loss > flex_loss,
        "rigid loss {unflex_loss} should exceed flexible loss {flex_loss}"
    );
}

#[test]
fn test_mutualimportexport() {
    let mut enduser = example_enduser();
    enduser.grid.import_tariff = enduser.horizon.zeros();
    enduser.grid.export_tariff = enduser.horizon.filled(100.0);
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);

    let dot: f64 = enduser
        .grid
        .power_import
        .iter()
        .zip(&enduser.grid.power_export)
        .map(|(i, e)| i * e)
        .sum();
    assert!(dot.abs() < 1e-3, "import/export overlap: {dot}");
}

#[test]
fn test_constant_pricing() {
    for loss_f in ["minimize_cost", "minimize_grid_supply"] {
        for factor in [0.01, 0.1, 1.0, 10.0, 100.0, 1000.0] {
            for (import_tariff, export_tariff) in [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]
            {
                let mut enduser = example_enduser();
                enduser.grid.import_tariff = enduser.horizon.filled(factor * import_tariff);
                enduser.grid.export_tariff = enduser.horizon.filled(factor * export_tariff);
                enduser.grid.loss_f = loss_f.to_string();
                optimize(&mut enduser).unwrap();
                assert_eq!(
                    enduser.status,
                    SolveStatus::Optimal,
                    "loss {loss_f}, factor {factor}, tariffs ({import_tariff}, {export_tariff})"
                );
            }
        }
    }
}

#[test]
fn test_power_balance() {
    let mut enduser = example_enduser();
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);

    for k in 0..enduser.horizon.steps {
        let mut rhs = 0.0;
        for consumer in &enduser.consumers {
            rhs += consumer.power_actual[k];
        }
        for heatnode in &enduser.heatnodes {
            for heatproducer in &heatnode.heatproducers {
                rhs += heatproducer.power[k];
            }
        }
        for storage in &enduser.storages {
            rhs += storage.power_charging[k] - storage.power_discharging[k];
        }
        for producer in &enduser.producers {
            rhs -= producer.power_actual[k] * (1.0 - producer.curtailment_factor[k]);
        }
        let lhs = enduser.grid.power_import[k] - enduser.grid.power_export[k];
        assert!((lhs - rhs).abs() < 1e-4, "step {k}: {lhs} != {rhs}");
    }
}

#[test]
fn test_terminal_state_of_charge() {
    let mut enduser = example_enduser();
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);

    let last = enduser.horizon.steps - 1;
    for storage in &enduser.storages {
        assert!(storage.available[last]);
        let target = storage.energy_capacity * storage.state_of_charge_final[last];
        assert!(
            (storage.energy[last] - target).abs() < 1e-4,
            "terminal energy {} != {target}",
            storage.energy[last]
        );
        // unavailable steps carry no energy at all
        for k in 0..enduser.horizon.steps {
            if !storage.available[k] {
                assert!(storage.energy[k].abs() < TOL);
            }
        }
    }
}

#[test]
fn test_heatproducer_startup_semantics() {
    let mut enduser = example_enduser();
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);

    for heatnode in &enduser.heatnodes {
        for heatproducer in &heatnode.heatproducers {
            for k in 0..enduser.horizon.steps {
                let running = heatproducer.running[k] > 0.5;
                let starting = heatproducer.starting[k] > 0.5;
                let was_running = k > 0 && heatproducer.running[k - 1] > 0.5;
                assert_eq!(
                    starting,
                    running && !was_running,
                    "step {k}: running {running}, was running {was_running}, starting {starting}"
                );
            }
        }
    }
}

#[test]
fn test_discharge_export_exclusive() {
    let mut enduser = example_enduser();
    // reward exporting so the surplus actually leaves the system
    enduser.grid.import_tariff = enduser.horizon.zeros();
    enduser.grid.export_tariff = enduser.horizon.filled(100.0);
    assert!(!enduser.grid.discharge_to_grid);
    optimize(&mut enduser).unwrap();
    assert_eq!(enduser.status, SolveStatus::Optimal);

    for k in 0..enduser.horizon.steps {
        if enduser.grid.power_export[k] > 1e-3 {
            let discharging: f64 = enduser
                .storages
                .iter()
                .map(|storage| storage.power_discharging[k])
                .sum();
            assert!(
                discharging < 1e-3,
                "step {k}: exporting {} while discharging {discharging}",
                enduser.grid.power_export[k]
            );
        }
    }
}

#[test]
fn test_unknown_objective_is_rejected() {
    let mut enduser = example_enduser();
    enduser.grid.loss_f = "maximize_chaos".to_string();
    match optimize(&mut enduser) {
        Err(OptimizeError::UnknownObjective(name)) => assert_eq!(name, "maximize_chaos"),
        other => panic!("expected UnknownObjective, got {other:?}"),
    }
    // nothing was solved
    assert_eq!(enduser.status, SolveStatus::NotSolved);
    assert!(enduser.consumers[0].power_actual.is_empty());
}

#[test]
fn test_shape_mismatch_is_rejected_before_solving() {
    let mut enduser = example_enduser();
    let shorter = Horizon::new(enduser.horizon.steps - 1, enduser.horizon.delta_t).unwrap();
    enduser.grid.import_tariff = shorter.zeros();
    assert!(matches!(
        optimize(&mut enduser),
        Err(OptimizeError::InvalidShape { .. })
    ));
}
