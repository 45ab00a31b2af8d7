//! MILP kernel: translates an [`EndUser`] graph into a mixed-integer linear
//! program, solves it, and writes the solution back onto the assets.

use enduser_model::{EndUser, SolveStatus};
use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    constraint, variable,
};
use tracing::{info, warn};

use crate::error::OptimizeError;
use crate::objective;
use crate::validate::validate;

struct ConsumerVars {
    power_actual: Vec<Variable>,
    energy_deficit: Vec<Variable>,
}

struct StorageVars {
    energy: Vec<Variable>,
    power_charging: Vec<Variable>,
    power_discharging: Vec<Variable>,
}

struct ProducerVars {
    curtailment_factor: Vec<Variable>,
}

struct HeatProducerVars {
    power: Vec<Variable>,
    running: Vec<Variable>,
    starting: Vec<Variable>,
}

struct HeatStorageVars {
    temperature: Vec<Variable>,
    energy_in: Vec<Variable>,
    energy_out: Vec<Variable>,
}

struct HeatNodeVars {
    producers: Vec<HeatProducerVars>,
    storages: Vec<HeatStorageVars>,
}

struct GridVars {
    power_import: Vec<Variable>,
    power_export: Vec<Variable>,
    exporting: Vec<Variable>,
}

struct ModelVars {
    consumers: Vec<ConsumerVars>,
    storages: Vec<StorageVars>,
    producers: Vec<ProducerVars>,
    heatnodes: Vec<HeatNodeVars>,
    grid: GridVars,
}

/// Optimizes the electricity import/export of the end user with respect to
/// the loss function selected by its grid, using the flexible assets of the
/// graph.
///
/// The call is synchronous and deterministic for identical inputs. Result
/// arrays are written unconditionally: after an infeasible or unbounded
/// solve every result array holds NaN in all entries, `loss` is `None`, and
/// the outcome is recorded in `status`. Validation failures and solver
/// breakdowns return an error before any result is written.
pub fn optimize(enduser: &mut EndUser) -> Result<(), OptimizeError> {
    validate(enduser)?;
    let loss = objective::lookup(&enduser.grid.loss_f)?;

    let steps = enduser.horizon.steps;
    let delta_t = enduser.horizon.delta_t;
    let flex = if enduser.flexibility { 1.0 } else { 0.0 };

    let mut vars = ProblemVariables::new();

    let consumer_vars: Vec<ConsumerVars> = enduser
        .consumers
        .iter()
        .map(|consumer| ConsumerVars {
            power_actual: (0..steps)
                .map(|k| {
                    let cap = if consumer.available[k] { consumer.power_max } else { 0.0 };
                    vars.add(variable().min(consumer.power_min).max(cap))
                })
                .collect(),
            energy_deficit: (0..steps)
                .map(|k| vars.add(variable().min(0.0).max(consumer.energy_deficit_max[k] * flex)))
                .collect(),
        })
        .collect();

    let storage_vars: Vec<StorageVars> = enduser
        .storages
        .iter()
        .map(|storage| StorageVars {
            energy: (0..steps)
                .map(|k| {
                    let avail = if storage.available[k] { 1.0 } else { 0.0 };
                    vars.add(
                        variable()
                            .min(avail * storage.energy_capacity * storage.state_of_charge_min)
                            .max(avail * storage.energy_capacity * storage.state_of_charge_max),
                    )
                })
                .collect(),
            power_charging: (0..steps)
                .map(|k| {
                    let avail = if storage.available[k] { 1.0 } else { 0.0 };
                    vars.add(variable().min(0.0).max(avail * storage.power_charge_max * flex))
                })
                .collect(),
            power_discharging: (0..steps)
                .map(|k| {
                    let avail = if storage.available[k] { 1.0 } else { 0.0 };
                    vars.add(variable().min(0.0).max(avail * storage.power_discharge_max * flex))
                })
                .collect(),
        })
        .collect();

    let producer_vars: Vec<ProducerVars> = enduser
        .producers
        .iter()
        .map(|producer| ProducerVars {
            curtailment_factor: (0..steps)
                .map(|_| vars.add(variable().min(0.0).max(producer.curtailment_factor_max)))
                .collect(),
        })
        .collect();

    let heatnode_vars: Vec<HeatNodeVars> = enduser
        .heatnodes
        .iter()
        .map(|heatnode| HeatNodeVars {
            producers: heatnode
                .heatproducers
                .iter()
                .map(|_| HeatProducerVars {
                    power: (0..steps).map(|_| vars.add(variable().min(0.0))).collect(),
                    running: (0..steps).map(|_| vars.add(variable().binary())).collect(),
                    starting: (0..steps).map(|_| vars.add(variable().binary())).collect(),
                })
                .collect(),
            storages: heatnode
                .heatstorages
                .iter()
                .map(|heatstorage| HeatStorageVars {
                    temperature: (0..steps)
                        .map(|_| {
                            vars.add(
                                variable()
                                    .min(heatstorage.temperature_min)
                                    .max(heatstorage.temperature_max),
                            )
                        })
                        .collect(),
                    energy_in: (0..steps).map(|_| vars.add(variable())).collect(),
                    energy_out: (0..steps).map(|_| vars.add(variable())).collect(),
                })
                .collect(),
        })
        .collect();

    let grid_vars = GridVars {
        power_import: (0..steps)
            .map(|k| vars.add(variable().min(0.0).max(enduser.grid.power_import_max[k])))
            .collect(),
        power_export: (0..steps)
            .map(|k| vars.add(variable().min(0.0).max(enduser.grid.power_export_max[k])))
            .collect(),
        exporting: (0..steps).map(|_| vars.add(variable().binary())).collect(),
    };

    let mut constraints: Vec<Constraint> = Vec::new();

    // Consumers: cumulative under-delivery in kWh, anchored at the window
    // start, recurrence for k >= 1.
    for (consumer, cv) in enduser.consumers.iter().zip(&consumer_vars) {
        constraints.push(constraint!(
            cv.energy_deficit[0] + (cv.power_actual[0] - consumer.power_desired[0]) * delta_t
                == 0.0
        ));
        for k in 1..steps {
            constraints.push(constraint!(
                cv.energy_deficit[k] - cv.energy_deficit[k - 1]
                    + (cv.power_actual[k] - consumer.power_desired[k]) * delta_t
                    == 0.0
            ));
        }
    }

    // Storages: energy dynamics on connected steps only. Unavailable steps
    // are pinned to zero through the variable bounds.
    for (storage, sv) in enduser.storages.iter().zip(&storage_vars) {
        let connect = storage.connect_events();
        let disconnect = storage.disconnect_events();
        for k in 0..steps {
            if !storage.available[k] {
                continue;
            }
            let flow = (storage.efficiency_charging * sv.power_charging[k]
                - sv.power_discharging[k] / storage.efficiency_discharging)
                * delta_t;
            if connect[k] {
                // just connected (or start of window): seed from the given SoC
                constraints.push(constraint!(
                    sv.energy[k]
                        == flow + storage.energy_capacity * storage.state_of_charge_initial[k]
                ));
            } else {
                constraints.push(constraint!(sv.energy[k] == sv.energy[k - 1] + flow));
            }
            // a disconnect step is itself unavailable, so the pin lands on
            // the last step of the window
            if disconnect[k] || k == steps - 1 {
                constraints.push(constraint!(
                    sv.energy[k] == storage.energy_capacity * storage.state_of_charge_final[k]
                ));
            }
        }
    }

    // Heat producers: running/starting logic and power envelope.
    for (heatnode, nv) in enduser.heatnodes.iter().zip(&heatnode_vars) {
        for (heatproducer, pv) in heatnode.heatproducers.iter().zip(&nv.producers) {
            let power_max = heatproducer.power_max;
            for k in 0..steps {
                constraints.push(constraint!(
                    pv.power[k]
                        <= (pv.running[k] + heatproducer.power_loss_startup * pv.starting[k])
                            * power_max
                ));
                constraints.push(constraint!(
                    pv.power[k] >= heatproducer.minimum_power_factor * power_max * pv.running[k]
                ));
                constraints.push(constraint!(
                    pv.power[k] >= heatproducer.power_loss_startup * power_max * pv.starting[k]
                ));
            }
            constraints.push(constraint!(pv.starting[0] == pv.running[0]));
            for k in 1..steps {
                constraints.push(constraint!(pv.starting[k] <= pv.running[k]));
                constraints.push(constraint!(pv.starting[k] + pv.running[k - 1] <= 1.0));
                constraints.push(constraint!(
                    pv.starting[k] >= pv.running[k] - pv.running[k - 1]
                ));
            }
        }

        // Node coupling: tank inflow equals producer heat net of startup
        // losses, tank outflow equals consumer demand.
        for k in 0..steps {
            if !heatnode.heatstorages.is_empty() {
                let mut produced = Expression::default();
                for (heatproducer, pv) in heatnode.heatproducers.iter().zip(&nv.producers) {
                    produced += (pv.power[k]
                        - heatproducer.power_loss_startup
                            * heatproducer.power_max
                            * pv.starting[k])
                        * (heatproducer.efficiency * delta_t);
                }
                let mut inflow = Expression::default();
                for sv in &nv.storages {
                    inflow += sv.energy_in[k];
                }
                constraints.push(constraint!(inflow == produced));
            }

            let mut outflow = Expression::default();
            for sv in &nv.storages {
                outflow += sv.energy_out[k];
            }
            let demand: f64 = heatnode
                .heatconsumers
                .iter()
                .map(|heatconsumer| heatconsumer.power_actual[k])
                .sum::<f64>()
                * delta_t;
            constraints.push(constraint!(outflow == demand));
        }

        // Tank temperature evolution; capacitance vanishes without
        // flexibility, leaving a pure per-step heat balance.
        for (heatstorage, sv) in heatnode.heatstorages.iter().zip(&nv.storages) {
            let capacitance = heatstorage.capacitance() * flex;
            constraints.push(constraint!(
                sv.temperature[steps - 1] == heatstorage.temperature_final
            ));
            constraints.push(constraint!(
                (sv.temperature[0] - heatstorage.temperature_init) * capacitance
                    == sv.energy_in[0] - sv.energy_out[0]
                        - heatstorage.loss_factor * sv.temperature[0]
            ));
            for k in 1..steps {
                constraints.push(constraint!(
                    (sv.temperature[k] - sv.temperature[k - 1]) * capacitance
                        == sv.energy_in[k] - sv.energy_out[k]
                            - heatstorage.loss_factor * sv.temperature[k]
                ));
            }
        }
    }

    // Per-step power balance: net grid flow covers consumption plus storage
    // charging minus local production.
    for k in 0..steps {
        let mut net_load = Expression::default();
        for cv in &consumer_vars {
            net_load += cv.power_actual[k];
        }
        for nv in &heatnode_vars {
            for pv in &nv.producers {
                net_load += pv.power[k];
            }
        }
        for sv in &storage_vars {
            net_load += sv.power_charging[k] - sv.power_discharging[k];
        }
        for (producer, pv) in enduser.producers.iter().zip(&producer_vars) {
            // -p * (1 - curtailment), expanded
            net_load += producer.power_actual[k] * pv.curtailment_factor[k]
                - producer.power_actual[k];
        }
        constraints.push(constraint!(
            grid_vars.power_import[k] - grid_vars.power_export[k] == net_load
        ));
    }

    // Import and export are mutually exclusive through the export indicator:
    // export <= e * export_max, import <= (1 - e) * import_max.
    for k in 0..steps {
        constraints.push(constraint!(
            grid_vars.power_export[k] <= enduser.grid.power_export_max[k] * grid_vars.exporting[k]
        ));
        constraints.push(constraint!(
            grid_vars.power_import[k] + enduser.grid.power_import_max[k] * grid_vars.exporting[k]
                <= enduser.grid.power_import_max[k]
        ));
    }

    // Optionally forbid discharging the storages into the grid:
    // sum(discharge) <= (1 - e) * sum(discharge_max).
    if !enduser.grid.discharge_to_grid && !enduser.storages.is_empty() {
        let discharge_cap: f64 = enduser
            .storages
            .iter()
            .map(|storage| storage.power_discharge_max)
            .sum();
        for k in 0..steps {
            let mut discharging = Expression::default();
            for sv in &storage_vars {
                discharging += sv.power_discharging[k];
            }
            constraints.push(constraint!(
                discharging + discharge_cap * grid_vars.exporting[k] <= discharge_cap
            ));
        }
    }

    let mut objective = Expression::default();
    for k in 0..steps {
        objective += loss(
            &enduser.grid,
            &grid_vars.power_import,
            &grid_vars.power_export,
            k,
        );
    }

    let model_vars = ModelVars {
        consumers: consumer_vars,
        storages: storage_vars,
        producers: producer_vars,
        heatnodes: heatnode_vars,
        grid: grid_vars,
    };

    let mut model = vars.minimise(objective.clone()).using(good_lp::highs);
    for c in constraints {
        model = model.with(c);
    }

    match model.solve() {
        Ok(solution) => {
            enduser.status = SolveStatus::Optimal;
            write_solution(enduser, &solution, &model_vars);
            let loss_value = solution.eval(objective);
            enduser.loss = Some(loss_value);
            info!(
                enduser = %enduser.name,
                status = %enduser.status,
                loss = loss_value,
                "optimization finished"
            );
        }
        Err(ResolutionError::Infeasible) => {
            enduser.status = SolveStatus::Infeasible;
            write_unsolved(enduser);
            enduser.loss = None;
            warn!(
                enduser = %enduser.name,
                status = %enduser.status,
                "loss function cannot be evaluated"
            );
        }
        Err(ResolutionError::Unbounded) => {
            enduser.status = SolveStatus::Unbounded;
            write_unsolved(enduser);
            enduser.loss = None;
            warn!(
                enduser = %enduser.name,
                status = %enduser.status,
                "loss function cannot be evaluated"
            );
        }
        Err(other) => return Err(OptimizeError::Solver(other.to_string())),
    }

    enduser.include_results = true;
    Ok(())
}

fn values<S: Solution>(solution: &S, vars: &[Variable]) -> Vec<f64> {
    vars.iter().map(|&v| solution.value(v)).collect()
}

/// Binary variables come back as floats within solver tolerance; snap them
/// to 0/1.
fn indicator_values<S: Solution>(solution: &S, vars: &[Variable]) -> Vec<f64> {
    vars.iter().map(|&v| solution.value(v).round()).collect()
}

fn write_solution<S: Solution>(enduser: &mut EndUser, solution: &S, model_vars: &ModelVars) {
    for (consumer, cv) in enduser.consumers.iter_mut().zip(&model_vars.consumers) {
        consumer.power_actual = values(solution, &cv.power_actual);
        consumer.energy_deficit = values(solution, &cv.energy_deficit);
    }
    for (storage, sv) in enduser.storages.iter_mut().zip(&model_vars.storages) {
        storage.energy = values(solution, &sv.energy);
        storage.power_charging = values(solution, &sv.power_charging);
        storage.power_discharging = values(solution, &sv.power_discharging);
    }
    for (producer, pv) in enduser.producers.iter_mut().zip(&model_vars.producers) {
        producer.curtailment_factor = values(solution, &pv.curtailment_factor);
    }
    for (heatnode, nv) in enduser.heatnodes.iter_mut().zip(&model_vars.heatnodes) {
        for (heatproducer, pv) in heatnode.heatproducers.iter_mut().zip(&nv.producers) {
            heatproducer.power = values(solution, &pv.power);
            heatproducer.running = indicator_values(solution, &pv.running);
            heatproducer.starting = indicator_values(solution, &pv.starting);
        }
        for (heatstorage, sv) in heatnode.heatstorages.iter_mut().zip(&nv.storages) {
            heatstorage.temperature = values(solution, &sv.temperature);
            heatstorage.energy_in = values(solution, &sv.energy_in);
            heatstorage.energy_out = values(solution, &sv.energy_out);
        }
    }
    enduser.grid.power_import = values(solution, &model_vars.grid.power_import);
    enduser.grid.power_export = values(solution, &model_vars.grid.power_export);
    enduser.grid.exporting_to_grid = indicator_values(solution, &model_vars.grid.exporting);
}

/// The unconditional-write contract for solves that produced no values:
/// every result array becomes a length-H NaN vector.
fn write_unsolved(enduser: &mut EndUser) {
    let nan = vec![f64::NAN; enduser.horizon.steps];
    for consumer in &mut enduser.consumers {
        consumer.power_actual = nan.clone();
        consumer.energy_deficit = nan.clone();
    }
    for storage in &mut enduser.storages {
        storage.energy = nan.clone();
        storage.power_charging = nan.clone();
        storage.power_discharging = nan.clone();
    }
    for producer in &mut enduser.producers {
        producer.curtailment_factor = nan.clone();
    }
    for heatnode in &mut enduser.heatnodes {
        for heatproducer in &mut heatnode.heatproducers {
            heatproducer.power = nan.clone();
            heatproducer.running = nan.clone();
            heatproducer.starting = nan.clone();
        }
        for heatstorage in &mut heatnode.heatstorages {
            heatstorage.temperature = nan.clone();
            heatstorage.energy_in = nan.clone();
            heatstorage.energy_out = nan.clone();
        }
    }
    enduser.grid.power_import = nan.clone();
    enduser.grid.power_export = nan.clone();
    enduser.grid.exporting_to_grid = nan;
}
