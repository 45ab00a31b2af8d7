//! Shared test fixture: a day of quarter hours with one PV producer, one
//! flexible consumer, two batteries (one absent around midday) and a heat
//! node combining a boiler, a heat pump, a water tank and a sinusoidal heat
//! demand.

use std::f64::consts::{FRAC_PI_2, PI};

use enduser_model::{
    Consumer, EndUser, Grid, HeatConsumer, HeatNode, HeatProducer, HeatStorage, Horizon, Producer,
    Storage,
};

/// `n` evenly spaced values from `start` to `end`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

pub fn example_enduser() -> EndUser {
    let horizon = Horizon::default();
    let mut enduser = EndUser::new(horizon);

    let mut grid = Grid::new(&horizon);
    grid.import_tariff = horizon.filled(60.0);
    grid.export_tariff = horizon.filled(60.0);
    grid.loss_f = "minimize_cost".to_string();
    grid.power_import_max = horizon.filled(50_000.0);
    grid.power_export_max = horizon.filled(50_000.0);
    grid.discharge_to_grid = false;
    enduser.grid = grid;

    let mut producer = Producer::new(&horizon);
    producer.curtailment_factor_max = 0.2;
    producer.power_actual = linspace(-FRAC_PI_2, 1.5 * PI, horizon.steps)
        .iter()
        .map(|&x| 200.0 * x.sin().max(0.0))
        .collect();
    enduser.producers.push(producer);

    let mut consumer = Consumer::new(&horizon);
    // load around 55 kW, deterministic stand-in for a noisy profile
    consumer.power_desired = (0..horizon.steps)
        .map(|k| 50.0 + 5.0 * (1.0 + (0.7 * k as f64).sin()))
        .collect();
    consumer.energy_deficit_max = horizon.filled(20.0);
    consumer.power_min = 0.0;
    consumer.power_max = 100.0;
    enduser.consumers.push(consumer);

    let mut storage1 = Storage::new(&horizon);
    for k in 20..60 {
        storage1.available[k] = false;
    }
    storage1.state_of_charge_initial = horizon.filled(0.20);
    storage1.state_of_charge_final = horizon.filled(0.20);
    enduser.storages.push(storage1);

    let mut storage2 = Storage::new(&horizon);
    storage2.energy_capacity = 100.0;
    storage2.state_of_charge_initial = horizon.filled(0.80);
    storage2.state_of_charge_final = horizon.filled(0.80);
    enduser.storages.push(storage2);

    let mut heatnode = HeatNode::new();
    heatnode.heatproducers.push(HeatProducer::new());

    let mut heatpump = HeatProducer::new();
    heatpump.efficiency = 3.5;
    heatpump.power_max = 1.5;
    heatpump.minimum_power_factor = 0.2;
    heatpump.power_loss_startup = 1.0;
    heatnode.heatproducers.push(heatpump);

    heatnode.heatstorages.push(HeatStorage::new());

    let mut heatconsumer = HeatConsumer::new(&horizon);
    heatconsumer.power_actual = linspace(-PI, 2.0 * PI, horizon.steps)
        .iter()
        .map(|&x| 3.0 * (x.sin() + 2.0))
        .collect();
    heatnode.heatconsumers.push(heatconsumer);
    enduser.heatnodes.push(heatnode);

    enduser
}
