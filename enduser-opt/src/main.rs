use std::env;
use std::f64::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::Path;

use anyhow::Context;
use enduser_model::{
    Consumer, Document, EndUser, Grid, HeatConsumer, HeatNode, HeatProducer, HeatStorage, Horizon,
    Producer, Storage,
};
use enduser_opt::{optimize, plot};
use serde_json::Value;

/// `n` evenly spaced values from `start` to `end`, endpoints included.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// A day of quarter hours: sinusoidal PV, one flexible consumer, two
/// batteries (one absent around midday), and a heat node with a boiler, a
/// heat pump, a water tank and a sinusoidal heat demand.
fn example_enduser(horizon: Horizon) -> EndUser {
    let mut enduser = EndUser::new(horizon);

    let mut grid = Grid::new(&horizon);
    grid.import_tariff = linspace(-PI, 2.0 * PI, horizon.steps)
        .iter()
        .map(|&x| 50.0 * ((PI + x).sin() + 2.0))
        .collect();
    grid.export_tariff = horizon.filled(60.0);
    grid.power_import_max = horizon.filled(500.0);
    grid.power_export_max = horizon.filled(100.0);
    grid.discharge_to_grid = true;
    enduser.grid = grid;

    let mut producer = Producer::new(&horizon);
    producer.curtailment_factor_max = 0.2;
    producer.power_actual = linspace(-FRAC_PI_2, 1.5 * PI, horizon.steps)
        .iter()
        .map(|&x| 200.0 * x.sin().max(0.0))
        .collect();
    enduser.producers.push(producer);

    let mut consumer = Consumer::new(&horizon);
    consumer.power_desired = (0..horizon.steps)
        .map(|k| 55.0 + 5.0 * (0.7 * k as f64).sin())
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

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    let horizon = Horizon::default();
    let mut enduser = example_enduser(horizon);
    optimize(&mut enduser).context("optimization failed")?;

    println!("Status: {}", enduser.status);
    match enduser.loss {
        Some(loss) => println!("Total value of the loss function = {loss:.2}"),
        None => println!("Loss function cannot be evaluated"),
    }

    let data = enduser.to_dict();

    let mut endusers = Document::new();
    endusers.insert("0".into(), Value::Object(data.clone()));
    let mut out = Document::new();
    out.insert("endusers".into(), Value::Object(endusers));

    fs::create_dir_all("results").context("creating results directory")?;
    fs::write(
        "results/opt.json",
        serde_json::to_string_pretty(&Value::Object(out))?,
    )
    .context("writing results/opt.json")?;
    println!("Results saved as results/opt.json");

    if args.get(1).map(String::as_str) == Some("plot") {
        let plots = plot::plot_document(&data, Path::new("results/plots"))
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        println!("{} plots saved under results/plots", plots.len());
    }

    Ok(())
}
