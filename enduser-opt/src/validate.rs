//! Input validation run before any solver call.
//!
//! Shape checks first (every input array must match the horizon), then the
//! scalar and entry ranges declared on the asset models. Errors name the
//! asset class, its index within its list, and the offending field.

use enduser_model::{Consumer, EndUser, Grid, HeatConsumer, HeatProducer, HeatStorage, Producer, Storage};

use crate::error::OptimizeError;

fn check_len(
    asset: &str,
    index: usize,
    field: &'static str,
    len: usize,
    expected: usize,
) -> Result<(), OptimizeError> {
    if len != expected {
        return Err(OptimizeError::InvalidShape {
            asset: asset.to_string(),
            index,
            field,
            len,
            expected,
        });
    }
    Ok(())
}

fn check(
    ok: bool,
    asset: &str,
    index: usize,
    field: &'static str,
    message: &str,
) -> Result<(), OptimizeError> {
    if !ok {
        return Err(OptimizeError::InvalidInput {
            asset: asset.to_string(),
            index,
            field,
            message: message.to_string(),
        });
    }
    Ok(())
}

fn non_negative(
    values: &[f64],
    asset: &str,
    index: usize,
    field: &'static str,
) -> Result<(), OptimizeError> {
    check(
        values.iter().all(|v| *v >= 0.0),
        asset,
        index,
        field,
        "entries must be non-negative",
    )
}

fn unit_interval(
    values: &[f64],
    asset: &str,
    index: usize,
    field: &'static str,
) -> Result<(), OptimizeError> {
    check(
        values.iter().all(|v| (0.0..=1.0).contains(v)),
        asset,
        index,
        field,
        "entries must be within [0, 1]",
    )
}

fn validate_grid(grid: &Grid, steps: usize) -> Result<(), OptimizeError> {
    const ASSET: &str = "Grid";
    check_len(ASSET, 0, "power_import_max", grid.power_import_max.len(), steps)?;
    check_len(ASSET, 0, "power_export_max", grid.power_export_max.len(), steps)?;
    check_len(ASSET, 0, "import_tariff", grid.import_tariff.len(), steps)?;
    check_len(ASSET, 0, "export_tariff", grid.export_tariff.len(), steps)?;

    non_negative(&grid.power_import_max, ASSET, 0, "power_import_max")?;
    non_negative(&grid.power_export_max, ASSET, 0, "power_export_max")?;
    Ok(())
}

fn validate_producer(producer: &Producer, index: usize, steps: usize) -> Result<(), OptimizeError> {
    const ASSET: &str = "Producer";
    check_len(ASSET, index, "power_actual", producer.power_actual.len(), steps)?;

    non_negative(&producer.power_actual, ASSET, index, "power_actual")?;
    check(
        (0.0..=1.0).contains(&producer.curtailment_factor_max),
        ASSET,
        index,
        "curtailment_factor_max",
        "must be within [0, 1]",
    )?;
    Ok(())
}

fn validate_storage(storage: &Storage, index: usize, steps: usize) -> Result<(), OptimizeError> {
    const ASSET: &str = "Storage";
    check_len(ASSET, index, "available", storage.available.len(), steps)?;
    check_len(
        ASSET,
        index,
        "state_of_charge_initial",
        storage.state_of_charge_initial.len(),
        steps,
    )?;
    check_len(
        ASSET,
        index,
        "state_of_charge_final",
        storage.state_of_charge_final.len(),
        steps,
    )?;

    check(
        storage.efficiency_charging > 0.0 && storage.efficiency_charging <= 1.0,
        ASSET,
        index,
        "efficiency_charging",
        "must be within (0, 1]",
    )?;
    check(
        storage.efficiency_discharging > 0.0 && storage.efficiency_discharging <= 1.0,
        ASSET,
        index,
        "efficiency_discharging",
        "must be within (0, 1]",
    )?;
    check(
        storage.power_charge_max >= 0.0,
        ASSET,
        index,
        "power_charge_max",
        "must be non-negative",
    )?;
    check(
        storage.power_discharge_max >= 0.0,
        ASSET,
        index,
        "power_discharge_max",
        "must be non-negative",
    )?;
    check(
        storage.energy_capacity >= 0.0,
        ASSET,
        index,
        "energy_capacity",
        "must be non-negative",
    )?;
    check(
        storage.state_of_charge_min >= 0.0
            && storage.state_of_charge_min <= storage.state_of_charge_max
            && storage.state_of_charge_max <= 1.0,
        ASSET,
        index,
        "state_of_charge_min",
        "requires 0 <= min <= max <= 1",
    )?;
    unit_interval(
        &storage.state_of_charge_initial,
        ASSET,
        index,
        "state_of_charge_initial",
    )?;
    unit_interval(
        &storage.state_of_charge_final,
        ASSET,
        index,
        "state_of_charge_final",
    )?;
    Ok(())
}

fn validate_consumer(consumer: &Consumer, index: usize, steps: usize) -> Result<(), OptimizeError> {
    const ASSET: &str = "Consumer";
    check_len(ASSET, index, "available", consumer.available.len(), steps)?;
    check_len(
        ASSET,
        index,
        "energy_deficit_max",
        consumer.energy_deficit_max.len(),
        steps,
    )?;
    check_len(
        ASSET,
        index,
        "power_desired",
        consumer.power_desired.len(),
        steps,
    )?;

    check(
        consumer.power_min <= consumer.power_max,
        ASSET,
        index,
        "power_min",
        "must not exceed power_max",
    )?;
    non_negative(&consumer.energy_deficit_max, ASSET, index, "energy_deficit_max")?;
    non_negative(&consumer.power_desired, ASSET, index, "power_desired")?;
    Ok(())
}

fn validate_heatproducer(
    producer: &HeatProducer,
    node: usize,
    index: usize,
) -> Result<(), OptimizeError> {
    let asset = format!("HeatNode[{node}]::HeatProducer");
    check(
        producer.efficiency > 0.0,
        &asset,
        index,
        "efficiency",
        "must be positive",
    )?;
    check(
        producer.power_max >= 0.0,
        &asset,
        index,
        "power_max",
        "must be non-negative",
    )?;
    check(
        (0.0..=1.0).contains(&producer.minimum_power_factor),
        &asset,
        index,
        "minimum_power_factor",
        "must be within [0, 1]",
    )?;
    check(
        producer.power_loss_startup >= 0.0,
        &asset,
        index,
        "power_loss_startup",
        "must be non-negative",
    )?;
    Ok(())
}

fn validate_heatstorage(
    storage: &HeatStorage,
    node: usize,
    index: usize,
) -> Result<(), OptimizeError> {
    let asset = format!("HeatNode[{node}]::HeatStorage");
    check(
        storage.volume >= 0.0,
        &asset,
        index,
        "volume",
        "must be non-negative",
    )?;
    check(
        storage.density >= 0.0,
        &asset,
        index,
        "density",
        "must be non-negative",
    )?;
    check(
        storage.specific_heat >= 0.0,
        &asset,
        index,
        "specific_heat",
        "must be non-negative",
    )?;
    check(
        storage.loss_factor >= 0.0,
        &asset,
        index,
        "loss_factor",
        "must be non-negative",
    )?;
    check(
        storage.temperature_min <= storage.temperature_max,
        &asset,
        index,
        "temperature_min",
        "must not exceed temperature_max",
    )?;
    check(
        storage.temperature_init >= storage.temperature_min
            && storage.temperature_init <= storage.temperature_max,
        &asset,
        index,
        "temperature_init",
        "must lie within [temperature_min, temperature_max]",
    )?;
    check(
        storage.temperature_final >= storage.temperature_min
            && storage.temperature_final <= storage.temperature_max,
        &asset,
        index,
        "temperature_final",
        "must lie within [temperature_min, temperature_max]",
    )?;
    Ok(())
}

fn validate_heatconsumer(
    consumer: &HeatConsumer,
    node: usize,
    index: usize,
    steps: usize,
) -> Result<(), OptimizeError> {
    let asset = format!("HeatNode[{node}]::HeatConsumer");
    check_len(&asset, index, "power_actual", consumer.power_actual.len(), steps)?;
    non_negative(&consumer.power_actual, &asset, index, "power_actual")?;
    Ok(())
}

/// Validates the whole asset graph against the end user's horizon.
pub fn validate(enduser: &EndUser) -> Result<(), OptimizeError> {
    let steps = enduser.horizon.steps;

    validate_grid(&enduser.grid, steps)?;
    for (i, producer) in enduser.producers.iter().enumerate() {
        validate_producer(producer, i, steps)?;
    }
    for (i, storage) in enduser.storages.iter().enumerate() {
        validate_storage(storage, i, steps)?;
    }
    for (i, consumer) in enduser.consumers.iter().enumerate() {
        validate_consumer(consumer, i, steps)?;
    }
    for (i, heatnode) in enduser.heatnodes.iter().enumerate() {
        for (j, heatproducer) in heatnode.heatproducers.iter().enumerate() {
            validate_heatproducer(heatproducer, i, j)?;
        }
        for (j, heatstorage) in heatnode.heatstorages.iter().enumerate() {
            validate_heatstorage(heatstorage, i, j)?;
        }
        for (j, heatconsumer) in heatnode.heatconsumers.iter().enumerate() {
            validate_heatconsumer(heatconsumer, i, j, steps)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enduser_model::Horizon;

    #[test]
    fn test_shape_mismatch_names_the_field() {
        let horizon = Horizon::new(4, 0.25).unwrap();
        let mut enduser = EndUser::new(horizon);
        let mut consumer = Consumer::new(&horizon);
        consumer.power_desired = vec![1.0; 3];
        enduser.consumers.push(consumer);

        match validate(&enduser) {
            Err(OptimizeError::InvalidShape { asset, index, field, len, expected }) => {
                assert_eq!(asset, "Consumer");
                assert_eq!(index, 0);
                assert_eq!(field, "power_desired");
                assert_eq!(len, 3);
                assert_eq!(expected, 4);
            }
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[test]
    fn test_range_violation_names_the_field() {
        let horizon = Horizon::new(4, 0.25).unwrap();
        let mut enduser = EndUser::new(horizon);
        let mut storage = Storage::new(&horizon);
        storage.efficiency_charging = 1.2;
        enduser.storages.push(storage);

        match validate(&enduser) {
            Err(OptimizeError::InvalidInput { asset, field, .. }) => {
                assert_eq!(asset, "Storage");
                assert_eq!(field, "efficiency_charging");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_scalars_are_rejected() {
        let horizon = Horizon::new(4, 0.25).unwrap();
        let mut enduser = EndUser::new(horizon);
        let mut heatnode = enduser_model::HeatNode::new();
        let mut heatproducer = HeatProducer::new();
        heatproducer.efficiency = f64::NAN;
        heatnode.heatproducers.push(heatproducer);
        enduser.heatnodes.push(heatnode);

        assert!(validate(&enduser).is_err());
    }

    #[test]
    fn test_empty_graph_is_valid() {
        let enduser = EndUser::new(Horizon::default());
        assert!(validate(&enduser).is_ok());
    }
}
