use crate::document::{self, Document, DocumentError};
use crate::horizon::Horizon;

/// Deferrable electrical consumer.
///
/// The consumer asks for `power_desired` on every step; when the end user is
/// flexible, delivery may lag behind by up to `energy_deficit_max` kWh of
/// cumulative under-delivery per step.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumer {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Maximum power accepted by the consumer \[kW\].
    pub power_max: f64,
    /// Minimum power drawn by the consumer \[kW\].
    pub power_min: f64,
    /// Steps on which the consumer is available.
    pub available: Vec<bool>,
    /// Maximum cumulative energy deficit per timestep \[kWh\].
    pub energy_deficit_max: Vec<f64>,
    /// Power desired (or planned) per timestep \[kW\].
    pub power_desired: Vec<f64>,

    /// Power delivered per timestep \[kW\], written by the optimizer.
    pub power_actual: Vec<f64>,
    /// Cumulative energy deficit per timestep \[kWh\], written by the
    /// optimizer.
    pub energy_deficit: Vec<f64>,
}

impl Consumer {
    pub fn new(horizon: &Horizon) -> Self {
        Self {
            name: "Consumer".to_string(),
            power_max: 100.0,
            power_min: 0.0,
            available: vec![true; horizon.steps],
            energy_deficit_max: horizon.zeros(),
            power_desired: horizon.zeros(),
            power_actual: Vec::new(),
            energy_deficit: Vec::new(),
        }
    }

    pub fn to_dict(&self, include_results: bool) -> Document {
        let mut data = Document::new();

        data.insert("power_max_i".into(), document::number(self.power_max));
        data.insert("power_min_i".into(), document::number(self.power_min));

        data.insert("available_k".into(), document::bool_array(&self.available));
        data.insert(
            "energy_deficit_max_k".into(),
            document::float_array(&self.energy_deficit_max),
        );
        data.insert(
            "power_desired_k".into(),
            document::float_array(&self.power_desired),
        );

        if include_results {
            data.insert(
                "power_actual_k".into(),
                document::float_array(&self.power_actual),
            );
            data.insert(
                "energy_deficit_k".into(),
                document::float_array(&self.energy_deficit),
            );
        }

        data
    }

    pub fn from_dict(data: &Document, include_results: bool) -> Result<Self, DocumentError> {
        let mut consumer = Self {
            name: "Consumer".to_string(),
            power_max: document::get_f64(data, "power_max_i")?,
            power_min: document::get_f64(data, "power_min_i")?,
            available: document::get_bool_array(data, "available_k")?,
            energy_deficit_max: document::get_float_array(data, "energy_deficit_max_k")?,
            power_desired: document::get_float_array(data, "power_desired_k")?,
            power_actual: Vec::new(),
            energy_deficit: Vec::new(),
        };

        if include_results {
            consumer.power_actual = document::get_float_array(data, "power_actual_k")?;
            consumer.energy_deficit = document::get_float_array(data, "energy_deficit_k")?;
        }

        Ok(consumer)
    }
}
