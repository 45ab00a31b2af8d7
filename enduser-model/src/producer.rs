use crate::document::{self, Document, DocumentError};
use crate::horizon::Horizon;

/// Electrical energy producer with an exogenous availability profile, e.g. a
/// PV plant or a run-of-river turbine. The optimizer may curtail up to
/// `curtailment_factor_max` of the available power to keep the system
/// feasible.
#[derive(Debug, Clone, PartialEq)]
pub struct Producer {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Fraction of the produced power that may be curtailed, in \[0, 1\].
    pub curtailment_factor_max: f64,
    /// Power the producer can deliver per timestep \[kW\].
    pub power_actual: Vec<f64>,

    /// Curtailed fraction per timestep, written by the optimizer.
    pub curtailment_factor: Vec<f64>,
}

impl Producer {
    pub fn new(horizon: &Horizon) -> Self {
        Self {
            name: "Producer".to_string(),
            curtailment_factor_max: 0.0,
            power_actual: horizon.zeros(),
            curtailment_factor: Vec::new(),
        }
    }

    pub fn to_dict(&self, include_results: bool) -> Document {
        let mut data = Document::new();

        data.insert(
            "power_curtailment_factor_max_i".into(),
            document::number(self.curtailment_factor_max),
        );
        data.insert(
            "power_actual_k".into(),
            document::float_array(&self.power_actual),
        );

        if include_results {
            data.insert(
                "power_curtailment_factor_k".into(),
                document::float_array(&self.curtailment_factor),
            );
        }

        data
    }

    pub fn from_dict(data: &Document, include_results: bool) -> Result<Self, DocumentError> {
        let mut producer = Self {
            name: "Producer".to_string(),
            curtailment_factor_max: document::get_f64(data, "power_curtailment_factor_max_i")?,
            power_actual: document::get_float_array(data, "power_actual_k")?,
            curtailment_factor: Vec::new(),
        };

        if include_results {
            producer.curtailment_factor =
                document::get_float_array(data, "power_curtailment_factor_k")?;
        }

        Ok(producer)
    }
}
