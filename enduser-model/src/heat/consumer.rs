use crate::document::{self, Document, DocumentError};
use crate::horizon::Horizon;

/// Heat consumer with an exogenous demand profile.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatConsumer {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Heat power the consumer requires per timestep \[kW\].
    pub power_actual: Vec<f64>,
}

impl HeatConsumer {
    pub fn new(horizon: &Horizon) -> Self {
        Self {
            name: "HeatConsumer".to_string(),
            power_actual: horizon.zeros(),
        }
    }

    pub fn to_dict(&self, _include_results: bool) -> Document {
        let mut data = Document::new();
        data.insert(
            "power_actual_k".into(),
            document::float_array(&self.power_actual),
        );
        data
    }

    pub fn from_dict(data: &Document, _include_results: bool) -> Result<Self, DocumentError> {
        Ok(Self {
            name: "HeatConsumer".to_string(),
            power_actual: document::get_float_array(data, "power_actual_k")?,
        })
    }
}
