use crate::document::{self, Document, DocumentError};

/// Electrically driven heat producer (boiler, heat pump) inside a heat node.
///
/// `efficiency` converts electrical to thermal power and may exceed 1 for a
/// heat pump. While running, output must stay above
/// `minimum_power_factor * power_max`; on the step the producer turns on,
/// `power_loss_startup * power_max` of its draw is lost before reaching the
/// heat side.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatProducer {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Thermal output per unit of electrical input.
    pub efficiency: f64,
    /// Maximum electrical power draw \[kW\].
    pub power_max: f64,
    /// Minimum fraction of `power_max` drawn while running, in \[0, 1\].
    pub minimum_power_factor: f64,
    /// Fraction of `power_max` lost on a startup step.
    pub power_loss_startup: f64,

    /// 1.0 on startup steps, written by the optimizer.
    pub starting: Vec<f64>,
    /// 1.0 on running steps, written by the optimizer.
    pub running: Vec<f64>,
    /// Electrical power drawn per timestep \[kW\], written by the optimizer.
    pub power: Vec<f64>,
}

impl HeatProducer {
    pub fn new() -> Self {
        Self {
            name: "HeatProducer".to_string(),
            efficiency: 0.98,
            power_max: 5.0,
            minimum_power_factor: 0.01,
            power_loss_startup: 0.0,
            starting: Vec::new(),
            running: Vec::new(),
            power: Vec::new(),
        }
    }

    pub fn to_dict(&self, include_results: bool) -> Document {
        let mut data = Document::new();

        data.insert("efficiency_i".into(), document::number(self.efficiency));
        data.insert("power_max_i".into(), document::number(self.power_max));
        data.insert(
            "minimum_power_factor_i".into(),
            document::number(self.minimum_power_factor),
        );
        data.insert(
            "power_loss_startup_i".into(),
            document::number(self.power_loss_startup),
        );

        if include_results {
            data.insert("starting_k".into(), document::float_array(&self.starting));
            data.insert("running_k".into(), document::float_array(&self.running));
            data.insert("power_k".into(), document::float_array(&self.power));
        }

        data
    }

    pub fn from_dict(data: &Document, include_results: bool) -> Result<Self, DocumentError> {
        let mut producer = Self {
            name: "HeatProducer".to_string(),
            efficiency: document::get_f64(data, "efficiency_i")?,
            power_max: document::get_f64(data, "power_max_i")?,
            minimum_power_factor: document::get_f64(data, "minimum_power_factor_i")?,
            power_loss_startup: document::get_f64(data, "power_loss_startup_i")?,
            starting: Vec::new(),
            running: Vec::new(),
            power: Vec::new(),
        };

        if include_results {
            producer.starting = document::get_float_array(data, "starting_k")?;
            producer.running = document::get_float_array(data, "running_k")?;
            producer.power = document::get_float_array(data, "power_k")?;
        }

        Ok(producer)
    }
}

impl Default for HeatProducer {
    fn default() -> Self {
        Self::new()
    }
}
