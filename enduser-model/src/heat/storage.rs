use crate::document::{self, Document, DocumentError};

/// Sensible-heat thermal storage (water tank) inside a heat node.
///
/// Thermal capacitance is `volume * density * specific_heat`; standing losses
/// scale with the tank temperature through `loss_factor`. The temperature is
/// pinned to `temperature_final` on the last step of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatStorage {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Maximum tank temperature \[°C\].
    pub temperature_max: f64,
    /// Minimum tank temperature \[°C\].
    pub temperature_min: f64,
    /// Standing heat loss \[kWh/K\] per timestep.
    pub loss_factor: f64,
    /// Tank volume \[l\].
    pub volume: f64,
    /// Medium density \[kg/l\].
    pub density: f64,
    /// Specific heat of the medium \[kWh/(kg·K)\].
    pub specific_heat: f64,
    /// Temperature of the input flow \[°C\].
    pub temperature_input: f64,
    /// Tank temperature at the start of the window \[°C\].
    pub temperature_init: f64,
    /// Required tank temperature at the end of the window \[°C\].
    pub temperature_final: f64,

    /// Energy entering the tank per timestep \[kWh\], written by the
    /// optimizer.
    pub energy_in: Vec<f64>,
    /// Energy leaving the tank per timestep \[kWh\], written by the
    /// optimizer.
    pub energy_out: Vec<f64>,
    /// Tank temperature per timestep \[°C\], written by the optimizer.
    pub temperature: Vec<f64>,
}

impl HeatStorage {
    pub fn new() -> Self {
        Self {
            name: "HeatStorage".to_string(),
            temperature_max: 80.0,
            temperature_min: 40.0,
            loss_factor: 1e-4,
            volume: 200.0,
            density: 1.0,
            specific_heat: 1.11e-3,
            temperature_input: 10.0,
            temperature_init: 60.0,
            temperature_final: 60.0,
            energy_in: Vec::new(),
            energy_out: Vec::new(),
            temperature: Vec::new(),
        }
    }

    /// Thermal capacitance of the tank \[kWh/K\].
    pub fn capacitance(&self) -> f64 {
        self.volume * self.density * self.specific_heat
    }

    pub fn to_dict(&self, include_results: bool) -> Document {
        let mut data = Document::new();

        data.insert(
            "temperature_max_i".into(),
            document::number(self.temperature_max),
        );
        data.insert(
            "temperature_min_i".into(),
            document::number(self.temperature_min),
        );
        data.insert("loss_factor_i".into(), document::number(self.loss_factor));
        data.insert("volume_i".into(), document::number(self.volume));
        data.insert("density_i".into(), document::number(self.density));
        data.insert(
            "specific_heat_i".into(),
            document::number(self.specific_heat),
        );
        data.insert(
            "temperature_input_i".into(),
            document::number(self.temperature_input),
        );
        data.insert(
            "temperature_init_i".into(),
            document::number(self.temperature_init),
        );
        data.insert(
            "temperature_final_i".into(),
            document::number(self.temperature_final),
        );

        if include_results {
            data.insert(
                "temperature_k".into(),
                document::float_array(&self.temperature),
            );
            data.insert("energy_in_k".into(), document::float_array(&self.energy_in));
            data.insert(
                "energy_out_k".into(),
                document::float_array(&self.energy_out),
            );
        }

        data
    }

    pub fn from_dict(data: &Document, include_results: bool) -> Result<Self, DocumentError> {
        let mut storage = Self {
            name: "HeatStorage".to_string(),
            temperature_max: document::get_f64(data, "temperature_max_i")?,
            temperature_min: document::get_f64(data, "temperature_min_i")?,
            loss_factor: document::get_f64(data, "loss_factor_i")?,
            volume: document::get_f64(data, "volume_i")?,
            density: document::get_f64(data, "density_i")?,
            specific_heat: document::get_f64(data, "specific_heat_i")?,
            temperature_input: document::get_f64(data, "temperature_input_i")?,
            temperature_init: document::get_f64(data, "temperature_init_i")?,
            temperature_final: document::get_f64(data, "temperature_final_i")?,
            energy_in: Vec::new(),
            energy_out: Vec::new(),
            temperature: Vec::new(),
        };

        if include_results {
            storage.temperature = document::get_float_array(data, "temperature_k")?;
            storage.energy_in = document::get_float_array(data, "energy_in_k")?;
            storage.energy_out = document::get_float_array(data, "energy_out_k")?;
        }

        Ok(storage)
    }
}

impl Default for HeatStorage {
    fn default() -> Self {
        Self::new()
    }
}
