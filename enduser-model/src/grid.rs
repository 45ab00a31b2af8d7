use crate::document::{self, Document, DocumentError};
use crate::horizon::Horizon;

/// External electricity grid the end user is connected to.
///
/// The grid is both the supplier of last resort and the sink for surplus
/// production; the optimizer's objective is always expressed on its
/// import/export flows, selected by `loss_f`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Allow storages to discharge while exporting to the grid.
    pub discharge_to_grid: bool,
    /// Maximum importable power per timestep \[kW\].
    pub power_import_max: Vec<f64>,
    /// Maximum exportable power per timestep \[kW\].
    pub power_export_max: Vec<f64>,
    /// Price per kWh of imported energy, per timestep.
    pub import_tariff: Vec<f64>,
    /// Price per kWh of exported energy, per timestep.
    pub export_tariff: Vec<f64>,
    /// Name of the loss function to minimize, resolved by the optimizer.
    pub loss_f: String,

    /// Imported power per timestep \[kW\], written by the optimizer.
    pub power_import: Vec<f64>,
    /// Exported power per timestep \[kW\], written by the optimizer.
    pub power_export: Vec<f64>,
    /// 1.0 on steps where the end user exports, written by the optimizer.
    /// Not serialized.
    pub exporting_to_grid: Vec<f64>,
}

impl Grid {
    pub fn new(horizon: &Horizon) -> Self {
        Self {
            name: "Grid".to_string(),
            discharge_to_grid: true,
            power_import_max: horizon.filled(100.0),
            power_export_max: horizon.filled(100.0),
            import_tariff: horizon.zeros(),
            export_tariff: horizon.zeros(),
            loss_f: "minimize_cost".to_string(),
            power_import: Vec::new(),
            power_export: Vec::new(),
            exporting_to_grid: Vec::new(),
        }
    }

    pub fn to_dict(&self, include_results: bool) -> Document {
        let mut data = Document::new();

        data.insert(
            "discharge_to_grid_b".into(),
            self.discharge_to_grid.into(),
        );
        data.insert(
            "power_import_max_k".into(),
            document::float_array(&self.power_import_max),
        );
        data.insert(
            "power_export_max_k".into(),
            document::float_array(&self.power_export_max),
        );
        data.insert(
            "import_tariff_k".into(),
            document::float_array(&self.import_tariff),
        );
        data.insert(
            "export_tariff_k".into(),
            document::float_array(&self.export_tariff),
        );
        data.insert("loss_f_s".into(), self.loss_f.clone().into());

        if include_results {
            data.insert(
                "power_import_k".into(),
                document::float_array(&self.power_import),
            );
            data.insert(
                "power_export_k".into(),
                document::float_array(&self.power_export),
            );
        }

        data
    }

    pub fn from_dict(data: &Document, include_results: bool) -> Result<Self, DocumentError> {
        let mut grid = Self {
            name: "Grid".to_string(),
            discharge_to_grid: document::get_bool(data, "discharge_to_grid_b")?,
            power_import_max: document::get_float_array(data, "power_import_max_k")?,
            power_export_max: document::get_float_array(data, "power_export_max_k")?,
            import_tariff: document::get_float_array(data, "import_tariff_k")?,
            export_tariff: document::get_float_array(data, "export_tariff_k")?,
            loss_f: document::get_str(data, "loss_f_s")?,
            power_import: Vec::new(),
            power_export: Vec::new(),
            exporting_to_grid: Vec::new(),
        };

        if include_results {
            grid.power_import = document::get_float_array(data, "power_import_k")?;
            grid.power_export = document::get_float_array(data, "power_export_k")?;
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dict_round_trip() {
        let horizon = Horizon::new(4, 0.25).unwrap();
        let mut grid = Grid::new(&horizon);
        grid.import_tariff = vec![0.1, 0.2, 0.3, 0.4];
        grid.discharge_to_grid = false;
        grid.power_import = vec![1.0, f64::NAN, 3.0, 4.0];
        grid.power_export = horizon.zeros();

        let exported = grid.to_dict(true);
        let imported = Grid::from_dict(&exported, true).unwrap();
        assert_eq!(imported.to_dict(true), exported);

        // results stay out of the document unless requested
        assert!(!grid.to_dict(false).contains_key("power_import_k"));
    }
}
