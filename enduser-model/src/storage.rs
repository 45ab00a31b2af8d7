use crate::document::{self, Document, DocumentError};
use crate::horizon::Horizon;

/// Battery-like electrical energy storage.
///
/// The storage may be physically absent for parts of the window (an electric
/// vehicle, for instance); `available` marks the connected steps. On the step
/// a connection starts, the stored energy is pinned to
/// `state_of_charge_initial`; on the step before a disconnection, and on the
/// last step of the window, it is pinned to `state_of_charge_final`.
#[derive(Debug, Clone, PartialEq)]
pub struct Storage {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Charging efficiency, in (0, 1\].
    pub efficiency_charging: f64,
    /// Discharging efficiency, in (0, 1\].
    pub efficiency_discharging: f64,
    /// Maximum charging power \[kW\].
    pub power_charge_max: f64,
    /// Maximum discharging power \[kW\].
    pub power_discharge_max: f64,
    /// Energy capacity \[kWh\].
    pub energy_capacity: f64,
    /// Maximum state of charge, in \[0, 1\].
    pub state_of_charge_max: f64,
    /// Minimum state of charge, in \[0, 1\].
    pub state_of_charge_min: f64,
    /// Steps on which the storage is connected.
    pub available: Vec<bool>,
    /// State of charge assumed on connect events, per timestep.
    pub state_of_charge_initial: Vec<f64>,
    /// State of charge required on disconnect events and at the end of the
    /// window, per timestep.
    pub state_of_charge_final: Vec<f64>,

    /// Stored energy per timestep \[kWh\], written by the optimizer.
    pub energy: Vec<f64>,
    /// Charging power per timestep \[kW\], written by the optimizer.
    pub power_charging: Vec<f64>,
    /// Discharging power per timestep \[kW\], written by the optimizer.
    pub power_discharging: Vec<f64>,
}

impl Storage {
    pub fn new(horizon: &Horizon) -> Self {
        Self {
            name: "Storage".to_string(),
            efficiency_charging: 0.9,
            efficiency_discharging: 0.9,
            power_charge_max: 100.0,
            power_discharge_max: 100.0,
            energy_capacity: 50.0,
            state_of_charge_max: 0.90,
            state_of_charge_min: 0.10,
            available: vec![true; horizon.steps],
            state_of_charge_initial: horizon.zeros(),
            state_of_charge_final: horizon.zeros(),
            energy: Vec::new(),
            power_charging: Vec::new(),
            power_discharging: Vec::new(),
        }
    }

    /// Steps on which the storage (re)connects: available, and either the
    /// start of the window or preceded by an unavailable step.
    pub fn connect_events(&self) -> Vec<bool> {
        self.available
            .iter()
            .enumerate()
            .map(|(k, &on)| on && (k == 0 || !self.available[k - 1]))
            .collect()
    }

    /// Steps on which the storage disconnects: unavailable, but available on
    /// the previous step. Never true at the start of the window.
    pub fn disconnect_events(&self) -> Vec<bool> {
        self.available
            .iter()
            .enumerate()
            .map(|(k, &on)| k > 0 && !on && self.available[k - 1])
            .collect()
    }

    pub fn to_dict(&self, include_results: bool) -> Document {
        let mut data = Document::new();

        data.insert(
            "efficiency_charging_i".into(),
            document::number(self.efficiency_charging),
        );
        data.insert(
            "efficiency_discharging_i".into(),
            document::number(self.efficiency_discharging),
        );
        data.insert(
            "power_charge_max_i".into(),
            document::number(self.power_charge_max),
        );
        data.insert(
            "power_discharge_max_i".into(),
            document::number(self.power_discharge_max),
        );
        data.insert(
            "energy_capacity_i".into(),
            document::number(self.energy_capacity),
        );
        data.insert(
            "state_of_charge_max_i".into(),
            document::number(self.state_of_charge_max),
        );
        data.insert(
            "state_of_charge_min_i".into(),
            document::number(self.state_of_charge_min),
        );

        data.insert("available_k".into(), document::bool_array(&self.available));
        data.insert(
            "state_of_charge_initial_k".into(),
            document::float_array(&self.state_of_charge_initial),
        );
        data.insert(
            "state_of_charge_final_k".into(),
            document::float_array(&self.state_of_charge_final),
        );

        if include_results {
            data.insert("energy_k".into(), document::float_array(&self.energy));
            data.insert(
                "power_charging_k".into(),
                document::float_array(&self.power_charging),
            );
            data.insert(
                "power_discharging_k".into(),
                document::float_array(&self.power_discharging),
            );
        }

        data
    }

    pub fn from_dict(data: &Document, include_results: bool) -> Result<Self, DocumentError> {
        let mut storage = Self {
            name: "Storage".to_string(),
            efficiency_charging: document::get_f64(data, "efficiency_charging_i")?,
            efficiency_discharging: document::get_f64(data, "efficiency_discharging_i")?,
            power_charge_max: document::get_f64(data, "power_charge_max_i")?,
            power_discharge_max: document::get_f64(data, "power_discharge_max_i")?,
            energy_capacity: document::get_f64(data, "energy_capacity_i")?,
            state_of_charge_max: document::get_f64(data, "state_of_charge_max_i")?,
            state_of_charge_min: document::get_f64(data, "state_of_charge_min_i")?,
            available: document::get_bool_array(data, "available_k")?,
            state_of_charge_initial: document::get_float_array(data, "state_of_charge_initial_k")?,
            state_of_charge_final: document::get_float_array(data, "state_of_charge_final_k")?,
            energy: Vec::new(),
            power_charging: Vec::new(),
            power_discharging: Vec::new(),
        };

        if include_results {
            storage.energy = document::get_float_array(data, "energy_k")?;
            storage.power_charging = document::get_float_array(data, "power_charging_k")?;
            storage.power_discharging = document::get_float_array(data, "power_discharging_k")?;
        }

        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_for_interrupted_availability() {
        let horizon = Horizon::new(8, 0.25).unwrap();
        let mut storage = Storage::new(&horizon);
        for k in 3..6 {
            storage.available[k] = false;
        }

        let connect = storage.connect_events();
        let disconnect = storage.disconnect_events();

        assert_eq!(
            connect,
            vec![true, false, false, false, false, false, true, false]
        );
        assert_eq!(
            disconnect,
            vec![false, false, false, true, false, false, false, false]
        );
    }

    #[test]
    fn test_events_when_unavailable_at_window_start() {
        let horizon = Horizon::new(4, 0.25).unwrap();
        let mut storage = Storage::new(&horizon);
        storage.available[0] = false;

        assert_eq!(storage.connect_events(), vec![false, true, false, false]);
        assert_eq!(
            storage.disconnect_events(),
            vec![false, false, false, false]
        );
    }

    #[test]
    fn test_dict_round_trip() {
        let horizon = Horizon::new(4, 0.25).unwrap();
        let mut storage = Storage::new(&horizon);
        storage.available[2] = false;
        storage.energy = vec![5.0, 10.0, f64::NAN, 10.0];
        storage.power_charging = horizon.zeros();
        storage.power_discharging = horizon.zeros();

        let exported = storage.to_dict(true);
        let imported = Storage::from_dict(&exported, true).unwrap();
        assert_eq!(imported.to_dict(true), exported);
    }
}
