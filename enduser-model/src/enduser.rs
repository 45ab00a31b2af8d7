use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consumer::Consumer;
use crate::document::{self, Document, DocumentError};
use crate::grid::Grid;
use crate::heat::HeatNode;
use crate::horizon::Horizon;
use crate::producer::Producer;
use crate::storage::Storage;

/// Outcome of the last optimization run.
///
/// Infeasible and unbounded problems are ordinary outcomes, not errors;
/// callers inspect the status after [`optimize`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    NotSolved,
    Optimal,
    Infeasible,
    Unbounded,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::NotSolved => "Not Solved",
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed system (building, community) where electricity is transported
/// without losses: one grid connection plus producers, storages, consumers
/// and independent heat nodes.
///
/// The end user exclusively owns its nested assets. It is populated by the
/// caller, optimized, read back, and either serialized or discarded;
/// re-running the optimizer overwrites the result fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EndUser {
    /// Name of the instantiated object, for logging.
    pub name: String,
    /// Discretization shared by every per-step array in the graph.
    pub horizon: Horizon,
    pub producers: Vec<Producer>,
    pub storages: Vec<Storage>,
    pub consumers: Vec<Consumer>,
    pub heatnodes: Vec<HeatNode>,
    pub grid: Grid,
    /// Objective value of the last solve, when the solver produced one.
    pub loss: Option<f64>,
    /// Include result arrays when exporting to a document.
    pub include_results: bool,
    /// Wall-clock time of step 0.
    pub start_time: DateTime<Utc>,
    /// Enable the flexible behavior of deferrable assets. When false,
    /// consumers are pinned to their desired power, storages stay idle and
    /// heat storages lose their thermal capacitance.
    pub flexibility: bool,
    /// Status of the last solve.
    pub status: SolveStatus,
}

impl EndUser {
    pub fn new(horizon: Horizon) -> Self {
        Self {
            name: "EndUser".to_string(),
            horizon,
            producers: Vec::new(),
            storages: Vec::new(),
            consumers: Vec::new(),
            heatnodes: Vec::new(),
            grid: Grid::new(&horizon),
            loss: None,
            include_results: false,
            start_time: Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap(),
            flexibility: true,
            status: SolveStatus::NotSolved,
        }
    }

    /// Wall-clock timestamps of the optimization window.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        let step = Duration::milliseconds((self.horizon.delta_t * 3_600_000.0).round() as i64);
        (0..self.horizon.steps as i32)
            .map(|k| self.start_time + step * k)
            .collect()
    }

    pub fn to_dict(&self) -> Document {
        let mut data = Document::new();

        data.insert("horizon_i".into(), Value::from(self.horizon.steps as u64));
        data.insert("delta_t_i".into(), document::number(self.horizon.delta_t));
        data.insert("include_results_i".into(), self.include_results.into());
        data.insert(
            "start_time_i".into(),
            document::number(self.start_time.timestamp() as f64),
        );

        data.insert("flexibility_i".into(), self.flexibility.into());

        let mut producers = Document::new();
        for (i, producer) in self.producers.iter().enumerate() {
            producers.insert(
                i.to_string(),
                Value::Object(producer.to_dict(self.include_results)),
            );
        }
        data.insert("producers_d".into(), Value::Object(producers));

        let mut storages = Document::new();
        for (i, storage) in self.storages.iter().enumerate() {
            storages.insert(
                i.to_string(),
                Value::Object(storage.to_dict(self.include_results)),
            );
        }
        data.insert("storages_d".into(), Value::Object(storages));

        let mut consumers = Document::new();
        for (i, consumer) in self.consumers.iter().enumerate() {
            consumers.insert(
                i.to_string(),
                Value::Object(consumer.to_dict(self.include_results)),
            );
        }
        data.insert("consumers_d".into(), Value::Object(consumers));

        let mut heatnodes = Document::new();
        for (i, heatnode) in self.heatnodes.iter().enumerate() {
            heatnodes.insert(
                i.to_string(),
                Value::Object(heatnode.to_dict(self.include_results)),
            );
        }
        data.insert("heatnodes_dd".into(), Value::Object(heatnodes));

        let mut grid = Document::new();
        grid.insert("0".into(), Value::Object(self.grid.to_dict(self.include_results)));
        data.insert("grid_d".into(), Value::Object(grid));

        if self.include_results {
            data.insert(
                "loss_i".into(),
                match self.loss {
                    Some(loss) => document::number(loss),
                    None => Value::Null,
                },
            );
        }

        data
    }

    /// Rebuilds an end user from a document, re-applying the horizon and
    /// step length recorded in it.
    pub fn from_dict(data: &Document) -> Result<Self, DocumentError> {
        let steps = document::get_usize(data, "horizon_i")?;
        let delta_t = document::get_f64(data, "delta_t_i")?;
        let horizon =
            Horizon::new(steps, delta_t).ok_or(DocumentError::InvalidHorizon { steps, delta_t })?;

        let mut enduser = Self::new(horizon);
        enduser.include_results = document::get_bool(data, "include_results_i")?;

        let start = document::get_f64(data, "start_time_i")?;
        enduser.start_time = DateTime::from_timestamp(start as i64, 0).ok_or(
            DocumentError::WrongType {
                key: "start_time_i".to_string(),
                expected: "POSIX timestamp",
            },
        )?;
        enduser.flexibility = document::get_bool(data, "flexibility_i")?;

        for entry in document::get_entries(data, "producers_d")? {
            enduser
                .producers
                .push(Producer::from_dict(entry, enduser.include_results)?);
        }
        for entry in document::get_entries(data, "storages_d")? {
            enduser
                .storages
                .push(Storage::from_dict(entry, enduser.include_results)?);
        }
        for entry in document::get_entries(data, "consumers_d")? {
            enduser
                .consumers
                .push(Consumer::from_dict(entry, enduser.include_results)?);
        }
        for entry in document::get_entries(data, "heatnodes_dd")? {
            enduser
                .heatnodes
                .push(HeatNode::from_dict(entry, enduser.include_results)?);
        }

        let grids = document::get_entries(data, "grid_d")?;
        if let Some(grid) = grids.first() {
            enduser.grid = Grid::from_dict(grid, enduser.include_results)?;
        }

        if enduser.include_results {
            let loss = document::get_f64(data, "loss_i")?;
            enduser.loss = if loss.is_nan() { None } else { Some(loss) };
        }

        Ok(enduser)
    }
}
