//! Registry of grid-side loss functions.
//!
//! The grid selects its objective by name; the registry is closed, and an
//! unknown name fails before the solver is invoked.

use enduser_model::Grid;
use good_lp::{Expression, Variable};

use crate::error::OptimizeError;

/// Per-step contribution to the objective, expressed on the grid variables.
pub type LossFn = fn(&Grid, &[Variable], &[Variable], usize) -> Expression;

/// Cost of the energy exchanged with the grid at step `k`.
fn loss_cost(grid: &Grid, power_import: &[Variable], power_export: &[Variable], k: usize) -> Expression {
    grid.import_tariff[k] * power_import[k] - grid.export_tariff[k] * power_export[k]
}

/// Energy drawn from the grid at step `k`, regardless of price.
fn loss_grid_supply(
    _grid: &Grid,
    power_import: &[Variable],
    _power_export: &[Variable],
    k: usize,
) -> Expression {
    power_import[k].into()
}

pub const LOSSES: &[(&str, LossFn)] = &[
    ("minimize_cost", loss_cost),
    ("minimize_grid_supply", loss_grid_supply),
];

/// Resolves a loss function by name.
pub fn lookup(name: &str) -> Result<LossFn, OptimizeError> {
    LOSSES
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, f)| *f)
        .ok_or_else(|| OptimizeError::UnknownObjective(name.to_string()))
}
