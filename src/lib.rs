//! CDICE: a reduced-form climate-economy integrated assessment model.
//!
//! This facade crate re-exports the two workspace members:
//! - [`cdice_core`]: the coupled carbon-cycle / energy-balance time integrator,
//!   problem configuration, time-series remapping and literature benchmarks.
//! - [`cdice_econ`]: the economic coupling layer and the Euler-equation
//!   residual system consumed by an external policy solver.

pub use cdice_core::{
    benchmark, carbon_cycle, climate, constants, errors, forcing, integrator, problem, timeseries,
};
pub use cdice_econ::{economy, parameters, residuals, state, variant};
