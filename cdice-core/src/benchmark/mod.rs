//! Comparison trajectories from the published calibration literature.
//!
//! These are the pure, in-memory halves of the benchmark suite: impulse
//! response functions for a 100 GtC pulse from Joos et al. (2013) and
//! two-layer step-response coefficients for abrupt 4xCO2 from Geoffroy et
//! al. (2013). File-based benchmarks (CMIP5 temperature output, RCP input
//! series) stay outside the core and reach the integrator only through the
//! [`crate::timeseries::ExternalTimeSeries`] contract.

pub mod geoffroy;
pub mod joos;
