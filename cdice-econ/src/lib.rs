//! Economic coupling layer and Euler-equation residual system of CDICE.
//!
//! The dynamic optimization problem of the DICE family is characterized by a
//! system of first-order conditions: Euler equations for capital and for the
//! shadow prices of the carbon reservoirs and temperature layers, the period
//! budget constraint, and a complementarity condition for the abatement-rate
//! box constraint smoothed with the Fischer-Burmeister function.
//!
//! An external solver (a learned policy function or a root finder) supplies
//! candidate policies and an expectation operator over productivity shocks;
//! this crate evaluates the residuals that must vanish at the optimum.
//!
//! Module organisation:
//! - [`variant`]: the structural model variants (`cjl`, DICE-2007, DICE-2016)
//!   and their damage / abatement-cost functional forms,
//! - [`parameters`]: the calibrated parameter set,
//! - [`state`]: state and policy records,
//! - [`economy`]: exogenous trends on the log-compressed time axis, derived
//!   transition coefficients and next-period state maps,
//! - [`residuals`]: the Euler-equation residual system and the expectation
//!   operator contract.

pub mod economy;
pub mod parameters;
pub mod residuals;
pub mod state;
pub mod variant;
