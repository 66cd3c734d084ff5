//! State and policy records of the dynamic optimization problem.

use cdice_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// The state of the economy-climate system at one period.
///
/// Carbon masses are in 1000 GtC, temperatures in K relative to
/// preindustrial, capital in effective labor units. `tau` is the
/// computational time on `[0, 1)`; the corresponding model period is
/// recovered through the logarithmic transform in
/// [`crate::economy::Economy::real_time`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconState {
    pub k: FloatValue,
    pub m_at: FloatValue,
    pub m_uo: FloatValue,
    pub m_lo: FloatValue,
    pub t_at: FloatValue,
    pub t_oc: FloatValue,
    /// Level of the TFP shock (one at its deterministic mean).
    pub zeta: FloatValue,
    /// AR(1) growth component of the TFP shock.
    pub chi: FloatValue,
    pub tau: FloatValue,
}

impl Default for EconState {
    /// DICE-2016 start-year masses and temperatures with normalized capital
    /// and the shock at its mean.
    fn default() -> Self {
        Self {
            k: 1.0,
            m_at: 0.851,
            m_uo: 0.460,
            m_lo: 1.740,
            t_at: 0.85,
            t_oc: 0.0068,
            zeta: 1.0,
            chi: 0.0,
            tau: 0.0,
        }
    }
}

/// Candidate policy values at one period, as produced by an external policy
/// function. The `_hat` quantities are normalized co-states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyValues {
    /// Capital chosen for the next period, in effective labor units.
    pub k_plus: FloatValue,
    /// Abatement rate, box-constrained to `[0, 1]`.
    pub mu: FloatValue,
    /// Marginal utility of consumption (multiplier on the budget constraint).
    pub lambd_hat: FloatValue,
    /// Shadow price of atmospheric carbon.
    pub nu_at_hat: FloatValue,
    /// Shadow price of upper-ocean carbon.
    pub nu_uo_hat: FloatValue,
    /// Shadow price of lower-ocean carbon.
    pub nu_lo_hat: FloatValue,
    /// Shadow price of the atmospheric temperature layer.
    pub eta_at_hat: FloatValue,
    /// Shadow price of the ocean temperature layer.
    pub eta_oc_hat: FloatValue,
}
