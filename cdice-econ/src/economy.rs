//! Exogenous trends, derived transition coefficients and next-period state
//! maps.
//!
//! All trends are functions of the model period `t`, recovered from the
//! computational time through the logarithmic transform
//! `t = -ln(1 - tau) / vartheta`, which compresses the infinite horizon onto
//! `tau in [0, 1)`. This is a pure change of time variable for the benefit of
//! the external policy approximator; it carries no physical meaning.

use crate::parameters::EconParameters;
use crate::state::{EconState, PolicyValues};
use crate::variant::ModelVariant;
use cdice_core::errors::{CdiceError, CdiceResult};
use cdice_core::timeseries::FloatValue;

/// The economy-climate coupling: one model variant plus its parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    pub variant: ModelVariant,
    pub params: EconParameters,
}

impl Economy {
    pub fn new(variant: ModelVariant, params: EconParameters) -> Self {
        Self { variant, params }
    }

    pub fn dice2016() -> Self {
        Self::new(ModelVariant::Dice2016, EconParameters::dice2016())
    }

    pub fn dice2007() -> Self {
        Self::new(ModelVariant::Dice2007, EconParameters::dice2007())
    }

    pub fn cjl() -> Self {
        Self::new(ModelVariant::Cjl, EconParameters::cjl())
    }

    // ------------------------------------------------------------------
    // Computational and real time
    // ------------------------------------------------------------------

    /// Model period `t` corresponding to the computational time `tau`.
    pub fn real_time(&self, tau: FloatValue) -> CdiceResult<FloatValue> {
        if !(0.0..1.0).contains(&tau) {
            return Err(CdiceError::NumericalDomain {
                context: "time transform",
                message: format!("computational time must lie in [0, 1), got {tau}"),
            });
        }
        Ok(-(1.0 - tau).ln() / self.params.vartheta)
    }

    /// Computational time one period ahead of `tau`.
    pub fn tau_plus(&self, tau: FloatValue) -> CdiceResult<FloatValue> {
        let t = self.real_time(tau)?;
        Ok(1.0 - (-self.params.vartheta * (t + 1.0)).exp())
    }

    // ------------------------------------------------------------------
    // Exogenous trends
    // ------------------------------------------------------------------

    pub fn tfp(&self, t: FloatValue) -> FloatValue {
        self.variant.tfp(&self.params, t)
    }

    pub fn tfp_growth(&self, t: FloatValue) -> FloatValue {
        self.variant.tfp_growth(&self.params, t)
    }

    /// World population [billion] at period `t`.
    pub fn labor(&self, t: FloatValue) -> FloatValue {
        let p = &self.params;
        p.l0 + (p.l_infty - p.l0) * (1.0 - (-p.time_step_years * p.delta_l * t).exp())
    }

    /// Annual growth rate of the population at period `t`.
    pub fn labor_growth(&self, t: FloatValue) -> FloatValue {
        let p = &self.params;
        (p.time_step_years * p.delta_l)
            / ((p.l_infty / (p.l_infty - p.l0)) * (p.time_step_years * p.delta_l * t).exp() - 1.0)
    }

    pub fn carbon_intensity(&self, t: FloatValue) -> FloatValue {
        self.variant.carbon_intensity(&self.params, t)
    }

    /// Abatement-cost coefficient `theta1` at period `t`.
    pub fn backstop_coefficient(&self, t: FloatValue) -> FloatValue {
        self.variant
            .backstop_cost(&self.params, t, self.carbon_intensity(t))
    }

    /// Land-use carbon emission [1000 GtC/yr] at period `t`.
    pub fn land_emissions(&self, t: FloatValue) -> FloatValue {
        let p = &self.params;
        p.eland0 * (-p.time_step_years * p.delta_land * t).exp()
    }

    /// Exogenous non-CO2 forcing [W/m^2] at period `t`: a linear ramp from
    /// `fex0` to `fex1` over `fex_years`, constant afterwards.
    pub fn external_forcing(&self, t: FloatValue) -> FloatValue {
        let p = &self.params;
        let ramp_periods = (p.fex_years / p.time_step_years).floor();
        p.fex0 + (p.fex1 - p.fex0) / ramp_periods * t.min(ramp_periods)
    }

    /// Effective discount factor between period `t` and the next.
    pub fn discount_factor(&self, t: FloatValue) -> FloatValue {
        let p = &self.params;
        (-p.rho * p.time_step_years
            + (1.0 - 1.0 / p.psi) * self.tfp_growth(t)
            + self.labor_growth(t))
        .exp()
    }

    // ------------------------------------------------------------------
    // Transition coefficients, per model period
    // ------------------------------------------------------------------

    pub fn phi12(&self) -> FloatValue {
        self.params.time_step_years * self.params.phi12
    }

    pub fn phi23(&self) -> FloatValue {
        self.params.time_step_years * self.params.phi23
    }

    pub fn phi21(&self) -> FloatValue {
        let p = &self.params;
        self.variant
            .round_coefficient(p.mat_eq / p.muo_eq * self.phi12(), 2)
    }

    pub fn phi32(&self) -> FloatValue {
        let p = &self.params;
        self.variant
            .round_coefficient(p.muo_eq / p.mlo_eq * self.phi23(), 5)
    }

    pub fn varphi1(&self) -> FloatValue {
        self.params.time_step_years * self.params.varphi1
    }

    pub fn varphi21(&self) -> FloatValue {
        let p = &self.params;
        self.variant
            .round_coefficient(p.time_step_years * p.varphi1 * p.varphi3, 4)
    }

    pub fn varphi4(&self) -> FloatValue {
        self.params.time_step_years * self.params.varphi4
    }

    pub fn xi2(&self) -> FloatValue {
        let p = &self.params;
        self.variant
            .round_coefficient(p.time_step_years * p.varphi1 * p.f2xco2 / p.t2xco2, 3)
    }

    // ------------------------------------------------------------------
    // Economic definitions
    // ------------------------------------------------------------------

    /// Consumption implied by the budget multiplier, `lambd_hat^(-psi)`.
    pub fn consumption(&self, policy: &PolicyValues) -> FloatValue {
        policy.lambd_hat.powf(-self.params.psi)
    }

    /// Gross production in effective labor units.
    pub fn gross_output(&self, state: &EconState) -> FloatValue {
        state.zeta * state.k.powf(self.params.alpha)
    }

    /// Net production after climate damages, in effective labor units.
    pub fn net_output(&self, state: &EconState) -> FloatValue {
        let damage = self.variant.damage(&self.params, state.t_at);
        match self.variant {
            ModelVariant::Cjl | ModelVariant::Dice2007 => damage * self.gross_output(state),
            ModelVariant::Dice2016 => (1.0 - damage) * self.gross_output(state),
        }
    }

    /// Output lost to climate damages, in effective labor units.
    pub fn damages(&self, state: &EconState) -> FloatValue {
        self.gross_output(state) - self.net_output(state)
    }

    /// Net investment, in effective labor units.
    pub fn investment(&self, state: &EconState, policy: &PolicyValues) -> FloatValue {
        self.net_output(state) - self.consumption(policy)
    }

    /// Abatement cost as a share of gross output, `theta1 * mu^theta2`.
    pub fn abatement_cost(&self, t: FloatValue, mu: FloatValue) -> FloatValue {
        self.backstop_coefficient(t) * mu.powf(self.params.theta2)
    }

    /// Marginal abatement cost with respect to `mu`.
    pub fn abatement_cost_prime(&self, t: FloatValue, mu: FloatValue) -> FloatValue {
        self.backstop_coefficient(t) * self.params.theta2 * mu.powf(self.params.theta2 - 1.0)
    }

    /// Industrial carbon emission [1000 GtC per period] after abatement.
    pub fn industrial_emissions(
        &self,
        t: FloatValue,
        state: &EconState,
        policy: &PolicyValues,
    ) -> FloatValue {
        (1.0 - policy.mu)
            * self.carbon_intensity(t)
            * self.tfp(t)
            * self.labor(t)
            * self.gross_output(state)
    }

    /// Total carbon emission [1000 GtC per period] including land use.
    pub fn total_emissions(
        &self,
        t: FloatValue,
        state: &EconState,
        policy: &PolicyValues,
    ) -> FloatValue {
        self.industrial_emissions(t, state, policy) + self.land_emissions(t)
    }

    // ------------------------------------------------------------------
    // Next-period state maps
    // ------------------------------------------------------------------

    /// Atmospheric carbon mass next period.
    pub fn m_at_plus(&self, state: &EconState, policy: &PolicyValues) -> CdiceResult<FloatValue> {
        let t = self.real_time(state.tau)?;
        let dt = self.params.time_step_years;
        Ok((1.0 - self.phi12()) * state.m_at
            + self.phi21() * state.m_uo
            + dt * self.total_emissions(t, state, policy))
    }

    /// Upper-ocean carbon mass next period.
    pub fn m_uo_plus(&self, state: &EconState) -> FloatValue {
        self.phi12() * state.m_at + (1.0 - self.phi21() - self.phi23()) * state.m_uo
            + self.phi32() * state.m_lo
    }

    /// Lower-ocean carbon mass next period.
    pub fn m_lo_plus(&self, state: &EconState) -> FloatValue {
        self.phi23() * state.m_uo + (1.0 - self.phi32()) * state.m_lo
    }

    /// Atmospheric temperature next period.
    pub fn t_at_plus(&self, state: &EconState) -> CdiceResult<FloatValue> {
        let t = self.real_time(state.tau)?;
        let p = &self.params;
        let ratio = state.m_at / p.mat_base;
        if !(ratio > 0.0) {
            return Err(CdiceError::NumericalDomain {
                context: "temperature transition",
                message: format!(
                    "atmospheric mass ratio must be positive, got {} / {}",
                    state.m_at, p.mat_base
                ),
            });
        }
        let forcing = p.f2xco2 * ratio.ln() / 2_f64.ln() + self.external_forcing(t);
        Ok((1.0 - self.varphi21() - self.xi2()) * state.t_at
            + self.varphi21() * state.t_oc
            + self.varphi1() * forcing)
    }

    /// Ocean temperature next period.
    pub fn t_oc_plus(&self, state: &EconState) -> FloatValue {
        self.varphi4() * state.t_at + (1.0 - self.varphi4()) * state.t_oc
    }

    /// Deterministic next-period state under a candidate policy: the laws of
    /// motion for capital, carbon, temperature and the AR(1) shock, with the
    /// shock innovation at zero.
    pub fn next_state(&self, state: &EconState, policy: &PolicyValues) -> CdiceResult<EconState> {
        if !(state.zeta > 0.0) {
            return Err(CdiceError::NumericalDomain {
                context: "productivity shock transition",
                message: format!("shock level must be positive, got {}", state.zeta),
            });
        }
        Ok(EconState {
            k: policy.k_plus,
            m_at: self.m_at_plus(state, policy)?,
            m_uo: self.m_uo_plus(state),
            m_lo: self.m_lo_plus(state),
            t_at: self.t_at_plus(state)?,
            t_oc: self.t_oc_plus(state),
            zeta: (state.zeta.ln() + state.chi).exp(),
            chi: self.params.shock_persistence * state.chi,
            tau: self.tau_plus(state.tau)?,
        })
    }

    /// Social cost of carbon: the marginal value of atmospheric carbon
    /// relative to the marginal value of capital, de-normalized to output
    /// units.
    pub fn social_cost_of_carbon(
        &self,
        state: &EconState,
        policy: &PolicyValues,
    ) -> CdiceResult<FloatValue> {
        let t = self.real_time(state.tau)?;
        let p = &self.params;
        let dt = p.time_step_years;
        let damage = self.variant.damage(p, state.t_at);
        let marginal_product = p.alpha * state.k.powf(p.alpha - 1.0);
        let retention = match self.variant {
            ModelVariant::Cjl | ModelVariant::Dice2007 => damage,
            ModelVariant::Dice2016 => 1.0 - damage,
        };
        let dvdk = policy.lambd_hat
            * (dt * retention * marginal_product + (1.0 - p.delta).powf(dt))
            + (-policy.nu_at_hat)
                * dt
                * self.carbon_intensity(t)
                * state.zeta
                * self.tfp(t)
                * self.labor(t)
                * marginal_product;

        if !(state.m_at > 0.0) {
            return Err(CdiceError::NumericalDomain {
                context: "social cost of carbon",
                message: format!("atmospheric mass must be positive, got {}", state.m_at),
            });
        }
        let dvdmat = (-policy.nu_at_hat) * (1.0 - self.phi12())
            + policy.nu_uo_hat * self.phi12()
            + policy.eta_at_hat * self.varphi1() * p.f2xco2 / (2_f64.ln() * state.m_at);

        Ok(-dvdmat / dvdk * self.tfp(t) * self.labor(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Shadow-price signs as they come out at an optimum: carbon and
    // temperature are liabilities.
    fn plausible_policy() -> PolicyValues {
        PolicyValues {
            k_plus: 1.05,
            mu: 0.2,
            lambd_hat: 1.1,
            nu_at_hat: 0.05,
            nu_uo_hat: -0.01,
            nu_lo_hat: -0.005,
            eta_at_hat: -0.03,
            eta_oc_hat: -0.01,
        }
    }

    #[test]
    fn real_time_starts_at_zero_and_advances_by_one() {
        let economy = Economy::dice2016();
        assert_eq!(economy.real_time(0.0).unwrap(), 0.0);

        let mut tau = 0.0;
        for expected in 1..50 {
            tau = economy.tau_plus(tau).unwrap();
            assert!(tau < 1.0);
            assert_relative_eq!(
                economy.real_time(tau).unwrap(),
                expected as f64,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn out_of_range_tau_is_a_domain_error() {
        let economy = Economy::dice2016();
        assert!(economy.real_time(1.0).is_err());
        assert!(economy.real_time(-0.1).is_err());
    }

    #[test]
    fn labor_converges_to_its_asymptote() {
        let economy = Economy::dice2016();
        assert_relative_eq!(economy.labor(0.0), 7.403, max_relative = 1e-12);
        assert!(economy.labor(1000.0) < 11.5);
        assert_relative_eq!(economy.labor(1000.0), 11.5, max_relative = 1e-6);
        // Growth rate declines towards zero.
        assert!(economy.labor_growth(100.0) < economy.labor_growth(0.0));
    }

    #[test]
    fn discount_factor_is_below_one_at_default_calibration() {
        let economy = Economy::dice2016();
        let beta = economy.discount_factor(0.0);
        assert!(beta > 0.9 && beta < 1.0, "beta_hat = {beta}");
    }

    #[test]
    fn carbon_transition_conserves_mass_without_emissions() {
        let mut params = EconParameters::dice2016();
        params.eland0 = 0.0;
        let economy = Economy::new(ModelVariant::Dice2016, params);

        let state = EconState::default();
        let policy = PolicyValues {
            mu: 1.0, // full abatement: no industrial emissions
            ..plausible_policy()
        };

        let total = state.m_at + state.m_uo + state.m_lo;
        let total_plus = economy.m_at_plus(&state, &policy).unwrap()
            + economy.m_uo_plus(&state)
            + economy.m_lo_plus(&state);
        assert_relative_eq!(total_plus, total, max_relative = 1e-12);
    }

    #[test]
    fn emissions_add_to_the_atmosphere() {
        let economy = Economy::dice2016();
        let state = EconState::default();
        let abated = PolicyValues {
            mu: 1.0,
            ..plausible_policy()
        };
        let unabated = PolicyValues {
            mu: 0.0,
            ..plausible_policy()
        };
        let with = economy.m_at_plus(&state, &unabated).unwrap();
        let without = economy.m_at_plus(&state, &abated).unwrap();
        assert!(with > without);
    }

    #[test]
    fn equal_layer_temperatures_are_stationary_for_the_ocean() {
        let economy = Economy::dice2016();
        let state = EconState {
            t_at: 1.3,
            t_oc: 1.3,
            ..EconState::default()
        };
        assert_relative_eq!(economy.t_oc_plus(&state), 1.3, max_relative = 1e-12);
    }

    #[test]
    fn doubling_the_atmosphere_warms() {
        let economy = Economy::dice2016();
        let base = EconState::default();
        let doubled = EconState {
            m_at: 2.0 * base.m_at,
            ..base
        };
        assert!(economy.t_at_plus(&doubled).unwrap() > economy.t_at_plus(&base).unwrap());
    }

    #[test]
    fn nonpositive_atmospheric_mass_is_a_domain_error() {
        let economy = Economy::dice2016();
        let state = EconState {
            m_at: 0.0,
            ..EconState::default()
        };
        assert!(economy.t_at_plus(&state).is_err());
    }

    #[test]
    fn next_state_advances_shock_and_time() {
        let economy = Economy::dice2016();
        let state = EconState {
            chi: 0.02,
            ..EconState::default()
        };
        let next = economy.next_state(&state, &plausible_policy()).unwrap();
        assert_relative_eq!(next.zeta, (0.02_f64).exp(), max_relative = 1e-12);
        assert_relative_eq!(next.chi, 0.9 * 0.02, max_relative = 1e-12);
        assert_eq!(next.k, 1.05);
        assert!(next.tau > state.tau);
    }

    #[test]
    fn cjl_rounds_its_transition_coefficients() {
        let economy = Economy::cjl();
        let p = &economy.params;
        let exact = p.mat_eq / p.muo_eq * p.time_step_years * p.phi12;
        assert_relative_eq!(economy.phi21(), (exact * 100.0).round() / 100.0);
        assert_ne!(economy.phi21(), exact);

        let economy = Economy::dice2016();
        let exact = p.mat_eq / p.muo_eq * p.time_step_years * p.phi12;
        assert_relative_eq!(economy.phi21(), exact, max_relative = 1e-15);
    }

    #[test]
    fn budget_identity_links_investment_and_consumption() {
        let economy = Economy::dice2016();
        let state = EconState::default();
        let policy = plausible_policy();
        assert_relative_eq!(
            economy.investment(&state, &policy),
            economy.net_output(&state) - economy.consumption(&policy),
            max_relative = 1e-12
        );
    }

    #[test]
    fn social_cost_of_carbon_is_finite_and_positive() {
        let economy = Economy::dice2016();
        let scc = economy
            .social_cost_of_carbon(&EconState::default(), &plausible_policy())
            .unwrap();
        assert!(scc.is_finite());
        // With a negative shadow price on atmospheric carbon the externality
        // has a positive price.
        assert!(scc > 0.0, "scc = {scc}");
    }

    #[test]
    fn external_forcing_ramp_saturates() {
        let economy = Economy::dice2016();
        assert_relative_eq!(economy.external_forcing(0.0), 0.5);
        assert_relative_eq!(economy.external_forcing(85.0), 1.0);
        assert_relative_eq!(economy.external_forcing(300.0), 1.0);
    }
}
