//! The Euler-equation residual system.
//!
//! At the optimal policy every residual is zero in conditional expectation
//! over next-period productivity shocks; the budget constraint holds exactly,
//! not just in expectation. An external solver drives these residuals to zero
//! by adjusting the policy function.
//!
//! The expectation operator belongs to that external solver; it enters here
//! through the [`Expectation`] trait, which integrates a function of the
//! next-period state and policy over the shock distribution. Residuals at
//! different sampled states are independent, so batched evaluation is a plain
//! map over states.

use crate::economy::Economy;
use crate::state::{EconState, PolicyValues};
use cdice_core::errors::{CdiceError, CdiceResult};
use cdice_core::timeseries::FloatValue;

/// Smoothed complementarity: `a + b - sqrt(a^2 + b^2)` is zero iff `a >= 0`,
/// `b >= 0` and `a*b = 0`, turning a KKT condition into a smooth equation.
pub fn fischer_burmeister(a: FloatValue, b: FloatValue) -> FloatValue {
    a + b - (a * a + b * b).sqrt()
}

/// Expectation over next-period states and policies.
///
/// Implementations integrate `integrand(next_state, next_policy)` over the
/// shock distribution of the external solver.
pub trait Expectation {
    fn expect(
        &self,
        integrand: &mut dyn FnMut(&EconState, &PolicyValues) -> CdiceResult<FloatValue>,
    ) -> CdiceResult<FloatValue>;
}

/// Degenerate (deterministic) expectation: a single next-period realization.
pub struct Deterministic<'a> {
    pub next_state: &'a EconState,
    pub next_policy: &'a PolicyValues,
}

impl Expectation for Deterministic<'_> {
    fn expect(
        &self,
        integrand: &mut dyn FnMut(&EconState, &PolicyValues) -> CdiceResult<FloatValue>,
    ) -> CdiceResult<FloatValue> {
        integrand(self.next_state, self.next_policy)
    }
}

/// One realization of the next-period shock with its probability.
#[derive(Debug, Clone)]
pub struct ShockOutcome {
    pub probability: FloatValue,
    pub state: EconState,
    pub policy: PolicyValues,
}

/// Expectation over a finite shock distribution (e.g. quadrature nodes).
pub struct DiscreteDistribution {
    pub outcomes: Vec<ShockOutcome>,
}

impl DiscreteDistribution {
    pub fn new(outcomes: Vec<ShockOutcome>) -> Self {
        let total: FloatValue = outcomes.iter().map(|o| o.probability).sum();
        if (total - 1.0).abs() > 1e-9 {
            log::warn!("shock probabilities sum to {total}, not 1");
        }
        Self { outcomes }
    }
}

impl Expectation for DiscreteDistribution {
    fn expect(
        &self,
        integrand: &mut dyn FnMut(&EconState, &PolicyValues) -> CdiceResult<FloatValue>,
    ) -> CdiceResult<FloatValue> {
        let mut sum = 0.0;
        for outcome in &self.outcomes {
            sum += outcome.probability * integrand(&outcome.state, &outcome.policy)?;
        }
        Ok(sum)
    }
}

/// The residuals of the first-order-condition system at one (state, policy)
/// pair. All are zero at the optimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerResidualSet {
    /// Euler equation for capital.
    pub foc_kplus: FloatValue,
    /// Period budget constraint (an exact equality, not a stochastic Euler
    /// equation).
    pub foc_lambd: FloatValue,
    /// Smoothed complementarity for the abatement box constraint.
    pub kkt_mu_fb: FloatValue,
    /// Co-state recursion for atmospheric carbon.
    pub foc_mat_plus: FloatValue,
    /// Co-state recursion for upper-ocean carbon.
    pub foc_muo_plus: FloatValue,
    /// Co-state recursion for lower-ocean carbon.
    pub foc_mlo_plus: FloatValue,
    /// Co-state recursion for the atmospheric temperature layer.
    pub foc_tat_plus: FloatValue,
    /// Co-state recursion for the ocean temperature layer.
    pub foc_toc_plus: FloatValue,
}

impl EulerResidualSet {
    /// The residuals under their published keys, for loss dictionaries and
    /// diagnostics.
    pub fn named(&self) -> [(&'static str, FloatValue); 8] {
        [
            ("foc_kplus", self.foc_kplus),
            ("foc_lambd", self.foc_lambd),
            ("kkt_mu_fb", self.kkt_mu_fb),
            ("foc_MATplus", self.foc_mat_plus),
            ("foc_MUOplus", self.foc_muo_plus),
            ("foc_MLOplus", self.foc_mlo_plus),
            ("foc_TATplus", self.foc_tat_plus),
            ("foc_TOCplus", self.foc_toc_plus),
        ]
    }

    /// Largest residual magnitude, a convergence diagnostic.
    pub fn max_abs(&self) -> FloatValue {
        self.named()
            .iter()
            .map(|(_, value)| value.abs())
            .fold(0.0, FloatValue::max)
    }
}

impl Economy {
    /// Evaluate the full residual system at one (state, policy) pair.
    ///
    /// `expectation` integrates the next-period terms over the shock
    /// distribution; for a deterministic model pass [`Deterministic`] with
    /// the single next-period realization.
    pub fn residuals(
        &self,
        state: &EconState,
        policy: &PolicyValues,
        expectation: &dyn Expectation,
    ) -> CdiceResult<EulerResidualSet> {
        let p = &self.params;
        let dt = p.time_step_years;
        let alpha = p.alpha;

        let t = self.real_time(state.tau)?;
        let growth = (dt * (self.tfp_growth(t) + self.labor_growth(t))).exp();
        let depreciation = (1.0 - p.delta).powf(dt);
        let beta_hat = self.discount_factor(t);

        let damage = self.variant.damage(p, state.t_at);
        let abatement = self.abatement_cost(t, policy.mu);
        let abatement_prime = self.abatement_cost_prime(t, policy.mu);
        let gross = self.gross_output(state);
        let consumption = self.consumption(policy);

        let phi12 = self.phi12();
        let phi21 = self.phi21();
        let phi23 = self.phi23();
        let phi32 = self.phi32();
        let varphi1 = self.varphi1();
        let varphi21 = self.varphi21();
        let varphi4 = self.varphi4();
        let xi2 = self.xi2();

        let m_at_plus = self.m_at_plus(state, policy)?;
        if !(m_at_plus > 0.0) {
            return Err(CdiceError::NumericalDomain {
                context: "Euler residuals",
                message: format!("next-period atmospheric mass must be positive, got {m_at_plus}"),
            });
        }

        let k_plus = policy.k_plus;

        // Euler equation for capital: marginal utility today against the
        // discounted expected marginal return, including the emission channel
        // of capital through the atmospheric co-state.
        let foc_kplus = growth * policy.lambd_hat
            - beta_hat
                * expectation.expect(&mut |s, ps| {
                    let t_next = self.real_time(s.tau)?;
                    let damage_next = self.variant.damage(p, s.t_at);
                    let abatement_next = self.abatement_cost(t_next, ps.mu);
                    let marginal_product = s.zeta * alpha * k_plus.powf(alpha - 1.0);
                    Ok(ps.lambd_hat
                        * (dt * self.variant.net_output_factor(abatement_next, damage_next)
                            * marginal_product
                            + depreciation)
                        + (-ps.nu_at_hat)
                            * (1.0 - ps.mu)
                            * dt
                            * self.carbon_intensity(t_next)
                            * self.tfp(t_next)
                            * self.labor(t_next)
                            * marginal_product)
                })?;

        // Budget constraint: output net of damages and abatement, minus
        // consumption and net capital formation. Holds exactly.
        let foc_lambd = dt * self.variant.net_output_factor(abatement, damage) * gross
            - dt * consumption
            + depreciation * state.k
            - growth * k_plus;

        // Complementarity for 0 <= mu <= 1, smoothed with the
        // Fischer-Burmeister function.
        let lambd_mu_hat = -policy.lambd_hat
            * dt
            * abatement_prime
            * self.variant.abatement_output_scale(damage)
            * gross
            - (-policy.nu_at_hat)
                * dt
                * self.carbon_intensity(t)
                * self.tfp(t)
                * self.labor(t)
                * gross;
        let kkt_mu_fb = fischer_burmeister(lambd_mu_hat, 1.0 - policy.mu);

        // Co-state recursion for the atmospheric temperature layer.
        let foc_tat_plus = policy.eta_at_hat
            - beta_hat
                * expectation.expect(&mut |s, ps| {
                    let damage_prime_next = self.variant.damage_prime(p, s.t_at);
                    Ok(ps.lambd_hat
                        * dt
                        * self
                            .variant
                            .temperature_output_gradient(abatement, damage_prime_next)
                        * s.zeta
                        * k_plus.powf(alpha)
                        + ps.eta_at_hat * (1.0 - varphi21 - xi2)
                        + ps.eta_oc_hat * varphi4)
                })?;

        // Co-state recursion for atmospheric carbon; the forcing channel uses
        // the next-period mass determined by today's transition.
        let foc_mat_plus = (-policy.nu_at_hat)
            - beta_hat
                * expectation.expect(&mut |_s, ps| {
                    Ok((-ps.nu_at_hat) * (1.0 - phi12)
                        + ps.nu_uo_hat * phi12
                        + ps.eta_at_hat * varphi1 * p.f2xco2
                            / (2_f64.ln() * m_at_plus))
                })?;

        // Co-state recursion for upper-ocean carbon.
        let foc_muo_plus = policy.nu_uo_hat
            - beta_hat
                * expectation.expect(&mut |_s, ps| {
                    Ok((-ps.nu_at_hat) * phi21
                        + ps.nu_uo_hat * (1.0 - phi21 - phi23)
                        + ps.nu_lo_hat * phi23)
                })?;

        // Co-state recursion for lower-ocean carbon.
        let foc_mlo_plus = policy.nu_lo_hat
            - beta_hat
                * expectation.expect(&mut |_s, ps| {
                    Ok(ps.nu_uo_hat * phi32 + ps.nu_lo_hat * (1.0 - phi32))
                })?;

        // Co-state recursion for the ocean temperature layer.
        let foc_toc_plus = policy.eta_oc_hat
            - beta_hat
                * expectation.expect(&mut |_s, ps| {
                    Ok(ps.eta_at_hat * varphi21 + ps.eta_oc_hat * (1.0 - varphi4))
                })?;

        Ok(EulerResidualSet {
            foc_kplus,
            foc_lambd,
            kkt_mu_fb,
            foc_mat_plus,
            foc_muo_plus,
            foc_mlo_plus,
            foc_tat_plus,
            foc_toc_plus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::EconParameters;
    use crate::variant::ModelVariant;
    use approx::assert_relative_eq;

    fn policy() -> PolicyValues {
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

    mod fischer_burmeister_fn {
        use super::*;

        #[test]
        fn zero_on_the_complementarity_set() {
            // a = 0, b >= 0 and a >= 0, b = 0 both satisfy the condition.
            for b in [0.0, 0.5, 2.0, 100.0] {
                assert_relative_eq!(fischer_burmeister(0.0, b), 0.0, epsilon = 1e-12);
                assert_relative_eq!(fischer_burmeister(b, 0.0), 0.0, epsilon = 1e-12);
            }
        }

        #[test]
        fn nonzero_away_from_the_set() {
            // Both strictly positive: residual is positive.
            assert!(fischer_burmeister(1.0, 1.0) > 0.0);
            // One strictly negative: residual is negative.
            assert!(fischer_burmeister(-0.5, 1.0) < 0.0);
            assert!(fischer_burmeister(-1.0, -1.0) < 0.0);
        }

        #[test]
        fn bounded_by_the_smaller_argument() {
            for a in [0.1, 0.7, 3.0] {
                for b in [0.2, 1.5, 10.0] {
                    assert!(fischer_burmeister(a, b) <= a.min(b) + 1e-12);
                }
            }
        }
    }

    #[test]
    fn lower_ocean_costate_fixed_point_has_zero_residual() {
        let economy = Economy::dice2016();
        let state = EconState::default();
        let t = economy.real_time(state.tau).unwrap();
        let beta = economy.discount_factor(t);
        let phi32 = economy.phi32();

        // Solve nu_lo = beta * (nu_uo * phi32 + nu_lo * (1 - phi32)) for a
        // stationary next period identical to today.
        let nu_uo = -0.01;
        let nu_lo = beta * phi32 * nu_uo / (1.0 - beta * (1.0 - phi32));
        let policy = PolicyValues {
            nu_uo_hat: nu_uo,
            nu_lo_hat: nu_lo,
            ..policy()
        };

        let expectation = Deterministic {
            next_state: &state,
            next_policy: &policy,
        };
        let residuals = economy.residuals(&state, &policy, &expectation).unwrap();
        assert_relative_eq!(residuals.foc_mlo_plus, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn ocean_temperature_costate_fixed_point_has_zero_residual() {
        let economy = Economy::dice2016();
        let state = EconState::default();
        let t = economy.real_time(state.tau).unwrap();
        let beta = economy.discount_factor(t);
        let varphi21 = economy.varphi21();
        let varphi4 = economy.varphi4();

        let eta_at = -0.03;
        let eta_oc = beta * varphi21 * eta_at / (1.0 - beta * (1.0 - varphi4));
        let policy = PolicyValues {
            eta_at_hat: eta_at,
            eta_oc_hat: eta_oc,
            ..policy()
        };

        let expectation = Deterministic {
            next_state: &state,
            next_policy: &policy,
        };
        let residuals = economy.residuals(&state, &policy, &expectation).unwrap();
        assert_relative_eq!(residuals.foc_toc_plus, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn budget_feasible_capital_choice_zeroes_the_constraint() {
        let economy = Economy::dice2016();
        let state = EconState::default();
        let base = policy();

        let t = economy.real_time(state.tau).unwrap();
        let dt = economy.params.time_step_years;
        let growth =
            (dt * (economy.tfp_growth(t) + economy.labor_growth(t))).exp();
        let depreciation = (1.0 - economy.params.delta).powf(dt);
        let damage = economy.variant.damage(&economy.params, state.t_at);
        let abatement = economy.abatement_cost(t, base.mu);
        let net = economy.variant.net_output_factor(abatement, damage);

        let k_plus = (dt * net * economy.gross_output(&state)
            - dt * economy.consumption(&base)
            + depreciation * state.k)
            / growth;
        let policy = PolicyValues { k_plus, ..base };

        let expectation = Deterministic {
            next_state: &state,
            next_policy: &policy,
        };
        let residuals = economy.residuals(&state, &policy, &expectation).unwrap();
        assert_relative_eq!(residuals.foc_lambd, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn full_abatement_zeroes_the_kkt_residual_when_profitable() {
        // At mu = 1 the box constraint binds: b = 1 - mu = 0, and the
        // Fischer-Burmeister residual vanishes for any nonnegative
        // first-order term.
        let economy = Economy::dice2016();
        let state = EconState::default();
        // A strongly negative carbon co-state makes abatement strictly
        // profitable at the margin.
        let policy = PolicyValues {
            mu: 1.0,
            nu_at_hat: 100.0,
            ..policy()
        };
        let next = economy.next_state(&state, &policy).unwrap();
        let expectation = Deterministic {
            next_state: &next,
            next_policy: &policy,
        };
        let residuals = economy.residuals(&state, &policy, &expectation).unwrap();
        assert!(residuals.kkt_mu_fb >= 0.0);
    }

    #[test]
    fn residuals_are_finite_for_all_variants() {
        for economy in [Economy::dice2016(), Economy::dice2007(), Economy::cjl()] {
            let state = EconState::default();
            let policy = policy();
            let next = economy.next_state(&state, &policy).unwrap();
            let expectation = Deterministic {
                next_state: &next,
                next_policy: &policy,
            };
            let residuals = economy.residuals(&state, &policy, &expectation).unwrap();
            for (name, value) in residuals.named() {
                assert!(value.is_finite(), "{name} is not finite");
            }
            assert!(residuals.max_abs().is_finite());
        }
    }

    #[test]
    fn discrete_distribution_averages_outcomes() {
        let economy = Economy::dice2016();
        let state = EconState::default();
        let policy = policy();
        let next = economy.next_state(&state, &policy).unwrap();

        // Two equally likely identical outcomes must agree with the
        // deterministic evaluation.
        let distribution = DiscreteDistribution::new(vec![
            ShockOutcome {
                probability: 0.5,
                state: next,
                policy,
            },
            ShockOutcome {
                probability: 0.5,
                state: next,
                policy,
            },
        ]);
        let deterministic = Deterministic {
            next_state: &next,
            next_policy: &policy,
        };

        let from_distribution = economy.residuals(&state, &policy, &distribution).unwrap();
        let from_deterministic = economy.residuals(&state, &policy, &deterministic).unwrap();
        for (a, b) in from_distribution
            .named()
            .iter()
            .zip(from_deterministic.named().iter())
        {
            assert_relative_eq!(a.1, b.1, max_relative = 1e-12);
        }
    }

    #[test]
    fn nonpositive_next_mass_is_a_domain_error() {
        let mut params = EconParameters::dice2016();
        params.mat_base = 0.607;
        let economy = Economy::new(ModelVariant::Dice2016, params);
        let state = EconState {
            m_at: -1.0,
            m_uo: 0.0,
            m_lo: 0.0,
            ..EconState::default()
        };
        let policy = policy();
        let expectation = Deterministic {
            next_state: &state,
            next_policy: &policy,
        };
        assert!(economy.residuals(&state, &policy, &expectation).is_err());
    }
}
