//! Structural model variants.
//!
//! The DICE family differs across vintages in the functional form of the
//! climate damage function, the sign convention of the output-netting
//! equation, the backstop-cost formula and the carbon-intensity trend. The
//! variant is selected once at configuration time and injected into every
//! trend and residual evaluation, so no per-call string dispatch is needed.

use crate::parameters::EconParameters;
use cdice_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    /// The cjl vintage: DICE-2007 forms with transition coefficients rounded
    /// to the published figures.
    Cjl,
    Dice2007,
    Dice2016,
}

impl ModelVariant {
    /// Climate damage function `Omega(T_AT)`.
    ///
    /// For `Cjl`/`Dice2007` this is an output-retention factor
    /// `1 / (1 + pi1*T^pow1 + pi2*T^pow2)`; for `Dice2016` it is the damaged
    /// output share `pi1*T^pow1 + pi2*T^pow2`.
    pub fn damage(&self, p: &EconParameters, t_at: FloatValue) -> FloatValue {
        let polynomial = p.pi1 * t_at.powf(p.pow1) + p.pi2 * t_at.powf(p.pow2);
        match self {
            ModelVariant::Cjl | ModelVariant::Dice2007 => 1.0 / (1.0 + polynomial),
            ModelVariant::Dice2016 => polynomial,
        }
    }

    /// First derivative of the damage function with respect to `T_AT`.
    pub fn damage_prime(&self, p: &EconParameters, t_at: FloatValue) -> FloatValue {
        let polynomial_prime =
            p.pow1 * p.pi1 * t_at.powf(p.pow1 - 1.0) + p.pow2 * p.pi2 * t_at.powf(p.pow2 - 1.0);
        match self {
            ModelVariant::Cjl | ModelVariant::Dice2007 => {
                let polynomial = p.pi1 * t_at.powf(p.pow1) + p.pi2 * t_at.powf(p.pow2);
                -polynomial_prime / (1.0 + polynomial).powi(2)
            }
            ModelVariant::Dice2016 => polynomial_prime,
        }
    }

    /// Fraction of gross output left after abatement cost and damages.
    pub fn net_output_factor(
        &self,
        abatement_cost: FloatValue,
        damage: FloatValue,
    ) -> FloatValue {
        match self {
            ModelVariant::Cjl | ModelVariant::Dice2007 => (1.0 - abatement_cost) * damage,
            ModelVariant::Dice2016 => 1.0 - abatement_cost - damage,
        }
    }

    /// Damage factor multiplying the marginal abatement-cost term; the
    /// multiplicative-damage vintages scale it by `Omega`.
    pub fn abatement_output_scale(&self, damage: FloatValue) -> FloatValue {
        match self {
            ModelVariant::Cjl | ModelVariant::Dice2007 => damage,
            ModelVariant::Dice2016 => 1.0,
        }
    }

    /// Gradient of net output with respect to the atmospheric temperature,
    /// per unit of gross output.
    pub fn temperature_output_gradient(
        &self,
        abatement_cost: FloatValue,
        damage_prime: FloatValue,
    ) -> FloatValue {
        match self {
            ModelVariant::Cjl | ModelVariant::Dice2007 => (1.0 - abatement_cost) * damage_prime,
            ModelVariant::Dice2016 => -damage_prime,
        }
    }

    /// Deterministic TFP level at period `t`.
    pub fn tfp(&self, p: &EconParameters, t: FloatValue) -> FloatValue {
        let dt = p.time_step_years;
        let growth = match self {
            ModelVariant::Dice2016 | ModelVariant::Dice2007 => dt * p.g_tfp0 * p.tfp_adjustment,
            ModelVariant::Cjl => dt * p.g_tfp0,
        };
        p.tfp0 * (growth * (1.0 - (-dt * p.delta_tfp * t).exp()) / (dt * p.delta_tfp)).exp()
    }

    /// Annual growth rate of the deterministic TFP level at period `t`.
    pub fn tfp_growth(&self, p: &EconParameters, t: FloatValue) -> FloatValue {
        let dt = p.time_step_years;
        let growth = match self {
            ModelVariant::Dice2016 | ModelVariant::Dice2007 => dt * p.g_tfp0 * p.tfp_adjustment,
            ModelVariant::Cjl => dt * p.g_tfp0,
        };
        growth * (-dt * p.delta_tfp * t).exp()
    }

    /// Carbon intensity of gross output at period `t`.
    pub fn carbon_intensity(&self, p: &EconParameters, t: FloatValue) -> FloatValue {
        let dt = p.time_step_years;
        match self {
            ModelVariant::Cjl | ModelVariant::Dice2007 => p.sigma0
                * ((dt * p.g_sigma0) * (1.0 - (-dt * p.delta_sigma * t).exp())
                    / (dt * p.delta_sigma))
                    .exp(),
            ModelVariant::Dice2016 => p.sigma0
                * (dt * p.g_sigma0 / (1.0 + dt * p.delta_sigma).ln()
                    * ((1.0 + dt * p.delta_sigma).powf(t) - 1.0))
                    .exp(),
        }
    }

    /// Abatement-cost coefficient `theta1` at period `t`, from the backstop
    /// price path and the carbon intensity at the same period.
    pub fn backstop_cost(
        &self,
        p: &EconParameters,
        t: FloatValue,
        carbon_intensity: FloatValue,
    ) -> FloatValue {
        let dt = p.time_step_years;
        match self {
            ModelVariant::Cjl | ModelVariant::Dice2007 => {
                p.pback * (1000.0 * carbon_intensity) * (1.0 + (-dt * p.gback * t).exp())
                    / p.theta2
            }
            ModelVariant::Dice2016 => {
                p.pback * (1000.0 * p.c2co2 * carbon_intensity) * (-dt * p.gback * t).exp()
                    / p.theta2
            }
        }
    }

    /// The cjl vintage works with transition coefficients rounded to the
    /// published number of digits; the other vintages keep full precision.
    pub fn round_coefficient(&self, value: FloatValue, digits: u32) -> FloatValue {
        match self {
            ModelVariant::Cjl => {
                let scale = 10_f64.powi(digits as i32);
                (value * scale).round() / scale
            }
            ModelVariant::Dice2007 | ModelVariant::Dice2016 => value,
        }
    }
}
