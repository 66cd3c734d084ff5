//! Two-layer energy-balance climate model.
//!
//! Temperature deviations of an atmosphere-plus-upper-ocean layer and a
//! lower-ocean layer respond to radiative forcing through an explicit Euler
//! step:
//!
//! ```text
//! T0' = T0 + dt * c1 * (F - c2*T0 - c3*(T0 - T1))
//! T1' = T1 + dt * c4 * (T0 - T1)
//! ```
//!
//! with the time step factored out of the coefficients, so `dt` is arbitrary
//! and for `dt = 1` the update reduces to the historical one-year-step form.
//! `c2` is the climate feedback parameter and is always derived as
//! `fco22x / t2xco2`, never set directly.
//!
//! The coefficients map bijectively onto the two-layer parameterization of
//! Geoffroy et al. (2013): `c1 = 1/C`, `c3 = gamma`, `c4 = gamma/C0` with `C`
//! and `C0` the effective heat capacities of the two layers and `gamma` the
//! heat-exchange coefficient.

use crate::errors::{CdiceError, CdiceResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Coefficients of the two-layer energy-balance model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateParameters {
    /// Forcing of an equilibrium CO2 doubling [W/m^2].
    pub fco22x: FloatValue,
    /// Equilibrium climate sensitivity [K per CO2 doubling].
    pub t2xco2: FloatValue,
    /// Inverse effective heat capacity of the upper layer [m^2 K / (W yr)].
    pub c1: FloatValue,
    /// Heat-exchange coefficient from upper to lower layer [W / (m^2 K)].
    pub c3: FloatValue,
    /// Heat-exchange coefficient over lower-layer heat capacity [1/yr].
    pub c4: FloatValue,
}

impl Default for ClimateParameters {
    fn default() -> Self {
        Self::dice2016_corrected()
    }
}

impl ClimateParameters {
    /// DICE-2016 coefficients with the five-year step factored out.
    pub fn dice2016_corrected() -> Self {
        Self {
            fco22x: 3.6813,
            t2xco2: 3.1,
            c1: 0.1005,
            c3: 0.088 / 0.1005,
            c4: 0.025 / 5.0,
        }
    }

    /// Recalibrated annual-step values fitted against the Geoffroy et al.
    /// (2013) CMIP5 ensemble.
    pub fn cdice() -> Self {
        Self {
            fco22x: 3.45,
            t2xco2: 3.25,
            c1: 0.137,
            c3: 0.73,
            c4: 0.00689,
        }
    }

    /// Build the coefficients from the Geoffroy et al. (2013) two-layer
    /// parameterization.
    pub fn from_two_layer(
        heat_capacity_upper: FloatValue,
        heat_exchange: FloatValue,
        heat_capacity_lower: FloatValue,
        fco22x: FloatValue,
        t2xco2: FloatValue,
    ) -> CdiceResult<Self> {
        if !(heat_capacity_upper > 0.0) || !(heat_capacity_lower > 0.0) {
            return Err(CdiceError::NumericalDomain {
                context: "two-layer climate parameters",
                message: format!(
                    "heat capacities must be positive, got C={heat_capacity_upper}, C0={heat_capacity_lower}"
                ),
            });
        }
        Self {
            fco22x,
            t2xco2,
            c1: 1.0 / heat_capacity_upper,
            c3: heat_exchange,
            c4: heat_exchange / heat_capacity_lower,
        }
        .validated()
    }

    /// Climate feedback parameter `c2 = fco22x / t2xco2` [W / (m^2 K)].
    pub fn lambda(&self) -> FloatValue {
        self.fco22x / self.t2xco2
    }

    /// Effective heat capacity of the upper layer, `C = 1/c1`.
    pub fn heat_capacity_upper(&self) -> FloatValue {
        1.0 / self.c1
    }

    /// Heat-exchange coefficient, `gamma = c3`.
    pub fn heat_exchange(&self) -> FloatValue {
        self.c3
    }

    /// Effective heat capacity of the lower layer, `C0 = c3/c4`.
    pub fn heat_capacity_lower(&self) -> FloatValue {
        self.c3 / self.c4
    }

    /// Equilibrium temperature of both layers under constant forcing.
    pub fn equilibrium_temperature(&self, forcing: FloatValue) -> FloatValue {
        forcing / self.lambda()
    }

    /// Advance both layer temperatures by one explicit Euler step. Both
    /// layers are advanced from the same prior-step snapshot.
    pub fn step(
        &self,
        temperature: [FloatValue; 2],
        forcing: FloatValue,
        step_years: FloatValue,
    ) -> [FloatValue; 2] {
        let [upper, lower] = temperature;
        let lambda = self.lambda();
        [
            upper + step_years * self.c1 * (forcing - lambda * upper - self.c3 * (upper - lower)),
            lower + step_years * self.c4 * (upper - lower),
        ]
    }

    /// Apply a coefficient update, recomputing everything from first
    /// principles. Explicit `c1`/`c3`/`c4` values take precedence over the
    /// values implied by the two-layer parameterization when both are present
    /// in the same update.
    pub fn apply(&self, update: &ClimateUpdate) -> CdiceResult<Self> {
        for (name, value) in [
            ("heat_capacity_upper", update.heat_capacity_upper),
            ("heat_capacity_lower", update.heat_capacity_lower),
        ] {
            if let Some(value) = value {
                if !(value > 0.0) {
                    return Err(CdiceError::NumericalDomain {
                        context: "climate parameter update",
                        message: format!("{name} must be positive, got {value}"),
                    });
                }
            }
        }

        let c1 = update
            .c1
            .or(update.heat_capacity_upper.map(|c| 1.0 / c))
            .unwrap_or(self.c1);
        let c3 = update.c3.or(update.heat_exchange).unwrap_or(self.c3);
        let c4 = match update.c4 {
            Some(c4) => c4,
            None if update.heat_exchange.is_some() || update.heat_capacity_lower.is_some() => {
                c3 / update
                    .heat_capacity_lower
                    .unwrap_or_else(|| self.heat_capacity_lower())
            }
            None => self.c4,
        };
        Self {
            fco22x: update.fco22x.unwrap_or(self.fco22x),
            t2xco2: update.t2xco2.unwrap_or(self.t2xco2),
            c1,
            c3,
            c4,
        }
        .validated()
    }

    pub fn validated(self) -> CdiceResult<Self> {
        if !(self.t2xco2 > 0.0) {
            return Err(CdiceError::NumericalDomain {
                context: "climate parameters",
                message: format!("t2xco2 must be positive, got {}", self.t2xco2),
            });
        }
        for (name, value) in [
            ("fco22x", self.fco22x),
            ("c1", self.c1),
            ("c3", self.c3),
            ("c4", self.c4),
        ] {
            if !value.is_finite() {
                return Err(CdiceError::NumericalDomain {
                    context: "climate parameters",
                    message: format!("{name} must be finite, got {value}"),
                });
            }
        }
        Ok(self)
    }
}

/// A partial update of [`ClimateParameters`]. Fields left `None` keep their
/// current value; `c2` cannot be set at all, only moved through `fco22x` and
/// `t2xco2`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateUpdate {
    pub fco22x: Option<FloatValue>,
    pub t2xco2: Option<FloatValue>,
    pub c1: Option<FloatValue>,
    pub c3: Option<FloatValue>,
    pub c4: Option<FloatValue>,
    /// Alternate parameterization: `C` in Geoffroy et al. (2013); sets `c1 = 1/C`.
    pub heat_capacity_upper: Option<FloatValue>,
    /// Alternate parameterization: `gamma`; sets `c3 = gamma`.
    pub heat_exchange: Option<FloatValue>,
    /// Alternate parameterization: `C0`; sets `c4 = c3/C0`.
    pub heat_capacity_lower: Option<FloatValue>,
}
