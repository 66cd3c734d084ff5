//! Three-reservoir carbon cycle.
//!
//! Carbon is exchanged between atmosphere, upper ocean and lower ocean through
//! a linear transfer matrix. Only two transfer coefficients are free: `b12`
//! (atmosphere to upper ocean) and `b23` (upper to lower ocean). All remaining
//! coefficients follow from mass conservation and from the requirement that
//! the prescribed equilibrium masses are a fixed point of the transfer, which
//! ties each return flow to the mass ratio of the reservoir pair.
//!
//! The free coefficients are flow rates per time step. The DICE-2016 values
//! (`b12 = 0.12`, `b23 = 0.007`) tacitly assume a five-year step; use
//! [`CarbonCycleParameters::rescaled`] to move them consistently to any other
//! step size.

use crate::constants::{M_EQ_DICE, M_EQ_DICE_1850};
use crate::errors::{CdiceError, CdiceResult};
use crate::timeseries::FloatValue;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Free parameters of the three-reservoir carbon cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonCycleParameters {
    /// Transfer coefficient from atmosphere to upper ocean, per time step.
    pub b12: FloatValue,
    /// Transfer coefficient from upper ocean to lower ocean, per time step.
    pub b23: FloatValue,
    /// Equilibrium carbon mass [GtC] in atmosphere, upper ocean, lower ocean.
    /// Does not rescale with the time step.
    pub m_eq: [FloatValue; 3],
    /// Time step [years] the transfer coefficients refer to.
    pub step_years: FloatValue,
}

impl Default for CarbonCycleParameters {
    fn default() -> Self {
        Self::dice2016()
    }
}

impl CarbonCycleParameters {
    /// Original DICE-2016 values with the 1750 equilibrium masses; the
    /// coefficients are defined for the hard-wired five-year step.
    pub fn dice2016() -> Self {
        Self {
            b12: 0.12,
            b23: 0.007,
            m_eq: M_EQ_DICE,
            step_years: 5.0,
        }
    }

    /// DICE-2016 coefficients with equilibrium masses rescaled to 285 ppm
    /// atmospheric CO2 in 1850.
    pub fn dice2016_1850() -> Self {
        Self {
            m_eq: M_EQ_DICE_1850,
            ..Self::dice2016()
        }
    }

    /// Recalibrated annual-step values fitted against the Joos et al. (2013)
    /// pulse-response ensemble.
    pub fn cdice() -> Self {
        Self {
            b12: 0.054,
            b23: 0.0082,
            m_eq: [607.0, 489.0, 1281.0],
            step_years: 1.0,
        }
    }

    /// Move the transfer coefficients to a new time step. Flows are rate
    /// quantities and scale linearly with the step ratio; the equilibrium
    /// masses are amounts and stay fixed.
    pub fn rescaled(&self, step_years: FloatValue) -> CdiceResult<Self> {
        if !(step_years > 0.0) {
            return Err(CdiceError::InvalidConfiguration(format!(
                "time step must be positive, got {step_years}"
            )));
        }
        let ratio = step_years / self.step_years;
        Ok(Self {
            b12: self.b12 * ratio,
            b23: self.b23 * ratio,
            m_eq: self.m_eq,
            step_years,
        })
    }
}

/// The full coefficient set of the transfer matrix, derived from
/// [`CarbonCycleParameters`]. Column `j` of the matrix distributes the mass of
/// reservoir `j` over the reservoirs, so every column sums to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferCoefficients {
    pub b11: FloatValue,
    pub b12: FloatValue,
    pub b13: FloatValue,
    pub b21: FloatValue,
    pub b22: FloatValue,
    pub b23: FloatValue,
    pub b31: FloatValue,
    pub b32: FloatValue,
    pub b33: FloatValue,
}

impl TransferCoefficients {
    /// Derive the dependent coefficients. The derivation order is fixed:
    /// each mass-conservation identity uses the coefficients derived before
    /// it, and the return flows `b21`, `b32` encode the equilibrium condition
    /// `M_i * b_ij = M_j * b_ji` for the two exchanging reservoir pairs.
    pub fn derive(params: &CarbonCycleParameters) -> CdiceResult<Self> {
        for (index, mass) in params.m_eq.iter().enumerate() {
            if !(*mass > 0.0) {
                return Err(CdiceError::NumericalDomain {
                    context: "carbon cycle transfer coefficients",
                    message: format!(
                        "equilibrium mass of reservoir {index} must be positive, got {mass}"
                    ),
                });
            }
        }
        let b12 = params.b12;
        let b23 = params.b23;
        let b11 = 1.0 - b12;
        let b21 = b12 * params.m_eq[0] / params.m_eq[1];
        let b22 = 1.0 - b21 - b23;
        let b32 = b23 * params.m_eq[1] / params.m_eq[2];
        let b33 = 1.0 - b32;
        Ok(Self {
            b11,
            b12,
            b13: 0.0,
            b21,
            b22,
            b23,
            b31: 0.0,
            b32,
            b33,
        })
    }

    /// The transfer matrix `A` with `mass_{t+1} = A * mass_t` before adding
    /// emissions. There is no direct atmosphere / lower-ocean exchange.
    pub fn matrix(&self) -> Matrix3<FloatValue> {
        Matrix3::new(
            self.b11, self.b21, self.b31, //
            self.b12, self.b22, self.b32, //
            self.b13, self.b23, self.b33,
        )
    }

    /// Advance the reservoir masses by one step, without emissions.
    pub fn step(&self, mass: &Vector3<FloatValue>) -> Vector3<FloatValue> {
        self.matrix() * mass
    }

    /// Column sums of the transfer matrix; all exactly one for a
    /// mass-conserving transfer.
    pub fn column_sums(&self) -> [FloatValue; 3] {
        [
            self.b11 + self.b12 + self.b13,
            self.b21 + self.b22 + self.b23,
            self.b31 + self.b32 + self.b33,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn columns_sum_to_one_across_parameter_range() {
        for &b12 in &[0.001, 0.054, 0.12, 0.5, 0.9, 0.999] {
            for &b23 in &[0.001, 0.0082, 0.007, 0.3, 0.99] {
                let params = CarbonCycleParameters {
                    b12,
                    b23,
                    m_eq: [607.0, 489.0, 1281.0],
                    step_years: 1.0,
                };
                let coefficients = TransferCoefficients::derive(&params).unwrap();
                for sum in coefficients.column_sums() {
                    assert!(
                        (sum - 1.0).abs() < 1e-12,
                        "column sum {sum} for b12={b12}, b23={b23}"
                    );
                }
            }
        }
    }

    #[test]
    fn equilibrium_masses_are_a_fixed_point() {
        let params = CarbonCycleParameters::dice2016_1850();
        let coefficients = TransferCoefficients::derive(&params).unwrap();
        let equilibrium = Vector3::from_column_slice(&params.m_eq);

        let mut mass = equilibrium;
        for _ in 0..200 {
            mass = coefficients.step(&mass);
        }
        for i in 0..3 {
            assert_relative_eq!(mass[i], equilibrium[i], max_relative = 1e-9);
        }
    }

    #[test]
    fn rescaling_to_same_step_is_a_no_op() {
        let params = CarbonCycleParameters::dice2016();
        let rescaled = params.rescaled(params.step_years).unwrap();
        assert_eq!(rescaled.b12, params.b12);
        assert_eq!(rescaled.b23, params.b23);
    }

    #[test]
    fn rescaling_round_trip_restores_coefficients() {
        let params = CarbonCycleParameters::dice2016();
        let annual = params.rescaled(1.0).unwrap();
        assert_relative_eq!(annual.b12, 0.12 / 5.0, max_relative = 1e-15);

        let back = annual.rescaled(5.0).unwrap();
        assert_relative_eq!(back.b12, params.b12, max_relative = 1e-12);
        assert_relative_eq!(back.b23, params.b23, max_relative = 1e-12);
        // Equilibrium masses never rescale.
        assert_eq!(back.m_eq, params.m_eq);
    }

    #[test]
    fn zero_equilibrium_mass_is_rejected() {
        let params = CarbonCycleParameters {
            m_eq: [607.0, 0.0, 1281.0],
            ..CarbonCycleParameters::cdice()
        };
        let result = TransferCoefficients::derive(&params);
        assert!(matches!(
            result,
            Err(CdiceError::NumericalDomain { .. })
        ));
    }

    #[test]
    fn total_mass_is_conserved_away_from_equilibrium() {
        let params = CarbonCycleParameters::cdice();
        let coefficients = TransferCoefficients::derive(&params).unwrap();
        let mut mass = Vector3::new(851.0, 460.0, 1740.0);
        let total = mass.sum();
        for _ in 0..500 {
            mass = coefficients.step(&mass);
        }
        assert_relative_eq!(mass.sum(), total, max_relative = 1e-12);
    }

    #[test]
    fn serialization_round_trip() {
        let params = CarbonCycleParameters::cdice();
        let json = serde_json::to_string(&params).expect("Serialization failed");
        let parsed: CarbonCycleParameters = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(parsed.b12, params.b12);
        assert_eq!(parsed.m_eq, params.m_eq);
    }

    #[test]
    fn partial_deserialization_uses_defaults() {
        let json = r#"{"b12": 0.06}"#;
        let params: CarbonCycleParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.b12, 0.06);
        assert_eq!(params.b23, CarbonCycleParameters::dice2016().b23);
    }
}
