//! Radiative forcing from CO2 and from non-CO2 agents.
//!
//! Total forcing is the sum of a CO2 contribution, selected by
//! [`Co2ForcingMode`], and a non-CO2 contribution, selected by
//! [`NonCo2ForcingPolicy`]. Both are evaluated every step, after the carbon
//! masses have been updated.

use crate::constants::PPM_CO2_EQ_1850;
use crate::errors::{CdiceError, CdiceResult};
use crate::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};

/// How the CO2 forcing is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Co2ForcingMode {
    /// From the carbon cycle: `fco22x * log2(M_atm / M_eq_atm)`.
    FromCarbonCycle,
    /// From a prescribed concentration: `fco22x * log2(ppm / ppm_eq_1850)`.
    FromPrescribedConcentration,
    /// A constant multiple of the CO2-doubling forcing, every step.
    FromFixedMultipleOfDoubling { multiple: FloatValue },
}

impl Co2ForcingMode {
    /// Evaluate the CO2 forcing [W/m^2].
    ///
    /// `prescribed_ppm` is the concentration at the current step and is only
    /// consulted in prescribed-concentration mode.
    pub fn evaluate(
        &self,
        fco22x: FloatValue,
        atmosphere_mass: FloatValue,
        m_eq_atmosphere: FloatValue,
        prescribed_ppm: Option<FloatValue>,
    ) -> CdiceResult<FloatValue> {
        match self {
            Co2ForcingMode::FromCarbonCycle => {
                let ratio = atmosphere_mass / m_eq_atmosphere;
                if !(ratio > 0.0) {
                    return Err(CdiceError::NumericalDomain {
                        context: "CO2 forcing",
                        message: format!(
                            "atmospheric mass ratio must be positive, got {atmosphere_mass} / {m_eq_atmosphere}"
                        ),
                    });
                }
                Ok(fco22x * ratio.log2())
            }
            Co2ForcingMode::FromPrescribedConcentration => {
                let ppm = prescribed_ppm.ok_or_else(|| {
                    CdiceError::InvalidConfiguration(
                        "prescribed-concentration forcing requires a concentration series"
                            .to_string(),
                    )
                })?;
                let ratio = ppm / PPM_CO2_EQ_1850;
                if !(ratio > 0.0) {
                    return Err(CdiceError::NumericalDomain {
                        context: "CO2 forcing",
                        message: format!("prescribed concentration must be positive, got {ppm}"),
                    });
                }
                Ok(fco22x * ratio.log2())
            }
            Co2ForcingMode::FromFixedMultipleOfDoubling { multiple } => Ok(fco22x * multiple),
        }
    }
}

/// How the non-CO2 forcing is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NonCo2ForcingPolicy {
    /// No non-CO2 forcing.
    None,
    /// The ramp hard-wired in DICE-2016: `fex0` in 2015 rising linearly to
    /// `fex1` in 2100, constant outside that range.
    HardwiredRamp { fex0: FloatValue, fex1: FloatValue },
    /// A constant factor of the CO2 forcing.
    ProportionalFactor { factor: FloatValue },
    /// Piecewise-linear relaxation of the net non-CO2 forcing following the
    /// shape of Mengis & Matthews (2020), Fig. 1: zero before 1950, a dip of
    /// -0.2 W/m^2 between 1960 and 1970, relaxing from 1980 up to
    /// `factor * F_CO2` by 2015 and holding that share thereafter. The
    /// breakpoint years and the dip magnitude are calibrated constants.
    TimeVaryingRelaxation { factor: FloatValue },
}

/// Maximum dip of the net non-CO2 forcing between 1960 and 1970 [W/m^2].
const RELAXATION_DIP: FloatValue = -0.2;

impl NonCo2ForcingPolicy {
    /// Evaluate the non-CO2 forcing [W/m^2] at `year`, given the CO2 forcing
    /// of the same step.
    pub fn evaluate(&self, year: Time, co2_forcing: FloatValue) -> FloatValue {
        match self {
            NonCo2ForcingPolicy::None => 0.0,
            NonCo2ForcingPolicy::HardwiredRamp { fex0, fex1 } => {
                fex0 + ((year - 2015.0) / (2100.0 - 2015.0)).clamp(0.0, 1.0) * (fex1 - fex0)
            }
            NonCo2ForcingPolicy::ProportionalFactor { factor } => co2_forcing * factor,
            NonCo2ForcingPolicy::TimeVaryingRelaxation { factor } => {
                if year < 1950.0 {
                    0.0
                } else if year < 1960.0 {
                    RELAXATION_DIP / 10.0 * (year - 1950.0)
                } else if year < 1970.0 {
                    RELAXATION_DIP
                } else if year < 1980.0 {
                    RELAXATION_DIP - RELAXATION_DIP / 10.0 * (year - 1970.0)
                } else if year < 2015.0 {
                    (year - 1980.0) / 35.0 * co2_forcing * factor
                } else {
                    co2_forcing * factor
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn doubling_gives_fco22x() {
        let forcing = Co2ForcingMode::FromCarbonCycle
            .evaluate(3.45, 1214.0, 607.0, None)
            .unwrap();
        assert_relative_eq!(forcing, 3.45, max_relative = 1e-12);
    }

    #[test]
    fn equilibrium_mass_gives_zero_forcing() {
        let forcing = Co2ForcingMode::FromCarbonCycle
            .evaluate(3.45, 607.0, 607.0, None)
            .unwrap();
        assert_relative_eq!(forcing, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn nonpositive_mass_is_a_domain_error() {
        let result = Co2ForcingMode::FromCarbonCycle.evaluate(3.45, -1.0, 607.0, None);
        assert!(matches!(result, Err(CdiceError::NumericalDomain { .. })));
    }

    #[test]
    fn prescribed_concentration_requires_a_series() {
        let result = Co2ForcingMode::FromPrescribedConcentration.evaluate(3.45, 0.0, 607.0, None);
        assert!(matches!(result, Err(CdiceError::InvalidConfiguration(_))));

        let forcing = Co2ForcingMode::FromPrescribedConcentration
            .evaluate(3.45, 0.0, 607.0, Some(2.0 * crate::constants::PPM_CO2_EQ_1850))
            .unwrap();
        assert_relative_eq!(forcing, 3.45, max_relative = 1e-12);
    }

    #[test]
    fn fixed_multiple_is_constant() {
        let mode = Co2ForcingMode::FromFixedMultipleOfDoubling { multiple: 2.0 };
        let forcing = mode.evaluate(3.45, 0.0, 607.0, None).unwrap();
        assert_relative_eq!(forcing, 6.9, max_relative = 1e-12);
    }

    #[test]
    fn hardwired_ramp_clamps_at_both_ends() {
        let policy = NonCo2ForcingPolicy::HardwiredRamp {
            fex0: 0.5,
            fex1: 1.0,
        };
        assert_relative_eq!(policy.evaluate(1900.0, 0.0), 0.5);
        assert_relative_eq!(policy.evaluate(2015.0, 0.0), 0.5);
        assert_relative_eq!(policy.evaluate(2100.0, 0.0), 1.0);
        assert_relative_eq!(policy.evaluate(2500.0, 0.0), 1.0);
        // Halfway through the ramp.
        assert_relative_eq!(policy.evaluate(2057.5, 0.0), 0.75);
    }

    #[test]
    fn relaxation_breakpoints() {
        let policy = NonCo2ForcingPolicy::TimeVaryingRelaxation { factor: 0.3 };
        let co2 = 2.0;

        assert_eq!(policy.evaluate(1949.0, co2), 0.0);
        assert_relative_eq!(policy.evaluate(1955.0, co2), -0.1);
        assert_relative_eq!(policy.evaluate(1965.0, co2), -0.2);
        assert_relative_eq!(policy.evaluate(1975.0, co2), -0.1);
        // At 1980 the relaxation starts from zero.
        assert_relative_eq!(policy.evaluate(1980.0, co2), 0.0);
        // Halfway through the relaxation: half the asymptotic share.
        assert_relative_eq!(policy.evaluate(1997.5, co2), 0.5 * co2 * 0.3);
        assert_relative_eq!(policy.evaluate(2015.0, co2), co2 * 0.3);
        assert_relative_eq!(policy.evaluate(2100.0, co2), co2 * 0.3);
    }

    #[test]
    fn proportional_factor() {
        let policy = NonCo2ForcingPolicy::ProportionalFactor { factor: 0.25 };
        assert_relative_eq!(policy.evaluate(2000.0, 4.0), 1.0);
    }
}
