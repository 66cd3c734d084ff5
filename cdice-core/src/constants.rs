//! Named constant tables from the DICE-2016 calibration.
//!
//! These are passed explicitly into problem set-ups rather than acting as
//! hidden defaults, so independent scenarios share no implicit state.

use crate::timeseries::FloatValue;

/// Conversion factor: ppm CO2 per GtC of atmospheric carbon
/// (100 GtC correspond to 47 ppm CO2).
pub const PPM_CO2_PER_GTC: FloatValue = 0.47;

/// Equilibrium carbon mass [GtC] in the three reservoirs
/// (atmosphere, upper ocean, lower ocean) in the year 1750, DICE-2016 values.
pub const M_EQ_DICE: [FloatValue; 3] = [588.0, 360.0, 1720.0];

/// Equilibrium masses rescaled so the atmosphere matches 285 ppm CO2 in 1850.
pub const M_EQ_DICE_1850: [FloatValue; 3] = [
    M_EQ_DICE[0] / 276.0 * 285.0,
    M_EQ_DICE[1] / 276.0 * 285.0,
    M_EQ_DICE[2] / 276.0 * 285.0,
];

/// Carbon mass [GtC] in the three reservoirs in the DICE-2016 start year (2015).
pub const M_INI_DICE: [FloatValue; 3] = [851.0, 460.0, 1740.0];

/// Temperature change in 2015 relative to 1900 in the two energy-balance
/// layers (atmosphere plus upper ocean, lower ocean) [K].
pub const T_INI_DICE: [FloatValue; 2] = [0.85, 0.0068];

/// Exogenous non-CO2 forcing in 2015 as hard-wired in DICE-2016 [W/m^2].
pub const FEX0_DICE: FloatValue = 0.5;

/// Exogenous non-CO2 forcing reached in 2100 as hard-wired in DICE-2016 [W/m^2].
pub const FEX1_DICE: FloatValue = 1.0;

/// CO2 concentration [ppm] of the equilibrium atmospheric carbon mass in 1850.
/// Used to compute forcing when atmospheric concentrations are prescribed.
pub const PPM_CO2_EQ_1850: FloatValue = M_EQ_DICE_1850[0] * PPM_CO2_PER_GTC;
