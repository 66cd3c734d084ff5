//! Calibrated parameters of the economic coupling layer.
//!
//! Defaults follow the annualized DICE-2016 calibration with the CDICE
//! climate and carbon-cycle coefficients (the values behind the pulse and
//! 4xCO2 benchmarks). Units: carbon masses in 1000 GtC, population in
//! billions, output in trillions of 2010 USD.

use cdice_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconParameters {
    // Time
    /// Length of one model period [years].
    /// Default: 1.0
    pub time_step_years: FloatValue,

    /// Density of the logarithmic computational-time transform
    /// `tau = 1 - exp(-vartheta * t)` [1/period]. A numerical-compression
    /// choice, not a physical rate.
    /// Default: 0.01
    pub vartheta: FloatValue,

    // Preferences
    /// Pure rate of time preference [1/yr].
    /// Default: 0.015
    pub rho: FloatValue,

    /// Intertemporal elasticity of substitution (consumption is
    /// `lambd_hat^(-psi)`).
    /// Default: 0.69
    pub psi: FloatValue,

    // Production
    /// Capital share in the Cobb-Douglas production function.
    /// Default: 0.3
    pub alpha: FloatValue,

    /// Annual capital depreciation rate.
    /// Default: 0.1
    pub delta: FloatValue,

    // Population
    /// Initial world population [billion].
    /// Default: 7.403
    pub l0: FloatValue,

    /// Asymptotic world population [billion].
    /// Default: 11.5
    pub l_infty: FloatValue,

    /// Convergence rate of the population towards its asymptote [1/yr].
    /// Default: 0.0268
    pub delta_l: FloatValue,

    // Total factor productivity
    /// Initial TFP level.
    /// Default: 5.115
    pub tfp0: FloatValue,

    /// Initial annual TFP growth rate.
    /// Default: 0.0152
    pub g_tfp0: FloatValue,

    /// Annual decline rate of TFP growth.
    /// Default: 0.005
    pub delta_tfp: FloatValue,

    /// Growth adjustment applied in the DICE-2007/2016 TFP path (absent in
    /// the cjl variant).
    /// Default: 1.0
    pub tfp_adjustment: FloatValue,

    // Carbon intensity of output
    /// Initial carbon intensity [1000 GtC per output unit].
    /// Default: 9.556e-5
    pub sigma0: FloatValue,

    /// Initial annual growth rate of carbon intensity (negative: declining).
    /// Default: -0.0152
    pub g_sigma0: FloatValue,

    /// Annual decline rate of the carbon-intensity trend.
    /// Default: 0.001
    pub delta_sigma: FloatValue,

    // Mitigation
    /// Exponent of the abatement cost function.
    /// Default: 2.6
    pub theta2: FloatValue,

    /// Initial backstop price [thousand USD per tCO2].
    /// Default: 0.55
    pub pback: FloatValue,

    /// Annual decline rate of the backstop price.
    /// Default: 0.005
    pub gback: FloatValue,

    /// Mass ratio tCO2 per tC.
    /// Default: 3.666
    pub c2co2: FloatValue,

    // Land-use emissions
    /// Initial land-use carbon emission [1000 GtC/yr].
    /// Default: 7.1e-4
    pub eland0: FloatValue,

    /// Annual decline rate of land-use emissions.
    /// Default: 0.0244
    pub delta_land: FloatValue,

    // Exogenous non-CO2 forcing ramp
    /// Non-CO2 forcing at the start of the ramp [W/m^2].
    /// Default: 0.5
    pub fex0: FloatValue,

    /// Non-CO2 forcing at the end of the ramp [W/m^2].
    /// Default: 1.0
    pub fex1: FloatValue,

    /// Length of the forcing ramp [years].
    /// Default: 85.0
    pub fex_years: FloatValue,

    // Climate damage function
    /// Linear damage coefficient.
    /// Default: 0.0
    pub pi1: FloatValue,

    /// Quadratic damage coefficient.
    /// Default: 0.00236 (DICE-2016)
    pub pi2: FloatValue,

    /// Exponent of the first damage term.
    /// Default: 1.0
    pub pow1: FloatValue,

    /// Exponent of the second damage term.
    /// Default: 2.0
    pub pow2: FloatValue,

    // Carbon mass transitions
    /// Transfer coefficient atmosphere to upper ocean [1/yr].
    /// Default: 0.054
    pub phi12: FloatValue,

    /// Transfer coefficient upper to lower ocean [1/yr].
    /// Default: 0.0082
    pub phi23: FloatValue,

    /// Equilibrium atmospheric carbon mass [1000 GtC].
    /// Default: 0.607
    pub mat_eq: FloatValue,

    /// Equilibrium upper-ocean carbon mass [1000 GtC].
    /// Default: 0.489
    pub muo_eq: FloatValue,

    /// Equilibrium lower-ocean carbon mass [1000 GtC].
    /// Default: 1.281
    pub mlo_eq: FloatValue,

    /// Preindustrial atmospheric carbon mass used in the forcing ratio
    /// [1000 GtC].
    /// Default: 0.607
    pub mat_base: FloatValue,

    // Temperature exchange
    /// Inverse effective heat capacity of the upper layer [m^2 K / (W yr)].
    /// Default: 0.137
    pub varphi1: FloatValue,

    /// Heat-exchange coefficient between the layers [W / (m^2 K)].
    /// Default: 0.73
    pub varphi3: FloatValue,

    /// Heat exchange over lower-layer heat capacity [1/yr].
    /// Default: 0.00689
    pub varphi4: FloatValue,

    /// Forcing of an equilibrium CO2 doubling [W/m^2].
    /// Default: 3.45
    pub f2xco2: FloatValue,

    /// Equilibrium climate sensitivity [K].
    /// Default: 3.25
    pub t2xco2: FloatValue,

    // Stochastic productivity
    /// AR(1) persistence of the productivity growth shock `chi`.
    /// Default: 0.9
    pub shock_persistence: FloatValue,
}

impl Default for EconParameters {
    fn default() -> Self {
        Self::dice2016()
    }
}

impl EconParameters {
    /// Annualized DICE-2016 calibration with CDICE climate coefficients.
    pub fn dice2016() -> Self {
        Self {
            time_step_years: 1.0,
            vartheta: 0.01,
            rho: 0.015,
            psi: 0.69,
            alpha: 0.3,
            delta: 0.1,
            l0: 7.403,
            l_infty: 11.5,
            delta_l: 0.0268,
            tfp0: 5.115,
            g_tfp0: 0.0152,
            delta_tfp: 0.005,
            tfp_adjustment: 1.0,
            sigma0: 9.556e-5,
            g_sigma0: -0.0152,
            delta_sigma: 0.001,
            theta2: 2.6,
            pback: 0.55,
            gback: 0.005,
            c2co2: 3.666,
            eland0: 7.1e-4,
            delta_land: 0.0244,
            fex0: 0.5,
            fex1: 1.0,
            fex_years: 85.0,
            pi1: 0.0,
            pi2: 0.00236,
            pow1: 1.0,
            pow2: 2.0,
            phi12: 0.054,
            phi23: 0.0082,
            mat_eq: 0.607,
            muo_eq: 0.489,
            mlo_eq: 1.281,
            mat_base: 0.607,
            varphi1: 0.137,
            varphi3: 0.73,
            varphi4: 0.00689,
            f2xco2: 3.45,
            t2xco2: 3.25,
            shock_persistence: 0.9,
        }
    }

    /// DICE-2007 calibration: the inverse-form damage function.
    pub fn dice2007() -> Self {
        Self {
            pi1: 0.0,
            pi2: 0.0028388,
            pow1: 1.0,
            pow2: 2.0,
            ..Self::dice2016()
        }
    }

    /// The cjl calibration: DICE-2007 functional forms with the rounded
    /// transition coefficients.
    pub fn cjl() -> Self {
        Self::dice2007()
    }
}
