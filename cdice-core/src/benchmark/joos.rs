//! Impulse response functions from Joos et al. (2013).
//!
//! Joos et al. fit the response of each participating carbon-cycle model to
//! a 100 GtC pulse with a constant plus three exponentials,
//!
//! ```text
//! IRF(t) = a0 + a1*exp(-t/tau1) + a2*exp(-t/tau2) + a3*exp(-t/tau3)
//! ```
//!
//! For the atmosphere the IRF is the fraction of the pulse still airborne
//! after `t` years. The multi-model-mean fits for ocean and land carbon are
//! in GtC, the surface-air-temperature fit in Kelvin.
//!
//! The published airborne fractions to compare against: roughly 0.60 / 0.50
//! / 0.40 of a 100 GtC pulse remain after 20 / 40 / 100 years under
//! present-day background conditions, with a two-sigma spread of about 0.1.

use crate::timeseries::{FloatValue, TimeGrid};
use ndarray::Array1;

/// One constant-plus-three-exponentials impulse-response fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrfFit {
    pub name: &'static str,
    pub a0: FloatValue,
    pub a1: FloatValue,
    pub a2: FloatValue,
    pub a3: FloatValue,
    pub tau1: FloatValue,
    pub tau2: FloatValue,
    pub tau3: FloatValue,
}

impl IrfFit {
    /// Evaluate the fit `years` after the pulse.
    pub fn evaluate(&self, years: FloatValue) -> FloatValue {
        self.a0
            + self.a1 * (-years / self.tau1).exp()
            + self.a2 * (-years / self.tau2).exp()
            + self.a3 * (-years / self.tau3).exp()
    }

    /// Evaluate the fit on every sample of a time grid, with the pulse at
    /// the first sample.
    pub fn trajectory(&self, grid: &TimeGrid) -> Array1<FloatValue> {
        Array1::from_iter((0..grid.len).map(|i| self.evaluate(i as FloatValue * grid.step_years)))
    }

    /// Atmospheric carbon mass [GtC] implied by this airborne-fraction fit
    /// for a pulse on top of a constant background.
    pub fn atmosphere_mass(
        &self,
        background_gtc: FloatValue,
        pulse_gtc: FloatValue,
        grid: &TimeGrid,
    ) -> Array1<FloatValue> {
        self.trajectory(grid)
            .mapv(|fraction| background_gtc + pulse_gtc * fraction)
    }
}

/// Airborne-fraction fits for the individual models (Joos et al. 2013,
/// Table S1), model tags as published.
pub const ATMOSPHERE_FITS: [IrfFit; 16] = [
    IrfFit { name: "NCAR", a0: 2.935e-7, a1: 0.3665, a2: 0.3542, a3: 0.2793, tau1: 1691.0, tau2: 28.36, tau3: 5.316 },
    IrfFit { name: "CSM1.4", a0: 0.4340, a1: 0.1973, a2: 0.1889, a3: 0.1798, tau1: 23.07, tau2: 23.07, tau3: 3.922 },
    IrfFit { name: "HadGEM2-ES", a0: 1.252e-7, a1: 0.5846, a2: 0.1826, a3: 0.2310, tau1: 178.1, tau2: 9.039, tau3: 8.989 },
    IrfFit { name: "MPI-ESM", a0: 6.345e-10, a1: 0.5150, a2: 0.2631, a3: 0.2219, tau1: 1955.0, tau2: 45.83, tau3: 3.872 },
    IrfFit { name: "Bern3D-LPJ-r", a0: 0.2796, a1: 0.2382, a2: 0.2382, a3: 0.2440, tau1: 276.2, tau2: 38.45, tau3: 4.928 },
    IrfFit { name: "Bern3D-LPJ-e", a0: 0.2362, a1: 9.866e-2, a2: 0.3850, a3: 0.2801, tau1: 232.1, tau2: 58.50, tau3: 2.587 },
    IrfFit { name: "CLIMBER2-LPJ", a0: 0.2318, a1: 0.2756, a2: 0.4900, a3: 2.576e-3, tau1: 272.6, tau2: 6.692, tau3: 6.692 },
    IrfFit { name: "DCESS", a0: 0.2159, a1: 0.2912, a2: 0.2410, a3: 0.2518, tau1: 379.9, tau2: 36.31, tau3: 3.398 },
    IrfFit { name: "GENIEe", a0: 0.2145, a1: 0.2490, a2: 0.1924, a3: 0.3441, tau1: 270.1, tau2: 39.32, tau3: 4.305 },
    IrfFit { name: "LOVECLIM", a0: 8.539e-8, a1: 0.3606, a2: 0.4503, a3: 0.1891, tau1: 1596.0, tau2: 21.71, tau3: 2.281 },
    IrfFit { name: "MESMO", a0: 0.2848, a1: 0.2938, a2: 0.2382, a3: 0.1831, tau1: 454.3, tau2: 25.00, tau3: 2.014 },
    IrfFit { name: "UVic2.9", a0: 0.3186, a1: 0.1748, a2: 0.1921, a3: 0.3145, tau1: 304.6, tau2: 26.56, tau3: 3.800 },
    IrfFit { name: "ACC2", a0: 0.1779, a1: 0.1654, a2: 0.3796, a3: 0.2772, tau1: 386.2, tau2: 36.89, tau3: 3.723 },
    IrfFit { name: "Bern-SAR", a0: 0.1994, a1: 0.1762, a2: 0.3452, a3: 0.2792, tau1: 333.1, tau2: 39.69, tau3: 4.110 },
    IrfFit { name: "MAGICC6e", a0: 0.2051, a1: 0.2533, a2: 0.3318, a3: 0.2098, tau1: 596.1, tau2: 21.97, tau3: 2.995 },
    IrfFit { name: "TOTEM2", a0: 7.177e-6, a1: 0.2032, a2: 0.6995, a3: 9.738e-2, tau1: 85770.0, tau2: 111.8, tau3: 1.5832e-2 },
];

/// Multi-model-mean airborne fraction (Joos et al. 2013, Table 5).
pub const ATMOSPHERE_MULTI_MODEL_MEAN: IrfFit = IrfFit {
    name: "multi-model mean",
    a0: 0.2173,
    a1: 0.2240,
    a2: 0.2824,
    a3: 0.2763,
    tau1: 394.4,
    tau2: 36.54,
    tau3: 4.304,
};

/// Multi-model-mean ocean carbon uptake [GtC] (Joos et al. 2013, Table 5).
pub const OCEAN_MULTI_MODEL_MEAN: IrfFit = IrfFit {
    name: "multi-model mean ocean",
    a0: 60.29,
    a1: -26.48,
    a2: -17.45,
    a3: -16.35,
    tau1: 390.5,
    tau2: 100.5,
    tau3: 4.551,
};

/// Multi-model-mean land carbon uptake [GtC] (Joos et al. 2013, Table 5).
pub const LAND_MULTI_MODEL_MEAN: IrfFit = IrfFit {
    name: "multi-model mean land",
    a0: 17.07,
    a1: 332.1,
    a2: -334.1,
    a3: -15.09,
    tau1: 74.76,
    tau2: 70.31,
    tau3: 6.139,
};

/// Multi-model-mean surface-air-temperature response [K]
/// (Joos et al. 2013, Table 5).
pub const TEMPERATURE_MULTI_MODEL_MEAN: IrfFit = IrfFit {
    name: "multi-model mean SAT",
    a0: 0.1383,
    a1: 0.05789,
    a2: -0.06729,
    a3: -0.1289,
    tau1: 264.0,
    tau2: 5.818,
    tau3: 0.8062,
};
