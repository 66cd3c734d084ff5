//! Two-layer model fits from Geoffroy et al. (2013).
//!
//! Geoffroy et al. calibrate the two-layer energy-balance model against the
//! abrupt 4xCO2 experiment of each CMIP5 model, reporting the layer heat
//! capacities `C`, `C0` [W yr / (m^2 K)], the heat-exchange coefficient
//! `gamma` [W / (m^2 K)] and the 4xCO2 forcing and equilibrium warming. The
//! table below carries those per-model values plus the multi-model mean; the
//! step response of each entry is produced by the same explicit Euler update
//! as the main integrator.

use crate::climate::ClimateParameters;
use crate::errors::CdiceResult;
use crate::timeseries::{FloatValue, TimeGrid};
use ndarray::Array2;

/// Two-layer calibration of one CMIP5 model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoLayerFit {
    pub name: &'static str,
    /// Forcing of abrupt 4xCO2 [W/m^2].
    pub forcing_4xco2: FloatValue,
    /// Equilibrium warming under 4xCO2 [K].
    pub warming_4xco2: FloatValue,
    /// Effective heat capacity of the upper layer [W yr / (m^2 K)].
    pub heat_capacity_upper: FloatValue,
    /// Effective heat capacity of the deep-ocean layer [W yr / (m^2 K)].
    pub heat_capacity_lower: FloatValue,
    /// Heat-exchange coefficient between the layers [W / (m^2 K)].
    pub heat_exchange: FloatValue,
}

impl TwoLayerFit {
    /// Translate the fit into the integrator's coefficient set; the doubling
    /// quantities are half the published 4x values.
    pub fn climate_parameters(&self) -> CdiceResult<ClimateParameters> {
        ClimateParameters::from_two_layer(
            self.heat_capacity_upper,
            self.heat_exchange,
            self.heat_capacity_lower,
            0.5 * self.forcing_4xco2,
            0.5 * self.warming_4xco2,
        )
    }

    /// Temperature response of both layers to a constant forcing at
    /// `multiple` times the CO2-doubling forcing, starting from zero.
    /// Shape `(2, grid.len)`.
    pub fn step_response(
        &self,
        multiple: FloatValue,
        grid: &TimeGrid,
    ) -> CdiceResult<Array2<FloatValue>> {
        let climate = self.climate_parameters()?;
        let forcing = climate.fco22x * multiple;

        let mut temperature = Array2::zeros((2, grid.len));
        for i in 1..grid.len {
            let previous = [temperature[[0, i - 1]], temperature[[1, i - 1]]];
            let next = climate.step(previous, forcing, grid.step_years);
            temperature[[0, i]] = next[0];
            temperature[[1, i]] = next[1];
        }
        Ok(temperature)
    }
}

/// Per-model fits (Geoffroy et al. 2013, Tables 3 and 4) plus the
/// multi-model mean.
pub static MODEL_FITS: [TwoLayerFit; 17] = [
    TwoLayerFit { name: "BCC-CSM1-1", forcing_4xco2: 6.7, warming_4xco2: 5.6, heat_capacity_upper: 7.6, heat_capacity_lower: 53.0, heat_exchange: 0.67 },
    TwoLayerFit { name: "BNU-ESM", forcing_4xco2: 7.4, warming_4xco2: 8.0, heat_capacity_upper: 7.4, heat_capacity_lower: 90.0, heat_exchange: 0.53 },
    TwoLayerFit { name: "CanESM2", forcing_4xco2: 7.6, warming_4xco2: 7.4, heat_capacity_upper: 7.3, heat_capacity_lower: 71.0, heat_exchange: 0.59 },
    TwoLayerFit { name: "CCSM4", forcing_4xco2: 7.2, warming_4xco2: 5.8, heat_capacity_upper: 6.1, heat_capacity_lower: 69.0, heat_exchange: 0.93 },
    TwoLayerFit { name: "CNRM-CM5", forcing_4xco2: 7.3, warming_4xco2: 6.5, heat_capacity_upper: 8.4, heat_capacity_lower: 99.0, heat_exchange: 0.50 },
    TwoLayerFit { name: "CSIRO-Mk3.6.0", forcing_4xco2: 5.1, warming_4xco2: 8.3, heat_capacity_upper: 6.0, heat_capacity_lower: 69.0, heat_exchange: 0.88 },
    TwoLayerFit { name: "FGOALS-s2", forcing_4xco2: 7.5, warming_4xco2: 8.5, heat_capacity_upper: 7.0, heat_capacity_lower: 127.0, heat_exchange: 0.76 },
    TwoLayerFit { name: "GFDL-ESM2M", forcing_4xco2: 6.6, warming_4xco2: 4.9, heat_capacity_upper: 8.1, heat_capacity_lower: 105.0, heat_exchange: 0.90 },
    TwoLayerFit { name: "GISS-E2-R", forcing_4xco2: 7.3, warming_4xco2: 4.3, heat_capacity_upper: 4.7, heat_capacity_lower: 126.0, heat_exchange: 1.16 },
    TwoLayerFit { name: "HadGEM2-ES", forcing_4xco2: 5.9, warming_4xco2: 9.1, heat_capacity_upper: 6.5, heat_capacity_lower: 82.0, heat_exchange: 0.55 },
    TwoLayerFit { name: "INM-CM4", forcing_4xco2: 6.2, warming_4xco2: 4.1, heat_capacity_upper: 8.6, heat_capacity_lower: 317.0, heat_exchange: 0.65 },
    TwoLayerFit { name: "IPSL-CM5A-LR", forcing_4xco2: 6.4, warming_4xco2: 8.1, heat_capacity_upper: 7.7, heat_capacity_lower: 95.0, heat_exchange: 0.59 },
    TwoLayerFit { name: "MIROC5", forcing_4xco2: 8.5, warming_4xco2: 5.4, heat_capacity_upper: 8.3, heat_capacity_lower: 145.0, heat_exchange: 0.76 },
    TwoLayerFit { name: "MPI-ESM-LR", forcing_4xco2: 8.2, warming_4xco2: 7.3, heat_capacity_upper: 7.3, heat_capacity_lower: 71.0, heat_exchange: 0.72 },
    TwoLayerFit { name: "MRI-CGCM3", forcing_4xco2: 6.6, warming_4xco2: 5.2, heat_capacity_upper: 8.5, heat_capacity_lower: 64.0, heat_exchange: 0.66 },
    TwoLayerFit { name: "NorESM1-M", forcing_4xco2: 6.2, warming_4xco2: 5.6, heat_capacity_upper: 8.0, heat_capacity_lower: 105.0, heat_exchange: 0.88 },
    TwoLayerFit { name: "multi-model mean", forcing_4xco2: 6.9, warming_4xco2: 6.5, heat_capacity_upper: 7.3, heat_capacity_lower: 106.0, heat_exchange: 0.73 },
];

/// The multi-model mean entry of [`MODEL_FITS`].
pub fn multi_model_mean() -> &'static TwoLayerFit {
    &MODEL_FITS[MODEL_FITS.len() - 1]
}
