//! Problem set-ups for the coupled carbon-cycle / climate integrator.
//!
//! A [`Problem`] is an immutable, validated per-run record. It is built by
//! [`ProblemBuilder`], which recomputes every derived coefficient from first
//! principles at construction time, so there is no stale-derived-value state
//! to keep in sync when a setting changes.
//!
//! The standard perturbation experiments are available as presets:
//!
//! - [`Problem::equilibrate`]: let the 2015 initial conditions relax,
//! - [`Problem::pulse`]: carbon pulse into the 2015 atmosphere,
//! - [`Problem::step_forcing`]: instantaneous multiple of the CO2-doubling
//!   forcing (e.g. abrupt 4xCO2 with a multiple of two),
//! - [`Problem::one_percent_co2`]: concentrations rising 1% per year,
//! - [`Problem::prescribed_concentration`]: concentrations from an external
//!   dataset,
//! - [`Problem::prescribed_emissions`]: emissions from an external dataset,
//! - [`Problem::hold_atmospheric_mass_constant`]: diagnose the emission that
//!   keeps the atmospheric reservoir flat.

use crate::carbon_cycle::{CarbonCycleParameters, TransferCoefficients};
use crate::climate::{ClimateParameters, ClimateUpdate};
use crate::constants::{M_INI_DICE, PPM_CO2_EQ_1850, T_INI_DICE};
use crate::errors::{CdiceError, CdiceResult};
use crate::forcing::{Co2ForcingMode, NonCo2ForcingPolicy};
use crate::timeseries::{ExternalTimeSeries, FloatValue, SeriesKind, Time, TimeGrid};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// The problem archetype being integrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemKind {
    Equilibrate,
    Pulse,
    StepForcing,
    OnePercentCo2,
    PrescribedConcentration,
    PrescribedEmissions,
    HoldAtmosphericMassConstant,
}

/// An immutable, validated problem record. Construct via [`ProblemBuilder`].
#[derive(Debug, Clone)]
pub struct Problem {
    pub kind: ProblemKind,
    pub grid: TimeGrid,
    /// Carbon mass [GtC] in the three reservoirs in the start year.
    pub m_ini: [FloatValue; 3],
    /// Temperature deviation [K] of the two layers in the start year.
    pub t_ini: [FloatValue; 2],
    /// Carbon pulse [GtC] added to the atmosphere in the start year.
    pub pulse_gtc: FloatValue,
    pub co2_forcing: Co2ForcingMode,
    pub non_co2_forcing: NonCo2ForcingPolicy,
    pub integrate_carbon_cycle: bool,
    pub integrate_climate: bool,
    /// Carbon-cycle parameters, rescaled to the problem's time step.
    pub carbon: CarbonCycleParameters,
    /// Transfer coefficients derived from `carbon`.
    pub transfer: TransferCoefficients,
    pub climate: ClimateParameters,
    /// Prescribed atmospheric CO2 concentration [ppm] per step, if any. When
    /// present, the atmosphere reservoir is overwritten diagnostically from
    /// this series every step.
    pub prescribed_ppm: Option<Array1<FloatValue>>,
    /// Prescribed carbon emission to the atmosphere [GtC] per step.
    pub emissions_gtc: Array1<FloatValue>,
    /// Additional emission as a fraction of the current atmospheric mass,
    /// per step.
    pub percent_emission: FloatValue,
}

impl Problem {
    /// Let the DICE-2016 initial conditions relax towards equilibrium.
    pub fn equilibrate() -> ProblemBuilder {
        ProblemBuilder::new(ProblemKind::Equilibrate)
    }

    /// Carbon pulse [GtC] into the 2015 atmosphere.
    pub fn pulse(pulse_gtc: FloatValue) -> ProblemBuilder {
        let mut builder = ProblemBuilder::new(ProblemKind::Pulse);
        builder.pulse_gtc = pulse_gtc;
        builder
    }

    /// Instantaneous, constant forcing at `multiple` times the CO2-doubling
    /// forcing; carbon cycle disabled.
    pub fn step_forcing(multiple: FloatValue) -> ProblemBuilder {
        let mut builder = ProblemBuilder::new(ProblemKind::StepForcing);
        builder.begin_year = 1850.0;
        builder.m_ini = [0.0, 0.0, 0.0];
        builder.t_ini = [0.0, 0.0];
        builder.integrate_carbon_cycle = false;
        builder.co2_forcing = Co2ForcingMode::FromFixedMultipleOfDoubling { multiple };
        builder
    }

    /// Atmospheric CO2 concentration rising one percent per year from the
    /// 1850 equilibrium; carbon cycle disabled, forcing from the prescribed
    /// concentration.
    pub fn one_percent_co2() -> ProblemBuilder {
        let mut builder = ProblemBuilder::new(ProblemKind::OnePercentCo2);
        builder.begin_year = 1850.0;
        builder.m_ini = crate::constants::M_EQ_DICE_1850;
        builder.t_ini = [0.0, 0.0];
        builder.integrate_carbon_cycle = false;
        builder.co2_forcing = Co2ForcingMode::FromPrescribedConcentration;
        builder
    }

    /// Atmospheric CO2 concentrations prescribed from an external dataset.
    pub fn prescribed_concentration(series: ExternalTimeSeries) -> ProblemBuilder {
        let mut builder = ProblemBuilder::new(ProblemKind::PrescribedConcentration);
        builder.begin_year = 1850.0;
        builder.m_ini = [0.0, 0.0, 0.0];
        builder.t_ini = [0.0, 0.0];
        builder.integrate_carbon_cycle = false;
        builder.co2_forcing = Co2ForcingMode::FromPrescribedConcentration;
        builder.concentration_series = Some(series);
        builder
    }

    /// Carbon emissions prescribed from an external dataset, starting from
    /// the 1850 equilibrium masses.
    pub fn prescribed_emissions(series: ExternalTimeSeries) -> ProblemBuilder {
        let mut builder = ProblemBuilder::new(ProblemKind::PrescribedEmissions);
        builder.begin_year = 1850.0;
        builder.m_ini = crate::constants::M_EQ_DICE_1850;
        builder.t_ini = [0.0, 0.0];
        builder.emissions_series = Some(series);
        builder
    }

    /// Diagnose the per-step emission that keeps the atmospheric carbon mass
    /// constant; the diagnosed series is reported in the trajectory.
    pub fn hold_atmospheric_mass_constant() -> ProblemBuilder {
        ProblemBuilder::new(ProblemKind::HoldAtmosphericMassConstant)
    }
}

/// Builder for [`Problem`]. All settings are plain named options; `build`
/// validates the combination and derives every dependent coefficient.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    kind: ProblemKind,
    begin_year: Time,
    step_years: Time,
    horizon_years: Time,
    m_ini: [FloatValue; 3],
    t_ini: [FloatValue; 2],
    pulse_gtc: FloatValue,
    co2_forcing: Co2ForcingMode,
    non_co2_forcing: NonCo2ForcingPolicy,
    integrate_carbon_cycle: bool,
    integrate_climate: bool,
    carbon: CarbonCycleParameters,
    climate: ClimateParameters,
    climate_updates: Vec<ClimateUpdate>,
    emissions_series: Option<ExternalTimeSeries>,
    concentration_series: Option<ExternalTimeSeries>,
    constant_emissions_gtc: Option<FloatValue>,
    percent_emission: FloatValue,
}

impl ProblemBuilder {
    fn new(kind: ProblemKind) -> Self {
        Self {
            kind,
            begin_year: 2015.0,
            step_years: 1.0,
            horizon_years: 500.0,
            m_ini: M_INI_DICE,
            t_ini: T_INI_DICE,
            pulse_gtc: 0.0,
            co2_forcing: Co2ForcingMode::FromCarbonCycle,
            non_co2_forcing: NonCo2ForcingPolicy::None,
            integrate_carbon_cycle: true,
            integrate_climate: true,
            carbon: CarbonCycleParameters::dice2016_1850(),
            climate: ClimateParameters::dice2016_corrected(),
            climate_updates: Vec::new(),
            emissions_series: None,
            concentration_series: None,
            constant_emissions_gtc: None,
            percent_emission: 0.0,
        }
    }

    pub fn with_begin_year(mut self, begin_year: Time) -> Self {
        self.begin_year = begin_year;
        self
    }

    pub fn with_step_years(mut self, step_years: Time) -> Self {
        self.step_years = step_years;
        self
    }

    pub fn with_horizon_years(mut self, horizon_years: Time) -> Self {
        self.horizon_years = horizon_years;
        self
    }

    pub fn with_initial_mass(mut self, m_ini: [FloatValue; 3]) -> Self {
        self.m_ini = m_ini;
        self
    }

    pub fn with_initial_temperature(mut self, t_ini: [FloatValue; 2]) -> Self {
        self.t_ini = t_ini;
        self
    }

    pub fn with_pulse(mut self, pulse_gtc: FloatValue) -> Self {
        self.pulse_gtc = pulse_gtc;
        self
    }

    pub fn with_co2_forcing(mut self, mode: Co2ForcingMode) -> Self {
        self.co2_forcing = mode;
        self
    }

    pub fn with_non_co2_forcing(mut self, policy: NonCo2ForcingPolicy) -> Self {
        self.non_co2_forcing = policy;
        self
    }

    pub fn with_carbon_cycle_enabled(mut self, enabled: bool) -> Self {
        self.integrate_carbon_cycle = enabled;
        self
    }

    pub fn with_climate_enabled(mut self, enabled: bool) -> Self {
        self.integrate_climate = enabled;
        self
    }

    /// Carbon-cycle parameters at their own reference step; they are rescaled
    /// to the problem's step at build time.
    pub fn with_carbon_parameters(mut self, carbon: CarbonCycleParameters) -> Self {
        self.carbon = carbon;
        self
    }

    pub fn with_climate_parameters(mut self, climate: ClimateParameters) -> Self {
        self.climate = climate;
        self
    }

    /// Queue a partial climate-coefficient update; applied in order at build
    /// time with the explicit-coefficient precedence rule.
    pub fn with_climate_update(mut self, update: ClimateUpdate) -> Self {
        self.climate_updates.push(update);
        self
    }

    pub fn with_emissions(mut self, series: ExternalTimeSeries) -> Self {
        self.emissions_series = Some(series);
        self
    }

    pub fn with_concentrations(mut self, series: ExternalTimeSeries) -> Self {
        self.concentration_series = Some(series);
        self
    }

    /// Constant emission [GtC per step] applied every step.
    pub fn with_constant_emissions(mut self, gtc_per_step: FloatValue) -> Self {
        self.constant_emissions_gtc = Some(gtc_per_step);
        self
    }

    /// Emission as a fraction of the current atmospheric mass, per step.
    pub fn with_percent_emissions(mut self, fraction_per_step: FloatValue) -> Self {
        self.percent_emission = fraction_per_step;
        self
    }

    pub fn build(self) -> CdiceResult<Problem> {
        let grid = TimeGrid::spanning(self.begin_year, self.step_years, self.horizon_years)?;

        let carbon = self.carbon.rescaled(self.step_years)?;
        let transfer = TransferCoefficients::derive(&carbon)?;

        let mut climate = self.climate;
        for update in &self.climate_updates {
            climate = climate.apply(update)?;
        }
        let climate = climate.validated()?;

        let mut emissions_gtc = match self.constant_emissions_gtc {
            Some(gtc) => Array1::from_elem(grid.len, gtc),
            None => Array1::zeros(grid.len),
        };
        if let Some(series) = &self.emissions_series {
            if series.kind != SeriesKind::Emissions {
                return Err(CdiceError::InvalidConfiguration(format!(
                    "series '{}' is not an emissions series",
                    series.tag
                )));
            }
            emissions_gtc = series.remap_to(&grid)?;
        } else if self.kind == ProblemKind::PrescribedEmissions {
            return Err(CdiceError::InvalidConfiguration(
                "prescribed-emissions problem requires an emissions series".to_string(),
            ));
        }

        let prescribed_ppm = if self.kind == ProblemKind::OnePercentCo2 {
            let mut ppm = Array1::zeros(grid.len);
            ppm[0] = PPM_CO2_EQ_1850;
            for i in 1..grid.len {
                ppm[i] = ppm[i - 1] * 1.01_f64.powf(self.step_years);
            }
            Some(ppm)
        } else if let Some(series) = &self.concentration_series {
            if series.kind != SeriesKind::Concentrations {
                return Err(CdiceError::InvalidConfiguration(format!(
                    "series '{}' is not a concentration series",
                    series.tag
                )));
            }
            Some(series.remap_to(&grid)?)
        } else {
            None
        };

        if matches!(self.co2_forcing, Co2ForcingMode::FromPrescribedConcentration)
            && prescribed_ppm.is_none()
        {
            return Err(CdiceError::InvalidConfiguration(
                "prescribed-concentration forcing requires a concentration series".to_string(),
            ));
        }
        if let Some(ppm) = &prescribed_ppm {
            if ppm.iter().any(|value| !(*value > 0.0)) {
                return Err(CdiceError::NumericalDomain {
                    context: "problem configuration",
                    message: "prescribed concentrations must be positive".to_string(),
                });
            }
        }

        log::debug!(
            "built {:?} problem: {} steps of {} yr from {}",
            self.kind,
            grid.len,
            grid.step_years,
            grid.begin_year
        );

        Ok(Problem {
            kind: self.kind,
            grid,
            m_ini: self.m_ini,
            t_ini: self.t_ini,
            pulse_gtc: self.pulse_gtc,
            co2_forcing: self.co2_forcing,
            non_co2_forcing: self.non_co2_forcing,
            integrate_carbon_cycle: self.integrate_carbon_cycle,
            integrate_climate: self.integrate_climate,
            carbon,
            transfer,
            climate,
            prescribed_ppm,
            emissions_gtc,
            percent_emission: self.percent_emission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    #[test]
    fn equilibrate_preset_uses_dice_initial_conditions() {
        let problem = Problem::equilibrate().build().unwrap();
        assert_eq!(problem.m_ini, M_INI_DICE);
        assert_eq!(problem.t_ini, T_INI_DICE);
        assert_eq!(problem.grid.begin_year, 2015.0);
        assert!(problem.integrate_carbon_cycle);
        assert!(problem.integrate_climate);
    }

    #[test]
    fn carbon_coefficients_rescale_to_the_problem_step() {
        let problem = Problem::equilibrate().with_step_years(1.0).build().unwrap();
        // DICE-2016 b12 = 0.12 is defined for a five-year step.
        assert_relative_eq!(problem.carbon.b12, 0.12 / 5.0, max_relative = 1e-12);
        assert_eq!(problem.carbon.step_years, 1.0);
    }

    #[test]
    fn one_percent_concentrations_compound() {
        let problem = Problem::one_percent_co2()
            .with_horizon_years(140.0)
            .build()
            .unwrap();
        let ppm = problem.prescribed_ppm.as_ref().unwrap();
        assert_relative_eq!(ppm[0], PPM_CO2_EQ_1850, max_relative = 1e-12);
        assert_relative_eq!(ppm[1] / ppm[0], 1.01, max_relative = 1e-12);
        // Doubling after ~70 years of 1% growth.
        assert_relative_eq!(ppm[70] / ppm[0], 1.01_f64.powi(70), max_relative = 1e-12);
    }

    #[test]
    fn prescribed_emissions_without_series_fails_fast() {
        let result = ProblemBuilder::new(ProblemKind::PrescribedEmissions).build();
        assert!(matches!(result, Err(CdiceError::InvalidConfiguration(_))));
    }

    #[test]
    fn mismatched_series_kind_is_rejected() {
        let grid = TimeGrid::new(1850.0, 1.0, 10).unwrap();
        let series = ExternalTimeSeries::new(
            "RCP45_CONC",
            SeriesKind::Concentrations,
            grid,
            Array1::from_elem(10, 300.0),
        )
        .unwrap();
        let result = Problem::equilibrate().with_emissions(series).build();
        assert!(matches!(result, Err(CdiceError::InvalidConfiguration(_))));
    }

    #[test]
    fn external_emissions_are_remapped_to_the_problem_grid() {
        // Five-year input data driving an annual-step problem.
        let grid = TimeGrid::new(1850.0, 5.0, 21).unwrap();
        let series = ExternalTimeSeries::new(
            "RCP85_EMI",
            SeriesKind::Emissions,
            grid,
            Array1::from_elem(21, 5.0),
        )
        .unwrap();
        let problem = Problem::prescribed_emissions(series)
            .with_horizon_years(100.0)
            .build()
            .unwrap();
        assert_eq!(problem.emissions_gtc.len(), problem.grid.len);
        // 5 GtC per five-year step becomes 1 GtC per annual step.
        assert_relative_eq!(problem.emissions_gtc[50], 1.0, max_relative = 1e-12);
    }

    #[test]
    fn climate_updates_apply_in_order_with_precedence() {
        let problem = Problem::step_forcing(2.0)
            .with_climate_parameters(ClimateParameters::cdice())
            .with_climate_update(ClimateUpdate {
                c1: Some(0.2),
                heat_capacity_upper: Some(50.0),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(problem.climate.c1, 0.2);
    }

    #[test]
    fn invalid_step_is_rejected() {
        let result = Problem::equilibrate().with_step_years(0.0).build();
        assert!(matches!(result, Err(CdiceError::InvalidConfiguration(_))));
    }
}
