//! Forward-Euler time integration of the coupled carbon-cycle / climate
//! system.
//!
//! Each step advances in a fixed order:
//!
//! 1. carry the previous masses and temperatures forward (so disabled
//!    subsystems still produce complete trajectories),
//! 2. if the carbon cycle is integrated, apply the transfer matrix and add
//!    the prescribed and percentage emissions to the atmosphere; in the
//!    hold-mass-constant diagnostic the required emission is backed out from
//!    the pre-emission masses first,
//! 3. overwrite the atmosphere mass from the prescribed concentration series
//!    when one is configured (the transfer matrix is bypassed for that
//!    component only),
//! 4. evaluate CO2 and non-CO2 forcing from the just-updated masses,
//! 5. if the climate is integrated, advance both layer temperatures from the
//!    same prior-step snapshot using the forcing just computed.

use crate::constants::PPM_CO2_PER_GTC;
use crate::errors::CdiceResult;
use crate::problem::{Problem, ProblemKind};
use crate::timeseries::{FloatValue, Time};
use nalgebra::Vector3;
use ndarray::{Array1, Array2};

/// Full state trajectory of one integration, indexed by time step.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub year: Array1<Time>,
    /// Carbon mass [GtC] per reservoir, shape `(3, steps)`.
    pub reservoir_mass: Array2<FloatValue>,
    /// Temperature deviation [K] per layer, shape `(2, steps)`.
    pub temperature: Array2<FloatValue>,
    /// Total forcing [W/m^2] per step.
    pub forcing_total: Array1<FloatValue>,
    /// CO2 contribution to the forcing [W/m^2] per step.
    pub forcing_co2: Array1<FloatValue>,
    /// Non-CO2 contribution to the forcing [W/m^2] per step.
    pub forcing_non_co2: Array1<FloatValue>,
    /// Carbon emission [GtC] actually applied per step; in the
    /// hold-mass-constant diagnostic this contains the backed-out emissions.
    pub emissions_applied: Array1<FloatValue>,
    /// Forcing evaluated for the unperturbed initial masses, before pulse or
    /// concentration overwrite.
    pub forcing_before_perturbation: FloatValue,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
    }

    /// Fraction of an injected pulse remaining in the atmosphere at each
    /// step, relative to the pre-pulse atmospheric mass.
    pub fn airborne_fraction(&self, pulse_gtc: FloatValue) -> Array1<FloatValue> {
        let baseline = self.reservoir_mass[[0, 0]] - pulse_gtc;
        self.reservoir_mass
            .row(0)
            .mapv(|mass| (mass - baseline) / pulse_gtc)
    }
}

/// Single-threaded, synchronous integrator for one [`Problem`].
#[derive(Debug, Clone)]
pub struct Simulation {
    problem: Problem,
}

impl Simulation {
    pub fn new(problem: Problem) -> Self {
        Self { problem }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Integrate the full horizon and return the trajectory.
    pub fn run(&self) -> CdiceResult<Trajectory> {
        let problem = &self.problem;
        let grid = &problem.grid;
        let steps = grid.len;
        let dt = grid.step_years;
        let m_eq_atmosphere = problem.carbon.m_eq[0];
        let fco22x = problem.climate.fco22x;

        let mut year = Array1::zeros(steps);
        let mut reservoir_mass = Array2::zeros((3, steps));
        let mut temperature = Array2::zeros((2, steps));
        let mut forcing_total = Array1::zeros(steps);
        let mut forcing_co2 = Array1::zeros(steps);
        let mut forcing_non_co2 = Array1::zeros(steps);
        let mut emissions = problem.emissions_gtc.clone();

        let prescribed_ppm_at = |index: usize| -> Option<FloatValue> {
            problem.prescribed_ppm.as_ref().map(|ppm| ppm[index])
        };

        // Forcing of the unperturbed initial state, for reference.
        let forcing_before_perturbation = problem.co2_forcing.evaluate(
            fco22x,
            problem.m_ini[0],
            m_eq_atmosphere,
            prescribed_ppm_at(0),
        )?;

        // Start values. The pulse lands in the atmosphere of the start year;
        // a prescribed concentration overrides the atmosphere mass outright.
        year[0] = grid.begin_year;
        let mut mass = Vector3::from_column_slice(&problem.m_ini);
        mass[0] += problem.pulse_gtc;
        if let Some(ppm) = prescribed_ppm_at(0) {
            mass[0] = ppm / PPM_CO2_PER_GTC;
        }
        for reservoir in 0..3 {
            reservoir_mass[[reservoir, 0]] = mass[reservoir];
        }
        temperature[[0, 0]] = problem.t_ini[0];
        temperature[[1, 0]] = problem.t_ini[1];
        forcing_co2[0] =
            problem
                .co2_forcing
                .evaluate(fco22x, mass[0], m_eq_atmosphere, prescribed_ppm_at(0))?;
        forcing_non_co2[0] = problem.non_co2_forcing.evaluate(year[0], forcing_co2[0]);
        forcing_total[0] = forcing_co2[0] + forcing_non_co2[0];

        for i in 1..steps {
            year[i] = year[i - 1] + dt;

            let previous_mass = Vector3::new(
                reservoir_mass[[0, i - 1]],
                reservoir_mass[[1, i - 1]],
                reservoir_mass[[2, i - 1]],
            );
            let mut mass = previous_mass;

            if problem.integrate_carbon_cycle {
                mass = problem.transfer.step(&previous_mass);
                if problem.kind == ProblemKind::HoldAtmosphericMassConstant {
                    // Back out the emission that undoes the transfer-induced
                    // drift of the atmosphere, using the pre-emission masses.
                    emissions[i - 1] = previous_mass[0] - mass[0];
                }
                mass[0] += emissions[i - 1] + previous_mass[0] * problem.percent_emission;
            }
            if let Some(ppm) = prescribed_ppm_at(i) {
                mass[0] = ppm / PPM_CO2_PER_GTC;
            }
            for reservoir in 0..3 {
                reservoir_mass[[reservoir, i]] = mass[reservoir];
            }

            forcing_co2[i] = problem.co2_forcing.evaluate(
                fco22x,
                mass[0],
                m_eq_atmosphere,
                prescribed_ppm_at(i),
            )?;
            forcing_non_co2[i] = problem.non_co2_forcing.evaluate(year[i], forcing_co2[i]);
            forcing_total[i] = forcing_co2[i] + forcing_non_co2[i];

            let previous_temperature = [temperature[[0, i - 1]], temperature[[1, i - 1]]];
            let next_temperature = if problem.integrate_climate {
                problem
                    .climate
                    .step(previous_temperature, forcing_total[i], dt)
            } else {
                previous_temperature
            };
            temperature[[0, i]] = next_temperature[0];
            temperature[[1, i]] = next_temperature[1];
        }

        Ok(Trajectory {
            year,
            reservoir_mass,
            temperature,
            forcing_total,
            forcing_co2,
            forcing_non_co2,
            emissions_applied: emissions,
            forcing_before_perturbation,
        })
    }
}
