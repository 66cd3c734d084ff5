//! End-to-end benchmark scenarios for the coupled integrator.
//!
//! These are the two standard perturbation experiments from the calibration
//! literature:
//! - a 100 GtC carbon pulse, checked against the Joos et al. (2013)
//!   airborne-fraction bounds,
//! - an abrupt 4xCO2 forcing step, checked against the equilibrium implied
//!   by the Geoffroy et al. (2013) two-layer coefficients.

use approx::assert_relative_eq;
use cdice_core::benchmark::geoffroy;
use cdice_core::carbon_cycle::CarbonCycleParameters;
use cdice_core::climate::ClimateParameters;
use cdice_core::integrator::Simulation;
use cdice_core::problem::Problem;
use cdice_core::timeseries::TimeGrid;

mod pulse_response {
    use super::*;

    /// Joos et al. (2013), Fig. 4: fraction of a 100 GtC pulse remaining in
    /// a present-day atmosphere after 20 years lies in [0.55, 0.70].
    #[test]
    fn airborne_fraction_stays_in_published_bounds() {
        let pulse = 100.0;
        let problem = Problem::pulse(pulse)
            .with_carbon_parameters(CarbonCycleParameters {
                b12: 0.054,
                b23: 0.0082,
                m_eq: [607.0, 489.0, 1281.0],
                step_years: 1.0,
            })
            .with_initial_mass([607.0, 489.0, 1281.0])
            .with_step_years(1.0)
            .with_horizon_years(1000.0)
            .build()
            .unwrap();
        let trajectory = Simulation::new(problem).run().unwrap();
        assert_eq!(trajectory.len(), 1001);

        let fraction = trajectory.airborne_fraction(pulse);
        assert_relative_eq!(fraction[0], 1.0, max_relative = 1e-12);

        assert!(
            fraction[20] >= 0.55 && fraction[20] <= 0.70,
            "airborne fraction after 20 years is {}, outside [0.55, 0.70]",
            fraction[20]
        );
        // Looser literature bands further out.
        assert!(
            fraction[100] >= 0.30 && fraction[100] <= 0.50,
            "airborne fraction after 100 years is {}",
            fraction[100]
        );

        // The pulse decays monotonically towards the ocean.
        for window in fraction.to_vec().windows(2) {
            assert!(window[1] <= window[0] + 1e-12);
        }
    }

    #[test]
    fn pulse_conserves_total_carbon() {
        let problem = Problem::pulse(100.0)
            .with_carbon_parameters(CarbonCycleParameters::cdice())
            .with_initial_mass([607.0, 489.0, 1281.0])
            .with_horizon_years(1000.0)
            .build()
            .unwrap();
        let trajectory = Simulation::new(problem).run().unwrap();

        let total_at = |i: usize| -> f64 { (0..3).map(|r| trajectory.reservoir_mass[[r, i]]).sum() };
        let initial = total_at(0);
        for i in [1, 10, 100, 1000] {
            assert_relative_eq!(total_at(i), initial, max_relative = 1e-12);
        }
    }
}

mod step_forcing {
    use super::*;

    /// Abrupt 4xCO2 (a forcing multiple of two doublings) equilibrates at
    /// twice the equilibrium climate sensitivity.
    #[test]
    fn quadrupling_equilibrates_at_twice_the_ecs() {
        let problem = Problem::step_forcing(2.0)
            .with_climate_parameters(ClimateParameters {
                fco22x: 3.45,
                t2xco2: 3.25,
                c1: 0.137,
                c3: 0.73,
                c4: 0.00689,
            })
            .with_step_years(1.0)
            .with_horizon_years(1000.0)
            .build()
            .unwrap();
        let trajectory = Simulation::new(problem).run().unwrap();

        let last = trajectory.len() - 1;
        assert_relative_eq!(
            trajectory.temperature[[0, last]],
            2.0 * 3.25,
            max_relative = 0.01
        );
        // The deep ocean lags the surface layer on the way there.
        assert!(trajectory.temperature[[1, 500]] < trajectory.temperature[[0, 500]]);
    }

    /// The integrator and the Geoffroy benchmark stepper implement the same
    /// update: driving the integrator with a fitted model's coefficients
    /// reproduces that model's step response exactly.
    #[test]
    fn integrator_matches_benchmark_stepper() {
        let fit = geoffroy::multi_model_mean();
        let problem = Problem::step_forcing(2.0)
            .with_climate_parameters(fit.climate_parameters().unwrap())
            .with_horizon_years(150.0)
            .build()
            .unwrap();
        let trajectory = Simulation::new(problem).run().unwrap();

        let grid = TimeGrid::new(0.0, 1.0, 151).unwrap();
        let reference = fit.step_response(2.0, &grid).unwrap();
        for i in [1, 10, 50, 150] {
            assert_relative_eq!(
                trajectory.temperature[[0, i]],
                reference[[0, i]],
                max_relative = 1e-12
            );
            assert_relative_eq!(
                trajectory.temperature[[1, i]],
                reference[[1, i]],
                max_relative = 1e-12
            );
        }
    }
}
