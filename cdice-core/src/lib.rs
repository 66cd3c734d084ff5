//! Carbon-cycle and climate core of the CDICE integrated assessment model.
//!
//! The crate implements the climate part of DICE in a corrected formulation
//! with an arbitrary (not hard-wired five-year) time step:
//!
//! - a three-reservoir carbon cycle (atmosphere, upper ocean, lower ocean)
//!   with a mass-conserving transfer matrix ([`carbon_cycle`]),
//! - a two-layer energy-balance temperature model ([`climate`]),
//! - radiative forcing from CO2 plus selectable non-CO2 policies ([`forcing`]),
//! - validated problem set-ups for the standard perturbation experiments
//!   ([`problem`]) and a forward-Euler trajectory integrator ([`integrator`]),
//! - re-discretization of external emission and concentration series
//!   ([`timeseries`]),
//! - comparison trajectories from the published pulse-response and
//!   step-forcing literature ([`benchmark`]).

pub mod benchmark;
pub mod carbon_cycle;
pub mod climate;
pub mod constants;
pub mod errors;
pub mod forcing;
pub mod integrator;
pub mod problem;
pub mod timeseries;
