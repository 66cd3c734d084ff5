//! Time grids and re-discretization of external emission and concentration
//! series.
//!
//! External datasets (CMIP5 RCP emissions and concentrations, historical
//! records) arrive on their own time discretization. Before they can drive a
//! simulation they must be re-mapped onto the problem's grid. The two series
//! kinds behave differently:
//!
//! - **Emissions** are amounts per time step. Coarsening averages the input
//!   steps and rescales by the step ratio so the time-integrated emission is
//!   unchanged. Refining interpolates the per-step amounts and rescales the
//!   same way.
//! - **Concentrations** are instantaneous values and are linearly
//!   interpolated regardless of step direction.
//!
//! Output years outside the input range take the nearest edge value (flat
//! extension, never linear extrapolation).

use crate::errors::{CdiceError, CdiceResult};
use ndarray::{s, Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// The float type used throughout the crate.
pub type FloatValue = f64;

/// Time, expressed in (fractional) calendar years.
pub type Time = f64;

/// Relative tolerance used when checking that two step sizes are an integer
/// multiple of each other.
const STEP_RATIO_TOLERANCE: f64 = 1e-9;

/// A uniform time discretization: `len` samples starting at `begin_year`,
/// spaced `step_years` apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub begin_year: Time,
    pub step_years: Time,
    pub len: usize,
}

impl TimeGrid {
    pub fn new(begin_year: Time, step_years: Time, len: usize) -> CdiceResult<Self> {
        if !(step_years > 0.0) {
            return Err(CdiceError::InvalidConfiguration(format!(
                "time step must be positive, got {step_years}"
            )));
        }
        if len == 0 {
            return Err(CdiceError::InvalidConfiguration(
                "time grid must contain at least one sample".to_string(),
            ));
        }
        Ok(Self {
            begin_year,
            step_years,
            len,
        })
    }

    /// Grid covering `total_years` of integration at step `step_years`,
    /// including both the start and the end year.
    pub fn spanning(begin_year: Time, step_years: Time, total_years: Time) -> CdiceResult<Self> {
        if !(step_years > 0.0) || !(total_years > 0.0) {
            return Err(CdiceError::InvalidConfiguration(format!(
                "time step and horizon must be positive, got step={step_years}, horizon={total_years}"
            )));
        }
        let len = (total_years / step_years) as usize + 1;
        Self::new(begin_year, step_years, len)
    }

    pub fn year(&self, index: usize) -> Time {
        self.begin_year + index as Time * self.step_years
    }

    pub fn end_year(&self) -> Time {
        self.year(self.len - 1)
    }

    pub fn years(&self) -> Array1<Time> {
        Array1::from_iter((0..self.len).map(|i| self.year(i)))
    }
}

/// Whether a series holds per-step amounts or instantaneous values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    /// Amounts per time step (e.g. GtC emitted per step). Remapping preserves
    /// the cumulative, time-integrated total.
    Emissions,
    /// Instantaneous values (e.g. ppm CO2). Remapping interpolates.
    Concentrations,
}

/// An external emission or concentration record, tagged by source dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalTimeSeries {
    /// Source dataset tag, e.g. `RCP45_EMI` or `C5HIST_CONC`.
    pub tag: String,
    pub kind: SeriesKind,
    pub grid: TimeGrid,
    pub values: Array1<FloatValue>,
}

impl ExternalTimeSeries {
    pub fn new(
        tag: impl Into<String>,
        kind: SeriesKind,
        grid: TimeGrid,
        values: Array1<FloatValue>,
    ) -> CdiceResult<Self> {
        if values.is_empty() {
            return Err(CdiceError::EmptySeries);
        }
        if values.len() != grid.len {
            return Err(CdiceError::InvalidConfiguration(format!(
                "series has {} values but its grid declares {} samples",
                values.len(),
                grid.len
            )));
        }
        Ok(Self {
            tag: tag.into(),
            kind,
            grid,
            values,
        })
    }

    /// Re-map this series onto `output`, honoring the series kind.
    pub fn remap_to(&self, output: &TimeGrid) -> CdiceResult<Array1<FloatValue>> {
        remap(self.values.view(), &self.grid, output, self.kind)
    }
}

/// Re-map `values` from the `input` grid onto the `output` grid.
///
/// Requires the two step sizes to be an integer multiple of each other in one
/// direction; anything else is rejected rather than silently truncated.
pub fn remap(
    values: ArrayView1<FloatValue>,
    input: &TimeGrid,
    output: &TimeGrid,
    kind: SeriesKind,
) -> CdiceResult<Array1<FloatValue>> {
    if values.is_empty() || input.len == 0 {
        return Err(CdiceError::EmptySeries);
    }
    if values.len() != input.len {
        return Err(CdiceError::InvalidConfiguration(format!(
            "input series has {} values but its grid declares {} samples",
            values.len(),
            input.len
        )));
    }

    let ratio = output.step_years / input.step_years;
    let coarsen_factor = integer_step_factor(ratio)?;

    let out = match (kind, coarsen_factor) {
        // Coarsening emissions: average the covered input steps, then rescale
        // by the step ratio so cumulative mass is preserved.
        (SeriesKind::Emissions, Some(factor)) if factor >= 2 => {
            average_windows(values, input, output, factor, ratio)
        }
        // Refining (or same-step) emissions: interpolate the per-step amount
        // and rescale it to the output step.
        (SeriesKind::Emissions, _) => {
            Array1::from_iter((0..output.len).map(|i| {
                sample_linear(values, input, output.year(i)) * ratio
            }))
        }
        // Concentrations are not conserved quantities: always interpolate.
        (SeriesKind::Concentrations, _) => {
            Array1::from_iter((0..output.len).map(|i| sample_linear(values, input, output.year(i))))
        }
    };
    Ok(out)
}

/// Verify the step ratio is an integer multiple in one direction.
///
/// Returns `Some(k)` with the coarsening factor when the output step is `k`
/// times the input step, `None` when the output step is finer or equal.
fn integer_step_factor(ratio: f64) -> CdiceResult<Option<usize>> {
    let candidate = if ratio >= 1.0 { ratio } else { 1.0 / ratio };
    let rounded = candidate.round();
    if (candidate - rounded).abs() > STEP_RATIO_TOLERANCE * candidate.max(1.0) {
        return Err(CdiceError::IncommensurateGrids(ratio));
    }
    if ratio >= 1.0 {
        Ok(Some(rounded as usize))
    } else {
        Ok(None)
    }
}

/// Sample the input series at `year` by linear interpolation, holding edge
/// values flat outside the covered range.
fn sample_linear(values: ArrayView1<FloatValue>, input: &TimeGrid, year: Time) -> FloatValue {
    if year <= input.begin_year {
        return values[0];
    }
    if year >= input.end_year() {
        return values[input.len - 1];
    }
    let position = (year - input.begin_year) / input.step_years;
    let index = position.floor() as usize;
    let fraction = position - index as f64;
    let next = (index + 1).min(input.len - 1);
    values[index] * (1.0 - fraction) + values[next] * fraction
}

/// Average `factor` consecutive input steps per output step and rescale by the
/// step ratio. Windows are clamped to the available input range, which yields
/// flat edge extension for output years before or after the input coverage.
fn average_windows(
    values: ArrayView1<FloatValue>,
    input: &TimeGrid,
    output: &TimeGrid,
    factor: usize,
    ratio: f64,
) -> Array1<FloatValue> {
    let window = factor.min(input.len);
    let last_start = input.len - window;
    Array1::from_iter((0..output.len).map(|i| {
        let year = output.year(i);
        let position = ((year - input.begin_year) / input.step_years).floor();
        let start = if position <= 0.0 {
            0
        } else {
            (position as usize).min(last_start)
        };
        let mean = values.slice(s![start..start + window]).mean().unwrap();
        mean * ratio
    }))
}
