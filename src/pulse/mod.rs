// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pulse sampling.
//!
//! The solver reads the driving field from two sampled files, one per
//! polarization axis. This module evaluates all [`Pulse`] sources on a
//! common grid, splits them by polarization and writes the files, or passes
//! through files the caller already has.
//!
//! The grid extends 10% past the simulation window and is `10 * nintermediate`
//! times finer than the solver step, so the solver's own interpolation never
//! sees the sampling.

pub mod chirped;
pub mod export;

use std::path::{Path, PathBuf};

use ndarray::Array1;
use num_complex::Complex64;
use tracing::debug;

use crate::error::Result;
use crate::request::{Polarization, SimulationRequest};
use crate::system::TempFile;

pub use chirped::ChirpedPulse;
pub use export::write_complex_columns;

/// Significant digits written to pulse files.
pub const PULSE_FILE_PRECISION: usize = 8;

/// A pulse source driving the system.
pub trait Pulse {
    /// Weight of this pulse on the x and y polarization axes.
    fn polarization(&self) -> (Complex64, Complex64);

    /// Complex field amplitude at each time in `t`.
    fn sample(&self, t: &Array1<f64>) -> Array1<Complex64>;
}

impl<P: Pulse + ?Sized> Pulse for Box<P> {
    fn polarization(&self) -> (Complex64, Complex64) {
        (**self).polarization()
    }

    fn sample(&self, t: &Array1<f64>) -> Array1<Complex64> {
        (**self).sample(t)
    }
}

/// Sampling grid for a request.
pub fn time_grid(request: &SimulationRequest) -> Array1<f64> {
    let step = request.dt / (10.0 * request.nintermediate as f64);
    Array1::range(1.1 * request.t_start, 1.1 * request.t_end, step)
}

/// Sum all pulses on `t`, separated into x and y components.
pub fn sample_polarized<P: Pulse>(
    pulses: &[P],
    t: &Array1<f64>,
) -> (Array1<Complex64>, Array1<Complex64>) {
    let mut x = Array1::<Complex64>::zeros(t.len());
    let mut y = Array1::<Complex64>::zeros(t.len());
    for pulse in pulses {
        let (polar_x, polar_y) = pulse.polarization();
        let field = pulse.sample(t);
        x.scaled_add(polar_x, &field);
        y.scaled_add(polar_y, &field);
    }
    (x, y)
}

/// The pulse files a run refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseFiles {
    pub x: PathBuf,
    pub y: Option<PathBuf>,
    /// Files were written by this run and are deleted after it
    pub owned: bool,
}

impl PulseFiles {
    /// File for the given polarization, if one exists.
    pub fn for_polarization(&self, polarization: Polarization) -> Option<&Path> {
        match polarization {
            Polarization::X => Some(&self.x),
            Polarization::Y => self.y.as_deref(),
        }
    }
}

/// Pulse file paths generated for a request inside `temp_dir`.
pub fn generated_paths(request: &SimulationRequest, temp_dir: &Path) -> (PathBuf, PathBuf) {
    let files = &request.files;
    (
        temp_dir.join(format!("{}_pulse_x_{}.dat", files.system_prefix, files.suffix)),
        temp_dir.join(format!("{}_pulse_y_{}.dat", files.system_prefix, files.suffix)),
    )
}

/// Provide the pulse files for `request`.
///
/// Caller-supplied files are returned untouched and marked as not owned.
/// Otherwise both polarization files are sampled and written to `temp_dir`.
pub fn prepare_pulse_files<P: Pulse>(
    request: &SimulationRequest,
    pulses: &[P],
    temp_dir: &Path,
) -> Result<PulseFiles> {
    if let Some(x) = &request.files.pulse_file_x {
        debug!(pulse_file_x = %x.display(), "Using supplied pulse files");
        return Ok(PulseFiles {
            x: x.clone(),
            y: request.files.pulse_file_y.clone(),
            owned: false,
        });
    }

    let t = time_grid(request);
    let (field_x, field_y) = sample_polarized(pulses, &t);
    let (path_x, path_y) = generated_paths(request, temp_dir);

    // Removes the x file again if the y file cannot be written.
    let mut guard_x = TempFile::new(&path_x);
    write_complex_columns(&path_x, &t, &field_x, PULSE_FILE_PRECISION)?;
    write_complex_columns(&path_y, &t, &field_y, PULSE_FILE_PRECISION)?;
    guard_x.keep();

    debug!(
        samples = t.len(),
        pulses = pulses.len(),
        pulse_file_x = %path_x.display(),
        "Wrote pulse files"
    );

    Ok(PulseFiles {
        x: path_x,
        y: Some(path_y),
        owned: true,
    })
}
