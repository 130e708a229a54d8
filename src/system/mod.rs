// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Orchestration of a single solver run.
//!
//! [`AceSystem::run`] executes the whole pipeline for one request:
//!
//! 1. validate the request and decide its defaults
//! 2. sample the pulses into pulse files (or reuse the caller's)
//! 3. write the parameter file
//! 4. run the solver and read its output table
//! 5. remove every temporary file this run created
//!
//! Each owned file is wrapped in a [`TempFile`] guard as soon as its path is
//! known, so cleanup happens on every exit path, including errors.
//! Caller-supplied pulse files and process-tensor caches are never removed.
//!
//! File names are derived from the request's prefix and suffix only. Runs
//! sharing a working directory must use distinct suffixes.

pub mod cleanup;

use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::info;

use crate::config::SolverConfig;
use crate::error::Result;
use crate::param::{build_directives, write_parameter_file};
use crate::process_tensor::GenerationMarker;
use crate::pulse::{prepare_pulse_files, Pulse};
use crate::request::SimulationRequest;
use crate::solver::{read_output_table, AceRunner, SolverRunner};
use crate::validation;

pub use cleanup::TempFile;

/// Result of [`AceSystem::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Input files were written but the solver was not run
    Prepared { param_file: PathBuf },
    /// The solver's output table
    Completed(Array2<f64>),
}

impl RunOutcome {
    /// The output table, if the solver ran.
    pub fn into_table(self) -> Option<Array2<f64>> {
        match self {
            RunOutcome::Completed(table) => Some(table),
            RunOutcome::Prepared { .. } => None,
        }
    }
}

/// Runs simulation requests through the solver.
pub struct AceSystem {
    runner: Box<dyn SolverRunner>,
    temp_dir: PathBuf,
    verbose: bool,
}

impl AceSystem {
    /// Create a system running the configured solver binary.
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            runner: Box::new(AceRunner::new(config.binary.clone())),
            temp_dir: config.temp_dir.clone(),
            verbose: config.verbose,
        }
    }

    /// Replace the solver runner.
    pub fn with_runner(mut self, runner: Box<dyn SolverRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Parameter file path for `request`.
    pub fn param_path(&self, request: &SimulationRequest) -> PathBuf {
        self.temp_dir.join(format!(
            "{}_{}.param",
            request.files.system_prefix, request.files.suffix
        ))
    }

    /// Path the solver writes its table to.
    pub fn out_path(&self, request: &SimulationRequest) -> PathBuf {
        self.temp_dir.join(format!(
            "{}_{}.out",
            request.files.system_prefix, request.files.suffix
        ))
    }

    /// Run `request` driven by `pulses`.
    ///
    /// `pulses` is ignored when the request names its own pulse files.
    pub fn run<P: Pulse>(&self, request: &SimulationRequest, pulses: &[P]) -> Result<RunOutcome> {
        let resolved = validation::resolve(request, self.verbose)?;
        let prepare_only = request.files.prepare_only;

        let _marker = if resolved.generate_pt && !prepare_only {
            Some(GenerationMarker::acquire(&resolved.pt_file)?)
        } else {
            None
        };

        let out_file = TempFile::new(self.out_path(request));
        let param_path = self.param_path(request);

        let pulse_files = prepare_pulse_files(request, pulses, &self.temp_dir)?;
        let mut pulse_guards: Vec<TempFile> = if pulse_files.owned {
            std::iter::once(pulse_files.x.clone())
                .chain(pulse_files.y.clone())
                .map(TempFile::new)
                .collect()
        } else {
            Vec::new()
        };

        let mut param_file = TempFile::new(&param_path);
        if request.files.keep_param {
            param_file.keep();
        }

        let directives = build_directives(&resolved, &pulse_files, out_file.path())?;
        write_parameter_file(&param_path, &directives)?;

        if prepare_only {
            param_file.keep();
            pulse_guards.iter_mut().for_each(TempFile::keep);
            info!(param_file = %param_path.display(), "Prepared parameter file, not running solver");
            return Ok(RunOutcome::Prepared {
                param_file: param_path,
            });
        }

        if resolved.generate_pt {
            info!(pt_file = %resolved.pt_file.display(), "Generating process tensor");
        }
        self.runner.run(&param_path, resolved.verbose)?;

        let table = read_output_table(out_file.path())?;
        info!(
            solver = self.runner.name(),
            rows = table.nrows(),
            columns = table.ncols(),
            "Solver run completed"
        );
        Ok(RunOutcome::Completed(table))
    }
}
