// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! External solver invocation.
//!
//! The solver is an opaque executable taking the parameter file path as its
//! only argument. [`SolverRunner`] is the seam between the orchestration and
//! the process; [`AceRunner`] is the real implementation.

pub mod output;

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::SolverError;

pub use output::read_output_table;

/// Runs the solver on a parameter file.
pub trait SolverRunner: Send + Sync {
    /// Name of the solver, for logging.
    fn name(&self) -> &str;

    /// Run the solver and wait for it to exit.
    ///
    /// With `verbose` the solver inherits the standard streams; otherwise
    /// its standard output is captured and discarded.
    fn run(&self, param_file: &Path, verbose: bool) -> Result<(), SolverError>;
}

impl<R: SolverRunner + ?Sized> SolverRunner for Arc<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&self, param_file: &Path, verbose: bool) -> Result<(), SolverError> {
        (**self).run(param_file, verbose)
    }
}

/// Runs the ACE executable as a child process.
#[derive(Debug, Clone)]
pub struct AceRunner {
    binary: String,
}

impl AceRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Locate the binary: an explicit path if it exists, else a `PATH` lookup.
    pub fn locate(&self) -> Option<PathBuf> {
        let candidate = Path::new(&self.binary);
        if candidate.components().count() > 1 {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }
        let path = env::var_os("PATH")?;
        env::split_paths(&path)
            .map(|dir| dir.join(&self.binary))
            .find(|p| p.is_file())
    }
}

impl Default for AceRunner {
    fn default() -> Self {
        Self::new("ACE")
    }
}

impl SolverRunner for AceRunner {
    fn name(&self) -> &str {
        &self.binary
    }

    fn run(&self, param_file: &Path, verbose: bool) -> Result<(), SolverError> {
        let mut command = Command::new(&self.binary);
        command.arg(param_file);

        let result = if verbose {
            info!(solver = %self.binary, param_file = %param_file.display(), "Running solver");
            command.status()
        } else {
            debug!(solver = %self.binary, param_file = %param_file.display(), "Running solver");
            command
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .output()
                .map(|output| output.status)
        };
        let status = result.map_err(|source| SolverError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        if !status.success() {
            return Err(SolverError::ExitStatus {
                binary: self.binary.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
