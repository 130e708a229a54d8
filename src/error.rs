// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for aceqd.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for aceqd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// aceqd error types.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Request validation error
    Validation(ValidationError),
    /// Solver error
    Solver(SolverError),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Solver(e) => write!(f, "Solver error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Solver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<SolverError> for Error {
    fn from(e: SolverError) -> Self {
        Error::Solver(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Errors raised while checking a simulation request.
#[derive(Debug)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Phonons were requested without a boson coupling operator
    MissingBosonOperator,
    /// An interaction term is routed to a pulse file that does not exist
    MissingPulseFile { polarization: String },
    /// Another run is already generating this process tensor
    ProcessTensorBusy { marker: PathBuf },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::MissingBosonOperator => {
                write!(f, "phonons enabled, but no boson operator specified")
            }
            ValidationError::MissingPulseFile { polarization } => {
                write!(f, "pulse file for polarization '{}' not given", polarization)
            }
            ValidationError::ProcessTensorBusy { marker } => {
                write!(
                    f,
                    "process tensor is already being generated (remove {} if stale)",
                    marker.display()
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised by the external solver or while reading its output.
#[derive(Debug)]
pub enum SolverError {
    /// The solver binary could not be started
    Spawn { binary: String, source: std::io::Error },
    /// The solver exited with a nonzero status
    ExitStatus { binary: String, code: Option<i32> },
    /// The output table could not be read
    Output { path: PathBuf, message: String },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Spawn { binary, source } => {
                write!(f, "failed to start '{}': {}", binary, source)
            }
            SolverError::ExitStatus { binary, code } => match code {
                Some(code) => write!(f, "'{}' exited with status {}", binary, code),
                None => write!(f, "'{}' was terminated by a signal", binary),
            },
            SolverError::Output { path, message } => {
                write!(f, "unreadable output {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}
