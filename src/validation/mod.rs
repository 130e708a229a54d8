// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Request validation and defaulting.
//!
//! [`resolve`] checks a [`SimulationRequest`] before any file is written and
//! fills in what the caller left out. Ambiguous defaults produce log notices;
//! combinations the solver cannot run produce a [`ValidationError`].

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{Result, ValidationError};
use crate::process_tensor;
use crate::request::{OperatorApplication, SimulationRequest};

/// Ground state of a two-level system.
pub const DEFAULT_INITIAL_STATE: &str = "|0><0|_2";

/// A request with all defaults decided.
#[derive(Debug, Clone)]
pub struct ResolvedRequest<'a> {
    pub request: &'a SimulationRequest,
    /// Initial state expression
    pub initial: String,
    /// Process-tensor path, read or written when phonons are enabled
    pub pt_file: PathBuf,
    /// Compute and persist the process tensor in this run
    pub generate_pt: bool,
    /// Stream solver output
    pub verbose: bool,
}

impl<'a> ResolvedRequest<'a> {
    /// The multi-time operator application, if requested.
    pub fn multitime(&self) -> Option<&'a OperatorApplication> {
        self.request.apply.as_ref()
    }

    pub fn phonons(&self) -> bool {
        self.request.phonons.enabled
    }
}

/// Validate `request` and decide its defaults.
///
/// `default_verbose` is the configured verbosity; a request can only turn
/// verbosity on, and generating a process tensor always does.
pub fn resolve(request: &SimulationRequest, default_verbose: bool) -> Result<ResolvedRequest<'_>> {
    validate_time_window(request)?;
    validate_lindblad_rates(request)?;

    if request.system_ops.is_none() {
        warn!("System operator not supplied, assuming TLS");
    }
    if request.phonons.enabled && request.boson_op.is_none() {
        return Err(ValidationError::MissingBosonOperator.into());
    }

    let initial = match &request.initial {
        Some(initial) => initial.clone(),
        None => {
            warn!(
                initial = DEFAULT_INITIAL_STATE,
                "No initial state specified, assuming TLS ground state"
            );
            DEFAULT_INITIAL_STATE.to_string()
        }
    };

    let mut verbose = default_verbose || request.verbose;
    if verbose && request.interaction_ops.is_none() {
        info!("No interaction hamiltonian");
    }

    let pt_file = process_tensor::resolve_path(request);
    let mut generate_pt = request.phonons.enabled && request.phonons.generate_pt;
    if request.phonons.enabled && !pt_file.exists() {
        warn!(pt_file = %pt_file.display(), "Process tensor not found. Calculating...");
        generate_pt = true;
        verbose = true;
    }

    Ok(ResolvedRequest {
        request,
        initial,
        pt_file,
        generate_pt,
        verbose,
    })
}

fn validate_time_window(request: &SimulationRequest) -> Result<()> {
    for (field, value) in [
        ("t_start", request.t_start),
        ("t_end", request.t_end),
        ("dt", request.dt),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::Field {
                field: field.into(),
                message: format!("must be finite, got {}", value),
            }
            .into());
        }
    }

    if request.dt <= 0.0 {
        return Err(ValidationError::Field {
            field: "dt".into(),
            message: format!("must be greater than 0, got {}", request.dt),
        }
        .into());
    }

    if request.t_end <= request.t_start {
        return Err(ValidationError::Field {
            field: "t_end".into(),
            message: format!(
                "must be greater than t_start ({} <= {})",
                request.t_end, request.t_start
            ),
        }
        .into());
    }

    if request.nintermediate == 0 {
        return Err(ValidationError::Field {
            field: "nintermediate".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    Ok(())
}

fn validate_lindblad_rates(request: &SimulationRequest) -> Result<()> {
    for term in request.lindblad_ops.iter().flatten() {
        if !term.rate.is_finite() || term.rate < 0.0 {
            return Err(ValidationError::Field {
                field: "lindblad_ops".into(),
                message: format!("rate for '{}' must be >= 0, got {}", term.operator, term.rate),
            }
            .into());
        }
    }
    Ok(())
}
