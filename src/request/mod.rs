// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulation request types.
//!
//! A [`SimulationRequest`] carries everything needed for one solver run:
//! the time window, the system and bath description, the operators to
//! record, and the file naming used for the transient artifacts. Requests
//! can be built in code or deserialized from YAML.
//!
//! ```yaml
//! t_start: 0
//! t_end: 400
//! dt: 0.1
//! interaction_ops:
//!   - { operator: "|0><1|_2", polarization: x }
//! output_ops: ["|1><1|_2"]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Polarization axis an interaction term couples to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarization {
    #[default]
    X,
    Y,
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarization::X => write!(f, "x"),
            Polarization::Y => write!(f, "y"),
        }
    }
}

/// Side of the density matrix an operator is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplySide {
    /// ρ → Aρ
    Left,
    /// ρ → ρA†
    Right,
    /// ρ → AρA†
    #[default]
    Both,
}

/// Interaction Hamiltonian term driven by one pulse polarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTerm {
    /// Operator expression, e.g. `|0><1|_2`
    pub operator: String,
    /// Pulse axis driving this term
    #[serde(default)]
    pub polarization: Polarization,
}

impl InteractionTerm {
    pub fn new(operator: impl Into<String>, polarization: Polarization) -> Self {
        Self {
            operator: operator.into(),
            polarization,
        }
    }
}

/// Dissipative channel of the master equation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LindbladTerm {
    /// Jump operator expression
    pub operator: String,
    /// Rate in 1/ps
    pub rate: f64,
}

impl LindbladTerm {
    pub fn new(operator: impl Into<String>, rate: f64) -> Self {
        Self {
            operator: operator.into(),
            rate,
        }
    }
}

/// Operator applied to the density matrix at an intermediate time.
///
/// Used for multi-time correlation functions. The operator acts at `time`,
/// so its effect shows up from `time + dt` on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorApplication {
    pub operator: String,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub side: ApplySide,
}

/// Phonon bath and process-tensor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhononConfig {
    /// Couple the system to the phonon bath
    #[serde(default)]
    pub enabled: bool,

    /// Compute and persist the process tensor even if a cached one exists
    #[serde(default)]
    pub generate_pt: bool,

    /// Memory time in ps
    #[serde(default = "default_t_mem")]
    pub t_mem: f64,

    /// Electron confinement radius in nm
    #[serde(default = "default_ae")]
    pub ae: f64,

    /// Bath temperature in K
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Compression threshold as a number of digits, written as `1e-<threshold>`
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    /// Explicit process-tensor file; derived from the parameters if absent
    #[serde(default)]
    pub pt_file: Option<PathBuf>,
}

impl Default for PhononConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            generate_pt: false,
            t_mem: default_t_mem(),
            ae: default_ae(),
            temperature: default_temperature(),
            threshold: default_threshold(),
            pt_file: None,
        }
    }
}

impl PhononConfig {
    /// Phonons enabled with default bath parameters.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }
}

fn default_t_mem() -> f64 {
    10.0
}

fn default_ae() -> f64 {
    3.0
}

fn default_temperature() -> f64 {
    1.0
}

fn default_threshold() -> u32 {
    7
}

/// Naming and lifecycle of the files around a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileOptions {
    /// Prefix shared by all generated file names
    #[serde(default)]
    pub system_prefix: String,

    /// Distinguishes concurrent runs sharing a working directory
    #[serde(default)]
    pub suffix: String,

    /// Pre-sampled x pulse; when set, no pulse files are generated or deleted
    #[serde(default)]
    pub pulse_file_x: Option<PathBuf>,

    /// Pre-sampled y pulse
    #[serde(default)]
    pub pulse_file_y: Option<PathBuf>,

    /// Keep the parameter file after the run
    #[serde(default)]
    pub keep_param: bool,

    /// Write all input files and stop before invoking the solver
    #[serde(default)]
    pub prepare_only: bool,
}

/// Full description of one solver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Start of the time window in ps
    pub t_start: f64,

    /// End of the time window in ps
    pub t_end: f64,

    /// Solver time step in ps
    #[serde(default = "default_dt")]
    pub dt: f64,

    /// Pulse sub-steps per solver step
    #[serde(default = "default_nintermediate")]
    pub nintermediate: u32,

    #[serde(default)]
    pub phonons: PhononConfig,

    /// Initial density matrix; the two-level ground state if absent
    #[serde(default)]
    pub initial: Option<String>,

    /// System Hamiltonian terms
    #[serde(default)]
    pub system_ops: Option<Vec<String>>,

    /// System operator the phonon bath couples to
    #[serde(default)]
    pub boson_op: Option<String>,

    #[serde(default)]
    pub lindblad_ops: Option<Vec<LindbladTerm>>,

    #[serde(default)]
    pub interaction_ops: Option<Vec<InteractionTerm>>,

    #[serde(default)]
    pub apply: Option<OperatorApplication>,

    /// Operators whose expectation values the solver records
    #[serde(default)]
    pub output_ops: Vec<String>,

    #[serde(default)]
    pub files: FileOptions,

    /// Stream solver output
    #[serde(default)]
    pub verbose: bool,
}

fn default_dt() -> f64 {
    0.1
}

fn default_nintermediate() -> u32 {
    10
}

impl SimulationRequest {
    /// Create a request over `[t_start, t_end]` with default settings.
    pub fn new(t_start: f64, t_end: f64) -> Self {
        Self {
            t_start,
            t_end,
            dt: default_dt(),
            nintermediate: default_nintermediate(),
            phonons: PhononConfig::default(),
            initial: None,
            system_ops: None,
            boson_op: None,
            lindblad_ops: None,
            interaction_ops: None,
            apply: None,
            output_ops: Vec::new(),
            files: FileOptions::default(),
            verbose: false,
        }
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_phonons(mut self, phonons: PhononConfig, boson_op: impl Into<String>) -> Self {
        self.phonons = phonons;
        self.boson_op = Some(boson_op.into());
        self
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    pub fn with_system_op(mut self, op: impl Into<String>) -> Self {
        self.system_ops.get_or_insert_with(Vec::new).push(op.into());
        self
    }

    pub fn with_lindblad(mut self, op: impl Into<String>, rate: f64) -> Self {
        self.lindblad_ops
            .get_or_insert_with(Vec::new)
            .push(LindbladTerm::new(op, rate));
        self
    }

    pub fn with_interaction(mut self, op: impl Into<String>, polarization: Polarization) -> Self {
        self.interaction_ops
            .get_or_insert_with(Vec::new)
            .push(InteractionTerm::new(op, polarization));
        self
    }

    pub fn with_output(mut self, op: impl Into<String>) -> Self {
        self.output_ops.push(op.into());
        self
    }

    /// Apply `op` to the density matrix at time `t`.
    pub fn with_apply(mut self, op: impl Into<String>, time: f64, side: ApplySide) -> Self {
        self.apply = Some(OperatorApplication {
            operator: op.into(),
            time,
            side,
        });
        self
    }

    pub fn with_naming(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.files.system_prefix = prefix.into();
        self.files.suffix = suffix.into();
        self
    }

    /// Use pre-sampled pulse files instead of sampling pulses.
    pub fn with_pulse_files(mut self, x: impl Into<PathBuf>, y: Option<PathBuf>) -> Self {
        self.files.pulse_file_x = Some(x.into());
        self.files.pulse_file_y = y;
        self
    }

    pub fn prepare_only(mut self) -> Self {
        self.files.prepare_only = true;
        self
    }

    /// Length of the time window as used in process-tensor names.
    pub fn duration(&self) -> f64 {
        self.t_end.abs() + self.t_start.abs()
    }
}
