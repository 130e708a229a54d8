// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! aceqd: driver for the ACE quantum-dot dynamics solver
//!
//! This crate turns a high-level description of a driven, optionally
//! phonon-coupled quantum system into the input files of the external `ACE`
//! solver, runs the solver and reads back its results.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │            SimulationRequest              │
//! ├───────────────────────────────────────────┤
//! │ validation → pulse → param → solver       │
//! │ (defaults)  (files)  (directives) (ACE)   │
//! ├───────────────────────────────────────────┤
//! │       system::AceSystem + cleanup         │
//! └───────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`request`]: Simulation request types
//! - [`validation`]: Request validation and defaults
//! - [`process_tensor`]: Process-tensor cache naming and generation markers
//! - [`pulse`]: Pulse sampling and pulse files
//! - [`param`]: Solver parameter files
//! - [`solver`]: Solver invocation and output parsing
//! - [`system`]: Orchestration of a run
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod param;
pub mod process_tensor;
pub mod pulse;
pub mod request;
pub mod solver;
pub mod system;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use request::SimulationRequest;
pub use system::{AceSystem, RunOutcome};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
