// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::SolverError;
use crate::solver::SolverRunner;

/// What a mock solver saw when it was invoked.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub param_file: PathBuf,
    pub verbose: bool,
    pub param_content: String,
    /// Every pulse file referenced by the parameter file existed
    pub pulse_files_present: bool,
    /// A generation marker existed for the `write_PT` target
    pub marker_present: bool,
}

/// Mock solver that writes a fixed table to the requested output file.
pub struct MockSolver {
    table: Option<String>,
    invocations: Mutex<Vec<Invocation>>,
}

impl MockSolver {
    pub fn new(table: &str) -> Self {
        Self {
            table: Some(table.to_string()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Succeeds without writing an output file.
    pub fn silent() -> Self {
        Self {
            table: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().clone()
    }
}

/// Path argument of the first directive starting with `keyword`.
fn directive_path(content: &str, keyword: &str) -> Option<PathBuf> {
    content
        .lines()
        .find_map(|line| line.strip_prefix(keyword))
        .and_then(|rest| rest.split_whitespace().next())
        .map(PathBuf::from)
}

impl SolverRunner for MockSolver {
    fn name(&self) -> &str {
        "mock"
    }

    fn run(&self, param_file: &Path, verbose: bool) -> Result<(), SolverError> {
        let param_content =
            std::fs::read_to_string(param_file).map_err(|e| SolverError::Output {
                path: param_file.to_path_buf(),
                message: e.to_string(),
            })?;

        let pulse_files_present = param_content
            .lines()
            .filter_map(|line| line.strip_prefix("add_Pulse file "))
            .filter_map(|rest| rest.split_whitespace().next())
            .all(|path| Path::new(path).exists());

        let marker_present = directive_path(&param_content, "write_PT ")
            .map(|pt| {
                let mut marker = pt.into_os_string();
                marker.push(".lock");
                PathBuf::from(marker).exists()
            })
            .unwrap_or(false);

        if let (Some(table), Some(out)) = (&self.table, directive_path(&param_content, "outfile ")) {
            std::fs::write(&out, table).map_err(|e| SolverError::Output {
                path: out.clone(),
                message: e.to_string(),
            })?;
        }

        self.invocations.lock().push(Invocation {
            param_file: param_file.to_path_buf(),
            verbose,
            param_content,
            pulse_files_present,
            marker_present,
        });
        Ok(())
    }
}

/// Mock solver that always exits with a nonzero status.
pub struct FailingSolver {
    code: i32,
}

impl FailingSolver {
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

impl SolverRunner for FailingSolver {
    fn name(&self) -> &str {
        "failing"
    }

    fn run(&self, _param_file: &Path, _verbose: bool) -> Result<(), SolverError> {
        Err(SolverError::ExitStatus {
            binary: "failing".to_string(),
            code: Some(self.code),
        })
    }
}
