// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reading the solver's result table.

use std::path::Path;

use ndarray::Array2;

use crate::error::SolverError;

/// Read a whitespace-delimited numeric table.
///
/// Blank lines and `#` comments are skipped. Every row must have the same
/// number of columns. A single row still yields a 2D array.
pub fn read_output_table(path: &Path) -> Result<Array2<f64>, SolverError> {
    let content = std::fs::read_to_string(path).map_err(|e| SolverError::Output {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_table(&content).map_err(|message| SolverError::Output {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_table(content: &str) -> Result<Array2<f64>, String> {
    let mut values = Vec::new();
    let mut columns = None;
    let mut rows = 0;

    for (idx, line) in content.lines().enumerate() {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let before = values.len();
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .map_err(|_| format!("line {}: invalid number '{}'", idx + 1, token))?;
            values.push(value);
        }

        let width = values.len() - before;
        match columns {
            None => columns = Some(width),
            Some(expected) if expected != width => {
                return Err(format!(
                    "line {}: expected {} columns, found {}",
                    idx + 1,
                    expected,
                    width
                ));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let columns = columns.ok_or_else(|| "no data".to_string())?;
    Array2::from_shape_vec((rows, columns), values).map_err(|e| e.to_string())
}
