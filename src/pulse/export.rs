// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text export of sampled complex signals.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Write `time real imag` rows, space-delimited, with `digits` significant digits.
pub fn write_complex_columns(
    path: &Path,
    t: &Array1<f64>,
    values: &Array1<Complex64>,
    digits: usize,
) -> Result<()> {
    if t.len() != values.len() {
        return Err(Error::Serialization(format!(
            "time grid has {} points but signal has {}",
            t.len(),
            values.len()
        )));
    }

    let precision = digits.saturating_sub(1);
    let mut writer = BufWriter::new(File::create(path)?);
    for (time, value) in t.iter().zip(values.iter()) {
        writeln!(
            writer,
            "{:.p$e} {:.p$e} {:.p$e}",
            time,
            value.re,
            value.im,
            p = precision
        )?;
    }
    writer.flush()?;
    Ok(())
}
