// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Solver parameter files.
//!
//! The solver is configured by a plain-text file with one directive per
//! line. Operator expressions are wrapped in `{ }`. The order of directives
//! matters to the solver, so [`build_directives`] always emits them in the
//! same sequence:
//!
//! 1. time window and stepping
//! 2. process-tensor generation, or reading a cached tensor
//! 3. initial state
//! 4. system Hamiltonian, Lindblad terms, pulses
//! 5. multi-time operator application
//! 6. outputs, tensor persistence, output file

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ValidationError};
use crate::pulse::PulseFiles;
use crate::request::ApplySide;
use crate::validation::ResolvedRequest;

/// Reduced Planck constant in meV·ps.
pub const HBAR: f64 = 0.6582173;

/// Prefactor the solver applies to pulse coupling expressions.
pub const PULSE_COUPLING: &str = "-0.5*pi*hbar";

/// Phonon spectral density used for generated process tensors.
pub const SPECTRAL_DENSITY: &str = "QDPhonon";

/// One line of a parameter file.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    TimeStart(f64),
    TimeEnd(f64),
    TimeStep(f64),
    Nintermediate(u32),
    SymmetricTrotter,
    MemoryTime(f64),
    /// Threshold as a number of digits
    Threshold(u32),
    UseGaussian,
    BosonOperator(String),
    SpectralDensity,
    ConfinementRadius(f64),
    Temperature(f64),
    SubtractPolaronShift,
    ReadProcessTensor(PathBuf),
    Initial(String),
    Hamiltonian(String),
    Lindblad { rate: f64, operator: String },
    Pulse { file: PathBuf, operator: String },
    ApplyOperator { side: ApplySide, time: f64, operator: String },
    Output(String),
    WriteProcessTensor(PathBuf),
    OutFile(PathBuf),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::TimeStart(t) => write!(f, "ta    {}", t),
            Directive::TimeEnd(t) => write!(f, "te    {}", t),
            Directive::TimeStep(dt) => write!(f, "dt    {}", dt),
            Directive::Nintermediate(n) => write!(f, "Nintermediate    {}", n),
            Directive::SymmetricTrotter => write!(f, "use_symmetric_Trotter true"),
            Directive::MemoryTime(t) => write!(f, "t_mem    {}", t),
            Directive::Threshold(digits) => write!(f, "threshold 1e-{}", digits),
            Directive::UseGaussian => write!(f, "use_Gaussian true"),
            Directive::BosonOperator(op) => write!(f, "Boson_SysOp    {{ {} }}", op),
            Directive::SpectralDensity => write!(f, "Boson_J_type         {}", SPECTRAL_DENSITY),
            Directive::ConfinementRadius(ae) => write!(f, "Boson_J_a_e    {}", ae),
            Directive::Temperature(temp) => write!(f, "Boson_temperature    {}", temp),
            Directive::SubtractPolaronShift => write!(f, "Boson_subtract_polaron_shift       true"),
            Directive::ReadProcessTensor(path) => write!(f, "read_PT    {}", path.display()),
            Directive::Initial(state) => write!(f, "initial    {{ {} }}", state),
            Directive::Hamiltonian(op) => write!(f, "add_Hamiltonian {{ {} }}", op),
            Directive::Lindblad { rate, operator } => {
                write!(f, "add_Lindblad {:.5}  {{ {} }}", rate, operator)
            }
            Directive::Pulse { file, operator } => write!(
                f,
                "add_Pulse file {}  {{ {}*({}) }}",
                file.display(),
                PULSE_COUPLING,
                operator
            ),
            Directive::ApplyOperator {
                side,
                time,
                operator,
            } => {
                let keyword = match side {
                    ApplySide::Left => "apply_Operator_left",
                    ApplySide::Right => "apply_Operator_right",
                    ApplySide::Both => "apply_Operator",
                };
                write!(f, "{} {} {{ {} }}", keyword, time, operator)
            }
            Directive::Output(op) => write!(f, "add_Output {{ {} }}", op),
            Directive::WriteProcessTensor(path) => write!(f, "write_PT {}", path.display()),
            Directive::OutFile(path) => write!(f, "outfile {}", path.display()),
        }
    }
}

/// Build the directives for a resolved request.
///
/// Fails if an interaction term is y-polarized but no y pulse file exists.
pub fn build_directives(
    resolved: &ResolvedRequest<'_>,
    pulse_files: &PulseFiles,
    out_file: &Path,
) -> Result<Vec<Directive>> {
    let request = resolved.request;
    let phonons = &request.phonons;

    let mut directives = vec![
        Directive::TimeStart(request.t_start),
        Directive::TimeEnd(request.t_end),
        Directive::TimeStep(request.dt),
        Directive::Nintermediate(request.nintermediate),
        Directive::SymmetricTrotter,
    ];

    if resolved.generate_pt {
        let boson_op = request
            .boson_op
            .clone()
            .ok_or(ValidationError::MissingBosonOperator)?;
        directives.extend([
            Directive::MemoryTime(phonons.t_mem),
            Directive::Threshold(phonons.threshold),
            Directive::UseGaussian,
            Directive::BosonOperator(boson_op),
            Directive::SpectralDensity,
            Directive::ConfinementRadius(phonons.ae),
            Directive::Temperature(phonons.temperature),
            Directive::SubtractPolaronShift,
        ]);
    } else if resolved.phonons() {
        directives.push(Directive::ReadProcessTensor(resolved.pt_file.clone()));
        directives.push(Directive::SubtractPolaronShift);
    }

    directives.push(Directive::Initial(resolved.initial.clone()));

    for op in request.system_ops.iter().flatten() {
        directives.push(Directive::Hamiltonian(op.clone()));
    }

    for term in request.lindblad_ops.iter().flatten() {
        directives.push(Directive::Lindblad {
            rate: term.rate,
            operator: term.operator.clone(),
        });
    }

    for term in request.interaction_ops.iter().flatten() {
        let file = pulse_files
            .for_polarization(term.polarization)
            .ok_or_else(|| ValidationError::MissingPulseFile {
                polarization: term.polarization.to_string(),
            })?;
        directives.push(Directive::Pulse {
            file: file.to_path_buf(),
            operator: term.operator.clone(),
        });
    }

    if let Some(apply) = resolved.multitime() {
        directives.push(Directive::ApplyOperator {
            side: apply.side,
            time: apply.time,
            operator: apply.operator.clone(),
        });
    }

    for op in &request.output_ops {
        directives.push(Directive::Output(op.clone()));
    }

    if resolved.generate_pt {
        directives.push(Directive::WriteProcessTensor(resolved.pt_file.clone()));
    }

    directives.push(Directive::OutFile(out_file.to_path_buf()));

    Ok(directives)
}

/// Write directives to `path`, one per line.
pub fn write_parameter_file(path: &Path, directives: &[Directive]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for directive in directives {
        writeln!(writer, "{}", directive)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::request::{PhononConfig, Polarization, SimulationRequest};
    use crate::validation::resolve;

    fn x_only() -> PulseFiles {
        PulseFiles {
            x: PathBuf::from("/tmp/tls_pulse_x_a.dat"),
            y: None,
            owned: false,
        }
    }

    fn both_axes() -> PulseFiles {
        PulseFiles {
            x: PathBuf::from("/tmp/tls_pulse_x_a.dat"),
            y: Some(PathBuf::from("/tmp/tls_pulse_y_a.dat")),
            owned: true,
        }
    }

    fn render(request: &SimulationRequest, pulse_files: &PulseFiles) -> Vec<String> {
        let resolved = resolve(request, false).unwrap();
        build_directives(&resolved, pulse_files, Path::new("/tmp/tls_a.out"))
            .unwrap()
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    fn phonon_request(pt_file: PathBuf) -> SimulationRequest {
        let mut request = SimulationRequest::new(0.0, 100.0)
            .with_phonons(PhononConfig::enabled(), "1*|1><1|_2")
            .with_interaction("|1><0|_2", Polarization::X)
            .with_output("|1><1|_2");
        request.phonons.pt_file = Some(pt_file);
        request
    }

    const PHONON_KEYWORDS: [&str; 5] = [
        "t_mem",
        "Boson_SysOp",
        "Boson_subtract_polaron_shift",
        "read_PT",
        "write_PT",
    ];

    #[test]
    fn test_minimal_two_level_scenario() {
        let request = SimulationRequest::new(0.0, 400.0)
            .with_interaction("|0><1|_2", Polarization::X)
            .with_output("|1><1|_2");

        let lines = render(&request, &x_only());
        assert_eq!(
            lines,
            vec![
                "ta    0",
                "te    400",
                "dt    0.1",
                "Nintermediate    10",
                "use_symmetric_Trotter true",
                "initial    { |0><0|_2 }",
                "add_Pulse file /tmp/tls_pulse_x_a.dat  { -0.5*pi*hbar*(|0><1|_2) }",
                "add_Output { |1><1|_2 }",
                "outfile /tmp/tls_a.out",
            ]
        );
    }

    #[test]
    fn test_lindblad_rate_has_five_decimals() {
        let request = SimulationRequest::new(0.0, 10.0).with_lindblad("|0><1|_2", 0.01);
        let lines = render(&request, &x_only());
        let lindblad: Vec<_> = lines
            .iter()
            .filter(|l| l.starts_with("add_Lindblad"))
            .collect();
        assert_eq!(lindblad, vec!["add_Lindblad 0.01000  { |0><1|_2 }"]);
    }

    #[test]
    fn test_apply_operator_forms() {
        for (side, expected) in [
            (ApplySide::Left, "apply_Operator_left 20 { |0><1|_2 }"),
            (ApplySide::Right, "apply_Operator_right 20 { |0><1|_2 }"),
            (ApplySide::Both, "apply_Operator 20 { |0><1|_2 }"),
        ] {
            let request = SimulationRequest::new(0.0, 100.0).with_apply("|0><1|_2", 20.0, side);
            let lines = render(&request, &x_only());
            let applied: Vec<_> = lines
                .iter()
                .filter(|l| l.starts_with("apply_Operator"))
                .collect();
            assert_eq!(applied, vec![expected]);
        }
    }

    #[test]
    fn test_no_phonon_directives_without_phonons() {
        let request = SimulationRequest::new(0.0, 100.0)
            .with_system_op("-1*|1><1|_2")
            .with_lindblad("|0><1|_2", 0.002)
            .with_interaction("|1><0|_2", Polarization::Y)
            .with_output("|1><1|_2");
        let lines = render(&request, &both_axes());
        for keyword in PHONON_KEYWORDS {
            assert!(lines.iter().all(|l| !l.starts_with(keyword)), "{}", keyword);
        }
    }

    #[test]
    fn test_existing_process_tensor_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let pt_file = dir.path().join("cached.pt");
        std::fs::write(&pt_file, b"pt").unwrap();

        let lines = render(&phonon_request(pt_file.clone()), &x_only());
        assert_eq!(lines[5], format!("read_PT    {}", pt_file.display()));
        assert_eq!(lines[6], "Boson_subtract_polaron_shift       true");
        assert!(lines.iter().all(|l| !l.starts_with("t_mem")));
        assert!(lines.iter().all(|l| !l.starts_with("write_PT")));
    }

    #[test]
    fn test_missing_process_tensor_is_generated() {
        let dir = tempfile::tempdir().unwrap();
        let pt_file = dir.path().join("fresh.pt");

        let lines = render(&phonon_request(pt_file.clone()), &x_only());
        assert_eq!(
            &lines[5..13],
            &[
                "t_mem    10",
                "threshold 1e-7",
                "use_Gaussian true",
                "Boson_SysOp    { 1*|1><1|_2 }",
                "Boson_J_type         QDPhonon",
                "Boson_J_a_e    3",
                "Boson_temperature    1",
                "Boson_subtract_polaron_shift       true",
            ]
        );
        assert!(lines.iter().all(|l| !l.starts_with("read_PT")));
        let n = lines.len();
        assert_eq!(lines[n - 2], format!("write_PT {}", pt_file.display()));
        assert_eq!(lines[n - 1], "outfile /tmp/tls_a.out");
    }

    #[test]
    fn test_full_ordering() {
        let request = SimulationRequest::new(-10.0, 100.0)
            .with_initial("|1><1|_2")
            .with_system_op("-1*|1><1|_2")
            .with_system_op("0.1*|0><0|_2")
            .with_lindblad("|0><1|_2", 0.01)
            .with_lindblad("|1><1|_2", 0.5)
            .with_interaction("|1><0|_2", Polarization::X)
            .with_interaction("|1><0|_2", Polarization::Y)
            .with_apply("|0><1|_2", 20.0, ApplySide::Both)
            .with_output("|1><1|_2")
            .with_output("|0><1|_2");
        let lines = render(&request, &both_axes());
        assert_eq!(
            &lines[5..],
            &[
                "initial    { |1><1|_2 }",
                "add_Hamiltonian { -1*|1><1|_2 }",
                "add_Hamiltonian { 0.1*|0><0|_2 }",
                "add_Lindblad 0.01000  { |0><1|_2 }",
                "add_Lindblad 0.50000  { |1><1|_2 }",
                "add_Pulse file /tmp/tls_pulse_x_a.dat  { -0.5*pi*hbar*(|1><0|_2) }",
                "add_Pulse file /tmp/tls_pulse_y_a.dat  { -0.5*pi*hbar*(|1><0|_2) }",
                "apply_Operator 20 { |0><1|_2 }",
                "add_Output { |1><1|_2 }",
                "add_Output { |0><1|_2 }",
                "outfile /tmp/tls_a.out",
            ]
        );
        assert_eq!(lines[0], "ta    -10");
    }

    #[test]
    fn test_y_polarization_without_file_fails() {
        let request = SimulationRequest::new(0.0, 100.0).with_interaction("|1><0|_2", Polarization::Y);
        let resolved = resolve(&request, false).unwrap();
        let result = build_directives(&resolved, &x_only(), Path::new("/tmp/out"));
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::MissingPulseFile { .. }))
        ));
    }

    #[test]
    fn test_write_parameter_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tls_a.param");
        let directives = vec![Directive::TimeStart(0.0), Directive::OutFile(PathBuf::from("out"))];

        write_parameter_file(&path, &directives).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ta    0\noutfile out\n");
    }
}
