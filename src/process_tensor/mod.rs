// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Process-tensor cache handling.
//!
//! Process tensors are expensive to compute and depend only on the bath
//! parameters, the time window and the step size. They are cached on disk
//! under a name derived from exactly those parameters, so identical requests
//! reuse the same file. This module never deletes a cache file.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, ValidationError};
use crate::request::SimulationRequest;

/// Deterministic cache file name for a request's physical parameters.
///
/// Format: `<prefix>_<duration>ps_<ae>nm_<temperature>k_th<threshold>_tmem<t_mem>_dt<dt>.pt`
pub fn cache_file_name(request: &SimulationRequest) -> String {
    let phonons = &request.phonons;
    format!(
        "{}_{}ps_{}nm_{}k_th{}_tmem{}_dt{}.pt",
        request.files.system_prefix,
        request.duration(),
        phonons.ae,
        phonons.temperature,
        phonons.threshold,
        phonons.t_mem,
        request.dt
    )
}

/// The process-tensor path for a request: explicit if given, derived otherwise.
///
/// Derived names are relative, so the cache lives in the current directory.
pub fn resolve_path(request: &SimulationRequest) -> PathBuf {
    request
        .phonons
        .pt_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(cache_file_name(request)))
}

/// Marker file held while a process tensor is being generated.
///
/// Created exclusively next to the target file and holds the owner's PID; a
/// second run trying to generate the same tensor fails instead of racing the
/// first one. A marker whose owner is no longer running is stale and gets
/// reclaimed. The marker is removed on drop.
#[derive(Debug)]
pub struct GenerationMarker {
    path: PathBuf,
}

impl GenerationMarker {
    /// Claim generation of `pt_file`.
    pub fn acquire(pt_file: &Path) -> Result<Self> {
        let path = marker_path(pt_file);
        // One retry after reclaiming a stale marker.
        for _ in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // Owned from here on so a failed write still removes it.
                    let marker = Self { path };
                    writeln!(file, "{}", std::process::id())?;
                    debug!(marker = %marker.path.display(), "Claimed process tensor generation");
                    return Ok(marker);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => match read_owner(&path) {
                    Some(pid) if !process_alive(pid) => {
                        warn!(marker = %path.display(), pid, "Reclaiming stale generation marker");
                        match std::fs::remove_file(&path) {
                            Ok(()) => {}
                            Err(e) if e.kind() == ErrorKind::NotFound => {}
                            Err(e) => return Err(e.into()),
                        }
                    }
                    _ => return Err(ValidationError::ProcessTensorBusy { marker: path }.into()),
                },
                Err(e) => return Err(e.into()),
            }
        }
        Err(ValidationError::ProcessTensorBusy { marker: path }.into())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for GenerationMarker {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(marker = %self.path.display(), error = %e, "Failed to remove generation marker");
            }
        }
    }
}

fn marker_path(pt_file: &Path) -> PathBuf {
    let mut name = pt_file.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// PID recorded in a marker; `None` while it is unreadable or still empty.
fn read_owner(marker: &Path) -> Option<u32> {
    std::fs::read_to_string(marker).ok()?.trim().parse().ok()
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// No portable liveness check; markers are only cleared by their owner.
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}
