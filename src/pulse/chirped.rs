// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chirped Gaussian laser pulse.
//!
//! A transform-limited Gaussian of width τ₀ stretched by a chirp α (ps²):
//!
//!   τ = √(α²/τ₀² + τ₀²),  a = α / (α² + τ₀⁴)
//!
//!   E(t) = e0 · exp(−½((t−t0)/τ)²) / √(2π τ τ₀) · exp(−i(ω(t−t0) + ½a(t−t0)²))
//!
//! with ω = e_start/ħ. Without chirp the envelope area is `e0`, so `e0 = π`
//! is a π-pulse.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::Pulse;
use crate::param::HBAR;

/// Chirped Gaussian pulse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChirpedPulse {
    /// Transform-limited width in ps
    pub tau_0: f64,
    /// Carrier energy in meV, relative to the rotating frame
    pub e_start: f64,
    /// Chirp in ps²
    #[serde(default)]
    pub alpha: f64,
    /// Center time in ps
    #[serde(default)]
    pub t0: f64,
    /// Pulse area
    #[serde(default = "default_e0")]
    pub e0: f64,
    #[serde(default = "default_polar_x")]
    pub polar_x: f64,
    #[serde(default)]
    pub polar_y: f64,
}

fn default_e0() -> f64 {
    1.0
}

fn default_polar_x() -> f64 {
    1.0
}

impl ChirpedPulse {
    /// Unchirped x-polarized pulse.
    pub fn new(tau_0: f64, e_start: f64, t0: f64, e0: f64) -> Self {
        Self {
            tau_0,
            e_start,
            alpha: 0.0,
            t0,
            e0,
            polar_x: default_polar_x(),
            polar_y: 0.0,
        }
    }

    pub fn with_chirp(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_polarization(mut self, polar_x: f64, polar_y: f64) -> Self {
        self.polar_x = polar_x;
        self.polar_y = polar_y;
        self
    }

    /// Chirped width τ.
    pub fn tau(&self) -> f64 {
        (self.alpha.powi(2) / self.tau_0.powi(2) + self.tau_0.powi(2)).sqrt()
    }

    fn chirp_rate(&self) -> f64 {
        self.alpha / (self.alpha.powi(2) + self.tau_0.powi(4))
    }

    /// Real envelope at time `t`.
    pub fn envelope(&self, t: f64) -> f64 {
        let tau = self.tau();
        self.e0 * (-0.5 * ((t - self.t0) / tau).powi(2)).exp() / (2.0 * PI * tau * self.tau_0).sqrt()
    }
}

impl Pulse for ChirpedPulse {
    fn polarization(&self) -> (Complex64, Complex64) {
        (self.polar_x.into(), self.polar_y.into())
    }

    fn sample(&self, t: &Array1<f64>) -> Array1<Complex64> {
        let omega = self.e_start / HBAR;
        let a = self.chirp_rate();
        t.mapv(|time| {
            let dt = time - self.t0;
            let phase = omega * dt + 0.5 * a * dt * dt;
            self.envelope(time) * Complex64::new(0.0, -phase).exp()
        })
    }
}
