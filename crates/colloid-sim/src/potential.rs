//! Potential energy functions.
//!
//! A potential maps a relative displacement to scalar energy and vector
//! force. Implementations must satisfy force = −∇energy with respect to
//! the displacement; that obligation is not mechanically checked, but the
//! gradient tests below show how to validate it by central differences.

use colloid_math::{Scalar, Vec3};

/// Pure function of a relative displacement producing energy and force.
///
/// The displacement sign convention is fixed by the force-field adapters:
/// `r` points from the second particle of a pair to the first, and the
/// returned force is the one acting on the first particle.
pub trait Potential {
    fn evaluate_energy(&self, r: Vec3) -> Scalar;

    fn evaluate_force(&self, r: Vec3) -> Vec3;
}

/// Harmonic potential: E(r) = k/2 · |r|², F(r) = −k·r.
#[derive(Clone, Copy, Debug)]
pub struct HarmonicPotential {
    pub spring_constant: Scalar,
}

impl Default for HarmonicPotential {
    fn default() -> Self {
        Self {
            spring_constant: 1.0,
        }
    }
}

impl Potential for HarmonicPotential {
    fn evaluate_energy(&self, r: Vec3) -> Scalar {
        0.5 * self.spring_constant * r.norm_squared()
    }

    fn evaluate_force(&self, r: Vec3) -> Vec3 {
        -self.spring_constant * r
    }
}

/// Lennard-Jones potential with minimum −ε at |r| = σ:
/// E(r) = ε·((σ/r)¹² − 2(σ/r)⁶).
///
/// Singular at zero displacement; coincident particles yield Inf/NaN, as
/// the contract allows.
#[derive(Clone, Copy, Debug)]
pub struct LennardJonesPotential {
    pub epsilon: Scalar,
    pub sigma: Scalar,
}

impl Default for LennardJonesPotential {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            sigma: 1.0,
        }
    }
}

impl Potential for LennardJonesPotential {
    fn evaluate_energy(&self, r: Vec3) -> Scalar {
        let u2 = self.sigma * self.sigma / r.norm_squared();
        let u6 = u2 * u2 * u2;

        self.epsilon * (u6 * u6 - (u6 + u6))
    }

    fn evaluate_force(&self, r: Vec3) -> Vec3 {
        let r_inv = 1.0 / r.norm_squared();
        let u2 = self.sigma * self.sigma * r_inv;
        let u6 = u2 * u2 * u2;

        (12.0 * self.epsilon) * ((u6 * u6 - u6) * r_inv) * r
    }
}
