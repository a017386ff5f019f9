//! Math primitives for the colloid simulation core.
//!
//! Positions are affine points and displacements/velocities/forces are
//! vectors; keeping the two apart catches a class of sign mistakes in
//! force kernels at compile time.

use nalgebra as na;

/// Floating-point type used throughout the simulation.
pub type Scalar = f64;

/// Integral type used for particle indexing.
pub type Index = usize;

/// Integral type used for counting simulation steps.
pub type Step = u64;

/// 3D vector (displacement, velocity, force).
pub type Vec3 = na::Vector3<Scalar>;

/// Point in 3D Euclidean space (particle position).
pub type Point3 = na::Point3<Scalar>;
