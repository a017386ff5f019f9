//! colloid — particle-based simulation toolkit.
//!
//! This is the umbrella crate re-exporting the simulation core and its
//! math primitives.

pub use colloid_math::{self, Index, Point3, Scalar, Step, Vec3};
pub use colloid_sim::{
    self, simulate_brownian_dynamics, simulate_newtonian_dynamics, BasicProperties,
    BondedSegmentForceField, BrownianDynamicsConfig, CompositeForceField, FnSelector, ForceField,
    HarmonicPotential, LennardJonesPotential, Mass, Mobility, NewtonianDynamicsConfig,
    PairForceField, ParticleStore, Position, Potential, PotentialSelector, Property,
    SharedForceField, System, Velocity,
};
