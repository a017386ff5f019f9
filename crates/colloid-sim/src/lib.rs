//! Computational core for particle-based simulations.
//!
//! A [`System`] holds per-particle state in an extensible, type-keyed
//! property store and aggregates potential-energy contributions through a
//! composable force-field abstraction. Stateless drivers advance the
//! system in time: [`simulate_newtonian_dynamics`] (velocity-Verlet) and
//! [`simulate_brownian_dynamics`] (adaptive overdamped Langevin).
//!
//! # Example
//!
//! A polymer chain of ten beads bonded by harmonic springs:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use colloid_math::Point3;
//! use colloid_sim::{
//!     simulate_newtonian_dynamics, BasicProperties, BondedSegmentForceField,
//!     HarmonicPotential, NewtonianDynamicsConfig, System,
//! };
//!
//! let mut system = System::new();
//! for i in 0..10 {
//!     system.add_particle(BasicProperties {
//!         position: Point3::new(i as f64 / 10.0, -(i as f64) / 10.0, 0.0),
//!         ..Default::default()
//!     });
//! }
//!
//! let chain = Rc::new(RefCell::new(BondedSegmentForceField::new(
//!     HarmonicPotential { spring_constant: 1.0 },
//! )));
//! chain.borrow_mut().add_segment(0, 9);
//! system.add_forcefield(chain.clone());
//!
//! let initial_energy = system.compute_energy();
//!
//! simulate_newtonian_dynamics(&mut system, &NewtonianDynamicsConfig {
//!     timestep: 1e-3,
//!     steps: 1000,
//! });
//!
//! let drift = (system.compute_energy() - initial_energy).abs();
//! assert!(drift < 1e-3);
//! ```

pub mod forcefield;
pub mod potential;
pub mod property;
pub mod simulate;
pub mod system;

pub use forcefield::{
    BondedSegmentForceField, CompositeForceField, FnSelector, ForceField, PairForceField,
    PotentialSelector, SharedForceField,
};
pub use potential::{HarmonicPotential, LennardJonesPotential, Potential};
pub use property::{Mass, Mobility, ParticleStore, Position, Property, Velocity};
pub use simulate::{
    simulate_brownian_dynamics, simulate_newtonian_dynamics, BrownianDynamicsConfig,
    NewtonianDynamicsConfig,
};
pub use system::{BasicProperties, System};
