//! Particle system: property storage plus an aggregate force field.

use std::cell::{Ref, RefMut};

use colloid_math::{Index, Point3, Scalar, Vec3};

use crate::forcefield::{CompositeForceField, ForceField, SharedForceField};
use crate::property::{Mass, Mobility, ParticleStore, Position, Property, Velocity};

/// Intrinsic properties of a particle being added.
///
/// Unspecified fields take the property defaults: unit mass, origin
/// position, zero velocity.
#[derive(Clone, Copy, Debug)]
pub struct BasicProperties {
    pub mass: Scalar,
    pub position: Point3,
    pub velocity: Vec3,
}

impl Default for BasicProperties {
    fn default() -> Self {
        Self {
            mass: Mass::default_value(),
            position: Position::default_value(),
            velocity: Velocity::default_value(),
        }
    }
}

/// A collection of particles, their properties and the force field acting
/// on them.
///
/// Created empty; grows monotonically through [`add_particle`]. Force
/// fields may be attached at any time before or between integrator runs.
///
/// [`add_particle`]: System::add_particle
pub struct System {
    particles: ParticleStore,
    forcefield: CompositeForceField,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl System {
    pub fn new() -> Self {
        let mut particles = ParticleStore::new();
        particles.require_property_array::<Mass>();
        particles.require_property_array::<Position>();
        particles.require_property_array::<Velocity>();
        particles.require_property_array::<Mobility>();

        Self {
            particles,
            forcefield: CompositeForceField::new(),
        }
    }

    /// Appends one particle, growing every registered property column by
    /// one slot, and sets the intrinsic properties from `props`.
    pub fn add_particle(&mut self, props: BasicProperties) {
        let index = self.particles.len();
        self.particles.resize(index + 1);

        self.particles.property_array_mut::<Mass>()[index] = props.mass;
        self.particles.property_array_mut::<Position>()[index] = props.position;
        self.particles.property_array_mut::<Velocity>()[index] = props.velocity;
    }

    pub fn particle_count(&self) -> Index {
        self.particles.len()
    }

    /// Registers the property `P` if needed and returns a mutable view
    /// over its column. See [`ParticleStore::require_property_array`].
    pub fn require_property_array<P: Property>(&mut self) -> RefMut<'_, [P::Value]> {
        self.particles.require_property_array::<P>()
    }

    /// Immutable view over the column of a registered property.
    ///
    /// # Panics
    ///
    /// Panics if `P` was never registered.
    pub fn property_array<P: Property>(&self) -> Ref<'_, [P::Value]> {
        self.particles.property_array::<P>()
    }

    /// Mutable view over the column of a registered property.
    ///
    /// # Panics
    ///
    /// Panics if `P` was never registered.
    pub fn property_array_mut<P: Property>(&self) -> RefMut<'_, [P::Value]> {
        self.particles.property_array_mut::<P>()
    }

    pub fn mass_array(&self) -> Ref<'_, [Scalar]> {
        self.property_array::<Mass>()
    }

    pub fn mass_array_mut(&self) -> RefMut<'_, [Scalar]> {
        self.property_array_mut::<Mass>()
    }

    pub fn position_array(&self) -> Ref<'_, [Point3]> {
        self.property_array::<Position>()
    }

    pub fn position_array_mut(&self) -> RefMut<'_, [Point3]> {
        self.property_array_mut::<Position>()
    }

    pub fn velocity_array(&self) -> Ref<'_, [Vec3]> {
        self.property_array::<Velocity>()
    }

    pub fn velocity_array_mut(&self) -> RefMut<'_, [Vec3]> {
        self.property_array_mut::<Velocity>()
    }

    pub fn mobility_array(&self) -> Ref<'_, [Scalar]> {
        self.property_array::<Mobility>()
    }

    pub fn mobility_array_mut(&self) -> RefMut<'_, [Scalar]> {
        self.property_array_mut::<Mobility>()
    }

    /// Attaches a force field. The caller may keep a clone of the handle
    /// and mutate the force field between evaluations.
    pub fn add_forcefield(&mut self, forcefield: SharedForceField) {
        self.forcefield.add_component(forcefield);
    }

    /// Σ ½·mᵢ·|vᵢ|² over all particles.
    pub fn compute_kinetic_energy(&self) -> Scalar {
        let masses = self.mass_array();
        let velocities = self.velocity_array();

        masses
            .iter()
            .zip(velocities.iter())
            .map(|(m, v)| 0.5 * m * v.norm_squared())
            .sum()
    }

    /// Total potential energy of all attached force fields.
    pub fn compute_potential_energy(&self) -> Scalar {
        self.forcefield.compute_energy(self)
    }

    /// Kinetic plus potential energy.
    pub fn compute_energy(&self) -> Scalar {
        self.compute_kinetic_energy() + self.compute_potential_energy()
    }

    /// Zeroes `forces` and lets the attached force fields accumulate into
    /// it, in registration order.
    ///
    /// # Panics
    ///
    /// Panics if `forces.len()` differs from the particle count.
    pub fn compute_force(&self, forces: &mut [Vec3]) {
        assert_eq!(
            forces.len(),
            self.particle_count(),
            "force buffer length must equal the particle count"
        );

        for force in forces.iter_mut() {
            *force = Vec3::zeros();
        }

        self.forcefield.compute_force(self, forces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forcefield::PairForceField;
    use crate::potential::HarmonicPotential;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Radius;

    impl Property for Radius {
        type Value = Scalar;

        fn default_value() -> Scalar {
            0.1
        }
    }

    #[test]
    fn add_particle_applies_defaults() {
        let mut system = System::new();
        system.add_particle(BasicProperties::default());

        assert_eq!(system.particle_count(), 1);
        assert_eq!(system.mass_array()[0], 1.0);
        assert_eq!(system.position_array()[0], Point3::origin());
        assert_eq!(system.velocity_array()[0], Vec3::zeros());
        assert_eq!(system.mobility_array()[0], 1.0);
    }

    #[test]
    fn add_particle_applies_overrides() {
        let mut system = System::new();
        system.add_particle(BasicProperties {
            mass: 2.5,
            position: Point3::new(1.0, 2.0, 3.0),
            velocity: Vec3::new(-1.0, 0.0, 0.5),
        });

        assert_eq!(system.mass_array()[0], 2.5);
        assert_eq!(system.position_array()[0], Point3::new(1.0, 2.0, 3.0));
        assert_eq!(system.velocity_array()[0], Vec3::new(-1.0, 0.0, 0.5));
    }

    #[test]
    fn custom_property_backfills_existing_particles() {
        let mut system = System::new();
        system.add_particle(BasicProperties::default());
        system.add_particle(BasicProperties::default());

        let radii = system.require_property_array::<Radius>();
        assert_eq!(*radii, [0.1, 0.1]);
    }

    #[test]
    fn kinetic_energy_sums_over_particles() {
        let mut system = System::new();
        system.add_particle(BasicProperties {
            mass: 2.0,
            velocity: Vec3::new(3.0, 0.0, 0.0),
            ..Default::default()
        });
        system.add_particle(BasicProperties {
            mass: 1.0,
            velocity: Vec3::new(0.0, 2.0, 0.0),
            ..Default::default()
        });

        // 0.5*2*9 + 0.5*1*4
        assert_relative_eq!(system.compute_kinetic_energy(), 11.0);
    }

    #[test]
    fn compute_force_zeroes_then_accumulates() {
        let mut system = System::new();
        system.add_particle(BasicProperties::default());
        system.add_particle(BasicProperties {
            position: Point3::new(1.0, 0.0, 0.0),
            ..Default::default()
        });
        system.add_forcefield(Rc::new(RefCell::new(PairForceField::new(
            HarmonicPotential {
                spring_constant: 1.0,
            },
        ))));

        let mut forces = vec![Vec3::new(99.0, 99.0, 99.0); 2];
        system.compute_force(&mut forces);

        // Harmonic attraction along x; stale buffer contents must be gone.
        assert_relative_eq!(forces[0].x, -1.0);
        assert_relative_eq!(forces[1].x, 1.0);
        assert_relative_eq!(forces[0].y, 0.0);
    }

    #[test]
    #[should_panic(expected = "force buffer length")]
    fn compute_force_rejects_wrong_buffer_length() {
        let mut system = System::new();
        system.add_particle(BasicProperties::default());

        let mut forces = vec![Vec3::zeros(); 2];
        system.compute_force(&mut forces);
    }

    #[test]
    fn retained_handle_mutation_is_visible() {
        let mut system = System::new();
        for i in 0..3 {
            system.add_particle(BasicProperties {
                position: Point3::new(i as Scalar, 0.0, 0.0),
                ..Default::default()
            });
        }

        let bonds = Rc::new(RefCell::new(crate::forcefield::BondedSegmentForceField::new(
            HarmonicPotential {
                spring_constant: 1.0,
            },
        )));
        system.add_forcefield(bonds.clone());

        assert_relative_eq!(system.compute_potential_energy(), 0.0);

        bonds.borrow_mut().add_segment(0, 2);
        assert_relative_eq!(system.compute_potential_energy(), 1.0);
    }
}
