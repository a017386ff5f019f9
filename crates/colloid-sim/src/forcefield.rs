//! Force-field abstraction and interaction adapters.
//!
//! A force field contributes potential energy and the forces it implies
//! for the whole system. Concrete interaction patterns are provided as
//! adapters over a [`Potential`]: [`PairForceField`] visits all unordered
//! particle pairs, [`BondedSegmentForceField`] visits consecutive pairs
//! within declared index ranges. [`CompositeForceField`] sums any number
//! of force fields in registration order.

use std::cell::RefCell;
use std::rc::Rc;

use colloid_math::{Index, Scalar, Vec3};

use crate::potential::Potential;
use crate::system::System;

/// A contributor of potential energy and forces.
pub trait ForceField {
    /// Total potential energy of this force field's interactions.
    /// Pure; must not mutate observable state.
    fn compute_energy(&self, system: &System) -> Scalar;

    /// Accumulates this force field's forces into `forces`. The buffer is
    /// zeroed once by [`System::compute_force`], never by the callee.
    fn compute_force(&self, system: &System, forces: &mut [Vec3]);
}

/// Shared handle to a force field.
///
/// A caller may retain the handle after attaching it to a system and
/// mutate the force field (e.g. append bonded segments) between
/// evaluations; the mutation is visible on the next computation.
pub type SharedForceField = Rc<RefCell<dyn ForceField>>;

/// Ordered collection of force fields evaluated as one.
///
/// Members are evaluated in registration order so that floating-point
/// summation is reproducible run to run.
#[derive(Default)]
pub struct CompositeForceField {
    components: Vec<SharedForceField>,
}

impl CompositeForceField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: SharedForceField) {
        self.components.push(component);
    }
}

impl ForceField for CompositeForceField {
    fn compute_energy(&self, system: &System) -> Scalar {
        let mut total_energy = 0.0;
        for component in &self.components {
            total_energy += component.borrow().compute_energy(system);
        }
        total_energy
    }

    fn compute_force(&self, system: &System, forces: &mut [Vec3]) {
        for component in &self.components {
            component.borrow().compute_force(system, forces);
        }
    }
}

/// Chooses the potential governing a given particle pair.
///
/// The selected potential may depend on the pair's identities, supporting
/// heterogeneous (e.g. size-dependent) interactions. A plain cloneable
/// [`Potential`] acts as its own selector for uniform interactions.
pub trait PotentialSelector {
    type Potential: Potential;

    fn select(&self, system: &System, i: Index, j: Index) -> Self::Potential;
}

impl<P: Potential + Clone> PotentialSelector for P {
    type Potential = P;

    fn select(&self, _system: &System, _i: Index, _j: Index) -> P {
        self.clone()
    }
}

/// Adapts a `Fn(&System, i, j) -> Potential` closure into a
/// [`PotentialSelector`] for per-pair heterogeneous interactions.
pub struct FnSelector<F, P> {
    select_fn: F,
    _potential: std::marker::PhantomData<fn() -> P>,
}

impl<F, P> FnSelector<F, P>
where
    F: Fn(&System, Index, Index) -> P,
    P: Potential,
{
    pub fn new(select_fn: F) -> Self {
        Self {
            select_fn,
            _potential: std::marker::PhantomData,
        }
    }
}

impl<F, P> PotentialSelector for FnSelector<F, P>
where
    F: Fn(&System, Index, Index) -> P,
    P: Potential,
{
    type Potential = P;

    fn select(&self, system: &System, i: Index, j: Index) -> P {
        (self.select_fn)(system, i, j)
    }
}

/// All-pairs interaction: every unordered pair (i, j) with i < j feels the
/// selected potential of the displacement `position[i] - position[j]`.
///
/// Cost is O(N²). Newton's third law is enforced structurally: the force
/// on i and the reaction on j always cancel, regardless of the potential.
pub struct PairForceField<S> {
    selector: S,
}

impl<S: PotentialSelector> PairForceField<S> {
    pub fn new(selector: S) -> Self {
        Self { selector }
    }
}

impl<S: PotentialSelector> ForceField for PairForceField<S> {
    fn compute_energy(&self, system: &System) -> Scalar {
        let positions = system.position_array();
        let mut energy = 0.0;

        for j in 0..positions.len() {
            let position_j = positions[j];

            for i in 0..j {
                let r = positions[i] - position_j;
                let potential = self.selector.select(system, i, j);

                energy += potential.evaluate_energy(r);
            }
        }

        energy
    }

    fn compute_force(&self, system: &System, forces: &mut [Vec3]) {
        let positions = system.position_array();

        for j in 0..positions.len() {
            let position_j = positions[j];
            let mut reaction = Vec3::zeros();

            for i in 0..j {
                let r = positions[i] - position_j;
                let potential = self.selector.select(system, i, j);
                let force = potential.evaluate_force(r);

                forces[i] += force;
                reaction -= force;
            }

            forces[j] += reaction;
        }
    }
}

/// Sequential-bond interaction for chain and polymer connectivity.
///
/// Holds inclusive index ranges `[first, last]`; within each range only
/// consecutive pairs (i, i+1) interact, so cost is O(total segment
/// length). Displacement and accumulation follow the same convention as
/// [`PairForceField`]. An empty segment list contributes nothing.
pub struct BondedSegmentForceField<S> {
    selector: S,
    segments: Vec<(Index, Index)>,
}

impl<S: PotentialSelector> BondedSegmentForceField<S> {
    pub fn new(selector: S) -> Self {
        Self {
            selector,
            segments: Vec::new(),
        }
    }

    /// Declares the inclusive range `[first, last]` as sequentially
    /// bonded. May be called after the force field is attached to a
    /// system; the next evaluation sees the new segment.
    ///
    /// # Panics
    ///
    /// Panics if `first > last`.
    pub fn add_segment(&mut self, first: Index, last: Index) {
        assert!(
            first <= last,
            "bonded segment [{first}, {last}] is reversed"
        );
        self.segments.push((first, last));
    }

    fn for_each_bond(&self, system: &System, mut visit: impl FnMut(Vec3, Index, Index)) {
        let positions = system.position_array();

        for &(first, last) in &self.segments {
            for i in first..last {
                let r = positions[i] - positions[i + 1];
                visit(r, i, i + 1);
            }
        }
    }
}

impl<S: PotentialSelector> ForceField for BondedSegmentForceField<S> {
    fn compute_energy(&self, system: &System) -> Scalar {
        let mut energy = 0.0;

        self.for_each_bond(system, |r, i, j| {
            let potential = self.selector.select(system, i, j);
            energy += potential.evaluate_energy(r);
        });

        energy
    }

    fn compute_force(&self, system: &System, forces: &mut [Vec3]) {
        self.for_each_bond(system, |r, i, j| {
            let potential = self.selector.select(system, i, j);
            let force = potential.evaluate_force(r);

            forces[i] += force;
            forces[j] -= force;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::HarmonicPotential;
    use crate::system::{BasicProperties, System};
    use approx::assert_relative_eq;
    use colloid_math::Point3;

    fn three_particle_system() -> System {
        let mut system = System::new();
        for position in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.5, 0.0),
            Point3::new(-0.5, 2.0, 1.0),
        ] {
            system.add_particle(BasicProperties {
                position,
                ..Default::default()
            });
        }
        system
    }

    #[test]
    fn pair_energy_counts_each_pair_once() {
        let mut system = System::new();
        system.add_particle(BasicProperties::default());
        system.add_particle(BasicProperties {
            position: Point3::new(2.0, 0.0, 0.0),
            ..Default::default()
        });

        let pair = PairForceField::new(HarmonicPotential {
            spring_constant: 1.0,
        });

        // One pair at separation 2: E = 0.5 * 1 * 4.
        assert_relative_eq!(pair.compute_energy(&system), 2.0);
    }

    #[test]
    fn pair_forces_obey_action_reaction() {
        let system = three_particle_system();
        let pair = PairForceField::new(HarmonicPotential {
            spring_constant: 1.7,
        });

        let mut forces = vec![Vec3::zeros(); 3];
        pair.compute_force(&system, &mut forces);

        let total: Vec3 = forces.iter().sum();
        assert!(total.norm() < 1e-12, "net force {total:?}");
    }

    #[test]
    fn compute_force_accumulates_into_buffer() {
        let system = three_particle_system();
        let pair = PairForceField::new(HarmonicPotential::default());

        let sentinel = Vec3::new(10.0, -20.0, 30.0);
        let mut seeded = vec![sentinel; 3];
        let mut fresh = vec![Vec3::zeros(); 3];

        pair.compute_force(&system, &mut seeded);
        pair.compute_force(&system, &mut fresh);

        for (s, f) in seeded.iter().zip(&fresh) {
            assert_relative_eq!((s - sentinel).x, f.x, epsilon = 1e-12);
            assert_relative_eq!((s - sentinel).y, f.y, epsilon = 1e-12);
            assert_relative_eq!((s - sentinel).z, f.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn composite_energy_is_sum_of_members() {
        let system = three_particle_system();

        let a = PairForceField::new(HarmonicPotential {
            spring_constant: 1.0,
        });
        let b = PairForceField::new(HarmonicPotential {
            spring_constant: 2.5,
        });
        let expected = a.compute_energy(&system) + b.compute_energy(&system);

        let mut composite = CompositeForceField::new();
        composite.add_component(Rc::new(RefCell::new(a)));
        composite.add_component(Rc::new(RefCell::new(b)));

        assert_relative_eq!(composite.compute_energy(&system), expected);
    }

    #[test]
    fn bonded_segment_visits_only_consecutive_pairs() {
        let mut system = System::new();
        for i in 0..4 {
            system.add_particle(BasicProperties {
                position: Point3::new(i as f64, 0.0, 0.0),
                ..Default::default()
            });
        }

        let mut bonds = BondedSegmentForceField::new(HarmonicPotential {
            spring_constant: 1.0,
        });
        bonds.add_segment(0, 2);

        // Bonds (0,1) and (1,2), each at unit separation: E = 2 * 0.5.
        assert_relative_eq!(bonds.compute_energy(&system), 1.0);

        let mut forces = vec![Vec3::zeros(); 4];
        bonds.compute_force(&system, &mut forces);

        // Particle 3 is outside the segment and must feel nothing.
        assert_eq!(forces[3], Vec3::zeros());

        let total: Vec3 = forces.iter().sum();
        assert!(total.norm() < 1e-12);
    }

    #[test]
    fn empty_segment_list_contributes_zero() {
        let system = three_particle_system();
        let bonds = BondedSegmentForceField::new(HarmonicPotential::default());

        let mut forces = vec![Vec3::zeros(); 3];
        bonds.compute_force(&system, &mut forces);

        assert_relative_eq!(bonds.compute_energy(&system), 0.0);
        assert!(forces.iter().all(|f| *f == Vec3::zeros()));
    }

    #[test]
    #[should_panic(expected = "reversed")]
    fn reversed_segment_panics() {
        let mut bonds = BondedSegmentForceField::new(HarmonicPotential::default());
        bonds.add_segment(3, 1);
    }

    #[test]
    fn fn_selector_supports_heterogeneous_pairs() {
        let mut system = System::new();
        system.add_particle(BasicProperties::default());
        system.add_particle(BasicProperties {
            position: Point3::new(1.0, 0.0, 0.0),
            ..Default::default()
        });
        system.add_particle(BasicProperties {
            position: Point3::new(3.0, 0.0, 0.0),
            ..Default::default()
        });

        let pair = PairForceField::new(FnSelector::new(|_: &System, i, j| HarmonicPotential {
            spring_constant: (i + j) as Scalar,
        }));

        // Pairs: (0,1) k=1 r=1; (0,2) k=2 r=3; (1,2) k=3 r=2.
        let expected = 0.5 * 1.0 * 1.0 + 0.5 * 2.0 * 9.0 + 0.5 * 3.0 * 4.0;
        assert_relative_eq!(pair.compute_energy(&system), expected);
    }
}
