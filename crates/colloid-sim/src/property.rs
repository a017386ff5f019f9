//! Type-keyed per-particle property storage.
//!
//! Each property kind is identified by a marker type implementing
//! [`Property`] and stored as a dense column parallel to particle indices.
//! Independent collaborators (custom force fields, analysis code) can
//! attach new columns without touching the store definition, and every
//! column stays contiguous for cache-friendly force loops.

use std::any::{self, Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;

use colloid_math::{Index, Point3, Scalar, Vec3};

/// A per-particle property kind.
///
/// The implementing marker type is the column key; `Value` is the element
/// type and `default_value` is materialized for every existing and future
/// particle until explicitly overwritten.
pub trait Property: 'static {
    type Value: Clone + 'static;

    fn default_value() -> Self::Value;
}

/// Particle mass. Defaults to 1.
pub struct Mass;

impl Property for Mass {
    type Value = Scalar;

    fn default_value() -> Scalar {
        1.0
    }
}

/// Particle position. Defaults to the origin.
pub struct Position;

impl Property for Position {
    type Value = Point3;

    fn default_value() -> Point3 {
        Point3::origin()
    }
}

/// Particle velocity. Defaults to zero.
pub struct Velocity;

impl Property for Velocity {
    type Value = Vec3;

    fn default_value() -> Vec3 {
        Vec3::zeros()
    }
}

/// Particle mobility, the force-to-velocity coefficient used by
/// overdamped dynamics. Defaults to 1.
pub struct Mobility;

impl Property for Mobility {
    type Value = Scalar;

    fn default_value() -> Scalar {
        1.0
    }
}

/// Type-erased resizable column.
trait Column {
    fn resize(&mut self, n: Index);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedColumn<P: Property> {
    values: Vec<P::Value>,
}

impl<P: Property> Column for TypedColumn<P> {
    fn resize(&mut self, n: Index) {
        self.values.resize(n, P::default_value());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Columnar storage of per-particle properties.
///
/// Invariant: every registered column's length equals [`len`] at all
/// times. Growth fills new slots with each key's declared default. The
/// store is append-only; particles are never removed and columns never
/// shrink below the particle count.
///
/// Columns sit behind `RefCell` so that views over distinct properties
/// (e.g. read-only masses alongside mutable velocities) can be held
/// simultaneously, matching single-threaded access. Borrowing the same
/// column mutably twice is a programmer defect and panics.
///
/// [`len`]: ParticleStore::len
#[derive(Default)]
pub struct ParticleStore {
    size: Index,
    columns: HashMap<TypeId, Box<RefCell<dyn Column>>>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current particle count.
    pub fn len(&self) -> Index {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Grows every registered column to length `n`, initializing new
    /// slots to each key's default value.
    pub fn resize(&mut self, n: Index) {
        for column in self.columns.values_mut() {
            column.get_mut().resize(n);
        }
        self.size = n;
    }

    /// Registers the property `P` if it is not registered yet, filling
    /// every existing slot with its default, then returns a mutable view
    /// over the column. Idempotent.
    pub fn require_property_array<P: Property>(&mut self) -> RefMut<'_, [P::Value]> {
        let key = TypeId::of::<P>();

        if !self.columns.contains_key(&key) {
            let mut column = TypedColumn::<P> { values: Vec::new() };
            column.resize(self.size);
            self.columns.insert(key, Box::new(RefCell::new(column)));
        }

        self.property_array_mut::<P>()
    }

    /// Immutable view over the column of property `P`.
    ///
    /// # Panics
    ///
    /// Panics if `P` was never registered, or if the column is currently
    /// mutably borrowed.
    pub fn property_array<P: Property>(&self) -> Ref<'_, [P::Value]> {
        Ref::map(self.column::<P>().borrow(), |column| {
            column
                .as_any()
                .downcast_ref::<TypedColumn<P>>()
                .unwrap_or_else(|| unreachable!("column registered under mismatched type key"))
                .values
                .as_slice()
        })
    }

    /// Mutable view over the column of property `P`.
    ///
    /// # Panics
    ///
    /// Panics if `P` was never registered, or if the column is already
    /// borrowed.
    pub fn property_array_mut<P: Property>(&self) -> RefMut<'_, [P::Value]> {
        RefMut::map(self.column::<P>().borrow_mut(), |column| {
            column
                .as_any_mut()
                .downcast_mut::<TypedColumn<P>>()
                .unwrap_or_else(|| unreachable!("column registered under mismatched type key"))
                .values
                .as_mut_slice()
        })
    }

    fn column<P: Property>(&self) -> &RefCell<dyn Column> {
        match self.columns.get(&TypeId::of::<P>()) {
            Some(column) => column,
            None => panic!(
                "property `{}` is not registered; call require_property_array first",
                any::type_name::<P>()
            ),
        }
    }
}
