//! Type identity keys for binding storage and lookup.

use std::any::TypeId;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Identity of a bound type.
///
/// Keys index bindings and tracked instances inside the [`Container`](crate::Container).
/// A key wraps the [`TypeId`] of a type together with its `type_name` for
/// diagnostics. Only the `TypeId` takes part in equality, hashing and
/// ordering, so two keys compare equal exactly when they denote the same type.
///
/// Keys work for sized types and trait objects alike, which is what lets a
/// binding be registered under an interface identity such as `dyn Logger`.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{key_of, Key};
///
/// trait Logger: Send + Sync {}
///
/// let a = key_of::<String>();
/// let b = key_of::<String>();
/// let c = key_of::<dyn Logger>();
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.display_name(), "alloc::string::String");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Creates a key from raw parts.
    ///
    /// Prefer [`key_of`]; this exists for tests and tooling that already
    /// hold a `TypeId`.
    pub fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// The type name, as reported by `std::any::type_name`.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// The underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

// Identity is the TypeId alone; the name is diagnostic only.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Returns the identity key for `T`.
#[inline(always)]
pub fn key_of<T: ?Sized + 'static>() -> Key {
    Key::new(TypeId::of::<T>(), std::any::type_name::<T>())
}
