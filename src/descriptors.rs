//! Binding descriptors for introspection and diagnostics.

use crate::inject::DeclaredDependency;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Binding;

/// Binding descriptor for introspection and diagnostics
///
/// Describes one registered binding: the type it produces, the interface it
/// is also served as, its lifetime and the dependencies its constructor
/// declares.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, Lifetime};
/// use std::sync::Arc;
///
/// struct Database;
/// struct Repository {
///     db: Arc<Database>,
/// }
///
/// let mut container = Container::new();
/// container.bind(Lifetime::Singleton, || Database);
/// container.bind(Lifetime::Factory, |db: Arc<Database>| Repository { db });
///
/// let descriptors = container.descriptors();
/// let repo = descriptors
///     .iter()
///     .find(|d| d.type_name().contains("Repository"))
///     .unwrap();
/// assert_eq!(repo.lifetime, Lifetime::Factory);
/// assert_eq!(repo.dependencies.len(), 1);
/// assert!(!repo.dependencies[0].optional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    /// The produced type
    pub key: Key,
    /// Interface the binding is also served as
    pub interface: Option<Key>,
    /// Declared constructor dependencies, in parameter order
    pub dependencies: Vec<DeclaredDependency>,
    /// Binding lifetime
    pub lifetime: Lifetime,
}

impl BindingDescriptor {
    pub(crate) fn from_binding(binding: &Binding) -> Self {
        Self {
            key: binding.key,
            interface: binding.interface,
            dependencies: binding.dependencies.clone(),
            lifetime: binding.lifetime,
        }
    }

    /// Name of the produced type.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Whether the binding also answers to an interface.
    pub fn has_interface(&self) -> bool {
        self.interface.is_some()
    }
}
