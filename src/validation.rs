//! Static validation of a container's declared dependency graph.
//!
//! Validation inspects the dependencies each binding declares through its
//! constructor signature. Nothing is built, so it is safe to run before
//! sealing and cheap enough for a startup health check.

use std::collections::HashSet;

use crate::config::ResolutionMode;
use crate::key::Key;
use crate::registration::{Cached, InstanceStore, Registry};

/// Result of [`Container::validate`](crate::Container::validate).
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, Lifetime, ValidationError};
/// use std::sync::Arc;
///
/// struct Database;
/// struct Repository;
///
/// let mut container = Container::new();
/// container.bind(Lifetime::Factory, |_db: Arc<Database>| Repository);
///
/// let report = container.validate();
/// assert!(!report.is_valid());
/// assert!(matches!(
///     &report.errors[0],
///     ValidationError::MissingDependency { dependency, .. } if dependency.contains("Database")
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems that make resolution fail
    pub errors: Vec<ValidationError>,
    /// Problems that resolution tolerates
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Whether no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A problem that makes resolving some binding fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required dependency is not bound or has no instance
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// Circular dependency detected; the path ends with its first element
    CircularDependency { cycle: Vec<&'static str> },
}

/// A problem that resolution tolerates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Optional dependency is not bound or has no instance and will be passed as `None`
    MissingOptionalDependency {
        service: &'static str,
        dependency: &'static str,
    },
}

/// Whether resolving `key` can produce an instance right now.
///
/// A binding without a build step only resolves while a provided instance
/// is alive.
fn satisfiable(registry: &Registry, instances: &InstanceStore, key: &Key) -> bool {
    match registry.get(key) {
        Some(binding) if binding.has_build() => true,
        Some(_) => matches!(instances.cached(key), Some(Cached::Live(_))),
        None => false,
    }
}

pub(crate) fn validate(registry: &Registry, instances: &InstanceStore, mode: ResolutionMode) -> ValidationReport {
    let mut report = ValidationReport::default();

    for binding in registry.iter() {
        for dep in &binding.dependencies {
            if satisfiable(registry, instances, &dep.key) {
                continue;
            }
            let service = binding.key.display_name();
            let dependency = dep.key.display_name();
            if dep.optional && mode == ResolutionMode::Lenient {
                report
                    .warnings
                    .push(ValidationWarning::MissingOptionalDependency { service, dependency });
            } else {
                report
                    .errors
                    .push(ValidationError::MissingDependency { service, dependency });
            }
        }
    }

    for cycle in detect_cycles(registry) {
        report.errors.push(ValidationError::CircularDependency {
            cycle: cycle.iter().map(Key::display_name).collect(),
        });
    }

    report
}

/// Detects circular dependencies using DFS.
fn detect_cycles(registry: &Registry) -> Vec<Vec<Key>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for binding in registry.iter() {
        if !visited.contains(&binding.key) {
            dfs_cycles(registry, binding.key, &mut visited, &mut path, &mut cycles);
        }
    }

    cycles
}

fn dfs_cycles(
    registry: &Registry,
    current: Key,
    visited: &mut HashSet<Key>,
    path: &mut Vec<Key>,
    cycles: &mut Vec<Vec<Key>>,
) {
    if let Some(start) = path.iter().position(|k| *k == current) {
        let mut cycle = path[start..].to_vec();
        cycle.push(current);
        cycles.push(cycle);
        return;
    }

    if !visited.insert(current) {
        return;
    }

    let Some(binding) = registry.get(&current) else {
        return;
    };

    path.push(current);
    for dep in &binding.dependencies {
        // Interface keys lead to the binding that produces them
        if let Some(target) = registry.get(&dep.key) {
            dfs_cycles(registry, target.key, visited, path, cycles);
        }
    }
    path.pop();
}
