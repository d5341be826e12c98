//! Error types for the dependency injection container.

use thiserror::Error;

/// Dependency injection errors
///
/// Resolving an unbound type is not an error: it yields absence. These
/// variants cover the failures that can happen while building an object graph
/// or reading container options.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::DiError;
///
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(circular.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
///
/// let missing = DiError::MissingDependency { service: "Service", dependency: "Logger" };
/// assert_eq!(missing.to_string(), "Missing dependency Logger required by Service");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Type is not bound
    #[error("Service not found: {0}")]
    NotFound(&'static str),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// A declared dependency could not be resolved
    #[error("Missing dependency {dependency} required by {service}")]
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Container option could not be parsed
    #[error("Invalid container option {name}: {value:?}")]
    InvalidOption { name: &'static str, value: String },
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
