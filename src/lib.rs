//! # ferrous-container
//!
//! A small, type-safe dependency container: bind constructors, resolve
//! instances, seal the configuration, and let the container tear down what
//! it built.
//!
//! ## Features
//!
//! - **Typed constructors**: dependencies are declared by parameter types and checked by the compiler
//! - **Three lifetimes**: Singleton, Factory, and caller-owned Provided instances
//! - **Interface bindings**: serve one implementation as a trait object
//! - **Circular dependency detection**: cycles fail with the full resolution path
//! - **Deterministic teardown**: disposers and instances are released in reverse creation order
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_container::{Container, Lifetime, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("[LOG] {}", message)
//!     }
//! }
//!
//! struct Service {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Service {
//!     fn new(logger: Arc<dyn Logger>) -> Self {
//!         Self { logger }
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.bind_as(
//!     Lifetime::Singleton,
//!     || ConsoleLogger,
//!     |logger: Arc<ConsoleLogger>| logger as Arc<dyn Logger>,
//! );
//! container.bind(Lifetime::Factory, Service::new);
//! container.seal();
//!
//! let service = container.get_required::<Service>();
//! assert_eq!(service.logger.log("ready"), "[LOG] ready");
//!
//! // The logger is a singleton shared by every service
//! let again = container.get_required::<Service>();
//! assert!(Arc::ptr_eq(&service.logger, &again.logger));
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: built once per container and shared
//! - **Factory**: built fresh on every request
//! - **Provided**: supplied by the caller and held weakly
//!
//! ## Optional Dependencies
//!
//! ```rust
//! use ferrous_container::{Container, ContainerOptions, Lifetime, ResolutionMode, Resolver};
//! use std::sync::Arc;
//!
//! struct Metrics;
//! struct Handler {
//!     metrics: Option<Arc<Metrics>>,
//! }
//!
//! let options = ContainerOptions::default().resolution(ResolutionMode::Lenient);
//! let mut container = Container::with_options(options);
//! container.bind(Lifetime::Factory, |metrics: Option<Arc<Metrics>>| Handler { metrics });
//!
//! let handler = container.get_required::<Handler>();
//! assert!(handler.metrics.is_none());
//! ```

pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod inject;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod traits;
pub mod validation;

// Internal modules
mod internal;
mod registration;

pub use config::{ContainerOptions, ResolutionMode, DEFAULT_MAX_DEPTH, ENV_PREFIX};
pub use container::{Container, ResolverContext};
pub use descriptors::BindingDescriptor;
pub use error::{DiError, DiResult};
pub use inject::{Constructor, DeclaredDependency, Dependencies, Dependency};
pub use key::{key_of, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, IgnoreReason, LoggingObserver};
pub use traits::{Dispose, Resolver, ResolverCore};
pub use validation::{ValidationError, ValidationReport, ValidationWarning};
