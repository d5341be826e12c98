//! Container configuration.
//!
//! Options control how strictly unresolved dependencies are treated, whether
//! singletons are built when bound, and how deep a resolution chain may go.
//! They can be set in code or read from the environment.

use std::env;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use crate::{DiError, DiResult};

/// Default maximum resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Environment variable prefix read by [`ContainerOptions::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_CONTAINER";

/// How unresolved declared dependencies are handled.
///
/// Required dependencies (`Arc<T>` constructor parameters) always fail when
/// they cannot be resolved. The mode decides what happens to optional
/// dependencies (`Option<Arc<T>>` parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum ResolutionMode {
    /// Any unresolved dependency fails the construction.
    #[default]
    Strict,
    /// Unresolved optional dependencies are passed as `None`.
    Lenient,
}

impl std::str::FromStr for ResolutionMode {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ResolutionMode::Strict),
            "lenient" => Ok(ResolutionMode::Lenient),
            _ => Err(DiError::InvalidOption {
                name: "resolution",
                value: s.to_string(),
            }),
        }
    }
}

/// Options for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, ContainerOptions, ResolutionMode};
///
/// let options = ContainerOptions::default()
///     .resolution(ResolutionMode::Lenient)
///     .eager_singletons(false)
///     .max_depth(64);
///
/// let container = Container::with_options(options);
/// assert_eq!(container.options().resolution, ResolutionMode::Lenient);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Handling of unresolved dependencies
    pub resolution: ResolutionMode,
    /// Build singletons at bind time instead of on first request
    pub eager_singletons: bool,
    /// Maximum nesting of a single resolution chain
    pub max_depth: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            resolution: ResolutionMode::Strict,
            eager_singletons: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ContainerOptions {
    /// Sets the resolution mode.
    pub fn resolution(mut self, mode: ResolutionMode) -> Self {
        self.resolution = mode;
        self
    }

    /// Enables or disables eager singleton construction.
    pub fn eager_singletons(mut self, eager: bool) -> Self {
        self.eager_singletons = eager;
        self
    }

    /// Sets the maximum resolution depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Reads options from `FERROUS_CONTAINER_*` environment variables.
    ///
    /// Unset variables keep their defaults:
    ///
    /// - `FERROUS_CONTAINER_RESOLUTION`: `strict` or `lenient`
    /// - `FERROUS_CONTAINER_EAGER_SINGLETONS`: `true` or `false`
    /// - `FERROUS_CONTAINER_MAX_DEPTH`: positive integer
    pub fn from_env() -> DiResult<Self> {
        let mut options = Self::default();

        if let Some(value) = read_var("RESOLUTION") {
            options.resolution = value.parse()?;
        }
        if let Some(value) = read_var("EAGER_SINGLETONS") {
            options.eager_singletons = value.trim().parse().map_err(|_| DiError::InvalidOption {
                name: "eager_singletons",
                value: value.clone(),
            })?;
        }
        if let Some(value) = read_var("MAX_DEPTH") {
            options.max_depth = match value.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    return Err(DiError::InvalidOption {
                        name: "max_depth",
                        value,
                    })
                }
            };
        }

        Ok(options)
    }
}

fn read_var(suffix: &str) -> Option<String> {
    env::var(format!("{}_{}", ENV_PREFIX, suffix)).ok()
}
