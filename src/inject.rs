//! Declared dependencies and typed constructors.
//!
//! A binding lists its dependencies through the parameter types of its
//! constructor. `Fn(Arc<A>, Option<Arc<B>>) -> C` declares a required `A`
//! and an optional `B`, in that order, and the compiler checks that the
//! constructor accepts exactly what is resolved for it.

use std::sync::Arc;

use crate::config::ResolutionMode;
use crate::error::DiResult;
use crate::key::{key_of, Key};
use crate::container::ResolverContext;
use crate::traits::Resolver;

/// A dependency as declared by a binding's constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// Identity of the dependency type
    pub key: Key,
    /// Whether the constructor accepts absence (`Option<Arc<T>>`)
    pub optional: bool,
}

/// A single constructor parameter that the container can supply.
///
/// Implemented for `Arc<T>` (required) and `Option<Arc<T>>` (optional),
/// including trait objects such as `Arc<dyn Logger>`.
pub trait Dependency: Sized + 'static {
    /// Identity and optionality of this parameter.
    fn declare() -> DeclaredDependency;

    /// Resolves this parameter through the container.
    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self>;
}

impl<T> Dependency for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn declare() -> DeclaredDependency {
        DeclaredDependency { key: key_of::<T>(), optional: false }
    }

    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
        ctx.resolve::<T>()?.ok_or_else(|| ctx.missing::<T>())
    }
}

impl<T> Dependency for Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn declare() -> DeclaredDependency {
        DeclaredDependency { key: key_of::<T>(), optional: true }
    }

    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
        match ctx.resolve::<T>()? {
            Some(value) => Ok(Some(value)),
            None => match ctx.resolution_mode() {
                ResolutionMode::Lenient => Ok(None),
                ResolutionMode::Strict => Err(ctx.missing::<T>()),
            },
        }
    }
}

/// An ordered list of constructor parameters.
///
/// Implemented for `()` and for tuples of up to twelve [`Dependency`] types.
/// Parameters are resolved left to right.
pub trait Dependencies: Sized + 'static {
    /// The declared dependencies, in parameter order.
    fn declare() -> Vec<DeclaredDependency>;

    /// Resolves every parameter in declaration order.
    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self>;
}

/// A constructor producing `T` from the dependency tuple `Deps`.
///
/// Implemented for every `Fn(D1, .., Dn) -> T` whose parameters are
/// [`Dependency`] types, so plain functions such as `Service::new` and
/// closures with typed parameters both work.
pub trait Constructor<T, Deps>: Send + Sync + 'static {
    /// Invokes the constructor with resolved dependencies.
    fn construct(&self, deps: Deps) -> T;
}

impl Dependencies for () {
    fn declare() -> Vec<DeclaredDependency> {
        Vec::new()
    }

    fn resolve(_ctx: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(())
    }
}

impl<F, T> Constructor<T, ()> for F
where
    F: Fn() -> T + Send + Sync + 'static,
{
    fn construct(&self, _deps: ()) -> T {
        (self)()
    }
}

#[rustfmt::skip]
macro_rules! apply_tuples {
    ($name:ident) => {
        $name!(D1);
        $name!(D1, D2);
        $name!(D1, D2, D3);
        $name!(D1, D2, D3, D4);
        $name!(D1, D2, D3, D4, D5);
        $name!(D1, D2, D3, D4, D5, D6);
        $name!(D1, D2, D3, D4, D5, D6, D7);
        $name!(D1, D2, D3, D4, D5, D6, D7, D8);
        $name!(D1, D2, D3, D4, D5, D6, D7, D8, D9);
        $name!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10);
        $name!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11);
        $name!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12);
    };
}

macro_rules! impl_constructor {
    ($($dep:ident),+) => {
        impl<$($dep: Dependency),+> Dependencies for ($($dep,)+) {
            fn declare() -> Vec<DeclaredDependency> {
                vec![$($dep::declare()),+]
            }

            fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
                Ok(($($dep::resolve(ctx)?,)+))
            }
        }

        impl<F, T, $($dep: Dependency),+> Constructor<T, ($($dep,)+)> for F
        where
            F: Fn($($dep),+) -> T + Send + Sync + 'static,
        {
            #[allow(non_snake_case)]
            fn construct(&self, deps: ($($dep,)+)) -> T {
                let ($($dep,)+) = deps;
                (self)($($dep),+)
            }
        }
    };
}

apply_tuples!(impl_constructor);
