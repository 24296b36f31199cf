use crate::{
    Activator, Arguments, Container, DynSvc, InjectResult, Injectable,
    Invocation,
};
use std::marker::PhantomData;

/// A type the container constructs anew each time it is resolved.
///
/// The arguments bound at registration come first, followed by the ones
/// passed to the resolution. Deferred properties of the constructed value are
/// injected before it is handed out.
///
/// ```
/// use named_injector::{arguments, Arguments, Class, Container, InjectResult, Injectable, ResolveOptions};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Injectable for Point {}
///
/// impl Class for Point {
///     fn construct(_container: &Container, args: Arguments) -> InjectResult<Self> {
///         Ok(Point {
///             x: args.get_cloned(0).unwrap_or_default(),
///             y: args.get_cloned(1).unwrap_or_default(),
///         })
///     }
/// }
///
/// let container = Container::new();
/// container.register_class_with::<Point>("point", arguments![1i32]);
///
/// let point = container
///     .resolve_as_with::<Point>("point", ResolveOptions::new().with_args(arguments![2i32]))
///     .unwrap()
///     .unwrap();
/// assert_eq!((1, 2), (point.x, point.y));
/// ```
pub trait Class: Injectable + Sized {
    /// Creates a new instance from positional arguments. The container is
    /// the one performing the resolution and may be used to resolve further
    /// dependencies.
    fn construct(container: &Container, args: Arguments)
        -> InjectResult<Self>;
}

/// Constructs a [`Class`] on each activation.
pub(crate) struct ClassActivator<T>
where
    T: Class,
{
    marker: PhantomData<fn() -> T>,
}

impl<T> ClassActivator<T>
where
    T: Class,
{
    pub fn new() -> Self {
        ClassActivator {
            marker: PhantomData,
        }
    }
}

impl<T> Activator for ClassActivator<T>
where
    T: Class,
{
    fn activate(&self, invocation: &Invocation<'_>) -> InjectResult<DynSvc> {
        let container = invocation.container();
        let instance = T::construct(container, invocation.args().clone())?;
        container.inject(instance)
    }
}
