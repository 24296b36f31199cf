use crate::{
    downcast, Activator, Arguments, Container, DynSvc, InjectResult,
    Injectable, Service, Svc,
};
use std::marker::PhantomData;

/// Everything a factory is called with.
pub struct Invocation<'a> {
    container: &'a Container,
    args: Arguments,
    context: Option<DynSvc>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        container: &'a Container,
        args: Arguments,
        context: Option<DynSvc>,
    ) -> Self {
        Invocation {
            container,
            args,
            context,
        }
    }

    /// The container performing the resolution.
    #[must_use]
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The registered arguments followed by the call-time ones.
    #[must_use]
    pub fn args(&self) -> &Arguments {
        &self.args
    }

    /// The context of this invocation. Unless one was supplied when
    /// resolving or registering, the context is the container itself.
    #[must_use]
    pub fn context(&self) -> Context<'_> {
        match &self.context {
            Some(value) => Context::Value(value),
            None => Context::Container(self.container),
        }
    }

    /// Gets the supplied context as a pointer to a concrete type.
    #[must_use]
    pub fn context_as<T: Service>(&self) -> Option<Svc<T>> {
        self.context.as_ref().and_then(downcast)
    }
}

/// The context a factory is invoked with.
pub enum Context<'a> {
    /// A context value supplied at resolution or registration.
    Value(&'a DynSvc),

    /// No context was supplied, so the container stands in for it.
    Container(&'a Container),
}

/// A value a factory can return.
///
/// Owned values are shared after their deferred properties are injected.
/// A pointer that is already shared is handed out as it is, so a factory
/// can return the same instance from every invocation.
///
/// ```
/// use named_injector::{Container, Svc};
///
/// let container = Container::new();
/// let cached = Svc::new(String::from("cached"));
/// let shared = cached.clone();
/// container.register_factory("cached", move |_| Ok(shared.clone()));
///
/// let resolved = container.resolve_as::<String>("cached").unwrap().unwrap();
/// assert!(Svc::ptr_eq(&cached, &resolved));
/// ```
pub trait FactoryOutput: Service {
    /// Turns the returned value into what the resolution yields.
    fn into_dyn_svc(self, container: &Container) -> InjectResult<DynSvc>;
}

impl<T: Injectable> FactoryOutput for T {
    fn into_dyn_svc(self, container: &Container) -> InjectResult<DynSvc> {
        container.inject(self)
    }
}

impl<T: Service> FactoryOutput for Svc<T> {
    fn into_dyn_svc(self, _container: &Container) -> InjectResult<DynSvc> {
        let value: DynSvc = self;
        Ok(value)
    }
}

impl FactoryOutput for DynSvc {
    fn into_dyn_svc(self, _container: &Container) -> InjectResult<DynSvc> {
        Ok(self)
    }
}

/// Invokes a factory function on each activation.
pub(crate) struct FactoryActivator<F, R>
where
    F: Fn(&Invocation<'_>) -> InjectResult<R> + Service,
    R: FactoryOutput,
{
    func: Svc<F>,
    marker: PhantomData<fn() -> R>,
}

impl<F, R> FactoryActivator<F, R>
where
    F: Fn(&Invocation<'_>) -> InjectResult<R> + Service,
    R: FactoryOutput,
{
    pub fn new(func: Svc<F>) -> Self {
        FactoryActivator {
            func,
            marker: PhantomData,
        }
    }
}

impl<F, R> Activator for FactoryActivator<F, R>
where
    F: Fn(&Invocation<'_>) -> InjectResult<R> + Service,
    R: FactoryOutput,
{
    fn activate(&self, invocation: &Invocation<'_>) -> InjectResult<DynSvc> {
        let result = (self.func)(invocation)?;
        result.into_dyn_svc(invocation.container())
    }
}
