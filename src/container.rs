use crate::{
    downcast_svc, Arguments, Class, ConfigField, Dependency, DynSvc, Entry,
    FactoryOutput, InjectError, InjectResult, Injectable, Invocation, Item, Kind, Manifest,
    MapContainer, MapContainerEx, Property, ProviderMap, Provision,
    ResolveOptions, Service, ServiceInfo, Svc, WeakMapContainer,
};
use std::fmt::{Debug, Formatter};
use tracing::{debug, trace, warn};

/// An inversion of control container. This holds every named provider and
/// turns names into values on request.
///
/// # Sharing the container
///
/// Cloning the container does not clone the registry inside of it. Both
/// handles see the same entries, which is how constructors, factories and
/// deferred properties can reach back into the container that resolves them.
/// Separate calls to [`Container::new()`] create fully independent
/// registries.
///
/// ```
/// use named_injector::{arguments, Container};
///
/// let container = Container::new();
/// container.register_singleton("greeting", "hello");
/// container.register_factory_with(
///     "shout",
///     |invocation| {
///         let greeting = invocation
///             .container()
///             .resolve_as::<&'static str>("greeting")?
///             .map_or("", |greeting| *greeting);
///         let name = invocation.args().get_cloned::<&'static str>(0).unwrap_or("nobody");
///         Ok(format!("{greeting}, {name}!").to_uppercase())
///     },
///     arguments!["world"],
///     None,
/// );
///
/// let shout = container.resolve_as::<String>("shout").unwrap().unwrap();
/// assert_eq!("HELLO, WORLD!", shout.as_str());
/// ```
///
/// # Cycles
///
/// The handle passed into a constructor or factory remembers which names are
/// being activated. Requesting one of them again fails with
/// [`InjectError::CycleDetected`] instead of recursing forever. Any re-entry
/// is rejected, including a class that resolves its own name with different
/// arguments and would eventually stop.
#[derive(Clone)]
pub struct Container {
    registry: MapContainer<ProviderMap>,
    path: Vec<String>,
}

impl Container {
    /// Creates a container with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Container {
            registry: MapContainerEx::new(ProviderMap::new()),
            path: Vec::new(),
        }
    }

    /// Registers a class under a name. Each resolution constructs a new
    /// instance. Returns the type information of the class.
    pub fn register_class<T: Class>(&self, name: impl Into<String>) -> ServiceInfo {
        self.register_class_with::<T>(name, Arguments::new())
    }

    /// Registers a class under a name along with arguments that are passed
    /// to its constructor ahead of any call-time arguments.
    pub fn register_class_with<T: Class>(
        &self,
        name: impl Into<String>,
        args: Arguments,
    ) -> ServiceInfo {
        self.insert(name.into(), Entry::new(Item::class::<T>(), args, None));
        ServiceInfo::of::<T>()
    }

    /// Registers a factory under a name. Each resolution invokes it. Returns
    /// the factory.
    pub fn register_factory<F, R>(&self, name: impl Into<String>, func: F) -> Svc<F>
    where
        F: Fn(&Invocation<'_>) -> InjectResult<R> + Service,
        R: FactoryOutput,
    {
        self.register_factory_with(name, func, Arguments::new(), None)
    }

    /// Registers a factory under a name along with arguments that are passed
    /// ahead of any call-time arguments, and the context it is invoked with
    /// when the resolution doesn't supply one.
    pub fn register_factory_with<F, R>(
        &self,
        name: impl Into<String>,
        func: F,
        args: Arguments,
        context: Option<DynSvc>,
    ) -> Svc<F>
    where
        F: Fn(&Invocation<'_>) -> InjectResult<R> + Service,
        R: FactoryOutput,
    {
        let func = Svc::new(func);
        let item = Item::factory_svc(func.clone());
        self.insert(name.into(), Entry::new(item, args, context));
        func
    }

    /// Registers a value under a name. Every resolution returns this same
    /// value, which is also returned from this call.
    pub fn register_singleton<T: Service>(
        &self,
        name: impl Into<String>,
        instance: T,
    ) -> Svc<T> {
        let instance = Svc::new(instance);
        let value: DynSvc = instance.clone();
        self.register_singleton_svc(name, value);
        instance
    }

    /// Registers an already shared value under a name.
    pub fn register_singleton_svc(
        &self,
        name: impl Into<String>,
        instance: DynSvc,
    ) -> DynSvc {
        let item = Item::singleton_svc(instance.clone());
        self.insert(name.into(), Entry::new(item, Arguments::new(), None));
        instance
    }

    /// Registers every entry of a manifest in order.
    ///
    /// Each entry is validated right before it is registered. The first
    /// invalid entry aborts the call with [`InjectError::BadConfiguration`];
    /// entries before it stay registered and the offending name is left
    /// untouched.
    pub fn register_many(&self, manifest: Manifest) -> InjectResult<()> {
        for (name, registration) in manifest {
            let item = registration.dependency.ok_or_else(|| {
                InjectError::BadConfiguration {
                    name: name.clone(),
                    field: ConfigField::Dependency,
                }
            })?;

            let kind_matches = registration
                .kind
                .as_deref()
                .and_then(Kind::parse)
                .map_or(false, |kind| kind == item.kind());
            if !kind_matches {
                return Err(InjectError::BadConfiguration {
                    name,
                    field: ConfigField::Kind,
                });
            }

            let args = registration.args.unwrap_or_default();
            self.insert(name, Entry::new(item, args, registration.context));
        }

        Ok(())
    }

    /// Removes the entry registered under a name, if there is one.
    pub fn unregister(&self, name: &str) {
        let removed = self
            .registry
            .with_inner_mut(|registry| registry.remove(name))
            .is_some();
        debug!(name, removed, "unregistered dependency");
    }

    /// Removes every entry.
    pub fn unregister_all(&self) {
        let count = self.registry.with_inner_mut(|registry| {
            let count = registry.len();
            registry.clear();
            count
        });
        debug!(count, "unregistered all dependencies");
    }

    /// Whether anything is registered under a name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry
            .with_inner(|registry| registry.contains_key(name))
    }

    /// The number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.with_inner(|registry| registry.len())
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a deferred reference to a named dependency. The name does not
    /// need to be registered until the reference is resolved.
    #[must_use]
    pub fn property(&self, name: impl Into<String>) -> Dependency {
        Dependency::new(self.downgrade(), name.into(), None)
    }

    /// Creates a deferred reference that passes the given arguments each
    /// time it is resolved.
    #[must_use]
    pub fn property_with(
        &self,
        name: impl Into<String>,
        args: Arguments,
    ) -> Dependency {
        Dependency::new(self.downgrade(), name.into(), Some(args))
    }

    /// Replaces every deferred property of a value with what its dependency
    /// resolves to. Properties that were already resolved are left alone, so
    /// calling this again on the same value does nothing.
    pub fn resolve_all<'a, T>(&self, target: &'a mut T) -> InjectResult<&'a mut T>
    where
        T: ?Sized + Injectable,
    {
        for (key, property) in target.properties() {
            let value = match &*property {
                Property::Deferred(dependency) => {
                    trace!(
                        property = key,
                        dependency = dependency.name(),
                        "injecting property"
                    );
                    dependency.resolve_in(self)?
                }
                Property::Resolved(_) => continue,
            };
            *property = Property::Resolved(value);
        }

        Ok(target)
    }

    /// Composes an initializer with property injection. The returned
    /// function injects the target's deferred properties, then calls the
    /// original initializer with the same arguments.
    ///
    /// ```
    /// use named_injector::{Container, Injectable, Property};
    ///
    /// #[derive(Default)]
    /// struct Widget {
    ///     label: Property,
    ///     ready: bool,
    /// }
    ///
    /// impl Injectable for Widget {
    ///     fn properties(&mut self) -> Vec<(&str, &mut Property)> {
    ///         vec![("label", &mut self.label)]
    ///     }
    /// }
    ///
    /// let container = Container::new();
    /// container.register_singleton("label", "ok");
    ///
    /// let initialize = container.auto_resolve(|widget: &mut Widget, ready: bool| {
    ///     widget.ready = ready;
    /// });
    ///
    /// let mut widget = Widget {
    ///     label: container.property("label").into(),
    ///     ..Widget::default()
    /// };
    /// initialize(&mut widget, true).unwrap();
    ///
    /// assert!(widget.ready);
    /// assert_eq!(Some("ok"), widget.label.get_cloned::<&'static str>());
    /// ```
    pub fn auto_resolve<T, A, R, F>(
        &self,
        initializer: F,
    ) -> impl Fn(&mut T, A) -> InjectResult<R>
    where
        T: ?Sized + Injectable,
        F: Fn(&mut T, A) -> R,
    {
        let container = self.clone();
        move |target: &mut T, args: A| {
            container.resolve_all(&mut *target)?;
            Ok(initializer(target, args))
        }
    }

    /// Resolves a dependency by name. See
    /// [`resolve_with()`](Container::resolve_with).
    pub fn resolve(&self, name: &str) -> InjectResult<Option<DynSvc>> {
        self.resolve_with(name, ResolveOptions::new())
    }

    /// Resolves a dependency by name.
    ///
    /// A name that is not registered is not an error: a warning containing
    /// `DependencyNotFound:<name>` is logged, the error handler of the
    /// options is called with that same message, and `Ok(None)` is returned.
    ///
    /// Singletons are returned as they are. Classes are constructed and
    /// factories are invoked with the registered arguments followed by the
    /// arguments of the options; the deferred properties of the value they
    /// produce are then injected. Errors raised by constructors and factories
    /// are passed through as they are.
    pub fn resolve_with(
        &self,
        name: &str,
        mut options: ResolveOptions<'_>,
    ) -> InjectResult<Option<DynSvc>> {
        let entry = self
            .registry
            .with_inner(|registry| registry.get(name).cloned());
        let entry = match entry {
            Some(entry) => entry,
            None => {
                let message = format!("DependencyNotFound:{name}");
                warn!("{}", message);
                options.report_missing(&message);
                return Ok(None);
            }
        };

        trace!(name, kind = %entry.kind(), "resolving dependency");
        let activator = match entry.provision() {
            Provision::Value(value) => return Ok(Some(value)),
            Provision::Activate(activator) => activator,
        };

        if self.path.iter().any(|active| active == name) {
            let mut cycle = self.path.clone();
            cycle.push(name.to_owned());
            return Err(InjectError::CycleDetected {
                name: name.to_owned(),
                cycle,
            });
        }

        let mut args = entry.args().clone();
        args.append(options.args);
        let context = options.context.or_else(|| entry.context().cloned());

        let child = self.enter(name);
        let invocation = Invocation::new(&child, args, context);
        activator.activate(&invocation).map(Some)
    }

    /// Resolves a dependency by name and downcasts it to a concrete type.
    pub fn resolve_as<T: Service>(&self, name: &str) -> InjectResult<Option<Svc<T>>> {
        self.resolve_as_with(name, ResolveOptions::new())
    }

    /// Resolves a dependency by name with options and downcasts it to a
    /// concrete type. A value of another type is reported as
    /// [`InjectError::TypeMismatch`].
    pub fn resolve_as_with<T: Service>(
        &self,
        name: &str,
        options: ResolveOptions<'_>,
    ) -> InjectResult<Option<Svc<T>>> {
        self.resolve_with(name, options)?
            .map(|value| {
                downcast_svc::<T>(value).map_err(|_| {
                    InjectError::TypeMismatch {
                        name: name.to_owned(),
                        expected: ServiceInfo::of::<T>(),
                    }
                })
            })
            .transpose()
    }

    /// Injects the properties of a freshly produced value and shares it.
    pub(crate) fn inject<T: Injectable>(&self, mut value: T) -> InjectResult<DynSvc> {
        self.resolve_all(&mut value)?;
        let value: DynSvc = Svc::new(value);
        Ok(value)
    }

    pub(crate) fn downgrade(&self) -> WeakMapContainer<ProviderMap> {
        Svc::downgrade(&self.registry)
    }

    /// Whether this handle uses the given registry.
    pub(crate) fn owns(&self, registry: &WeakMapContainer<ProviderMap>) -> bool {
        std::ptr::eq(registry.as_ptr(), Svc::as_ptr(&self.registry))
    }

    /// A root handle to the registry, unless every container using it has
    /// been dropped.
    pub(crate) fn upgrade(registry: &WeakMapContainer<ProviderMap>) -> Option<Container> {
        registry.upgrade().map(|registry| Container {
            registry,
            path: Vec::new(),
        })
    }

    fn insert(&self, name: String, entry: Entry) {
        debug!(name = %name, kind = %entry.kind(), "registered dependency");
        self.registry.with_inner_mut(|registry| {
            registry.insert(name, entry);
        });
    }

    fn enter(&self, name: &str) -> Container {
        let mut child = self.clone();
        child.path.push(name.to_owned());
        child
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::new()
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names = self
            .registry
            .with_inner(|registry| registry.keys().cloned().collect::<Vec<_>>());
        names.sort();
        f.debug_struct("Container")
            .field("names", &names)
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_do_not_keep_the_registry_alive() {
        let container = Container::new();
        let token = container.property("late");
        let mut args = Arguments::new();
        args.push(token);
        container.register_factory_with("holder", |_| Ok(()), args, None);

        let registry = Svc::downgrade(&container.registry);
        assert!(registry.upgrade().is_some());

        drop(container);
        assert!(registry.upgrade().is_none());
    }

    #[test]
    fn handles_recognize_their_own_registry() {
        let container = Container::new();
        let other = Container::new();
        let registry = container.downgrade();

        assert!(container.enter("a").owns(&registry));
        assert!(!other.owns(&registry));
    }
}
