use crate::{
    Arguments, Container, DynSvc, InjectResult, ProviderMap, ResolveOptions,
    Service, Svc, WeakMapContainer,
};
use std::fmt::{Debug, Formatter};
use tracing::warn;

/// A lazy reference to a named dependency, bound to the container that
/// created it.
///
/// Nothing is looked up when the token is created. Each call to
/// [`resolve()`](Dependency::resolve) queries the registry as it is at that
/// moment, so a token may be created before its target is registered.
///
/// A token does not keep its container alive. Once every handle to the
/// container is dropped, the token resolves to nothing.
///
/// ```
/// use named_injector::Container;
///
/// let container = Container::new();
/// let token = container.property("greeting");
/// assert!(token.resolve().unwrap().is_none());
///
/// container.register_singleton("greeting", "hello");
/// let greeting = token.resolve_as::<&'static str>().unwrap().unwrap();
/// assert_eq!("hello", *greeting);
/// ```
#[derive(Clone)]
pub struct Dependency {
    registry: WeakMapContainer<ProviderMap>,
    name: String,
    args: Option<Arguments>,
}

impl Dependency {
    pub(crate) fn new(
        registry: WeakMapContainer<ProviderMap>,
        name: String,
        args: Option<Arguments>,
    ) -> Self {
        Dependency {
            registry,
            name,
            args,
        }
    }

    /// The name of the dependency this token refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arguments used each time this token is resolved.
    #[must_use]
    pub fn args(&self) -> Option<&Arguments> {
        self.args.as_ref()
    }

    /// Resolves the dependency through the owning container.
    pub fn resolve(&self) -> InjectResult<Option<DynSvc>> {
        match self.container() {
            Some(container) => {
                container.resolve_with(&self.name, self.options())
            }
            None => Ok(None),
        }
    }

    /// Resolves the dependency and downcasts it to a concrete type.
    pub fn resolve_as<T: Service>(&self) -> InjectResult<Option<Svc<T>>> {
        match self.container() {
            Some(container) => {
                container.resolve_as_with(&self.name, self.options())
            }
            None => Ok(None),
        }
    }

    /// Resolves through `container` when it uses this token's registry,
    /// otherwise through the owning container.
    pub(crate) fn resolve_in(
        &self,
        container: &Container,
    ) -> InjectResult<Option<DynSvc>> {
        if container.owns(&self.registry) {
            container.resolve_with(&self.name, self.options())
        } else {
            self.resolve()
        }
    }

    fn container(&self) -> Option<Container> {
        let container = Container::upgrade(&self.registry);
        if container.is_none() {
            warn!("DependencyNotFound:{}", self.name);
        }
        container
    }

    fn options(&self) -> ResolveOptions<'static> {
        match &self.args {
            Some(args) => ResolveOptions::new().with_args(args.clone()),
            None => ResolveOptions::new(),
        }
    }
}

impl Debug for Dependency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}
