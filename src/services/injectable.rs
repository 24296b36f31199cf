use crate::{downcast, Dependency, DynSvc, Service, Svc};
use std::fmt::{Debug, Formatter};

/// A value the container can produce from a class or a factory.
///
/// After a value is constructed, the container walks its properties and
/// replaces every [`Property::Deferred`] with the value its dependency
/// resolves to. Types without injectable slots can rely on the default
/// implementation, which lists nothing.
///
/// ```
/// use named_injector::{Container, Injectable, Property};
///
/// struct Greeter {
///     name: Property,
/// }
///
/// impl Injectable for Greeter {
///     fn properties(&mut self) -> Vec<(&str, &mut Property)> {
///         vec![("name", &mut self.name)]
///     }
/// }
///
/// let container = Container::new();
/// let mut greeter = Greeter {
///     name: container.property("name").into(),
/// };
/// container.register_singleton("name", "world");
///
/// container.resolve_all(&mut greeter).unwrap();
/// assert_eq!(Some("world"), greeter.name.get_cloned::<&'static str>());
/// ```
pub trait Injectable: Service {
    /// Lists the injectable slots of this value along with their names.
    fn properties(&mut self) -> Vec<(&str, &mut Property)> {
        Vec::new()
    }
}

macro_rules! impl_injectable {
    ($($type_name:ty),* $(,)?) => {
        $(impl Injectable for $type_name {})*
    };
}

impl_injectable!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    &'static str,
    String,
);

impl<T: Service> Injectable for Vec<T> {}

impl<T: Service> Injectable for Option<T> {}

/// A property slot of an injectable value. It either still refers to a
/// dependency by name or holds what that dependency resolved to.
#[derive(Clone)]
pub enum Property {
    /// A dependency that will be resolved when the owning value is.
    Deferred(Dependency),

    /// The resolved value. `None` means the dependency was not registered at
    /// the time of resolution.
    Resolved(Option<DynSvc>),
}

impl Property {
    /// Creates a resolved property holding the given value.
    pub fn value<T: Service>(value: T) -> Self {
        let value: DynSvc = Svc::new(value);
        Property::Resolved(Some(value))
    }

    /// Whether this property still needs to be resolved.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Property::Deferred(_))
    }

    /// Gets the resolved value, if there is one.
    #[must_use]
    pub fn get_dyn(&self) -> Option<&DynSvc> {
        match self {
            Property::Resolved(value) => value.as_ref(),
            Property::Deferred(_) => None,
        }
    }

    /// Gets the resolved value as a pointer to a concrete type.
    #[must_use]
    pub fn get<T: Service>(&self) -> Option<Svc<T>> {
        self.get_dyn().and_then(downcast)
    }

    /// Gets a copy of the resolved value.
    #[must_use]
    pub fn get_cloned<T: Service + Clone>(&self) -> Option<T> {
        self.get_dyn()
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }
}

impl From<Dependency> for Property {
    fn from(dependency: Dependency) -> Self {
        Property::Deferred(dependency)
    }
}

impl Default for Property {
    fn default() -> Self {
        Property::Resolved(None)
    }
}

impl Debug for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Property::Deferred(dependency) => {
                f.debug_tuple("Deferred").field(dependency).finish()
            }
            Property::Resolved(Some(_)) => f.write_str("Resolved(<value>)"),
            Property::Resolved(None) => f.write_str("Resolved(None)"),
        }
    }
}
