use crate::{Arguments, DynSvc, Item};
use std::fmt::{Debug, Formatter};

/// One entry of a [`Manifest`].
///
/// Every field is optional so that incomplete configuration can be
/// expressed; [`Container::register_many()`](crate::Container::register_many)
/// rejects entries without a dependency, or whose kind is not one of
/// `"class"`, `"factory"` or `"singleton"` or doesn't match the dependency.
#[derive(Clone, Default)]
pub struct Registration {
    /// The kind of the dependency, by name.
    pub kind: Option<String>,

    /// What the name is registered to.
    pub dependency: Option<Item>,

    /// Arguments bound to a class or factory. Ignored for singletons.
    pub args: Option<Arguments>,

    /// The context of a factory. Ignored for anything else.
    pub context: Option<DynSvc>,
}

impl Registration {
    /// Creates a registration of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>, dependency: Item) -> Self {
        Registration {
            kind: Some(kind.into()),
            dependency: Some(dependency),
            ..Registration::default()
        }
    }

    /// Sets the bound arguments.
    #[must_use]
    pub fn with_args(mut self, args: Arguments) -> Self {
        self.args = Some(args);
        self
    }

    /// Sets the factory context.
    #[must_use]
    pub fn with_context(mut self, context: DynSvc) -> Self {
        self.context = Some(context);
        self
    }
}

impl Debug for Registration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("kind", &self.kind)
            .field("dependency", &self.dependency)
            .field("args", &self.args)
            .field("context", &self.context.is_some())
            .finish()
    }
}

/// An ordered set of named registrations, applied all at once with
/// [`Container::register_many()`](crate::Container::register_many).
///
/// ```
/// use named_injector::{arguments, Container, Item, Manifest, Registration};
///
/// let manifest = Manifest::new()
///     .with("a", Registration::new("singleton", Item::singleton("foo")))
///     .with(
///         "b",
///         Registration::new("factory", Item::factory(|invocation| {
///             Ok(invocation.args().get_cloned::<&'static str>(0))
///         }))
///         .with_args(arguments!["bar"]),
///     );
///
/// let container = Container::new();
/// container.register_many(manifest).unwrap();
/// assert!(container.contains("a"));
/// assert!(container.contains("b"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    registrations: Vec<(String, Registration)>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Adds a registration, returning the manifest for chaining.
    #[must_use]
    pub fn with(
        mut self,
        name: impl Into<String>,
        registration: Registration,
    ) -> Self {
        self.insert(name, registration);
        self
    }

    /// Adds a registration. A name that is already present is replaced in
    /// place, keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, registration: Registration) {
        let name = name.into();
        match self
            .registrations
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            Some((_, slot)) => *slot = registration,
            None => self.registrations.push((name, registration)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl IntoIterator for Manifest {
    type Item = (String, Registration);
    type IntoIter = std::vec::IntoIter<(String, Registration)>;

    fn into_iter(self) -> Self::IntoIter {
        self.registrations.into_iter()
    }
}

impl<S: Into<String>> FromIterator<(S, Registration)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (S, Registration)>>(iter: I) -> Self {
        let mut manifest = Manifest::new();
        for (name, registration) in iter {
            manifest.insert(name, registration);
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_keep_first_position() {
        let manifest: Manifest = [
            ("a", Registration::new("singleton", Item::singleton(1u8))),
            ("b", Registration::new("singleton", Item::singleton(2u8))),
            ("a", Registration::new("singleton", Item::singleton(3u8))),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = manifest.into_iter().map(|(name, _)| name).collect();
        assert_eq!(vec!["a", "b"], names);
    }
}
