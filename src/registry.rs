use crate::{
    Arguments, Class, ClassActivator, DynSvc, FactoryActivator, FactoryOutput,
    InjectResult, Invocation, Service, ServiceInfo, Svc,
};
use derive_more::Display;
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

pub(crate) type ProviderMap = HashMap<String, Entry>;

pub(crate) trait MapContainerEx<T> {
    fn new(value: T) -> Self;
    fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R;
    fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R;
}

#[cfg(feature = "rc")]
mod types {
    use super::MapContainerEx;
    use std::{
        cell::RefCell,
        rc::{Rc, Weak},
    };

    pub type MapContainer<T> = Rc<RefCell<T>>;
    pub type WeakMapContainer<T> = Weak<RefCell<T>>;

    impl<T> MapContainerEx<T> for MapContainer<T> {
        fn new(value: T) -> Self {
            Rc::new(RefCell::new(value))
        }

        fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
            f(&*self.borrow())
        }

        fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
            f(&mut *self.borrow_mut())
        }
    }
}

#[cfg(feature = "arc")]
mod types {
    use super::MapContainerEx;
    use std::sync::{Arc, Mutex, PoisonError, Weak};

    pub type MapContainer<T> = Arc<Mutex<T>>;
    pub type WeakMapContainer<T> = Weak<Mutex<T>>;

    impl<T> MapContainerEx<T> for MapContainer<T> {
        fn new(value: T) -> Self {
            Arc::new(Mutex::new(value))
        }

        // Providers never run while the lock is held, so a poisoned lock
        // still guards a consistent map.
        fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
            f(&*self.lock().unwrap_or_else(PoisonError::into_inner))
        }

        fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
            f(&mut *self.lock().unwrap_or_else(PoisonError::into_inner))
        }
    }
}

#[allow(clippy::wildcard_imports)]
pub(crate) use types::*;

/// Produces a value each time an entry is resolved.
pub(crate) trait Activator: Service {
    fn activate(&self, invocation: &Invocation<'_>) -> InjectResult<DynSvc>;
}

/// How a registered dependency is produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Display)]
pub enum Kind {
    /// A new instance is constructed on every resolution.
    #[display(fmt = "class")]
    Class,

    /// A function is invoked on every resolution.
    #[display(fmt = "factory")]
    Factory,

    /// The same value is returned on every resolution.
    #[display(fmt = "singleton")]
    Singleton,
}

impl Kind {
    /// Parses the name of a kind as it appears in bulk registrations.
    #[must_use]
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "class" => Some(Kind::Class),
            "factory" => Some(Kind::Factory),
            "singleton" => Some(Kind::Singleton),
            _ => None,
        }
    }
}

#[derive(Clone)]
enum ItemKind {
    Class(ServiceInfo, Svc<dyn Activator>),
    Factory(Svc<dyn Activator>),
    Singleton(DynSvc),
}

/// The thing a name is registered to: a class, a factory, or a ready-made
/// value.
#[derive(Clone)]
pub struct Item {
    inner: ItemKind,
}

impl Item {
    /// A class that is constructed on each resolution.
    #[must_use]
    pub fn class<T: Class>() -> Self {
        let activator: Svc<dyn Activator> =
            Svc::new(ClassActivator::<T>::new());
        Item {
            inner: ItemKind::Class(ServiceInfo::of::<T>(), activator),
        }
    }

    /// A factory that is invoked on each resolution.
    #[must_use]
    pub fn factory<F, R>(func: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> InjectResult<R> + Service,
        R: FactoryOutput,
    {
        Item::factory_svc(Svc::new(func))
    }

    pub(crate) fn factory_svc<F, R>(func: Svc<F>) -> Self
    where
        F: Fn(&Invocation<'_>) -> InjectResult<R> + Service,
        R: FactoryOutput,
    {
        let activator: Svc<dyn Activator> =
            Svc::new(FactoryActivator::new(func));
        Item {
            inner: ItemKind::Factory(activator),
        }
    }

    /// A value that is handed out as is.
    #[must_use]
    pub fn singleton<T: Service>(value: T) -> Self {
        let value: DynSvc = Svc::new(value);
        Item::singleton_svc(value)
    }

    /// An already shared value that is handed out as is.
    #[must_use]
    pub fn singleton_svc(value: DynSvc) -> Self {
        Item {
            inner: ItemKind::Singleton(value),
        }
    }

    /// The kind of provider this item is.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self.inner {
            ItemKind::Class(..) => Kind::Class,
            ItemKind::Factory(_) => Kind::Factory,
            ItemKind::Singleton(_) => Kind::Singleton,
        }
    }
}

impl Debug for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            ItemKind::Class(info, _) => {
                f.debug_tuple("Class").field(&info.name()).finish()
            }
            ItemKind::Factory(_) => f.write_str("Factory"),
            ItemKind::Singleton(_) => f.write_str("Singleton"),
        }
    }
}

/// What an entry resolves to once its kind has been dispatched on.
pub(crate) enum Provision {
    Value(DynSvc),
    Activate(Svc<dyn Activator>),
}

/// A registered provider together with what it is invoked with.
#[derive(Clone)]
pub(crate) struct Entry {
    item: Item,
    args: Arguments,
    context: Option<DynSvc>,
}

impl Entry {
    /// Creates an entry, dropping the arguments of a singleton and the
    /// context of anything but a factory.
    pub fn new(item: Item, args: Arguments, context: Option<DynSvc>) -> Self {
        let kind = item.kind();
        Entry {
            args: if kind == Kind::Singleton {
                Arguments::new()
            } else {
                args
            },
            context: if kind == Kind::Factory { context } else { None },
            item,
        }
    }

    pub fn kind(&self) -> Kind {
        self.item.kind()
    }

    pub fn args(&self) -> &Arguments {
        &self.args
    }

    pub fn context(&self) -> Option<&DynSvc> {
        self.context.as_ref()
    }

    pub fn provision(&self) -> Provision {
        match &self.item.inner {
            ItemKind::Singleton(value) => Provision::Value(value.clone()),
            ItemKind::Class(_, activator) | ItemKind::Factory(activator) => {
                Provision::Activate(activator.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments;

    #[test]
    fn kind_names_round_trip() {
        for kind in [Kind::Class, Kind::Factory, Kind::Singleton] {
            assert_eq!(Some(kind), Kind::parse(&kind.to_string()));
        }
        assert_eq!(None, Kind::parse("lol"));
        assert_eq!(None, Kind::parse("Class"));
    }

    #[test]
    fn singleton_entries_ignore_args_and_context() {
        let context: DynSvc = Svc::new(1u8);
        let entry =
            Entry::new(Item::singleton("foo"), arguments!["bar"], Some(context));

        assert_eq!(Kind::Singleton, entry.kind());
        assert!(entry.args().is_empty());
        assert!(entry.context().is_none());
    }

    #[test]
    fn only_factories_keep_context() {
        let context: DynSvc = Svc::new(1u8);
        let factory = Entry::new(
            Item::factory(|_| Ok(())),
            arguments!["bar"],
            Some(context.clone()),
        );
        assert_eq!(1, factory.args().len());
        assert!(factory.context().is_some());
    }
}
