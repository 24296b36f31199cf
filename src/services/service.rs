use derive_more::Display;
use std::{
    any::{Any, TypeId},
    error::Error,
};

#[cfg(feature = "arc")]
mod types {
    use downcast_rs::{impl_downcast, DowncastSync};

    /// A reference-counted pointer holding a service. The pointer type is
    /// determined by the feature flags passed to this crate.
    pub type Svc<T> = std::sync::Arc<T>;

    /// Implemented automatically on types that are capable of being a
    /// service.
    pub trait Service: DowncastSync {}
    impl<T: ?Sized + DowncastSync> Service for T {}

    impl_downcast!(sync Service);

    pub(crate) fn downcast_svc<T: Service>(
        value: Svc<dyn Service>,
    ) -> Result<Svc<T>, Svc<dyn Service>> {
        value.downcast_arc()
    }
}

#[cfg(feature = "rc")]
mod types {
    use downcast_rs::{impl_downcast, Downcast};

    /// A reference-counted pointer holding a service. The pointer type is
    /// determined by the feature flags passed to this crate.
    pub type Svc<T> = std::rc::Rc<T>;

    /// Implemented automatically on types that are capable of being a
    /// service.
    pub trait Service: Downcast {}
    impl<T: ?Sized + Downcast> Service for T {}

    impl_downcast!(Service);

    pub(crate) fn downcast_svc<T: Service>(
        value: Svc<dyn Service>,
    ) -> Result<Svc<T>, Svc<dyn Service>> {
        value.downcast_rc()
    }
}

pub use types::{Service, Svc};
pub(crate) use types::downcast_svc;

/// A service pointer holding an instance of `dyn Service`. Every value the
/// container hands out is one of these.
pub type DynSvc = Svc<dyn Service>;

/// A result from attempting to resolve a dependency.
pub type InjectResult<T> = Result<T, InjectError>;

/// Tries to view a type-erased service as a pointer to a concrete type. The
/// original pointer is left untouched.
///
/// ```
/// use named_injector::{downcast, DynSvc, Svc};
///
/// let value: DynSvc = Svc::new(12i32);
/// assert_eq!(Some(12), downcast::<i32>(&value).map(|value| *value));
/// assert!(downcast::<u8>(&value).is_none());
/// ```
#[must_use]
pub fn downcast<T: Service>(value: &DynSvc) -> Option<Svc<T>> {
    downcast_svc(value.clone()).ok()
}

/// Type information about a service.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ServiceInfo {
    id: TypeId,
    name: &'static str,
}

impl ServiceInfo {
    /// Describes the type `T`.
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        ServiceInfo {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A field of a bulk registration that failed validation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum ConfigField {
    /// The provided item is missing.
    #[display(fmt = "dependency")]
    Dependency,

    /// The kind is missing, unknown, or doesn't match the provided item.
    #[display(fmt = "kind")]
    Kind,
}

/// An error that occurred while registering or resolving a dependency.
///
/// A missing dependency is not an error: resolution yields `Ok(None)`
/// instead.
#[derive(Debug, Display)]
#[non_exhaustive]
pub enum InjectError {
    /// An entry in a bulk registration is invalid.
    #[display(fmt = "BadConfiguration:{}.{}", name, field)]
    BadConfiguration {
        /// The name of the offending entry.
        name: String,

        /// The field that failed validation.
        field: ConfigField,
    },

    /// An argument specification is neither a passthrough, a name nor a
    /// shape.
    #[display(
        fmt = "BadArgument: Expected string or object. Received: {}",
        received
    )]
    BadArgument {
        /// The rejected specification, as it was written.
        received: String,
    },

    /// A dependency was requested again while it was still being activated.
    #[display(fmt = "CircularDependency:{}", "fmt_cycle(cycle)")]
    CycleDetected {
        /// The dependency that was requested.
        name: String,

        /// The chain of dependencies being activated, ending with the
        /// repeated one.
        cycle: Vec<String>,
    },

    /// The resolved value is not of the requested type.
    #[display(fmt = "TypeMismatch:{} is not a {}", name, "expected.name()")]
    TypeMismatch {
        /// The dependency that was requested.
        name: String,

        /// The type the caller asked for.
        expected: ServiceInfo,
    },

    /// A constructor or factory failed. The inner error is the one the
    /// body produced.
    #[display(fmt = "{}", _0)]
    ActivationFailed(Box<dyn Error + Send + Sync + 'static>),
}

impl InjectError {
    /// Wraps an error raised inside a constructor or factory body.
    pub fn activation(
        error: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        InjectError::ActivationFailed(error.into())
    }
}

impl Error for InjectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InjectError::ActivationFailed(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

fn fmt_cycle(cycle: &[String]) -> String {
    cycle.join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_match_literal_formats() {
        let error = InjectError::BadConfiguration {
            name: "a".to_owned(),
            field: ConfigField::Dependency,
        };
        assert_eq!("BadConfiguration:a.dependency", error.to_string());

        let error = InjectError::BadConfiguration {
            name: "b".to_owned(),
            field: ConfigField::Kind,
        };
        assert_eq!("BadConfiguration:b.kind", error.to_string());

        let error = InjectError::BadArgument {
            received: "42".to_owned(),
        };
        assert_eq!(
            "BadArgument: Expected string or object. Received: 42",
            error.to_string()
        );
    }

    #[test]
    fn cycle_is_printed_in_activation_order() {
        let error = InjectError::CycleDetected {
            name: "a".to_owned(),
            cycle: vec!["a".to_owned(), "b".to_owned(), "a".to_owned()],
        };
        assert_eq!("CircularDependency:a -> b -> a", error.to_string());
    }

    #[test]
    fn activation_failure_keeps_inner_error() {
        let error = InjectError::activation("disk on fire");
        assert_eq!("disk on fire", error.to_string());
        assert!(error.source().is_some());
    }

    #[test]
    fn downcast_leaves_pointer_intact() {
        let value: DynSvc = Svc::new(String::from("foo"));
        let typed = downcast::<String>(&value).unwrap();
        assert_eq!("foo", typed.as_str());
        assert!(downcast::<i32>(&value).is_none());
        assert!(downcast::<String>(&value).is_some());
    }
}
