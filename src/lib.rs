//! # Name-keyed dependency injection.
//!
//! A [`Container`] maps names to providers and turns names back into values
//! on request. There are three kinds of providers:
//!
//! - **[Class](crate::Class):** A type that is constructed anew on every
//!   resolution, from the arguments bound at registration followed by the
//!   arguments passed to the resolution.
//! - **Factory:** A function that is invoked on every resolution with those
//!   same arguments and an optional context.
//! - **Singleton:** A ready-made value that is handed out as is, every time.
//!
//! Registering a name again replaces whatever was registered before.
//!
//! By default, values are held in [`Rc<T>`](std::rc::Rc) pointers and the
//! container is not thread-safe. This can be changed to
//! [`Arc<T>`](std::sync::Arc) by disabling default features and enabling the
//! "arc" feature:
//!
//! ```text
//! [dependencies.named_injector]
//! version = "*"
//! default-features = false
//! features = ["arc"]
//! ```
//!
//! ## Property injection
//!
//! Values produced by classes and factories implement [`Injectable`], which
//! lists their [`Property`] slots. A slot can hold a [`Dependency`], a lazy
//! reference created with [`Container::property()`]. Right after a value is
//! produced, every such slot is replaced with what its dependency resolves
//! to. Since the lookup happens only then, a dependency may be declared
//! before its target is registered.
//!
//! ## Argument injection
//!
//! [`Container::args()`] wraps a function with a specification for each
//! argument position. When the wrapped function is called, positions the
//! caller left empty are resolved by name, and object-shaped positions have
//! their missing properties filled in. See [`ArgSpec`].
//!
//! ## Missing dependencies
//!
//! Resolving a name that isn't registered is not an error. A warning
//! containing `DependencyNotFound:<name>` is logged through [`tracing`], an
//! optional handler is called with the same message, and `Ok(None)` is
//! returned.
//!
//! ## Example
//!
//! ```
//! use named_injector::{
//!     arguments, Arguments, Class, Container, InjectResult, Injectable, Property,
//! };
//!
//! // A repository that needs a connection string
//! struct Repository {
//!     url: String,
//! }
//!
//! impl Injectable for Repository {}
//!
//! impl Class for Repository {
//!     fn construct(_container: &Container, args: Arguments) -> InjectResult<Self> {
//!         Ok(Repository {
//!             url: args.get_cloned::<&'static str>(0).unwrap_or_default().to_owned(),
//!         })
//!     }
//! }
//!
//! // A service that receives its repository through a property
//! struct UserService {
//!     repository: Property,
//! }
//!
//! impl Injectable for UserService {
//!     fn properties(&mut self) -> Vec<(&str, &mut Property)> {
//!         vec![("repository", &mut self.repository)]
//!     }
//! }
//!
//! impl Class for UserService {
//!     fn construct(container: &Container, _args: Arguments) -> InjectResult<Self> {
//!         Ok(UserService {
//!             repository: container.property("repository").into(),
//!         })
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_class::<UserService>("users");
//! container.register_class_with::<Repository>("repository", arguments!["postgres://db"]);
//!
//! let users = container.resolve_as::<UserService>("users").unwrap().unwrap();
//! let repository = users.repository.get::<Repository>().unwrap();
//! assert_eq!("postgres://db", repository.url);
//! ```

#![forbid(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]

#[cfg(not(any(feature = "arc", feature = "rc")))]
compile_error!(
    "Either the 'arc' or 'rc' feature must be enabled (but not both)."
);

#[cfg(all(feature = "arc", feature = "rc"))]
compile_error!(
    "The 'arc' and 'rc' features are mutually exclusive and cannot be enabled together."
);

mod binder;
mod container;
mod manifest;
mod registry;
mod requests;
mod services;

pub use binder::*;
pub use container::*;
pub use manifest::*;
pub use registry::*;
pub use requests::*;
pub use services::*;
