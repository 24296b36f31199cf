use crate::{Arguments, DynSvc};
use std::fmt::{Debug, Formatter};

/// Call-time options for [`Container::resolve_with()`](crate::Container::resolve_with).
///
/// ```
/// use named_injector::{arguments, Container, ResolveOptions};
///
/// let container = Container::new();
/// let mut message = None;
/// let value = container
///     .resolve_with(
///         "missing",
///         ResolveOptions::new()
///             .with_args(arguments!["ignored"])
///             .on_error(|error| message = Some(error.to_owned())),
///     )
///     .unwrap();
///
/// assert!(value.is_none());
/// assert_eq!(Some("DependencyNotFound:missing".to_owned()), message);
/// ```
#[derive(Default)]
pub struct ResolveOptions<'a> {
    pub(crate) args: Arguments,
    pub(crate) error: Option<Box<dyn FnMut(&str) + 'a>>,
    pub(crate) context: Option<DynSvc>,
}

impl<'a> ResolveOptions<'a> {
    /// Creates options that change nothing about a resolution.
    #[must_use]
    pub fn new() -> Self {
        ResolveOptions::default()
    }

    /// Arguments appended after the ones bound at registration.
    #[must_use]
    pub fn with_args(mut self, args: Arguments) -> Self {
        self.args = args;
        self
    }

    /// Called with the diagnostic message when the dependency is not
    /// registered.
    #[must_use]
    pub fn on_error(mut self, handler: impl FnMut(&str) + 'a) -> Self {
        self.error = Some(Box::new(handler));
        self
    }

    /// Context handed to a factory, taking precedence over the one it was
    /// registered with.
    #[must_use]
    pub fn with_context(mut self, context: DynSvc) -> Self {
        self.context = Some(context);
        self
    }

    pub(crate) fn report_missing(&mut self, message: &str) {
        if let Some(handler) = self.error.as_mut() {
            handler(message);
        }
    }
}

impl Debug for ResolveOptions<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("args", &self.args)
            .field("error", &self.error.is_some())
            .field("context", &self.context.is_some())
            .finish()
    }
}
