use crate::{
    Arguments, Container, DynSvc, InjectError, InjectResult, Object,
    Property, Svc,
};
use std::fmt::{Debug, Formatter};

/// Maps property names of an object-shaped argument to the dependencies
/// that fill them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeMap {
    properties: Vec<(String, String)>,
}

impl ShapeMap {
    #[must_use]
    pub fn new() -> Self {
        ShapeMap::default()
    }

    /// Maps a property to a dependency, replacing an earlier mapping of the
    /// same property.
    #[must_use]
    pub fn with(
        mut self,
        property: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        let property = property.into();
        let dependency = dependency.into();
        match self
            .properties
            .iter_mut()
            .find(|(existing, _)| *existing == property)
        {
            Some((_, slot)) => *slot = dependency,
            None => self.properties.push((property, dependency)),
        }
        self
    }

    /// Iterates over `(property, dependency)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(property, dependency)| (property.as_str(), dependency.as_str()))
    }
}

impl<P, D, const N: usize> From<[(P, D); N]> for ShapeMap
where
    P: Into<String>,
    D: Into<String>,
{
    fn from(pairs: [(P, D); N]) -> Self {
        pairs
            .into_iter()
            .fold(ShapeMap::new(), |shape, (property, dependency)| {
                shape.with(property, dependency)
            })
    }
}

/// Declares how one argument position of an injected function is filled.
///
/// Specifications are usually written as plain values and converted: a
/// string names a dependency, a [`ShapeMap`] or an array of pairs describes
/// an object, and "empty" values (`None`, `""`, `false`, `0`, `()`) pass the
/// caller's argument through. Values that fit none of these are kept as
/// [`ArgSpec::Unsupported`] and rejected when the function is called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgSpec {
    /// Use the caller's argument at this position, if any.
    Passthrough,

    /// Use the caller's argument at this position if one was supplied,
    /// otherwise resolve this dependency.
    Name(String),

    /// Start from the caller's object at this position, or an empty one,
    /// and fill every property it doesn't have from its dependency.
    Shape(ShapeMap),

    /// A specification that is neither a name nor a shape. Calling the
    /// function fails with [`InjectError::BadArgument`].
    Unsupported(String),
}

impl ArgSpec {
    /// Creates an object-shaped specification.
    pub fn shape(shape: impl Into<ShapeMap>) -> Self {
        ArgSpec::Shape(shape.into())
    }
}

impl From<&str> for ArgSpec {
    fn from(name: &str) -> Self {
        ArgSpec::from(name.to_owned())
    }
}

impl From<String> for ArgSpec {
    fn from(name: String) -> Self {
        if name.is_empty() {
            ArgSpec::Passthrough
        } else {
            ArgSpec::Name(name)
        }
    }
}

impl From<ShapeMap> for ArgSpec {
    fn from(shape: ShapeMap) -> Self {
        ArgSpec::Shape(shape)
    }
}

impl<P, D, const N: usize> From<[(P, D); N]> for ArgSpec
where
    P: Into<String>,
    D: Into<String>,
{
    fn from(pairs: [(P, D); N]) -> Self {
        ArgSpec::Shape(ShapeMap::from(pairs))
    }
}

impl<T: Into<ArgSpec>> From<Option<T>> for ArgSpec {
    fn from(spec: Option<T>) -> Self {
        spec.map_or(ArgSpec::Passthrough, Into::into)
    }
}

impl From<()> for ArgSpec {
    fn from((): ()) -> Self {
        ArgSpec::Passthrough
    }
}

impl From<bool> for ArgSpec {
    fn from(value: bool) -> Self {
        if value {
            ArgSpec::Unsupported(value.to_string())
        } else {
            ArgSpec::Passthrough
        }
    }
}

macro_rules! impl_numeric_spec {
    ($($type_name:ty),* $(,)?) => {
        $(
            impl From<$type_name> for ArgSpec {
                #[allow(clippy::float_cmp)]
                fn from(value: $type_name) -> Self {
                    #[allow(clippy::eq_op)]
                    let is_nan = value != value;
                    if value == (0 as $type_name) || is_nan {
                        ArgSpec::Passthrough
                    } else {
                        ArgSpec::Unsupported(value.to_string())
                    }
                }
            }
        )*
    };
}

impl_numeric_spec!(i32, i64, u32, u64, usize, f64);

macro_rules! is_zero {
    ($value:expr; $($type_name:ty),* $(,)?) => {
        $(if let Some(value) = $value.downcast_ref::<$type_name>() {
            return Some(*value == (0 as $type_name) || *value != *value);
        })*
    };
}

/// Whether a supplied argument counts as given. Empty strings, `false`,
/// zero, `NaN` and `()` do not.
fn is_truthy(value: &DynSvc) -> bool {
    if let Some(value) = value.downcast_ref::<&'static str>() {
        return !value.is_empty();
    }
    if let Some(value) = value.downcast_ref::<String>() {
        return !value.is_empty();
    }
    if let Some(value) = value.downcast_ref::<bool>() {
        return *value;
    }
    if value.is::<()>() {
        return false;
    }

    is_falsy_number(value).map_or(true, |falsy| !falsy)
}

#[allow(clippy::float_cmp, clippy::eq_op)]
fn is_falsy_number(value: &DynSvc) -> Option<bool> {
    is_zero!(value; i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
    None
}

/// A function whose arguments are filled from a container when it is
/// called. Created by [`Container::args()`].
#[derive(Clone)]
pub struct InjectedFn<F> {
    container: Container,
    specs: Vec<ArgSpec>,
    func: F,
}

impl<F> InjectedFn<F> {
    /// The specification of each declared position.
    #[must_use]
    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    /// Calls the function.
    ///
    /// Each position up to the larger of the declared and supplied counts is
    /// filled according to its specification; positions past the declared
    /// ones pass the caller's argument through. Arguments supplied by the
    /// caller always win over injected ones.
    pub fn call<R>(&self, supplied: Arguments) -> InjectResult<R>
    where
        F: Fn(Arguments) -> R,
    {
        let count = self.specs.len().max(supplied.len());
        let mut resolved = Arguments::new();
        for index in 0..count {
            let given = supplied.get_dyn(index).cloned();
            let value = match self.specs.get(index) {
                None | Some(ArgSpec::Passthrough) => given,
                Some(ArgSpec::Name(name)) => match given.filter(is_truthy) {
                    Some(value) => Some(value),
                    None => self.container.resolve(name)?,
                },
                Some(ArgSpec::Shape(shape)) => {
                    Some(self.fill_shape(given, shape)?)
                }
                Some(ArgSpec::Unsupported(received)) => {
                    return Err(InjectError::BadArgument {
                        received: received.clone(),
                    })
                }
            };
            resolved.push_dyn(value);
        }

        Ok((self.func)(resolved))
    }

    fn fill_shape(
        &self,
        given: Option<DynSvc>,
        shape: &ShapeMap,
    ) -> InjectResult<DynSvc> {
        let mut object = match given.filter(is_truthy) {
            None => Object::new(),
            Some(value) => {
                let object = value.downcast_ref::<Object>().cloned();
                match object {
                    Some(object) => object,
                    // Only objects can receive properties.
                    None => return Ok(value),
                }
            }
        };

        for (property, dependency) in shape.iter() {
            if !object.contains_key(property) {
                let value = self.container.resolve(dependency)?;
                object.insert(property, Property::Resolved(value));
            }
        }

        let object: DynSvc = Svc::new(object);
        Ok(object)
    }
}

impl<F> Debug for InjectedFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectedFn")
            .field("specs", &self.specs)
            .finish_non_exhaustive()
    }
}

impl Container {
    /// Wraps a function so that its arguments are injected when it is
    /// called.
    ///
    /// ```
    /// use named_injector::{arguments, ArgSpec, Arguments, Container};
    ///
    /// let container = Container::new();
    /// container.register_singleton("foo", "fooVal");
    /// container.register_singleton("bar", "barVal");
    ///
    /// let func = container.args(vec!["foo".into(), "bar".into()], |args: Arguments| {
    ///     (
    ///         args.get_cloned::<&'static str>(0),
    ///         args.get_cloned::<&'static str>(1),
    ///     )
    /// });
    ///
    /// let (first, second) = func.call(arguments!["baz"]).unwrap();
    /// assert_eq!(Some("baz"), first);
    /// assert_eq!(Some("barVal"), second);
    /// ```
    pub fn args<F>(&self, specs: Vec<ArgSpec>, func: F) -> InjectedFn<F> {
        InjectedFn {
            container: self.clone(),
            specs,
            func,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments;

    #[test]
    fn falsy_specs_pass_through() {
        assert_eq!(ArgSpec::Passthrough, ArgSpec::from(""));
        assert_eq!(ArgSpec::Passthrough, ArgSpec::from(None::<&str>));
        assert_eq!(ArgSpec::Passthrough, ArgSpec::from(false));
        assert_eq!(ArgSpec::Passthrough, ArgSpec::from(0i32));
        assert_eq!(ArgSpec::Passthrough, ArgSpec::from(f64::NAN));
        assert_eq!(ArgSpec::Passthrough, ArgSpec::from(()));
    }

    #[test]
    fn other_scalars_are_unsupported() {
        assert_eq!(
            ArgSpec::Unsupported("42".to_owned()),
            ArgSpec::from(42i64)
        );
        assert_eq!(
            ArgSpec::Unsupported("true".to_owned()),
            ArgSpec::from(true)
        );
    }

    #[test]
    fn unsupported_spec_fails_only_when_called() {
        let container = Container::new();
        let func = container.args(vec![42i32.into()], |args: Arguments| args.len());

        match func.call(Arguments::new()) {
            Err(error @ InjectError::BadArgument { .. }) => assert_eq!(
                "BadArgument: Expected string or object. Received: 42",
                error.to_string()
            ),
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("an unsupported spec was accepted"),
        }
    }

    #[test]
    fn extra_arguments_pass_through() {
        let container = Container::new();
        let func = container.args(vec!["missing".into()], |args: Arguments| args);

        let args = func.call(arguments!["a", "b", "c"]).unwrap();
        assert_eq!(3, args.len());
        assert_eq!(Some("c"), args.get_cloned::<&'static str>(2));
    }

    #[test]
    fn missing_positions_stay_empty() {
        let container = Container::new();
        let func = container.args(
            vec![ArgSpec::Passthrough, "missing".into()],
            |args: Arguments| args,
        );

        let args = func.call(Arguments::new()).unwrap();
        assert_eq!(2, args.len());
        assert!(!args.is_supplied(0));
        assert!(!args.is_supplied(1));
    }

    #[test]
    fn falsy_arguments_fall_back_to_resolution() {
        let container = Container::new();
        container.register_singleton("foo", "fooVal");
        let func = container.args(
            vec!["foo".into(), "foo".into(), "foo".into(), "foo".into()],
            |args: Arguments| args,
        );

        let args = func
            .call(arguments!["", 0i32, false, ()])
            .unwrap();
        for index in 0..4 {
            assert_eq!(Some("fooVal"), args.get_cloned::<&'static str>(index));
        }

        let args = func.call(arguments!["bar", 1i32]).unwrap();
        assert_eq!(Some("bar"), args.get_cloned::<&'static str>(0));
        assert_eq!(Some(1), args.get_cloned::<i32>(1));
    }

    #[test]
    fn falsy_argument_is_replaced_by_fresh_object() {
        let container = Container::new();
        container.register_singleton("foo", "fooVal");
        let func = container
            .args(vec![ArgSpec::shape([("arg1", "foo")])], |args: Arguments| {
                args
            });

        let args = func.call(arguments![String::new()]).unwrap();
        let object = args.get::<Object>(0).unwrap();
        assert_eq!(Some("fooVal"), object.get_cloned::<&'static str>("arg1"));
    }

    #[test]
    fn non_object_argument_is_not_reshaped() {
        let container = Container::new();
        container.register_singleton("foo", "foo");
        let func = container
            .args(vec![ArgSpec::shape([("arg1", "foo")])], |args: Arguments| {
                args
            });

        let args = func.call(arguments![7u8]).unwrap();
        assert_eq!(Some(7), args.get_cloned::<u8>(0));
    }

    #[test]
    fn shape_fills_missing_properties_with_absent_values() {
        let container = Container::new();
        let func = container
            .args(vec![ArgSpec::shape([("arg1", "missing")])], |args: Arguments| {
                args
            });

        let args = func.call(Arguments::new()).unwrap();
        let object = args.get::<Object>(0).unwrap();
        assert!(object.contains_key("arg1"));
        assert!(object.get_dyn("arg1").is_none());
    }
}
