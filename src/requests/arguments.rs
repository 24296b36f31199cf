use crate::{downcast, DynSvc, Service, Svc};
use std::{
    fmt::{Debug, Formatter},
    slice::Iter,
};

/// An ordered list of arguments passed to a constructor, a factory or an
/// injected function. A position can be left empty, which is how an absent
/// argument is represented.
///
/// Use [`arguments!`](crate::arguments!) to build one inline.
#[derive(Clone, Default)]
pub struct Arguments {
    values: Vec<Option<DynSvc>>,
}

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Arguments::default()
    }

    /// Appends a value, returning the list for chaining.
    #[must_use]
    pub fn with<T: Service>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// Appends an already shared value, or an empty position.
    #[must_use]
    pub fn with_dyn(mut self, value: Option<DynSvc>) -> Self {
        self.values.push(value);
        self
    }

    /// Appends a value.
    pub fn push<T: Service>(&mut self, value: T) {
        let value: DynSvc = Svc::new(value);
        self.values.push(Some(value));
    }

    /// Appends an already shared value, or an empty position.
    pub fn push_dyn(&mut self, value: Option<DynSvc>) {
        self.values.push(value);
    }

    /// Appends every position of another list after the positions of this
    /// one.
    pub fn append(&mut self, other: Arguments) {
        self.values.extend(other.values);
    }

    /// Gets the value at a position, if one was supplied.
    #[must_use]
    pub fn get_dyn(&self, index: usize) -> Option<&DynSvc> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Gets the value at a position as a pointer to a concrete type.
    #[must_use]
    pub fn get<T: Service>(&self, index: usize) -> Option<Svc<T>> {
        self.get_dyn(index).and_then(downcast)
    }

    /// Gets a copy of the value at a position.
    #[must_use]
    pub fn get_cloned<T: Service + Clone>(&self, index: usize) -> Option<T> {
        self.get_dyn(index)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Whether a value was supplied at a position.
    #[must_use]
    pub fn is_supplied(&self, index: usize) -> bool {
        self.get_dyn(index).is_some()
    }

    /// The number of positions, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no positions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over every position.
    pub fn iter(&self) -> Iter<'_, Option<DynSvc>> {
        self.values.iter()
    }
}

impl Debug for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.values.iter().map(|value| {
                if value.is_some() {
                    "<value>"
                } else {
                    "<absent>"
                }
            }))
            .finish()
    }
}

impl Extend<Option<DynSvc>> for Arguments {
    fn extend<I: IntoIterator<Item = Option<DynSvc>>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl FromIterator<Option<DynSvc>> for Arguments {
    fn from_iter<I: IntoIterator<Item = Option<DynSvc>>>(iter: I) -> Self {
        Arguments {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Arguments {
    type Item = Option<DynSvc>;
    type IntoIter = std::vec::IntoIter<Option<DynSvc>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Option<DynSvc>;
    type IntoIter = Iter<'a, Option<DynSvc>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Builds an [`Arguments`] list from a sequence of values.
///
/// ```
/// use named_injector::arguments;
///
/// let args = arguments!["foo", 12i32];
/// assert_eq!(2, args.len());
/// assert_eq!(Some("foo"), args.get_cloned::<&'static str>(0));
/// assert_eq!(Some(12), args.get_cloned::<i32>(1));
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        $crate::Arguments::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Arguments::new()$(.with($value))+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_order() {
        let mut bound = arguments!["foo"];
        bound.append(arguments!["bar", "baz"]);

        let values: Vec<_> = (0..bound.len())
            .map(|index| bound.get_cloned::<&'static str>(index))
            .collect();
        assert_eq!(vec![Some("foo"), Some("bar"), Some("baz")], values);
    }

    #[test]
    fn empty_positions_count_towards_length() {
        let args = Arguments::new().with_dyn(None).with(1u8);
        assert_eq!(2, args.len());
        assert!(!args.is_supplied(0));
        assert!(args.is_supplied(1));
        assert!(args.get::<u8>(5).is_none());
    }

    #[test]
    fn get_requires_matching_type() {
        let args = arguments![String::from("foo")];
        assert!(args.get::<&'static str>(0).is_none());
        assert_eq!("foo", args.get::<String>(0).unwrap().as_str());
    }
}
