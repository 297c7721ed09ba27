use alloc::borrow::Cow;

use super::{Composite, Entry, Identity, Inspect, Key, ObjectInfo, Value};

/// Builds the inspectable representation of a struct, in the spirit of
/// [`core::fmt::DebugStruct`].
///
/// Fields are borrowed and only converted when the console descends into
/// them.
#[derive(Debug)]
#[must_use = "call `finish` to obtain the value"]
pub struct ObjectBuilder<'a> {
    composite: Composite<'a>,
}

impl<'a> ObjectBuilder<'a> {
    /// Starts describing `object`, recording its type and identity.
    pub fn new<T: ?Sized + 'static>(object: &T) -> Self {
        Self {
            composite: Composite::object(ObjectInfo {
                type_name: core::any::type_name::<T>(),
                identity: Some(Identity::of(object)),
                projected: false,
            }),
        }
    }

    /// Starts describing an object known only by its type name.
    ///
    /// Such objects get no identity number.
    pub fn anonymous(type_name: &'static str) -> Self {
        Self {
            composite: Composite::object(ObjectInfo {
                type_name,
                identity: None,
                projected: false,
            }),
        }
    }

    /// Marks the fields as a custom debug projection rather than the real
    /// fields. An empty projection renders as `(empty)`.
    pub fn projection(mut self) -> Self {
        if let Some(info) = self.composite.object.as_mut() {
            info.projected = true;
        }
        self
    }

    /// Adds a borrowed field.
    pub fn field(mut self, name: impl Into<Cow<'a, str>>, value: &'a dyn Inspect) -> Self {
        self.composite
            .insert(Key::Name(name.into()), Entry::Borrowed(value));
        self
    }

    /// Adds a field from an already converted value.
    pub fn field_value(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Value<'a>>) -> Self {
        self.composite
            .insert(Key::Name(name.into()), Entry::Value(value.into()));
        self
    }

    /// Adds a field rendered as a fixed `(callable)` placeholder.
    pub fn callable_field(mut self, name: impl Into<Cow<'a, str>>, type_name: &'static str) -> Self {
        self.composite
            .insert(Key::Name(name.into()), Entry::Value(Value::Callable(type_name)));
        self
    }

    /// Finishes the object.
    pub fn finish(self) -> Value<'a> {
        Value::Composite(self.composite)
    }
}
