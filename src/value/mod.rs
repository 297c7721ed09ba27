//! The inspectable value model.
//!
//! Everything the console displays is first converted into a [`Value`]
//! through the [`Inspect`] trait. A value is exactly one of the variants of
//! [`Kind`], decided by [`Value::kind`]. Composite values do not convert their
//! children eagerly: a child is usually held as a borrowed [`Entry::Borrowed`]
//! and only converted when the formatter actually descends into it. This
//! keeps inspection cost bounded by the render depth limits, and means a child
//! that a filter hides or omits is never converted at all.
//!
//! User types implement [`Inspect`] with an [`ObjectBuilder`]:
//!
//! ```
//! use webconsole::value::{Inspect, ObjectBuilder, Value};
//!
//! struct User {
//!     name: String,
//!     roles: Vec<&'static str>,
//! }
//!
//! impl Inspect for User {
//!     fn inspect(&self) -> Value<'_> {
//!         ObjectBuilder::new(self)
//!             .field("name", &self.name)
//!             .field("roles", &self.roles)
//!             .finish()
//!     }
//! }
//! ```

mod builder;
pub mod ids;
mod impls;

use alloc::{borrow::Cow, format, string::String};
use core::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

pub use self::{
    builder::ObjectBuilder,
    ids::{Identity, ObjectIds},
    impls::{InspectKey, Snapshot},
};

/// Conversion of a value into its inspectable representation.
pub trait Inspect {
    /// Converts `self` into a [`Value`], usually borrowing from `self`.
    fn inspect(&self) -> Value<'_>;

    /// The fully qualified type name shown in type columns.
    ///
    /// Used when the value itself is not converted, for instance when a
    /// filter omits it.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Optional custom rendering.
    ///
    /// When this returns `Some`, the HTML is emitted verbatim in place of the
    /// generic structural rendering.
    fn custom_html(&self) -> Option<String> {
        None
    }
}

/// An inspected value.
#[derive(Clone, Debug)]
pub enum Value<'a> {
    /// The absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer or floating-point number.
    Number(Number),
    /// A string. Escaped when rendered.
    Str(Cow<'a, str>),
    /// A function or closure. Never introspected; carries its type name.
    Callable(&'static str),
    /// A pre-rendered HTML fragment, emitted verbatim.
    Raw(Cow<'a, str>),
    /// A list, map or object.
    Composite(Composite<'a>),
}

/// The classification of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// [`Value::Null`].
    Null,
    /// [`Value::Bool`].
    Boolean,
    /// [`Value::Number`].
    Number,
    /// [`Value::Str`] and [`Value::Raw`].
    String,
    /// [`Value::Callable`].
    OpaqueCallable,
    /// A composite with an entry at index `0`, or an empty non-object
    /// composite.
    List,
    /// Any other composite, including every object.
    Map,
}

/// A number.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating-point number.
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::UInt(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

/// The key of a composite entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    /// A zero-based position.
    Index(usize),
    /// A map key or property name.
    Name(Cow<'a, str>),
}

impl Key<'_> {
    /// Returns the key as a name, if it is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Key<'_> {
    fn from(name: String) -> Self {
        Key::Name(Cow::Owned(name))
    }
}

/// A child of a [`Composite`].
#[derive(Clone)]
pub enum Entry<'a> {
    /// An already converted value.
    Value(Value<'a>),
    /// A value that is converted only when rendered.
    Borrowed(&'a dyn Inspect),
}

impl<'a> Entry<'a> {
    /// Converts the entry into a value.
    ///
    /// For a borrowed entry this runs [`Inspect::inspect`], or wraps its
    /// [`Inspect::custom_html`] in [`Value::Raw`].
    pub fn resolve(&self) -> Cow<'_, Value<'a>> {
        match self {
            Entry::Value(value) => Cow::Borrowed(value),
            Entry::Borrowed(inspect) => {
                let inspect: &'a dyn Inspect = *inspect;
                match inspect.custom_html() {
                    Some(html) => Cow::Owned(Value::Raw(Cow::Owned(html))),
                    None => Cow::Owned(inspect.inspect()),
                }
            }
        }
    }

    /// A type label for the entry that does not require converting it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Entry::Value(value) => value.base_type_name(),
            Entry::Borrowed(inspect) => inspect.type_name(),
        }
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Entry::Borrowed(inspect) => f.debug_tuple("Borrowed").field(&inspect.type_name()).finish(),
        }
    }
}

impl<'a> From<Value<'a>> for Entry<'a> {
    fn from(value: Value<'a>) -> Self {
        Entry::Value(value)
    }
}

impl<'a, T: Inspect> From<&'a T> for Entry<'a> {
    fn from(value: &'a T) -> Self {
        Entry::Borrowed(value)
    }
}

impl<'a> From<&'a dyn Inspect> for Entry<'a> {
    fn from(value: &'a dyn Inspect) -> Self {
        Entry::Borrowed(value)
    }
}

/// Metadata of a composite that was reduced from an object.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ObjectInfo {
    /// The object's fully qualified type name.
    pub type_name: &'static str,
    /// The object's identity, when known.
    pub identity: Option<Identity>,
    /// Whether the entries are a custom debug projection rather than the
    /// object's fields.
    pub projected: bool,
}

/// An ordered collection of keyed entries: a list, a map or an object's
/// properties.
#[derive(Clone, Debug, Default)]
pub struct Composite<'a> {
    entries: IndexMap<Key<'a>, Entry<'a>, FxBuildHasher>,
    object: Option<ObjectInfo>,
}

impl<'a> Composite<'a> {
    /// Creates an empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty composite describing an object.
    pub fn object(info: ObjectInfo) -> Self {
        Self {
            entries: IndexMap::default(),
            object: Some(info),
        }
    }

    /// Creates a list whose entries borrow the given items.
    pub fn list<T, I>(items: I) -> Self
    where
        T: Inspect + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut list = Self::new();
        for item in items {
            list.push(item);
        }
        list
    }

    /// Inserts an entry, replacing any entry with an equal key.
    pub fn insert(&mut self, key: impl Into<Key<'a>>, entry: impl Into<Entry<'a>>) {
        self.entries.insert(key.into(), entry.into());
    }

    /// Appends an entry keyed by the next index.
    pub fn push(&mut self, entry: impl Into<Entry<'a>>) {
        let index = self.entries.len();
        self.entries.insert(Key::Index(index), entry.into());
    }

    /// Looks up an entry.
    pub fn get(&self, key: &Key<'a>) -> Option<&Entry<'a>> {
        self.entries.get(key)
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key<'a>, &Entry<'a>)> {
        self.entries.iter()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The object metadata, if this composite describes an object.
    pub fn object_info(&self) -> Option<&ObjectInfo> {
        self.object.as_ref()
    }

    /// Classifies the composite as [`Kind::List`] or [`Kind::Map`].
    pub fn kind(&self) -> Kind {
        if self.object.is_some() {
            Kind::Map
        } else if self.entries.is_empty() || self.entries.contains_key(&Key::Index(0)) {
            Kind::List
        } else {
            Kind::Map
        }
    }

    pub(crate) fn kind_label(&self) -> String {
        match (&self.object, self.kind()) {
            (Some(info), _) => crate::util::short_type_name(info.type_name),
            (None, Kind::List) => format!("list({})", self.len()),
            (None, _) => format!("map({})", self.len()),
        }
    }
}

impl<'a> Value<'a> {
    /// Classifies the value. Every value has exactly one kind.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::Str(_) | Value::Raw(_) => Kind::String,
            Value::Callable(_) => Kind::OpaqueCallable,
            Value::Composite(composite) => composite.kind(),
        }
    }

    /// Creates a pre-rendered HTML value.
    pub fn raw(html: impl Into<Cow<'a, str>>) -> Self {
        Value::Raw(html.into())
    }

    /// Returns the composite, if this is one.
    pub fn as_composite(&self) -> Option<&Composite<'a>> {
        match self {
            Value::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub(crate) fn base_type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(Number::Int(_) | Number::UInt(_)) => "int",
            Value::Number(Number::Float(_)) => "float",
            Value::Str(_) => "string",
            Value::Callable(name) => *name,
            Value::Raw(_) => "",
            Value::Composite(composite) => match (composite.object, composite.kind()) {
                (Some(info), _) => info.type_name,
                (None, Kind::List) => "list",
                (None, _) => "map",
            },
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from!(
    () => |_v| Value::Null,
    bool => |v| Value::Bool(v),
    i32 => |v| Value::Number(Number::Int(i64::from(v))),
    i64 => |v| Value::Number(Number::Int(v)),
    u32 => |v| Value::Number(Number::UInt(u64::from(v))),
    u64 => |v| Value::Number(Number::UInt(v)),
    usize => |v| Value::Number(Number::UInt(v as u64)),
    f64 => |v| Value::Number(Number::Float(v)),
    String => |v| Value::Str(Cow::Owned(v)),
);

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(Cow::Borrowed(value))
    }
}

impl<'a> From<Composite<'a>> for Value<'a> {
    fn from(value: Composite<'a>) -> Self {
        Value::Composite(value)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::from(true).kind(), Kind::Boolean);
        assert_eq!(Value::from(1.5).kind(), Kind::Number);
        assert_eq!(Value::from("x").kind(), Kind::String);
        assert_eq!(Value::raw("<b>x</b>").kind(), Kind::String);
        assert_eq!(Value::Callable("fn()").kind(), Kind::OpaqueCallable);

        let list = vec![1, 2, 3];
        assert_eq!(list.inspect().kind(), Kind::List);

        let mut map = Composite::new();
        map.insert("a", Value::from(1));
        assert_eq!(Value::from(map).kind(), Kind::Map);

        let mut sparse = Composite::new();
        sparse.insert(1, Value::from(1));
        assert_eq!(Value::from(sparse).kind(), Kind::Map);

        let object = Composite::object(ObjectInfo {
            type_name: "app::Thing",
            identity: None,
            projected: false,
        });
        assert_eq!(Value::from(object).kind(), Kind::Map);
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = Composite::new();
        map.insert("a", Value::from(1));
        map.insert("b", Value::from(2));
        map.insert("a", Value::from(3));
        let keys: Vec<_> = map.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
        assert!(matches!(
            map.get(&Key::from("a")).map(|e| e.resolve().into_owned()),
            Some(Value::Number(Number::Int(3)))
        ));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(alloc::format!("{}", Number::Int(-4)), "-4");
        assert_eq!(alloc::format!("{}", Number::Float(2.5)), "2.5");
    }

    #[test]
    fn test_identity() {
        let a = 1u8;
        let b = 1u8;
        assert_eq!(Identity::of(&a), Identity::of(&a));
        assert_ne!(Identity::of(&a), Identity::of(&b));
    }
}
