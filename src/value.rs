//! The dynamic value model the encoder dispatches on.
//!
//! A [`Value`] is one of a closed set of shapes: scalars, timestamps,
//! sequences, maps, records, optional references and custom-encodable
//! values. Values are either built directly with the `From` impls and
//! constructors below, or produced from any `T: Serialize` by
//! [`to_value`](crate::to_value).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, TimeZone};

use crate::error::{BoxError, Error, Result};
use crate::map::Map;
use crate::values::UrlValues;

/// A value that writes its own query parameters.
///
/// Wrapped in a [`Value::Custom`], it takes priority over every generic
/// encoding rule: the encoder hands it the key of the current position and
/// the output collection and does nothing else.
///
/// ```
/// use serde_urlvalues::{EncodeValues, UrlValues, Value, BoxError};
///
/// struct Price(i64);
///
/// impl EncodeValues for Price {
///     fn encode_values(&self, key: &str, values: &mut UrlValues) -> Result<(), BoxError> {
///         if self.0 < 0 {
///             return Err(format!("invalid value: {}", self.0).into());
///         }
///         values.set(key, format!("${}", self.0));
///         Ok(())
///     }
/// }
///
/// let input = Value::map([("price", Value::custom(Price(10)))]);
/// let values = serde_urlvalues::marshal(&input).unwrap().unwrap();
/// assert_eq!(values.get("price"), Some("$10"));
///
/// let input = Value::map([("price", Value::custom(Price(-10)))]);
/// assert!(serde_urlvalues::marshal(&input).is_err());
/// ```
pub trait EncodeValues {
    /// Writes the encoding of `self` at `key` into `values`.
    fn encode_values(&self, key: &str, values: &mut UrlValues) -> Result<(), BoxError>;

    /// Whether the value counts as empty. Defaults to `false`.
    fn is_zero(&self) -> bool {
        false
    }
}

/// A shared handle to an [`EncodeValues`] implementation.
#[derive(Clone)]
pub struct CustomValue(Arc<dyn EncodeValues + Send + Sync>);

impl CustomValue {
    pub fn new<E>(encoder: E) -> Self
    where
        E: EncodeValues + Send + Sync + 'static,
    {
        CustomValue(Arc::new(encoder))
    }

    pub(crate) fn encode_values(&self, key: &str, values: &mut UrlValues) -> Result<()> {
        self.0
            .encode_values(key, values)
            .map_err(|source| Error::custom_encode(key, source))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValue(..)")
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A scalar map key.
#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Float32(f32),
    String(String),
}

impl Key {
    pub fn is_zero(&self) -> bool {
        match self {
            Key::Bool(b) => !b,
            Key::Int(i) => *i == 0,
            Key::Uint(u) => *u == 0,
            Key::Float(f) => *f == 0.0,
            Key::Float32(f) => *f == 0.0,
            Key::String(s) => s.is_empty(),
        }
    }

    /// Renders the key as a path segment: empty when the key is zero,
    /// otherwise its `Display` form.
    pub fn render(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{b}"),
            Key::Int(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Key::Uint(u) => f.write_str(itoa::Buffer::new().format(*u)),
            Key::Float(n) => write!(f, "{n}"),
            Key::Float32(n) => write!(f, "{n}"),
            Key::String(s) => f.write_str(s),
        }
    }
}

/// A structured record: named fields in declaration order.
///
/// Records are flattened by the [`record`](crate::record) encoder, which
/// has its own conventions independent of [`Config`](crate::Config).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(Cow<'static, str>, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Record {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Adds a field, builder style.
    pub fn field(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_ref(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A dynamically-shaped value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// No value at all.
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    /// An `f32`, kept at its own width so it prints with its own shortest
    /// digits.
    Float32(f32),
    String(String),
    Time(DateTime<FixedOffset>),
    /// An array or slice.
    Seq(Vec<Value>),
    /// A dynamically-keyed map, in source order.
    Map(Vec<(Key, Value)>),
    Record(Record),
    /// An optional reference; `None` is a nil reference.
    Ref(Option<Box<Value>>),
    Custom(CustomValue),
}

impl Value {
    /// Builds a [`Value::Map`] from key/value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a [`Value::Seq`] from elements.
    pub fn seq<I, V>(elements: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Seq(elements.into_iter().map(Into::into).collect())
    }

    pub fn custom<E>(encoder: E) -> Self
    where
        E: EncodeValues + Send + Sync + 'static,
    {
        Value::Custom(CustomValue::new(encoder))
    }

    /// A reference to `value`.
    pub fn some(value: impl Into<Value>) -> Self {
        Value::Ref(Some(Box::new(value.into())))
    }

    /// A nil reference.
    pub const fn none() -> Self {
        Value::Ref(None)
    }

    /// Name of the value's shape, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) | Value::Float32(_) => "float",
            Value::String(_) => "string",
            Value::Time(_) => "time",
            Value::Seq(_) => "seq",
            Value::Map(_) => "map",
            Value::Record(_) => "struct",
            Value::Ref(_) => "ptr",
            Value::Custom(_) => "custom",
        }
    }

    /// Whether the value counts as empty.
    ///
    /// Strings, sequences and maps are zero when they have no elements;
    /// booleans when false; numbers when equal to 0; `Null` and nil
    /// references always. A reference to a zero value is *not* zero. A
    /// timestamp is zero at the Unix epoch, which is chrono's
    /// `DateTime::default()`. A custom value reports its own zero-ness and a
    /// record is never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Uint(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Float32(f) => *f == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Seq(elements) => elements.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Ref(inner) => inner.is_none(),
            Value::Time(t) => t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0,
            Value::Custom(custom) => custom.is_zero(),
            Value::Record(_) => false,
        }
    }

    /// Follows references until reaching a value that is not one, or a nil
    /// reference, which is returned as-is.
    pub fn indirect(&self) -> &Value {
        let mut value = self;
        while let Value::Ref(Some(inner)) = value {
            value = inner;
        }
        value
    }

    /// Renders a scalar: empty when the value is zero, otherwise its
    /// `Display` form.
    pub(crate) fn render(&self) -> String {
        if self.is_zero() {
            return String::new();
        }
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => itoa::Buffer::new().format(*i).to_owned(),
            Value::Uint(u) => itoa::Buffer::new().format(*u).to_owned(),
            Value::Float(f) => f.to_string(),
            Value::Float32(f) => f.to_string(),
            Value::String(s) => s.clone(),
            _ => String::new(),
        }
    }
}

/// Maps each rendered key to its value, skipping `Null` entries.
///
/// Keys that render to the same string keep the last value.
pub(crate) fn string_keyed_view(entries: &[(Key, Value)]) -> Map<String, &Value> {
    let mut view = Map::new();
    for (key, value) in entries {
        if matches!(value, Value::Null) {
            continue;
        }
        view.insert(key.render(), value);
    }
    view
}

macro_rules! from_scalar {
    ($($variant:ident: $as:ty => $($ty:ty),*;)*) => {
        $($(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $as)
                }
            }

            impl From<$ty> for Key {
                fn from(v: $ty) -> Self {
                    Key::$variant(v as $as)
                }
            }
        )*)*
    };
}

from_scalar! {
    Int: i64 => i8, i16, i32, i64, isize;
    Uint: u64 => u8, u16, u32, u64, usize;
    Float: f64 => f64;
    Float32: f32 => f32;
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<bool> for Key {
    fn from(v: bool) -> Self {
        Key::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::String(v.to_string())
    }
}

impl From<char> for Key {
    fn from(v: char) -> Self {
        Key::String(v.to_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::String(v)
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(v: Cow<'_, str>) -> Self {
        Value::String(v.into_owned())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        let offset = v.offset().fix();
        Value::Time(v.with_timezone(&offset))
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl From<CustomValue> for Value {
    fn from(v: CustomValue) -> Self {
        Value::Custom(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Ref(v.map(|v| Box::new(v.into())))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::seq(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::seq(v)
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::seq(v.iter().cloned())
    }
}

impl<K: Into<Key>, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
    fn from(v: HashMap<K, V, S>) -> Self {
        Value::map(v)
    }
}

impl<K: Into<Key>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(v: BTreeMap<K, V>) -> Self {
        Value::map(v)
    }
}
