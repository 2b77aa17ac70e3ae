//! Dynamic argument values.
//!
//! A call's arguments reach the engine as a slice of [`Value`]s ordered like
//! the method signature the [`CallMetadata`](crate::CallMetadata) was built
//! from.
//!
//! Structural aggregates are carried as [`Record`]s. Their field order is
//! declared ahead of time through the [`Aggregate`] trait (usually derived
//! with `#[derive(Aggregate)]`), and the metadata builder records that order
//! as a [`FieldOrder`] next to the expanded position. Expansion then yields
//! field values in exactly that order, so derived positions always line up
//! with the names bound to them.

use std::borrow::Cow;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// Ordered sequence (iterables and arrays).
    List(Vec<Value>),
    /// Name to value mapping, in insertion order.
    Map(Vec<(String, Value)>),
    /// Structural aggregate.
    Record(Record),
    /// Named cookie.
    Cookie(Cookie),
}

impl Value {
    /// Build a [`Value::List`] from anything convertible.
    pub fn list<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a [`Value::Map`] from key/value pairs.
    pub fn map<K: Into<String>, V: Into<Self>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Build a [`Value::Record`] from an [`Aggregate`].
    pub fn record<T: Aggregate>(value: T) -> Self {
        Self::Record(Record::from_aggregate(value))
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string slice, if this is a [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// A short name of the value's kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Cookie(_) => "cookie",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::Cookie(cookie) => write!(f, "{cookie}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
            Self::Record(record) => write!(f, "{record}"),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Cookie(cookie) => serializer.collect_str(cookie),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.fields.len()))?;
                for (name, value) in &record.fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::list(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Cookie> for Value {
    fn from(value: Cookie) -> Self {
        Self::Cookie(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or_else(|| Self::Str(n.to_string())),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => Self::list(items),
            serde_json::Value::Object(entries) => Self::map(entries),
        }
    }
}

// ============================================================================
// Structural aggregates
// ============================================================================

/// A type whose values decompose into a fixed, ordered set of fields.
///
/// Derive it with `#[derive(Aggregate)]`.
pub trait Aggregate {
    /// Type name, kept on the produced [`Record`].
    const TYPE_NAME: &'static str;

    /// Field names in declaration order.
    const FIELDS: &'static [&'static str];

    /// Field values, in the order of [`Aggregate::FIELDS`].
    fn into_values(self) -> Vec<Value>;
}

/// A structural aggregate value: a type name and named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: Cow<'static, str>,
    fields: Vec<(Cow<'static, str>, Value)>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Build a record from an [`Aggregate`].
    pub fn from_aggregate<T: Aggregate>(value: T) -> Self {
        Self {
            type_name: Cow::Borrowed(T::TYPE_NAME),
            fields: T::FIELDS
                .iter()
                .map(|name| Cow::Borrowed(*name))
                .zip(value.into_values())
                .collect(),
        }
    }

    /// Type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Fields in the order they were declared.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (&**name, value))
    }

    /// Field values in the order given by `order`.
    ///
    /// A field named by `order` but absent from the record yields
    /// [`Value::Null`], so the result always has `order.len()` values.
    #[must_use]
    pub fn values_in(&self, order: &FieldOrder) -> Vec<Value> {
        order
            .iter()
            .map(|name| self.get(name).cloned().unwrap_or_default())
            .collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

/// Field-order descriptor of an expanded aggregate argument.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldOrder(Vec<Cow<'static, str>>);

impl FieldOrder {
    /// Field order from explicit names.
    pub fn new<S: Into<Cow<'static, str>>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// Declared field order of an [`Aggregate`].
    #[must_use]
    pub fn of<T: Aggregate>() -> Self {
        Self(T::FIELDS.iter().map(|name| Cow::Borrowed(*name)).collect())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|name| &**name)
    }
}

// ============================================================================
// Cookie
// ============================================================================

/// A named cookie argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cookie {
    name: String,
    value: String,
}

impl Cookie {
    /// Create a cookie.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
