//! Runtime value model read from example entities.
//!
//! The compiler never inspects concrete field types; entities hand their
//! current field values over as [`Value`]s, and literal leaves are carried
//! as [`Scalar`]s all the way into the emitted predicates.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use uuid::Uuid;

use crate::entity::Entity;

/// A literal leaf value: anything compared directly as a column value.
///
/// # Examples
///
/// ```rust
/// use exemplar_schema::Scalar;
///
/// let val: Scalar = 42.into();
/// assert!(matches!(val, Scalar::Int(42)));
///
/// let val: Scalar = "hello".into();
/// assert!(matches!(val, Scalar::Text(_)));
///
/// let val: Scalar = true.into();
/// assert!(matches!(val, Scalar::Bool(true)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Boolean value
    Bool(bool),
    /// Integer value (all integer widths widen to `i64`)
    Int(i64),
    /// 32-bit floating point value
    Float(f32),
    /// 64-bit floating point value
    Double(f64),
    /// Arbitrary-precision decimal value
    Decimal(Decimal),
    /// Single character
    Char(char),
    /// String value
    Text(String),
    /// Calendar date
    Date(NaiveDate),
    /// Point in time (UTC)
    DateTime(DateTime<Utc>),
    /// UUID value
    Uuid(Uuid),
    /// Enum constant, identified by name
    Enum(SmolStr),
}

impl Scalar {
    /// Create an enum-constant scalar from its declared name.
    pub fn enumeration(name: impl Into<SmolStr>) -> Self {
        Scalar::Enum(name.into())
    }

    /// Returns `true` if this scalar kind participates in ordered
    /// comparisons (`<`, `<=`, `>`, `>=`).
    ///
    /// Enum constants carry no declared order here, so ordering operators
    /// against them are skipped by the compiler.
    pub fn supports_ordering(&self) -> bool {
        !matches!(self, Scalar::Enum(_))
    }

    /// Same-kind ordered comparison. Returns `None` for mismatched kinds,
    /// enum constants, and NaN floats.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
            (Scalar::Double(a), Scalar::Double(b)) => a.partial_cmp(b),
            (Scalar::Decimal(a), Scalar::Decimal(b)) => Some(a.cmp(b)),
            (Scalar::Char(a), Scalar::Char(b)) => Some(a.cmp(b)),
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            (Scalar::Date(a), Scalar::Date(b)) => Some(a.cmp(b)),
            (Scalar::DateTime(a), Scalar::DateTime(b)) => Some(a.cmp(b)),
            (Scalar::Uuid(a), Scalar::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns the string content if this is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Trace rendering: strings are single-quoted, everything else is bare.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Double(v) => write!(f, "{v}"),
            Scalar::Decimal(v) => write!(f, "{v}"),
            Scalar::Char(v) => write!(f, "{v}"),
            Scalar::Text(v) => write!(f, "'{v}'"),
            Scalar::Date(v) => write!(f, "{v}"),
            Scalar::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Scalar::Uuid(v) => write!(f, "{v}"),
            Scalar::Enum(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i8> for Scalar {
    fn from(v: i8) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<i16> for Scalar {
    fn from(v: i16) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<u8> for Scalar {
    fn from(v: u8) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u16> for Scalar {
    fn from(v: u16) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Double(v)
    }
}

impl From<Decimal> for Scalar {
    fn from(v: Decimal) -> Self {
        Scalar::Decimal(v)
    }
}

impl From<char> for Scalar {
    fn from(v: char) -> Self {
        Scalar::Char(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(v: NaiveDate) -> Self {
        Scalar::Date(v)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(v: DateTime<Utc>) -> Self {
        Scalar::DateTime(v)
    }
}

impl From<Uuid> for Scalar {
    fn from(v: Uuid) -> Self {
        Scalar::Uuid(v)
    }
}

/// The current value of one entity field, borrowed from the example graph.
///
/// `Null` stands for "no value set"; it is what optional fields report when
/// unpopulated, and what [`Entity::field`] returns for undeclared names.
pub enum Value<'a> {
    /// No current value
    Null,
    /// A literal leaf value
    Scalar(Scalar),
    /// A nested entity to be recursed into
    Entity(&'a dyn Entity),
    /// A collection of values (scalars or entities)
    Collection(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    /// Wrap a literal leaf value.
    pub fn scalar(value: impl Into<Scalar>) -> Value<'a> {
        Value::Scalar(value.into())
    }

    /// Wrap a nested entity reference.
    pub fn entity<E: Entity>(entity: &'a E) -> Value<'a> {
        Value::Entity(entity)
    }

    /// Wrap an optional nested entity reference.
    pub fn entity_opt<E: Entity>(entity: Option<&'a E>) -> Value<'a> {
        entity.map_or(Value::Null, |e| Value::Entity(e))
    }

    /// Collect leaf values into a collection value.
    pub fn scalars<I, T>(items: I) -> Value<'a>
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        Value::Collection(items.into_iter().map(|v| Value::Scalar(v.into())).collect())
    }

    /// Collect entity references into a collection value.
    pub fn entities<I, E>(items: I) -> Value<'a>
    where
        I: IntoIterator<Item = &'a E>,
        E: Entity + 'a,
    {
        Value::Collection(items.into_iter().map(|e| Value::Entity(e as &dyn Entity)).collect())
    }

    /// Returns `true` if no value is set.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the scalar if this is a leaf value.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Value::Entity(e) => f.debug_tuple("Entity").field(&e.entity_name()).finish(),
            Value::Collection(items) => f.debug_tuple("Collection").field(items).finish(),
        }
    }
}

impl<'a> From<Scalar> for Value<'a> {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl<'a, T: Into<Scalar>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, |v| Value::Scalar(v.into()))
    }
}
