//! Abstract values for three-valued evaluation.
//!
//! A [`HeapItem`] is either known (it carries a concrete [`Value`]) or unknown (it only
//! carries its declared type). Operations on unknown operands produce unknown results,
//! so "unknown" flows through execution as ordinary data rather than as an error.
//!
//! Type tags use Java source names (`int`, `long`, `java.lang.String`). The constants in
//! [`types`] cover the primitive tags the built-in opcode families produce.

use std::{borrow::Cow, fmt, sync::Arc};

/// Primitive type tags.
pub mod types {
    /// 32-bit integer.
    pub const INT: &str = "int";
    /// 64-bit integer.
    pub const LONG: &str = "long";
    /// 32-bit IEEE float.
    pub const FLOAT: &str = "float";
    /// 64-bit IEEE float.
    pub const DOUBLE: &str = "double";
    /// Boolean.
    pub const BOOLEAN: &str = "boolean";
    /// Strings.
    pub const STRING: &str = "java.lang.String";
    /// Any reference, used for `null`.
    pub const OBJECT: &str = "java.lang.Object";
}

/// A concrete value.
///
/// Two values have the same representation iff they are the same variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// 32-bit signed integer, also used for `byte`, `short` and `char`.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// The null reference.
    Null,
    /// A string constant.
    String(Arc<str>),
}

impl Value {
    /// Short name of the representation, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Long(_) => "Long",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Boolean(_) => "Boolean",
            Value::Null => "Null",
            Value::String(_) => "String",
        }
    }

    /// The type tag a value of this representation gets when none is given.
    #[must_use]
    pub const fn default_type(&self) -> &'static str {
        match self {
            Value::Int(_) => types::INT,
            Value::Long(_) => types::LONG,
            Value::Float(_) => types::FLOAT,
            Value::Double(_) => types::DOUBLE,
            Value::Boolean(_) => types::BOOLEAN,
            Value::Null => types::OBJECT,
            Value::String(_) => types::STRING,
        }
    }

    /// Returns `true` for `Int`, `Long`, `Float` and `Double`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_)
        )
    }

    /// Returns `true` if both values use the same representation.
    #[must_use]
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Returns `true` for a float or double NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        match self {
            Value::Float(f) => f.is_nan(),
            Value::Double(d) => d.is_nan(),
            _ => false,
        }
    }

    /// Numeric value converted to `f32`, with Java's widening and narrowing rules.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Value::Int(i) => Some(i as f32),
            Value::Long(l) => Some(l as f32),
            Value::Float(f) => Some(f),
            Value::Double(d) => Some(d as f32),
            _ => None,
        }
    }

    /// Numeric value converted to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(f64::from(i)),
            Value::Long(l) => Some(l as f64),
            Value::Float(f) => Some(f64::from(f)),
            Value::Double(d) => Some(d),
            _ => None,
        }
    }

    /// Numeric value converted to `i64`. Floating point values saturate toward zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i64::from(i)),
            Value::Long(l) => Some(l),
            Value::Float(f) => Some(f as i64),
            Value::Double(d) => Some(d as i64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}L"),
            Value::Float(v) => write!(f, "{v}f"),
            Value::Double(v) => write!(f, "{v}d"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Null => f.write_str("null"),
            Value::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// A value cell with known/unknown semantics and a declared type.
///
/// Items are immutable. Opcodes never change a stored item, they assign fresh ones.
///
/// # Examples
///
/// ```rust
/// use dexscope::emulation::{types, HeapItem, Value};
///
/// let five = HeapItem::int(5);
/// assert!(five.is_known());
/// assert_eq!(five.value(), Some(&Value::Int(5)));
/// assert_eq!(five.type_name(), types::INT);
///
/// let unknown = HeapItem::unknown(types::INT);
/// assert!(unknown.is_unknown());
/// assert_eq!(unknown.value(), None);
/// assert_eq!(unknown.type_name(), "int");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HeapItem {
    value: Option<Value>,
    ty: Cow<'static, str>,
}

impl HeapItem {
    /// Creates a known item with an explicit type tag.
    #[must_use]
    pub fn new(value: Value, ty: impl Into<Cow<'static, str>>) -> Self {
        HeapItem {
            value: Some(value),
            ty: ty.into(),
        }
    }

    /// Creates a known item typed with the default tag of its representation.
    #[must_use]
    pub fn known(value: Value) -> Self {
        let ty = value.default_type();
        Self::new(value, ty)
    }

    /// Creates an unknown item of the given type.
    #[must_use]
    pub fn unknown(ty: impl Into<Cow<'static, str>>) -> Self {
        HeapItem {
            value: None,
            ty: ty.into(),
        }
    }

    /// Known `int`.
    #[must_use]
    pub fn int(value: i32) -> Self {
        Self::new(Value::Int(value), types::INT)
    }

    /// Known `long`.
    #[must_use]
    pub fn long(value: i64) -> Self {
        Self::new(Value::Long(value), types::LONG)
    }

    /// Known `float`.
    #[must_use]
    pub fn float(value: f32) -> Self {
        Self::new(Value::Float(value), types::FLOAT)
    }

    /// Known `double`.
    #[must_use]
    pub fn double(value: f64) -> Self {
        Self::new(Value::Double(value), types::DOUBLE)
    }

    /// Known `boolean`.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::new(Value::Boolean(value), types::BOOLEAN)
    }

    /// Returns `true` if the item has no concrete value.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.value.is_none()
    }

    /// Returns `true` if the item has a concrete value.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.value.is_some()
    }

    /// The concrete value, `None` for unknown items.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The declared type tag.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.ty
    }
}

impl fmt::Display for HeapItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{value}", self.ty),
            None => write!(f, "{}:?", self.ty),
        }
    }
}
