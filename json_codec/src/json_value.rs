use std::{fmt, ops::Index, str::FromStr};

use indexmap::IndexMap;

use crate::{
    parser::{self, DeserializeError},
    serializer::{self, Style},
};

/// Object members, kept in the order they were first inserted.
pub type Map = IndexMap<String, JsonValue>;

static NULL: JsonValue = JsonValue::Null;

/// A parsed JSON document.
///
/// Numbers are always stored as `f64`, integer views are derived on demand. Object
/// equality ignores member order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    Object(Map),
    Array(Vec<JsonValue>),

    String(String),
    Number(f64),
    Bool(bool),
    #[default]
    Null,
}

impl JsonValue {
    pub fn from_bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn from_number(value: f64) -> Self {
        Self::Number(value)
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn from_array(value: Vec<JsonValue>) -> Self {
        Self::Array(value)
    }

    pub fn from_object(value: Map) -> Self {
        Self::Object(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer view of a number, only when it has no fractional part and fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        let n = self.as_f64()?;
        // 2^63 itself is not representable as i64, hence the exclusive upper bound
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Some(n as i64)
        } else {
            None
        }
    }

    /// Like [`JsonValue::as_i64`] but for non-negative numbers that fit in a `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        let n = self.as_f64()?;
        if n.fract() == 0.0 && n >= 0.0 && n < u64::MAX as f64 {
            Some(n as u64)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Member lookup, `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()?.get(key)
    }

    /// Element lookup, `None` when out of range and for non-arrays.
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        self.as_array()?.get(index)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn serialize(&self, style: Style) -> String {
        serializer::serialize(self, style)
    }
}

// Missing entries index to `Null` so lookups can be chained
impl Index<usize> for JsonValue {
    type Output = JsonValue;

    fn index(&self, index: usize) -> &Self::Output {
        self.get_index(index).unwrap_or(&NULL)
    }
}

impl Index<&str> for JsonValue {
    type Output = JsonValue;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Compact output by default, `{:#}` selects the pretty style.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = if f.alternate() {
            Style::Pretty
        } else {
            Style::Compact
        };

        f.write_str(&self.serialize(style))
    }
}

impl FromStr for JsonValue {
    type Err = DeserializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::from_str(s)
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for JsonValue {
    fn from(value: f32) -> Self {
        Self::Number(value.into())
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonValue {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for JsonValue {
    fn from(value: Map) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<JsonValue>> FromIterator<T> for JsonValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object<const N: usize>(members: [(&str, JsonValue); N]) -> JsonValue {
        JsonValue::Object(members.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn test_constructors() {
        assert_eq!(JsonValue::Bool(true), JsonValue::from_bool(true));
        assert_eq!(JsonValue::Number(1.5), JsonValue::from_number(1.5));
        assert_eq!(JsonValue::String("a".to_string()), JsonValue::from_string("a"));
        assert_eq!(JsonValue::Array(vec![]), JsonValue::from_array(vec![]));
        assert_eq!(JsonValue::Object(Map::new()), JsonValue::from_object(Map::new()));
        assert_eq!(JsonValue::Null, JsonValue::default());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(JsonValue::Number(3.0), JsonValue::from(3u8));
        assert_eq!(JsonValue::Number(-3.0), JsonValue::from(-3i64));
        assert_eq!(JsonValue::Null, JsonValue::from(None::<bool>));
        assert_eq!(
            JsonValue::Array(vec![JsonValue::Number(1.0), JsonValue::Number(2.0)]),
            JsonValue::from(vec![1, 2])
        );

        let value: JsonValue = ["a", "b"].into_iter().collect();
        assert_eq!(JsonValue::from(vec!["a", "b"]), value);
    }

    #[test]
    fn test_integer_view() {
        assert_eq!(Some(100), JsonValue::Number(100.0).as_i64());
        assert_eq!(Some(-7), JsonValue::Number(-7.0).as_i64());
        assert_eq!(None, JsonValue::Number(0.5).as_i64());
        assert_eq!(None, JsonValue::Number(1e19).as_i64());
        assert_eq!(Some(10_000_000_000_000_000_000), JsonValue::Number(1e19).as_u64());
        assert_eq!(None, JsonValue::Number(-1.0).as_u64());
        assert_eq!(None, JsonValue::Number(f64::NAN).as_i64());
        assert_eq!(None, JsonValue::String("1".to_string()).as_i64());
    }

    #[test]
    fn test_accessors() {
        assert!(JsonValue::Null.is_null());
        assert_eq!(Some(false), JsonValue::Bool(false).as_bool());
        assert_eq!(Some(0.01), JsonValue::Number(0.01).as_f64());
        assert_eq!(Some("x"), JsonValue::String("x".to_string()).as_str());
        assert_eq!(None, JsonValue::Null.as_array());
        assert_eq!(None, JsonValue::Array(vec![]).as_object());
    }

    #[test]
    fn test_index_chains_to_null() {
        let value = JsonValue::Array(vec![
            JsonValue::from("foo bar"),
            object([("id", JsonValue::from(1))]),
        ]);

        assert_eq!(Some("foo bar"), value[0].as_str());
        assert_eq!(Some(1), value[1]["id"].as_i64());
        assert!(value[3].is_null());
        assert!(value["no"]["such"]["value"].is_null());
        assert_eq!(None, value.get_index(2));
        assert_eq!(None, value.get("id"));
    }

    #[test]
    fn test_object_equality_ignores_order() {
        let first = object([("a", JsonValue::from(1)), ("b", JsonValue::from(2))]);
        let second = object([("b", JsonValue::from(2)), ("a", JsonValue::from(1))]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_structural_inequality() {
        assert_ne!(JsonValue::Null, JsonValue::Bool(false));
        assert_ne!(JsonValue::Number(1.0), JsonValue::String("1".to_string()));
        assert_ne!(JsonValue::Number(f64::NAN), JsonValue::Number(f64::NAN));
        assert_eq!(JsonValue::Number(0.0), JsonValue::Number(-0.0));
        assert_ne!(JsonValue::from(vec![1, 2]), JsonValue::from(vec![2, 1]));
    }

    #[test]
    fn test_type_names() {
        assert_eq!("null", JsonValue::Null.type_name());
        assert_eq!("boolean", JsonValue::Bool(false).type_name());
        assert_eq!("number", JsonValue::Number(0.0).type_name());
        assert_eq!("string", JsonValue::String(String::new()).type_name());
        assert_eq!("array", JsonValue::Array(vec![]).type_name());
        assert_eq!("object", JsonValue::Object(Map::new()).type_name());
    }

    #[test]
    fn test_display() {
        let value = JsonValue::from(vec![JsonValue::from(true), JsonValue::Null]);
        assert_eq!("[true,null]", value.to_string());
        assert_eq!("[\n  true,\n  null\n]", format!("{value:#}"));
    }
}
