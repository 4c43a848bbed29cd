//! Conversions between [`JsonValue`] trees and plain Rust types.
//!
//! Structs with named fields can derive both traits with `#[derive(FromJson, ToJson)]`.

use std::collections::HashMap;

use thiserror::Error;

use crate::{
    json_value::{JsonValue, Map},
    parser::{self, DeserializeError},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0} is not representable as the requested integer type")]
    NotAnInteger(f64),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{field}`: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    pub fn type_mismatch(expected: &'static str, found: &JsonValue) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }

    /// Attaches the field (or index) this error occurred under.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }
}

/// Error of [`from_json_str`], covering both stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FromJsonStrError {
    #[error(transparent)]
    Deserialize(#[from] DeserializeError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

pub trait FromJson: Sized {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError>;

    /// Value to use when an object member is absent, `None` makes the member required.
    fn from_missing() -> Option<Self> {
        None
    }
}

pub trait ToJson {
    fn to_json(&self) -> JsonValue;
}

/// Parses `source` and converts the document into `T`.
pub fn from_json_str<T: FromJson>(source: &str) -> Result<T, FromJsonStrError> {
    let value = parser::from_str(source)?;
    Ok(T::from_json(&value)?)
}

impl FromJson for JsonValue {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl ToJson for JsonValue {
    fn to_json(&self) -> JsonValue {
        self.clone()
    }
}

impl FromJson for bool {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        value
            .as_bool()
            .ok_or_else(|| ConversionError::type_mismatch("boolean", value))
    }
}

impl ToJson for bool {
    fn to_json(&self) -> JsonValue {
        JsonValue::Bool(*self)
    }
}

impl FromJson for String {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConversionError::type_mismatch("string", value))
    }
}

impl ToJson for String {
    fn to_json(&self) -> JsonValue {
        JsonValue::String(self.clone())
    }
}

impl ToJson for str {
    fn to_json(&self) -> JsonValue {
        JsonValue::String(self.to_string())
    }
}

impl FromJson for f64 {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        value
            .as_f64()
            .ok_or_else(|| ConversionError::type_mismatch("number", value))
    }
}

impl FromJson for f32 {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        f64::from_json(value).map(|n| n as f32)
    }
}

impl ToJson for f64 {
    fn to_json(&self) -> JsonValue {
        JsonValue::Number(*self)
    }
}

impl ToJson for f32 {
    fn to_json(&self) -> JsonValue {
        JsonValue::Number((*self).into())
    }
}

// Integers go through the derived integer view: a whole number within the target range
macro_rules! json_integer {
    ($view:ident => $($ty:ty),*) => {
        $(
            impl FromJson for $ty {
                fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
                    let num = f64::from_json(value)?;
                    value
                        .$view()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or(ConversionError::NotAnInteger(num))
                }
            }

            impl ToJson for $ty {
                fn to_json(&self) -> JsonValue {
                    JsonValue::from(*self)
                }
            }
        )*
    };
}

json_integer!(as_i64 => i8, i16, i32, i64, isize);
json_integer!(as_u64 => u8, u16, u32, u64, usize);

impl<T: FromJson> FromJson for Option<T> {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::Null => Ok(None),
            _ => T::from_json(value).map(Some),
        }
    }

    fn from_missing() -> Option<Self> {
        Some(None)
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> JsonValue {
        self.as_ref().map_or(JsonValue::Null, ToJson::to_json)
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        let elems = value
            .as_array()
            .ok_or_else(|| ConversionError::type_mismatch("array", value))?;

        elems
            .iter()
            .enumerate()
            .map(|(idx, elem)| T::from_json(elem).map_err(|e| e.in_field(idx.to_string())))
            .collect()
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> JsonValue {
        self.as_slice().to_json()
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.iter().map(ToJson::to_json).collect())
    }
}

fn object_members<'a>(
    value: &'a JsonValue,
) -> Result<impl Iterator<Item = (&'a String, &'a JsonValue)>, ConversionError> {
    value
        .as_object()
        .map(|map| map.iter())
        .ok_or_else(|| ConversionError::type_mismatch("object", value))
}

impl<T: FromJson> FromJson for HashMap<String, T> {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        object_members(value)?
            .map(|(k, v)| {
                T::from_json(v)
                    .map(|converted| (k.clone(), converted))
                    .map_err(|e| e.in_field(k.as_str()))
            })
            .collect()
    }
}

impl<T: ToJson> ToJson for HashMap<String, T> {
    fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
    }
}

impl FromJson for Map {
    fn from_json(value: &JsonValue) -> Result<Self, ConversionError> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| ConversionError::type_mismatch("object", value))
    }
}

impl ToJson for Map {
    fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.clone())
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json(&self) -> JsonValue {
        (**self).to_json()
    }
}
