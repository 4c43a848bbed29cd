//! JSON value model with a recursive-descent parser and a compact/pretty serializer.
//!
//! ```
//! use json_codec::{JsonValue, Style};
//!
//! let value: JsonValue = "[1e2, \"\\uD83C\\uDF63\", {\"a\": null}]".parse().unwrap();
//! assert_eq!(value[0].as_i64(), Some(100));
//! assert_eq!(value.serialize(Style::Compact), "[100,\"\u{1F363}\",{\"a\":null}]");
//! ```
//!
//! [`parse`] is the diagnostic entry point: it reports the line and column of a failure and
//! hands back any input left after the value. [`deserialize`] and [`from_str`] require the
//! whole input to be a single document and only keep the error message.

// Lets the derive macros refer to `::json_codec` from inside this crate too
extern crate self as json_codec;

mod convert;
mod json_value;
mod parser;
mod scanner;
mod serializer;
mod token;

pub use convert::{ConversionError, FromJson, FromJsonStrError, ToJson, from_json_str};
pub use json_codec_macros::{FromJson, ToJson};
pub use json_value::{JsonValue, Map};
pub use parser::{
    DeserializeError, ParseError, ParseErrorKind, ParseOutcome, Parser, ParserState, deserialize,
    from_str, parse,
};
pub use serializer::{Style, serialize, to_string, to_string_pretty};
pub use token::TokenKind;
