//! Flexible wire types shared across the API surface.
//!
//! The upstream API is loosely typed: identifiers arrive as either JSON
//! numbers or strings depending on the endpoint, and several boolean flags
//! are encoded as `0`/`1`. These wrappers absorb that looseness at the
//! serde boundary so client-facing structs stay strongly typed.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string identifier that also accepts numeric JSON representations.
///
/// A JSON field containing the number `42` deserializes to the value
/// `"42"`; a field containing the string `"42"` deserializes identically.
/// Serialization always emits the string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FlexString(String);

impl FlexString {
    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlexString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FlexString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FlexString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<FlexString> for String {
    fn from(s: FlexString) -> Self {
        s.0
    }
}

impl<'de> Deserialize<'de> for FlexString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlexStringVisitor;

        impl Visitor<'_> for FlexStringVisitor {
            type Value = FlexString;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string or an integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(FlexString(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(FlexString(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FlexString(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(FlexString(v.to_string()))
            }
        }

        deserializer.deserialize_any(FlexStringVisitor)
    }
}

/// A boolean encoded as a JSON number.
///
/// `0` is `false`, any other number is `true`; `1` is emitted when
/// serializing. Plain JSON booleans are also accepted on input since a few
/// endpoints use them interchangeably.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberAsBool(pub bool);

impl NumberAsBool {
    /// The wrapped boolean value.
    #[must_use]
    pub fn as_bool(self) -> bool {
        self.0
    }
}

impl From<bool> for NumberAsBool {
    fn from(v: bool) -> Self {
        Self(v)
    }
}

impl From<NumberAsBool> for bool {
    fn from(v: NumberAsBool) -> Self {
        v.0
    }
}

impl Serialize for NumberAsBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(self.0))
    }
}

impl<'de> Deserialize<'de> for NumberAsBool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberAsBoolVisitor;

        impl Visitor<'_> for NumberAsBoolVisitor {
            type Value = NumberAsBool;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a 0/1 number or a boolean")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(NumberAsBool(v != 0))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(NumberAsBool(v != 0))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(NumberAsBool(v))
            }
        }

        deserializer.deserialize_any(NumberAsBoolVisitor)
    }
}

/// The shared response envelope carried by most endpoints.
///
/// `status` is `"OK"` or `"KO"`; `message` explains a `"KO"`. Both fields
/// are optional because a handful of legacy endpoints omit the envelope
/// entirely. Resource payload fields are ignored here; handlers decode
/// them from the same raw bytes into their own typed structures.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
