//! Purpose: Typed, error-reporting accessors over a JSON object.
//! Exports: `Fields`, `Literal`, `literal_enum!`.
//! Role: The one place where raw `serde_json::Value` shapes are checked; decoders build on it.
//! Invariants: A `null` value is treated the same as an absent key.
//! Invariants: Nested decoder failures are re-labelled with the enclosing field path.
use crate::core::error::{Error, ErrorKind};
use serde_json::{Map, Value};

pub type DecodeResult<T> = Result<T, Error>;

/// A closed set of server string literals mapped onto enum variants.
pub trait Literal: Sized + Copy + 'static {
    /// Name used in "unrecognized value" errors.
    const NAME: &'static str;
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn as_literal(self) -> &'static str;

    fn from_literal(literal: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_literal() == literal)
    }

    fn parse_literal(literal: &str) -> DecodeResult<Self> {
        Self::from_literal(literal).ok_or_else(|| Error::unrecognized(Self::NAME, literal))
    }
}

/// Declare a `Literal` enum whose variants map one-to-one onto server strings.
#[macro_export]
macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::core::fields::Literal for $name {
            const NAME: &'static str = $label;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_literal(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::core::fields::Literal::as_literal(*self))
            }
        }
    };
}

#[derive(Clone, Copy, Debug)]
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value) -> DecodeResult<Self> {
        match value {
            Value::Object(object) => Ok(Self { object }),
            other => Err(Error::new(ErrorKind::WrongType)
                .with_message(format!("expected an object, found {}", type_name(other)))),
        }
    }

    pub fn object(&self) -> &'a Map<String, Value> {
        self.object
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn required(&self, key: &str) -> DecodeResult<&'a Value> {
        self.get(key).ok_or_else(|| Error::missing_field(key))
    }

    pub fn str(&self, key: &str) -> DecodeResult<&'a str> {
        let value = self.required(key)?;
        value.as_str().ok_or_else(|| Error::wrong_type(key, "a string"))
    }

    pub fn opt_str(&self, key: &str) -> DecodeResult<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| Error::wrong_type(key, "a string")),
        }
    }

    pub fn string(&self, key: &str) -> DecodeResult<String> {
        self.str(key).map(str::to_string)
    }

    pub fn opt_string(&self, key: &str) -> DecodeResult<Option<String>> {
        Ok(self.opt_str(key)?.map(str::to_string))
    }

    pub fn f64(&self, key: &str) -> DecodeResult<f64> {
        let value = self.required(key)?;
        value.as_f64().ok_or_else(|| Error::wrong_type(key, "a number"))
    }

    pub fn opt_f64(&self, key: &str) -> DecodeResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| Error::wrong_type(key, "a number")),
        }
    }

    pub fn f64_or(&self, key: &str, default: f64) -> DecodeResult<f64> {
        Ok(self.opt_f64(key)?.unwrap_or(default))
    }

    pub fn u64(&self, key: &str) -> DecodeResult<u64> {
        let value = self.required(key)?;
        as_whole_number(value).ok_or_else(|| Error::wrong_type(key, "a non-negative integer"))
    }

    pub fn opt_u64(&self, key: &str) -> DecodeResult<Option<u64>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => as_whole_number(value)
                .map(Some)
                .ok_or_else(|| Error::wrong_type(key, "a non-negative integer")),
        }
    }

    pub fn opt_bool(&self, key: &str) -> DecodeResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| Error::wrong_type(key, "a boolean")),
        }
    }

    pub fn bool(&self, key: &str) -> DecodeResult<bool> {
        self.required(key)?;
        self.opt_bool(key)?.ok_or_else(|| Error::missing_field(key))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> DecodeResult<bool> {
        Ok(self.opt_bool(key)?.unwrap_or(default))
    }

    pub fn literal<T: Literal>(&self, key: &str) -> DecodeResult<T> {
        let text = self.str(key)?;
        T::parse_literal(text).map_err(|err| err.with_field(key))
    }

    pub fn opt_literal<T: Literal>(&self, key: &str) -> DecodeResult<Option<T>> {
        match self.opt_str(key)? {
            None => Ok(None),
            Some(text) => T::parse_literal(text)
                .map(Some)
                .map_err(|err| err.with_field(key)),
        }
    }

    /// Decode a required nested value with `decode`, labelling failures with `key`.
    pub fn nested<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&'a Value) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        let value = self.required(key)?;
        decode(value).map_err(|err| err.within(key))
    }

    pub fn opt_nested<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&'a Value) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => decode(value).map(Some).map_err(|err| err.within(key)),
        }
    }

    /// The raw elements of a required array field.
    pub fn array(&self, key: &str) -> DecodeResult<&'a [Value]> {
        let value = self.required(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Error::wrong_type(key, "an array"))
    }

    /// The raw elements of an optional array field; absent yields an empty slice.
    pub fn array_or_empty(&self, key: &str) -> DecodeResult<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(value) => value
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| Error::wrong_type(key, "an array")),
        }
    }

    pub fn list<T>(
        &self,
        key: &str,
        decode: impl Fn(&'a Value) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        decode_each(self.array(key)?, decode).map_err(|err| err.within(key))
    }

    pub fn list_or_empty<T>(
        &self,
        key: &str,
        decode: impl Fn(&'a Value) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        decode_each(self.array_or_empty(key)?, decode).map_err(|err| err.within(key))
    }
}

fn decode_each<'a, T>(
    items: &'a [Value],
    decode: impl Fn(&'a Value) -> DecodeResult<T>,
) -> DecodeResult<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode(item).map_err(|err| err.at_index(index)))
        .collect()
}

fn as_whole_number(value: &Value) -> Option<u64> {
    if let Some(number) = value.as_u64() {
        return Some(number);
    }
    let float = value.as_f64()?;
    if float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
