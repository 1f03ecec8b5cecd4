//! Purpose: Internal JSON parsing boundary shared by the client and the CLI.
//! Exports: `parse` module, `value_from_slice`, `from_slice`, `release`.
//! Role: Single seam for raw text to `serde_json::Value`; typed decoding happens in `core`.
//! Invariants: Raw payloads are parsed here, never ad hoc at callsites.
//! Invariants: Parse failures surface as `Malformed` with a category hint.

pub(crate) mod parse;

pub(crate) use parse::release;

use crate::core::error::{Error, ErrorKind};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn value_from_slice(input: &[u8], context: &str) -> Result<Value, Error> {
    from_slice(input, context)
}

/// Parse straight into a serde type; shape mismatches are reported like syntax errors.
pub(crate) fn from_slice<T: DeserializeOwned>(input: &[u8], context: &str) -> Result<T, Error> {
    parse::from_slice::<T>(input).map_err(|err| parse_failure(err, context))
}

fn parse_failure(err: serde_json::Error, context: &str) -> Error {
    Error::new(ErrorKind::Malformed)
        .with_message(format!("invalid json in {context}"))
        .with_hint(parse::hint_for_error(&err, context))
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use super::value_from_slice;
    use crate::core::error::ErrorKind;

    #[test]
    fn parse_failure_is_malformed_with_hint() {
        let err = value_from_slice(b"{\"document\":", "file response").expect_err("eof");
        assert_eq!(err.kind(), ErrorKind::Malformed);
        let hint = err.hint().expect("hint");
        assert!(hint.contains("parse category: eof"));
        assert!(hint.contains("context: file response"));
    }

    #[test]
    fn typed_shape_mismatch_is_data_category() {
        let err = super::from_slice::<Vec<u32>>(br#"{"a":1}"#, "listing").expect_err("shape");
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(err.hint().expect("hint").contains("parse category: data"));
    }
}
