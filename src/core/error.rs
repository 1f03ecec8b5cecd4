// Crate-wide error type shared by the document decoder, API client, and CLI.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    MissingField,
    WrongType,
    UnrecognizedValue,
    UnsupportedNodeType,
    Malformed,
    Usage,
    Permission,
    NotFound,
    RateLimited,
    Io,
    Internal,
}

impl ErrorKind {
    /// True for kinds produced while decoding a payload (as opposed to transport failures).
    pub fn is_decode(self) -> bool {
        matches!(
            self,
            ErrorKind::MissingField
                | ErrorKind::WrongType
                | ErrorKind::UnrecognizedValue
                | ErrorKind::UnsupportedNodeType
                | ErrorKind::Malformed
        )
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    field: Option<String>,
    node_id: Option<String>,
    status: Option<u16>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            field: None,
            node_id: None,
            status: None,
            source: None,
        }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorKind::MissingField)
            .with_message(format!("missing required field `{field}`"))
            .with_field(field)
    }

    pub fn wrong_type(field: &str, expected: &str) -> Self {
        Self::new(ErrorKind::WrongType)
            .with_message(format!("field `{field}` is not {expected}"))
            .with_field(field)
    }

    pub fn unrecognized(enum_name: &str, literal: &str) -> Self {
        Self::new(ErrorKind::UnrecognizedValue)
            .with_message(format!("unrecognized {enum_name} value: {literal}"))
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed).with_message(message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Dotted path of the offending field, e.g. `fills[1].color.r`.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_node(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Prefix the field path with the enclosing field as the error unwinds.
    pub fn within(mut self, parent: &str) -> Self {
        self.field = Some(match self.field.take() {
            Some(field) if field.starts_with('[') => format!("{parent}{field}"),
            Some(field) => format!("{parent}.{field}"),
            None => parent.to_string(),
        });
        self
    }

    /// Prefix the field path with a list position.
    pub fn at_index(self, index: usize) -> Self {
        self.within(&format!("[{index}]"))
    }

    /// Attach the node id unless an inner node already claimed the failure.
    pub fn in_node(mut self, node_id: &str) -> Self {
        if self.node_id.is_none() {
            self.node_id = Some(node_id.to_string());
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        if let Some(node_id) = &self.node_id {
            write!(f, " (node: {node_id})")?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {status})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Permission => 4,
        ErrorKind::RateLimited => 5,
        ErrorKind::Io => 6,
        ErrorKind::MissingField
        | ErrorKind::WrongType
        | ErrorKind::UnrecognizedValue
        | ErrorKind::UnsupportedNodeType
        | ErrorKind::Malformed => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_exit_code};

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::NotFound, 3),
            (ErrorKind::Permission, 4),
            (ErrorKind::RateLimited, 5),
            (ErrorKind::Io, 6),
            (ErrorKind::MissingField, 7),
            (ErrorKind::UnsupportedNodeType, 7),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn field_path_accumulates_outward() {
        let err = Error::missing_field("r")
            .within("color")
            .at_index(1)
            .within("fills");
        assert_eq!(err.field(), Some("fills[1].color.r"));
    }

    #[test]
    fn innermost_node_wins() {
        let err = Error::missing_field("name").in_node("3:4").in_node("1:2");
        assert_eq!(err.node_id(), Some("3:4"));
    }

    #[test]
    fn display_includes_context() {
        let err = Error::missing_field("absoluteBoundingBox").in_node("5:1");
        assert_eq!(
            err.to_string(),
            "MissingField: missing required field `absoluteBoundingBox` (field: absoluteBoundingBox) (node: 5:1)"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
