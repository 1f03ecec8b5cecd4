//! Purpose: Credentials attached to every API request.
//! Exports: `AccessToken`.
//! Role: Maps a token kind onto the header the service expects.
//! Invariants: Token text never appears in `Debug` output or logs.
use std::fmt;

#[derive(Clone, Eq, PartialEq)]
pub enum AccessToken {
    /// Personal access token, sent as `X-Figma-Token`.
    PersonalAccess(String),
    /// OAuth2 access token, sent as a bearer credential.
    OAuth2(String),
}

impl AccessToken {
    pub fn personal(token: impl Into<String>) -> Self {
        Self::PersonalAccess(token.into())
    }

    pub fn oauth(token: impl Into<String>) -> Self {
        Self::OAuth2(token.into())
    }

    pub fn secret(&self) -> &str {
        match self {
            AccessToken::PersonalAccess(token) | AccessToken::OAuth2(token) => token,
        }
    }

    /// Header name and value for this credential.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            AccessToken::PersonalAccess(token) => ("X-Figma-Token", token.clone()),
            AccessToken::OAuth2(token) => ("Authorization", format!("Bearer {token}")),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            AccessToken::PersonalAccess(_) => "PersonalAccess",
            AccessToken::OAuth2(_) => "OAuth2",
        };
        write!(f, "{kind}(<redacted>)")
    }
}
