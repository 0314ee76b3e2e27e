//! Button-token protocol: at-most-once actuation from an opaque server token.
//!
//! The server mints a new token whenever it wants the button pushed.  The
//! device only compares tokens for equality:
//!
//! ```text
//!   Uninitialized ──consume(t)──▶ Armed(t)          (never pushes)
//!   Armed(t) ──should_push(o)──▶ o != t
//!   Armed(t) ──consume(o)──────▶ Armed(o)           (always)
//! ```
//!
//! The first token seen after boot only arms the store.  Treating it as a
//! push request would open the door on every power cycle.

use core::fmt;

/// Maximum accepted token length in bytes.
pub const MAX_TOKEN_LEN: usize = 256;

/// A non-empty, bounded, opaque token minted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ButtonToken(heapless::String<MAX_TOKEN_LEN>);

/// Why a string cannot be used as a [`ButtonToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Empty,
    TooLong,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "token is empty"),
            Self::TooLong => write!(f, "token exceeds {MAX_TOKEN_LEN} bytes"),
        }
    }
}

impl ButtonToken {
    pub fn new(value: &str) -> Result<Self, TokenError> {
        if value.is_empty() {
            return Err(TokenError::Empty);
        }
        let mut s = heapless::String::new();
        s.push_str(value).map_err(|_| TokenError::TooLong)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ButtonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the last consumed token.  Owned by the command loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenStore {
    /// Nothing consumed since boot.
    #[default]
    Uninitialized,
    /// Holds the most recently consumed token.
    Armed(ButtonToken),
}

impl TokenStore {
    pub const fn new() -> Self {
        Self::Uninitialized
    }

    /// Would `observed` be a new push request?
    ///
    /// Always `false` while uninitialized; otherwise `true` iff `observed`
    /// differs from the held token.
    pub fn should_push(&self, observed: &ButtonToken) -> bool {
        match self {
            Self::Uninitialized => false,
            Self::Armed(held) => held != observed,
        }
    }

    /// Record `observed` as the latest token, whatever the decision was.
    pub fn consume(&mut self, observed: ButtonToken) {
        *self = Self::Armed(observed);
    }

    pub fn current(&self) -> Option<&ButtonToken> {
        match self {
            Self::Uninitialized => None,
            Self::Armed(t) => Some(t),
        }
    }

    pub fn has_consumed_any(&self) -> bool {
        matches!(self, Self::Armed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> ButtonToken {
        ButtonToken::new(s).unwrap()
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert_eq!(ButtonToken::new(""), Err(TokenError::Empty));
        let long = "a".repeat(MAX_TOKEN_LEN + 1);
        assert_eq!(ButtonToken::new(&long), Err(TokenError::TooLong));
        let max = "a".repeat(MAX_TOKEN_LEN);
        assert_eq!(ButtonToken::new(&max).unwrap().as_str().len(), MAX_TOKEN_LEN);
    }

    #[test]
    fn first_token_arms_without_push() {
        let mut store = TokenStore::new();
        assert!(!store.has_consumed_any());
        assert!(!store.should_push(&tok("tokA")));
        store.consume(tok("tokA"));
        assert_eq!(store.current(), Some(&tok("tokA")));
        assert!(store.has_consumed_any());
    }

    #[test]
    fn unchanged_token_does_not_push() {
        let mut store = TokenStore::Armed(tok("tokA"));
        assert!(!store.should_push(&tok("tokA")));
        store.consume(tok("tokA"));
        assert_eq!(store.current(), Some(&tok("tokA")));
    }

    #[test]
    fn changed_token_pushes_once() {
        let mut store = TokenStore::Armed(tok("tokA"));
        assert!(store.should_push(&tok("tokB")));
        store.consume(tok("tokB"));
        assert_eq!(store.current(), Some(&tok("tokB")));
        assert!(!store.should_push(&tok("tokB")));
    }

    #[test]
    fn returning_to_old_token_is_a_change() {
        let mut store = TokenStore::Armed(tok("tokB"));
        assert!(store.should_push(&tok("tokA")));
        store.consume(tok("tokA"));
        assert!(store.has_consumed_any());
    }
}
