//! Canonically ordered pair of distinct tokens.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::TokenId;
use crate::error::DexError;

/// Direction of a swap relative to a pool's canonical orientation.
///
/// Serialized as `1` (token A in, token B out) or `2` (token B in,
/// token A out), matching the `side` field of trade events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Side {
    /// Token A in, token B out.
    AToB,
    /// Token B in, token A out.
    BToA,
}

impl Side {
    /// The numeric side code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::AToB => 1,
            Self::BToA => 2,
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        side.code()
    }
}

impl TryFrom<u8> for Side {
    type Error = DexError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::AToB),
            2 => Ok(Self::BToA),
            _ => Err(DexError::InvalidToken("swap side must be 1 or 2")),
        }
    }
}

/// An ordered pair of distinct tokens, canonically sorted by identifier.
///
/// The canonical ordering guarantees `token_a < token_b`, so `(X, Y)` and
/// `(Y, X)` always describe the same pool.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{TokenId, TokenPair};
///
/// let flow = TokenId::resolve("flowTokenVault").expect("alias");
/// let fusd = TokenId::resolve("fusdVault").expect("alias");
///
/// let pair = TokenPair::new(fusd.clone(), flow.clone()).expect("distinct tokens");
/// assert_eq!(pair.first(), &flow);
/// assert_eq!(pair.second(), &fusd);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    token_a: TokenId,
    token_b: TokenId,
}

impl TokenPair {
    /// Creates a new canonically ordered `TokenPair`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] if both identifiers are equal.
    pub fn new(token1: TokenId, token2: TokenId) -> Result<Self, DexError> {
        if token1 == token2 {
            return Err(DexError::InvalidToken(
                "token pair requires two distinct identifiers",
            ));
        }

        let (token_a, token_b) = if token1 < token2 {
            (token1, token2)
        } else {
            (token2, token1)
        };

        Ok(Self { token_a, token_b })
    }

    /// Returns token A (lower identifier).
    #[must_use]
    pub const fn first(&self) -> &TokenId {
        &self.token_a
    }

    /// Returns token B (higher identifier).
    #[must_use]
    pub const fn second(&self) -> &TokenId {
        &self.token_b
    }

    /// Returns `true` if the given token is part of this pair.
    #[must_use]
    pub fn contains(&self, token: &TokenId) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// Returns the counterpart of `token` in this pair.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] if `token` is not in the pair.
    pub fn other(&self, token: &TokenId) -> Result<&TokenId, DexError> {
        match self.side_of(token)? {
            Side::AToB => Ok(&self.token_b),
            Side::BToA => Ok(&self.token_a),
        }
    }

    /// Returns the swap side when `token_in` is sold into this pair.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] if `token_in` is not in the pair.
    pub fn side_of(&self, token_in: &TokenId) -> Result<Side, DexError> {
        if *token_in == self.token_a {
            Ok(Side::AToB)
        } else if *token_in == self.token_b {
            Ok(Side::BToA)
        } else {
            Err(DexError::InvalidToken("token is not part of this pair"))
        }
    }

    /// Returns `(token_in, token_out)` for a swap side.
    #[must_use]
    pub const fn oriented(&self, side: Side) -> (&TokenId, &TokenId) {
        match side {
            Side::AToB => (&self.token_a, &self.token_b),
            Side::BToA => (&self.token_b, &self.token_a),
        }
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token_a, self.token_b)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn tok(id: &str) -> TokenId {
        let Ok(t) = TokenId::new(id) else {
            panic!("invalid token in test: {id}");
        };
        t
    }

    #[test]
    fn valid_pair_preserves_order() {
        let Ok(pair) = TokenPair::new(tok("A.1.Alpha"), tok("A.2.Beta")) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.first(), &tok("A.1.Alpha"));
        assert_eq!(pair.second(), &tok("A.2.Beta"));
    }

    #[test]
    fn reversed_input_is_sorted() {
        let Ok(p1) = TokenPair::new(tok("A.2.Beta"), tok("A.1.Alpha")) else {
            panic!("expected Ok");
        };
        let Ok(p2) = TokenPair::new(tok("A.1.Alpha"), tok("A.2.Beta")) else {
            panic!("expected Ok");
        };
        assert_eq!(p1, p2);
    }

    #[test]
    fn same_token_rejected() {
        let result = TokenPair::new(tok("A.1.Alpha"), tok("A.1.Alpha"));
        assert!(matches!(result, Err(DexError::InvalidToken(_))));
    }

    #[test]
    fn sides_and_counterparts() {
        let Ok(pair) = TokenPair::new(tok("A.1.Alpha"), tok("A.2.Beta")) else {
            panic!("expected Ok");
        };
        assert!(matches!(pair.side_of(&tok("A.1.Alpha")), Ok(Side::AToB)));
        assert!(matches!(pair.side_of(&tok("A.2.Beta")), Ok(Side::BToA)));
        assert!(pair.side_of(&tok("A.3.Gamma")).is_err());
        let Ok(other) = pair.other(&tok("A.2.Beta")) else {
            panic!("expected Ok");
        };
        assert_eq!(other, &tok("A.1.Alpha"));
        assert_eq!(pair.oriented(Side::BToA).0, &tok("A.2.Beta"));
        assert!(pair.contains(&tok("A.1.Alpha")));
    }

    #[test]
    fn side_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Side::BToA).ok().as_deref(), Some("2"));
        assert!(serde_json::from_str::<Side>("3").is_err());
    }
}
