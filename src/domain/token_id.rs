//! Fungible token and account identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DexError;

/// Storage aliases accepted in place of fully qualified token identifiers.
const ALIASES: [(&str, &str); 3] = [
    ("flowTokenVault", "A.0ae53cb6e3f42a79.FlowToken"),
    ("fusdVault", "A.f8d6e0586b0a20c7.FUSD"),
    ("emuTokenVault", "A.f8d6e0586b0a20c7.EmuToken"),
];

/// Identifier of a fungible token type, e.g. `A.f8d6e0586b0a20c7.FUSD`.
///
/// Identifiers are totally ordered by their string form. That order decides
/// which token of a pair is token A (see [`TokenPair`](super::TokenPair)).
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::TokenId;
///
/// let fusd = TokenId::resolve("fusdVault").expect("known alias");
/// assert_eq!(fusd.as_str(), "A.f8d6e0586b0a20c7.FUSD");
/// assert_eq!(fusd.vault_type(), "A.f8d6e0586b0a20c7.FUSD.Vault");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    /// Creates a token identifier from its fully qualified form.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] if `id` is empty or contains
    /// whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, DexError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DexError::InvalidToken("token identifier must not be empty"));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DexError::InvalidToken(
                "token identifier must not contain whitespace",
            ));
        }
        Ok(Self(id))
    }

    /// Resolves a storage alias (`fusdVault`) or passes a qualified
    /// identifier through unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`TokenId::new`].
    pub fn resolve(name: &str) -> Result<Self, DexError> {
        let qualified = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, id)| *id);
        Self::new(qualified)
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the vault-type name, e.g. `A.f8d6e0586b0a20c7.FUSD.Vault`, used to
    /// label fee deposits and reward claims.
    #[must_use]
    pub fn vault_type(&self) -> String {
        format!("{}.Vault", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque account address such as `0x01cf0e2f2f715450`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates an account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if `address` is empty.
    pub fn new(address: impl Into<String>) -> Result<Self, DexError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(DexError::InvalidConfiguration(
                "account address must not be empty".into(),
            ));
        }
        Ok(Self(address))
    }

    /// Returns the address string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve() {
        let Ok(flow) = TokenId::resolve("flowTokenVault") else {
            panic!("expected Ok");
        };
        assert_eq!(flow.as_str(), "A.0ae53cb6e3f42a79.FlowToken");
        let Ok(emu) = TokenId::resolve("emuTokenVault") else {
            panic!("expected Ok");
        };
        assert_eq!(emu.to_string(), "A.f8d6e0586b0a20c7.EmuToken");
    }

    #[test]
    fn qualified_passes_through() {
        let Ok(t) = TokenId::resolve("A.1234.Custom") else {
            panic!("expected Ok");
        };
        assert_eq!(t.as_str(), "A.1234.Custom");
    }

    #[test]
    fn invalid_identifiers_rejected() {
        assert!(matches!(TokenId::new(""), Err(DexError::InvalidToken(_))));
        assert!(matches!(TokenId::new("A. B"), Err(DexError::InvalidToken(_))));
        assert!(AccountId::new("  ").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let Ok(flow) = TokenId::resolve("flowTokenVault") else {
            panic!("expected Ok");
        };
        let Ok(fusd) = TokenId::resolve("fusdVault") else {
            panic!("expected Ok");
        };
        assert!(flow < fusd);
    }
}
