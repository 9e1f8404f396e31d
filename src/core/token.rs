//! Token and snapshot types.
//!
//! A [`Snapshot`] is one consistent ordered view of the full token list at
//! a point in time, held by either the editor or (conceptually) the
//! device. Order is significant: it determines on-device display and
//! selection order.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::constants::MAX_TOKEN_ID;

/// Token identity: a small non-negative integer, unique within a
/// snapshot and stable across edits. Never recomputed from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenId(pub u8);

impl TokenId {
    /// Highest assignable id (ids are one byte on the order-list wire).
    pub const MAX: TokenId = TokenId(MAX_TOKEN_ID);
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for TokenId {
    fn from(id: u8) -> Self {
        TokenId(id)
    }
}

/// Opaque secret material for one token.
///
/// Present only at creation time or when freshly entered; blanked once
/// transmitted. The bytes are zeroized on drop and never shown by the
/// `Debug` impl.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Secret(bytes)
    }

    /// The raw bytes, as the device's create operation expects them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty (a usage error for creation).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<{} bytes>)", self.0.len())
    }
}

impl From<Vec<u8>> for Secret {
    fn from(bytes: Vec<u8>) -> Self {
        Secret(bytes)
    }
}

/// One identity-bearing record: display name plus optional secret.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Identity key, unique within a snapshot.
    pub id: TokenId,
    /// Mutable display name.
    pub name: String,
    /// Secret material; `None` for tokens the device already holds.
    pub secret: Option<Secret>,
}

impl Token {
    /// A token without secret material (already known to the device).
    pub fn new(id: TokenId, name: impl Into<String>) -> Self {
        Token {
            id,
            name: name.into(),
            secret: None,
        }
    }

    /// A freshly entered token carrying its secret.
    pub fn with_secret(id: TokenId, name: impl Into<String>, secret: Secret) -> Self {
        Token {
            id,
            name: name.into(),
            secret: Some(secret),
        }
    }

    /// Whether this token carries usable secret material.
    pub fn has_secret(&self) -> bool {
        self.secret.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// An ordered sequence of tokens: one consistent view of the full list.
///
/// Ids MUST be unique within a snapshot; this is a caller precondition
/// and is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    tokens: Vec<Token>,
}

impl Snapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Snapshot { tokens: Vec::new() }
    }

    /// Build a snapshot from tokens, preserving their order.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Snapshot { tokens }
    }

    /// Append a token at the end of the list.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the snapshot holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The tokens in list order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Iterate over the tokens in list order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// The ids in list order.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.tokens.iter().map(|t| t.id)
    }

    /// Linear lookup by id. The reconciliation hot path uses
    /// [`IdentityIndex`](crate::sync::IdentityIndex) instead.
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Whether a token with the given id is present.
    pub fn contains(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }

    /// Drop all secret material from the retained tokens.
    ///
    /// Called after a successful sync so transmitted secrets are not kept
    /// around in the last-synced snapshot.
    pub fn strip_secrets(&mut self) {
        for token in &mut self.tokens {
            token.secret = None;
        }
    }

    /// Lowest unused id, excluding ids blocked because a deletion for
    /// them has not been durably reconciled yet in this editing session.
    ///
    /// Returns `None` when the id space is exhausted.
    pub fn next_free_id(&self, blocked: &[TokenId]) -> Option<TokenId> {
        (0..=MAX_TOKEN_ID)
            .map(TokenId)
            .find(|id| !self.contains(*id) && !blocked.contains(id))
    }
}

impl FromIterator<Token> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Snapshot {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
