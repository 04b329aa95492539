//! Identifier types.
//!
//! Asset identifiers are a newtype so they cannot be confused with other
//! strings (scenario names, file paths) flowing through the engine.

use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for an asset.
///
/// # Examples
///
/// ```
/// use finrisk_core::types::AssetId;
///
/// let id = AssetId::new("AAPL");
/// assert_eq!(id.as_str(), "AAPL");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetId(String);

impl AssetId {
    /// Creates a new asset ID.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
