//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are opaque strings; two ids of the same kind compare equal
//! iff their wrapped strings are equal. Freshly minted ids are UUIDv4
//! strings, but any non-empty string supplied by an outer layer is valid.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

/// Identifier of an asset release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseId(String);

macro_rules! impl_domain_id {
    ($t:ty) => {
        impl $t {
            /// Mint a fresh identifier (UUIDv4 string). Prefer passing ids
            /// explicitly in tests for determinism.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the wrapped string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_domain_id!(UserId);
impl_domain_id!(AssetId);
impl_domain_id!(ReleaseId);
