//! # Core Identifiers
//!
//! ## Clusters
//!
//! - **Chain**: `Hash`, `Address`, `ChainId`, `SubnetId`
//! - **Validators**: `NodeId`
//! - **Warp**: `MessageId`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::IdError;

/// A 32-byte hash (SHA-256 or Keccak-256 depending on the context).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

macro_rules! fixed_id {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width of the identifier in bytes.
            pub const LEN: usize = $len;

            /// The all-zero identifier.
            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            /// Raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Whether every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = IdError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let raw: [u8; $len] = bytes.try_into().map_err(|_| IdError::InvalidLength {
                    kind: stringify!($name),
                    expected: $len,
                    actual: bytes.len(),
                })?;
                Ok(Self(raw))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{})", stringify!($name), hex::encode(self.0))
            }
        }
    };
}

fixed_id!(
    /// Identifier of a blockchain. Messages name their source chain and
    /// addressed payloads name their destination chain with it.
    ChainId,
    32
);

fixed_id!(
    /// Identifier of a subnet: the validator set that secures one or more
    /// chains.
    SubnetId,
    32
);

fixed_id!(
    /// Identity of a validator node. Canonical validator ordering is by this
    /// value.
    NodeId,
    20
);

fixed_id!(
    /// Content hash of an unsigned warp message.
    MessageId,
    32
);

impl SubnetId {
    /// The primary network subnet.
    pub const PRIMARY_NETWORK: SubnetId = SubnetId([0u8; 32]);
}
