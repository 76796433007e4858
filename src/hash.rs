//! Fixed-width binary identifiers used to address blocks, transactions and addresses.
//!
//! Textual form follows the Bitcoin display convention: the stored bytes are
//! printed in reverse order as lowercase hex.

use crate::error::{ChainError, Result};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

macro_rules! fixed_hash {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Build from a slice that must be exactly `LEN` bytes long.
            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                let array: [u8; $len] = bytes.try_into().map_err(|_| {
                    ChainError::MalformedInput(format!(
                        "{} needs {} bytes, got {}",
                        stringify!($name),
                        $len,
                        bytes.len()
                    ))
                })?;
                Ok(Self(array))
            }

            /// Parse the display-order hex form produced by [`Self::to_hex`].
            pub fn from_hex(s: &str) -> Result<Self> {
                if s.len() != $len * 2 {
                    return Err(ChainError::MalformedInput(format!(
                        "{} hex must be {} characters, got {}",
                        stringify!($name),
                        $len * 2,
                        s.len()
                    )));
                }
                let mut bytes = [0u8; $len];
                hex::decode_to_slice(s, &mut bytes).map_err(|e| {
                    ChainError::MalformedInput(format!("{} hex: {}", stringify!($name), e))
                })?;
                bytes.reverse();
                Ok(Self(bytes))
            }

            pub fn to_hex(&self) -> String {
                let mut display = self.0;
                display.reverse();
                hex::encode(display)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ChainError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_hex(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        /// Serialized as a one-element tuple holding the hex string.
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                let mut tuple = serializer.serialize_tuple(1)?;
                tuple.serialize_element(&self.to_hex())?;
                tuple.end()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                struct HexTupleVisitor;

                impl<'de> Visitor<'de> for HexTupleVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, "a one-element tuple holding a {} hex string", stringify!($name))
                    }

                    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<$name, A::Error> {
                        let hex: String = seq
                            .next_element()?
                            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                        if seq.next_element::<de::IgnoredAny>()?.is_some() {
                            return Err(de::Error::invalid_length(2, &self));
                        }
                        $name::from_hex(&hex).map_err(de::Error::custom)
                    }
                }

                deserializer.deserialize_tuple(1, HexTupleVisitor)
            }
        }
    };
}

fixed_hash!(
    /// 32-byte identifier: block hashes and transaction ids.
    Hash256,
    32
);

fixed_hash!(
    /// 20-byte identifier: pubkey and script hashes behind addresses.
    Hash160,
    20
);

impl Hash256 {
    /// SHA-256 applied twice, the digest Bitcoin uses for block and transaction ids.
    pub fn double_sha256(data: &[u8]) -> Self {
        let first = Sha256::digest(data);
        Self(Sha256::digest(first).into())
    }
}
