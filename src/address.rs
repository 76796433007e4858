use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of an output script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    Nonstandard,
    Pubkey,
    Pubkeyhash,
    MultisigPubkey,
    Scripthash,
    Multisig,
    Nulldata,
    WitnessPubkeyhash,
    WitnessScripthash,
    WitnessUnknown,
}

impl AddressType {
    pub const ALL: [AddressType; 10] = [
        AddressType::Nonstandard,
        AddressType::Pubkey,
        AddressType::Pubkeyhash,
        AddressType::MultisigPubkey,
        AddressType::Scripthash,
        AddressType::Multisig,
        AddressType::Nulldata,
        AddressType::WitnessPubkeyhash,
        AddressType::WitnessScripthash,
        AddressType::WitnessUnknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Nonstandard => "nonstandard",
            AddressType::Pubkey => "pubkey",
            AddressType::Pubkeyhash => "pubkeyhash",
            AddressType::MultisigPubkey => "multisig_pubkey",
            AddressType::Scripthash => "scripthash",
            AddressType::Multisig => "multisig",
            AddressType::Nulldata => "nulldata",
            AddressType::WitnessPubkeyhash => "witness_pubkeyhash",
            AddressType::WitnessScripthash => "witness_scripthash",
            AddressType::WitnessUnknown => "witness_unknown",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Full type signature of an output, including what a script hash wraps.
///
/// Examples: `pubkeyhash`, `scripthash/witness_pubkeyhash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullType(String);

impl FullType {
    pub fn of(address_type: AddressType) -> Self {
        Self(address_type.as_str().to_string())
    }

    /// A wrapper type (`scripthash`, `witness_scripthash`) around an inner signature.
    pub fn wrapped(outer: AddressType, inner: &FullType) -> Self {
        Self(format!("{}/{}", outer.as_str(), inner.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<AddressType> for FullType {
    fn from(address_type: AddressType) -> Self {
        Self::of(address_type)
    }
}

impl fmt::Display for FullType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
