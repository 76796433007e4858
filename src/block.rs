use crate::chain::ChainAccess;
use crate::error::{ChainError, Result};
use crate::range::{AnyRandomRange, AnyRange};
use crate::store::{BlockHeader, UtxoActivity};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A block identified by its height in one chain.
///
/// Borrows the [`ChainAccess`] it came from; copying is free. Navigation and
/// analytics live on [`crate::apply::BlockMethods`] so they also work on ranges.
#[derive(Clone, Copy)]
pub struct Block<'a> {
    access: &'a ChainAccess,
    height: u32,
}

/// Forward-only blocks.
pub type AnyBlockRange<'a> = AnyRange<'a, Block<'a>>;
/// Random-access blocks.
pub type BlockRange<'a> = AnyRandomRange<'a, Block<'a>>;
/// Forward-only chain positions that may be empty.
pub type AnyOptionalBlockRange<'a> = AnyRange<'a, Option<Block<'a>>>;
/// Random-access chain positions that may be empty.
pub type OptionalBlockRange<'a> = AnyRandomRange<'a, Option<Block<'a>>>;

impl<'a> Block<'a> {
    /// Fails with `OutOfRange` unless `height < access.chain_length()`.
    pub fn new(access: &'a ChainAccess, height: u32) -> Result<Self> {
        let length = access.chain_length();
        if height >= length {
            return Err(ChainError::OutOfRange { height, length });
        }
        Ok(Self::new_unchecked(access, height))
    }

    pub(crate) fn new_unchecked(access: &'a ChainAccess, height: u32) -> Self {
        Self { access, height }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The chain this block belongs to.
    pub fn access(&self) -> &'a ChainAccess {
        self.access
    }

    pub fn header(&self) -> Result<BlockHeader> {
        self.access.header(self.height)
    }

    pub(crate) fn utxo_activity(&self) -> Result<UtxoActivity> {
        self.access.utxo_activity(self.height)
    }

    /// Identity plus header fields. Fails if the header cannot be read.
    pub fn summary(&self) -> Result<String> {
        let header = self.header()?;
        Ok(format!(
            "Block(height={}, tx_count={}, hash={}, timestamp={})",
            self.height,
            header.tx_count,
            header.hash,
            header.timestamp.to_rfc3339()
        ))
    }
}

impl PartialEq for Block<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.access, other.access) && self.height == other.height
    }
}

impl Eq for Block<'_> {}

impl Hash for Block<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.access, state);
        self.height.hash(state);
    }
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block").field("height", &self.height).finish()
    }
}

/// Identity only; see [`Block::summary`] for header fields.
impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block(height={})", self.height)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::apply::BlockMethods;
    use crate::test_utils::chain;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(block: &Block<'_>) -> u64 {
        let mut hasher = DefaultHasher::new();
        block.hash(&mut hasher);
        hasher.finish()
    }

    proptest! {
        #[test]
        fn prop_next_then_prev_returns_home(len in 1u32..40, pick in any::<u32>()) {
            let access = chain(len);
            let block = access.block_at(pick % len).unwrap();
            match block.next_block() {
                Some(next) => prop_assert_eq!(next.prev_block(), Some(block)),
                None => prop_assert_eq!(block.height(), len - 1),
            }
        }

        #[test]
        fn prop_prev_is_one_lower(len in 1u32..40, pick in any::<u32>()) {
            let access = chain(len);
            let height = pick % len;
            let block = access.block_at(height).unwrap();
            if height == 0 {
                prop_assert_eq!(block.prev_block(), None);
            } else {
                prop_assert_eq!(block.prev_block(), Some(access.block_at(height - 1).unwrap()));
            }
        }

        #[test]
        fn prop_equality_tracks_height(len in 1u32..20, x in any::<u32>(), y in any::<u32>()) {
            let access = chain(len);
            let a = access.block_at(x % len).unwrap();
            let b = access.block_at(y % len).unwrap();
            prop_assert_eq!(a == b, a.height() == b.height());
            if a == b {
                prop_assert_eq!(hash_of(&a), hash_of(&b));
            }
        }
    }
}
