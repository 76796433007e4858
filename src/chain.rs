//! The shared, read-only handle every [`Block`] and block range borrows.

use crate::apply::BlockMethods;
use crate::block::{AnyBlockRange, AnyOptionalBlockRange, Block, BlockRange, OptionalBlockRange};
use crate::error::{ChainError, Result};
use crate::range::{AnyRandomRange, AnyRange, IndexedSource};
use crate::store::{BlockHeader, ChainStore, MemoryChain, UtxoActivity};
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::path::Path;
use tracing::{debug, trace};

/// Access to a materialized chain.
///
/// Blocks and ranges hold `&ChainAccess`, so the handle outlives everything
/// derived from it. Nothing here mutates the underlying store.
pub struct ChainAccess {
    store: Box<dyn ChainStore>,
}

impl ChainAccess {
    pub fn new<S: ChainStore + 'static>(store: S) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Open a snapshot file as an in-memory chain.
    pub fn open(path: &Path) -> Result<Self> {
        let chain = MemoryChain::load(path)?;
        debug!(length = chain.len(), "chain access ready");
        Ok(Self::new(chain))
    }

    pub fn chain_length(&self) -> u32 {
        self.store.len()
    }

    /// The block at `height`, or `OutOfRange` if the chain is shorter.
    pub fn block_at(&self, height: u32) -> Result<Block<'_>> {
        Block::new(self, height)
    }

    /// The block at `height` if it exists.
    pub fn get_block(&self, height: u32) -> Option<Block<'_>> {
        (height < self.chain_length()).then(|| Block::new_unchecked(self, height))
    }

    pub fn genesis(&self) -> Option<Block<'_>> {
        self.get_block(0)
    }

    pub fn tip(&self) -> Option<Block<'_>> {
        self.chain_length()
            .checked_sub(1)
            .map(|height| Block::new_unchecked(self, height))
    }

    /// Every block, genesis first.
    pub fn blocks(&self) -> BlockRange<'_> {
        AnyRandomRange::new(HeightSpan {
            access: self,
            start: 0,
            len: self.chain_length() as usize,
        })
    }

    /// Blocks whose heights fall in `heights`. Bounds past the tip are `OutOfRange`.
    pub fn range<R: RangeBounds<u32>>(&self, heights: R) -> Result<BlockRange<'_>> {
        let length = self.chain_length();
        let (start, end) = resolve_heights(&heights, length);
        if end > u64::from(length) {
            return Err(ChainError::OutOfRange {
                height: (end - 1).min(u64::from(u32::MAX)) as u32,
                length,
            });
        }
        if start > end {
            return Err(ChainError::OutOfRange {
                height: start.min(u64::from(u32::MAX)) as u32,
                length,
            });
        }
        trace!(start, end, "block range");
        Ok(AnyRandomRange::new(HeightSpan {
            access: self,
            start: start as u32,
            len: (end - start) as usize,
        }))
    }

    /// One slot per height in `heights`; slots past the tip are `None`.
    /// An open end stops at the tip, an inverted range is empty.
    pub fn optional_blocks<R: RangeBounds<u32>>(&self, heights: R) -> OptionalBlockRange<'_> {
        let (start, end) = resolve_heights(&heights, self.chain_length());
        AnyRandomRange::new(OptionalSpan {
            access: self,
            start: start.min(u64::from(u32::MAX)) as u32,
            len: end.saturating_sub(start) as usize,
        })
    }

    /// Look up arbitrary heights lazily, in the order given.
    pub fn blocks_at<'a, I>(&'a self, heights: I) -> AnyOptionalBlockRange<'a>
    where
        I: IntoIterator<Item = u32>,
        I::IntoIter: 'a,
    {
        AnyRange::new(heights.into_iter().map(move |h| self.get_block(h)))
    }

    /// Follow `next_block` from `height` until the tip.
    pub fn walk_from(&self, height: u32) -> Result<AnyBlockRange<'_>> {
        let first = self.block_at(height)?;
        Ok(AnyRange::successors(Some(first), |block| block.next_block()))
    }

    pub(crate) fn header(&self, height: u32) -> Result<BlockHeader> {
        self.store.header(height)
    }

    pub(crate) fn utxo_activity(&self, height: u32) -> Result<UtxoActivity> {
        self.store.utxo_activity(height)
    }
}

impl fmt::Debug for ChainAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainAccess")
            .field("chain_length", &self.chain_length())
            .finish()
    }
}

/// Half-open `[start, end)` in u64 so `..=u32::MAX` and excluded `u32::MAX` starts stay exact.
fn resolve_heights<R: RangeBounds<u32>>(heights: &R, length: u32) -> (u64, u64) {
    let start = match heights.start_bound() {
        Bound::Included(&s) => u64::from(s),
        Bound::Excluded(&s) => u64::from(s) + 1,
        Bound::Unbounded => 0,
    };
    let end = match heights.end_bound() {
        Bound::Included(&e) => u64::from(e) + 1,
        Bound::Excluded(&e) => u64::from(e),
        Bound::Unbounded => u64::from(length),
    };
    (start, end)
}

/// Contiguous heights known to be inside the chain.
struct HeightSpan<'a> {
    access: &'a ChainAccess,
    start: u32,
    len: usize,
}

impl<'a> IndexedSource<Block<'a>> for HeightSpan<'a> {
    fn len(&self) -> usize {
        self.len
    }

    fn at(&self, index: usize) -> Block<'a> {
        Block::new_unchecked(self.access, self.start + index as u32)
    }
}

/// Contiguous heights that may run past the tip.
struct OptionalSpan<'a> {
    access: &'a ChainAccess,
    start: u32,
    len: usize,
}

impl<'a> IndexedSource<Option<Block<'a>>> for OptionalSpan<'a> {
    fn len(&self) -> usize {
        self.len
    }

    fn at(&self, index: usize) -> Option<Block<'a>> {
        u32::try_from(index)
            .ok()
            .and_then(|i| self.start.checked_add(i))
            .and_then(|height| self.access.get_block(height))
    }
}
