//! Declare a block operation once, call it on a block or on any block range.
//!
//! [`ApplyToBlock`] says how a per-block function is applied to a receiver:
//! called directly on a [`Block`], mapped lazily over a range of blocks, or
//! mapped over the present slots of a range of `Option<Block>`. Ranges keep
//! their capability: random-access in, random-access out.
//!
//! [`BlockMethods`] is generated by `block_methods!` from a single body per
//! operation and implemented for every `ApplyToBlock` receiver.
//!
//! ```
//! use chainwalk::prelude::*;
//! # use chainwalk::store::MemoryChain;
//! # let access = ChainAccess::new(MemoryChain::new());
//! let heights: OptionalBlockRange<'_> = access.blocks().next_block();
//! assert_eq!(heights.len(), access.chain_length() as usize);
//! ```

use crate::address::{AddressType, FullType};
use crate::aggregate;
use crate::block::Block;
use crate::error::Result;
use crate::hash::Hash256;
use crate::range::{AnyRandomRange, AnyRange};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A receiver a per-block function can be applied to.
pub trait ApplyToBlock<'a>: Sized {
    /// What applying a function with result `R` yields.
    type Output<R: 'a>;

    fn apply<R, F>(self, f: F) -> Self::Output<R>
    where
        R: 'a,
        F: Fn(Block<'a>) -> R + 'a;
}

impl<'a> ApplyToBlock<'a> for Block<'a> {
    type Output<R: 'a> = R;

    fn apply<R, F>(self, f: F) -> R
    where
        R: 'a,
        F: Fn(Block<'a>) -> R + 'a,
    {
        f(self)
    }
}

impl<'a> ApplyToBlock<'a> for AnyRange<'a, Block<'a>> {
    type Output<R: 'a> = AnyRange<'a, R>;

    fn apply<R, F>(self, f: F) -> AnyRange<'a, R>
    where
        R: 'a,
        F: Fn(Block<'a>) -> R + 'a,
    {
        self.map(f)
    }
}

impl<'a> ApplyToBlock<'a> for AnyRandomRange<'a, Block<'a>> {
    type Output<R: 'a> = AnyRandomRange<'a, R>;

    fn apply<R, F>(self, f: F) -> AnyRandomRange<'a, R>
    where
        R: 'a,
        F: Fn(Block<'a>) -> R + 'a,
    {
        self.map(f)
    }
}

impl<'a> ApplyToBlock<'a> for AnyRange<'a, Option<Block<'a>>> {
    type Output<R: 'a> = AnyRange<'a, Option<R>>;

    fn apply<R, F>(self, f: F) -> AnyRange<'a, Option<R>>
    where
        R: 'a,
        F: Fn(Block<'a>) -> R + 'a,
    {
        self.map(move |slot| slot.map(&f))
    }
}

impl<'a> ApplyToBlock<'a> for AnyRandomRange<'a, Option<Block<'a>>> {
    type Output<R: 'a> = AnyRandomRange<'a, Option<R>>;

    fn apply<R, F>(self, f: F) -> AnyRandomRange<'a, Option<R>>
    where
        R: 'a,
        F: Fn(Block<'a>) -> R + 'a,
    {
        self.map(move |slot| slot.map(&f))
    }
}

/// Expands each `fn name(block) -> Ret { body }` into a default method of the
/// named trait that routes `body` through [`ApplyToBlock::apply`], then
/// implements the trait for every `ApplyToBlock` receiver.
macro_rules! block_methods {
    (
        $(#[$trait_meta:meta])*
        pub trait $trait_name:ident<$lt:lifetime> {
            $(
                $(#[$meta:meta])*
                fn $name:ident($block:ident) -> $ret:ty $body:block
            )*
        }
    ) => {
        $(#[$trait_meta])*
        pub trait $trait_name<$lt>: ApplyToBlock<$lt> {
            $(
                $(#[$meta])*
                fn $name(self) -> Self::Output<$ret> {
                    self.apply(|$block: Block<$lt>| -> $ret { $body })
                }
            )*
        }

        impl<$lt, T: ApplyToBlock<$lt>> $trait_name<$lt> for T {}
    };
}

block_methods! {
    /// Block operations. On a range, each one is evaluated per element as
    /// the range is consumed.
    pub trait BlockMethods<'a> {
        /// The block which follows this one in the chain, if any.
        fn next_block(block) -> Option<Block<'a>> {
            block.access().get_block(block.height().checked_add(1)?)
        }

        /// The block which comes before this one in the chain, if any.
        fn prev_block(block) -> Option<Block<'a>> {
            block.access().get_block(block.height().checked_sub(1)?)
        }

        fn block_height(block) -> u32 {
            block.height()
        }

        fn block_hash(block) -> Result<Hash256> {
            Ok(block.header()?.hash)
        }

        fn block_time(block) -> Result<DateTime<Utc>> {
            Ok(block.header()?.timestamp)
        }

        fn tx_count(block) -> Result<u32> {
            Ok(block.header()?.tx_count)
        }

        /// Net change in the UTXO pool after this block, split up by address type.
        fn net_address_type_value(block) -> Result<BTreeMap<AddressType, i64>> {
            aggregate::net_address_type_value(&block)
        }

        /// Net change in the UTXO pool after this block, split up by full type.
        fn net_full_type_value(block) -> Result<BTreeMap<FullType, i64>> {
            aggregate::net_full_type_value(&block)
        }
    }
}
