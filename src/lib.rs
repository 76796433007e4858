//! Read-only navigation and lazy range analytics over an immutable chain.
//!
//! Everything starts from a [`ChainAccess`] handle. Blocks borrow it, ranges
//! of blocks borrow it, and every block operation in [`BlockMethods`] works
//! the same on a single block as on any range of blocks.

pub mod address;
pub mod aggregate;
pub mod apply;
pub mod block;
pub mod chain;
pub mod compression;
pub mod error;
pub mod hash;
pub mod range;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use apply::{ApplyToBlock, BlockMethods};
pub use block::Block;
pub use chain::ChainAccess;
pub use error::{ChainError, Result};
pub use hash::{Hash160, Hash256};

pub mod prelude {
    pub use crate::apply::{ApplyToBlock, BlockMethods};
    pub use crate::block::{
        AnyBlockRange, AnyOptionalBlockRange, Block, BlockRange, OptionalBlockRange,
    };
    pub use crate::chain::ChainAccess;
    pub use crate::hash::{Hash160, Hash256};
    pub use crate::range::{AnyRandomRange, AnyRange};
}
