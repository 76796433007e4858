use crate::address::{AddressType, FullType};
use crate::chain::ChainAccess;
use crate::error::{ChainError, Result};
use crate::hash::Hash256;
use crate::store::{
    BlockHeader, BlockRecord, ChainStore, MemoryChain, OutputSummary, UtxoActivity,
};
use chrono::{DateTime, TimeZone, Utc};

pub const COINBASE_VALUE: u64 = 5_000_000_000;
pub const SPENT_PUBKEYHASH_VALUE: u64 = 2_000_000_000;

pub fn p2sh_p2wpkh() -> FullType {
    FullType::wrapped(
        AddressType::Scripthash,
        &FullType::of(AddressType::WitnessPubkeyhash),
    )
}

fn block_time(height: u32) -> DateTime<Utc> {
    Utc.timestamp_opt(1_231_006_505 + i64::from(height) * 600, 0)
        .single()
        .unwrap()
}

/// Linked records where block `h` creates a coinbase plus a wrapped witness
/// output of `1000 * (h + 1)`, and (for `h > 0`) spends the previous block's
/// wrapped output and a `pubkeyhash` output.
pub fn synthetic_records(count: u32) -> Vec<BlockRecord> {
    let mut prev_hash = Hash256::default();
    (0..count)
        .map(|height| {
            let hash = Hash256::double_sha256(&height.to_le_bytes());
            let mut spent = Vec::new();
            if height > 0 {
                spent.push(OutputSummary::with_full_type(
                    1_000 * u64::from(height),
                    AddressType::Scripthash,
                    p2sh_p2wpkh(),
                ));
                spent.push(OutputSummary::new(
                    SPENT_PUBKEYHASH_VALUE,
                    AddressType::Pubkeyhash,
                ));
            }
            let record = BlockRecord {
                header: BlockHeader {
                    hash,
                    prev_hash,
                    timestamp: block_time(height),
                    tx_count: height + 1,
                },
                activity: UtxoActivity {
                    created: vec![
                        OutputSummary::new(COINBASE_VALUE, AddressType::Pubkeyhash),
                        OutputSummary::with_full_type(
                            1_000 * u64::from(height + 1),
                            AddressType::Scripthash,
                            p2sh_p2wpkh(),
                        ),
                    ],
                    spent,
                },
            };
            prev_hash = hash;
            record
        })
        .collect()
}

pub fn chain(count: u32) -> ChainAccess {
    ChainAccess::new(MemoryChain::from_records(synthetic_records(count)).unwrap())
}

/// A store that knows its length but cannot read any block data.
pub struct FailingStore {
    pub length: u32,
}

impl ChainStore for FailingStore {
    fn len(&self) -> u32 {
        self.length
    }

    fn header(&self, _height: u32) -> Result<BlockHeader> {
        Err(ChainError::Unavailable("block files unmounted".into()))
    }

    fn utxo_activity(&self, _height: u32) -> Result<UtxoActivity> {
        Err(ChainError::Unavailable("utxo index unmounted".into()))
    }
}
