//! Net change of the unspent-output pool caused by one block, per bucket.
//!
//! Outputs a block creates count positive, outputs it spends count negative.
//! Nothing is cached; every call re-reads the bookkeeping through the block's
//! chain handle.

use crate::address::{AddressType, FullType};
use crate::block::Block;
use crate::error::{ChainError, Result};
use crate::store::OutputSummary;
use std::collections::BTreeMap;

pub type AddressTypeValues = BTreeMap<AddressType, i64>;
pub type FullTypeValues = BTreeMap<FullType, i64>;

/// Net value by coarse address type.
pub fn net_address_type_value(block: &Block<'_>) -> Result<AddressTypeValues> {
    net_value_by(block, |output| output.address_type)
}

/// Net value by full type signature.
pub fn net_full_type_value(block: &Block<'_>) -> Result<FullTypeValues> {
    net_value_by(block, |output| output.full_type.clone())
}

fn net_value_by<K, F>(block: &Block<'_>, key: F) -> Result<BTreeMap<K, i64>>
where
    K: Ord,
    F: Fn(&OutputSummary) -> K,
{
    let activity = block.utxo_activity()?;
    let mut totals = BTreeMap::new();
    for output in &activity.created {
        add(&mut totals, key(output), signed(output.value)?)?;
    }
    for output in &activity.spent {
        add(&mut totals, key(output), -signed(output.value)?)?;
    }
    Ok(totals)
}

fn signed(value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| ChainError::Corruption(format!("output value {} exceeds i64", value)))
}

fn add<K: Ord>(totals: &mut BTreeMap<K, i64>, key: K, delta: i64) -> Result<()> {
    let slot = totals.entry(key).or_insert(0);
    *slot = slot
        .checked_add(delta)
        .ok_or_else(|| ChainError::Corruption("net value overflow".into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainAccess;
    use crate::hash::Hash256;
    use crate::store::{BlockHeader, BlockRecord, MemoryChain, UtxoActivity};
    use crate::test_utils::{
        chain, p2sh_p2wpkh, FailingStore, COINBASE_VALUE, SPENT_PUBKEYHASH_VALUE,
    };
    use chrono::Utc;

    #[test]
    fn genesis_only_creates() {
        let access = chain(3);
        let genesis = access.block_at(0).unwrap();
        let values = net_address_type_value(&genesis).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[&AddressType::Pubkeyhash], COINBASE_VALUE as i64);
        assert_eq!(values[&AddressType::Scripthash], 1_000);
    }

    #[test]
    fn spends_are_subtracted() {
        let access = chain(3);
        let block = access.block_at(2).unwrap();
        let values = net_address_type_value(&block).unwrap();
        assert_eq!(
            values[&AddressType::Pubkeyhash],
            (COINBASE_VALUE - SPENT_PUBKEYHASH_VALUE) as i64
        );
        assert_eq!(values[&AddressType::Scripthash], 3_000 - 2_000);

        let full = net_full_type_value(&block).unwrap();
        assert_eq!(full[&p2sh_p2wpkh()], 1_000);
        assert_eq!(
            full[&FullType::of(AddressType::Pubkeyhash)],
            (COINBASE_VALUE - SPENT_PUBKEYHASH_VALUE) as i64
        );
    }

    #[test]
    fn net_value_can_be_negative_or_zero() {
        let record = BlockRecord {
            header: BlockHeader {
                hash: Hash256::double_sha256(b"only"),
                prev_hash: Hash256::default(),
                timestamp: Utc::now(),
                tx_count: 1,
            },
            activity: UtxoActivity {
                created: vec![
                    OutputSummary::new(10, AddressType::WitnessPubkeyhash),
                    OutputSummary::new(40, AddressType::Multisig),
                ],
                spent: vec![
                    OutputSummary::new(25, AddressType::WitnessPubkeyhash),
                    OutputSummary::new(40, AddressType::Multisig),
                ],
            },
        };
        let access = ChainAccess::new(MemoryChain::from_records(vec![record]).unwrap());
        let values = net_address_type_value(&access.block_at(0).unwrap()).unwrap();
        assert_eq!(values[&AddressType::WitnessPubkeyhash], -15);
        assert_eq!(values[&AddressType::Multisig], 0);
    }

    #[test]
    fn recomputed_on_every_call() {
        let access = chain(2);
        let block = access.block_at(1).unwrap();
        assert_eq!(
            net_full_type_value(&block).unwrap(),
            net_full_type_value(&block).unwrap()
        );
    }

    #[test]
    fn storage_failure_is_surfaced() {
        let access = ChainAccess::new(FailingStore { length: 1 });
        let err = net_address_type_value(&access.block_at(0).unwrap()).unwrap_err();
        assert!(matches!(err, ChainError::Unavailable(_)));
    }
}
