use crate::address::{AddressType, FullType};
use crate::compression;
use crate::error::{ChainError, Result};
use crate::hash::Hash256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const SNAPSHOT_VERSION: u32 = 1;

/// Read side of the materialized chain index.
///
/// Heights run from `0` to `len() - 1`. Implementations are never mutated
/// through this trait.
pub trait ChainStore {
    /// Number of blocks currently materialized.
    fn len(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Header data of the block at `height`.
    fn header(&self, height: u32) -> Result<BlockHeader>;

    /// Outputs created and spent by the block at `height`.
    fn utxo_activity(&self, height: u32) -> Result<UtxoActivity>;
}

/// Fixed-size header data of one block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    pub hash: Hash256,
    /// Hash of the preceding block (zero for genesis).
    pub prev_hash: Hash256,
    pub timestamp: DateTime<Utc>,
    pub tx_count: u32,
}

/// One output as seen by the UTXO bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSummary {
    pub value: u64,
    pub address_type: AddressType,
    pub full_type: FullType,
}

impl OutputSummary {
    pub fn new(value: u64, address_type: AddressType) -> Self {
        Self {
            value,
            address_type,
            full_type: FullType::of(address_type),
        }
    }

    pub fn with_full_type(value: u64, address_type: AddressType, full_type: FullType) -> Self {
        Self {
            value,
            address_type,
            full_type,
        }
    }
}

/// UTXO pool changes caused by a block: outputs it creates and outputs it spends.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UtxoActivity {
    pub created: Vec<OutputSummary>,
    pub spent: Vec<OutputSummary>,
}

/// A block as persisted in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockRecord {
    pub header: BlockHeader,
    #[serde(default)]
    pub activity: UtxoActivity,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    blocks: Vec<BlockRecord>,
}

/// In-memory chain store, loadable from an LZ4-compressed JSON snapshot.
#[derive(Debug, Default)]
pub struct MemoryChain {
    blocks: Vec<BlockRecord>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records in height order. Parent links are checked.
    pub fn from_records(blocks: Vec<BlockRecord>) -> Result<Self> {
        verify_links(&blocks)?;
        Ok(Self { blocks })
    }

    pub fn records(&self) -> &[BlockRecord] {
        &self.blocks
    }

    /// Load a snapshot written by [`MemoryChain::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let packed = fs::read(path)?;
        let raw = compression::decompress(&packed)?;
        let snapshot: Snapshot = serde_json::from_slice(&raw)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ChainError::Corruption(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if let Err(e) = verify_links(&snapshot.blocks) {
            warn!(path = %path.display(), error = %e, "snapshot failed integrity check");
            return Err(e);
        }
        info!(
            path = %path.display(),
            blocks = snapshot.blocks.len(),
            "loaded chain snapshot"
        );
        Ok(Self {
            blocks: snapshot.blocks,
        })
    }

    /// Write the chain as an LZ4-compressed JSON snapshot.
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            blocks: self.blocks.clone(),
        };
        let raw = serde_json::to_vec(&snapshot)?;
        let packed = compression::compress(&raw);
        debug!(
            path = %path.display(),
            raw_bytes = raw.len(),
            packed_bytes = packed.len(),
            "writing chain snapshot"
        );
        fs::write(path, packed)?;
        Ok(())
    }

    fn record(&self, height: u32) -> Result<&BlockRecord> {
        self.blocks
            .get(height as usize)
            .ok_or(ChainError::OutOfRange {
                height,
                length: self.len(),
            })
    }
}

impl ChainStore for MemoryChain {
    fn len(&self) -> u32 {
        self.blocks.len() as u32
    }

    fn header(&self, height: u32) -> Result<BlockHeader> {
        Ok(self.record(height)?.header)
    }

    fn utxo_activity(&self, height: u32) -> Result<UtxoActivity> {
        Ok(self.record(height)?.activity.clone())
    }
}

fn verify_links(blocks: &[BlockRecord]) -> Result<()> {
    let mut expected = Hash256::default();
    for (height, block) in blocks.iter().enumerate() {
        if block.header.prev_hash != expected {
            return Err(ChainError::Corruption(format!(
                "block at height {} has prev_hash {}, expected {}",
                height, block.header.prev_hash, expected
            )));
        }
        expected = block.header.hash;
    }
    Ok(())
}
