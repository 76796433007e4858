use chainwalk::prelude::*;
use chainwalk::ChainError;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "chainwalk",
    version,
    about = "Navigate and analyse an immutable chain snapshot"
)]
struct Cli {
    /// Chain snapshot path
    #[arg(long, default_value = "chain.snap")]
    chain: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show chain length, genesis and tip
    Info,
    /// Show one block and its neighbours
    Show { height: u32 },
    /// Follow the chain forward from a height
    Walk {
        from: u32,
        /// Max blocks to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Net UTXO value change per block over [from, to)
    NetValue {
        from: u32,
        to: u32,
        /// Split by full type signature instead of address type
        #[arg(long)]
        full: bool,
    },
    /// Parse and normalise a 32- or 20-byte hex identifier
    Hash { hex: String },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Commands::Info => cmd_info(&cli.chain),
        Commands::Show { height } => cmd_show(&cli.chain, height),
        Commands::Walk { from, limit } => cmd_walk(&cli.chain, from, limit),
        Commands::NetValue { from, to, full } => cmd_net_value(&cli.chain, from, to, full),
        Commands::Hash { hex } => cmd_hash(&hex),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_info(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let access = ChainAccess::open(path)?;
    println!("Blocks:  {}", access.chain_length());
    if let Some(genesis) = access.genesis() {
        println!("Genesis: {}", genesis.block_hash()?);
    }
    if let Some(tip) = access.tip() {
        println!(
            "Tip:     {} at height {} ({})",
            tip.block_hash()?,
            tip.height(),
            tip.block_time()?.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

fn cmd_show(path: &Path, height: u32) -> Result<(), Box<dyn std::error::Error>> {
    let access = ChainAccess::open(path)?;
    let block = access.block_at(height)?;
    println!("{}", block.summary()?);
    println!("  prev: {}", describe_height(block.prev_block()));
    println!("  next: {}", describe_height(block.next_block()));
    Ok(())
}

fn describe_height(block: Option<Block<'_>>) -> String {
    block
        .map(|b| b.height().to_string())
        .unwrap_or_else(|| "(none)".into())
}

fn cmd_walk(path: &Path, from: u32, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let access = ChainAccess::open(path)?;
    for block in access.walk_from(from)?.take(limit) {
        println!("{}", block.summary()?);
    }
    Ok(())
}

fn cmd_net_value(
    path: &Path,
    from: u32,
    to: u32,
    full: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let access = ChainAccess::open(path)?;
    let blocks = access.range(from..to)?;
    debug!(blocks = blocks.len(), full, "computing net values");
    if full {
        for (block, values) in blocks.iter().zip(blocks.net_full_type_value()) {
            let values = values?;
            println!("{}:", block.height());
            for (full_type, value) in &values {
                println!("  {:<32} {:>+16}", full_type, value);
            }
        }
    } else {
        for (block, values) in blocks.iter().zip(blocks.net_address_type_value()) {
            let values = values?;
            println!("{}:", block.height());
            for (address_type, value) in &values {
                println!("  {:<32} {:>+16}", address_type, value);
            }
        }
    }
    Ok(())
}

fn cmd_hash(hex: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (normalised, serialized) = match hex.len() {
        64 => {
            let h = Hash256::from_hex(hex)?;
            (h.to_hex(), serde_json::to_string(&h)?)
        }
        40 => {
            let h = Hash160::from_hex(hex)?;
            (h.to_hex(), serde_json::to_string(&h)?)
        }
        n => {
            return Err(ChainError::MalformedInput(format!(
                "expected 64 or 40 hex characters, got {}",
                n
            ))
            .into())
        }
    };
    println!("{}", normalised);
    println!("{}", serialized);
    Ok(())
}
