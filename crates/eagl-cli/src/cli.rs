use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "eagl",
    about = "EAGL Node: a verifiable append-only block ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Node configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chain data file, overriding the configuration
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Every command except `serve` works on the data file directly; do not
/// run them against a file a live node is writing.
#[derive(Subcommand)]
pub enum Command {
    /// Run the node's HTTP API
    Serve(ServeArgs),
    /// Create the chain file with a genesis block if it does not exist
    Init,
    /// Show chain length and the latest block
    Status,
    /// Show one block (the latest by default)
    Show(ShowArgs),
    /// Append a block
    Append(AppendArgs),
    /// Verify the whole chain
    Verify,
    /// Move the chain file aside and start a new chain
    Reinit(ReinitArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address, overriding the configuration
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub index: Option<u64>,
}

#[derive(Args)]
pub struct AppendArgs {
    #[arg(id = "block_data", value_name = "DATA")]
    pub data: String,
}

#[derive(Args)]
pub struct ReinitArgs {
    /// Required: this discards the current chain
    #[arg(long)]
    pub force: bool,
}
