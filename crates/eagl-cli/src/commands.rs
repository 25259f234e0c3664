use anyhow::{bail, Context};
use colored::Colorize;
use eagl_ledger::{Ledger, LedgerConfig, LedgerError, LedgerReader, LedgerWriter};
use eagl_server::{EaglServer, NodeConfig};
use eagl_store::FileChainStore;
use eagl_types::{timestamp, Block};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

/// Read the config file named on the command line (or defaults) and apply
/// flag overrides.
pub fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config =
        NodeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(data) = &cli.data {
        config.ledger.data_file = data.clone();
    }
    debug!(
        config = ?cli.config,
        data_file = %config.ledger.data_file.display(),
        "configuration resolved"
    );
    Ok(config)
}

pub fn run_command(cli: Cli, config: NodeConfig) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::Init => cmd_init(&config.ledger, format),
        Command::Status => cmd_status(&config, format),
        Command::Show(args) => cmd_show(&config.ledger, args, format),
        Command::Append(args) => cmd_append(&config.ledger, args, format),
        Command::Verify => cmd_verify(&config.ledger, format),
        Command::Reinit(args) => cmd_reinit(&config.ledger, args, format),
    }
}

fn open(config: &LedgerConfig) -> anyhow::Result<Ledger> {
    Ledger::open(config)
        .with_context(|| format!("failed to open chain at {}", config.data_file.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_block(block: &Block) {
    println!("{} {}", "Block".bold(), format!("#{}", block.index()).yellow().bold());
    println!("  hash:      {}", block.hash().to_hex().cyan());
    println!("  prev_hash: {}", block.prev_hash().to_storage_text().dimmed());
    println!("  timestamp: {}", timestamp::format(block.timestamp()));
    println!("  data:      {}", block.payload());
}

fn cmd_serve(mut config: NodeConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let server = EaglServer::new(config).context("failed to start node")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_init(config: &LedgerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let existed = FileChainStore::new(&config.data_file).exists();
    let head = open(config)?.head()?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "path": config.data_file.display().to_string(),
            "created": !existed,
            "blocks": head.length,
        })),
        OutputFormat::Text => {
            if existed {
                println!(
                    "Chain already present at {} ({} blocks)",
                    config.data_file.display().to_string().bold(),
                    head.length
                );
            } else {
                println!(
                    "{} Initialized chain at {}",
                    "✓".green().bold(),
                    config.data_file.display().to_string().bold()
                );
                println!("  Genesis: {}", head.block.hash().to_hex().cyan());
            }
            Ok(())
        }
    }
}

fn cmd_status(config: &NodeConfig, format: OutputFormat) -> anyhow::Result<()> {
    let head = open(&config.ledger)?.head()?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "node": config.node_name,
            "blocks": head.length,
            "last_block": head.block,
        })),
        OutputFormat::Text => {
            println!("{}", config.node_name.bold());
            println!("Chain: {}", config.ledger.data_file.display());
            println!("Blocks: {}", head.length.to_string().bold());
            print_block(&head.block);
            Ok(())
        }
    }
}

fn cmd_show(config: &LedgerConfig, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = open(config)?;
    let block = match args.index {
        Some(index) => match ledger.get_by_index(index)? {
            Some(block) => block,
            None => bail!("no block at index {index} (chain has {} blocks)", ledger.len()?),
        },
        None => ledger.latest()?,
    };
    match format {
        OutputFormat::Json => print_json(&block),
        OutputFormat::Text => {
            print_block(&block);
            Ok(())
        }
    }
}

fn cmd_append(config: &LedgerConfig, args: AppendArgs, format: OutputFormat) -> anyhow::Result<()> {
    let block = open(config)?.append(&args.data)?;
    match format {
        OutputFormat::Json => print_json(&block),
        OutputFormat::Text => {
            println!("{} Appended block", "✓".green().bold());
            print_block(&block);
            Ok(())
        }
    }
}

fn cmd_verify(config: &LedgerConfig, format: OutputFormat) -> anyhow::Result<()> {
    // Open without verifying so a broken chain is reported here, not refused.
    let config = LedgerConfig {
        verify_on_load: false,
        ..config.clone()
    };
    match open(&config)?.verify_chain() {
        Ok(blocks) => {
            match format {
                OutputFormat::Json => print_json(&json!({ "ok": true, "blocks": blocks }))?,
                OutputFormat::Text => {
                    println!("{} Chain verified", "✓".green().bold());
                    println!("  Blocks: {}", blocks.to_string().bold());
                }
            }
            Ok(())
        }
        Err(LedgerError::Verification(e)) => {
            match format {
                OutputFormat::Json => print_json(&json!({
                    "ok": false,
                    "error": e.to_string(),
                    "index": e.index,
                    "kind": e.kind,
                }))?,
                OutputFormat::Text => {
                    println!("{} Chain verification failed", "✗".red().bold());
                    println!("  Index: {}", e.index.to_string().yellow());
                    println!("  Kind:  {}", e.kind.to_string().red());
                }
            }
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_reinit(config: &LedgerConfig, args: ReinitArgs, format: OutputFormat) -> anyhow::Result<()> {
    if !args.force {
        bail!(
            "refusing to discard the chain at {} without --force",
            config.data_file.display()
        );
    }
    let store = FileChainStore::new(&config.data_file);
    let (chain, moved) = store.reinitialize(&config.genesis_payload)?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "path": config.data_file.display().to_string(),
            "moved_to": moved.as_ref().map(|p| p.display().to_string()),
            "blocks": chain.len(),
        })),
        OutputFormat::Text => {
            if let Some(moved) = &moved {
                println!("Previous chain kept at {}", moved.display().to_string().yellow());
            }
            println!(
                "{} New chain at {}",
                "✓".green().bold(),
                config.data_file.display().to_string().bold()
            );
            Ok(())
        }
    }
}
