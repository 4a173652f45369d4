use clap::{Arg, ArgAction, Command};
use mintvault_chain::Pubkey;
use mintvault_core::{BackupPipeline, VaultConfig};
use mintvault_store::StorageBackend;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

fn cli() -> Command {
    let rpc_url = Arg::new("rpc-url")
        .long("rpc-url")
        .env("MINTVAULT_RPC_URL")
        .global(true)
        .default_value("https://api.mainnet-beta.solana.com")
        .help("JSON-RPC endpoint");
    let wallet = Arg::new("wallet")
        .long("wallet")
        .env("MINTVAULT_WALLET")
        .global(true)
        .help("Wallet address owning the tokens");
    let backup_dir = Arg::new("backup-dir")
        .long("backup-dir")
        .env("MINTVAULT_BACKUP_DIR")
        .global(true)
        .default_value("mintvault_backups")
        .help("Storage root directory");
    let timeout = Arg::new("timeout")
        .long("timeout")
        .value_parser(clap::value_parser!(u64))
        .global(true)
        .default_value("60")
        .help("Network timeout in seconds");

    Command::new("mintvault")
        .version(mintvault_core::VERSION)
        .about("Durable, verifiable local backups of on-chain tokens")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args([rpc_url, wallet, backup_dir, timeout])
        .subcommand(
            Command::new("check").about("Probe the RPC endpoint"),
        )
        .subcommand(
            Command::new("backup")
                .about("Back up one mint: metadata, media and record")
                .arg(Arg::new("mint").required(true).help("Mint address")),
        )
        .subcommand(
            Command::new("verify")
                .about("Verify a stored backup against its baseline")
                .arg(Arg::new("mint").required(true).help("Mint address"))
                .arg(
                    Arg::new("force-recompute")
                        .long("force-recompute")
                        .action(ArgAction::SetTrue)
                        .help("Accept the current bytes as the new baseline"),
                ),
        )
        .subcommand(
            Command::new("list").about("List stored backups for the wallet"),
        )
        .subcommand(
            Command::new("delete")
                .about("Remove one stored backup entirely")
                .arg(Arg::new("mint").required(true).help("Mint address")),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let matches = cli().get_matches();

    let rpc_url = Url::parse(matches.get_one::<String>("rpc-url").expect("has default"))?;
    let wallet: Pubkey = matches
        .get_one::<String>("wallet")
        .ok_or_else(|| anyhow::anyhow!("--wallet (or MINTVAULT_WALLET) is required"))?
        .parse()?;
    let backup_dir = PathBuf::from(matches.get_one::<String>("backup-dir").expect("has default"));
    let timeout = Duration::from_secs(*matches.get_one::<u64>("timeout").expect("has default"));

    let config = VaultConfig::new(rpc_url, wallet, backup_dir).with_timeout(timeout);
    let pipeline = BackupPipeline::from_config(&config).await?;

    match matches.subcommand() {
        Some(("check", _)) => {
            let version = pipeline.check_connection().await?;
            println!("connected (node version {version})");
        }
        Some(("backup", args)) => {
            let mint: Pubkey = args.get_one::<String>("mint").expect("required").parse()?;
            let report = pipeline.backup_mint(&mint).await?;

            println!("backed up: {}", report.name);
            println!("  media:   {}/{} assets", report.media_backed_up, report.media_found);
            if !report.errors.is_empty() {
                println!("  skipped:");
                for error in &report.errors {
                    println!("    - {error}");
                }
            }
        }
        Some(("verify", args)) => {
            let mint: Pubkey = args.get_one::<String>("mint").expect("required").parse()?;
            let force = args.get_flag("force-recompute");
            let (_, result) = pipeline.verify_mint(&mint, force).await?;

            println!("status:        {}", result.status);
            println!("media digest:  {}", result.media_hash);
            if !result.stored_hash.is_empty() {
                println!("baseline:      {}", result.stored_hash);
            }
            if !result.metadata_hash.is_empty() {
                println!("metadata:      {}", result.metadata_hash);
            }
            for error in &result.errors {
                println!("warning: {error}");
            }
            if result.status != mintvault_verify::VerificationStatus::Authentic {
                std::process::exit(1);
            }
        }
        Some(("list", _)) => {
            let records = pipeline.store().list_nfts(&wallet).await?;
            let stats = pipeline.store().backup_stats(&wallet).await?;

            for record in &records {
                let checked = record
                    .last_check
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{}  {}  verified={}  last_check={}",
                    record.nft_info.mint_address,
                    record.nft_info.display_name(),
                    record.verified,
                    checked,
                );
            }
            println!(
                "{} records, {} verified, {} media bytes",
                stats.total_nfts, stats.verified_count, stats.total_media_bytes
            );
        }
        Some(("delete", args)) => {
            let mint: Pubkey = args.get_one::<String>("mint").expect("required").parse()?;
            pipeline.store().delete_nft(&wallet, &mint).await?;
            println!("deleted backup for {mint}");
        }
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}
