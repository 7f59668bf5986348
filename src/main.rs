//! pumpvol - pump.fun bonding-curve volume bot

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;
use tracing_subscriber::{fmt, EnvFilter};

use pumpvol::adapters::jito::{JitoClient, JitoConfig};
use pumpvol::adapters::solana::SolanaRpc;
use pumpvol::config::{AmountOverrides, BotConfig};
use pumpvol::domain::wallet::{generate_wallets, load_wallets};
use pumpvol::strategy::{self, TradeContext};

#[derive(Parser)]
#[command(name = "pumpvol", about = "pump.fun bonding-curve volume bot", version)]
struct CliApp {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json", global = true)]
    config: String,
    /// Path to the wallet store
    #[arg(long, default_value = "wallets.txt", global = true)]
    wallets: String,
    /// Path to the per-wallet buy amount overrides
    #[arg(long, default_value = "buyAmounts.json", global = true)]
    amounts: String,
    /// Info-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Debug-level logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bundle buys across all wallets in batches
    Bulk {
        mint: String,
    },
    /// Human-paced alternating buys and sells
    Human {
        mint: String,
        /// Minimum inter-action delay in seconds
        #[arg(long, default_value_t = 2.0)]
        min_delay: f64,
        /// Maximum inter-action delay in seconds
        #[arg(long, default_value_t = 8.0)]
        max_delay: f64,
        /// Fraction of balance sold per sell action
        #[arg(long, default_value_t = 0.5)]
        sell_fraction: f64,
        /// Rotations over the wallet set; omit to run until Ctrl+C
        #[arg(long)]
        rounds: Option<u64>,
    },
    /// Staggered buys, N passes over the wallet set
    Stagger {
        mint: String,
        #[arg(long, default_value_t = 1)]
        loops: u64,
    },
    /// Tight loop of minimal direct-send buys
    Micro {
        mint: String,
        /// Passes over the wallet set; omit to run until Ctrl+C
        #[arg(long)]
        rounds: Option<u64>,
    },
    /// Sell a fraction of every wallet's token balance
    Sell {
        mint: String,
        /// Fraction of each balance to sell
        #[arg(long, default_value_t = 1.0)]
        fraction: f64,
    },
    /// Give wallets organic history on a list of target tokens
    Warmup {
        /// Target mints to trade against
        #[arg(required = true)]
        mints: Vec<String>,
    },
    /// Distribute SOL from the funder wallet to every trading wallet
    Fund {
        /// Extra SOL added per wallet for fees and rent
        #[arg(long, default_value_t = 0.005)]
        headroom: f64,
    },
    /// Sell remainders and close token accounts
    Cleanup {
        mint: String,
    },
    /// Sweep all wallet SOL back to the collection wallet
    Refund {
        /// Destination address; defaults to devWallet from the config
        #[arg(long)]
        to: Option<String>,
    },
    /// Send every wallet's token balance to one receiver
    Transfer {
        mint: String,
        /// Receiver address; defaults to devWallet from the config
        #[arg(long)]
        to: Option<String>,
    },
    /// Print every wallet's SOL balance
    Balances,
    /// Generate wallets and append them to the store
    GenWallets {
        #[arg(default_value_t = 10)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets can live in .env rather than config.json.
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    // Wallet generation touches nothing but the store file.
    if let Command::GenWallets { count } = app.command {
        let wallets = generate_wallets(&app.wallets, count)
            .context("failed to generate wallets")?;
        for wallet in &wallets {
            println!("{}", wallet.pubkey());
        }
        println!("appended {} wallets to {}", wallets.len(), app.wallets);
        return Ok(());
    }

    let config = BotConfig::load(&app.config).context("failed to load configuration")?;
    let rpc = SolanaRpc::new(config.rpc.clone());
    let wallets = load_wallets(&app.wallets).context("failed to load wallet store")?;

    if let Command::Balances = app.command {
        let mut total = 0u64;
        for wallet in &wallets {
            let balance = rpc.get_balance(&wallet.pubkey()).await?;
            total += balance;
            println!("{}  {:.6} SOL", wallet.pubkey(), balance as f64 / 1e9);
        }
        println!("total: {:.6} SOL across {} wallets", total as f64 / 1e9, wallets.len());
        return Ok(());
    }

    let jito = JitoClient::new(
        JitoConfig::default()
            .with_endpoint(config.block_engine_url.clone())
            .with_tip_lamports(config.tip_lamports()),
    )?;
    let overrides =
        AmountOverrides::load(Path::new(&app.amounts)).context("failed to load amount overrides")?;
    let delay = Duration::from_secs_f64(config.delay);
    let ctx = TradeContext::new(rpc, jito, config, wallets, overrides)?;

    tokio::select! {
        result = dispatch(&ctx, &app.command, delay) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, exiting");
            Ok(())
        }
    }
}

async fn dispatch(ctx: &TradeContext, command: &Command, delay: Duration) -> Result<()> {
    let mut rng = rand::thread_rng();
    match command {
        Command::Bulk { mint } => {
            let params = strategy::bulk::BulkBuyParams {
                mint: parse_mint(mint)?,
                delay,
            };
            let volume = strategy::bulk::run(ctx, &params, &mut rng).await?;
            println!("total buy volume: {:.4} SOL", volume);
        }
        Command::Human {
            mint,
            min_delay,
            max_delay,
            sell_fraction,
            rounds,
        } => {
            let params = strategy::human::HumanParams {
                mint: parse_mint(mint)?,
                min_delay_secs: *min_delay,
                max_delay_secs: *max_delay,
                sell_fraction: *sell_fraction,
                rounds: *rounds,
            };
            strategy::human::run(ctx, &params, &mut rng).await?;
        }
        Command::Stagger { mint, loops } => {
            let params = strategy::stagger::StaggerParams {
                mint: parse_mint(mint)?,
                loops: *loops,
                delay,
            };
            let volume = strategy::stagger::run(ctx, &params, &mut rng).await?;
            println!("total buy volume: {:.4} SOL", volume);
        }
        Command::Micro { mint, rounds } => {
            let params = strategy::micro::MicroParams {
                mint: parse_mint(mint)?,
                delay,
                rounds: *rounds,
            };
            strategy::micro::run(ctx, &params).await?;
        }
        Command::Sell { mint, fraction } => {
            let params = strategy::sell::SellOffParams {
                mint: parse_mint(mint)?,
                fraction: *fraction,
                delay,
            };
            strategy::sell::run(ctx, &params, &mut rng).await?;
        }
        Command::Warmup { mints } => {
            let targets = mints
                .iter()
                .map(|m| {
                    Ok(strategy::warmup::WarmupTarget {
                        mint: parse_mint(m)?,
                        symbol: m.chars().take(8).collect(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let params = strategy::warmup::WarmupParams { targets, delay };
            strategy::warmup::run(ctx, &params, &mut rng).await?;
        }
        Command::Fund { headroom } => {
            let params = strategy::fund::FundParams {
                headroom_sol: *headroom,
            };
            strategy::fund::run(ctx, &params, &mut rng).await?;
        }
        Command::Cleanup { mint } => {
            let params = strategy::cleanup::CleanupParams {
                mint: parse_mint(mint)?,
                delay,
            };
            strategy::cleanup::run(ctx, &params, &mut rng).await?;
        }
        Command::Refund { to } => {
            let params = strategy::refund::RefundParams {
                destination: parse_destination(ctx, to.as_deref())?,
            };
            strategy::refund::run(ctx, &params).await?;
        }
        Command::Transfer { mint, to } => {
            let params = strategy::transfer::TransferParams {
                mint: parse_mint(mint)?,
                receiver: parse_destination(ctx, to.as_deref())?,
            };
            strategy::transfer::run(ctx, &params, &mut rng).await?;
        }
        Command::Balances | Command::GenWallets { .. } => unreachable!("handled before dispatch"),
    }
    Ok(())
}

fn parse_mint(raw: &str) -> Result<Pubkey> {
    Pubkey::from_str(raw.trim()).with_context(|| format!("invalid mint address: {raw}"))
}

/// Explicit `--to` address, falling back to the config's collection wallet.
fn parse_destination(ctx: &TradeContext, to: Option<&str>) -> Result<Pubkey> {
    match to {
        Some(raw) => {
            Pubkey::from_str(raw.trim()).with_context(|| format!("invalid address: {raw}"))
        }
        None => Ok(ctx.config.dev_wallet_pubkey()?),
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).init();
}
