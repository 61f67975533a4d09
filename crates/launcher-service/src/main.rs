use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launcher_config::{ConfigLoader, LauncherConfig};
use launcher_core::{DeployError, DeployServiceBuilder};
use launcher_relay::implementations::{HttpRelay, RelaySettings};
use launcher_relay::RelayInterface;
use launcher_types::{Address, CollectionMetadata, DeploymentRequest};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nft-launcher")]
#[command(about = "Gasless NFT collection launcher", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(short, long, value_name = "FILE", default_value = "config/launcher.toml")]
	config: PathBuf,

	#[arg(long, env = "LAUNCHER_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Deploy an NFT collection through the sponsored relay
	Deploy {
		/// Collection name
		#[arg(long)]
		name: String,
		/// Collection symbol
		#[arg(long)]
		symbol: String,
		/// Base URI for token metadata
		#[arg(long)]
		base_uri: String,
		/// Mint price in native-currency units, e.g. "0.1"
		#[arg(long)]
		price: String,
		/// Maximum token supply
		#[arg(long)]
		max_supply: String,
		/// Collection description
		#[arg(long)]
		description: Option<String>,
		/// Collection image URL
		#[arg(long)]
		image_url: Option<String>,
		/// Collection banner URL
		#[arg(long)]
		banner_url: Option<String>,
		/// Project website
		#[arg(long)]
		website: Option<String>,
	},
	/// Validate the configuration file
	Validate,
	/// Print the smart-account address for the configured key
	ResolveAddress,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	let config = ConfigLoader::from_file(&cli.config).context("Failed to load configuration")?;

	match cli.command {
		Commands::Deploy {
			name,
			symbol,
			base_uri,
			price,
			max_supply,
			description,
			image_url,
			banner_url,
			website,
		} => {
			let metadata = if description.is_some()
				|| image_url.is_some()
				|| banner_url.is_some()
				|| website.is_some()
			{
				Some(CollectionMetadata {
					description,
					image_url,
					banner_url,
					website,
					twitter: None,
					discord: None,
				})
			} else {
				None
			};

			let request = DeploymentRequest {
				name,
				symbol,
				base_uri,
				price,
				max_supply,
				metadata,
			};
			deploy(&config, request).await
		}
		Commands::Validate => {
			info!("Configuration is valid");
			info!("Chain id: {}", config.relay.chain_id);
			info!("Sale contract: {}", config.contracts.sale_address);
			info!(
				"Receipt timeout: {}s",
				config.deployment.receipt_timeout_secs
			);
			Ok(())
		}
		Commands::ResolveAddress => {
			let relay = connect_relay(&config)?;
			let account = relay
				.smart_account_address()
				.await
				.context("Failed to resolve smart-account address")?;
			println!("{}", account);
			Ok(())
		}
	}
}

async fn deploy(config: &LauncherConfig, request: DeploymentRequest) -> Result<()> {
	info!("Deploying collection {:?}", request.name);

	// The relay holds the signing key for this attempt only.
	let relay = Arc::new(connect_relay(config)?);

	let caller = relay
		.smart_account_address()
		.await
		.context("Failed to resolve smart-account address")?;

	let target = Address::from_hex(&config.contracts.sale_address)
		.context("Invalid sale contract address")?;

	let service = Arc::new(
		DeployServiceBuilder::new(relay, target)
			.with_receipt_timeout(Duration::from_secs(config.deployment.receipt_timeout_secs))
			.build()
			.context("Failed to build deployment service")?,
	);

	// Ctrl+C abandons the local wait; the submitted operation may still land.
	let cancel = service.cancel_handle();
	tokio::spawn(async move {
		if signal::ctrl_c().await.is_ok() {
			cancel.cancel();
		}
	});

	match service.deploy(&request, Some(&caller)).await {
		Ok(outcome) => {
			info!(deployed = %outcome.deployed_address, "Deployment succeeded");
			let record = json!({
				"deployed_address": outcome.deployed_address.to_string(),
				"user_op_hash": outcome.user_op_hash.to_string(),
				"request": outcome.request,
			});
			println!("{}", serde_json::to_string_pretty(&record)?);
			Ok(())
		}
		Err(err) => {
			error!(stage = %err.stage(), "Deployment failed: {}", err);
			if matches!(err, DeployError::ReceiptTimeout { .. }) {
				error!("The operation may still land on-chain; retrying may deploy twice");
			}
			Err(err.into())
		}
	}
}

fn connect_relay(config: &LauncherConfig) -> Result<HttpRelay> {
	HttpRelay::connect(&RelaySettings {
		rpc_url: config.relay.rpc_url.clone(),
		bundler_url: config.relay.bundler_url.clone(),
		paymaster_url: config.relay.paymaster_url.clone(),
		chain_id: config.relay.chain_id,
		private_key: config.relay.private_key.clone(),
		entry_point: config.relay.entry_point.clone(),
		account_factory: config.relay.account_factory.clone(),
		account_salt: config.relay.account_salt,
		poll_interval: Duration::from_secs(config.deployment.poll_interval_secs),
	})
	.context("Failed to connect relay")
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}
