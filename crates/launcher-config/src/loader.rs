//! Configuration loading from files and environment.

use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Load configuration from file, with environment overrides applied.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<LauncherConfig> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		let mut config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents)?,
			Some("json") => Self::from_json(&contents)?,
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		};

		Self::apply_env_overrides(&mut config);
		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<LauncherConfig> {
		toml::from_str(contents).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<LauncherConfig> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	/// Apply environment variable overrides
	fn apply_env_overrides(config: &mut LauncherConfig) {
		// Keep the signing key out of config files in deployments.
		if let Ok(key) = std::env::var("LAUNCHER_PRIVATE_KEY") {
			debug!("Overriding private key from environment");
			config.relay.private_key = key;
		}

		if let Ok(url) = std::env::var("LAUNCHER_RPC_URL") {
			debug!("Overriding RPC URL from environment");
			config.relay.rpc_url = url;
		}

		if let Ok(url) = std::env::var("LAUNCHER_BUNDLER_URL") {
			debug!("Overriding bundler URL from environment");
			config.relay.bundler_url = url;
		}

		if let Ok(url) = std::env::var("LAUNCHER_PAYMASTER_URL") {
			debug!("Overriding paymaster URL from environment");
			config.relay.paymaster_url = url;
		}
	}

	/// Validate configuration
	fn validate_config(config: &LauncherConfig) -> Result<()> {
		Self::check_private_key(&config.relay.private_key)?;

		for (name, url) in [
			("rpc_url", &config.relay.rpc_url),
			("bundler_url", &config.relay.bundler_url),
			("paymaster_url", &config.relay.paymaster_url),
		] {
			if !url.starts_with("http://") && !url.starts_with("https://") {
				anyhow::bail!("{} must be an http(s) URL: {}", name, url);
			}
		}

		for (name, address) in [
			("entry_point", &config.relay.entry_point),
			("account_factory", &config.relay.account_factory),
			("sale_address", &config.contracts.sale_address),
		] {
			Self::check_address(name, address)?;
		}

		if config.deployment.receipt_timeout_secs == 0 {
			anyhow::bail!("receipt_timeout_secs must be positive");
		}
		if config.deployment.poll_interval_secs >= config.deployment.receipt_timeout_secs {
			anyhow::bail!("poll_interval_secs must be shorter than receipt_timeout_secs");
		}

		Ok(())
	}

	fn check_private_key(key: &str) -> Result<()> {
		let hex_part = key
			.strip_prefix("0x")
			.ok_or_else(|| anyhow::anyhow!("Private key must start with 0x"))?;
		if hex_part.len() != 64 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
			anyhow::bail!("Private key must be 32 hex-encoded bytes");
		}
		Ok(())
	}

	fn check_address(name: &str, address: &str) -> Result<()> {
		let hex_part = address
			.strip_prefix("0x")
			.ok_or_else(|| anyhow::anyhow!("{} must start with 0x", name))?;
		if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
			anyhow::bail!("{} must be a 20-byte hex address: {}", name, address);
		}
		Ok(())
	}
}
