//! Payrail gateway integration - entry point.
//!
//! Wires the orchestrator together from configuration and runs a preflight
//! check against the gateway: fetches the live subaccount set and reports
//! routing readiness.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use payrail_app::AppConfig;
use payrail_crypto::EncryptionCodec;
use payrail_gateway::{GatewayApi, HttpGateway};
use payrail_orchestrator::PaymentOrchestrator;
use payrail_routing::SubaccountSelector;
use payrail_telemetry::Telemetry;

/// Payrail card-payment gateway integration
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PAYRAIL_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    payrail_telemetry::init_logging();

    info!("Starting payrail v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(args.config.as_deref())?;
    info!(base_url = %config.gateway.base_url, "Configuration loaded");

    let gateway = HttpGateway::new(config.gateway.clone())?;
    let telemetry = Arc::new(Telemetry::new()?);
    let codec = EncryptionCodec::new(&config.crypto.encryption_key, &config.crypto.encryption_iv);
    let selector = SubaccountSelector::new(config.selection.clone());

    // Preflight: confirm the gateway is reachable and routing has at least
    // one active subaccount to work with.
    let response = gateway.list_subaccounts().await?;
    let subaccounts = response.data.unwrap_or_default();
    let active = subaccounts.iter().filter(|s| s.active).count();
    info!(
        total = subaccounts.len(),
        active, "Fetched subaccount set from gateway"
    );
    if active == 0 {
        warn!("No active subaccounts; initialize calls will fail until the gateway has one");
    }

    let orchestrator = PaymentOrchestrator::new(
        gateway,
        selector,
        codec,
        telemetry,
        config.orchestrator.clone(),
    );
    info!(?orchestrator, "Orchestrator ready");

    Ok(())
}
