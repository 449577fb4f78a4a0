use clap::Args;
use heatlink_ble::{BtleFinder, LinkError};
use heatlink_client::{HeaterSession, SessionConfig};
use std::time::Duration;

#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Bluetooth address of the heater controller
    #[arg(long)]
    pub address: String,
    /// Discovery budget in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub locate_timeout: u64,
    /// Link establishment attempts
    #[arg(long, default_value_t = 3)]
    pub connect_attempts: u8,
}

pub async fn build_session(
    args: &ConnectionArgs,
) -> Result<HeaterSession<BtleFinder>, LinkError> {
    let finder = BtleFinder::new().await?;

    let config = SessionConfig::default()
        .with_locate_timeout(Duration::from_millis(args.locate_timeout))
        .with_connect_attempts(args.connect_attempts);

    Ok(HeaterSession::with_config(finder, &args.address, config))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}

pub fn parse_bool(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(format!("invalid bool value: {input}")),
    }
}
