use clap::Parser;
use heatlink_tools::common::{build_session, init_tracing, ConnectionArgs};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "watch", about = "Periodically refresh the heater status")]
struct Args {
    #[command(flatten)]
    conn: ConnectionArgs,
    /// Refresh interval in milliseconds
    #[arg(long, default_value_t = 10_000)]
    interval: u64,
    /// Per-refresh poll timeout in milliseconds
    #[arg(long, default_value_t = 3000)]
    timeout: u64,
}

fn fmt_temp(c: Option<f64>) -> String {
    match c {
        Some(c) => format!("{c:.1}"),
        None => "n/a".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let session = build_session(&args.conn).await?;

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match session.poll_status(Duration::from_millis(args.timeout)).await {
            Ok(frame) => {
                let power = match frame.power_on {
                    Some(true) => "ON",
                    Some(false) => "OFF",
                    None => "UNKNOWN",
                };
                println!(
                    "power={power} room={} heater={}",
                    fmt_temp(frame.room_temperature_c),
                    fmt_temp(frame.heater_temperature_c)
                );
            }
            Err(err) if err.is_unavailable() => {
                warn!(error = %err, "device unavailable, retrying next cycle");
            }
            Err(err) => {
                warn!(error = %err, "refresh failed");
            }
        }
    }
}
