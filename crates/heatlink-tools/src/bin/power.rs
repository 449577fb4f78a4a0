use clap::Parser;
use heatlink_tools::common::{build_session, init_tracing, parse_bool, ConnectionArgs};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "power", about = "Switch the heater on or off")]
struct Args {
    #[command(flatten)]
    conn: ConnectionArgs,
    /// Target state: on/off, true/false, 1/0
    #[arg(value_parser = parse_bool)]
    state: bool,
    /// Confirmation deadline in milliseconds
    #[arg(long, default_value_t = 4000)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let session = build_session(&args.conn).await?;
    let result = session
        .set_power(args.state, Duration::from_millis(args.timeout))
        .await?;
    session.disconnect().await;

    let target = if args.state { "ON" } else { "OFF" };
    if result.is_confirmed() {
        println!("power {target} (confirmed)");
    } else {
        println!("power {target} (unconfirmed, committed optimistically)");
    }

    Ok(())
}
