use clap::Parser;
use heatlink_tools::common::{build_session, init_tracing, ConnectionArgs};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "status", about = "Poll the heater for its current status")]
struct Args {
    #[command(flatten)]
    conn: ConnectionArgs,
    /// Poll timeout in milliseconds
    #[arg(long, default_value_t = 3000)]
    timeout: u64,
    /// Emit the decoded frame as JSON
    #[arg(long)]
    json: bool,
    /// Include the raw frame bytes in the plain output
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let session = build_session(&args.conn).await?;
    let frame = session
        .poll_status(Duration::from_millis(args.timeout))
        .await?;
    session.disconnect().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
        return Ok(());
    }

    match frame.power_on {
        Some(true) => println!("power:  ON"),
        Some(false) => println!("power:  OFF"),
        None => println!("power:  UNKNOWN"),
    }
    match frame.room_temperature_c {
        Some(c) => println!("room:   {c:.1} C"),
        None => println!("room:   n/a"),
    }
    match frame.heater_temperature_c {
        Some(c) => println!("heater: {c:.1} C"),
        None => println!("heater: n/a"),
    }
    if args.raw {
        match frame.raw {
            Some(bytes) => println!("raw:    {}", hex::encode_upper(bytes)),
            None => println!("raw:    n/a"),
        }
    }

    Ok(())
}
