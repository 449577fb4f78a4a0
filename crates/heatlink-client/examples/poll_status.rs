use heatlink_ble::BtleFinder;
use heatlink_client::HeaterSession;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let address = std::env::args()
        .nth(1)
        .ok_or("usage: poll_status <bluetooth-address>")?;

    let finder = BtleFinder::new().await?;
    let session = HeaterSession::new(finder, &address);

    let status = session.poll_status(Duration::from_secs(3)).await?;
    println!(
        "power: {:?} room: {:?} C heater: {:?} C",
        status.power_on, status.room_temperature_c, status.heater_temperature_c
    );

    session.disconnect().await;
    Ok(())
}
