//! btleplug-backed implementation of the link traits.

use crate::{DeviceFinder, DeviceHandle, LinkError, NotificationSink, WriteMode};
use async_trait::async_trait;
use btleplug::api::{
    Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use heatlink_core::{NOTIFY_CHARACTERISTIC, WRITE_CHARACTERISTIC};
use tokio::task::JoinHandle;
use tracing::trace;
use uuid::Uuid;

impl From<btleplug::Error> for LinkError {
    fn from(err: btleplug::Error) -> Self {
        LinkError::Backend(err.to_string())
    }
}

impl From<WriteMode> for WriteType {
    fn from(mode: WriteMode) -> Self {
        match mode {
            WriteMode::WithResponse => WriteType::WithResponse,
            WriteMode::WithoutResponse => WriteType::WithoutResponse,
        }
    }
}

fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("invalid characteristic uuid constant")
}

/// Discovery backed by the first available system bluetooth adapter.
pub struct BtleFinder {
    adapter: Adapter,
}

impl BtleFinder {
    pub async fn new() -> Result<Self, LinkError> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(LinkError::AdapterUnavailable)?;
        Ok(Self { adapter })
    }
}

#[async_trait]
impl DeviceFinder for BtleFinder {
    type Handle = BtleHandle;

    async fn locate(&self, address: &str) -> Result<Option<BtleHandle>, LinkError> {
        // Scanning stays active across misses; the session polls us until
        // the advertisement shows up or its locate budget runs out.
        self.adapter.start_scan(ScanFilter::default()).await?;

        for peripheral in self.adapter.peripherals().await? {
            if peripheral.address().to_string().eq_ignore_ascii_case(address) {
                let _ = self.adapter.stop_scan().await;
                trace!(address, "located peripheral");
                return Ok(Some(BtleHandle::new(peripheral)));
            }
        }
        Ok(None)
    }
}

/// A live (or about-to-be-live) link to one peripheral.
pub struct BtleHandle {
    peripheral: Peripheral,
    write_char: Option<Characteristic>,
    notify_char: Option<Characteristic>,
    notify_task: Option<JoinHandle<()>>,
}

impl BtleHandle {
    fn new(peripheral: Peripheral) -> Self {
        Self {
            peripheral,
            write_char: None,
            notify_char: None,
            notify_task: None,
        }
    }

    fn characteristic(&self, which: &Option<Characteristic>, name: &'static str) -> Result<Characteristic, LinkError> {
        which.clone().ok_or(LinkError::CharacteristicMissing(name))
    }
}

#[async_trait]
impl DeviceHandle for BtleHandle {
    async fn connect(&mut self) -> Result<(), LinkError> {
        self.peripheral.connect().await?;
        self.peripheral.discover_services().await?;

        let write_uuid = parse_uuid(WRITE_CHARACTERISTIC);
        let notify_uuid = parse_uuid(NOTIFY_CHARACTERISTIC);
        let characteristics = self.peripheral.characteristics();

        self.write_char = characteristics.iter().find(|c| c.uuid == write_uuid).cloned();
        self.notify_char = characteristics.iter().find(|c| c.uuid == notify_uuid).cloned();

        if self.write_char.is_none() {
            return Err(LinkError::CharacteristicMissing("write"));
        }
        if self.notify_char.is_none() {
            return Err(LinkError::CharacteristicMissing("notify"));
        }
        Ok(())
    }

    async fn is_live(&self) -> bool {
        self.write_char.is_some() && self.peripheral.is_connected().await.unwrap_or(false)
    }

    async fn subscribe(&mut self, sink: NotificationSink) -> Result<(), LinkError> {
        let notify = self.characteristic(&self.notify_char, "notify")?;
        self.peripheral.subscribe(&notify).await?;

        let mut stream = self.peripheral.notifications().await?;
        let uuid = notify.uuid;
        // Forwarding task: the only work done on the delivery path is the
        // sink call, which by contract never blocks.
        self.notify_task = Some(tokio::spawn(async move {
            while let Some(notification) = stream.next().await {
                if notification.uuid == uuid {
                    sink(&notification.value);
                }
            }
        }));
        Ok(())
    }

    async fn write(&self, payload: &[u8], mode: WriteMode) -> Result<(), LinkError> {
        let write = self.characteristic(&self.write_char, "write")?;
        self.peripheral.write(&write, payload, mode.into()).await?;
        Ok(())
    }

    async fn read_notify(&self) -> Result<Vec<u8>, LinkError> {
        let notify = self.characteristic(&self.notify_char, "notify")?;
        Ok(self.peripheral.read(&notify).await?)
    }

    async fn teardown(&mut self) -> Result<(), LinkError> {
        if let Some(task) = self.notify_task.take() {
            task.abort();
        }

        let mut first_err = None;
        if let Some(notify) = self.notify_char.take() {
            if let Err(err) = self.peripheral.unsubscribe(&notify).await {
                first_err.get_or_insert(LinkError::from(err));
            }
        }
        self.write_char = None;

        if let Err(err) = self.peripheral.disconnect().await {
            first_err.get_or_insert(LinkError::from(err));
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
