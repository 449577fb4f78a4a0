//! Blocking facade over [`HeaterSession`] for callers without a runtime.

use crate::{HeaterSession, PowerResult, SessionConfig, SessionError};
use heatlink_ble::{BtleFinder, LinkError};
use heatlink_core::StatusFrame;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;

#[derive(Debug, Error)]
pub enum SyncClientError {
    #[error("runtime init error: {0}")]
    RuntimeInit(std::io::Error),
    #[error("link error: {0}")]
    Link(#[from] LinkError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

pub struct SyncHeaterClient {
    runtime: Runtime,
    session: HeaterSession<BtleFinder>,
}

impl SyncHeaterClient {
    pub fn connect(address: &str) -> Result<Self, SyncClientError> {
        Self::connect_with_config(address, SessionConfig::default())
    }

    pub fn connect_with_config(
        address: &str,
        config: SessionConfig,
    ) -> Result<Self, SyncClientError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(SyncClientError::RuntimeInit)?;
        let finder = runtime.block_on(BtleFinder::new())?;
        let session = HeaterSession::with_config(finder, address, config);
        runtime.block_on(session.ensure_connected())?;
        Ok(Self { runtime, session })
    }

    pub fn config(&self) -> SessionConfig {
        self.session.config()
    }

    pub fn last(&self) -> StatusFrame {
        self.session.last()
    }

    pub fn poll_status(&self, timeout: Duration) -> Result<StatusFrame, SyncClientError> {
        self.runtime
            .block_on(self.session.poll_status(timeout))
            .map_err(SyncClientError::Session)
    }

    pub fn set_power(
        &self,
        target_on: bool,
        timeout: Duration,
    ) -> Result<PowerResult, SyncClientError> {
        self.runtime
            .block_on(self.session.set_power(target_on, timeout))
            .map_err(SyncClientError::Session)
    }

    pub fn disconnect(&self) {
        self.runtime.block_on(self.session.disconnect());
    }
}

impl Drop for SyncHeaterClient {
    fn drop(&mut self) {
        self.runtime.block_on(self.session.disconnect());
    }
}
