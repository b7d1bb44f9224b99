use crate::core::probe::detect_board;
use crate::domain::model::{MpyBoard, PortInfo, UsbIdentity};
use crate::domain::ports::{BoardDiscovery, SerialOpener};
use crate::utils::error::{AmpyError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Bounds a single read while probing, so the probe deadline is honoured closely.
pub const PROBE_READ_TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub baud: u32,
    pub probe_timeout: Duration,
    pub max_concurrent_probes: usize,
    /// Probe every serial port, not only USB ones.
    pub all_ports: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            baud: 115200,
            probe_timeout: Duration::from_millis(2000),
            max_concurrent_probes: 4,
            all_ports: false,
        }
    }
}

pub struct BoardFinder<O: SerialOpener> {
    opener: Arc<O>,
    options: DiscoveryOptions,
}

impl<O: SerialOpener> BoardFinder<O> {
    pub fn new(opener: O, options: DiscoveryOptions) -> Self {
        Self {
            opener: Arc::new(opener),
            options,
        }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub async fn detect_board(&self, port: &str, usb: Option<UsbIdentity>) -> Result<MpyBoard> {
        probe_port(
            Arc::clone(&self.opener),
            port.to_string(),
            usb,
            self.options.baud,
            self.options.probe_timeout,
        )
        .await
    }

    /// Enumerates serial ports off the async runtime; the OS lookup blocks.
    pub async fn list_ports(&self) -> Result<Vec<PortInfo>> {
        let opener = Arc::clone(&self.opener);
        tokio::task::spawn_blocking(move || opener.list_ports())
            .await
            .map_err(|e| AmpyError::TaskError {
                message: e.to_string(),
            })?
    }

    pub async fn candidate_ports(&self) -> Result<Vec<PortInfo>> {
        let ports = self.list_ports().await?;
        tracing::debug!("Found {} serial ports", ports.len());

        Ok(ports
            .into_iter()
            .filter(|info| self.options.all_ports || info.usb().is_some())
            .collect())
    }

    /// Probes every candidate port, skipping the ones that are not boards.
    pub async fn find_all(&self) -> Result<Vec<MpyBoard>> {
        let candidates = self.candidate_ports().await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let limit = Arc::new(Semaphore::new(self.options.max_concurrent_probes.max(1)));
        let mut probes = JoinSet::new();

        for info in candidates {
            let limit = Arc::clone(&limit);
            let opener = Arc::clone(&self.opener);
            let baud = self.options.baud;
            let timeout = self.options.probe_timeout;

            probes.spawn(async move {
                let _permit = limit.acquire_owned().await.map_err(|e| AmpyError::TaskError {
                    message: e.to_string(),
                })?;
                let usb = info.usb().cloned();
                probe_port(opener, info.name, usb, baud, timeout).await
            });
        }

        let mut boards = Vec::new();
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(Ok(board)) => boards.push(board),
                Ok(Err(e)) => tracing::debug!("Skipping port: {}", e),
                Err(e) => {
                    return Err(AmpyError::TaskError {
                        message: e.to_string(),
                    })
                }
            }
        }

        boards.sort_by(|a, b| a.port.cmp(&b.port));
        tracing::debug!("Detected {} boards", boards.len());
        Ok(boards)
    }
}

async fn probe_port<O: SerialOpener>(
    opener: Arc<O>,
    port: String,
    usb: Option<UsbIdentity>,
    baud: u32,
    timeout: Duration,
) -> Result<MpyBoard> {
    tokio::task::spawn_blocking(move || {
        let mut link = opener.open(&port, baud, PROBE_READ_TICK)?;
        detect_board(&mut link, baud, usb, timeout)
    })
    .await
    .map_err(|e| AmpyError::TaskError {
        message: e.to_string(),
    })?
}

#[async_trait]
impl<O: SerialOpener> BoardDiscovery for BoardFinder<O> {
    async fn find_boards(&self, port: Option<&str>) -> Result<Vec<MpyBoard>> {
        let boards = match port {
            Some(port) => {
                let usb = self
                    .list_ports()
                    .await
                    .ok()
                    .and_then(|ports| ports.into_iter().find(|info| info.name == port))
                    .and_then(|info| info.usb().cloned());
                vec![self.detect_board(port, usb).await?]
            }
            None => self.find_all().await?,
        };

        if boards.is_empty() {
            return Err(AmpyError::NoBoardsDetected);
        }
        Ok(boards)
    }
}
