use crate::domain::model::{MpyBoard, PortInfo};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A blocking, exclusively owned serial connection.
pub trait SerialLink: Send {
    fn port_name(&self) -> &str;

    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Reads whatever is available. `Ok(0)` means the read timeout elapsed with no data.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Discards bytes received but not yet read.
    fn clear_input(&mut self) -> Result<()>;
}

pub trait SerialOpener: Send + Sync + 'static {
    type Link: SerialLink + 'static;

    /// `read_timeout` bounds a single `read_chunk` call.
    fn open(&self, port: &str, baud: u32, read_timeout: Duration) -> Result<Self::Link>;

    fn list_ports(&self) -> Result<Vec<PortInfo>>;
}

#[async_trait]
pub trait BoardDiscovery: Send + Sync {
    /// Probes `port` alone when given, otherwise every candidate port.
    async fn find_boards(&self, port: Option<&str>) -> Result<Vec<MpyBoard>>;
}

pub trait Chooser {
    /// Returns the index of the chosen option.
    fn choose_one(&self, prompt: &str, options: &[String]) -> Result<usize>;
}
