use crate::app::find_boards;
use crate::core::logs::{LogOptions, LogStreamer, StreamSummary, LOG_READ_TICK};
use crate::core::select::select_single;
use crate::domain::model::MpyBoard;
use crate::domain::ports::{BoardDiscovery, Chooser, SerialOpener};
use crate::utils::error::{AmpyError, Result};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Discovers boards and narrows them down to the one to stream from.
pub async fn select_board(
    discovery: &dyn BoardDiscovery,
    chooser: &dyn Chooser,
    port: Option<&str>,
) -> Result<MpyBoard> {
    let boards = find_boards(discovery, port).await?;
    select_single(boards, chooser)
}

/// Streams the output of `board` to stdout until `stop` is raised.
pub async fn run<O: SerialOpener>(
    opener: Arc<O>,
    board: &MpyBoard,
    options: LogOptions,
    stop: Arc<AtomicBool>,
) -> Result<StreamSummary> {
    println!("Streaming output for: {}.", board);
    if !options.reset {
        println!("You may need to reset the device once.");
    }

    let (summary, _) = stream(opener, board, std::io::stdout(), options, stop).await?;
    tracing::info!("Streamed {} bytes from {}", summary.bytes, board.port);
    Ok(summary)
}

/// Opens `board` and copies its output into `sink` on a blocking task.
///
/// The port is left untouched when `stop` is already raised.
pub async fn stream<O, W>(
    opener: Arc<O>,
    board: &MpyBoard,
    sink: W,
    options: LogOptions,
    stop: Arc<AtomicBool>,
) -> Result<(StreamSummary, W)>
where
    O: SerialOpener,
    W: Write + Send + 'static,
{
    let port = board.port.clone();
    let baud = board.baud;

    tokio::task::spawn_blocking(move || {
        if stop.load(Ordering::Relaxed) {
            tracing::debug!("Stop requested before opening {}", port);
            return Ok((StreamSummary { bytes: 0 }, sink));
        }
        let link = opener.open(&port, baud, LOG_READ_TICK)?;
        let mut streamer = LogStreamer::new(link, sink, options);
        let summary = streamer.run(&stop)?;
        Ok((summary, streamer.into_sink()))
    })
    .await
    .map_err(|e| AmpyError::TaskError {
        message: e.to_string(),
    })?
}
