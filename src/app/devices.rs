use crate::app::find_boards;
use crate::domain::model::MpyBoard;
use crate::domain::ports::BoardDiscovery;
use crate::utils::error::Result;
use std::io::Write;

/// Lists every board that answers a soft reset.
pub async fn run<W: Write>(
    discovery: &dyn BoardDiscovery,
    port: Option<&str>,
    json: bool,
    out: &mut W,
) -> Result<Vec<MpyBoard>> {
    let boards = find_boards(discovery, port).await?;
    tracing::info!("Listing {} boards", boards.len());
    render(&boards, json, out)?;
    Ok(boards)
}

pub fn render<W: Write>(boards: &[MpyBoard], json: bool, out: &mut W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, boards)?;
        writeln!(out)?;
    } else {
        for board in boards {
            writeln!(out, "{}", board.describe())?;
        }
    }
    out.flush()?;
    Ok(())
}
