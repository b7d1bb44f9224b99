use crate::domain::model::MpyBoard;
use crate::domain::ports::Chooser;
use crate::utils::error::{AmpyError, Result};

pub const SINGLE_BOARD_PROMPT: &str = "Please choose a single board";

/// Picks one board, asking only when there is more than one.
pub fn select_single<C: Chooser + ?Sized>(mut boards: Vec<MpyBoard>, chooser: &C) -> Result<MpyBoard> {
    match boards.len() {
        0 => Err(AmpyError::NoBoardsDetected),
        1 => Ok(boards.remove(0)),
        _ => {
            let labels: Vec<String> = boards.iter().map(ToString::to_string).collect();
            let index = chooser.choose_one(SINGLE_BOARD_PROMPT, &labels)?;
            if index >= boards.len() {
                return Err(AmpyError::PromptError {
                    message: format!("choice {} is out of range", index),
                });
            }
            Ok(boards.swap_remove(index))
        }
    }
}
