use crate::domain::ports::Chooser;
use crate::utils::error::{AmpyError, Result};
use inquire::{InquireError, Select};

/// Arrow-key selection in the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct InquireChooser;

impl Chooser for InquireChooser {
    fn choose_one(&self, prompt: &str, options: &[String]) -> Result<usize> {
        let choice = Select::new(prompt, options.to_vec())
            .with_help_message("↑↓ to move, enter to select")
            .raw_prompt()
            .map_err(|e| match e {
                InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                    AmpyError::PromptError {
                        message: e.to_string(),
                    }
                }
                other => AmpyError::ConfigError {
                    message: format!(
                        "several boards are attached and none could be chosen ({}); pass --port",
                        other
                    ),
                },
            })?;
        Ok(choice.index)
    }
}
