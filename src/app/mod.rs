pub mod devices;
pub mod logs;

#[cfg(feature = "cli")]
use crate::adapters::spinner::Spinner;
use crate::domain::model::MpyBoard;
use crate::domain::ports::BoardDiscovery;
use crate::utils::error::Result;

pub const FINDING_MESSAGE: &str = "Finding boards connected to your computer";

/// Runs discovery behind a terminal spinner.
pub async fn find_boards(discovery: &dyn BoardDiscovery, port: Option<&str>) -> Result<Vec<MpyBoard>> {
    #[cfg(feature = "cli")]
    let spinner = Spinner::start(FINDING_MESSAGE);

    let result = discovery.find_boards(port).await;

    #[cfg(feature = "cli")]
    match &result {
        Ok(_) => spinner.succeed(&spinner_outcome(&result)),
        Err(_) => spinner.fail(&spinner_outcome(&result)),
    }

    result
}

/// Final spinner line. Errors are left to the caller, which prints them once.
pub fn spinner_outcome(result: &Result<Vec<MpyBoard>>) -> String {
    match result {
        Ok(boards) => format!("{} ({} found)", FINDING_MESSAGE, boards.len()),
        Err(_) => FINDING_MESSAGE.to_string(),
    }
}
