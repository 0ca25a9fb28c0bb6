//! Command-line layer: argument parsing, config merging and error output.

use std::io;

use anyhow::Result;

use crate::errors::ExtractError;

mod args;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, print_usage, wants_usage};
pub use exit_status::ExitStatus;
pub use report::print_error;

/// Run one extraction.
///
/// Extraction errors are reported on stderr and turn into
/// `ExitStatus::Error`; other failures (config, rendering) are returned.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    match run::run(args) {
        Ok(()) => Ok(ExitStatus::Success),
        Err(err) => match err.downcast_ref::<ExtractError>() {
            Some(extract_err) => {
                print_error(extract_err, &mut io::stderr().lock());
                Ok(ExitStatus::Error)
            }
            None => Err(err),
        },
    }
}
