use std::process::ExitCode;

/// Exit status of the extractor.
///
/// - `Success` (0): catalog written
/// - `Error` (1): usage shown, bad arguments, or the run aborted
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Catalog written.
    Success,
    /// Usage shown, bad arguments, or an extraction/output error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(1),
        }
    }
}
