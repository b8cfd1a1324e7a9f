//! Logger installation for the binary

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
};

/// Install the global logger.
///
/// `base_level` is a `log` spec string such as `info` or
/// `bilerp_transform=trace,info`. Output goes to a rotating file under
/// `logs/`, every record is duplicated to stdout and warnings to stderr.
/// Keep the returned handle alive for the lifetime of the program.
pub fn setup_logging(base_level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_str(base_level)?
        .log_to_file(FileSpec::default().directory("logs"))
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
}
