//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use isobath::archive::ArchiveError;
use isobath::config::ConfigFileError;
use isobath::source::SourceError;
use isobath::FactoryError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Archive could not be opened, read or written
    Archive(ArchiveError),
    /// Source could not be set up
    Source(SourceError),
    /// Factory operation failed
    Factory(FactoryError),
    /// Verification found damaged levels
    VerifyFailed { problems: usize },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Factory(FactoryError::Archive(ArchiveError::Http(_)))
            | CliError::Archive(ArchiveError::Http(_)) => {
                eprintln!();
                eprintln!("Check that archive.url in config.ini is reachable and that the");
                eprintln!("server accepts PUT requests if the archive has to be built.");
            }
            CliError::Factory(FactoryError::Archive(ArchiveError::BadMagic))
            | CliError::Archive(ArchiveError::BadMagic) => {
                eprintln!();
                eprintln!("The configured archive path does not hold an isoline archive.");
                eprintln!("Remove it or point archive.path elsewhere, then run 'isobath build'.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Archive(e) => write!(f, "Archive error: {}", e),
            CliError::Source(e) => write!(f, "Source error: {}", e),
            CliError::Factory(e) => write!(f, "{}", e),
            CliError::VerifyFailed { problems } => {
                write!(f, "Archive verification found {} problem(s)", problems)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Archive(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Factory(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ArchiveError> for CliError {
    fn from(e: ArchiveError) -> Self {
        CliError::Archive(e)
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Source(e)
    }
}

impl From<FactoryError> for CliError {
    fn from(e: FactoryError) -> Self {
        CliError::Factory(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CliError::Config("bad".to_string()).to_string(),
            "Configuration error: bad"
        );
        assert_eq!(
            CliError::VerifyFailed { problems: 2 }.to_string(),
            "Archive verification found 2 problem(s)"
        );
    }

    #[test]
    fn test_factory_error_keeps_source() {
        use std::error::Error;
        let err: CliError = FactoryError::Archive(ArchiveError::MissingIndex).into();
        assert!(err.source().is_some());
    }
}
