use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a log or exporting its tables
#[derive(Error, Debug)]
pub enum PharmlogError {
    /// The log file to parse does not exist
    #[error("Simulation log not found at {}", .path.display())]
    MissingInput { path: PathBuf },
    /// Reading the log or writing an export file failed
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A table could not be serialized to the delimited output
    #[error("CSV error: {0}")]
    Csv(String),
    /// Export options could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let missing = PharmlogError::MissingInput {
            path: PathBuf::from("run.log"),
        };
        assert_eq!(missing.to_string(), "Simulation log not found at run.log");

        let io = PharmlogError::Io {
            path: PathBuf::from("out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(io.to_string(), "I/O error on out: denied");
        assert!(std::error::Error::source(&io).is_some());

        assert_eq!(
            PharmlogError::Csv("bad record".into()).to_string(),
            "CSV error: bad record"
        );
        assert_eq!(
            PharmlogError::Config("missing field".into()).to_string(),
            "Invalid configuration: missing field"
        );
    }
}
