//! Parsing of PK/PD simulation logs
//!
//! A simulation log interleaves several record shapes in one text stream:
//!
//! - continuous status lines (`t=  1.00h | A= ... | Effect= 12.00%`)
//! - multi-line assessment blocks opened by a `PATIENT ASSESSMENT` banner
//! - multi-line dose blocks opened by `--- DOSE ADMINISTERED ---`
//! - single-line event markers (naloxone rescue, phase transitions, critical states)
//!
//! Parsing is total: unknown or malformed lines are skipped, and every input
//! produces a [ParsedLog], possibly empty.
//!
//! ```rust
//! use pharmlog::parse_str;
//!
//! let log = parse_str(
//!     "t=  1.00h | A=  9.00 mg | C=  0.20 mg/L | P=  0.00 mg/L | Ce=  0.05 mg/L | Tol= 0.00 | Effect=  1.50%\n\
//!      ========== PATIENT ASSESSMENT at t=1.00 hours ==========\n\
//!      Pain Level: 3 (0=None, 1=Mild, 2=Moderate, 3=Severe)\n",
//! );
//! assert_eq!(log.continuous().len(), 1);
//! assert_eq!(log.assessments()[0].pain_level, Some(3));
//! ```

mod assembler;
pub mod classify;
mod parsed;
pub mod records;

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::PharmlogError;

pub use assembler::LogParser;
pub use classify::{classify, LineKind, OpenBlocks};
pub use parsed::{LogSummary, ParsedLog};
pub use records::{
    Assessment, AssessmentField, ContinuousSample, Decision, DoseEvent, DoseField, Event,
    EventCategory, EventKind,
};

/// Parse an in-memory simulation log
pub fn parse_str(text: &str) -> ParsedLog {
    let mut parser = LogParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Parse a simulation log from any buffered reader
///
/// Lines that are not valid UTF-8 are decoded lossily rather than aborting
/// the parse. Only genuine read failures are returned as errors.
pub fn parse_reader<R: BufRead>(mut reader: R) -> std::io::Result<ParsedLog> {
    let mut parser = LogParser::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        parser.feed_line(&String::from_utf8_lossy(&buf));
    }
    Ok(parser.finish())
}

/// Read and parse a simulation log file
///
/// A missing file is reported as [PharmlogError::MissingInput]; any other
/// failure to open or read it as [PharmlogError::Io].
///
/// ```rust,no_run
/// use pharmlog::read_log;
///
/// let log = read_log("out.txt").unwrap();
/// println!("{}", log.summary());
/// ```
pub fn read_log(path: impl AsRef<Path>) -> Result<ParsedLog, PharmlogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PharmlogError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => PharmlogError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let log = parse_reader(BufReader::new(file)).map_err(|source| PharmlogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let summary = log.summary();
    tracing::info!(
        path = %path.display(),
        samples = summary.samples,
        assessments = summary.assessments,
        doses = summary.doses,
        events = summary.events(),
        "Parsed simulation log"
    );
    Ok(log)
}
