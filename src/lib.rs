pub mod error;
pub mod export;
pub mod log;

pub use crate::export::ExportOptions;
pub use crate::log::{
    parse_reader, parse_str, read_log, Assessment, ContinuousSample, Decision, DoseEvent, Event,
    EventCategory, EventKind, LogParser, LogSummary, ParsedLog,
};
pub use error::PharmlogError;

pub mod prelude {
    pub mod records {
        pub use crate::log::records::{
            Assessment, ContinuousSample, Decision, DoseEvent, Event, EventCategory, EventKind,
        };
    }
    pub mod parser {
        pub use crate::log::{
            classify, parse_reader, parse_str, read_log, LineKind, LogParser, OpenBlocks,
            ParsedLog,
        };
    }

    pub use crate::export::ExportOptions;
    pub use crate::log::{LogSummary, ParsedLog};
    pub use crate::PharmlogError;
}
