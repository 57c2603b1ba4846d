use super::classify::{classify, LineKind, OpenBlocks};
use super::parsed::ParsedLog;
use super::records::{Assessment, ContinuousSample, Event, EventCategory, PartialDose};

/// Incremental log parser
///
/// Feed lines one at a time with [LogParser::feed_line] and call
/// [LogParser::finish] once the input is exhausted. Assessment and dose
/// blocks are tracked independently; each has at most one open block.
///
/// ```rust
/// use pharmlog::LogParser;
///
/// let mut parser = LogParser::new();
/// parser.feed_line("--- DOSE ADMINISTERED ---");
/// parser.feed_line("Time: 1.00 h");
/// parser.feed_line("Dose: 5.00 mg");
/// parser.feed_line("");
/// let log = parser.finish();
/// assert_eq!(log.doses().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LogParser {
    assessment: Option<Assessment>,
    dose: Option<PartialDose>,
    /// Time of the most recently parsed continuous sample
    last_time: Option<f64>,
    line_number: usize,

    continuous: Vec<ContinuousSample>,
    assessments: Vec<Assessment>,
    doses: Vec<PartialDose>,
    naloxone: Vec<Event>,
    phases: Vec<Event>,
    critical: Vec<Event>,
}

impl LogParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_blocks(&self) -> OpenBlocks {
        OpenBlocks {
            assessment: self.assessment.is_some(),
            dose: self.dose.is_some(),
        }
    }

    /// Classify one line and advance the block state machines
    ///
    /// Trailing `\n` / `\r\n` terminators are stripped before classification.
    /// Anything logged while the line is handled carries its line number.
    pub fn feed_line(&mut self, line: &str) {
        self.line_number += 1;
        let _span = tracing::debug_span!("line", number = self.line_number).entered();
        let line = line.trim_end_matches(['\n', '\r']);
        let kind = classify(line, self.open_blocks());
        self.apply(kind);
    }

    fn apply(&mut self, kind: LineKind) {
        match kind {
            LineKind::Continuous(sample) => {
                self.last_time = Some(sample.t);
                self.continuous.push(sample);
            }
            LineKind::AssessmentStart(t) => {
                close(&mut self.assessment, &mut self.assessments);
                self.assessment = Some(Assessment::new(t));
            }
            LineKind::AssessmentField(field) => {
                if let Some(assessment) = self.assessment.as_mut() {
                    assessment.apply(field);
                }
            }
            LineKind::DoseStart => {
                if self.dose.is_some_and(|dose| dose.time.is_none()) {
                    tracing::debug!("Discarding dose block without a time");
                    self.dose = None;
                }
                close(&mut self.dose, &mut self.doses);
                self.dose = Some(PartialDose::default());
            }
            LineKind::DoseField(field) => {
                if let Some(dose) = self.dose.as_mut() {
                    dose.apply(field);
                }
            }
            LineKind::Blank => {
                if self.dose.is_some_and(|dose| dose.time.is_some()) {
                    close(&mut self.dose, &mut self.doses);
                }
            }
            LineKind::Event { kind, time } => {
                let event = Event {
                    kind,
                    time: time.unwrap_or_else(|| self.last_time.unwrap_or(0.0)),
                };
                match kind.category() {
                    EventCategory::Naloxone => self.naloxone.push(event),
                    EventCategory::Phase => self.phases.push(event),
                    EventCategory::Critical => self.critical.push(event),
                }
            }
            LineKind::Unrecognized => {}
        }
    }

    /// Number of lines fed so far
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Flush any open blocks and build the sorted [ParsedLog]
    pub fn finish(mut self) -> ParsedLog {
        close(&mut self.assessment, &mut self.assessments);
        close(&mut self.dose, &mut self.doses);

        let total = self.doses.len();
        let doses: Vec<_> = self
            .doses
            .into_iter()
            .filter_map(PartialDose::complete)
            .collect();
        if doses.len() < total {
            tracing::debug!(
                dropped = total - doses.len(),
                "Dropping dose blocks that never reported a time"
            );
        }

        ParsedLog::new(
            self.continuous,
            self.assessments,
            doses,
            self.naloxone,
            self.phases,
            self.critical,
        )
    }
}

/// Emit the open block, if any, leaving the slot empty
fn close<T>(slot: &mut Option<T>, out: &mut Vec<T>) {
    if let Some(block) = slot.take() {
        out.push(block);
    }
}
