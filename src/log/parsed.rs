use serde::{Deserialize, Serialize};
use std::fmt;

use super::records::{Assessment, ContinuousSample, Decision, DoseEvent, Event};

/// The structured content of one simulation log
///
/// Continuous samples and assessments are sorted by `t`, doses by `time`. All
/// sorts are stable, so records with equal times keep their input order.
/// Event collections are kept in the order they were encountered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLog {
    continuous: Vec<ContinuousSample>,
    assessments: Vec<Assessment>,
    doses: Vec<DoseEvent>,
    naloxone: Vec<Event>,
    phases: Vec<Event>,
    critical: Vec<Event>,
}

impl ParsedLog {
    pub(crate) fn new(
        mut continuous: Vec<ContinuousSample>,
        mut assessments: Vec<Assessment>,
        mut doses: Vec<DoseEvent>,
        naloxone: Vec<Event>,
        phases: Vec<Event>,
        critical: Vec<Event>,
    ) -> Self {
        continuous.sort_by(|a, b| a.t.total_cmp(&b.t));
        assessments.sort_by(|a, b| a.t.total_cmp(&b.t));
        doses.sort_by(|a, b| a.time.total_cmp(&b.time));
        ParsedLog {
            continuous,
            assessments,
            doses,
            naloxone,
            phases,
            critical,
        }
    }

    pub fn continuous(&self) -> &[ContinuousSample] {
        &self.continuous
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn doses(&self) -> &[DoseEvent] {
        &self.doses
    }

    /// Naloxone rescue attempts, successes and failures
    pub fn naloxone_events(&self) -> &[Event] {
        &self.naloxone
    }

    /// Entries into the saturation and catastrophic phases
    pub fn phase_events(&self) -> &[Event] {
        &self.phases
    }

    /// Critical overdose, respiratory arrest and toxic concentration warnings
    pub fn critical_events(&self) -> &[Event] {
        &self.critical
    }

    /// All discrete events, naloxone first, then phases, then critical markers
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.naloxone
            .iter()
            .chain(self.phases.iter())
            .chain(self.critical.iter())
    }

    /// Assessments that ended in the given decision
    pub fn assessments_with(&self, decision: Decision) -> impl Iterator<Item = &Assessment> {
        self.assessments
            .iter()
            .filter(move |a| a.decision == Some(decision))
    }

    /// First and last time of the continuous series
    pub fn time_span(&self) -> Option<(f64, f64)> {
        match (self.continuous.first(), self.continuous.last()) {
            (Some(first), Some(last)) => Some((first.t, last.t)),
            _ => None,
        }
    }

    /// Whether nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.continuous.is_empty()
            && self.assessments.is_empty()
            && self.doses.is_empty()
            && self.naloxone.is_empty()
            && self.phases.is_empty()
            && self.critical.is_empty()
    }

    pub fn summary(&self) -> LogSummary {
        LogSummary {
            samples: self.continuous.len(),
            assessments: self.assessments.len(),
            doses: self.doses.len(),
            naloxone_events: self.naloxone.len(),
            phase_events: self.phases.len(),
            critical_events: self.critical.len(),
        }
    }
}

/// Record counts of a [ParsedLog]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    pub samples: usize,
    pub assessments: usize,
    pub doses: usize,
    pub naloxone_events: usize,
    pub phase_events: usize,
    pub critical_events: usize,
}

impl LogSummary {
    pub fn events(&self) -> usize {
        self.naloxone_events + self.phase_events + self.critical_events
    }
}

impl fmt::Display for LogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsed {} time points, {} assessments, {} doses, {} events.",
            self.samples,
            self.assessments,
            self.doses,
            self.events()
        )
    }
}
