//! Record types produced by the log parser
//!
//! Every record type is a fixed-shape row with named, typed fields. Values the
//! log did not report stay `None`, so "not reported" is never confused with zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One fixed-interval snapshot of the simulated PK/PD state
///
/// All fields are required; a status line either yields a complete sample or
/// nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousSample {
    /// Simulation time in hours
    pub t: f64,
    /// Amount in the absorption compartment (mg)
    #[serde(rename = "A")]
    pub a: f64,
    /// Central (blood) concentration (mg/L)
    #[serde(rename = "C")]
    pub c: f64,
    /// Peripheral concentration (mg/L)
    #[serde(rename = "P")]
    pub p: f64,
    /// Effect-site concentration (mg/L)
    #[serde(rename = "Ce")]
    pub ce: f64,
    /// Tolerance index
    #[serde(rename = "Tol")]
    pub tol: f64,
    /// Pharmacodynamic effect in percent
    #[serde(rename = "Effect")]
    pub effect: f64,
}

/// Outcome of the dosing decision taken during an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Increase,
    Maintain,
    Stable,
}

impl Decision {
    /// The tag used for this decision in exported tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Increase => "INCREASE",
            Decision::Maintain => "MAINTAIN",
            Decision::Stable => "STABLE",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time clinical evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Time of the assessment in hours, taken from the block banner
    pub t: f64,
    /// Reported effect in percent
    pub effect: Option<f64>,
    /// Pain level, 0 (none) to 3 (severe)
    pub pain_level: Option<u8>,
    /// Whether the patient reported relief
    pub relief_state: Option<bool>,
    pub motivation: Option<f64>,
    /// Dose in effect at the time of the assessment (mg)
    pub current_dose: Option<f64>,
    pub decision: Option<Decision>,
}

impl Assessment {
    /// Create an assessment opened at time `t` with every other field absent
    pub fn new(t: f64) -> Self {
        Assessment {
            t,
            effect: None,
            pain_level: None,
            relief_state: None,
            motivation: None,
            current_dose: None,
            decision: None,
        }
    }

    /// Apply a single parsed field to this assessment
    ///
    /// Decisions are first-wins: once set, a later decision line in the same
    /// block leaves the recorded one untouched.
    pub(crate) fn apply(&mut self, field: AssessmentField) {
        match field {
            AssessmentField::Effect(v) => self.effect = Some(v),
            AssessmentField::PainLevel(v) => self.pain_level = Some(v),
            AssessmentField::ReliefState(v) => self.relief_state = Some(v),
            AssessmentField::Motivation(v) => self.motivation = Some(v),
            AssessmentField::CurrentDose(v) => self.current_dose = Some(v),
            AssessmentField::Decision(d) => {
                if self.decision.is_none() {
                    self.decision = Some(d);
                }
            }
        }
    }
}

/// A single field line recognised inside an open assessment block
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssessmentField {
    Effect(f64),
    PainLevel(u8),
    ReliefState(bool),
    Motivation(f64),
    CurrentDose(f64),
    Decision(Decision),
}

/// A single field line recognised inside an open dose block
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoseField {
    Time(f64),
    Amount(f64),
}

/// A dose block that is still accumulating fields
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PartialDose {
    pub time: Option<f64>,
    pub dose: Option<f64>,
}

impl PartialDose {
    pub fn apply(&mut self, field: DoseField) {
        match field {
            DoseField::Time(v) => self.time = Some(v),
            DoseField::Amount(v) => self.dose = Some(v),
        }
    }

    /// Convert into a [DoseEvent], which requires a time
    pub fn complete(self) -> Option<DoseEvent> {
        self.time.map(|time| DoseEvent {
            time,
            dose: self.dose,
        })
    }
}

/// One administered dose
///
/// Dose blocks that never reported a time are dropped before they reach this
/// type, so `time` is always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseEvent {
    /// Time of administration in hours
    pub time: f64,
    /// Administered amount (mg)
    pub dose: Option<f64>,
}

/// The collection a discrete event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Naloxone,
    Phase,
    Critical,
}

/// Kind tag of a discrete event marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    NaloxoneAttempt,
    NaloxoneSuccess,
    NaloxoneFailure,
    PhaseSaturation,
    PhaseCatastrophic,
    CriticalOverdose,
    RespiratoryArrest,
    ToxicWarning,
}

impl EventKind {
    pub fn category(&self) -> EventCategory {
        match self {
            EventKind::NaloxoneAttempt | EventKind::NaloxoneSuccess | EventKind::NaloxoneFailure => {
                EventCategory::Naloxone
            }
            EventKind::PhaseSaturation | EventKind::PhaseCatastrophic => EventCategory::Phase,
            EventKind::CriticalOverdose | EventKind::RespiratoryArrest | EventKind::ToxicWarning => {
                EventCategory::Critical
            }
        }
    }

    /// Whether the marker line carries its own timestamp
    ///
    /// Naloxone and phase markers do not; their time is imputed from the most
    /// recent continuous sample.
    pub fn has_embedded_time(&self) -> bool {
        self.category() == EventCategory::Critical
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::NaloxoneAttempt => "NALOXONE_ATTEMPT",
            EventKind::NaloxoneSuccess => "NALOXONE_SUCCESS",
            EventKind::NaloxoneFailure => "NALOXONE_FAILURE",
            EventKind::PhaseSaturation => "PHASE_SATURATION",
            EventKind::PhaseCatastrophic => "PHASE_CATASTROPHIC",
            EventKind::CriticalOverdose => "CRITICAL_OVERDOSE",
            EventKind::RespiratoryArrest => "RESPIRATORY_ARREST",
            EventKind::ToxicWarning => "TOXIC_WARNING",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete, timestamped marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    /// Time in hours, either parsed from the line or imputed
    pub time: f64,
}
