//! Line classification
//!
//! Each line of a simulation log is matched against a fixed, priority-ordered
//! set of patterns. The first pattern that matches decides what the line is;
//! a line is never attributed to more than one record.
//!
//! The order is:
//! 1. continuous status lines, regardless of which blocks are open
//! 2. assessment and dose block banners
//! 3. block fields, only while the owning block is open
//! 4. standalone event markers
//! 5. blank lines
//!
//! Anything else is [LineKind::Unrecognized].

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::records::{AssessmentField, ContinuousSample, Decision, DoseField, EventKind};

/// Which block types currently have an open block
///
/// Block fields are only recognised while their owning block is open, so the
/// same text (for instance a `Dose:` line) means nothing outside of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenBlocks {
    pub assessment: bool,
    pub dose: bool,
}

/// The result of classifying one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// A complete continuous status line
    Continuous(ContinuousSample),
    /// An assessment banner, carrying the assessment time
    AssessmentStart(f64),
    AssessmentField(AssessmentField),
    DoseStart,
    DoseField(DoseField),
    /// A discrete event marker; `time` is `None` when the line carries no timestamp
    Event { kind: EventKind, time: Option<f64> },
    Blank,
    Unrecognized,
}

struct FieldPattern<F> {
    regex: Regex,
    parse: fn(&Captures) -> Option<F>,
}

fn field<F>(pattern: &str, parse: fn(&Captures) -> Option<F>) -> FieldPattern<F> {
    FieldPattern {
        regex: compile(pattern),
        parse,
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("log patterns are valid regular expressions")
}

/// Parse capture group `group` as a float
fn number(caps: &Captures, group: usize) -> Option<f64> {
    caps.get(group)?.as_str().parse().ok()
}

fn named(caps: &Captures, name: &str) -> Option<f64> {
    caps.name(name)?.as_str().parse().ok()
}

lazy_static! {
    static ref CONTINUOUS: Regex = compile(concat!(
        r"t=\s*(?P<t>[\d\.]+)h\s*\|",
        r"\s*A=\s*(?P<A>[-\d\.]+)\s*mg\s*\|",
        r"\s*C=\s*(?P<C>[-\d\.]+)\s*mg/L\s*\|",
        r"\s*P=\s*(?P<P>[-\d\.]+)\s*mg/L\s*\|",
        r"\s*Ce=\s*(?P<Ce>[-\d\.]+)\s*mg/L\s*\|",
        r"\s*Tol=\s*(?P<Tol>[-\d\.]+)\s*\|",
        r"\s*Effect=\s*(?P<Effect>[-\d\.]+)%",
    ));
    static ref ASSESSMENT_START: Regex =
        compile(r"^=+ PATIENT ASSESSMENT at t=(?P<t>[\d\.]+) hours =+");
    static ref DOSE_START: Regex = compile(r"^--- DOSE ADMINISTERED ---");
    static ref ASSESSMENT_FIELDS: Vec<FieldPattern<AssessmentField>> = vec![
        field(r"^Current Effect:\s*([\d\.]+)%", |c: &Captures| {
            number(c, 1).map(AssessmentField::Effect)
        }),
        field(r"^Pain Level:\s*(\d+)", |c: &Captures| {
            c[1].parse().ok().map(AssessmentField::PainLevel)
        }),
        field(r"^Relief State:\s*(YES|NO)", |c: &Captures| {
            Some(AssessmentField::ReliefState(&c[1] == "YES"))
        }),
        field(r"^Motivation:\s*([\d\.]+)", |c: &Captures| {
            number(c, 1).map(AssessmentField::Motivation)
        }),
        field(r"^Current Dose:\s*([\d\.]+)\s*mg", |c: &Captures| {
            number(c, 1).map(AssessmentField::CurrentDose)
        }),
        field(r"^>>> DECISION: INCREASE DOSE", |_: &Captures| {
            Some(AssessmentField::Decision(Decision::Increase))
        }),
        field(r"^>>> DECISION: MAINTAIN CURRENT DOSE", |_: &Captures| {
            Some(AssessmentField::Decision(Decision::Maintain))
        }),
        field(r"^Decision:\s*STABLE", |_: &Captures| {
            Some(AssessmentField::Decision(Decision::Stable))
        }),
    ];
    static ref DOSE_FIELDS: Vec<FieldPattern<DoseField>> = vec![
        field(r"^Time:\s*([\d\.]+)\s*h", |c: &Captures| number(c, 1).map(DoseField::Time)),
        field(r"^Dose:\s*([\d\.]+)\s*mg", |c: &Captures| number(c, 1).map(DoseField::Amount)),
    ];
    // Markers with an embedded timestamp capture it as `t`
    static ref EVENTS: Vec<(EventKind, Regex)> = vec![
        (EventKind::NaloxoneAttempt, compile(r"NALOXONE RESCUE ACTIVATED")),
        (EventKind::NaloxoneSuccess, compile(r"RESCUE SUCCESSFUL")),
        (EventKind::NaloxoneFailure, compile(r"RESCUE FAILED")),
        (EventKind::PhaseSaturation, compile(r"PHASE TRANSITION: SATURATION ZONE")),
        (EventKind::PhaseCatastrophic, compile(r"PHASE TRANSITION: CATASTROPHIC ZONE")),
        (EventKind::CriticalOverdose, compile(r"CRITICAL OVERDOSE at t=(?P<t>[\d\.]+) hours")),
        (EventKind::RespiratoryArrest, compile(r"RESPIRATORY ARREST at t=(?P<t>[\d\.]+) hours")),
        (
            EventKind::ToxicWarning,
            compile(r"WARNING: Toxic concentration reached at t=(?P<t>[\d\.]+) hours"),
        ),
    ];
}

/// Classify a single line, terminator already stripped
///
/// Never fails: lines that match nothing, or match a pattern whose numbers do
/// not parse, come back as [LineKind::Unrecognized].
pub fn classify(line: &str, open: OpenBlocks) -> LineKind {
    if let Some(caps) = CONTINUOUS.captures(line) {
        return match continuous_sample(&caps) {
            Some(sample) => LineKind::Continuous(sample),
            None => {
                tracing::debug!("Discarding malformed status line: {line}");
                LineKind::Unrecognized
            }
        };
    }

    if let Some(caps) = ASSESSMENT_START.captures(line) {
        return match named(&caps, "t") {
            Some(t) => LineKind::AssessmentStart(t),
            None => {
                tracing::debug!("Discarding assessment banner with malformed time: {line}");
                LineKind::Unrecognized
            }
        };
    }

    if DOSE_START.is_match(line) {
        return LineKind::DoseStart;
    }

    if open.assessment {
        if let Some(parsed) = match_field(ASSESSMENT_FIELDS.as_slice(), line) {
            return parsed.map_or_else(|| discard_field(line), LineKind::AssessmentField);
        }
    }

    if open.dose {
        if let Some(parsed) = match_field(DOSE_FIELDS.as_slice(), line) {
            return parsed.map_or_else(|| discard_field(line), LineKind::DoseField);
        }
    }

    for (kind, regex) in EVENTS.iter() {
        let Some(caps) = regex.captures(line) else {
            continue;
        };
        if !kind.has_embedded_time() {
            return LineKind::Event {
                kind: *kind,
                time: None,
            };
        }
        return match named(&caps, "t") {
            Some(t) => LineKind::Event {
                kind: *kind,
                time: Some(t),
            },
            None => {
                tracing::debug!("Discarding {kind} marker with malformed time: {line}");
                LineKind::Unrecognized
            }
        };
    }

    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    LineKind::Unrecognized
}

/// First-match-wins over a field table
///
/// The outer `Option` is whether any pattern matched; the inner one is whether
/// its value parsed.
fn match_field<F>(patterns: &[FieldPattern<F>], line: &str) -> Option<Option<F>> {
    patterns.iter().find_map(|pattern| {
        pattern
            .regex
            .captures(line)
            .map(|caps| (pattern.parse)(&caps))
    })
}

fn discard_field(line: &str) -> LineKind {
    tracing::debug!("Discarding field with malformed value: {line}");
    LineKind::Unrecognized
}

fn continuous_sample(caps: &Captures) -> Option<ContinuousSample> {
    Some(ContinuousSample {
        t: named(caps, "t")?,
        a: named(caps, "A")?,
        c: named(caps, "C")?,
        p: named(caps, "P")?,
        ce: named(caps, "Ce")?,
        tol: named(caps, "Tol")?,
        effect: named(caps, "Effect")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH_OPEN: OpenBlocks = OpenBlocks {
        assessment: true,
        dose: true,
    };

    #[test]
    fn test_continuous_line() {
        let line = "t=  6.30h | A=  1.25 mg | C=  3.40 mg/L | P=  0.80 mg/L | Ce=  2.10 mg/L | Tol= 0.05 | Effect= 41.20%";
        match classify(line, OpenBlocks::default()) {
            LineKind::Continuous(sample) => {
                assert_eq!(sample.t, 6.3);
                assert_eq!(sample.a, 1.25);
                assert_eq!(sample.c, 3.4);
                assert_eq!(sample.p, 0.8);
                assert_eq!(sample.ce, 2.1);
                assert_eq!(sample.tol, 0.05);
                assert_eq!(sample.effect, 41.2);
            }
            other => panic!("Expected a continuous sample, got {other:?}"),
        }
    }

    #[test]
    fn test_continuous_allows_negative_values() {
        let line = "t=1.00h | A=-0.01 mg | C=0.00 mg/L | P=0.00 mg/L | Ce=0.00 mg/L | Tol=-0.00 | Effect=0.00%";
        assert!(matches!(
            classify(line, OpenBlocks::default()),
            LineKind::Continuous(s) if s.a == -0.01
        ));
    }

    #[test]
    fn test_malformed_continuous_is_discarded() {
        let line = "t=1.0.0h | A=1.00 mg | C=0.00 mg/L | P=0.00 mg/L | Ce=0.00 mg/L | Tol=0.00 | Effect=0.00%";
        assert_eq!(classify(line, BOTH_OPEN), LineKind::Unrecognized);
    }

    #[test]
    fn test_block_starts() {
        assert_eq!(
            classify(
                "========== PATIENT ASSESSMENT at t=12.00 hours ==========",
                OpenBlocks::default()
            ),
            LineKind::AssessmentStart(12.0)
        );
        assert_eq!(
            classify("--- DOSE ADMINISTERED ---", OpenBlocks::default()),
            LineKind::DoseStart
        );
    }

    #[test]
    fn test_assessment_fields_require_open_block() {
        let closed = OpenBlocks::default();
        assert_eq!(classify("Pain Level: 2 (0=None, 1=Mild, 2=Moderate, 3=Severe)", closed), LineKind::Unrecognized);

        let open = OpenBlocks {
            assessment: true,
            dose: false,
        };
        assert_eq!(
            classify("Pain Level: 2 (0=None, 1=Mild, 2=Moderate, 3=Severe)", open),
            LineKind::AssessmentField(AssessmentField::PainLevel(2))
        );
        assert_eq!(
            classify("Current Effect: 55.10%", open),
            LineKind::AssessmentField(AssessmentField::Effect(55.1))
        );
        assert_eq!(
            classify("Relief State: NO", open),
            LineKind::AssessmentField(AssessmentField::ReliefState(false))
        );
        assert_eq!(
            classify("Motivation: 3.50", open),
            LineKind::AssessmentField(AssessmentField::Motivation(3.5))
        );
        assert_eq!(
            classify("Current Dose: 10.00 mg", open),
            LineKind::AssessmentField(AssessmentField::CurrentDose(10.0))
        );
        assert_eq!(
            classify(">>> DECISION: INCREASE DOSE (Transition T2) <<<", open),
            LineKind::AssessmentField(AssessmentField::Decision(Decision::Increase))
        );
        assert_eq!(
            classify(">>> DECISION: MAINTAIN CURRENT DOSE (Transition T3) <<<", open),
            LineKind::AssessmentField(AssessmentField::Decision(Decision::Maintain))
        );
        assert_eq!(
            classify("Decision: STABLE - No dose adjustment needed", open),
            LineKind::AssessmentField(AssessmentField::Decision(Decision::Stable))
        );
    }

    #[test]
    fn test_dose_fields_require_open_block() {
        let assessment_only = OpenBlocks {
            assessment: true,
            dose: false,
        };
        assert_eq!(classify("Dose: 5.00 mg", assessment_only), LineKind::Unrecognized);
        assert_eq!(classify("Time: 1.00 h", assessment_only), LineKind::Unrecognized);

        assert_eq!(
            classify("Dose: 5.00 mg", BOTH_OPEN),
            LineKind::DoseField(DoseField::Amount(5.0))
        );
        assert_eq!(
            classify("Time: 1.00 h", BOTH_OPEN),
            LineKind::DoseField(DoseField::Time(1.0))
        );
    }

    #[test]
    fn test_field_patterns_are_case_sensitive() {
        assert_eq!(classify("Current dose: 10.00 mg", BOTH_OPEN), LineKind::Unrecognized);
    }

    #[test]
    fn test_unparseable_field_is_dropped() {
        assert_eq!(
            classify("Pain Level: 99999999999", BOTH_OPEN),
            LineKind::Unrecognized
        );
        assert_eq!(classify("Motivation: .", BOTH_OPEN), LineKind::Unrecognized);
    }

    #[test]
    fn test_events_without_timestamp() {
        let cases = [
            ("║ T6: NALOXONE RESCUE ACTIVATED                            ║", EventKind::NaloxoneAttempt),
            (">>> RESCUE SUCCESSFUL - Patient REVIVED <<<", EventKind::NaloxoneSuccess),
            ("!!! RESCUE FAILED - Patient DECEASED !!!", EventKind::NaloxoneFailure),
            ("!!! NALOXONE WINDOW EXPIRED (>300.00 min) - RESCUE FAILED !!!", EventKind::NaloxoneFailure),
            ("║ PHASE TRANSITION: SATURATION ZONE ENTERED (Phase 2)      ║", EventKind::PhaseSaturation),
            ("║ PHASE TRANSITION: CATASTROPHIC ZONE (Phase 3)            ║", EventKind::PhaseCatastrophic),
        ];
        for (line, kind) in cases {
            assert_eq!(
                classify(line, OpenBlocks::default()),
                LineKind::Event { kind, time: None },
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_events_with_timestamp() {
        let cases = [
            ("!!! CRITICAL OVERDOSE at t=48.00 hours !!!", EventKind::CriticalOverdose, 48.0),
            ("!!! RESPIRATORY ARREST at t=49.50 hours !!!", EventKind::RespiratoryArrest, 49.5),
            (">>> WARNING: Toxic concentration reached at t=36.00 hours <<<", EventKind::ToxicWarning, 36.0),
        ];
        for (line, kind, t) in cases {
            assert_eq!(
                classify(line, OpenBlocks::default()),
                LineKind::Event { kind, time: Some(t) },
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_blank_and_unrecognized() {
        assert_eq!(classify("", OpenBlocks::default()), LineKind::Blank);
        assert_eq!(classify("   \t", OpenBlocks::default()), LineKind::Blank);
        assert_eq!(
            classify("Total doses given: 3", BOTH_OPEN),
            LineKind::Unrecognized
        );
        assert_eq!(
            classify("║ Time: 5.20 hours  |  C/Km ratio: 1.01", BOTH_OPEN),
            LineKind::Unrecognized
        );
    }
}
