//! Tabular export of parsed simulation logs
//!
//! Each collection of a [ParsedLog] is written to its own delimited file so it
//! can be picked up by plotting or statistics tools.

mod options;

pub use options::ExportOptions;

use csv::WriterBuilder;
use std::path::{Path, PathBuf};

use crate::log::{Event, ParsedLog};
use crate::PharmlogError;

pub const CONTINUOUS_FILE: &str = "continuous.csv";
pub const ASSESSMENTS_FILE: &str = "assessments.csv";
pub const DOSES_FILE: &str = "doses.csv";
pub const NALOXONE_FILE: &str = "naloxone_events.csv";
pub const PHASES_FILE: &str = "phase_events.csv";
pub const CRITICAL_FILE: &str = "critical_events.csv";

impl ParsedLog {
    /// Write every collection as a delimited file into `dir`
    ///
    /// The directory is created if it does not exist. Returns the paths of the
    /// written files, continuous samples first.
    ///
    /// # Arguments
    ///
    /// * `dir` - Output directory
    /// * `options` - Delimiter, missing-value placeholder and file prefix
    pub fn write_csv(
        &self,
        dir: impl AsRef<Path>,
        options: &ExportOptions,
    ) -> Result<Vec<PathBuf>, PharmlogError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|source| PharmlogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let missing = |value: Option<f64>| value.map_or(options.missing.clone(), |v| v.to_string());
        let mut written = Vec::with_capacity(6);

        written.push(write_table(
            dir,
            CONTINUOUS_FILE,
            options,
            ["t", "A", "C", "P", "Ce", "Tol", "Effect"],
            self.continuous().iter().map(|s| {
                [s.t, s.a, s.c, s.p, s.ce, s.tol, s.effect].map(|v| v.to_string())
            }),
        )?);

        written.push(write_table(
            dir,
            ASSESSMENTS_FILE,
            options,
            [
                "t",
                "effect",
                "pain_level",
                "relief_state",
                "motivation",
                "current_dose",
                "decision",
            ],
            self.assessments().iter().map(|a| {
                [
                    a.t.to_string(),
                    missing(a.effect),
                    a.pain_level
                        .map_or(options.missing.clone(), |v| v.to_string()),
                    a.relief_state
                        .map_or(options.missing.clone(), |v| u8::from(v).to_string()),
                    missing(a.motivation),
                    missing(a.current_dose),
                    a.decision
                        .map_or(options.missing.clone(), |d| d.as_str().to_string()),
                ]
            }),
        )?);

        written.push(write_table(
            dir,
            DOSES_FILE,
            options,
            ["time", "dose"],
            self.doses()
                .iter()
                .map(|d| [d.time.to_string(), missing(d.dose)]),
        )?);

        for (file, events) in [
            (NALOXONE_FILE, self.naloxone_events()),
            (PHASES_FILE, self.phase_events()),
            (CRITICAL_FILE, self.critical_events()),
        ] {
            written.push(write_table(
                dir,
                file,
                options,
                ["time", "kind"],
                events.iter().map(event_row),
            )?);
        }

        tracing::info!(
            dir = %dir.display(),
            files = written.len(),
            "Exported simulation log tables"
        );
        Ok(written)
    }
}

fn event_row(event: &Event) -> [String; 2] {
    [event.time.to_string(), event.kind.as_str().to_string()]
}

fn write_table<const N: usize>(
    dir: &Path,
    file: &str,
    options: &ExportOptions,
    header: [&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<PathBuf, PharmlogError> {
    let path = dir.join(format!("{}{}", options.file_prefix, file));
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_path(&path)
        .map_err(|e| PharmlogError::Csv(e.to_string()))?;

    writer
        .write_record(header)
        .map_err(|e| PharmlogError::Csv(e.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| PharmlogError::Csv(e.to_string()))?;
    }
    writer.flush().map_err(|source| PharmlogError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
