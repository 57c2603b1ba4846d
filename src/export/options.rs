use serde::{Deserialize, Serialize};

use crate::PharmlogError;

/// Options controlling the tabular export of a [crate::ParsedLog]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Field delimiter (default: `,`)
    pub delimiter: u8,

    /// Placeholder written for values the log did not report (default: empty)
    ///
    /// Use `"."` for Pmetrics-style missing values or `"NA"` for R.
    pub missing: String,

    /// Prefix prepended to every file name, e.g. `"run1_"` gives `run1_doses.csv`
    pub file_prefix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing: String::new(),
            file_prefix: String::new(),
        }
    }
}

impl ExportOptions {
    /// Tab-separated output
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_missing(mut self, missing: impl Into<String>) -> Self {
        self.missing = missing.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Load options from a JSON document; absent keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, PharmlogError> {
        serde_json::from_str(json).map_err(|e| PharmlogError::Config(e.to_string()))
    }
}
