use serde::Deserialize;

use super::model::{EmploymentType, Record};

// ---------------------------------------------------------------------------
// Analysis subset predicate
// ---------------------------------------------------------------------------

/// Which records every view is computed from.
///
/// Defaults to the US, full-time subset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub employee_residence: String,
    pub employment_type: EmploymentType,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            employee_residence: "US".to_string(),
            employment_type: EmploymentType::FullTime,
        }
    }
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        record.employee_residence == self.employee_residence
            && record.employment_type == self.employment_type
    }

    /// Keep matching records in their original order. No match is an empty
    /// result, not an error.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

/// Restrict `records` to employees living in the US and working full time.
pub fn restrict_to_us_full_time(records: &[Record]) -> Vec<Record> {
    RecordFilter::default().apply(records)
}
