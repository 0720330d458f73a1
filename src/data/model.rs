use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::filter::RecordFilter;

// ---------------------------------------------------------------------------
// Coded categorical columns
// ---------------------------------------------------------------------------

/// A categorical code that does not belong to its enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} code '{code}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

/// Ordinal career stage. Declaration order is the ordinal order (EN < MI < SE < EX).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "EN")]
    Entry,
    #[serde(rename = "MI")]
    Mid,
    #[serde(rename = "SE")]
    Senior,
    #[serde(rename = "EX")]
    Executive,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Executive,
    ];

    /// Two-letter code as it appears in the source file.
    pub fn code(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "EN",
            ExperienceLevel::Mid => "MI",
            ExperienceLevel::Senior => "SE",
            ExperienceLevel::Executive => "EX",
        }
    }

    /// Human-readable name used in legends.
    pub fn display_name(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior Level",
            ExperienceLevel::Executive => "Executive Level",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExperienceLevel::ALL
            .into_iter()
            .find(|level| level.code() == s.trim())
            .ok_or_else(|| UnknownCode {
                kind: "experience level",
                code: s.to_string(),
            })
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "FT")]
    FullTime,
    #[serde(rename = "PT")]
    PartTime,
    #[serde(rename = "CT")]
    Contract,
    #[serde(rename = "FL")]
    Freelance,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Freelance,
    ];

    pub fn code(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "FT",
            EmploymentType::PartTime => "PT",
            EmploymentType::Contract => "CT",
            EmploymentType::Freelance => "FL",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmploymentType::ALL
            .into_iter()
            .find(|ty| ty.code() == s.trim())
            .ok_or_else(|| UnknownCode {
                kind: "employment type",
                code: s.to_string(),
            })
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the salary table
// ---------------------------------------------------------------------------

/// One employment observation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub job_title: String,
    pub experience_level: ExperienceLevel,
    pub employment_type: EmploymentType,
    /// ISO country code of the employee's residence.
    pub employee_residence: String,
    /// Share of off-site work, 0 (on-site) to 100 (fully remote).
    pub remote_ratio: u8,
    pub company_location: String,
    pub company_size: String,
    pub salary_usd: u64,
    pub work_year: i32,
}

/// Stable identity of a record inside [`SalaryDataset::filtered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All loaded records together with the analysis subset every view reads.
#[derive(Debug, Clone)]
pub struct SalaryDataset {
    /// Every record from the source, in file order.
    pub records: Vec<Record>,
    /// Records passing the analysis filter; a record's index here is its [`RecordId`].
    pub filtered: Vec<Record>,
    /// Experience levels present in `filtered`, in ordinal order.
    pub levels: BTreeSet<ExperienceLevel>,
}

impl SalaryDataset {
    /// Apply `filter` once and index the surviving levels.
    pub fn new(records: Vec<Record>, filter: &RecordFilter) -> Self {
        let filtered = filter.apply(&records);
        let levels = filtered.iter().map(|r| r.experience_level).collect();
        SalaryDataset {
            records,
            filtered,
            levels,
        }
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.filtered.get(id.0)
    }

    /// Number of loaded records (before filtering).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Shorthand used across the crate's tests.
    pub(crate) fn record(
        level: ExperienceLevel,
        residence: &str,
        employment: EmploymentType,
        remote_ratio: u8,
        salary_usd: u64,
        work_year: i32,
    ) -> Record {
        Record {
            job_title: "Data Scientist".to_string(),
            experience_level: level,
            employment_type: employment,
            employee_residence: residence.to_string(),
            remote_ratio,
            company_location: residence.to_string(),
            company_size: "M".to_string(),
            salary_usd,
            work_year,
        }
    }

    #[test]
    fn level_codes_parse_and_display() {
        for level in ExperienceLevel::ALL {
            assert_eq!(level.code().parse::<ExperienceLevel>(), Ok(level));
            assert_eq!(level.to_string(), level.code());
        }
        assert_eq!(" SE ".parse::<ExperienceLevel>(), Ok(ExperienceLevel::Senior));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let err = "XX".parse::<ExperienceLevel>().unwrap_err();
        assert_eq!(err.kind, "experience level");
        assert_eq!(err.code, "XX");
        assert!("ft".parse::<EmploymentType>().is_err());
    }

    #[test]
    fn levels_are_ordinal() {
        assert!(ExperienceLevel::Entry < ExperienceLevel::Mid);
        assert!(ExperienceLevel::Senior < ExperienceLevel::Executive);
    }

    #[test]
    fn dataset_indexes_filtered_levels() {
        let records = vec![
            record(ExperienceLevel::Senior, "US", EmploymentType::FullTime, 0, 100, 2020),
            record(ExperienceLevel::Entry, "DE", EmploymentType::FullTime, 0, 100, 2020),
            record(ExperienceLevel::Mid, "US", EmploymentType::PartTime, 0, 100, 2020),
        ];
        let ds = SalaryDataset::new(records, &RecordFilter::default());
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.filtered.len(), 1);
        assert_eq!(
            ds.levels.iter().copied().collect::<Vec<_>>(),
            vec![ExperienceLevel::Senior]
        );
        assert!(ds.get(RecordId(0)).is_some());
        assert!(ds.get(RecordId(1)).is_none());
    }
}
