use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::RecordFilter;

/// File looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "salary-lens.json";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Data file opened at start-up.
    pub data_path: Option<PathBuf>,
    /// Subset every chart is computed from.
    pub filter: RecordFilter,
    /// Width of the year selection window, in years.
    pub year_window_width: f64,
    /// Tick count used when rounding the salary axis outward.
    pub salary_ticks: usize,
    pub parallel_axes: ParallelAxisBounds,
    /// Click tolerance on the parallel chart, in normalised axis units.
    pub hit_tolerance: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            filter: RecordFilter::default(),
            year_window_width: 0.6,
            salary_ticks: 10,
            parallel_axes: ParallelAxisBounds::Derived,
            hit_tolerance: 0.05,
        }
    }
}

/// How the numeric axes of the parallel chart get their bounds.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ParallelAxisBounds {
    /// Data extent, rounded outward.
    #[default]
    Derived,
    Fixed {
        #[serde(default = "default_remote_ratio_bounds")]
        remote_ratio: [f64; 2],
        #[serde(default = "default_salary_bounds")]
        salary: [f64; 2],
    },
}

fn default_remote_ratio_bounds() -> [f64; 2] {
    [34.0, 50.0]
}

fn default_salary_bounds() -> [f64; 2] {
    [100_000.0, 210_000.0]
}

impl ViewConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing viewer configuration")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Read [`CONFIG_FILE`] from the working directory. A missing file gives the
    /// defaults silently; an unreadable one is logged and also gives the defaults.
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EmploymentType;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ViewConfig::from_json("{}").unwrap(), ViewConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = ViewConfig::from_json(
            r#"{
                "data_path": "data/ds_salaries.csv",
                "year_window_width": 1.0,
                "filter": {"employment_type": "PT"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("data/ds_salaries.csv")));
        assert_eq!(config.year_window_width, 1.0);
        assert_eq!(config.filter.employee_residence, "US");
        assert_eq!(config.filter.employment_type, EmploymentType::PartTime);
        assert_eq!(config.salary_ticks, 10);
    }

    #[test]
    fn fixed_parallel_bounds() {
        let config = ViewConfig::from_json(r#"{"parallel_axes": {"mode": "fixed"}}"#).unwrap();
        assert_eq!(
            config.parallel_axes,
            ParallelAxisBounds::Fixed {
                remote_ratio: [34.0, 50.0],
                salary: [100_000.0, 210_000.0],
            }
        );

        let custom = ViewConfig::from_json(
            r#"{"parallel_axes": {"mode": "fixed", "salary": [0, 400000]}}"#,
        )
        .unwrap();
        assert!(matches!(
            custom.parallel_axes,
            ParallelAxisBounds::Fixed { salary, .. } if salary == [0.0, 400_000.0]
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ViewConfig::from_json("{\"salary_ticks\": \"many\"}").is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"hit_tolerance": 0.1}"#).unwrap();
        assert_eq!(ViewConfig::from_path(&path).unwrap().hit_tolerance, 0.1);
        assert!(ViewConfig::from_path(&dir.path().join("missing.json")).is_err());
    }
}
