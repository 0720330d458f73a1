use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::model::{ExperienceLevel, Record, RecordId, UnknownCode};

// ---------------------------------------------------------------------------
// Mean
// ---------------------------------------------------------------------------

/// Arithmetic mean, `sum / n`. An empty input has no mean.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = Accumulator::default();
    values.into_iter().for_each(|v| acc.push(v));
    acc.mean()
}

/// Running sum for grouped means.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ---------------------------------------------------------------------------
// Remote vs. non-remote
// ---------------------------------------------------------------------------

pub const NON_REMOTE_RATIOS: RangeInclusive<u8> = 0..=10;
pub const REMOTE_RATIOS: RangeInclusive<u8> = 90..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCategory {
    NonRemote,
    Remote,
}

impl RemoteCategory {
    pub fn label(self) -> &'static str {
        match self {
            RemoteCategory::NonRemote => "Non-Remote",
            RemoteCategory::Remote => "Remote",
        }
    }

    pub fn ratios(self) -> RangeInclusive<u8> {
        match self {
            RemoteCategory::NonRemote => NON_REMOTE_RATIOS,
            RemoteCategory::Remote => REMOTE_RATIOS,
        }
    }

    /// Category of a remote ratio; hybrid ratios belong to neither.
    pub fn of(remote_ratio: u8) -> Option<Self> {
        [RemoteCategory::NonRemote, RemoteCategory::Remote]
            .into_iter()
            .find(|c| c.ratios().contains(&remote_ratio))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteBucket {
    pub category: RemoteCategory,
    /// `None` when the bucket is empty: nothing to draw.
    pub average_salary: Option<f64>,
    pub count: usize,
}

impl RemoteBucket {
    fn from_accumulator(category: RemoteCategory, acc: Accumulator) -> Self {
        RemoteBucket {
            category,
            average_salary: acc.mean(),
            count: acc.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteComparison {
    pub non_remote: RemoteBucket,
    pub remote: RemoteBucket,
}

impl RemoteComparison {
    pub fn buckets(&self) -> [&RemoteBucket; 2] {
        [&self.non_remote, &self.remote]
    }

    /// Largest defined bucket average, if any.
    pub fn max_average(&self) -> Option<f64> {
        self.buckets()
            .into_iter()
            .filter_map(|b| b.average_salary)
            .reduce(f64::max)
    }
}

/// Mean salary of the non-remote (0–10 %) and remote (90–100 %) partitions.
pub fn remote_comparison(records: &[Record]) -> RemoteComparison {
    let mut non_remote = Accumulator::default();
    let mut remote = Accumulator::default();
    for r in records {
        match RemoteCategory::of(r.remote_ratio) {
            Some(RemoteCategory::NonRemote) => non_remote.push(r.salary_usd as f64),
            Some(RemoteCategory::Remote) => remote.push(r.salary_usd as f64),
            None => {}
        }
    }
    RemoteComparison {
        non_remote: RemoteBucket::from_accumulator(RemoteCategory::NonRemote, non_remote),
        remote: RemoteBucket::from_accumulator(RemoteCategory::Remote, remote),
    }
}

// ---------------------------------------------------------------------------
// Salary by year
// ---------------------------------------------------------------------------

/// Experience-level restriction for the line view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Only(ExperienceLevel),
}

impl LevelFilter {
    /// Options offered by the level selector, in display order.
    pub const OPTIONS: [LevelFilter; 5] = [
        LevelFilter::All,
        LevelFilter::Only(ExperienceLevel::Entry),
        LevelFilter::Only(ExperienceLevel::Mid),
        LevelFilter::Only(ExperienceLevel::Senior),
        LevelFilter::Only(ExperienceLevel::Executive),
    ];

    pub fn matches(self, record: &Record) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(level) => record.experience_level == level,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "ALL" {
            Ok(LevelFilter::All)
        } else {
            s.parse().map(LevelFilter::Only)
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("ALL"),
            LevelFilter::Only(level) => write!(f, "{level}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearPoint {
    pub year: i32,
    pub average_salary: f64,
}

/// Mean salary per distinct work year, ascending by year.
pub fn salary_by_year(records: &[Record], level: LevelFilter) -> Vec<YearPoint> {
    let mut by_year: BTreeMap<i32, Accumulator> = BTreeMap::new();
    for r in records.iter().filter(|r| level.matches(r)) {
        by_year.entry(r.work_year).or_default().push(r.salary_usd as f64);
    }
    by_year
        .into_iter()
        .filter_map(|(year, acc)| {
            acc.mean().map(|average_salary| YearPoint {
                year,
                average_salary,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-level statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStats {
    pub experience_level: ExperienceLevel,
    pub average_remote_ratio: f64,
    pub average_salary: f64,
    pub count: usize,
}

/// Mean remote ratio and salary for every level present in `records`.
pub fn stats_by_level(records: &[Record]) -> BTreeMap<ExperienceLevel, LevelStats> {
    let mut groups: BTreeMap<ExperienceLevel, (Accumulator, Accumulator)> = BTreeMap::new();
    for r in records {
        let (ratio, salary) = groups.entry(r.experience_level).or_default();
        ratio.push(f64::from(r.remote_ratio));
        salary.push(r.salary_usd as f64);
    }
    groups
        .into_iter()
        .filter_map(|(level, (ratio, salary))| {
            Some((
                level,
                LevelStats {
                    experience_level: level,
                    average_remote_ratio: ratio.mean()?,
                    average_salary: salary.mean()?,
                    count: salary.count,
                },
            ))
        })
        .collect()
}

/// A record annotated with its level's averages, for the parallel view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallelRecord {
    pub id: RecordId,
    pub experience_level: ExperienceLevel,
    pub average_remote_ratio: f64,
    pub average_salary: f64,
}

/// One [`ParallelRecord`] per input record; `records[i]` becomes `RecordId(i)`.
pub fn parallel_records(
    records: &[Record],
    stats: &BTreeMap<ExperienceLevel, LevelStats>,
) -> Vec<ParallelRecord> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let s = stats.get(&r.experience_level)?;
            Some(ParallelRecord {
                id: RecordId(i),
                experience_level: r.experience_level,
                average_remote_ratio: s.average_remote_ratio,
                average_salary: s.average_salary,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::restrict_to_us_full_time;
    use crate::data::model::tests::record;
    use crate::data::model::EmploymentType::FullTime;
    use crate::data::model::ExperienceLevel::*;

    #[test]
    fn mean_is_sum_over_n() {
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean([5.0]), Some(5.0));
    }

    #[test]
    fn mean_of_nothing_is_undefined_not_zero() {
        assert_eq!(mean(std::iter::empty::<f64>()), None);
    }

    #[test]
    fn grouped_averages_agree_with_mean() {
        let records = vec![
            record(Senior, "US", FullTime, 0, 100_000, 2021),
            record(Senior, "US", FullTime, 5, 130_000, 2021),
            record(Entry, "US", FullTime, 100, 70_000, 2021),
        ];
        let year = salary_by_year(&records, LevelFilter::All);
        assert_eq!(
            Some(year[0].average_salary),
            mean(records.iter().map(|r| r.salary_usd as f64))
        );
        let cmp = remote_comparison(&records);
        assert_eq!(cmp.non_remote.average_salary, mean([100_000.0, 130_000.0]));
        let stats = stats_by_level(&records);
        assert_eq!(Some(stats[&Senior].average_remote_ratio), mean([0.0, 5.0]));
    }

    #[test]
    fn remote_comparison_worked_example() {
        let records = vec![
            record(Senior, "US", FullTime, 0, 100_000, 2020),
            record(Senior, "US", FullTime, 100, 200_000, 2020),
            record(Senior, "DE", FullTime, 0, 999_999, 2020),
        ];
        let filtered = restrict_to_us_full_time(&records);
        assert_eq!(filtered.len(), 2);

        let cmp = remote_comparison(&filtered);
        assert_eq!(cmp.non_remote.average_salary, Some(100_000.0));
        assert_eq!(cmp.remote.average_salary, Some(200_000.0));
        assert_eq!(cmp.non_remote.count, 1);
        assert_eq!(cmp.remote.count, 1);
        assert_eq!(cmp.max_average(), Some(200_000.0));
    }

    #[test]
    fn hybrid_ratios_are_excluded_and_empty_bucket_is_none() {
        let records = vec![
            record(Mid, "US", FullTime, 10, 80_000, 2021),
            record(Mid, "US", FullTime, 50, 500_000, 2021),
            record(Mid, "US", FullTime, 89, 500_000, 2021),
        ];
        let cmp = remote_comparison(&records);
        assert_eq!(cmp.non_remote.average_salary, Some(80_000.0));
        assert_eq!(cmp.remote.average_salary, None);
        assert_eq!(cmp.remote.count, 0);

        let empty = remote_comparison(&[]);
        assert_eq!(empty.max_average(), None);
    }

    #[test]
    fn remote_category_boundaries() {
        assert_eq!(RemoteCategory::of(0), Some(RemoteCategory::NonRemote));
        assert_eq!(RemoteCategory::of(10), Some(RemoteCategory::NonRemote));
        assert_eq!(RemoteCategory::of(11), None);
        assert_eq!(RemoteCategory::of(89), None);
        assert_eq!(RemoteCategory::of(90), Some(RemoteCategory::Remote));
        assert_eq!(RemoteCategory::of(100), Some(RemoteCategory::Remote));
    }

    fn mixed_years() -> Vec<Record> {
        vec![
            record(Senior, "US", FullTime, 0, 150_000, 2022),
            record(Entry, "US", FullTime, 0, 60_000, 2020),
            record(Senior, "US", FullTime, 0, 170_000, 2022),
            record(Mid, "US", FullTime, 0, 90_000, 2021),
            record(Senior, "US", FullTime, 0, 140_000, 2020),
        ]
    }

    #[test]
    fn salary_by_year_is_sorted_and_unique() {
        let series = salary_by_year(&mixed_years(), LevelFilter::All);
        assert_eq!(
            series,
            vec![
                YearPoint { year: 2020, average_salary: 100_000.0 },
                YearPoint { year: 2021, average_salary: 90_000.0 },
                YearPoint { year: 2022, average_salary: 160_000.0 },
            ]
        );
    }

    #[test]
    fn salary_by_year_is_order_independent() {
        let records = mixed_years();
        let expected = salary_by_year(&records, LevelFilter::All);
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(salary_by_year(&reversed, LevelFilter::All), expected);
        let mut rotated = records;
        rotated.rotate_left(2);
        assert_eq!(salary_by_year(&rotated, LevelFilter::All), expected);
    }

    #[test]
    fn salary_by_year_level_filter() {
        let series = salary_by_year(&mixed_years(), LevelFilter::Only(Senior));
        let years: Vec<i32> = series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2022]);
        assert_eq!(series[1].average_salary, 160_000.0);

        assert!(salary_by_year(&mixed_years(), LevelFilter::Only(Executive)).is_empty());
        assert!(salary_by_year(&[], LevelFilter::All).is_empty());
    }

    #[test]
    fn level_filter_parses_selector_values() {
        assert_eq!("ALL".parse::<LevelFilter>(), Ok(LevelFilter::All));
        assert_eq!("EX".parse::<LevelFilter>(), Ok(LevelFilter::Only(Executive)));
        assert!("all".parse::<LevelFilter>().is_err());
        for option in LevelFilter::OPTIONS {
            assert_eq!(option.to_string().parse::<LevelFilter>(), Ok(option));
        }
    }

    #[test]
    fn stats_by_level_one_entry_per_present_level() {
        let records = vec![
            record(Senior, "US", FullTime, 100, 200_000, 2022),
            record(Entry, "US", FullTime, 0, 60_000, 2020),
            record(Senior, "US", FullTime, 0, 100_000, 2021),
        ];
        let stats = stats_by_level(&records);
        assert_eq!(stats.keys().copied().collect::<Vec<_>>(), vec![Entry, Senior]);
        assert!(!stats.contains_key(&Mid));
        assert!(!stats.contains_key(&Executive));

        let senior = stats[&Senior];
        assert_eq!(senior.average_remote_ratio, 50.0);
        assert_eq!(senior.average_salary, 150_000.0);
        assert_eq!(senior.count, 2);

        assert!(stats_by_level(&[]).is_empty());
    }

    #[test]
    fn every_record_gets_one_parallel_record() {
        let records = vec![
            record(Senior, "US", FullTime, 100, 200_000, 2022),
            record(Entry, "US", FullTime, 0, 60_000, 2020),
            record(Senior, "US", FullTime, 0, 100_000, 2021),
        ];
        let stats = stats_by_level(&records);
        let parallel = parallel_records(&records, &stats);
        assert_eq!(parallel.len(), records.len());
        for (i, p) in parallel.iter().enumerate() {
            assert_eq!(p.id, RecordId(i));
            assert_eq!(p.experience_level, records[i].experience_level);
        }
        assert_eq!(parallel[0].average_salary, parallel[2].average_salary);
        assert_eq!(parallel[1].average_remote_ratio, 0.0);
    }
}
