//! View layer: the state shared by the three linked charts.
//!
//! ```text
//!   SalaryDataset::filtered  (read-only after load)
//!        │
//!        ▼
//!   ┌────────────────┐   set_experience_level_filter
//!   │ ViewController  │ ◀─ move_year_selection
//!   └────────────────┘   select_parallel_record
//!        │
//!        ├── RemoteComparison      → bar chart
//!        ├── LineView + YearWindow → line chart
//!        └── ParallelRecord + axes → parallel chart
//! ```
//!
//! Nothing here touches egui; the `ui` module translates pointer and widget
//! events into these calls.
pub mod domain;
pub mod parallel;

use std::collections::BTreeMap;

use crate::config::ViewConfig;
use crate::data::aggregate::{
    parallel_records, remote_comparison, salary_by_year, stats_by_level, LevelFilter, LevelStats,
    ParallelRecord, RemoteComparison, YearPoint,
};
use crate::data::model::{ExperienceLevel, RecordId, SalaryDataset};

use domain::Domain;
use parallel::ParallelAxes;

// ---------------------------------------------------------------------------
// View state pieces
// ---------------------------------------------------------------------------

/// The line chart's current series and the domains its axes are scaled to.
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub level_filter: LevelFilter,
    pub series: Vec<YearPoint>,
    /// Year extent of `series`; `None` when there is nothing to draw.
    pub year_domain: Option<Domain>,
    /// Salary extent of `series`, rounded outward.
    pub salary_domain: Option<Domain>,
}

/// Fixed-width selection window on the year axis. Only the centre moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearWindow {
    pub center: f64,
    pub width: f64,
}

impl YearWindow {
    pub fn start(&self) -> f64 {
        self.center - self.width / 2.0
    }

    pub fn end(&self) -> f64 {
        self.center + self.width / 2.0
    }
}

/// What the parallel chart shows for its highlighted record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub id: RecordId,
    pub experience_level: ExperienceLevel,
    pub average_remote_ratio: f64,
    pub average_salary: f64,
}

impl From<&ParallelRecord> for Highlight {
    fn from(p: &ParallelRecord) -> Self {
        Highlight {
            id: p.id,
            experience_level: p.experience_level,
            average_remote_ratio: p.average_remote_ratio,
            average_salary: p.average_salary,
        }
    }
}

/// Snap a fractional year to the nearest whole year, halves rounding up.
pub fn snap_year(value: f64) -> Option<i32> {
    let year = (value + 0.5).floor();
    (year.is_finite() && year >= f64::from(i32::MIN) && year <= f64::from(i32::MAX))
        .then_some(year as i32)
}

// ---------------------------------------------------------------------------
// ViewController
// ---------------------------------------------------------------------------

/// State of the three linked views over one loaded dataset.
///
/// Every operation is synchronous and total: empty or out-of-range input
/// leaves nothing drawn or nothing selected rather than failing.
pub struct ViewController {
    dataset: SalaryDataset,
    config: ViewConfig,

    remote: RemoteComparison,
    level_stats: BTreeMap<ExperienceLevel, LevelStats>,
    parallel: Vec<ParallelRecord>,
    axes: ParallelAxes,
    /// Per-year averages across all levels.
    year_summary: Vec<YearPoint>,

    line: LineView,
    window: YearWindow,
    annotation: Option<YearPoint>,
    highlighted: Option<RecordId>,
}

impl ViewController {
    pub fn new(dataset: SalaryDataset, config: ViewConfig) -> Self {
        let records = &dataset.filtered;
        if records.is_empty() {
            log::warn!("No records match the analysis filter; all charts are empty");
        }

        let remote = remote_comparison(records);
        for bucket in remote.buckets() {
            if bucket.average_salary.is_none() {
                log::warn!("No {} records; its bar is not drawn", bucket.category.label());
            }
        }
        let level_stats = stats_by_level(records);
        let parallel = parallel_records(records, &level_stats);
        let axes = ParallelAxes::new(&level_stats, &config.parallel_axes, config.salary_ticks);
        let year_summary = salary_by_year(records, LevelFilter::All);

        let center = Domain::extent(year_summary.iter().map(|p| f64::from(p.year)))
            .map(|d| d.midpoint())
            .unwrap_or(0.0);
        let window = YearWindow {
            center,
            width: config.year_window_width,
        };

        let mut controller = ViewController {
            dataset,
            config,
            remote,
            level_stats,
            parallel,
            axes,
            year_summary,
            line: LineView {
                level_filter: LevelFilter::All,
                series: Vec::new(),
                year_domain: None,
                salary_domain: None,
            },
            window,
            annotation: None,
            highlighted: None,
        };
        controller.set_experience_level_filter(LevelFilter::All);
        controller
    }

    /// Recompute the line series for `level` and rescale its axes. The
    /// annotation is looked up again at the unchanged window centre.
    pub fn set_experience_level_filter(&mut self, level: LevelFilter) {
        let series = salary_by_year(&self.dataset.filtered, level);
        if series.is_empty() {
            log::warn!("No salaries for experience level {level}; line is not drawn");
        }
        let year_domain = Domain::extent(series.iter().map(|p| f64::from(p.year)));
        let salary_domain = Domain::extent(series.iter().map(|p| p.average_salary))
            .map(|d| d.nice(self.config.salary_ticks));

        log::debug!(
            "Level filter {level}: {} points, years {year_domain:?}, salary {salary_domain:?}",
            series.len()
        );
        self.line = LineView {
            level_filter: level,
            series,
            year_domain,
            salary_domain,
        };
        self.annotation = self.point_at(self.window.center);
    }

    /// Re-centre the selection window on `center_year` and publish the active
    /// series' point for the nearest whole year, or clear the annotation.
    pub fn move_year_selection(&mut self, center_year: f64) {
        if center_year.is_finite() {
            self.window.center = center_year;
        }
        self.annotation = self.point_at(center_year);
        log::debug!("Year selection at {center_year:.2}: {:?}", self.annotation);
    }

    /// Highlight exactly one record; any previous highlight is dropped. An
    /// unknown id leaves nothing highlighted.
    pub fn select_parallel_record(&mut self, id: RecordId) -> Option<Highlight> {
        let selected = self.parallel.iter().find(|p| p.id == id).map(Highlight::from);
        self.highlighted = selected.map(|h| h.id);
        log::debug!("Parallel selection {id}: {selected:?}");
        selected
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    /// Record under a point in parallel-chart coordinates (axis index, `[0, 1]`).
    pub fn nearest_parallel_record(&self, point: [f64; 2]) -> Option<RecordId> {
        self.axes
            .nearest(&self.parallel, point, self.config.hit_tolerance)
    }

    fn point_at(&self, center_year: f64) -> Option<YearPoint> {
        let year = snap_year(center_year)?;
        self.line.series.iter().find(|p| p.year == year).copied()
    }

    // -- read access for the renderer --

    pub fn dataset(&self) -> &SalaryDataset {
        &self.dataset
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn remote_comparison(&self) -> &RemoteComparison {
        &self.remote
    }

    pub fn level_stats(&self) -> &BTreeMap<ExperienceLevel, LevelStats> {
        &self.level_stats
    }

    pub fn parallel_records(&self) -> &[ParallelRecord] {
        &self.parallel
    }

    pub fn parallel_axes(&self) -> &ParallelAxes {
        &self.axes
    }

    pub fn year_summary(&self) -> &[YearPoint] {
        &self.year_summary
    }

    pub fn line(&self) -> &LineView {
        &self.line
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.line.level_filter
    }

    pub fn year_window(&self) -> YearWindow {
        self.window
    }

    pub fn annotation(&self) -> Option<YearPoint> {
        self.annotation
    }

    pub fn highlighted(&self) -> Option<RecordId> {
        self.highlighted
    }

    pub fn highlight(&self) -> Option<Highlight> {
        let id = self.highlighted?;
        self.parallel.iter().find(|p| p.id == id).map(Highlight::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::RecordFilter;
    use crate::data::model::tests::record;
    use crate::data::model::EmploymentType::FullTime;
    use crate::data::model::ExperienceLevel::*;
    use crate::data::model::Record;

    fn controller(records: Vec<Record>) -> ViewController {
        let dataset = SalaryDataset::new(records, &RecordFilter::default());
        ViewController::new(dataset, ViewConfig::default())
    }

    fn three_years() -> ViewController {
        controller(vec![
            record(Senior, "US", FullTime, 0, 100_000, 2020),
            record(Entry, "US", FullTime, 100, 60_000, 2021),
            record(Senior, "US", FullTime, 100, 200_000, 2021),
            record(Senior, "US", FullTime, 50, 180_000, 2022),
            record(Mid, "US", FullTime, 0, 120_000, 2022),
            record(Senior, "DE", FullTime, 0, 999_999, 2023),
        ])
    }

    #[test]
    fn snapping_rounds_half_up() {
        assert_eq!(snap_year(2021.6), Some(2022));
        assert_eq!(snap_year(2021.5), Some(2022));
        assert_eq!(snap_year(2021.49), Some(2021));
        assert_eq!(snap_year(f64::NAN), None);
        assert_eq!(snap_year(f64::INFINITY), None);
    }

    #[test]
    fn initial_state() {
        let c = three_years();
        assert_eq!(c.level_filter(), LevelFilter::All);
        assert_eq!(c.highlighted(), None);
        // Filtered years are 2020..=2022; the German 2023 row is excluded.
        assert_eq!(c.year_window().center, 2021.0);
        assert_eq!(c.year_window().width, ViewConfig::default().year_window_width);
        assert_eq!(c.line().year_domain, Some(Domain::new(2020.0, 2022.0)));
        assert_eq!(c.annotation().map(|p| p.year), Some(2021));
        assert_eq!(c.year_summary().len(), 3);
    }

    #[test]
    fn move_year_selection_snaps_and_publishes() {
        let mut c = three_years();
        c.move_year_selection(2021.6);
        assert_eq!(
            c.annotation(),
            Some(YearPoint {
                year: 2022,
                average_salary: 150_000.0
            })
        );
        assert_eq!(c.year_window().center, 2021.6);
        assert_eq!(c.year_window().width, ViewConfig::default().year_window_width);
    }

    #[test]
    fn move_year_selection_clears_when_year_absent_from_active_series() {
        let mut c = three_years();
        c.set_experience_level_filter(LevelFilter::Only(Entry));
        c.move_year_selection(2021.6);
        assert_eq!(c.annotation(), None);

        c.move_year_selection(2020.8);
        assert_eq!(c.annotation().map(|p| p.average_salary), Some(60_000.0));

        c.move_year_selection(1990.0);
        assert_eq!(c.annotation(), None);
    }

    #[test]
    fn window_keeps_its_width() {
        let mut c = three_years();
        let width = c.year_window().width;
        for center in [2020.0, 2022.4, 2019.0] {
            c.move_year_selection(center);
            let w = c.year_window();
            assert_eq!(w.width, width);
            assert!((w.end() - w.start() - width).abs() < 1e-9);
            assert_eq!(w.center, center);
        }
        c.move_year_selection(f64::NAN);
        assert_eq!(c.year_window().center, 2019.0);
        assert_eq!(c.annotation(), None);
    }

    #[test]
    fn level_filter_rescales_line() {
        let mut c = three_years();
        c.set_experience_level_filter(LevelFilter::Only(Senior));
        let line = c.line();
        assert_eq!(line.level_filter, LevelFilter::Only(Senior));
        let years: Vec<i32> = line.series.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
        assert_eq!(line.year_domain, Some(Domain::new(2020.0, 2022.0)));
        assert_eq!(line.salary_domain, Some(Domain::new(100_000.0, 200_000.0)));

        c.set_experience_level_filter(LevelFilter::Only(Entry));
        let line = c.line();
        assert_eq!(line.year_domain, Some(Domain::new(2021.0, 2021.0)));
        assert!(line.year_domain.unwrap().is_degenerate());
        assert_eq!(line.salary_domain, Some(Domain::new(60_000.0, 60_000.0)));

        c.set_experience_level_filter(LevelFilter::Only(Executive));
        assert!(c.line().series.is_empty());
        assert_eq!(c.line().year_domain, None);
        assert_eq!(c.line().salary_domain, None);
        assert_eq!(c.annotation(), None);
    }

    #[test]
    fn level_filter_is_last_write_wins() {
        let mut once = three_years();
        once.set_experience_level_filter(LevelFilter::Only(Senior));

        let mut twice = three_years();
        twice.set_experience_level_filter(LevelFilter::Only(Mid));
        twice.set_experience_level_filter(LevelFilter::Only(Senior));
        twice.set_experience_level_filter(LevelFilter::Only(Senior));

        assert_eq!(once.line(), twice.line());
        assert_eq!(once.annotation(), twice.annotation());
    }

    #[test]
    fn single_highlight_invariant() {
        let mut c = three_years();
        let first = c.select_parallel_record(RecordId(0)).unwrap();
        assert_eq!(first.experience_level, Senior);
        assert_eq!(c.highlighted(), Some(RecordId(0)));

        let again = c.select_parallel_record(RecordId(0));
        assert_eq!(again, Some(first));
        assert_eq!(c.highlighted(), Some(RecordId(0)));

        let second = c.select_parallel_record(RecordId(1)).unwrap();
        assert_eq!(second.experience_level, Entry);
        assert_eq!(c.highlighted(), Some(RecordId(1)));
        assert_eq!(c.highlight(), Some(second));
    }

    #[test]
    fn highlight_exposes_level_averages() {
        let mut c = three_years();
        let h = c.select_parallel_record(RecordId(2)).unwrap();
        // Senior: salaries 100k, 200k, 180k; ratios 0, 100, 50.
        assert_eq!(h.average_salary, 160_000.0);
        assert_eq!(h.average_remote_ratio, 50.0);
    }

    #[test]
    fn unknown_record_clears_highlight() {
        let mut c = three_years();
        c.select_parallel_record(RecordId(0));
        assert_eq!(c.select_parallel_record(RecordId(99)), None);
        assert_eq!(c.highlighted(), None);

        c.select_parallel_record(RecordId(3));
        c.clear_highlight();
        assert_eq!(c.highlight(), None);
    }

    #[test]
    fn nearest_record_hit_test() {
        let c = three_years();
        let target = c.parallel_records()[1];
        let line = c.parallel_axes().polyline(&target).unwrap();
        assert_eq!(c.nearest_parallel_record(line[1]), Some(RecordId(1)));
        assert_eq!(c.nearest_parallel_record([10.0, 10.0]), None);
    }

    #[test]
    fn empty_dataset_draws_nothing() {
        let mut c = controller(vec![record(Senior, "FR", FullTime, 0, 1, 2020)]);
        assert!(c.dataset().filtered.is_empty());
        assert!(c.line().series.is_empty());
        assert!(c.parallel_records().is_empty());
        assert!(c.level_stats().is_empty());
        assert_eq!(c.remote_comparison().max_average(), None);
        c.move_year_selection(2020.0);
        assert_eq!(c.annotation(), None);
        assert_eq!(c.select_parallel_record(RecordId(0)), None);
        c.set_experience_level_filter(LevelFilter::Only(Senior));
        assert!(c.line().series.is_empty());
    }
}
