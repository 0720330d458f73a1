use std::collections::BTreeMap;

use crate::config::ParallelAxisBounds;
use crate::data::aggregate::{LevelStats, ParallelRecord};
use crate::data::model::{ExperienceLevel, RecordId};

use super::domain::Domain;

/// Axis titles, left to right. Axis `i` sits at x = `i`.
pub const DIMENSIONS: [&str; 3] = [
    "Experience Level",
    "Average Remote Work Ratio (%)",
    "Average Salary (USD)",
];

// ---------------------------------------------------------------------------
// Parallel-coordinates axes
// ---------------------------------------------------------------------------

/// Scales for the three parallel axes. Every axis maps into `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelAxes {
    /// Levels on the categorical axis, bottom to top.
    pub levels: Vec<ExperienceLevel>,
    pub remote_ratio: Domain,
    pub salary: Domain,
}

impl ParallelAxes {
    pub fn new(
        stats: &BTreeMap<ExperienceLevel, LevelStats>,
        bounds: &ParallelAxisBounds,
        ticks: usize,
    ) -> Self {
        let levels = stats.keys().copied().collect();
        let (remote_ratio, salary) = match bounds {
            ParallelAxisBounds::Fixed {
                remote_ratio,
                salary,
            } => (
                Domain::new(remote_ratio[0], remote_ratio[1]),
                Domain::new(salary[0], salary[1]),
            ),
            ParallelAxisBounds::Derived => (
                derived(stats.values().map(|s| s.average_remote_ratio), ticks, 100.0),
                derived(stats.values().map(|s| s.average_salary), ticks, 1.0),
            ),
        };
        ParallelAxes {
            levels,
            remote_ratio,
            salary,
        }
    }

    /// Point-scale position of a level; a single level sits in the middle.
    pub fn level_position(&self, level: ExperienceLevel) -> Option<f64> {
        let idx = self.levels.iter().position(|l| *l == level)?;
        Some(match self.levels.len() {
            1 => 0.5,
            n => idx as f64 / (n - 1) as f64,
        })
    }

    /// Vertices of a record's polyline, one per axis.
    pub fn polyline(&self, record: &ParallelRecord) -> Option<[[f64; 2]; 3]> {
        Some([
            [0.0, self.level_position(record.experience_level)?],
            [1.0, self.remote_ratio.normalize(record.average_remote_ratio)],
            [2.0, self.salary.normalize(record.average_salary)],
        ])
    }

    /// Record whose polyline passes closest to `point`, within `tolerance`.
    /// Coincident lines resolve to the last one, which is drawn on top.
    pub fn nearest(
        &self,
        records: &[ParallelRecord],
        point: [f64; 2],
        tolerance: f64,
    ) -> Option<RecordId> {
        let mut best: Option<(f64, RecordId)> = None;
        for record in records {
            let Some(line) = self.polyline(record) else {
                continue;
            };
            let d = distance_to_polyline(point, &line);
            if d > tolerance {
                continue;
            }
            if best.map_or(true, |(best_d, _)| d <= best_d) {
                best = Some((d, record.id));
            }
        }
        best.map(|(_, id)| id)
    }
}

/// Data extent rounded outward. A single value is widened by a fraction of
/// its magnitude so it still lands mid-axis.
fn derived<I>(values: I, ticks: usize, empty_max: f64) -> Domain
where
    I: IntoIterator<Item = f64>,
{
    match Domain::extent(values) {
        Some(d) => d
            .padded_if_degenerate((d.min.abs() * 0.05).max(1.0))
            .nice(ticks),
        None => Domain::new(0.0, empty_max),
    }
}

fn distance_to_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a[0] + t * dx, a[1] + t * dy);
    ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt()
}

pub fn distance_to_polyline(point: [f64; 2], line: &[[f64; 2]]) -> f64 {
    line.windows(2)
        .map(|w| distance_to_segment(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}
