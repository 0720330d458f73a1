use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::color::{remote_color, LevelColors, LINE_COLOR};
use crate::data::aggregate::RemoteCategory;
use crate::view::domain::Domain;
use crate::view::parallel::DIMENSIONS;
use crate::view::ViewController;

use super::format;

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Bar chart: non-remote vs. remote
// ---------------------------------------------------------------------------

pub fn remote_bar_chart(ui: &mut Ui, controller: &ViewController) {
    ui.strong("Average Salary: Non-Remote vs Remote Data Science Employees");

    let comparison = controller.remote_comparison();
    let Some(max) = comparison.max_average() else {
        ui.label("No remote or non-remote records to compare.");
        return;
    };
    let y_max = Domain::new(0.0, max)
        .nice(controller.config().salary_ticks)
        .max;

    Plot::new("remote_bar_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Average Salary (USD)")
        .x_axis_formatter(|mark, _range| match mark.value {
            v if v == 0.0 => RemoteCategory::NonRemote.label().to_string(),
            v if v == 1.0 => RemoteCategory::Remote.label().to_string(),
            _ => String::new(),
        })
        .y_axis_formatter(|mark, _range| format::salary_tick(mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([-0.6, 0.0], [1.6, y_max]));
            for (i, bucket) in comparison.buckets().into_iter().enumerate() {
                let Some(avg) = bucket.average_salary else {
                    continue;
                };
                let x = i as f64;
                let color = remote_color(bucket.category);
                let ratios = bucket.category.ratios();
                let legend = format!(
                    "{}: {} - {}% remote",
                    bucket.category.label(),
                    ratios.start(),
                    ratios.end()
                );
                let bar = Bar::new(x, avg).width(0.6).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(legend).color(color));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(x, avg),
                        RichText::new(format::usd(avg)).size(15.0),
                    )
                    .anchor(Align2::CENTER_TOP)
                    .color(Color32::WHITE),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Line chart: salary by year with the selection window
// ---------------------------------------------------------------------------

/// Dragging (or clicking) inside the plot re-centres the year window.
pub fn salary_line_chart(ui: &mut Ui, controller: &mut ViewController) {
    ui.strong("Average Salary of US Data Science Employees by Year");

    let line = controller.line().clone();
    let (Some(years), Some(salaries)) = (line.year_domain, line.salary_domain) else {
        ui.label(format!("No salaries for level {}.", line.level_filter));
        return;
    };
    let years = years.padded_if_degenerate(0.5);
    let salaries = salaries.padded_if_degenerate(1000.0);
    let window = controller.year_window();
    let annotation = controller.annotation();

    let response = Plot::new("salary_line_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Average Salary (USD)")
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .y_axis_formatter(|mark, _range| format::salary_tick(mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [years.min, salaries.min],
                [years.max, salaries.max],
            ));

            let points: PlotPoints = line
                .series
                .iter()
                .map(|p| [f64::from(p.year), p.average_salary])
                .collect();
            plot_ui.line(
                Line::new(points)
                    .name("Average Salary Over Years")
                    .color(LINE_COLOR)
                    .width(2.0),
            );

            let selection = vec![
                [window.start(), salaries.min],
                [window.end(), salaries.min],
                [window.end(), salaries.max],
                [window.start(), salaries.max],
            ];
            plot_ui.polygon(
                Polygon::new(selection)
                    .fill_color(Color32::from_rgba_unmultiplied(120, 120, 120, 40))
                    .stroke(Stroke::new(1.0, Color32::GRAY)),
            );

            if let Some(point) = annotation {
                let at = [f64::from(point.year), point.average_salary];
                plot_ui.points(Points::new(vec![at]).radius(4.0).color(LINE_COLOR));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(at[0], at[1]),
                        RichText::new(format::usd(point.average_salary)).size(12.0),
                    )
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });

    let r = &response.response;
    if r.dragged() || r.clicked() {
        if let Some(pos) = r.interact_pointer_pos() {
            let value = response.transform.value_from_position(pos);
            controller.move_year_selection(value.x);
        }
    }
}

// ---------------------------------------------------------------------------
// Parallel coordinates: level, average remote ratio, average salary
// ---------------------------------------------------------------------------

/// Records of one level share a polyline, so one line is drawn per level and
/// the highlighted record is drawn again on top. Clicking selects the nearest
/// record; clicking empty space clears the selection.
pub fn parallel_chart(ui: &mut Ui, controller: &mut ViewController, colors: &LevelColors) {
    ui.strong("Average Salary and Average Remote Work Percent by Experience Level");

    if controller.parallel_records().is_empty() {
        ui.label("No records to plot.");
        return;
    }

    let axes = controller.parallel_axes().clone();
    let records = controller.parallel_records();
    let highlighted = controller.highlight();
    let ticks = 5;

    let response = Plot::new("parallel_chart")
        .legend(Legend::default())
        .show_axes([false, false])
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([-0.35, -0.15], [2.35, 1.05]));

            for (i, title) in DIMENSIONS.iter().enumerate() {
                let x = i as f64;
                plot_ui.line(
                    Line::new(vec![[x, 0.0], [x, 1.0]])
                        .color(Color32::DARK_GRAY)
                        .width(1.0),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(x, -0.05), RichText::new(*title).size(12.0))
                        .anchor(Align2::CENTER_TOP),
                );
            }

            for &level in &axes.levels {
                if let Some(y) = axes.level_position(level) {
                    plot_ui.text(
                        Text::new(PlotPoint::new(-0.02, y), level.code())
                            .anchor(Align2::RIGHT_CENTER),
                    );
                }
            }
            for step in 0..=ticks {
                let t = step as f64 / ticks as f64;
                let ratio = axes.remote_ratio.min + t * axes.remote_ratio.span();
                let salary = axes.salary.min + t * axes.salary.span();
                plot_ui.text(
                    Text::new(PlotPoint::new(0.98, t), format!("{ratio:.0}"))
                        .anchor(Align2::RIGHT_CENTER),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(1.98, t), format::salary_tick(salary))
                        .anchor(Align2::RIGHT_CENTER),
                );
            }

            for &level in &axes.levels {
                let Some(record) = records.iter().find(|r| r.experience_level == level) else {
                    continue;
                };
                if let Some(vertices) = axes.polyline(record) {
                    plot_ui.line(
                        Line::new(vertices.to_vec())
                            .name(level.code())
                            .color(colors.color_for(level))
                            .width(1.5),
                    );
                }
            }

            if let Some(h) = highlighted {
                if let Some(vertices) = records
                    .iter()
                    .find(|r| r.id == h.id)
                    .and_then(|r| axes.polyline(r))
                {
                    plot_ui.line(
                        Line::new(vertices.to_vec())
                            .color(colors.color_for(h.experience_level))
                            .width(6.0),
                    );
                }
            }
        });

    if response.response.clicked() {
        if let Some(pos) = response.response.interact_pointer_pos() {
            let value = response.transform.value_from_position(pos);
            match controller.nearest_parallel_record([value.x, value.y]) {
                Some(id) => {
                    controller.select_parallel_record(id);
                }
                None => controller.clear_highlight(),
            }
        }
    }
}
