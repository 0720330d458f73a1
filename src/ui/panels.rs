use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::LevelFilter;
use crate::state::AppState;

use super::format;

// ---------------------------------------------------------------------------
// Left side panel – level selector and readouts
// ---------------------------------------------------------------------------

fn level_filter_label(level: LevelFilter) -> String {
    match level {
        LevelFilter::All => "ALL: All Levels".to_string(),
        LevelFilter::Only(l) => format!("{}: {}", l.code(), l.display_name()),
    }
}

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Experience Level");
    ui.separator();

    let Some(controller) = &state.controller else {
        ui.label("No dataset loaded.");
        return;
    };

    let current = controller.level_filter();
    let mut requested = current;
    egui::ComboBox::from_id_salt("experience_select")
        .selected_text(level_filter_label(current))
        .show_ui(ui, |ui: &mut Ui| {
            for option in LevelFilter::OPTIONS {
                ui.selectable_value(&mut requested, option, level_filter_label(option));
            }
        });

    ui.add_space(8.0);
    let salary_text = controller
        .annotation()
        .map(|p| format!("Average Salary: {}", format::usd(p.average_salary)))
        .unwrap_or_else(|| "Average Salary: ".to_string());
    ui.label(RichText::new(salary_text).strong().size(16.0));

    if let Some(h) = controller.highlight() {
        ui.label(
            RichText::new(format!(
                "Selected: {}, {:.1}% Remote, Average Salary: {}",
                h.experience_level,
                h.average_remote_ratio,
                format::usd(h.average_salary)
            ))
            .strong(),
        );
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(colors) = &state.colors {
                ui.strong("Legend");
                for (label, color) in colors.legend_entries() {
                    ui.label(RichText::new(format!("■ {label}")).color(color));
                }
                ui.separator();
            }

            ui.strong("Per level");
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::remainder())
                .header(18.0, |mut header| {
                    for title in ["Level", "Count", "Remote %", "Salary"] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for stats in controller.level_stats().values() {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(stats.experience_level.code());
                            });
                            row.col(|ui| {
                                ui.label(stats.count.to_string());
                            });
                            row.col(|ui| {
                                ui.label(format!("{:.1}", stats.average_remote_ratio));
                            });
                            row.col(|ui| {
                                ui.label(format::usd(stats.average_salary));
                            });
                        });
                    }
                });
            ui.separator();

            ui.strong("By year");
            for point in controller.year_summary() {
                ui.label(format!(
                    "{} All Levels Average: {}",
                    point.year,
                    format::usd(point.average_salary)
                ));
            }
        });

    if requested != current {
        state.set_level_filter(requested);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(controller) = &state.controller {
            let ds = controller.dataset();
            ui.label(format!(
                "{} records loaded, {} {} / {}",
                ds.len(),
                ds.filtered.len(),
                state.config.filter.employee_residence,
                state.config.filter.employment_type
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
