use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryLensApp {
    pub state: AppState,
}

impl SalaryLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SalaryLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: level selector and readouts ----
        egui::SidePanel::left("level_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the three linked charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &mut self.state;
            let (Some(controller), Some(colors)) = (&mut state.controller, &state.colors) else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a salary file to view charts  (File → Open…)");
                });
                return;
            };

            ui.columns(2, |columns| {
                plot::remote_bar_chart(&mut columns[0], controller);
                plot::salary_line_chart(&mut columns[1], controller);
            });
            ui.separator();
            plot::parallel_chart(ui, controller, colors);
        });
    }
}
