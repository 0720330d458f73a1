use std::path::PathBuf;

use eframe::egui;
use salary_lens::app::SalaryLensApp;
use salary_lens::config::ViewConfig;
use salary_lens::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut config = ViewConfig::load_or_default();
    if let Some(path) = std::env::args_os().nth(1) {
        config.data_path = Some(PathBuf::from(path));
    }

    // The initial load completes before the first frame; a failure is shown in the UI.
    let mut state = AppState::new(config);
    if let Some(path) = state.config.data_path.clone() {
        state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Salary Lens – Data Science Salaries",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryLensApp::new(state)))),
    )
}
