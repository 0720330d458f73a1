use std::path::Path;

use anyhow::Context;

use crate::color::LevelColors;
use crate::config::ViewConfig;
use crate::data::aggregate::LevelFilter;
use crate::data::loader::load_file;
use crate::data::model::{Record, SalaryDataset};
use crate::view::ViewController;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewConfig,

    /// Linked views over the loaded dataset (None until a file loads).
    pub controller: Option<ViewController>,

    /// Colour per experience level for the parallel chart.
    pub colors: Option<LevelColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            controller: None,
            colors: None,
            status_message: None,
        }
    }

    /// Ingest freshly loaded records: filter once, build colours and views.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let dataset = SalaryDataset::new(records, &self.config.filter);
        log::info!(
            "Loaded {} records, {} match {} / {}",
            dataset.len(),
            dataset.filtered.len(),
            self.config.filter.employee_residence,
            self.config.filter.employment_type
        );

        self.colors = Some(LevelColors::new(&dataset.levels));
        self.controller = Some(ViewController::new(dataset, self.config.clone()));
        self.status_message = None;
    }

    /// Load a data file. Any failure leaves no charts and a message in the UI.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path).with_context(|| format!("loading {}", path.display())) {
            Ok(records) => self.set_records(records),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.controller = None;
                self.colors = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Forward the level selector to the line view.
    pub fn set_level_filter(&mut self, level: LevelFilter) {
        if let Some(controller) = &mut self.controller {
            if controller.level_filter() != level {
                controller.set_experience_level_filter(level);
            }
        }
    }
}
