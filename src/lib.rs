//! Salary Lens: three linked charts over a table of data-science salaries.
//!
//! `data` loads, filters and aggregates records; `view` holds the linked chart
//! state; `ui` and `app` draw it with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
pub mod view;
