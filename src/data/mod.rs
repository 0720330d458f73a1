//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<Record>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  US / full-time subset → SalaryDataset::filtered
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  remote buckets, salary by year, per-level stats
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
