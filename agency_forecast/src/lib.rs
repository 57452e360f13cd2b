//! # Agency Forecast
//!
//! Financial analytics for a services agency: monthly revenue and profit
//! forecasting, project margins and pipeline scoring over a snapshot of
//! projects, staff, time allocations and budget items.
//!
//! ## Features
//!
//! - Monthly forecast of revenue, likelihood-weighted revenue, profit and
//!   director load, accumulated over each project's full life
//! - Project margins (contract value minus personnel and non-personnel cost)
//! - Pipeline ranking by a configurable composite score
//! - Staff utilization and director capacity
//! - Snapshot loading from CSV exports or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use agency_forecast::forecast::forecast;
//! use agency_forecast::model::{Project, ProjectStatus};
//!
//! let survey = Project {
//!     contract_value: 45_000.0,
//!     start_date: "2026-01-15".to_string(),
//!     expected_duration_months: 3,
//!     expected_margin_pct: 35.0,
//!     ..Project::new(1, "Consumer Confidence Survey", ProjectStatus::Active)
//! };
//!
//! let months = forecast(&[survey], 2026, 1, 12)?;
//! assert_eq!(months.len(), 12);
//! assert_eq!(months[0].revenue, 15_000.0);
//! assert_eq!(months[3].revenue, 0.0);
//! # Ok::<(), agency_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod margin;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod utilization;

// Re-export commonly used types
pub use crate::config::AnalyticsConfig;
pub use crate::data::SnapshotLoader;
pub use crate::error::ForecastError;
pub use crate::forecast::{accumulate, forecast, window, ForecastBucket, ForecastSummary};
pub use crate::margin::{margin, ProjectMargin};
pub use crate::model::{Employee, Project, ProjectStatus, TimeAllocation};
pub use crate::store::{ProjectStore, Snapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
