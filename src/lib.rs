//! # Agency PM
//!
//! `agency_pm_workspace` bundles the agency analytics crates:
//!
//! - [`math`]: calendar-month arithmetic, the margin formula and the
//!   composite pipeline score
//! - [`analytics`]: the project model, snapshot store and loaders, and the
//!   forecast, margin, pipeline and utilization reports
//!
//! ## Example
//!
//! ```
//! use agency_pm_workspace::analytics::{forecast, Project, ProjectStatus};
//!
//! let poll = Project {
//!     contract_value: 120_000.0,
//!     likelihood_pct: 75.0,
//!     expected_start_date: "2026-04-01".to_string(),
//!     expected_duration_months: 4,
//!     ..Project::new(1, "EU Barometer", ProjectStatus::Pipeline)
//! };
//!
//! let months = forecast(&[poll], 2026, 1, 12).unwrap();
//! assert_eq!(months[2].weighted_revenue, 0.0);
//! assert_eq!(months[3].weighted_revenue, 22_500.0);
//! ```

pub use agency_forecast as analytics;
pub use agency_math as math;
